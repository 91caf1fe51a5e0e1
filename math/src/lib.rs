//! # Coverage Math
//!
//! Fixed-point arithmetic and the coverage-ratio invariant solver used by
//! multi-asset stableswap pools.
//!
//! All functions are pure: they take the current ledger values as explicit
//! inputs and return quoted amounts. Nothing in this crate mutates state.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(not(feature = "std"), test))]
extern crate std;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod coverage;
pub mod signed;
#[cfg(test)]
pub mod test_utils;
pub mod types;
pub mod wad;

#[macro_export]
macro_rules! ensure {
	($e:expr, $f:expr) => {
		match $e {
			true => (),
			false => {
				return Err($f.into());
			}
		}
	};
}

#[macro_export]
macro_rules! to_u256 {
    ($($x:expr),+) => (
        {($(primitive_types::U256::from($x)),+)}
    );
}

#[macro_export]
macro_rules! to_balance {
	($x:expr) => {
		$crate::types::Balance::try_from($x).map_err(|_| $crate::MathError::Overflow)
	};
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum MathError {
	/// Intermediate or final value does not fit its type.
	Overflow,
	/// Division by zero.
	DivisionByZero,
	/// Value would become negative, or a zero liability was used as a divisor.
	Underflow,
	/// Requested liquidity burns no liability.
	ZeroLiquidity,
	/// Coverage ratio would end above the upper bound of the fee band.
	CoverageLimitExceeded,
	/// Pool does not hold enough cash to pay out the quoted amount.
	CashNotEnough,
	/// Computed fee ratio is above 100%.
	InvalidFee,
}

#[cfg(test)]
mod conversion_tests {
	use super::MathError;
	use crate::types::Balance;
	use primitive_types::U256;

	fn narrow(v: U256) -> Result<Balance, MathError> {
		to_balance!(v)
	}

	fn guarded(v: Balance) -> Result<Balance, MathError> {
		ensure!(v > 0, MathError::Underflow);
		Ok(v)
	}

	#[test]
	fn to_balance_should_fail_when_value_exceeds_u128() {
		assert_eq!(narrow(U256::from(7u128)), Ok(7u128));
		assert_eq!(narrow(U256::from(u128::MAX) + 1), Err(MathError::Overflow));
	}

	#[test]
	fn ensure_should_return_error_when_condition_is_false() {
		assert_eq!(guarded(1), Ok(1));
		assert_eq!(guarded(0), Err(MathError::Underflow));
	}

	#[test]
	fn to_u256_should_widen_all_arguments() {
		let (a, b) = to_u256!(1u128, u128::MAX);
		assert_eq!(a, U256::one());
		assert_eq!(b, U256::from(u128::MAX));
	}
}
