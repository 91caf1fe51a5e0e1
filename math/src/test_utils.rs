use crate::types::{Balance, WAD};

use proptest::prelude::*;

// ----- Macros

/// Asserts that two expressions `$x` and `$y` are approximately equal to each other up to a delta `$z`.
macro_rules! assert_approx_eq {
	($x:expr, $y:expr, $z:expr) => {{
		assert_approx_eq!($x, $y, $z, "values are not approximately equal");
	}};
	($x:expr, $y:expr, $z:expr, $r:expr) => {{
		let diff = if $x >= $y {
			$x.clone() - $y.clone()
		} else {
			$y.clone() - $x.clone()
		};
		assert!(
			diff <= $z,
			"\n{}\n    left: {:?}\n   right: {:?}\n    diff: {:?}\nmax_diff: {:?}\n",
			$r,
			$x,
			$y,
			diff,
			$z
		);
	}};
}
pub(crate) use assert_approx_eq;

/// Asserts that two expressions `$x` and `$y` are approximately equal to each other up to a delta `$z`.
macro_rules! prop_assert_approx_eq {
	($x:expr, $y:expr, $z:expr) => {{
		prop_assert_approx_eq!($x, $y, $z, "values are not approximately equal");
	}};
	($x:expr, $y:expr, $z:expr, $r:expr) => {{
		let diff = if $x >= $y {
			$x.clone() - $y.clone()
		} else {
			$y.clone() - $x.clone()
		};
		prop_assert!(
			diff <= $z,
			"\n{}\n    left: {:?}\n   right: {:?}\n    diff: {:?}\nmax_diff: {:?}\n",
			$r,
			$x,
			$y,
			diff,
			$z
		);
	}};
}
pub(crate) use prop_assert_approx_eq;

// ----- Constants

/// Smallest reserve used by property tests, in whole tokens.
pub const MIN_RESERVE: Balance = 1_000;
/// Biggest reserve used by property tests, in whole tokens.
/// Keeps the squared liabilities of the solver well inside `U256`.
pub const MAX_RESERVE: Balance = 1_000_000_000;

// ----- Strategies

pub fn wad_amount(min: Balance, max: Balance) -> impl Strategy<Value = Balance> {
	(min * WAD)..(max * WAD)
}

pub fn amplification() -> impl Strategy<Value = Balance> {
	// 0.0001 .. 0.5
	100_000_000_000_000u128..500_000_000_000_000_000u128
}

/// Coverage ratio between 0.5 and 1.5.
pub fn coverage_ratio() -> impl Strategy<Value = Balance> {
	(WAD / 2)..(3 * WAD / 2)
}

#[test]
fn approx_macros_accept_both_orders() {
	assert_approx_eq!(10u128, 12u128, 2u128);
	assert_approx_eq!(12u128, 10u128, 2u128);
}
