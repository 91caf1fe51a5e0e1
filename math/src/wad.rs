//! WAD (1e18) fixed-point helpers.
//!
//! Multiplication and division round half up, the same way the signed variants in
//! [`crate::signed::SignedWad`] do. Square root is the floor root found by Newton's method.

use crate::types::{Balance, HALF_WAD, WAD, WAD_DECIMALS};
use crate::MathError::{self, DivisionByZero, Overflow};
use crate::{ensure, to_balance, to_u256};
use fixed::types::U64F64;
use primitive_types::U256;
use sp_arithmetic::helpers_128bit::multiply_by_rational_with_rounding;
use sp_arithmetic::Rounding;

/// Upper bound on Newton iterations; enough to walk down from `U256::MAX`.
pub const MAX_SQRT_ITERATIONS: u16 = 256;

/// Upper bound on Taylor series terms used by `pow`.
const MAX_EXP_TERMS: u32 = 192;

type FixedWad = U64F64;

/// `(a * b + WAD / 2) / WAD`
pub fn wmul(a: Balance, b: Balance) -> Result<Balance, MathError> {
	let (a, b, half, wad) = to_u256!(a, b, HALF_WAD, WAD);
	let r = a.checked_mul(b).ok_or(Overflow)?.checked_add(half).ok_or(Overflow)? / wad;
	to_balance!(r)
}

/// `(a * WAD + b / 2) / b`
pub fn wdiv(a: Balance, b: Balance) -> Result<Balance, MathError> {
	ensure!(b != 0, DivisionByZero);
	let (a, b, wad) = to_u256!(a, b, WAD);
	let r = a
		.checked_mul(wad)
		.ok_or(Overflow)?
		.checked_add(b / 2)
		.ok_or(Overflow)?
		/ b;
	to_balance!(r)
}

/// `a * b / c` rounded down. `None` on overflow or when `c` is zero.
pub fn mul_div_floor(a: Balance, b: Balance, c: Balance) -> Option<Balance> {
	multiply_by_rational_with_rounding(a, b, c, Rounding::Down)
}

/// Floor square root of `x`, seeded with `guess`.
///
/// A seed of zero or above `x` falls back to `x`. After the first step the iterate never drops
/// below the floor root, so the loop only walks down.
pub fn sqrt(x: U256, guess: U256) -> U256 {
	if x.is_zero() {
		return U256::zero();
	}
	if x <= U256::from(3u8) {
		return U256::one();
	}

	let mut z = if !guess.is_zero() && guess <= x { guess } else { x };
	z = (x / z).saturating_add(z) >> 1;

	for _ in 0..MAX_SQRT_ITERATIONS {
		let next = (x / z).saturating_add(z) >> 1;
		if next >= z {
			break;
		}
		z = next;
	}
	z
}

/// Rescale an amount with `decimals` into WAD.
pub fn to_wad(amount: Balance, decimals: u8) -> Result<Balance, MathError> {
	match decimals.cmp(&WAD_DECIMALS) {
		core::cmp::Ordering::Equal => Ok(amount),
		core::cmp::Ordering::Less => amount
			.checked_mul(pow10(WAD_DECIMALS - decimals)?)
			.ok_or(Overflow),
		core::cmp::Ordering::Greater => Ok(amount / pow10(decimals - WAD_DECIMALS)?),
	}
}

/// Rescale a WAD amount into `decimals`, rounding down.
pub fn from_wad(amount: Balance, decimals: u8) -> Result<Balance, MathError> {
	match decimals.cmp(&WAD_DECIMALS) {
		core::cmp::Ordering::Equal => Ok(amount),
		core::cmp::Ordering::Less => Ok(amount / pow10(WAD_DECIMALS - decimals)?),
		core::cmp::Ordering::Greater => amount
			.checked_mul(pow10(decimals - WAD_DECIMALS)?)
			.ok_or(Overflow),
	}
}

fn pow10(exp: u8) -> Result<Balance, MathError> {
	10u128.checked_pow(exp as u32).ok_or(Overflow)
}

/// `base ^ exponent` for WAD-scaled base and fractional WAD-scaled exponent.
///
/// Computed as `exp(exponent * ln(base))` in 64.64 fixed point. The base must fit in the integer
/// half of the fixed point type, i.e. stay below 2^64 in whole units.
pub fn pow(base: Balance, exponent: Balance) -> Result<Balance, MathError> {
	if base == 0 {
		return Ok(0);
	}
	if exponent == 0 {
		return Ok(WAD);
	}
	if exponent == WAD || base == WAD {
		return Ok(base);
	}

	let (ln_base, negative) = ln(to_fixed(base)?)?;
	let product = ln_base.checked_mul(to_fixed(exponent)?).ok_or(Overflow)?;
	from_fixed(exp(product, negative)?)
}

fn to_fixed(value: Balance) -> Result<FixedWad, MathError> {
	let bits = (U256::from(value) << 64) / U256::from(WAD);
	Ok(FixedWad::from_bits(to_balance!(bits)?))
}

fn from_fixed(value: FixedWad) -> Result<Balance, MathError> {
	let r = U256::from(value.to_bits()).checked_mul(U256::from(WAD)).ok_or(Overflow)? >> 64;
	to_balance!(r)
}

/// Natural logarithm. The flag is set when the result is negative, i.e. `operand < 1`.
fn ln(operand: FixedWad) -> Result<(FixedWad, bool), MathError> {
	ensure!(operand > FixedWad::from_num(0), Overflow);

	let one = FixedWad::from_num(1);
	let (log2, negative) = if operand < one {
		(log2_above_one(one.checked_div(operand).ok_or(Overflow)?), true)
	} else {
		(log2_above_one(operand), false)
	};

	let ln2 = FixedWad::from_num(fixed::consts::LN_2);
	Ok((log2.checked_mul(ln2).ok_or(Overflow)?, negative))
}

/// Binary logarithm for `operand >= 1`, one result bit per squaring.
fn log2_above_one(operand: FixedWad) -> FixedWad {
	let one = FixedWad::from_num(1);
	let two = FixedWad::from_num(2);

	let mut x = operand;
	let mut integer: u128 = 0;
	while x >= two {
		integer += 1;
		x >>= 1u32;
	}

	let mut bits: u128 = integer << 64;
	if x == one {
		return FixedWad::from_bits(bits);
	}

	for i in (0..64u32).rev() {
		x = x.saturating_mul(x);
		if x >= two {
			x >>= 1u32;
			bits |= 1u128 << i;
		}
	}
	FixedWad::from_bits(bits)
}

/// `e^operand`, or `e^-operand` when `negative` is set, by Taylor series.
fn exp(operand: FixedWad, negative: bool) -> Result<FixedWad, MathError> {
	let one = FixedWad::from_num(1);
	if operand == FixedWad::from_num(0) {
		return Ok(one);
	}

	let mut result = one.checked_add(operand).ok_or(Overflow)?;
	let mut term = operand;
	for i in 2..MAX_EXP_TERMS {
		term = term.checked_mul(operand).ok_or(Overflow)?;
		term = term.checked_div(FixedWad::from_num(i)).ok_or(Overflow)?;
		if term == FixedWad::from_num(0) {
			break;
		}
		result = result.checked_add(term).ok_or(Overflow)?;
	}

	if negative {
		result = one.checked_div(result).ok_or(Overflow)?;
	}
	Ok(result)
}
