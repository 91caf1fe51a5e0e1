use crate::types::{Balance, HALF_WAD, WAD};
use crate::wad::sqrt;
use crate::MathError::{self, DivisionByZero, Overflow, Underflow};
use core::cmp::Ordering;
use primitive_types::U256;

/// Signed WAD-scaled number in sign-magnitude form.
///
/// Magnitude is a full `U256`, so the value range is `±(2^256 - 1)`. Division truncates toward
/// zero. Zero is never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignedWad {
	pub value: U256,
	pub negative: bool,
}

impl SignedWad {
	pub fn zero() -> Self {
		Self::default()
	}

	pub fn positive(value: impl Into<U256>) -> Self {
		Self {
			value: value.into(),
			negative: false,
		}
	}

	pub fn negative(value: impl Into<U256>) -> Self {
		Self::new(value.into(), true)
	}

	pub fn new(value: U256, negative: bool) -> Self {
		Self {
			value,
			negative: negative && !value.is_zero(),
		}
	}

	pub fn wad() -> Self {
		Self::positive(WAD)
	}

	pub fn is_zero(&self) -> bool {
		self.value.is_zero()
	}

	pub fn is_negative(&self) -> bool {
		self.negative
	}

	pub fn is_positive(&self) -> bool {
		!self.negative && !self.value.is_zero()
	}

	pub fn abs(&self) -> U256 {
		self.value
	}

	pub fn neg(self) -> Self {
		Self::new(self.value, !self.negative)
	}

	pub fn checked_add(self, other: Self) -> Result<Self, MathError> {
		if self.negative == other.negative {
			let value = self.value.checked_add(other.value).ok_or(Overflow)?;
			return Ok(Self::new(value, self.negative));
		}
		if self.value >= other.value {
			Ok(Self::new(self.value - other.value, self.negative))
		} else {
			Ok(Self::new(other.value - self.value, other.negative))
		}
	}

	pub fn checked_sub(self, other: Self) -> Result<Self, MathError> {
		self.checked_add(other.neg())
	}

	pub fn checked_mul(self, other: Self) -> Result<Self, MathError> {
		let value = self.value.checked_mul(other.value).ok_or(Overflow)?;
		Ok(Self::new(value, self.negative != other.negative))
	}

	pub fn checked_div(self, other: Self) -> Result<Self, MathError> {
		if other.value.is_zero() {
			return Err(DivisionByZero);
		}
		Ok(Self::new(self.value / other.value, self.negative != other.negative))
	}

	/// `(self * other + WAD / 2) / WAD`
	pub fn wmul(self, other: Self) -> Result<Self, MathError> {
		self.checked_mul(other)?
			.checked_add(Self::positive(HALF_WAD))?
			.checked_div(Self::wad())
	}

	/// `(self * WAD + other / 2) / other`
	pub fn wdiv(self, other: Self) -> Result<Self, MathError> {
		if other.value.is_zero() {
			return Err(DivisionByZero);
		}
		let half = other.checked_div(Self::positive(2u128))?;
		self.checked_mul(Self::wad())?.checked_add(half)?.checked_div(other)
	}

	/// Floor square root, Newton's method seeded with the magnitude of `guess`.
	pub fn sqrt(self, guess: Self) -> Result<Self, MathError> {
		if self.negative {
			return Err(Underflow);
		}
		Ok(Self::positive(sqrt(self.value, guess.value)))
	}

	/// Narrow into an unsigned balance.
	pub fn to_balance(self) -> Result<Balance, MathError> {
		if self.negative {
			return Err(Underflow);
		}
		Balance::try_from(self.value).map_err(|_| Overflow)
	}

	/// Narrow the magnitude into an unsigned balance, ignoring the sign.
	pub fn abs_balance(self) -> Result<Balance, MathError> {
		Balance::try_from(self.value).map_err(|_| Overflow)
	}
}

impl From<Balance> for SignedWad {
	fn from(value: Balance) -> Self {
		Self::positive(value)
	}
}

impl PartialOrd for SignedWad {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for SignedWad {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self.negative, other.negative) {
			(false, false) => self.value.cmp(&other.value),
			(true, true) => other.value.cmp(&self.value),
			(false, true) => Ordering::Greater,
			(true, false) => Ordering::Less,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn int(v: i128) -> SignedWad {
		SignedWad::new(U256::from(v.unsigned_abs()), v < 0)
	}

	#[test]
	fn add_and_sub_should_respect_signs() {
		assert_eq!(int(5).checked_add(int(-7)), Ok(int(-2)));
		assert_eq!(int(-5).checked_add(int(7)), Ok(int(2)));
		assert_eq!(int(-5).checked_sub(int(-5)), Ok(SignedWad::zero()));
		assert!(!int(-5).checked_sub(int(-5)).unwrap().is_negative());
	}

	#[test]
	fn division_should_truncate_toward_zero() {
		assert_eq!(int(-7).checked_div(int(2)), Ok(int(-3)));
		assert_eq!(int(7).checked_div(int(-2)), Ok(int(-3)));
		assert_eq!(int(7).checked_div(int(0)), Err(DivisionByZero));
	}

	#[test]
	fn wmul_should_round_half_up_on_magnitude_for_positive_values() {
		let a = SignedWad::positive(3 * WAD / 2);
		assert_eq!(a.wmul(SignedWad::positive(2 * WAD)), Ok(SignedWad::positive(3 * WAD)));
		assert_eq!(SignedWad::positive(1u128).wmul(SignedWad::positive(HALF_WAD)), Ok(SignedWad::positive(1u128)));
	}

	#[test]
	fn wdiv_should_fail_when_divisor_is_zero() {
		assert_eq!(SignedWad::wad().wdiv(SignedWad::zero()), Err(DivisionByZero));
		assert_eq!(
			SignedWad::negative(WAD).wdiv(SignedWad::positive(4 * WAD)),
			Ok(SignedWad::negative(WAD / 4 - 1))
		);
	}

	#[test]
	fn mul_should_fail_on_overflow() {
		let big = SignedWad::positive(U256::MAX);
		assert_eq!(big.checked_mul(int(-2)), Err(Overflow));
		assert_eq!(big.checked_add(int(1)), Err(Overflow));
	}

	#[test]
	fn ordering_should_place_negatives_first() {
		let mut values = vec![int(3), int(-1), int(0), int(-10), int(7)];
		values.sort();
		assert_eq!(values, vec![int(-10), int(-1), int(0), int(3), int(7)]);
	}

	#[test]
	fn to_balance_should_reject_negative_values() {
		assert_eq!(int(-1).to_balance(), Err(Underflow));
		assert_eq!(int(-1).abs_balance(), Ok(1));
		assert_eq!(SignedWad::positive(U256::from(u128::MAX) + 1).to_balance(), Err(Overflow));
	}

	#[test]
	fn sqrt_should_reject_negative_radicand() {
		assert_eq!(int(-4).sqrt(int(2)), Err(Underflow));
		assert_eq!(int(16).sqrt(int(-3)), Ok(int(4)));
	}
}
