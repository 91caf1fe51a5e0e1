//! Conversions between pool assets and cross-chain credit.
//!
//! Credit is a numeraire amount without a liability of its own. Swapping tokens into credit
//! moves the asset along the invariant curve and pays out the change in `L * (r - A/r)`, divided
//! by `1 + A`. Credit quotes are one-directional: there is no exact-output variant.

use crate::coverage::calculate_high_coverage_fee;
use crate::coverage::math::solve_quadratic;
use crate::coverage::types::{AssetReserve, AssetSnapshot, CreditQuote, SwapParameters, TradeQuote};
use crate::ensure;
use crate::types::{Balance, SignedWad, WAD};
use crate::wad::{mul_div_floor, wmul};
use crate::MathError::{self, CashNotEnough, DivisionByZero, Overflow, Underflow};

/// Credit received for paying `amount` into an asset, before fees and price scaling.
pub fn swap_to_credit_quote(reserve: AssetReserve, amount: Balance, amplification: Balance) -> Result<Balance, MathError> {
	ensure!(reserve.liability != 0, Underflow);

	let amp = SignedWad::from(amplification);
	let liability = SignedWad::from(reserve.liability);
	let cash = SignedWad::from(reserve.cash);

	let ratio = cash.wdiv(liability)?;
	let new_ratio = cash.checked_add(SignedWad::from(amount))?.wdiv(liability)?;

	let after = new_ratio.checked_sub(amp.wdiv(new_ratio)?)?;
	let before = ratio.checked_sub(amp.wdiv(ratio)?)?;

	liability
		.wmul(after.checked_sub(before)?)?
		.wdiv(SignedWad::wad().checked_add(amp)?)?
		.to_balance()
}

/// Tokens released from an asset for `credit`, before fees and price scaling.
pub fn swap_from_credit_quote(
	reserve: AssetReserve,
	credit: Balance,
	amplification: Balance,
) -> Result<Balance, MathError> {
	ensure!(reserve.liability != 0, Underflow);

	let amp = SignedWad::from(amplification);
	let liability = SignedWad::from(reserve.liability);
	let cash = SignedWad::from(reserve.cash);

	let ratio = cash.wdiv(liability)?;
	let b = SignedWad::from(credit)
		.checked_mul(SignedWad::wad().checked_add(amp)?)?
		.checked_div(liability)?
		.checked_sub(ratio)?
		.checked_add(amp.wdiv(ratio)?)?;
	let new_ratio = solve_quadratic(b, amplification)?;

	cash.checked_sub(liability.wmul(SignedWad::from(new_ratio))?)?
		.to_balance()
}

/// Swap `amount` of `from` into credit.
///
/// The haircut is taken from the input; the high coverage ratio fee is charged on what remains.
pub fn calculate_tokens_for_credit(
	from: &AssetSnapshot,
	amount: Balance,
	params: &SwapParameters,
) -> Result<CreditQuote, MathError> {
	if amount == 0 {
		return Ok(CreditQuote::default());
	}

	let mut fee = wmul(amount, params.haircut_rate)?;
	if let Some(band) = params.fee_band {
		let quoted = amount.checked_sub(fee).ok_or(Underflow)?;
		let coverage_fee = calculate_high_coverage_fee(from.reserve, amount, quoted, band)?;
		fee = fee.checked_add(coverage_fee).ok_or(Overflow)?;
	}

	let net = amount.checked_sub(fee).ok_or(Underflow)?;
	let credit = swap_to_credit_quote(from.reserve, net, params.amplification)?;

	Ok(CreditQuote {
		credit: mul_div_floor(credit, from.relative_price, WAD).ok_or(Overflow)?,
		fee,
	})
}

/// Swap `credit` into `to`. The haircut is taken from the output.
pub fn calculate_credit_for_tokens(
	to: &AssetSnapshot,
	credit: Balance,
	params: &SwapParameters,
) -> Result<TradeQuote, MathError> {
	if credit == 0 {
		return Ok(TradeQuote::default());
	}
	ensure!(to.relative_price != 0, DivisionByZero);

	let credit = mul_div_floor(credit, WAD, to.relative_price).ok_or(Overflow)?;
	let ideal = swap_from_credit_quote(to.reserve, credit, params.amplification)?;
	ensure!(to.cash() >= ideal, CashNotEnough);

	let fee = wmul(ideal, params.haircut_rate)?;
	Ok(TradeQuote {
		amount: ideal - fee,
		fee,
	})
}
