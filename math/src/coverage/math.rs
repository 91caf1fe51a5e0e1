use crate::coverage::types::{
	AssetReserve, AssetSnapshot, CoverageFeeBand, DepositQuote, Equilibrium, SwapParameters, TradeQuote,
	WithdrawFromOtherQuote, WithdrawQuote,
};
use crate::types::{Balance, SignedWad, WAD};
use crate::wad::{from_wad, mul_div_floor, sqrt, to_wad, wdiv, wmul};
use crate::MathError::{self, CashNotEnough, CoverageLimitExceeded, DivisionByZero, InvalidFee, Overflow, Underflow, ZeroLiquidity};
use crate::{ensure, to_balance, to_u256};
use primitive_types::U256;

fn two() -> SignedWad {
	SignedWad::positive(2u128)
}

/// Non-negative root of `x^2 + b*x - c = 0`, i.e. `(sqrt(b^2 + 4c) - b) / 2` in WAD terms.
pub fn solve_quadratic(b: SignedWad, c: Balance) -> Result<Balance, MathError> {
	let (c, four_wad) = to_u256!(c, 4 * WAD);
	let radicand = b
		.value
		.checked_mul(b.value)
		.ok_or(Overflow)?
		.checked_add(c.checked_mul(four_wad).ok_or(Overflow)?)
		.ok_or(Overflow)?;
	let root = SignedWad::positive(sqrt(radicand, b.value));
	root.checked_sub(b)?.checked_div(two())?.to_balance()
}

/// Invariant of a two-asset sub-system: `Ax + Ay - A * (Lx^2 / Ax + Ly^2 / Ay)`.
pub fn calculate_invariant(x: AssetReserve, y: AssetReserve, amplification: Balance) -> Result<SignedWad, MathError> {
	ensure!(x.cash != 0 && y.cash != 0, DivisionByZero);
	let (ax, ay, lx, ly) = to_u256!(x.cash, y.cash, x.liability, y.liability);

	let lx_term = lx.checked_mul(lx).ok_or(Overflow)? / ax;
	let ly_term = ly.checked_mul(ly).ok_or(Overflow)? / ay;
	let squares = SignedWad::positive(lx_term.checked_add(ly_term).ok_or(Overflow)?);
	let penalty = SignedWad::from(amplification).wmul(squares)?;

	SignedWad::positive(ax.checked_add(ay).ok_or(Overflow)?).checked_sub(penalty)
}

/// Core swap equation.
///
/// `amount` is positive when paid into `from`, negative for an exact amount taken out of `from`.
/// Returns the magnitude of the cash change on `to`.
pub fn swap_quote(
	from: AssetReserve,
	to: AssetReserve,
	amount: SignedWad,
	amplification: Balance,
) -> Result<Balance, MathError> {
	ensure!(from.liability != 0 && to.liability != 0, Underflow);

	let amp = SignedWad::from(amplification);
	let lx = SignedWad::from(from.liability);
	let ly = SignedWad::from(to.liability);

	let d = calculate_invariant(from, to, amplification)?;
	let rx = SignedWad::from(from.cash).checked_add(amount)?.wdiv(lx)?;
	let b = lx
		.checked_mul(rx.checked_sub(amp.wdiv(rx)?)?)?
		.checked_div(ly)?
		.checked_sub(d.wdiv(ly)?)?;
	let ry = solve_quadratic(b, amplification)?;
	let dy = ly.wmul(SignedWad::from(ry))?.checked_sub(SignedWad::from(to.cash))?;

	dy.abs_balance()
}

/// Pool-wide invariant `D = sum(P_i * L_i * (r_i - A / r_i))` and the equilibrium coverage ratio
/// `r*` solving `r* - A / r* = D / sum(P_i * L_i)`.
///
/// Assets without liability are skipped. An empty pool sits at `r* = 1`.
pub fn calculate_equilibrium(assets: &[AssetSnapshot], amplification: Balance) -> Result<Equilibrium, MathError> {
	let amp = SignedWad::from(amplification);
	let mut invariant = SignedWad::zero();
	let mut total_liability: Balance = 0;

	for asset in assets.iter().filter(|a| a.liability() != 0) {
		let ratio = SignedWad::from(asset.reserve.coverage_ratio()?);
		let weighted = wmul(asset.liability(), asset.relative_price)?;
		let term = SignedWad::from(weighted).wmul(ratio.checked_sub(amp.wdiv(ratio)?)?)?;
		invariant = invariant.checked_add(term)?;
		total_liability = total_liability.checked_add(weighted).ok_or(Overflow)?;
	}

	if total_liability == 0 {
		return Ok(Equilibrium {
			invariant,
			total_liability,
			coverage_ratio: WAD,
		});
	}

	let b = invariant.wdiv(SignedWad::from(total_liability))?.neg();
	Ok(Equilibrium {
		invariant,
		total_liability,
		coverage_ratio: solve_quadratic(b, amplification)?,
	})
}

/// Liability minted for depositing `amount` into an asset, given the equilibrium coverage ratio.
///
/// The minted liability keeps the asset's share of the invariant consistent with `equilibrium_ratio`,
/// so it differs from `amount` whenever the asset is away from equilibrium. An asset without
/// liability mints one to one.
pub fn calculate_deposit_liability(
	amount: Balance,
	reserve: AssetReserve,
	amplification: Balance,
	equilibrium_ratio: Balance,
) -> Result<Balance, MathError> {
	if reserve.liability == 0 {
		return Ok(amount);
	}

	let amp = SignedWad::from(amplification);
	let cash = SignedWad::from(reserve.cash);
	let liability = SignedWad::from(reserve.liability);
	let equilibrium = SignedWad::from(equilibrium_ratio);

	let ratio = cash.wdiv(liability)?;
	let k = SignedWad::from(amount).checked_add(cash)?;
	let amp_liability = amp.wmul(liability)?;

	let b = k
		.wmul(equilibrium.checked_sub(amp.wdiv(equilibrium)?)?)?
		.checked_add(amp_liability.checked_mul(two())?)?;
	let c = k
		.wmul(cash.checked_sub(amp.checked_mul(liability)?.checked_div(ratio)?)?)?
		.checked_sub(k.wmul(k)?)?
		.checked_add(amp_liability.wmul(liability)?)?;

	let discriminant = b
		.checked_mul(b)?
		.checked_sub(amp.checked_mul(c)?.checked_mul(SignedWad::positive(4u128))?)?;
	let root = discriminant.sqrt(b)?;

	root.checked_sub(b)?.wdiv(amp)?.checked_div(two())?.to_balance()
}

/// Amount of cash released by burning `liability_to_burn`, before the withdrawal haircut.
pub fn calculate_withdraw_amount(
	liability_to_burn: Balance,
	reserve: AssetReserve,
	amplification: Balance,
	equilibrium_ratio: Balance,
) -> Result<Balance, MathError> {
	let amp = SignedWad::from(amplification);
	let equilibrium = SignedWad::from(equilibrium_ratio);
	let cash = SignedWad::from(reserve.cash);
	let liability = SignedWad::from(reserve.liability);
	let delta = SignedWad::from(liability_to_burn).neg();

	let new_liability = liability.checked_add(delta)?;
	let ratio = cash.wdiv(liability)?;
	let rho = liability.wmul(ratio.checked_sub(amp.wdiv(ratio)?)?)?;
	let beta = rho
		.checked_add(delta.wmul(equilibrium.checked_sub(amp.wdiv(equilibrium)?)?)?)?
		.checked_div(two())?;

	let radicand = beta
		.checked_mul(beta)?
		.checked_add(amp.wmul(new_liability.checked_mul(new_liability)?)?)?;
	let new_cash = beta.checked_add(radicand.sqrt(beta)?)?;

	cash.checked_sub(new_cash)?.to_balance()
}

pub fn calculate_deposit(
	amount: Balance,
	reserve: AssetReserve,
	total_supply: Balance,
	amplification: Balance,
	equilibrium_ratio: Balance,
) -> Result<DepositQuote, MathError> {
	let liability = calculate_deposit_liability(amount, reserve, amplification, equilibrium_ratio)?;
	let shares = if reserve.liability == 0 {
		liability
	} else {
		mul_div_floor(liability, total_supply, reserve.liability).ok_or(Overflow)?
	};
	ensure!(shares != 0, ZeroLiquidity);
	Ok(DepositQuote { liability, shares })
}

pub fn calculate_withdraw(
	shares: Balance,
	total_supply: Balance,
	reserve: AssetReserve,
	amplification: Balance,
	equilibrium_ratio: Balance,
	withdrawal_haircut_rate: Balance,
) -> Result<WithdrawQuote, MathError> {
	ensure!(total_supply != 0, ZeroLiquidity);
	let liability = mul_div_floor(reserve.liability, shares, total_supply).ok_or(Overflow)?;
	ensure!(liability != 0, ZeroLiquidity);

	let amount = calculate_withdraw_amount(liability, reserve, amplification, equilibrium_ratio)?;
	ensure!(amount <= reserve.cash, CashNotEnough);

	let fee = wmul(amount, withdrawal_haircut_rate)?;
	Ok(WithdrawQuote {
		amount: amount.checked_sub(fee).ok_or(Underflow)?,
		liability,
		fee,
	})
}

/// Average of the linear fee ramp over `[initial, final]`, as a WAD fraction.
///
/// Zero when the final ratio does not enter the band or the ratio does not grow.
pub fn calculate_high_coverage_fee_ratio(
	initial_ratio: Balance,
	final_ratio: Balance,
	band: CoverageFeeBand,
) -> Result<Balance, MathError> {
	ensure!(final_ratio <= band.end, CoverageLimitExceeded);
	if final_ratio <= band.start || final_ratio <= initial_ratio {
		return Ok(0);
	}

	let (initial, last, start) = to_u256!(initial_ratio, final_ratio, band.start);
	let square = |v: U256| v.checked_mul(v).ok_or(Overflow);
	let a = if initial <= start {
		U256::zero()
	} else {
		square(initial - start)?
	};
	let b = square(last - start)?;
	let area = (b - a) / (last - initial) / 2;

	wdiv(to_balance!(area)?, band.end - band.start)
}

/// High coverage ratio fee charged on `quoted` when `amount` moves the asset into the fee band.
pub fn calculate_high_coverage_fee(
	reserve: AssetReserve,
	amount: Balance,
	quoted: Balance,
	band: CoverageFeeBand,
) -> Result<Balance, MathError> {
	let final_ratio = wdiv(reserve.cash.checked_add(amount).ok_or(Overflow)?, reserve.liability)?;
	if final_ratio <= band.start {
		return Ok(0);
	}
	let ratio = calculate_high_coverage_fee_ratio(reserve.coverage_ratio()?, final_ratio, band)?;
	ensure!(ratio <= WAD, InvalidFee);
	wmul(ratio, quoted)
}

/// `price(from) / price(to)`, WAD-scaled.
pub fn quote_factor(from: &AssetSnapshot, to: &AssetSnapshot) -> Result<Balance, MathError> {
	ensure!(to.relative_price != 0, DivisionByZero);
	mul_div_floor(from.relative_price, WAD, to.relative_price).ok_or(Overflow)
}

/// Amount of `to` received for paying `amount_in` of `from`.
pub fn calculate_out_given_in(
	from: &AssetSnapshot,
	to: &AssetSnapshot,
	amount_in: Balance,
	params: &SwapParameters,
) -> Result<TradeQuote, MathError> {
	if amount_in == 0 {
		return Ok(TradeQuote::default());
	}
	quote_from(from, to, SignedWad::from(amount_in), params)
}

/// Amount of `from` required to receive `amount_out` of `to`.
///
/// Falls back to a binary search over forward quotes when the input asset would enter the high
/// coverage ratio fee band.
///
/// The input is a whole number of `from` native units, and `calculate_out_given_in` on it pays at
/// least `amount_out`. The fee is the one quoted for `amount_out`.
pub fn calculate_in_given_out(
	from: &AssetSnapshot,
	to: &AssetSnapshot,
	amount_out: Balance,
	params: &SwapParameters,
) -> Result<TradeQuote, MathError> {
	if amount_out == 0 {
		return Ok(TradeQuote::default());
	}
	let quote = quote_from(to, from, SignedWad::from(amount_out).neg(), params)?;
	let amount = cover_amount_out(from, to, quote.amount, amount_out, params)?;
	Ok(TradeQuote { amount, fee: quote.fee })
}

/// Upper bound on doubling steps taken while looking for an input that covers the output.
const MAX_COVER_STEPS: u32 = 128;

/// Smallest whole-unit input at or above `estimate` whose forward quote pays at least
/// `amount_out`.
///
/// The closed-form estimate may fall a few wei short after forward rounding. It is bracketed by
/// doubling steps and then bisected.
fn cover_amount_out(
	from: &AssetSnapshot,
	to: &AssetSnapshot,
	estimate: Balance,
	amount_out: Balance,
	params: &SwapParameters,
) -> Result<Balance, MathError> {
	let unit = to_wad(1, from.decimals)?;
	ensure!(unit != 0, Underflow);

	let covers = |amount: Balance| -> Result<bool, MathError> {
		Ok(quote_from(from, to, SignedWad::from(amount), params)?.amount >= amount_out)
	};

	let mut low = estimate
		.checked_add(unit - 1)
		.ok_or(Overflow)?
		.checked_div(unit)
		.ok_or(DivisionByZero)?
		.checked_mul(unit)
		.ok_or(Overflow)?;
	if covers(low)? {
		return Ok(low);
	}

	let mut step = unit;
	let mut high = None;
	for _ in 0..MAX_COVER_STEPS {
		let candidate = low.checked_add(step).ok_or(Overflow)?;
		if covers(candidate)? {
			high = Some(candidate);
			break;
		}
		low = candidate;
		step = step.checked_mul(2).ok_or(Overflow)?;
	}
	let mut high = high.ok_or(CoverageLimitExceeded)?;

	while high - low > unit {
		let mid = low + (high - low) / unit / 2 * unit;
		if covers(mid)? {
			high = mid;
		} else {
			low = mid;
		}
	}
	Ok(high)
}

fn quote_from(
	from: &AssetSnapshot,
	to: &AssetSnapshot,
	amount: SignedWad,
	params: &SwapParameters,
) -> Result<TradeQuote, MathError> {
	let reverse = amount.is_negative();
	let requested = amount.abs_balance()?;

	let amount = if reverse {
		let keep = WAD.checked_sub(params.haircut_rate).ok_or(InvalidFee)?;
		amount.wdiv(SignedWad::from(keep))?
	} else {
		amount
	};

	let factor = quote_factor(from, to)?;
	let (from_reserve, scaled_amount) = if factor == WAD {
		(from.reserve, amount)
	} else {
		let scaled = amount
			.checked_mul(SignedWad::from(factor))?
			.checked_div(SignedWad::wad())?;
		(from.reserve.scaled(factor).ok_or(Overflow)?, scaled)
	};

	if reverse {
		ensure!(from.cash() >= amount.abs_balance()?, CashNotEnough);
	}

	let ideal = swap_quote(from_reserve, to.reserve, scaled_amount, params.amplification)?;

	let (actual, haircut) = if reverse {
		(ideal, wmul(amount.abs_balance()?, params.haircut_rate)?)
	} else {
		ensure!(to.cash() >= ideal, CashNotEnough);
		let haircut = wmul(ideal, params.haircut_rate)?;
		(ideal - haircut, haircut)
	};

	let Some(band) = params.fee_band else {
		return Ok(TradeQuote {
			amount: actual,
			fee: haircut,
		});
	};

	if !reverse {
		let fee = calculate_high_coverage_fee(from.reserve, requested, actual, band)?;
		return Ok(TradeQuote {
			amount: actual.checked_sub(fee).ok_or(Underflow)?,
			fee: haircut.checked_add(fee).ok_or(Overflow)?,
		});
	}

	// `to` is the asset paid in here; `actual` is the input amount.
	let final_ratio = wdiv(to.cash().checked_add(actual).ok_or(Overflow)?, to.liability())?;
	if final_ratio <= band.start {
		return Ok(TradeQuote {
			amount: actual,
			fee: haircut,
		});
	}
	ensure!(to.reserve.coverage_ratio()? < band.end, CoverageLimitExceeded);

	let amount_in = find_upper_bound(to, from, requested, band, params)?;
	let forward = quote_from(to, from, SignedWad::from(amount_in), params)?;
	Ok(TradeQuote {
		amount: amount_in,
		fee: forward.fee,
	})
}

/// Smallest input, in whole units of the input asset's decimals, whose forward quote pays at
/// least `amount_out`. The search is bounded by the input asset reaching the end of the band.
fn find_upper_bound(
	from: &AssetSnapshot,
	to: &AssetSnapshot,
	amount_out: Balance,
	band: CoverageFeeBand,
	params: &SwapParameters,
) -> Result<Balance, MathError> {
	let unit = to_wad(1, from.decimals)?;
	ensure!(unit != 0, Underflow);

	let headroom = wmul(from.liability(), band.end)?
		.checked_sub(from.cash())
		.ok_or(CoverageLimitExceeded)?;
	let mut high = from_wad(headroom, from.decimals)?;
	let mut low: Balance = 1;
	ensure!(high >= low, CoverageLimitExceeded);

	let quote_at = |units: Balance| -> Result<Balance, MathError> {
		let amount = units.checked_mul(unit).ok_or(Overflow)?;
		Ok(quote_from(from, to, SignedWad::from(amount), params)?.amount)
	};

	ensure!(quote_at(high)? >= amount_out, CoverageLimitExceeded);

	while low < high {
		let mid = low + (high - low) / 2;
		if quote_at(mid)? >= amount_out {
			high = mid;
		} else {
			low = mid + 1;
		}
	}

	high.checked_mul(unit).ok_or(Overflow)
}

/// Burn shares of `from` and receive `to` in one step: a withdrawal quote followed by a swap quote
/// on the post-withdrawal state of `from`.
#[allow(clippy::too_many_arguments)]
pub fn calculate_withdraw_from_other_asset(
	shares: Balance,
	total_supply: Balance,
	from: &AssetSnapshot,
	to: &AssetSnapshot,
	params: &SwapParameters,
	equilibrium_ratio: Balance,
	withdrawal_haircut_rate: Balance,
) -> Result<WithdrawFromOtherQuote, MathError> {
	let withdraw = calculate_withdraw(
		shares,
		total_supply,
		from.reserve,
		params.amplification,
		equilibrium_ratio,
		withdrawal_haircut_rate,
	)?;

	let gross = withdraw.amount.checked_add(withdraw.fee).ok_or(Overflow)?;
	let remaining = AssetReserve::new(
		from.cash().checked_sub(gross).ok_or(Underflow)?,
		from.liability().checked_sub(withdraw.liability).ok_or(Underflow)?,
	);

	let factor = quote_factor(from, to)?;
	let scaled_reserve = remaining.scaled(factor).ok_or(Overflow)?;
	let scaled_amount = mul_div_floor(withdraw.amount, factor, WAD).ok_or(Overflow)?;

	let ideal = swap_quote(
		scaled_reserve,
		to.reserve,
		SignedWad::from(scaled_amount),
		params.amplification,
	)?;
	ensure!(to.cash() >= ideal, CashNotEnough);

	let haircut = wmul(ideal, params.haircut_rate)?;
	let mut amount = ideal - haircut;
	let mut fee = haircut;

	if let Some(band) = params.fee_band {
		let coverage_fee = calculate_high_coverage_fee(scaled_reserve, scaled_amount, amount, band)?;
		amount = amount.checked_sub(coverage_fee).ok_or(Underflow)?;
		fee = fee.checked_add(coverage_fee).ok_or(Overflow)?;
	}

	Ok(WithdrawFromOtherQuote { amount, withdraw, fee })
}
