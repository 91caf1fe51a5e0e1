use crate::types::{Balance, SignedWad, WAD, WAD_DECIMALS};
use crate::wad::{mul_div_floor, wdiv};
use crate::MathError;
use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Coverage ratio band in which swaps into an asset pay the high coverage ratio fee.
///
/// The marginal fee ramps linearly from 0% at `start` to 100% at `end`. A swap that would leave
/// the asset above `end` is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode, TypeInfo, MaxEncodedLen, Serialize, Deserialize)]
pub struct CoverageFeeBand {
	pub start: Balance,
	pub end: Balance,
}

impl CoverageFeeBand {
	pub const fn new(start: Balance, end: Balance) -> Self {
		Self { start, end }
	}

	pub fn is_valid(&self) -> bool {
		self.start >= WAD && self.start < self.end
	}
}

/// Cash and liability of a single asset, both WAD-scaled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssetReserve {
	pub cash: Balance,
	pub liability: Balance,
}

impl AssetReserve {
	pub const fn new(cash: Balance, liability: Balance) -> Self {
		Self { cash, liability }
	}

	/// `cash / liability`. Fails when the asset has no liability.
	pub fn coverage_ratio(&self) -> Result<Balance, MathError> {
		wdiv(self.cash, self.liability)
	}

	/// Scale cash and liability together by a WAD-scaled factor.
	pub fn scaled(&self, factor: Balance) -> Option<Self> {
		if factor == WAD {
			return Some(*self);
		}
		Some(Self {
			cash: mul_div_floor(self.cash, factor, WAD)?,
			liability: mul_div_floor(self.liability, factor, WAD)?,
		})
	}
}

/// What the solver needs to know about a pool asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetSnapshot {
	pub reserve: AssetReserve,
	/// Decimals of the underlying token. Reverse quotes search in these units.
	pub decimals: u8,
	/// Price relative to the pool numeraire, WAD-scaled. `WAD` for pegged assets.
	pub relative_price: Balance,
}

impl AssetSnapshot {
	pub const fn new(cash: Balance, liability: Balance) -> Self {
		Self {
			reserve: AssetReserve::new(cash, liability),
			decimals: WAD_DECIMALS,
			relative_price: WAD,
		}
	}

	pub const fn with_decimals(mut self, decimals: u8) -> Self {
		self.decimals = decimals;
		self
	}

	pub const fn with_price(mut self, relative_price: Balance) -> Self {
		self.relative_price = relative_price;
		self
	}

	pub fn cash(&self) -> Balance {
		self.reserve.cash
	}

	pub fn liability(&self) -> Balance {
		self.reserve.liability
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapParameters {
	pub amplification: Balance,
	pub haircut_rate: Balance,
	pub fee_band: Option<CoverageFeeBand>,
}

/// Result of a swap quote.
///
/// For forward quotes `amount` is what the user receives and `fee` the haircut plus high coverage
/// ratio fee, both in units of the output asset. For reverse quotes `amount` is the required input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TradeQuote {
	pub amount: Balance,
	pub fee: Balance,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositQuote {
	pub liability: Balance,
	pub shares: Balance,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawQuote {
	/// Amount paid out, withdrawal haircut already deducted.
	pub amount: Balance,
	pub liability: Balance,
	pub fee: Balance,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawFromOtherQuote {
	/// Amount of the other asset paid out.
	pub amount: Balance,
	/// Withdrawal leg, in units of the asset whose shares are burned.
	pub withdraw: WithdrawQuote,
	/// Haircut and high coverage ratio fee on the swap leg.
	pub fee: Balance,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CreditQuote {
	pub credit: Balance,
	/// Fee in units of the asset swapped into credit.
	pub fee: Balance,
}

/// Pool-wide invariant and the equilibrium coverage ratio it implies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Equilibrium {
	pub invariant: SignedWad,
	pub total_liability: Balance,
	pub coverage_ratio: Balance,
}
