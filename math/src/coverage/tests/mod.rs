mod invariants;

use crate::coverage::types::{AssetSnapshot, CoverageFeeBand, SwapParameters};
use crate::types::{Balance, WAD};

/// 0.003
pub(crate) const AMP: Balance = 3_000_000_000_000_000;
/// 0.05%
pub(crate) const HAIRCUT: Balance = 500_000_000_000_000;

pub(crate) const fn units(v: Balance) -> Balance {
	v * WAD
}

pub(crate) fn balanced(amount: Balance) -> AssetSnapshot {
	AssetSnapshot::new(units(amount), units(amount))
}

pub(crate) fn params() -> SwapParameters {
	SwapParameters {
		amplification: AMP,
		haircut_rate: HAIRCUT,
		fee_band: None,
	}
}

/// Fee band from 1.5 to 1.8.
pub(crate) fn params_with_band() -> SwapParameters {
	SwapParameters {
		fee_band: Some(CoverageFeeBand::new(1_500_000_000_000_000_000, 1_800_000_000_000_000_000)),
		..params()
	}
}
