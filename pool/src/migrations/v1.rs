use super::decode_exact;
use crate::asset::Asset;
use crate::types::{Balance, PoolParams, PoolState};
use crate::{Config, Error, PoolStateOf, LOG_TARGET};
use codec::{Decode, Encode};
use coverage_math::coverage::types::CoverageFeeBand;
use sp_std::collections::btree_map::BTreeMap;

pub(crate) mod v0 {
	use super::*;

	#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode)]
	pub struct PoolParams {
		pub amplification: Balance,
		pub haircut_rate: Balance,
		pub fee_band: Option<CoverageFeeBand>,
		pub lp_dividend_ratio: Balance,
		pub retention_ratio: Balance,
		pub mint_fee_threshold: Balance,
	}

	#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
	pub struct Asset {
		pub cash: Balance,
		pub liability: Balance,
		pub total_supply: Balance,
		pub fee_collected: Balance,
		pub decimals: u8,
	}

	#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
	pub struct PoolState<AccountId: Ord, AssetId: Ord> {
		pub params: PoolParams,
		pub assets: BTreeMap<AssetId, Asset>,
		pub shares: BTreeMap<(AssetId, AccountId), Balance>,
		pub fee_to: Option<AccountId>,
		pub paused: bool,
	}
}

/// Decode a v0 pool state and lift it to v1.
///
/// v0 pools had no withdrawal haircut, no global equilibrium, no credit ledger and no adaptor. All
/// assets were pegged and fully tradable.
pub fn migrate<T: Config>(bytes: &[u8]) -> Result<PoolStateOf<T>, Error> {
	log::info!(target: LOG_TARGET, "v0->v1 migration started");

	let old: v0::PoolState<T::AccountId, T::AssetId> = decode_exact(bytes)?;

	let params = PoolParams {
		amplification: old.params.amplification,
		haircut_rate: old.params.haircut_rate,
		fee_band: old.params.fee_band,
		withdrawal_haircut_rate: 0,
		lp_dividend_ratio: old.params.lp_dividend_ratio,
		retention_ratio: old.params.retention_ratio,
		mint_fee_threshold: old.params.mint_fee_threshold,
		global_equilibrium: false,
	};
	if let Err(e) = params.validate() {
		log::error!(target: LOG_TARGET, "invalid v0 parameters {:?}: {:?}", old.params, e);
		return Err(Error::CorruptedState);
	}

	let assets = old
		.assets
		.into_iter()
		.map(|(id, a)| {
			(
				id,
				Asset::from_parts(a.cash, a.liability, a.total_supply, a.fee_collected, a.decimals),
			)
		})
		.collect::<BTreeMap<_, _>>();

	log::info!(target: LOG_TARGET, "migration finished, migrated: {:?} assets", assets.len());

	Ok(PoolState {
		params,
		assets,
		shares: old.shares,
		fee_to: old.fee_to,
		adaptor: None,
		credit: None,
		paused: old.paused,
	})
}
