// Copyright (C) 2020-2022  Intergalactic, Limited (GIB).
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::asset::Asset;
use crate::credit::CreditLedger;
use crate::Error;
use codec::{Decode, Encode, MaxEncodedLen};
use coverage_math::coverage::types::{CoverageFeeBand, SwapParameters};
use coverage_math::ensure;
use coverage_math::types::WAD;
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_std::collections::btree_map::BTreeMap;

pub use coverage_math::types::Balance;

/// Version of the persisted `PoolState` layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, TypeInfo, MaxEncodedLen)]
pub struct StorageVersion(pub u16);

impl StorageVersion {
	pub const fn new(version: u16) -> Self {
		Self(version)
	}
}

pub const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

bitflags::bitflags! {
	/// Indicates whether asset can be bought or sold to/from the pool and/or liquidity added/removed.
	#[derive(Encode, Decode, MaxEncodedLen, TypeInfo)]
	pub struct Tradability: u8 {
		/// Asset is frozen. No operations are allowed.
		const FROZEN = 0b0000_0000;
		/// Asset is allowed to be sold into the pool
		const SELL = 0b0000_0001;
		/// Asset is allowed to be bought from the pool
		const BUY = 0b0000_0010;
		/// Adding liquidity of asset is allowed
		const ADD_LIQUIDITY = 0b0000_0100;
		/// Removing liquidity of asset is allowed
		const REMOVE_LIQUIDITY = 0b0000_1000;
	}
}

impl Default for Tradability {
	fn default() -> Self {
		Tradability::SELL | Tradability::BUY | Tradability::ADD_LIQUIDITY | Tradability::REMOVE_LIQUIDITY
	}
}

/// Pool-wide parameters. All ratios are WAD fractions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode, TypeInfo, MaxEncodedLen, Serialize, Deserialize)]
pub struct PoolParams {
	/// Amplification factor `A`, `0 < A < 1`.
	pub amplification: Balance,
	/// Swap fee taken from the output.
	pub haircut_rate: Balance,
	/// Band in which swaps into an asset pay the high coverage ratio fee. No fee when `None`.
	pub fee_band: Option<CoverageFeeBand>,
	/// Fee taken from withdrawals.
	pub withdrawal_haircut_rate: Balance,
	/// Share of collected fees deposited back for liquidity providers.
	pub lp_dividend_ratio: Balance,
	/// Share of collected fees left in the pool as surplus.
	pub retention_ratio: Balance,
	/// Collected fees of an asset are minted before deposits and withdrawals once they reach this.
	pub mint_fee_threshold: Balance,
	/// Quote deposits and withdrawals against the pool's equilibrium coverage ratio instead of 1.
	pub global_equilibrium: bool,
}

impl PoolParams {
	pub fn validate(&self) -> Result<(), Error> {
		ensure!(
			self.amplification > 0 && self.amplification < WAD,
			Error::InvalidParameter
		);
		ensure!(self.haircut_rate < WAD, Error::InvalidParameter);
		ensure!(self.withdrawal_haircut_rate <= WAD, Error::InvalidParameter);
		ensure!(
			self.lp_dividend_ratio
				.checked_add(self.retention_ratio)
				.map_or(false, |sum| sum <= WAD),
			Error::InvalidParameter
		);
		if let Some(band) = self.fee_band {
			ensure!(band.is_valid(), Error::InvalidParameter);
		}
		Ok(())
	}

	pub fn swap_parameters(&self) -> SwapParameters {
		SwapParameters {
			amplification: self.amplification,
			haircut_rate: self.haircut_rate,
			fee_band: self.fee_band,
		}
	}
}

/// Parameters of the credit settlement extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode, TypeInfo, MaxEncodedLen, Serialize, Deserialize)]
pub struct CreditParams {
	/// Haircut taken from the input when swapping tokens into credit.
	pub tokens_for_credit_haircut: Balance,
	/// Haircut taken from the output when swapping credit into tokens.
	pub credit_for_tokens_haircut: Balance,
	/// Bound on `total_minted - total_burned`.
	pub maximum_outbound_credit: Balance,
	/// Bound on `total_burned - total_minted`.
	pub maximum_inbound_credit: Balance,
	pub swap_tokens_for_credit_enabled: bool,
	pub swap_credit_for_tokens_enabled: bool,
}

impl CreditParams {
	pub fn validate(&self) -> Result<(), Error> {
		ensure!(self.tokens_for_credit_haircut <= WAD, Error::InvalidParameter);
		ensure!(self.credit_for_tokens_haircut <= WAD, Error::InvalidParameter);
		Ok(())
	}
}

/// Everything a pool persists.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct PoolState<AccountId: Ord, AssetId: Ord> {
	pub params: PoolParams,
	pub assets: BTreeMap<AssetId, Asset>,
	/// LP share balances, WAD-scaled.
	pub shares: BTreeMap<(AssetId, AccountId), Balance>,
	/// Receiver of the fee dividend.
	pub fee_to: Option<AccountId>,
	/// Account allowed to complete cross-chain swaps and mint credit.
	pub adaptor: Option<AccountId>,
	pub credit: Option<CreditLedger<AccountId>>,
	pub paused: bool,
}

impl<AccountId: Ord, AssetId: Ord> PoolState<AccountId, AssetId> {
	pub fn new(params: PoolParams) -> Self {
		Self {
			params,
			assets: BTreeMap::new(),
			shares: BTreeMap::new(),
			fee_to: None,
			adaptor: None,
			credit: None,
			paused: false,
		}
	}
}
