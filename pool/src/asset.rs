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

//! Asset ledger.
//!
//! Cash, liability, share supply and collected fees of a pool asset change only through the methods
//! below. Every change is checked; a failing change leaves the entry untouched.

use crate::price::PriceSource;
use crate::types::{Balance, Tradability};
use crate::Error;
use codec::{Decode, Encode, MaxEncodedLen};
use coverage_math::coverage::types::{AssetReserve, AssetSnapshot};
use coverage_math::ensure;
use coverage_math::types::WAD;
use coverage_math::wad::wdiv;
use scale_info::TypeInfo;

/// Withdrawals may not leave an asset below this coverage ratio.
pub const MIN_COVERAGE_RATIO: Balance = WAD / 100;

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, TypeInfo, MaxEncodedLen)]
pub struct Asset {
	cash: Balance,
	liability: Balance,
	total_supply: Balance,
	fee_collected: Balance,
	/// Decimals of the underlying token, at most 18.
	pub decimals: u8,
	pub price_source: PriceSource,
	pub tradability: Tradability,
}

impl Asset {
	pub fn new(decimals: u8, price_source: PriceSource) -> Self {
		Self {
			cash: 0,
			liability: 0,
			total_supply: 0,
			fee_collected: 0,
			decimals,
			price_source,
			tradability: Tradability::default(),
		}
	}

	pub(crate) fn from_parts(
		cash: Balance,
		liability: Balance,
		total_supply: Balance,
		fee_collected: Balance,
		decimals: u8,
	) -> Self {
		Self {
			cash,
			liability,
			total_supply,
			fee_collected,
			..Self::new(decimals, PriceSource::FixedPeg)
		}
	}

	pub fn cash(&self) -> Balance {
		self.cash
	}

	pub fn liability(&self) -> Balance {
		self.liability
	}

	/// Outstanding LP shares, WAD-scaled.
	pub fn total_supply(&self) -> Balance {
		self.total_supply
	}

	/// Fees held by the pool but not counted in cash, WAD-scaled.
	pub fn fee_collected(&self) -> Balance {
		self.fee_collected
	}

	pub fn reserve(&self) -> AssetReserve {
		AssetReserve::new(self.cash, self.liability)
	}

	pub fn snapshot(&self, relative_price: Balance) -> AssetSnapshot {
		AssetSnapshot {
			reserve: self.reserve(),
			decimals: self.decimals,
			relative_price,
		}
	}

	/// `cash / liability`, `None` while the asset has no liability.
	pub fn coverage_ratio(&self) -> Option<Balance> {
		if self.liability == 0 {
			return None;
		}
		wdiv(self.cash, self.liability).ok()
	}

	pub fn is_allowed(&self, operation: Tradability) -> bool {
		self.tradability.contains(operation)
	}

	pub fn add_cash(&mut self, amount: Balance) -> Result<(), Error> {
		self.cash = self.cash.checked_add(amount).ok_or(Error::Overflow)?;
		Ok(())
	}

	pub fn remove_cash(&mut self, amount: Balance) -> Result<(), Error> {
		self.cash = self.cash.checked_sub(amount).ok_or(Error::Underflow)?;
		Ok(())
	}

	pub fn add_liability(&mut self, amount: Balance) -> Result<(), Error> {
		self.liability = self.liability.checked_add(amount).ok_or(Error::Overflow)?;
		Ok(())
	}

	pub fn remove_liability(&mut self, amount: Balance) -> Result<(), Error> {
		self.liability = self.liability.checked_sub(amount).ok_or(Error::Underflow)?;
		Ok(())
	}

	pub fn mint_shares(&mut self, amount: Balance) -> Result<(), Error> {
		self.total_supply = self.total_supply.checked_add(amount).ok_or(Error::Overflow)?;
		Ok(())
	}

	pub fn burn_shares(&mut self, amount: Balance) -> Result<(), Error> {
		self.total_supply = self.total_supply.checked_sub(amount).ok_or(Error::Underflow)?;
		Ok(())
	}

	pub fn collect_fee(&mut self, amount: Balance) -> Result<(), Error> {
		self.fee_collected = self.fee_collected.checked_add(amount).ok_or(Error::Overflow)?;
		Ok(())
	}

	/// Reset collected fees, returning what was collected.
	pub fn take_fee(&mut self) -> Balance {
		core::mem::take(&mut self.fee_collected)
	}

	pub fn ensure_minimum_coverage(&self) -> Result<(), Error> {
		if let Some(ratio) = self.coverage_ratio() {
			ensure!(ratio >= MIN_COVERAGE_RATIO, Error::CoverageRatioTooLow);
		}
		Ok(())
	}
}
