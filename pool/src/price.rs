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

use crate::types::Balance;
use crate::{Config, Error};
use codec::{Decode, Encode, MaxEncodedLen};
use coverage_math::types::WAD;
use coverage_math::wad::{mul_div_floor, pow, wmul};
use coverage_traits::{RelativePriceProvider, TimeProvider};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

/// Where the relative price of an asset comes from.
///
/// The solver only sees the resolved WAD price. Cash, liability and traded amounts are scaled by it
/// together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Encode, Decode, TypeInfo, MaxEncodedLen, Serialize, Deserialize)]
pub enum PriceSource {
	/// Pegged to the numeraire, price is always 1.
	#[default]
	FixedPeg,
	/// Price supplied by the `RelativePriceProvider` of the pool.
	OracleFed,
	/// Exchange rate of a staking derivative, compounded continuously from an anchor.
	StakeDerivedRate {
		/// Rate at `anchored_at`, WAD-scaled.
		anchor: Balance,
		/// Yearly growth of the rate, WAD fraction.
		annual_rate: Balance,
		/// Timestamp of the anchor, in seconds.
		anchored_at: u64,
	},
}

impl PriceSource {
	pub fn is_valid(&self) -> bool {
		match self {
			PriceSource::StakeDerivedRate { anchor, .. } => *anchor != 0,
			_ => true,
		}
	}

	/// Current price relative to the pool numeraire, WAD-scaled.
	pub fn relative_price<T: Config>(&self, asset: T::AssetId) -> Result<Balance, Error> {
		match *self {
			PriceSource::FixedPeg => Ok(WAD),
			PriceSource::OracleFed => T::PriceProvider::relative_price(asset)
				.filter(|price| *price != 0)
				.ok_or(Error::PriceUnavailable),
			PriceSource::StakeDerivedRate {
				anchor,
				annual_rate,
				anchored_at,
			} => {
				let elapsed = T::TimeProvider::now().saturating_sub(anchored_at);
				stake_derived_rate(anchor, annual_rate, elapsed)
			}
		}
	}
}

/// `anchor * (1 + annual_rate) ^ (elapsed / year)`.
pub fn stake_derived_rate(anchor: Balance, annual_rate: Balance, elapsed: u64) -> Result<Balance, Error> {
	let exponent =
		mul_div_floor(elapsed as Balance, WAD, SECONDS_PER_YEAR as Balance).ok_or(Error::Overflow)?;
	let base = WAD.checked_add(annual_rate).ok_or(Error::Overflow)?;
	let growth = pow(base, exponent)?;
	Ok(wmul(anchor, growth)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rate_should_equal_anchor_at_anchor_time() {
		assert_eq!(stake_derived_rate(WAD, WAD / 20, 0), Ok(WAD));
	}

	#[test]
	fn rate_should_compound_over_a_year() {
		assert_eq!(
			stake_derived_rate(2 * WAD, WAD / 20, SECONDS_PER_YEAR),
			Ok(2_100_000_000_000_000_000)
		);
	}

	#[test]
	fn rate_should_grow_fractionally_within_a_year() {
		let rate = stake_derived_rate(WAD, WAD / 20, SECONDS_PER_YEAR / 2).unwrap();
		// sqrt(1.05)
		let expected: Balance = 1_024_695_076_595_959_838;
		assert!(rate.abs_diff(expected) < 10_000_000, "rate {rate} expected {expected}");
	}

	#[test]
	fn zero_anchor_should_be_invalid() {
		let source = PriceSource::StakeDerivedRate {
			anchor: 0,
			annual_rate: 0,
			anchored_at: 0,
		};
		assert!(!source.is_valid());
		assert!(PriceSource::OracleFed.is_valid());
	}
}
