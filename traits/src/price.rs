// This file is part of coverage-traits.

// Copyright (C) 2020-2022  Intergalactic, Limited (GIB).
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Balance;

/// Implementers of this trait provide the price of an asset relative to the pool numeraire.
///
/// The price is WAD-scaled, so an asset worth twice the numeraire returns `2 * 10^18`.
/// Staleness and fallback policy belong to the implementer; the value returned is trusted as is.
///
/// Should return `None` if no price is available.
pub trait RelativePriceProvider<AssetId> {
	fn relative_price(asset: AssetId) -> Option<Balance>;
}

impl<AssetId> RelativePriceProvider<AssetId> for () {
	fn relative_price(_asset: AssetId) -> Option<Balance> {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unit_provider_should_have_no_price() {
		assert_eq!(<() as RelativePriceProvider<u32>>::relative_price(1), None);
	}
}
