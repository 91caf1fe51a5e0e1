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

/// Notifications sent by the pool once a request has been applied.
///
/// Hooks are infallible. They run after the ledger has been updated and cannot abort the request.
pub trait PoolHooks<AssetId> {
	/// Tokens were swapped. Amounts are in native decimals of the respective asset.
	fn on_trade(asset_in: AssetId, asset_out: AssetId, amount_in: Balance, amount_out: Balance);

	/// Cash or liability of `asset` changed outside of a swap. Values are WAD-scaled.
	fn on_liquidity_changed(asset: AssetId, cash: Balance, liability: Balance);
}

#[impl_trait_for_tuples::impl_for_tuples(5)]
impl<AssetId: Copy> PoolHooks<AssetId> for Tuple {
	fn on_trade(asset_in: AssetId, asset_out: AssetId, amount_in: Balance, amount_out: Balance) {
		for_tuples!( #( Tuple::on_trade(asset_in, asset_out, amount_in, amount_out); )* );
	}

	fn on_liquidity_changed(asset: AssetId, cash: Balance, liability: Balance) {
		for_tuples!( #( Tuple::on_liquidity_changed(asset, cash, liability); )* );
	}
}
