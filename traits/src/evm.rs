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

use primitive_types::H160;

pub type EvmAddress = H160;

/// Maps local accounts to the 20-byte addresses carried in cross-chain payloads and back.
pub trait AddressMapping<AccountId> {
	/// Get the EVM address of a local account.
	fn evm_address(account: &AccountId) -> EvmAddress;

	/// Get the local account controlled by an EVM address.
	fn account_id(address: EvmAddress) -> AccountId;
}

/// Maps pool assets to token addresses on remote chains.
///
/// Should return `None` for assets or addresses the pool does not know about.
pub trait AssetAddressMapping<AssetId> {
	fn asset_address(asset: AssetId) -> Option<EvmAddress>;

	fn asset_id(address: EvmAddress) -> Option<AssetId>;
}
