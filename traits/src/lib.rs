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

#![cfg_attr(not(feature = "std"), no_std)]

pub mod bridge;
pub mod evm;
pub mod hooks;
pub mod price;

pub use bridge::*;
pub use evm::*;
pub use hooks::*;
pub use price::*;

pub type Balance = u128;

/// Moves underlying tokens between accounts and the pool.
///
/// Amounts are in the token's native decimals. Implementations must move exactly the requested
/// amount or fail; tokens which charge a transfer fee are not supported.
pub trait TokenTransfer<AccountId, AssetId> {
	type Error: core::fmt::Debug;

	/// Pull `amount` of `asset` from `from` into the pool.
	fn transfer_in(asset: AssetId, from: &AccountId, amount: Balance) -> Result<(), Self::Error>;

	/// Pay `amount` of `asset` from the pool to `to`.
	fn transfer_out(asset: AssetId, to: &AccountId, amount: Balance) -> Result<(), Self::Error>;
}

/// Source of the current time, in seconds.
pub trait TimeProvider {
	fn now() -> u64;
}
