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

use crate::{Balance, EvmAddress};
use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

/// Chain identifier as used by the cross-chain transport.
pub type ChainId = u16;

/// Sequence number correlating the debit leg of a cross-chain swap with its credit leg.
pub type TrackingId = u64;

/// Credit leaving this chain to be swapped for `to_token` on `to_chain`.
#[derive(Encode, Decode, Clone, Copy, Debug, Eq, PartialEq, TypeInfo, MaxEncodedLen)]
pub struct CreditTransfer {
	pub to_chain: ChainId,
	pub to_token: EvmAddress,
	/// Credit amount, WAD-scaled.
	pub credit: Balance,
	/// Minimum amount of `to_token` the receiver accepts, in its native decimals.
	pub minimum_amount: Balance,
	pub receiver: EvmAddress,
}

/// Outbound side of the cross-chain transport.
///
/// Delivery on the destination chain is at-least-once and may be reordered. De-duplication of
/// delivered messages is the transport's responsibility.
pub trait CrossChainAdaptor {
	type Error: core::fmt::Debug;

	/// Hand the transfer to the transport. Returns the tracking id assigned to the message.
	fn bridge_credit_and_swap_for_tokens(transfer: &CreditTransfer) -> Result<TrackingId, Self::Error>;
}

/// Transport which refuses every transfer. Use for pools without cross-chain support.
pub struct NoBridge;

impl CrossChainAdaptor for NoBridge {
	type Error = ();

	fn bridge_credit_and_swap_for_tokens(_transfer: &CreditTransfer) -> Result<TrackingId, Self::Error> {
		Err(())
	}
}
