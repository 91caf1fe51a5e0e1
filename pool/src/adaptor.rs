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

//! Receiving side of the cross-chain transport.
//!
//! Messages carry a fixed 128 byte payload of four 32 byte words: token address, credit amount,
//! minimum token amount and receiver address. Addresses are right aligned, integers big endian.

use crate::types::Balance;
use crate::{Config, Error, Pool, LOG_TARGET};
use coverage_math::ensure;
use coverage_traits::{AddressMapping, AssetAddressMapping, ChainId, CreditTransfer, EvmAddress, TrackingId};
use primitive_types::U256;
use sp_std::collections::btree_set::BTreeSet;

pub const PAYLOAD_LENGTH: usize = 128;
const WORD: usize = 32;
const ADDRESS_OFFSET: usize = WORD - 20;

/// Decoded cross-chain payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreditMessage {
	pub to_token: EvmAddress,
	/// Credit amount, WAD-scaled.
	pub credit: Balance,
	/// Minimum amount of `to_token` in its native decimals.
	pub minimum_amount: Balance,
	pub receiver: EvmAddress,
}

impl From<&CreditTransfer> for CreditMessage {
	fn from(transfer: &CreditTransfer) -> Self {
		Self {
			to_token: transfer.to_token,
			credit: transfer.credit,
			minimum_amount: transfer.minimum_amount,
			receiver: transfer.receiver,
		}
	}
}

pub fn encode_payload(message: &CreditMessage) -> [u8; PAYLOAD_LENGTH] {
	let mut payload = [0u8; PAYLOAD_LENGTH];
	payload[ADDRESS_OFFSET..WORD].copy_from_slice(message.to_token.as_bytes());
	U256::from(message.credit).to_big_endian(&mut payload[WORD..2 * WORD]);
	U256::from(message.minimum_amount).to_big_endian(&mut payload[2 * WORD..3 * WORD]);
	payload[3 * WORD + ADDRESS_OFFSET..].copy_from_slice(message.receiver.as_bytes());
	payload
}

/// Decode a payload. Zero token, zero receiver and zero credit are rejected.
pub fn decode_payload(payload: &[u8]) -> Result<CreditMessage, Error> {
	ensure!(payload.len() == PAYLOAD_LENGTH, Error::MalformedPayload);

	let to_token = decode_address(&payload[..WORD])?;
	let credit = decode_amount(&payload[WORD..2 * WORD])?;
	let minimum_amount = decode_amount(&payload[2 * WORD..3 * WORD])?;
	let receiver = decode_address(&payload[3 * WORD..])?;

	ensure!(!to_token.is_zero(), Error::MalformedPayload);
	ensure!(!receiver.is_zero(), Error::MalformedPayload);
	ensure!(credit != 0, Error::MalformedPayload);

	Ok(CreditMessage {
		to_token,
		credit,
		minimum_amount,
		receiver,
	})
}

fn decode_address(word: &[u8]) -> Result<EvmAddress, Error> {
	ensure!(
		word[..ADDRESS_OFFSET].iter().all(|b| *b == 0),
		Error::MalformedPayload
	);
	Ok(EvmAddress::from_slice(&word[ADDRESS_OFFSET..]))
}

fn decode_amount(word: &[u8]) -> Result<Balance, Error> {
	let value = U256::from_big_endian(word);
	Balance::try_from(value).map_err(|_| Error::MalformedPayload)
}

/// Outcome of a delivered message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery<AssetId> {
	/// Credit was swapped into tokens and paid to the receiver. Amounts in native decimals.
	Completed {
		asset: AssetId,
		amount: Balance,
		fee: Balance,
	},
	/// The swap failed with `reason`; the credit was minted to the receiver instead.
	CreditMinted { credit: Balance, reason: Error },
}

/// Delivers cross-chain messages to a pool on behalf of the transport.
///
/// The adaptor account must be set as the pool's adaptor. Messages are only accepted from trusted
/// `(chain, contract)` pairs. De-duplication of messages is left to the transport.
pub struct CreditAdaptor<T: Config> {
	account: T::AccountId,
	trusted: BTreeSet<(ChainId, EvmAddress)>,
}

impl<T: Config> CreditAdaptor<T> {
	pub fn new(account: T::AccountId) -> Self {
		Self {
			account,
			trusted: BTreeSet::new(),
		}
	}

	pub fn account(&self) -> &T::AccountId {
		&self.account
	}

	pub fn approve_contract(&mut self, chain: ChainId, contract: EvmAddress) {
		log::info!(target: LOG_TARGET, "trusted contract {:?} on chain {:?} added", contract, chain);
		self.trusted.insert((chain, contract));
	}

	pub fn revoke_contract(&mut self, chain: ChainId, contract: EvmAddress) {
		log::info!(target: LOG_TARGET, "trusted contract {:?} on chain {:?} removed", contract, chain);
		self.trusted.remove(&(chain, contract));
	}

	pub fn is_trusted(&self, chain: ChainId, contract: EvmAddress) -> bool {
		self.trusted.contains(&(chain, contract))
	}

	/// Handle a message delivered by the transport.
	///
	/// Tries to swap the credit into the requested token. Any failure of that swap falls back to
	/// minting the credit to the receiver. Errors are returned only when the message is rejected or
	/// the fallback itself fails.
	pub fn deliver(
		&self,
		pool: &mut Pool<T>,
		source_chain: ChainId,
		source_contract: EvmAddress,
		payload: &[u8],
		tracking_id: TrackingId,
	) -> Result<Delivery<T::AssetId>, Error> {
		ensure!(self.is_trusted(source_chain, source_contract), Error::Unauthorized);
		let message = decode_payload(payload)?;
		let receiver = T::AddressMapping::account_id(message.receiver);

		let completed = T::AssetAddressMapping::asset_id(message.to_token)
			.ok_or(Error::UnknownToken)
			.and_then(|asset| {
				pool.complete_swap_credit_for_tokens(
					&self.account,
					asset,
					message.credit,
					message.minimum_amount,
					&receiver,
					tracking_id,
				)
				.map(|quote| (asset, quote))
			});

		match completed {
			Ok((asset, quote)) => Ok(Delivery::Completed {
				asset,
				amount: quote.amount,
				fee: quote.fee,
			}),
			Err(reason) => {
				log::warn!(
					target: LOG_TARGET,
					"swap credit for tokens failed: {:?}, tracking id {:?}; minting credit to receiver",
					reason,
					tracking_id
				);
				pool.mint_credit(&self.account, message.credit, &receiver, tracking_id)?;
				Ok(Delivery::CreditMinted {
					credit: message.credit,
					reason,
				})
			}
		}
	}
}
