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

//! Cross-chain credit settlement.
//!
//! A cross-chain swap is settled in two legs. On the source chain tokens are swapped into credit
//! (minted, checked against the outbound cap) and the credit is handed to the transport. On the
//! destination chain the adaptor swaps the credit into tokens (burned, checked against the inbound
//! cap). When the destination leg fails, the adaptor mints the credit to the receiver instead. That
//! path is not capped and does not move the minted/burned totals.

use crate::types::{Balance, CreditParams, Tradability};
use crate::{transfer_failed, Config, Error, Event, Pool, LOG_TARGET};
use codec::{Decode, Encode};
use coverage_math::coverage::types::{CreditQuote, SwapParameters, TradeQuote};
use coverage_math::coverage::{calculate_credit_for_tokens, calculate_tokens_for_credit};
use coverage_math::ensure;
use coverage_math::wad::{from_wad, to_wad};
use coverage_traits::{ChainId, CreditTransfer, CrossChainAdaptor, EvmAddress, TokenTransfer, TrackingId};
use num_traits::Zero;
use scale_info::TypeInfo;
use sp_std::collections::btree_map::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub struct CreditLedger<AccountId: Ord> {
	pub params: CreditParams,
	total_minted: Balance,
	total_burned: Balance,
	balances: BTreeMap<AccountId, Balance>,
}

impl<AccountId: Ord + Clone> CreditLedger<AccountId> {
	pub fn new(params: CreditParams) -> Self {
		Self {
			params,
			total_minted: 0,
			total_burned: 0,
			balances: BTreeMap::new(),
		}
	}

	pub fn total_minted(&self) -> Balance {
		self.total_minted
	}

	pub fn total_burned(&self) -> Balance {
		self.total_burned
	}

	pub fn balance_of(&self, who: &AccountId) -> Balance {
		self.balances.get(who).copied().unwrap_or_default()
	}

	/// Record credit minted by a swap into credit. Counters are unchanged when the cap is hit.
	pub fn record_minted(&mut self, credit: Balance) -> Result<(), Error> {
		let minted = self.total_minted.checked_add(credit).ok_or(Error::Overflow)?;
		ensure!(
			minted.saturating_sub(self.total_burned) <= self.params.maximum_outbound_credit,
			Error::MaximumMintedCredit
		);
		self.total_minted = minted;
		Ok(())
	}

	/// Record credit burned by a swap out of credit. Counters are unchanged when the cap is hit.
	pub fn record_burned(&mut self, credit: Balance) -> Result<(), Error> {
		let burned = self.total_burned.checked_add(credit).ok_or(Error::Overflow)?;
		ensure!(
			burned.saturating_sub(self.total_minted) <= self.params.maximum_inbound_credit,
			Error::MaximumBurnedCredit
		);
		self.total_burned = burned;
		Ok(())
	}

	pub fn deposit(&mut self, who: &AccountId, credit: Balance) -> Result<(), Error> {
		let balance = self.balance_of(who).checked_add(credit).ok_or(Error::Overflow)?;
		self.balances.insert(who.clone(), balance);
		Ok(())
	}

	pub fn withdraw(&mut self, who: &AccountId, credit: Balance) -> Result<(), Error> {
		let balance = self
			.balance_of(who)
			.checked_sub(credit)
			.ok_or(Error::CreditNotEnough)?;
		if balance.is_zero() {
			self.balances.remove(who);
		} else {
			self.balances.insert(who.clone(), balance);
		}
		Ok(())
	}
}

fn bridge_failed<E: core::fmt::Debug>(e: E) -> Error {
	log::warn!(target: LOG_TARGET, "cross-chain transport refused transfer: {:?}", e);
	Error::BridgeFailed
}

impl<T: Config> Pool<T> {
	pub fn credit_ledger(&self) -> Result<&CreditLedger<T::AccountId>, Error> {
		self.state.credit.as_ref().ok_or(Error::CreditDisabled)
	}

	/// Credit held by `who`, WAD-scaled.
	pub fn credit_balance(&self, who: &T::AccountId) -> Balance {
		self.state
			.credit
			.as_ref()
			.map(|ledger| ledger.balance_of(who))
			.unwrap_or_default()
	}

	/// Enable credit settlement or update its parameters. Totals and balances are kept.
	pub fn set_credit_params(&mut self, params: CreditParams) -> Result<(), Error> {
		params.validate()?;
		match self.state.credit.as_mut() {
			Some(ledger) => ledger.params = params,
			None => self.state.credit = Some(CreditLedger::new(params)),
		}

		log::info!(target: LOG_TARGET, "credit parameters updated: {:?}", params);
		self.deposit_event(Event::CreditParametersUpdated { params });
		Ok(())
	}

	fn credit_swap_parameters(&self, haircut_rate: Balance) -> SwapParameters {
		SwapParameters {
			haircut_rate,
			..self.state.params.swap_parameters()
		}
	}

	fn ensure_adaptor(&self, origin: &T::AccountId) -> Result<(), Error> {
		ensure!(self.state.adaptor.as_ref() == Some(origin), Error::Unauthorized);
		Ok(())
	}

	/// Credit received for swapping `amount` of `asset_id`. The fee is in native decimals.
	pub fn quote_swap_tokens_for_credit(&self, asset_id: T::AssetId, amount: Balance) -> Result<CreditQuote, Error> {
		ensure!(!amount.is_zero(), Error::ZeroAmount);
		let ledger = self.credit_ledger()?;
		let snapshot = self.snapshot(asset_id)?;
		let quote = calculate_tokens_for_credit(
			&snapshot,
			to_wad(amount, snapshot.decimals)?,
			&self.credit_swap_parameters(ledger.params.tokens_for_credit_haircut),
		)?;
		Ok(CreditQuote {
			credit: quote.credit,
			fee: from_wad(quote.fee, snapshot.decimals)?,
		})
	}

	/// Tokens received for swapping `credit` into `asset_id`, in native decimals.
	pub fn quote_swap_credit_for_tokens(&self, asset_id: T::AssetId, credit: Balance) -> Result<TradeQuote, Error> {
		ensure!(!credit.is_zero(), Error::ZeroAmount);
		let ledger = self.credit_ledger()?;
		let snapshot = self.snapshot(asset_id)?;
		let quote = calculate_credit_for_tokens(
			&snapshot,
			credit,
			&self.credit_swap_parameters(ledger.params.credit_for_tokens_haircut),
		)?;
		Ok(TradeQuote {
			amount: from_wad(quote.amount, snapshot.decimals)?,
			fee: from_wad(quote.fee, snapshot.decimals)?,
		})
	}

	/// Swap `amount` of `asset_id` into credit held by `receiver`.
	///
	/// Returns the credit minted.
	pub fn swap_tokens_for_credit(
		&mut self,
		who: &T::AccountId,
		asset_id: T::AssetId,
		amount: Balance,
		minimum_credit: Balance,
		receiver: &T::AccountId,
		deadline: u64,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			Self::ensure_not_expired(deadline)?;
			ensure!(!amount.is_zero(), Error::ZeroAmount);
			Self::ensure_receiver(receiver)?;

			let quote = pool.do_swap_tokens_for_credit(who, asset_id, amount, minimum_credit)?;
			pool.state
				.credit
				.as_mut()
				.ok_or(Error::CreditDisabled)?
				.deposit(receiver, quote.credit)?;

			pool.deposit_event(Event::SwappedTokensForCredit {
				who: who.clone(),
				asset: asset_id,
				amount,
				credit: quote.credit,
				fee: quote.fee,
				receiver: receiver.clone(),
			});
			Ok(quote.credit)
		})
	}

	/// Swap `amount` of `asset_id` into credit and send it to `to_chain`, where it is swapped into
	/// `to_token` for `receiver`.
	///
	/// Returns the credit sent and the tracking id assigned by the transport.
	#[allow(clippy::too_many_arguments)]
	pub fn swap_tokens_for_tokens_cross_chain(
		&mut self,
		who: &T::AccountId,
		asset_id: T::AssetId,
		to_token: EvmAddress,
		to_chain: ChainId,
		amount: Balance,
		minimum_credit: Balance,
		minimum_amount: Balance,
		receiver: EvmAddress,
		deadline: u64,
	) -> Result<(Balance, TrackingId), Error> {
		self.with_transaction(|pool| {
			Self::ensure_not_expired(deadline)?;
			ensure!(!amount.is_zero(), Error::ZeroAmount);
			ensure!(!receiver.is_zero() && !to_token.is_zero(), Error::ZeroAddress);

			let quote = pool.do_swap_tokens_for_credit(who, asset_id, amount, minimum_credit)?;
			let transfer = CreditTransfer {
				to_chain,
				to_token,
				credit: quote.credit,
				minimum_amount,
				receiver,
			};
			let tracking_id = T::Bridge::bridge_credit_and_swap_for_tokens(&transfer).map_err(bridge_failed)?;

			log::debug!(
				target: LOG_TARGET,
				"cross-chain swap initiated: asset {:?} amount {:?} credit {:?} to chain {:?} tracking id {:?}",
				asset_id,
				amount,
				quote.credit,
				to_chain,
				tracking_id
			);
			pool.deposit_event(Event::CrossChainSwapInitiated {
				who: who.clone(),
				asset: Some(asset_id),
				amount,
				credit: quote.credit,
				to_chain,
				to_token,
				receiver,
				tracking_id,
			});
			Ok((quote.credit, tracking_id))
		})
	}

	/// Swap credit held by `who` into `asset_id` for `receiver`.
	///
	/// Returns the amount and fee in native decimals.
	pub fn swap_credit_for_tokens(
		&mut self,
		who: &T::AccountId,
		asset_id: T::AssetId,
		credit: Balance,
		minimum_amount: Balance,
		receiver: &T::AccountId,
		deadline: u64,
	) -> Result<TradeQuote, Error> {
		self.with_transaction(|pool| {
			Self::ensure_not_expired(deadline)?;
			ensure!(!credit.is_zero(), Error::ZeroAmount);
			Self::ensure_receiver(receiver)?;

			pool.state
				.credit
				.as_mut()
				.ok_or(Error::CreditDisabled)?
				.withdraw(who, credit)?;
			pool.do_swap_credit_for_tokens(asset_id, credit, minimum_amount, receiver, 0)
		})
	}

	/// Send credit held by `who` to `to_chain`, where it is swapped into `to_token` for `receiver`.
	#[allow(clippy::too_many_arguments)]
	pub fn swap_credit_for_tokens_cross_chain(
		&mut self,
		who: &T::AccountId,
		to_token: EvmAddress,
		to_chain: ChainId,
		credit: Balance,
		minimum_amount: Balance,
		receiver: EvmAddress,
		deadline: u64,
	) -> Result<TrackingId, Error> {
		self.with_transaction(|pool| {
			Self::ensure_not_expired(deadline)?;
			ensure!(!credit.is_zero(), Error::ZeroAmount);
			ensure!(!receiver.is_zero() && !to_token.is_zero(), Error::ZeroAddress);

			pool.state
				.credit
				.as_mut()
				.ok_or(Error::CreditDisabled)?
				.withdraw(who, credit)?;

			let transfer = CreditTransfer {
				to_chain,
				to_token,
				credit,
				minimum_amount,
				receiver,
			};
			let tracking_id = T::Bridge::bridge_credit_and_swap_for_tokens(&transfer).map_err(bridge_failed)?;

			pool.deposit_event(Event::CrossChainSwapInitiated {
				who: who.clone(),
				asset: None,
				amount: 0,
				credit,
				to_chain,
				to_token,
				receiver,
				tracking_id,
			});
			Ok(tracking_id)
		})
	}

	/// Destination leg of a cross-chain swap. Only the configured adaptor may call this.
	pub fn complete_swap_credit_for_tokens(
		&mut self,
		origin: &T::AccountId,
		asset_id: T::AssetId,
		credit: Balance,
		minimum_amount: Balance,
		receiver: &T::AccountId,
		tracking_id: TrackingId,
	) -> Result<TradeQuote, Error> {
		self.ensure_adaptor(origin)?;
		self.with_transaction(|pool| {
			Self::ensure_receiver(receiver)?;
			pool.do_swap_credit_for_tokens(asset_id, credit, minimum_amount, receiver, tracking_id)
		})
	}

	/// Mint `credit` to `receiver` after a failed delivery. Caps are not checked and the
	/// minted/burned totals do not change. Only the configured adaptor may call this.
	pub fn mint_credit(
		&mut self,
		origin: &T::AccountId,
		credit: Balance,
		receiver: &T::AccountId,
		tracking_id: TrackingId,
	) -> Result<(), Error> {
		self.ensure_adaptor(origin)?;
		self.with_transaction(|pool| {
			ensure!(!credit.is_zero(), Error::ZeroAmount);
			Self::ensure_receiver(receiver)?;
			pool.state
				.credit
				.as_mut()
				.ok_or(Error::CreditDisabled)?
				.deposit(receiver, credit)?;

			log::info!(
				target: LOG_TARGET,
				"credit {:?} minted to {:?}, tracking id {:?}",
				credit,
				receiver,
				tracking_id
			);
			pool.deposit_event(Event::CreditMinted {
				receiver: receiver.clone(),
				credit,
				tracking_id,
			});
			Ok(())
		})
	}

	fn do_swap_tokens_for_credit(
		&mut self,
		who: &T::AccountId,
		asset_id: T::AssetId,
		amount: Balance,
		minimum_credit: Balance,
	) -> Result<CreditQuote, Error> {
		let mut ledger = self.credit_ledger()?.clone();
		ensure!(ledger.params.swap_tokens_for_credit_enabled, Error::CreditDisabled);
		self.ensure_allowed(asset_id, Tradability::SELL)?;

		let snapshot = self.snapshot(asset_id)?;
		let amount_wad = to_wad(amount, snapshot.decimals)?;
		let quote = calculate_tokens_for_credit(
			&snapshot,
			amount_wad,
			&self.credit_swap_parameters(ledger.params.tokens_for_credit_haircut),
		)?;
		ensure!(quote.credit >= minimum_credit, Error::SlippageExceeded);

		let mut asset = self.asset(asset_id)?.clone();
		asset.add_cash(amount_wad.checked_sub(quote.fee).ok_or(Error::Underflow)?)?;
		asset.collect_fee(quote.fee)?;
		ledger.record_minted(quote.credit)?;

		T::Currency::transfer_in(asset_id, who, amount).map_err(transfer_failed)?;

		self.commit_asset(asset_id, asset);
		self.state.credit = Some(ledger);
		self.notify_liquidity_changed(asset_id);

		log::debug!(
			target: LOG_TARGET,
			"tokens for credit: asset {:?} amount {:?} credit {:?} fee {:?}",
			asset_id,
			amount,
			quote.credit,
			quote.fee
		);
		Ok(CreditQuote {
			credit: quote.credit,
			fee: from_wad(quote.fee, snapshot.decimals)?,
		})
	}

	fn do_swap_credit_for_tokens(
		&mut self,
		asset_id: T::AssetId,
		credit: Balance,
		minimum_amount: Balance,
		receiver: &T::AccountId,
		tracking_id: TrackingId,
	) -> Result<TradeQuote, Error> {
		ensure!(!credit.is_zero(), Error::ZeroAmount);
		let mut ledger = self.credit_ledger()?.clone();
		ensure!(ledger.params.swap_credit_for_tokens_enabled, Error::CreditDisabled);
		self.ensure_allowed(asset_id, Tradability::BUY)?;

		let snapshot = self.snapshot(asset_id)?;
		let quote = calculate_credit_for_tokens(
			&snapshot,
			credit,
			&self.credit_swap_parameters(ledger.params.credit_for_tokens_haircut),
		)?;
		let amount = from_wad(quote.amount, snapshot.decimals)?;
		ensure!(amount >= minimum_amount, Error::SlippageExceeded);

		let mut asset = self.asset(asset_id)?.clone();
		asset.remove_cash(quote.amount.checked_add(quote.fee).ok_or(Error::Overflow)?)?;
		asset.collect_fee(quote.fee)?;
		ledger.record_burned(credit)?;
		let fee = from_wad(quote.fee, snapshot.decimals)?;

		self.commit_asset(asset_id, asset);
		self.state.credit = Some(ledger);

		T::Currency::transfer_out(asset_id, receiver, amount).map_err(transfer_failed)?;
		self.notify_liquidity_changed(asset_id);

		log::debug!(
			target: LOG_TARGET,
			"credit for tokens: asset {:?} credit {:?} amount {:?} fee {:?} tracking id {:?}",
			asset_id,
			credit,
			amount,
			fee,
			tracking_id
		);
		self.deposit_event(Event::SwappedCreditForTokens {
			asset: asset_id,
			credit,
			amount,
			fee,
			receiver: receiver.clone(),
			tracking_id,
		});

		Ok(TradeQuote { amount, fee })
	}
}
