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

//! # Coverage pool
//!
//! Multi-asset stableswap pool priced by coverage ratios.
//!
//! ## Overview
//!
//! Every asset of the pool keeps its own ledger of cash (tokens backing the asset) and liability
//! (tokens owed to liquidity providers). Swaps move the coverage ratios `cash / liability` of the two
//! assets along the invariant `D = Σ P·L·(r − A/r)`. Liquidity is single sided: an LP deposits one
//! asset and receives shares of that asset only.
//!
//! Each request runs Validate → Quote → Apply → Emit. Quotes are computed on a read only view of the
//! ledger, the resulting states are built on copies and committed only when every check passed. A
//! failing request leaves the pool as it was.
//!
//! ### Cross-chain swaps
//!
//! A pool with a credit ledger can swap tokens into credit, a chain agnostic unit, and hand the
//! credit to a cross-chain transport. On the destination chain the `CreditAdaptor` delivers the
//! message and swaps the credit into tokens. When that fails, the credit is minted to the receiver
//! instead so funds are never lost.
//!
//! ### Hooks
//!
//! - on_liquidity_changed - called when cash or liability changes outside of a swap
//! - on_trade - called when a swap is executed
//!
//! ### Terminology
//!
//! * **Cash** - tokens backing an asset
//! * **Liability** - tokens owed to liquidity providers of an asset
//! * **Coverage ratio** - `cash / liability`
//! * **Haircut** - fee taken from a swap or withdrawal
//! * **Credit** - chain agnostic unit used to settle cross-chain swaps
#![cfg_attr(not(feature = "std"), no_std)]

use codec::{Decode, Encode};
use core::fmt::Debug;
use coverage_math::coverage::types::{
	AssetSnapshot, DepositQuote, Equilibrium, TradeQuote, WithdrawFromOtherQuote, WithdrawQuote,
};
use coverage_math::coverage::{
	calculate_deposit, calculate_deposit_liability, calculate_equilibrium, calculate_in_given_out,
	calculate_out_given_in, calculate_withdraw, calculate_withdraw_from_other_asset,
};
use coverage_math::ensure;
use coverage_math::types::WAD;
use coverage_math::wad::{from_wad, to_wad, wmul};
use coverage_math::MathError;
use coverage_traits::{
	AddressMapping, AssetAddressMapping, ChainId, CrossChainAdaptor, EvmAddress, PoolHooks,
	RelativePriceProvider, TimeProvider, TokenTransfer, TrackingId,
};
use num_traits::Zero;
use scale_info::TypeInfo;
use sp_std::prelude::*;

pub mod adaptor;
pub mod asset;
pub mod credit;
pub mod migrations;
pub mod price;
pub mod types;

#[cfg(test)]
mod tests;

pub use adaptor::{CreditAdaptor, Delivery};
use asset::Asset;
use price::PriceSource;
use types::{Balance, CreditParams, PoolParams, PoolState, Tradability};

pub const LOG_TARGET: &str = "runtime::coverage-pool";

/// Static wiring of a pool to its collaborators.
pub trait Config: Sized + 'static {
	/// Identifier of an account. `Default` is treated as the zero address.
	type AccountId: Clone + Ord + Default + Debug + Encode + Decode + TypeInfo + 'static;

	/// Identifier of an asset.
	type AssetId: Copy + Ord + Debug + Encode + Decode + TypeInfo + 'static;

	/// Moves underlying tokens in and out of the pool.
	type Currency: TokenTransfer<Self::AccountId, Self::AssetId>;

	/// Price feed for assets priced by `PriceSource::OracleFed`.
	type PriceProvider: RelativePriceProvider<Self::AssetId>;

	/// Time source for deadlines and stake derived rates.
	type TimeProvider: TimeProvider;

	/// Outbound side of the cross-chain transport.
	type Bridge: CrossChainAdaptor;

	/// Maps accounts to addresses carried in cross-chain messages.
	type AddressMapping: AddressMapping<Self::AccountId>;

	/// Maps assets to token addresses carried in cross-chain messages.
	type AssetAddressMapping: AssetAddressMapping<Self::AssetId>;

	/// Hooks are actions executed on trades and liquidity changes.
	type Hooks: PoolHooks<Self::AssetId>;
}

/// How a failure should be treated by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
	/// Overflow or division by zero.
	Arithmetic,
	/// The request cannot be served in the current pool state.
	InvariantViolation,
	/// A user supplied bound was not met. Retrying with other bounds may succeed.
	Slippage,
	/// A credit cap would be exceeded. Pool state has to change before retrying.
	CapExceeded,
	/// Caller is not the expected privileged collaborator.
	Unauthorized,
	/// The request itself is invalid.
	InvalidRequest,
	/// A collaborator failed.
	External,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub enum Error {
	/// Arithmetic overflow.
	Overflow,
	/// Division by zero.
	DivisionByZero,
	/// Cash, liability, shares or a quoted amount would become negative.
	Underflow,
	/// Liquidity request mints or burns nothing.
	ZeroLiquidity,
	/// Coverage ratio of the input asset would end above the high coverage fee band.
	CoverageLimitExceeded,
	/// Pool does not hold enough cash of the output asset.
	CashNotEnough,
	/// Computed fee exceeds the quoted amount.
	InvalidFee,
	/// Withdrawal would leave the asset below the minimum coverage ratio.
	CoverageRatioTooLow,
	/// Realized amount is below the requested minimum.
	SlippageExceeded,
	/// Outstanding minted credit would exceed the outbound cap.
	MaximumMintedCredit,
	/// Outstanding burned credit would exceed the inbound cap.
	MaximumBurnedCredit,
	/// Caller is not the cross-chain adaptor, or the message source is not trusted.
	Unauthorized,
	/// Amount is zero.
	ZeroAmount,
	/// Receiver or token address is the zero address.
	ZeroAddress,
	/// Deadline has passed.
	Expired,
	/// Pool is paused.
	PoolPaused,
	/// Operation is not allowed for the asset.
	NotAllowed,
	/// Asset is not part of the pool.
	AssetNotRegistered,
	/// Asset is already part of the pool.
	AssetAlreadyRegistered,
	/// Asset cannot be removed while it has liability.
	AssetHasLiability,
	/// Input and output asset are the same.
	SameAsset,
	/// Account does not hold enough shares.
	InsufficientShares,
	/// Account does not hold enough credit.
	CreditNotEnough,
	/// Credit is not enabled for the pool or for the operation.
	CreditDisabled,
	/// Parameter is out of its allowed range.
	InvalidParameter,
	/// Cross-chain payload cannot be decoded.
	MalformedPayload,
	/// Token address of a cross-chain payload is not mapped to an asset.
	UnknownToken,
	/// Persisted state has a version this code does not know.
	UnsupportedVersion,
	/// Persisted state cannot be decoded.
	CorruptedState,
	/// Token transfer failed.
	TransferFailed,
	/// No relative price is available for an oracle priced asset.
	PriceUnavailable,
	/// Cross-chain transport refused the message.
	BridgeFailed,
}

impl Error {
	pub fn class(&self) -> ErrorClass {
		use Error::*;
		match self {
			Overflow | DivisionByZero => ErrorClass::Arithmetic,
			Underflow | ZeroLiquidity | CoverageLimitExceeded | CashNotEnough | InvalidFee | CoverageRatioTooLow => {
				ErrorClass::InvariantViolation
			}
			SlippageExceeded => ErrorClass::Slippage,
			MaximumMintedCredit | MaximumBurnedCredit => ErrorClass::CapExceeded,
			Unauthorized => ErrorClass::Unauthorized,
			TransferFailed | PriceUnavailable | BridgeFailed => ErrorClass::External,
			ZeroAmount | ZeroAddress | Expired | PoolPaused | NotAllowed | AssetNotRegistered
			| AssetAlreadyRegistered | AssetHasLiability | SameAsset | InsufficientShares | CreditNotEnough
			| CreditDisabled | InvalidParameter | MalformedPayload | UnknownToken | UnsupportedVersion
			| CorruptedState => ErrorClass::InvalidRequest,
		}
	}
}

impl From<MathError> for Error {
	fn from(e: MathError) -> Self {
		match e {
			MathError::Overflow => Error::Overflow,
			MathError::DivisionByZero => Error::DivisionByZero,
			MathError::Underflow => Error::Underflow,
			MathError::ZeroLiquidity => Error::ZeroLiquidity,
			MathError::CoverageLimitExceeded => Error::CoverageLimitExceeded,
			MathError::CashNotEnough => Error::CashNotEnough,
			MathError::InvalidFee => Error::InvalidFee,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub enum Event<AccountId, AssetId> {
	/// An asset was registered.
	AssetAdded {
		asset: AssetId,
		decimals: u8,
		price_source: PriceSource,
	},
	/// An asset without liability was removed.
	AssetRemoved { asset: AssetId },
	/// Liquidity was added. `amount` is in native decimals, `liability` and `shares` are WAD-scaled.
	Deposited {
		who: AccountId,
		asset: AssetId,
		amount: Balance,
		liability: Balance,
		shares: Balance,
		to: AccountId,
	},
	/// Liquidity was removed. `amount` and `fee` are in native decimals.
	Withdrawn {
		who: AccountId,
		asset: AssetId,
		amount: Balance,
		liability: Balance,
		shares: Balance,
		fee: Balance,
		to: AccountId,
	},
	/// Shares of `from_asset` were burned and paid out in `to_asset`.
	WithdrawnFromOtherAsset {
		who: AccountId,
		from_asset: AssetId,
		to_asset: AssetId,
		shares: Balance,
		amount: Balance,
		fee: Balance,
		to: AccountId,
	},
	/// Tokens were swapped. Amounts are in native decimals, `fee` in units of `asset_out`.
	Swapped {
		who: AccountId,
		asset_in: AssetId,
		asset_out: AssetId,
		amount_in: Balance,
		amount_out: Balance,
		fee: Balance,
		to: AccountId,
	},
	/// Collected fees were distributed. Values are WAD-scaled.
	FeeMinted {
		asset: AssetId,
		dividend: Balance,
		lp_dividend: Balance,
		retained: Balance,
	},
	/// Tokens were swapped into credit held by `receiver`.
	SwappedTokensForCredit {
		who: AccountId,
		asset: AssetId,
		amount: Balance,
		credit: Balance,
		fee: Balance,
		receiver: AccountId,
	},
	/// Credit was swapped into tokens. `tracking_id` is zero for local swaps.
	SwappedCreditForTokens {
		asset: AssetId,
		credit: Balance,
		amount: Balance,
		fee: Balance,
		receiver: AccountId,
		tracking_id: TrackingId,
	},
	/// Credit was minted to `receiver` after a failed cross-chain delivery.
	CreditMinted {
		receiver: AccountId,
		credit: Balance,
		tracking_id: TrackingId,
	},
	/// Credit was handed to the cross-chain transport. `asset` is `None` when existing credit was sent.
	CrossChainSwapInitiated {
		who: AccountId,
		asset: Option<AssetId>,
		amount: Balance,
		credit: Balance,
		to_chain: ChainId,
		to_token: EvmAddress,
		receiver: EvmAddress,
		tracking_id: TrackingId,
	},
	/// Pool parameters were updated.
	ParametersUpdated { params: PoolParams },
	/// Credit parameters were updated.
	CreditParametersUpdated { params: CreditParams },
	/// Receiver of the fee dividend was updated.
	FeeToUpdated { fee_to: Option<AccountId> },
	/// Cross-chain adaptor account was updated.
	AdaptorUpdated { adaptor: Option<AccountId> },
	/// Price source of an asset was updated.
	PriceSourceUpdated { asset: AssetId, price_source: PriceSource },
	/// Tradability of an asset was updated.
	TradabilityUpdated { asset: AssetId, state: Tradability },
	/// Pool was paused.
	Paused,
	/// Pool was unpaused.
	Unpaused,
}

pub type EventOf<T> = Event<<T as Config>::AccountId, <T as Config>::AssetId>;
pub type PoolStateOf<T> = PoolState<<T as Config>::AccountId, <T as Config>::AssetId>;

pub(crate) fn transfer_failed<E: Debug>(e: E) -> Error {
	log::warn!(target: LOG_TARGET, "token transfer failed: {:?}", e);
	Error::TransferFailed
}

pub struct Pool<T: Config> {
	state: PoolStateOf<T>,
	events: Vec<EventOf<T>>,
}

impl<T: Config> Pool<T> {
	pub fn new(params: PoolParams) -> Result<Self, Error> {
		params.validate()?;
		Ok(Self::from_state(PoolState::new(params)))
	}

	pub fn from_state(state: PoolStateOf<T>) -> Self {
		Self {
			state,
			events: Vec::new(),
		}
	}

	pub fn state(&self) -> &PoolStateOf<T> {
		&self.state
	}

	pub fn params(&self) -> &PoolParams {
		&self.state.params
	}

	pub fn events(&self) -> &[EventOf<T>] {
		&self.events
	}

	pub fn take_events(&mut self) -> Vec<EventOf<T>> {
		core::mem::take(&mut self.events)
	}

	pub fn asset(&self, asset_id: T::AssetId) -> Result<&Asset, Error> {
		self.state.assets.get(&asset_id).ok_or(Error::AssetNotRegistered)
	}

	/// LP shares of `asset_id` held by `who`, WAD-scaled.
	pub fn shares_of(&self, asset_id: T::AssetId, who: &T::AccountId) -> Balance {
		self.state
			.shares
			.get(&(asset_id, who.clone()))
			.copied()
			.unwrap_or_default()
	}

	pub(crate) fn deposit_event(&mut self, event: EventOf<T>) {
		self.events.push(event);
	}

	/// Run `f` as one transaction. Pool state and recorded events are restored when it fails.
	///
	/// Exclusive access for the duration of `f` is guaranteed by the `&mut self` borrow; collaborators
	/// are called without a handle to the pool and cannot re-enter it.
	pub(crate) fn with_transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R, Error>) -> Result<R, Error> {
		let state = self.state.clone();
		let events = self.events.len();
		let result = f(self);
		if result.is_err() {
			self.state = state;
			self.events.truncate(events);
		}
		result
	}

	pub(crate) fn ensure_not_expired(deadline: u64) -> Result<(), Error> {
		ensure!(T::TimeProvider::now() <= deadline, Error::Expired);
		Ok(())
	}

	pub(crate) fn ensure_receiver(to: &T::AccountId) -> Result<(), Error> {
		ensure!(*to != T::AccountId::default(), Error::ZeroAddress);
		Ok(())
	}

	pub(crate) fn ensure_allowed(&self, asset_id: T::AssetId, operation: Tradability) -> Result<&Asset, Error> {
		ensure!(!self.state.paused, Error::PoolPaused);
		let asset = self.asset(asset_id)?;
		ensure!(asset.is_allowed(operation), Error::NotAllowed);
		Ok(asset)
	}

	/// Ledger view of an asset with its relative price resolved.
	pub(crate) fn snapshot(&self, asset_id: T::AssetId) -> Result<AssetSnapshot, Error> {
		let asset = self.asset(asset_id)?;
		let price = asset.price_source.relative_price::<T>(asset_id)?;
		Ok(asset.snapshot(price))
	}

	/// Invariant, total liability and equilibrium coverage ratio over all assets of the pool.
	pub fn global_equilibrium(&self) -> Result<Equilibrium, Error> {
		let snapshots = self
			.state
			.assets
			.keys()
			.map(|asset_id| self.snapshot(*asset_id))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(calculate_equilibrium(&snapshots, self.state.params.amplification)?)
	}

	/// Coverage ratio deposits and withdrawals are quoted against.
	pub(crate) fn equilibrium_ratio(&self) -> Result<Balance, Error> {
		if !self.state.params.global_equilibrium {
			return Ok(WAD);
		}
		Ok(self.global_equilibrium()?.coverage_ratio)
	}

	fn commit_asset(&mut self, asset_id: T::AssetId, asset: Asset) {
		self.state.assets.insert(asset_id, asset);
	}

	fn set_shares(&mut self, asset_id: T::AssetId, who: &T::AccountId, balance: Balance) {
		if balance.is_zero() {
			self.state.shares.remove(&(asset_id, who.clone()));
		} else {
			self.state.shares.insert((asset_id, who.clone()), balance);
		}
	}

	fn notify_liquidity_changed(&self, asset_id: T::AssetId) {
		if let Some(asset) = self.state.assets.get(&asset_id) {
			T::Hooks::on_liquidity_changed(asset_id, asset.cash(), asset.liability());
		}
	}

	/// Deposit `amount` of `asset_id`, in native decimals, and mint shares to `to`.
	///
	/// Returns the minted shares.
	pub fn deposit(
		&mut self,
		who: &T::AccountId,
		asset_id: T::AssetId,
		amount: Balance,
		minimum_shares: Balance,
		to: &T::AccountId,
		deadline: u64,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			Self::ensure_not_expired(deadline)?;
			ensure!(!amount.is_zero(), Error::ZeroAmount);
			Self::ensure_receiver(to)?;
			pool.ensure_allowed(asset_id, Tradability::ADD_LIQUIDITY)?;

			pool.mint_fee_if_needed(asset_id)?;

			let mut asset = pool.asset(asset_id)?.clone();
			let amount_wad = to_wad(amount, asset.decimals)?;
			let quote = calculate_deposit(
				amount_wad,
				asset.reserve(),
				asset.total_supply(),
				pool.state.params.amplification,
				pool.equilibrium_ratio()?,
			)?;
			ensure!(quote.shares >= minimum_shares, Error::SlippageExceeded);

			asset.add_cash(amount_wad)?;
			asset.add_liability(quote.liability)?;
			asset.mint_shares(quote.shares)?;
			let shares = pool
				.shares_of(asset_id, to)
				.checked_add(quote.shares)
				.ok_or(Error::Overflow)?;

			T::Currency::transfer_in(asset_id, who, amount).map_err(transfer_failed)?;

			pool.commit_asset(asset_id, asset);
			pool.set_shares(asset_id, to, shares);
			pool.notify_liquidity_changed(asset_id);

			log::debug!(
				target: LOG_TARGET,
				"deposit: asset {:?} amount {:?} liability {:?} shares {:?}",
				asset_id,
				amount,
				quote.liability,
				quote.shares
			);
			pool.deposit_event(Event::Deposited {
				who: who.clone(),
				asset: asset_id,
				amount,
				liability: quote.liability,
				shares: quote.shares,
				to: to.clone(),
			});

			Ok(quote.shares)
		})
	}

	/// Burn `shares` of `asset_id` and pay the released cash to `to`.
	///
	/// Returns the amount paid, in native decimals.
	pub fn withdraw(
		&mut self,
		who: &T::AccountId,
		asset_id: T::AssetId,
		shares: Balance,
		minimum_amount: Balance,
		to: &T::AccountId,
		deadline: u64,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			Self::ensure_not_expired(deadline)?;
			ensure!(!shares.is_zero(), Error::ZeroAmount);
			Self::ensure_receiver(to)?;
			pool.ensure_allowed(asset_id, Tradability::REMOVE_LIQUIDITY)?;

			let owned = pool.shares_of(asset_id, who);
			ensure!(owned >= shares, Error::InsufficientShares);

			pool.mint_fee_if_needed(asset_id)?;

			let mut asset = pool.asset(asset_id)?.clone();
			let quote = calculate_withdraw(
				shares,
				asset.total_supply(),
				asset.reserve(),
				pool.state.params.amplification,
				pool.equilibrium_ratio()?,
				pool.state.params.withdrawal_haircut_rate,
			)?;
			let amount = from_wad(quote.amount, asset.decimals)?;
			ensure!(amount >= minimum_amount, Error::SlippageExceeded);

			asset.remove_cash(quote.amount.checked_add(quote.fee).ok_or(Error::Overflow)?)?;
			asset.remove_liability(quote.liability)?;
			asset.burn_shares(shares)?;
			asset.collect_fee(quote.fee)?;
			asset.ensure_minimum_coverage()?;

			let fee = from_wad(quote.fee, asset.decimals)?;
			pool.commit_asset(asset_id, asset);
			pool.set_shares(asset_id, who, owned - shares);

			T::Currency::transfer_out(asset_id, to, amount).map_err(transfer_failed)?;
			pool.notify_liquidity_changed(asset_id);

			log::debug!(
				target: LOG_TARGET,
				"withdraw: asset {:?} shares {:?} amount {:?} fee {:?}",
				asset_id,
				shares,
				amount,
				fee
			);
			pool.deposit_event(Event::Withdrawn {
				who: who.clone(),
				asset: asset_id,
				amount,
				liability: quote.liability,
				shares,
				fee,
				to: to.clone(),
			});

			Ok(amount)
		})
	}

	/// Burn `shares` of `from_asset` and receive `to_asset`.
	///
	/// Returns the amount of `to_asset` paid, in native decimals.
	#[allow(clippy::too_many_arguments)]
	pub fn withdraw_from_other_asset(
		&mut self,
		who: &T::AccountId,
		from_asset: T::AssetId,
		to_asset: T::AssetId,
		shares: Balance,
		minimum_amount: Balance,
		to: &T::AccountId,
		deadline: u64,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			Self::ensure_not_expired(deadline)?;
			ensure!(!shares.is_zero(), Error::ZeroAmount);
			Self::ensure_receiver(to)?;
			ensure!(from_asset != to_asset, Error::SameAsset);
			pool.ensure_allowed(from_asset, Tradability::REMOVE_LIQUIDITY)?;
			pool.ensure_allowed(to_asset, Tradability::BUY)?;

			let owned = pool.shares_of(from_asset, who);
			ensure!(owned >= shares, Error::InsufficientShares);

			pool.mint_fee_if_needed(from_asset)?;

			let quote = pool.quote_withdraw_from_other_asset_wad(from_asset, to_asset, shares)?;
			let mut from = pool.asset(from_asset)?.clone();
			let mut out = pool.asset(to_asset)?.clone();
			let amount = from_wad(quote.amount, out.decimals)?;
			ensure!(amount >= minimum_amount, Error::SlippageExceeded);

			let withdraw = quote.withdraw;
			from.remove_cash(withdraw.amount.checked_add(withdraw.fee).ok_or(Error::Overflow)?)?;
			from.add_cash(withdraw.amount)?;
			from.remove_liability(withdraw.liability)?;
			from.burn_shares(shares)?;
			from.collect_fee(withdraw.fee)?;
			from.ensure_minimum_coverage()?;

			out.remove_cash(quote.amount.checked_add(quote.fee).ok_or(Error::Overflow)?)?;
			out.collect_fee(quote.fee)?;

			let withdrawn = from_wad(withdraw.amount, from.decimals)?;
			let fee = from_wad(quote.fee, out.decimals)?;
			pool.commit_asset(from_asset, from);
			pool.commit_asset(to_asset, out);
			pool.set_shares(from_asset, who, owned - shares);

			T::Currency::transfer_out(to_asset, to, amount).map_err(transfer_failed)?;
			pool.notify_liquidity_changed(from_asset);
			T::Hooks::on_trade(from_asset, to_asset, withdrawn, amount);

			log::debug!(
				target: LOG_TARGET,
				"withdraw from other asset: {:?} -> {:?} shares {:?} amount {:?} fee {:?}",
				from_asset,
				to_asset,
				shares,
				amount,
				fee
			);
			pool.deposit_event(Event::WithdrawnFromOtherAsset {
				who: who.clone(),
				from_asset,
				to_asset,
				shares,
				amount,
				fee,
				to: to.clone(),
			});

			Ok(amount)
		})
	}

	/// Swap exactly `amount` of `asset_in` for `asset_out`.
	///
	/// Returns the amount received and the fee, both in native decimals of `asset_out`.
	#[allow(clippy::too_many_arguments)]
	pub fn swap(
		&mut self,
		who: &T::AccountId,
		asset_in: T::AssetId,
		asset_out: T::AssetId,
		amount: Balance,
		minimum_amount: Balance,
		to: &T::AccountId,
		deadline: u64,
	) -> Result<(Balance, Balance), Error> {
		self.with_transaction(|pool| {
			Self::ensure_not_expired(deadline)?;
			ensure!(!amount.is_zero(), Error::ZeroAmount);
			Self::ensure_receiver(to)?;
			ensure!(asset_in != asset_out, Error::SameAsset);
			pool.ensure_allowed(asset_in, Tradability::SELL)?;
			pool.ensure_allowed(asset_out, Tradability::BUY)?;

			let from_snapshot = pool.snapshot(asset_in)?;
			let to_snapshot = pool.snapshot(asset_out)?;
			let amount_wad = to_wad(amount, from_snapshot.decimals)?;
			let quote = calculate_out_given_in(
				&from_snapshot,
				&to_snapshot,
				amount_wad,
				&pool.state.params.swap_parameters(),
			)?;
			let amount_out = from_wad(quote.amount, to_snapshot.decimals)?;
			ensure!(amount_out >= minimum_amount, Error::SlippageExceeded);

			let mut from = pool.asset(asset_in)?.clone();
			let mut out = pool.asset(asset_out)?.clone();
			from.add_cash(amount_wad)?;
			out.remove_cash(quote.amount.checked_add(quote.fee).ok_or(Error::Overflow)?)?;
			out.collect_fee(quote.fee)?;
			let fee = from_wad(quote.fee, to_snapshot.decimals)?;

			T::Currency::transfer_in(asset_in, who, amount).map_err(transfer_failed)?;

			pool.commit_asset(asset_in, from);
			pool.commit_asset(asset_out, out);

			T::Currency::transfer_out(asset_out, to, amount_out).map_err(transfer_failed)?;
			T::Hooks::on_trade(asset_in, asset_out, amount, amount_out);

			log::debug!(
				target: LOG_TARGET,
				"swap: {:?} -> {:?} amount in {:?} amount out {:?} fee {:?}",
				asset_in,
				asset_out,
				amount,
				amount_out,
				fee
			);
			pool.deposit_event(Event::Swapped {
				who: who.clone(),
				asset_in,
				asset_out,
				amount_in: amount,
				amount_out,
				fee,
				to: to.clone(),
			});

			Ok((amount_out, fee))
		})
	}

	/// Distribute the fees collected for `asset_id`.
	///
	/// `1 - lp_dividend_ratio - retention_ratio` of the fee is paid to `fee_to`, `lp_dividend_ratio`
	/// is deposited back for liquidity providers and the rest stays in the pool. Without `fee_to` the
	/// dividend is retained as well. Returns the fee that was distributed, WAD-scaled.
	pub fn mint_fee(&mut self, asset_id: T::AssetId) -> Result<Balance, Error> {
		self.with_transaction(|pool| pool.do_mint_fee(asset_id))
	}

	fn mint_fee_if_needed(&mut self, asset_id: T::AssetId) -> Result<(), Error> {
		let collected = self.asset(asset_id)?.fee_collected();
		if !collected.is_zero() && collected >= self.state.params.mint_fee_threshold {
			self.do_mint_fee(asset_id)?;
		}
		Ok(())
	}

	fn do_mint_fee(&mut self, asset_id: T::AssetId) -> Result<Balance, Error> {
		let params = self.state.params;
		let equilibrium_ratio = self.equilibrium_ratio()?;
		let mut asset = self.asset(asset_id)?.clone();
		let fee = asset.take_fee();
		if fee.is_zero() {
			return Ok(0);
		}

		let dividend_ratio = WAD
			.checked_sub(params.lp_dividend_ratio)
			.and_then(|r| r.checked_sub(params.retention_ratio))
			.ok_or(Error::InvalidParameter)?;
		let lp_dividend = wmul(fee, params.lp_dividend_ratio)?;
		let payout = match self.state.fee_to.clone() {
			Some(fee_to) => {
				let dividend = wmul(fee, dividend_ratio)?;
				Some((fee_to, dividend, from_wad(dividend, asset.decimals)?))
			}
			None => None,
		};
		let dividend = payout.as_ref().map(|(_, d, _)| *d).unwrap_or_default();

		if !lp_dividend.is_zero() {
			let liability = calculate_deposit_liability(
				lp_dividend,
				asset.reserve(),
				params.amplification,
				equilibrium_ratio,
			)?;
			asset.add_cash(lp_dividend)?;
			asset.add_liability(liability)?;
		}
		let retained = fee
			.checked_sub(dividend)
			.and_then(|r| r.checked_sub(lp_dividend))
			.ok_or(Error::Underflow)?;

		self.commit_asset(asset_id, asset);

		if let Some((fee_to, _, amount)) = payout {
			if !amount.is_zero() {
				T::Currency::transfer_out(asset_id, &fee_to, amount).map_err(transfer_failed)?;
			}
		}
		self.notify_liquidity_changed(asset_id);

		log::debug!(
			target: LOG_TARGET,
			"mint fee: asset {:?} fee {:?} dividend {:?} lp dividend {:?}",
			asset_id,
			fee,
			dividend,
			lp_dividend
		);
		self.deposit_event(Event::FeeMinted {
			asset: asset_id,
			dividend,
			lp_dividend,
			retained,
		});

		Ok(fee)
	}

	/// Quote of swapping `amount` of `asset_in` for `asset_out`, in native decimals.
	pub fn quote_potential_swap(
		&self,
		asset_in: T::AssetId,
		asset_out: T::AssetId,
		amount: Balance,
	) -> Result<TradeQuote, Error> {
		ensure!(!amount.is_zero(), Error::ZeroAmount);
		ensure!(asset_in != asset_out, Error::SameAsset);
		let from = self.snapshot(asset_in)?;
		let to = self.snapshot(asset_out)?;
		let quote = calculate_out_given_in(
			&from,
			&to,
			to_wad(amount, from.decimals)?,
			&self.state.params.swap_parameters(),
		)?;
		Ok(TradeQuote {
			amount: from_wad(quote.amount, to.decimals)?,
			fee: from_wad(quote.fee, to.decimals)?,
		})
	}

	/// Amount of `asset_in` needed to receive `amount_out` of `asset_out`, in native decimals.
	///
	/// The input is a whole number of native units, and swapping it pays at least `amount_out`.
	pub fn quote_amount_in(
		&self,
		asset_in: T::AssetId,
		asset_out: T::AssetId,
		amount_out: Balance,
	) -> Result<TradeQuote, Error> {
		ensure!(!amount_out.is_zero(), Error::ZeroAmount);
		ensure!(asset_in != asset_out, Error::SameAsset);
		let from = self.snapshot(asset_in)?;
		let to = self.snapshot(asset_out)?;
		let quote = calculate_in_given_out(
			&from,
			&to,
			to_wad(amount_out, to.decimals)?,
			&self.state.params.swap_parameters(),
		)?;

		Ok(TradeQuote {
			amount: from_wad(quote.amount, from.decimals)?,
			fee: from_wad(quote.fee, to.decimals)?,
		})
	}

	/// Liability and shares minted for depositing `amount`, in native decimals.
	pub fn quote_potential_deposit(&self, asset_id: T::AssetId, amount: Balance) -> Result<DepositQuote, Error> {
		ensure!(!amount.is_zero(), Error::ZeroAmount);
		let asset = self.asset(asset_id)?;
		Ok(calculate_deposit(
			to_wad(amount, asset.decimals)?,
			asset.reserve(),
			asset.total_supply(),
			self.state.params.amplification,
			self.equilibrium_ratio()?,
		)?)
	}

	/// Amount and fee, in native decimals, paid for burning `shares`.
	pub fn quote_potential_withdraw(&self, asset_id: T::AssetId, shares: Balance) -> Result<WithdrawQuote, Error> {
		ensure!(!shares.is_zero(), Error::ZeroAmount);
		let asset = self.asset(asset_id)?;
		let quote = calculate_withdraw(
			shares,
			asset.total_supply(),
			asset.reserve(),
			self.state.params.amplification,
			self.equilibrium_ratio()?,
			self.state.params.withdrawal_haircut_rate,
		)?;
		Ok(WithdrawQuote {
			amount: from_wad(quote.amount, asset.decimals)?,
			liability: quote.liability,
			fee: from_wad(quote.fee, asset.decimals)?,
		})
	}

	/// Amount of `to_asset`, in native decimals, paid for burning `shares` of `from_asset`.
	pub fn quote_potential_withdraw_from_other_asset(
		&self,
		from_asset: T::AssetId,
		to_asset: T::AssetId,
		shares: Balance,
	) -> Result<WithdrawFromOtherQuote, Error> {
		ensure!(!shares.is_zero(), Error::ZeroAmount);
		ensure!(from_asset != to_asset, Error::SameAsset);
		let quote = self.quote_withdraw_from_other_asset_wad(from_asset, to_asset, shares)?;
		let from_decimals = self.asset(from_asset)?.decimals;
		let to_decimals = self.asset(to_asset)?.decimals;
		Ok(WithdrawFromOtherQuote {
			amount: from_wad(quote.amount, to_decimals)?,
			withdraw: WithdrawQuote {
				amount: from_wad(quote.withdraw.amount, from_decimals)?,
				liability: quote.withdraw.liability,
				fee: from_wad(quote.withdraw.fee, from_decimals)?,
			},
			fee: from_wad(quote.fee, to_decimals)?,
		})
	}

	fn quote_withdraw_from_other_asset_wad(
		&self,
		from_asset: T::AssetId,
		to_asset: T::AssetId,
		shares: Balance,
	) -> Result<WithdrawFromOtherQuote, Error> {
		let from = self.snapshot(from_asset)?;
		let to = self.snapshot(to_asset)?;
		Ok(calculate_withdraw_from_other_asset(
			shares,
			self.asset(from_asset)?.total_supply(),
			&from,
			&to,
			&self.state.params.swap_parameters(),
			self.equilibrium_ratio()?,
			self.state.params.withdrawal_haircut_rate,
		)?)
	}

	/// Register a new asset. Decimals above 18 are not supported.
	pub fn add_asset(&mut self, asset_id: T::AssetId, decimals: u8, price_source: PriceSource) -> Result<(), Error> {
		ensure!(
			decimals <= coverage_math::types::WAD_DECIMALS,
			Error::InvalidParameter
		);
		ensure!(price_source.is_valid(), Error::InvalidParameter);
		ensure!(
			!self.state.assets.contains_key(&asset_id),
			Error::AssetAlreadyRegistered
		);

		self.state.assets.insert(asset_id, Asset::new(decimals, price_source));

		log::info!(target: LOG_TARGET, "asset {:?} added", asset_id);
		self.deposit_event(Event::AssetAdded {
			asset: asset_id,
			decimals,
			price_source,
		});
		Ok(())
	}

	/// Remove an asset. Only possible once all its liability has been withdrawn.
	pub fn remove_asset(&mut self, asset_id: T::AssetId) -> Result<(), Error> {
		ensure!(self.asset(asset_id)?.liability().is_zero(), Error::AssetHasLiability);
		self.state.assets.remove(&asset_id);

		log::info!(target: LOG_TARGET, "asset {:?} removed", asset_id);
		self.deposit_event(Event::AssetRemoved { asset: asset_id });
		Ok(())
	}

	pub fn set_price_source(&mut self, asset_id: T::AssetId, price_source: PriceSource) -> Result<(), Error> {
		ensure!(price_source.is_valid(), Error::InvalidParameter);
		let asset = self
			.state
			.assets
			.get_mut(&asset_id)
			.ok_or(Error::AssetNotRegistered)?;
		asset.price_source = price_source;

		log::info!(target: LOG_TARGET, "asset {:?} price source {:?}", asset_id, price_source);
		self.deposit_event(Event::PriceSourceUpdated {
			asset: asset_id,
			price_source,
		});
		Ok(())
	}

	pub fn set_tradability(&mut self, asset_id: T::AssetId, state: Tradability) -> Result<(), Error> {
		let asset = self
			.state
			.assets
			.get_mut(&asset_id)
			.ok_or(Error::AssetNotRegistered)?;
		asset.tradability = state;

		self.deposit_event(Event::TradabilityUpdated { asset: asset_id, state });
		Ok(())
	}

	pub fn set_params(&mut self, params: PoolParams) -> Result<(), Error> {
		params.validate()?;
		self.state.params = params;

		log::info!(target: LOG_TARGET, "pool parameters updated: {:?}", params);
		self.deposit_event(Event::ParametersUpdated { params });
		Ok(())
	}

	pub fn set_fee_to(&mut self, fee_to: Option<T::AccountId>) {
		self.state.fee_to = fee_to.clone();
		self.deposit_event(Event::FeeToUpdated { fee_to });
	}

	pub fn set_adaptor(&mut self, adaptor: Option<T::AccountId>) {
		self.state.adaptor = adaptor.clone();
		log::info!(target: LOG_TARGET, "cross-chain adaptor updated: {:?}", adaptor);
		self.deposit_event(Event::AdaptorUpdated { adaptor });
	}

	pub fn pause(&mut self) {
		self.state.paused = true;
		self.deposit_event(Event::Paused);
	}

	pub fn unpause(&mut self) {
		self.state.paused = false;
		self.deposit_event(Event::Unpaused);
	}
}
