use crate::asset::Asset;
use crate::migrations::v1::v0;
use crate::tests::mock::*;
use crate::types::{PoolParams, PoolState, StorageVersion, STORAGE_VERSION};
use crate::{Error, Pool};
use codec::Encode;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn v0_state() -> v0::PoolState<AccountId, AssetId> {
	let mut assets = BTreeMap::new();
	assets.insert(
		USDC,
		v0::Asset {
			cash: 1_100 * ONE,
			liability: 1_000 * ONE,
			total_supply: 1_000 * ONE,
			fee_collected: ONE / 10,
			decimals: 18,
		},
	);
	assets.insert(
		USD6,
		v0::Asset {
			cash: 900 * ONE,
			liability: 1_000 * ONE,
			total_supply: 990 * ONE,
			fee_collected: 0,
			decimals: 6,
		},
	);
	let mut shares = BTreeMap::new();
	shares.insert((USDC, ALICE), 1_000 * ONE);
	shares.insert((USD6, BOB), 990 * ONE);

	v0::PoolState {
		params: v0::PoolParams {
			amplification: AMPLIFICATION,
			haircut_rate: HAIRCUT,
			fee_band: None,
			lp_dividend_ratio: ONE / 2,
			retention_ratio: ONE / 4,
			mint_fee_threshold: 10 * ONE,
		},
		assets,
		shares,
		fee_to: Some(FEE_RECEIVER),
		paused: true,
	}
}

#[test]
fn encoded_state_should_load_unchanged() {
	ExtBuilder::default()
		.with_stable_assets()
		.with_balanced_liquidity()
		.with_credit(default_credit_params())
		.with_fee_to(FEE_RECEIVER)
		.build()
		.execute_with(|pool| {
			let encoded = pool.encode_state();
			let loaded = Pool::<Test>::decode_state(&encoded).unwrap();
			assert_eq!(loaded.state(), pool.state());
			assert!(loaded.events().is_empty());
		});
}

#[test]
fn v0_state_should_be_migrated() {
	let encoded = (StorageVersion::new(0), v0_state()).encode();

	let pool = Pool::<Test>::decode_state(&encoded).unwrap();
	let state = pool.state();

	assert_eq!(
		state.params,
		PoolParams {
			amplification: AMPLIFICATION,
			haircut_rate: HAIRCUT,
			fee_band: None,
			withdrawal_haircut_rate: 0,
			lp_dividend_ratio: ONE / 2,
			retention_ratio: ONE / 4,
			mint_fee_threshold: 10 * ONE,
			global_equilibrium: false,
		}
	);
	assert_eq!(
		state.assets.get(&USDC),
		Some(&Asset::from_parts(1_100 * ONE, 1_000 * ONE, 1_000 * ONE, ONE / 10, 18))
	);
	assert_eq!(
		state.assets.get(&USD6),
		Some(&Asset::from_parts(900 * ONE, 1_000 * ONE, 990 * ONE, 0, 6))
	);
	assert_eq!(pool.shares_of(USD6, &BOB), 990 * ONE);
	assert_eq!(state.fee_to, Some(FEE_RECEIVER));
	assert_eq!(state.adaptor, None);
	assert_eq!(state.credit, None);
	assert!(state.paused);

	assert_eq!(
		Pool::<Test>::decode_state(&pool.encode_state()).unwrap().state(),
		state
	);
}

#[test]
fn decode_state_should_reject_unknown_version() {
	let encoded = (StorageVersion::new(STORAGE_VERSION.0 + 1), v0_state()).encode();
	assert_eq!(
		Pool::<Test>::decode_state(&encoded).err(),
		Some(Error::UnsupportedVersion)
	);
}

#[test]
fn decode_state_should_reject_corrupted_state() {
	let mut encoded = (StorageVersion::new(0), v0_state()).encode();
	encoded.truncate(encoded.len() - 1);
	assert_eq!(Pool::<Test>::decode_state(&encoded).err(), Some(Error::CorruptedState));

	let mut encoded = (STORAGE_VERSION, PoolState::<AccountId, AssetId>::new(default_params())).encode();
	encoded.push(0);
	assert_eq!(Pool::<Test>::decode_state(&encoded).err(), Some(Error::CorruptedState));

	assert_eq!(Pool::<Test>::decode_state(&[]).err(), Some(Error::CorruptedState));
}

#[test]
fn v0_state_with_invalid_params_should_be_rejected() {
	let mut state = v0_state();
	state.params.amplification = 0;
	let encoded = (StorageVersion::new(0), state).encode();
	assert_eq!(Pool::<Test>::decode_state(&encoded).err(), Some(Error::CorruptedState));
}
