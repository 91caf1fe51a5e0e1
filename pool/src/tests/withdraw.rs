use crate::asset::Asset;
use crate::tests::mock::*;
use crate::types::{PoolParams, PoolState, Tradability};
use crate::{assert_balance, assert_noop, Error, Event, Pool};
use pretty_assertions::assert_eq;

#[test]
fn withdraw_should_pay_out_liability_when_asset_is_fully_covered() {
	ExtBuilder::default()
		.with_stable_assets()
		.with_balanced_liquidity()
		.build()
		.execute_with(|pool| {
			assert_eq!(pool.withdraw(&ALICE, USDC, 100 * ONE, 0, &ALICE, DEADLINE), Ok(100 * ONE));

			let asset = pool.asset(USDC).unwrap();
			assert_eq!(asset.cash(), 900 * ONE);
			assert_eq!(asset.liability(), 900 * ONE);
			assert_eq!(asset.total_supply(), 900 * ONE);
			assert_eq!(pool.shares_of(USDC, &ALICE), 900 * ONE);
			assert_balance!(ALICE, USDC, 100 * ONE);
			assert_balance!(POOL, USDC, 900 * ONE);

			assert_eq!(
				pool.events(),
				&[Event::Withdrawn {
					who: ALICE,
					asset: USDC,
					amount: 100 * ONE,
					liability: 100 * ONE,
					shares: 100 * ONE,
					fee: 0,
					to: ALICE,
				}]
			);
		});
}

#[test]
fn withdraw_should_collect_withdrawal_haircut() {
	ExtBuilder::default()
		.with_params(PoolParams {
			withdrawal_haircut_rate: ONE / 1000,
			..default_params()
		})
		.with_stable_assets()
		.with_balanced_liquidity()
		.build()
		.execute_with(|pool| {
			let expected = 99_900_000_000_000_000_000;
			assert_eq!(pool.withdraw(&ALICE, USDC, 100 * ONE, 0, &BOB, DEADLINE), Ok(expected));

			let asset = pool.asset(USDC).unwrap();
			assert_eq!(asset.cash(), 900 * ONE);
			assert_eq!(asset.fee_collected(), ONE / 10);
			assert_balance!(BOB, USDC, expected);
			assert_balance!(POOL, USDC, 1_000 * ONE - expected);
		});
}

#[test]
fn withdraw_should_pay_less_when_asset_is_under_covered() {
	ExtBuilder::default()
		.with_endowed_accounts(vec![(BOB, USDC, 100 * ONE)])
		.with_stable_assets()
		.with_balanced_liquidity()
		.build()
		.execute_with(|pool| {
			pool.swap(&BOB, USDC, USDT, 100 * ONE, 0, &BOB, DEADLINE).unwrap();

			assert_eq!(
				pool.withdraw(&ALICE, USDT, 100 * ONE, 0, &ALICE, DEADLINE),
				Ok(99_995_854_693_696_066_236)
			);
		});
}

#[test]
fn withdraw_should_remove_share_entry_when_all_shares_are_burned() {
	ExtBuilder::default()
		.with_stable_assets()
		.with_balanced_liquidity()
		.build()
		.execute_with(|pool| {
			assert_eq!(
				pool.withdraw(&ALICE, USDC, 1_000 * ONE, 0, &ALICE, DEADLINE),
				Ok(1_000 * ONE)
			);

			assert_eq!(pool.shares_of(USDC, &ALICE), 0);
			assert!(!pool.state().shares.contains_key(&(USDC, ALICE)));
			assert_eq!(pool.asset(USDC).unwrap().liability(), 0);
			assert_eq!(pool.remove_asset(USDC), Ok(()));
		});
}

#[test]
fn withdraw_should_fail_when_account_has_not_enough_shares() {
	ExtBuilder::default()
		.with_stable_assets()
		.with_balanced_liquidity()
		.build()
		.execute_with(|pool| {
			assert_noop!(
				pool,
				pool.withdraw(&BOB, USDC, ONE, 0, &BOB, DEADLINE),
				Error::InsufficientShares
			);
			assert_noop!(
				pool,
				pool.withdraw(&ALICE, USDC, 1_000 * ONE + 1, 0, &ALICE, DEADLINE),
				Error::InsufficientShares
			);
		});
}

#[test]
fn withdraw_should_fail_when_minimum_amount_is_not_reached() {
	ExtBuilder::default()
		.with_stable_assets()
		.with_balanced_liquidity()
		.build()
		.execute_with(|pool| {
			assert_noop!(
				pool,
				pool.withdraw(&ALICE, USDC, 100 * ONE, 100 * ONE + 1, &ALICE, DEADLINE),
				Error::SlippageExceeded
			);
		});
}

#[test]
fn withdraw_should_fail_when_request_is_invalid() {
	ExtBuilder::default()
		.with_stable_assets()
		.with_balanced_liquidity()
		.build()
		.execute_with(|pool| {
			assert_noop!(pool, pool.withdraw(&ALICE, USDC, 0, 0, &ALICE, DEADLINE), Error::ZeroAmount);
			assert_noop!(pool, pool.withdraw(&ALICE, USDC, ONE, 0, &0, DEADLINE), Error::ZeroAddress);

			Timestamp::set(DEADLINE + 1);
			assert_noop!(pool, pool.withdraw(&ALICE, USDC, ONE, 0, &ALICE, DEADLINE), Error::Expired);
		});
}

#[test]
fn withdraw_should_fail_when_removing_liquidity_is_not_allowed() {
	ExtBuilder::default()
		.with_stable_assets()
		.with_balanced_liquidity()
		.build()
		.execute_with(|pool| {
			pool.set_tradability(USDC, Tradability::FROZEN).unwrap();
			assert_noop!(pool, pool.withdraw(&ALICE, USDC, ONE, 0, &ALICE, DEADLINE), Error::NotAllowed);
		});
}

#[test]
fn withdraw_should_fail_when_coverage_ratio_would_drop_below_minimum() {
	let mut state = PoolState::new(default_params());
	state
		.assets
		.insert(USDC, Asset::from_parts(20 * ONE, 1_000 * ONE, 1_000 * ONE, 0, 18));
	state.shares.insert((USDC, ALICE), 1_000 * ONE);

	ExtBuilder::default().build().execute_with(|_| {
		Tokens::deposit(USDC, &POOL, 20 * ONE);
		let mut pool = Pool::<Test>::from_state(state);

		assert_noop!(
			pool,
			pool.withdraw(&ALICE, USDC, 500 * ONE, 0, &ALICE, DEADLINE),
			Error::CoverageRatioTooLow
		);
		assert_eq!(
			pool.withdraw(&ALICE, USDC, 100 * ONE, 0, &ALICE, DEADLINE),
			Ok(9_867_911_283_256_271_546)
		);
	});
}
