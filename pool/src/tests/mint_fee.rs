use crate::tests::mock::*;
use crate::types::{Balance, PoolParams};
use crate::{assert_balance, Event};
use pretty_assertions::assert_eq;

const FEE: Balance = 49_969_808_781_523_029;
const DIVIDEND: Balance = 12_492_452_195_380_757;
const LP_DIVIDEND: Balance = 24_984_904_390_761_515;
const CASH_AFTER_SWAP: Balance = 900_060_382_436_953_943_000;

fn swapped_pool() -> ExtBuilder {
	ExtBuilder::default()
		.with_endowed_accounts(vec![(BOB, USDC, 100 * ONE)])
		.with_stable_assets()
		.with_balanced_liquidity()
}

#[test]
fn mint_fee_should_split_collected_fee() {
	swapped_pool().with_fee_to(FEE_RECEIVER).build().execute_with(|pool| {
		pool.swap(&BOB, USDC, USDT, 100 * ONE, 0, &BOB, DEADLINE).unwrap();
		pool.take_events();

		assert_eq!(pool.mint_fee(USDT), Ok(FEE));

		let asset = pool.asset(USDT).unwrap();
		assert_eq!(asset.fee_collected(), 0);
		assert_eq!(asset.cash(), CASH_AFTER_SWAP + LP_DIVIDEND);
		assert_eq!(asset.liability(), 1_000 * ONE + 24_985_825_115_190_833);
		assert_eq!(asset.total_supply(), 1_000 * ONE);
		assert_balance!(FEE_RECEIVER, USDT, DIVIDEND);

		assert_eq!(
			pool.events(),
			&[Event::FeeMinted {
				asset: USDT,
				dividend: DIVIDEND,
				lp_dividend: LP_DIVIDEND,
				retained: 12_492_452_195_380_757,
			}]
		);
	});
}

#[test]
fn mint_fee_should_retain_dividend_when_fee_receiver_is_not_set() {
	swapped_pool().build().execute_with(|pool| {
		pool.swap(&BOB, USDC, USDT, 100 * ONE, 0, &BOB, DEADLINE).unwrap();
		pool.take_events();

		assert_eq!(pool.mint_fee(USDT), Ok(FEE));
		assert_eq!(pool.asset(USDT).unwrap().cash(), CASH_AFTER_SWAP + LP_DIVIDEND);
		assert_eq!(
			pool.events(),
			&[Event::FeeMinted {
				asset: USDT,
				dividend: 0,
				lp_dividend: LP_DIVIDEND,
				retained: FEE - LP_DIVIDEND,
			}]
		);
	});
}

#[test]
fn mint_fee_should_do_nothing_when_no_fee_was_collected() {
	swapped_pool().with_fee_to(FEE_RECEIVER).build().execute_with(|pool| {
		let before = pool.state().clone();
		assert_eq!(pool.mint_fee(USDC), Ok(0));
		assert_eq!(*pool.state(), before);
		assert!(pool.events().is_empty());
		assert_balance!(FEE_RECEIVER, USDC, 0);
	});
}

#[test]
fn liquidity_change_should_mint_fee_when_threshold_is_reached() {
	swapped_pool()
		.with_params(PoolParams {
			mint_fee_threshold: ONE / 100,
			..default_params()
		})
		.with_fee_to(FEE_RECEIVER)
		.build()
		.execute_with(|pool| {
			pool.swap(&BOB, USDC, USDT, 100 * ONE, 0, &BOB, DEADLINE).unwrap();
			pool.take_events();

			pool.withdraw(&ALICE, USDT, ONE, 0, &ALICE, DEADLINE).unwrap();

			let events = pool.take_events();
			assert_eq!(events.len(), 2);
			assert_eq!(
				events[0],
				Event::FeeMinted {
					asset: USDT,
					dividend: DIVIDEND,
					lp_dividend: LP_DIVIDEND,
					retained: 12_492_452_195_380_757,
				}
			);
			assert!(matches!(events[1], Event::Withdrawn { asset: USDT, .. }));
			assert_balance!(FEE_RECEIVER, USDT, DIVIDEND);
		});
}

#[test]
fn liquidity_change_should_not_mint_fee_below_threshold() {
	swapped_pool().with_fee_to(FEE_RECEIVER).build().execute_with(|pool| {
		pool.swap(&BOB, USDC, USDT, 100 * ONE, 0, &BOB, DEADLINE).unwrap();

		pool.withdraw(&ALICE, USDT, ONE, 0, &ALICE, DEADLINE).unwrap();

		assert_eq!(pool.asset(USDT).unwrap().fee_collected(), FEE);
		assert_balance!(FEE_RECEIVER, USDT, 0);
	});
}
