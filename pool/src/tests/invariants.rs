use crate::tests::accounted_balance;
use crate::tests::mock::*;
use crate::types::Balance;
use proptest::prelude::*;

const ASSETS: [(AssetId, Balance); 3] = [(USDC, ONE), (USDT, ONE), (USD6, ONE_USD6)];

#[derive(Clone, Debug)]
enum Operation {
	Swap(usize, usize, Balance),
	Deposit(usize, Balance),
	Withdraw(usize, Balance),
	WithdrawFromOther(usize, usize, Balance),
}

fn asset_index() -> impl Strategy<Value = usize> {
	0..ASSETS.len()
}

fn units() -> impl Strategy<Value = Balance> {
	1..400u128
}

fn operation() -> impl Strategy<Value = Operation> {
	prop_oneof![
		(asset_index(), asset_index(), units()).prop_map(|(a, b, u)| Operation::Swap(a, b, u)),
		(asset_index(), units()).prop_map(|(a, u)| Operation::Deposit(a, u)),
		(asset_index(), units()).prop_map(|(a, u)| Operation::Withdraw(a, u)),
		(asset_index(), asset_index(), units()).prop_map(|(a, b, u)| Operation::WithdrawFromOther(a, b, u)),
	]
}

fn endowments() -> Vec<(AccountId, AssetId, Balance)> {
	ASSETS
		.iter()
		.map(|(asset, one)| (BOB, *asset, 100_000 * one))
		.collect()
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(200))]
	#[test]
	fn ledger_should_stay_backed_by_pool_balance(ops in prop::collection::vec(operation(), 1..20)) {
		ExtBuilder::default()
			.with_endowed_accounts(endowments())
			.with_asset(USDC, 18)
			.with_asset(USDT, 18)
			.with_asset(USD6, 6)
			.with_initial_liquidity(ALICE, USDC, 1_000 * ONE)
			.with_initial_liquidity(ALICE, USDT, 1_000 * ONE)
			.with_initial_liquidity(ALICE, USD6, 1_000 * ONE_USD6)
			.build()
			.execute_with(|pool| {
				for op in ops {
					let before = pool.state().clone();
					let result = match op {
						Operation::Swap(a, b, u) => pool
							.swap(&BOB, ASSETS[a].0, ASSETS[b].0, u * ASSETS[a].1, 0, &BOB, DEADLINE)
							.map(|_| ()),
						Operation::Deposit(a, u) => pool
							.deposit(&BOB, ASSETS[a].0, u * ASSETS[a].1, 0, &ALICE, DEADLINE)
							.map(|_| ()),
						Operation::Withdraw(a, u) => pool
							.withdraw(&ALICE, ASSETS[a].0, u * ONE, 0, &ALICE, DEADLINE)
							.map(|_| ()),
						Operation::WithdrawFromOther(a, b, u) => pool
							.withdraw_from_other_asset(&ALICE, ASSETS[a].0, ASSETS[b].0, u * ONE, 0, &ALICE, DEADLINE)
							.map(|_| ()),
					};
					if result.is_err() {
						prop_assert_eq!(pool.state(), &before);
					}

					for (asset_id, _) in ASSETS {
						let asset = pool.asset(asset_id).unwrap();
						prop_assert!(pool_balance_wad(pool, asset_id) >= accounted_balance(pool, asset_id));
						prop_assert_eq!(asset.liability(), asset.total_supply());
						prop_assert_eq!(asset.total_supply(), pool.shares_of(asset_id, &ALICE));
					}
				}
				Ok(())
			})?;
	}

	#[test]
	fn swap_should_not_return_more_than_round_trip_input(units in 1..500u128) {
		ExtBuilder::default()
			.with_endowed_accounts(endowments())
			.with_stable_assets()
			.with_balanced_liquidity()
			.build()
			.execute_with(|pool| {
				let amount = units * ONE;
				let (out, _) = pool.swap(&BOB, USDC, USDT, amount, 0, &BOB, DEADLINE).unwrap();
				let (back, _) = pool.swap(&BOB, USDT, USDC, out, 0, &BOB, DEADLINE).unwrap();
				prop_assert!(back <= amount);
				Ok(())
			})?;
	}
}
