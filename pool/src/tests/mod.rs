use crate::tests::mock::*;
use crate::types::Balance;
use crate::Pool;

mod invariants;
mod migrations;
mod mint_fee;
mod withdraw;

/// Cash plus collected fee of `asset`, the part of the pool balance the ledger accounts for.
pub(crate) fn accounted_balance(pool: &Pool<Test>, asset: AssetId) -> Balance {
	let asset = pool.asset(asset).unwrap();
	asset.cash() + asset.fee_collected()
}
