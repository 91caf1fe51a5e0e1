pub use crate::signed::SignedWad;

/// WAD-scaled unsigned quantity (18 decimals).
pub type Balance = u128;

pub const WAD: Balance = 1_000_000_000_000_000_000;
pub const HALF_WAD: Balance = WAD / 2;
pub const WAD_DECIMALS: u8 = 18;
