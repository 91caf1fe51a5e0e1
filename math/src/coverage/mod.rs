mod credit;
mod math;

#[cfg(test)]
pub mod tests;

pub mod types;

pub use credit::*;
pub use math::*;
