//! Raydium V4 single-pool support

mod adapter;
mod parser;

pub use adapter::{PoolInfo, PoolQuote, RaydiumV4Pool};
pub use parser::PoolKeys;
