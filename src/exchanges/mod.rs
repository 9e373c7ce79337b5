//! DEX integrations

pub mod raydium_v4;
