//! Error taxonomy for the swap pipeline

use thiserror::Error;

/// Every way a swap invocation can fail. All variants are fatal for the
/// current invocation; only `Submission` is retried before becoming fatal.
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid trade amount: {0}")]
    InvalidAmount(f64),

    #[error("Invalid slippage {0}: must be within [0, 1)")]
    InvalidSlippage(f64),

    #[error("Insufficient balance: {actual} < {required}")]
    InsufficientBalance { actual: f64, required: f64 },

    #[error("Balance query failed: {0}")]
    BalanceQuery(String),

    #[error("Pool unavailable: {0}")]
    PoolUnavailable(String),

    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("Transaction expired: confirmation not seen before block height {0}")]
    TransactionExpired(u64),

    #[error("Confirmation error: {0}")]
    Confirmation(String),
}
