//! Pre-trade balance verification

use async_trait::async_trait;
use solana_client::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::Account as TokenAccount;
use std::sync::Arc;
use tracing::info;

use crate::error::SwapError;
use crate::math::TARGET_DECIMALS;

/// Read-only view over the wallet's on-chain balances.
#[async_trait]
pub trait BalanceSource {
    /// Wallet SOL balance in whole SOL.
    async fn sol_balance(&self) -> Result<f64, SwapError>;

    /// Wallet balance of `mint` in whole tokens; 0 when no token account
    /// exists yet.
    async fn token_balance(&self, mint: &Pubkey) -> Result<f64, SwapError>;
}

pub struct RpcBalanceSource {
    client: Arc<RpcClient>,
    owner: Pubkey,
}

impl RpcBalanceSource {
    pub fn new(client: Arc<RpcClient>, owner: Pubkey) -> Self {
        Self { client, owner }
    }
}

#[async_trait]
impl BalanceSource for RpcBalanceSource {
    async fn sol_balance(&self) -> Result<f64, SwapError> {
        let lamports = self
            .client
            .get_balance(&self.owner)
            .map_err(|e| SwapError::BalanceQuery(format!("SOL balance: {}", e)))?;
        Ok(lamports as f64 / LAMPORTS_PER_SOL as f64)
    }

    async fn token_balance(&self, mint: &Pubkey) -> Result<f64, SwapError> {
        let ata = get_associated_token_address(&self.owner, mint);
        let response = self
            .client
            .get_account_with_commitment(&ata, CommitmentConfig::confirmed())
            .map_err(|e| SwapError::BalanceQuery(format!("token balance: {}", e)))?;

        let Some(account) = response.value else {
            return Ok(0.0);
        };
        let token_account = TokenAccount::unpack(&account.data)
            .map_err(|e| SwapError::BalanceQuery(format!("token account parse: {}", e)))?;
        Ok(token_account.amount as f64 / 10f64.powi(TARGET_DECIMALS as i32))
    }
}

/// Direction-aware pre-trade guard: one read-only balance query, no state
/// mutation. Selling checks the target-token balance, buying the SOL balance.
pub async fn ensure_funds(
    source: &dyn BalanceSource,
    mint: &Pubkey,
    is_buy: bool,
    amount_in: f64,
) -> Result<(), SwapError> {
    let actual = if is_buy {
        source.sol_balance().await?
    } else {
        source.token_balance(mint).await?
    };
    info!(
        "💰 Current {} balance: {}",
        if is_buy { "SOL" } else { "token" },
        actual
    );

    if actual < amount_in {
        return Err(SwapError::InsufficientBalance {
            actual,
            required: amount_in,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubBalances {
        sol: f64,
        tokens: f64,
        sol_calls: AtomicU32,
        token_calls: AtomicU32,
        fail: bool,
    }

    impl StubBalances {
        fn new(sol: f64, tokens: f64) -> Self {
            Self {
                sol,
                tokens,
                sol_calls: AtomicU32::new(0),
                token_calls: AtomicU32::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            let mut stub = Self::new(0.0, 0.0);
            stub.fail = true;
            stub
        }
    }

    #[async_trait]
    impl BalanceSource for StubBalances {
        async fn sol_balance(&self) -> Result<f64, SwapError> {
            self.sol_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SwapError::BalanceQuery("rpc down".to_string()));
            }
            Ok(self.sol)
        }

        async fn token_balance(&self, _mint: &Pubkey) -> Result<f64, SwapError> {
            self.token_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SwapError::BalanceQuery("rpc down".to_string()));
            }
            Ok(self.tokens)
        }
    }

    #[tokio::test]
    async fn test_buy_with_short_sol_balance_fails() {
        let stub = StubBalances::new(5.0, 0.0);
        let mint = Pubkey::new_unique();

        let err = ensure_funds(&stub, &mint, true, 10.0).await.unwrap_err();
        match err {
            SwapError::InsufficientBalance { actual, required } => {
                assert_eq!(actual, 5.0);
                assert_eq!(required, 10.0);
            }
            other => panic!("unexpected error: {}", other),
        }
        // The buy path issues exactly one SOL query and never touches the
        // token account.
        assert_eq!(stub.sol_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.token_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sell_with_short_token_balance_fails() {
        let stub = StubBalances::new(100.0, 40.0);
        let mint = Pubkey::new_unique();

        let err = ensure_funds(&stub, &mint, false, 100.0).await.unwrap_err();
        assert!(matches!(err, SwapError::InsufficientBalance { .. }));
        assert_eq!(stub.sol_calls.load(Ordering::SeqCst), 0);
        assert_eq!(stub.token_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sufficient_balance_passes() {
        let stub = StubBalances::new(1.0, 500.0);
        let mint = Pubkey::new_unique();

        ensure_funds(&stub, &mint, true, 0.5).await.unwrap();
        ensure_funds(&stub, &mint, false, 500.0).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_error_propagates_unretried() {
        let stub = StubBalances::failing();
        let mint = Pubkey::new_unique();

        let err = ensure_funds(&stub, &mint, true, 1.0).await.unwrap_err();
        assert!(matches!(err, SwapError::BalanceQuery(_)));
        assert_eq!(stub.sol_calls.load(Ordering::SeqCst), 1);
    }
}
