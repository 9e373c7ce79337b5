// src/app.rs
//! Swap orchestrator: sequences quote fetch, balance guard, transaction
//! build/sign, retried submission, and the confirmation wait.

use anyhow::Result;
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Signature, Signer};
use solana_sdk::transaction::Transaction;
use solana_transaction_status::TransactionConfirmationStatus;
use std::time::Duration;
use tracing::info;

use crate::balance::{self, RpcBalanceSource};
use crate::config::Config;
use crate::error::SwapError;
use crate::exchanges::raydium_v4::RaydiumV4Pool;
use crate::math::{self, SwapRequest};
use crate::report::{PriceReport, SwapReport};
use crate::retry;
use crate::session::rpc_session;
use crate::wallet;

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Runs one swap attempt end to end. Exactly one result per invocation: the
/// confirmed-swap report, or the first fatal error.
pub async fn run_swap(
    cfg: &Config,
    amount: f64,
    is_buy: bool,
    mint: &str,
    slippage: f64,
) -> Result<SwapReport> {
    // The CLI mint must match the configured target before anything runs.
    if mint != cfg.target_token.mint_address {
        return Err(SwapError::Config(format!(
            "token mint mismatch: expected {}, got {}",
            cfg.target_token.mint_address, mint
        ))
        .into());
    }
    let request = SwapRequest::new(amount, is_buy, slippage)?;
    info!(
        "🚀 Starting swap: amount={}, side={}, slippage={}, ticker={}",
        request.amount_in,
        if request.is_buy { "buy" } else { "sell" },
        request.slippage,
        cfg.target_token.ticker
    );

    let pool_id = parse_address(&cfg.target_token.pair_address, "pair_address")?;
    let target_mint = parse_address(&cfg.target_token.mint_address, "mint_address")?;

    // Init: shared session handle, built once per process.
    let client = rpc_session(&cfg.rpc.url);
    let keypair = wallet::load_keypair(&cfg.wallet.keypair)?;
    info!("🔑 Wallet: {}", keypair.pubkey());

    // Init -> QuoteFetched. Always a fresh read, never cached.
    let pool = RaydiumV4Pool::new(client.clone(), pool_id, target_mint);
    let pool_info = pool.fetch_pool_info().await?;

    // QuoteFetched -> BalanceChecked.
    let balances = RpcBalanceSource::new(client.clone(), keypair.pubkey());
    balance::ensure_funds(&balances, &target_mint, request.is_buy, request.amount_in).await?;

    // BalanceChecked -> TransactionBuilt.
    let amounts = math::compute_amounts(&request, pool_info.quote.price)?;
    info!(
        "📊 Price {:.8} {}/SOL, scaled in {}, expected out {:.6}, min out {}",
        pool_info.quote.price,
        cfg.target_token.ticker,
        amounts.amount_in,
        amounts.expected_out,
        amounts.min_amount_out
    );
    let instruction = pool.swap_instruction(
        &pool_info.keys,
        &keypair.pubkey(),
        request.is_buy,
        amounts.amount_in,
        amounts.min_amount_out,
    )?;

    // TransactionBuilt -> Signed: latest block reference plus expiry height.
    let (blockhash, last_valid_block_height) = client
        .get_latest_blockhash_with_commitment(client.commitment())
        .map_err(|e| SwapError::Submission(format!("latest blockhash: {}", e)))?;
    let mut transaction = Transaction::new_with_payer(&[instruction], Some(&keypair.pubkey()));
    transaction.sign(&[&keypair], blockhash);
    if let Ok(bytes) = bincode::serialize(&transaction) {
        info!(
            "📝 Signed transaction: {} bytes, valid until block height {}",
            bytes.len(),
            last_valid_block_height
        );
    }

    // Signed -> Submitted. The signed transaction is reused across attempts;
    // the quote and balance are not refreshed (accepted staleness).
    let signature = retry::with_retries(
        retry::DEFAULT_MAX_ATTEMPTS,
        retry::DEFAULT_RETRY_DELAY,
        || {
            let client = client.clone();
            let transaction = transaction.clone();
            async move {
                client
                    .send_transaction_with_config(
                        &transaction,
                        RpcSendTransactionConfig {
                            skip_preflight: false,
                            preflight_commitment: Some(CommitmentLevel::Confirmed),
                            ..RpcSendTransactionConfig::default()
                        },
                    )
                    .map_err(|e| SwapError::Submission(e.to_string()))
            }
        },
    )
    .await?;
    info!("📤 Transaction sent: {}", signature);

    // Submitted -> Confirmed.
    await_confirmation(&client, &signature, last_valid_block_height).await?;
    info!("✅ Swap confirmed: {}", signature);

    Ok(SwapReport::new(
        cfg.target_token.ticker.clone(),
        request.is_buy,
        request.amount_in,
        pool_info.quote.price,
        amounts.min_amount_out,
        signature.to_string(),
    ))
}

/// Fetches the current pool price without trading.
pub async fn run_price(cfg: &Config) -> Result<PriceReport> {
    let pool_id = parse_address(&cfg.target_token.pair_address, "pair_address")?;
    let target_mint = parse_address(&cfg.target_token.mint_address, "mint_address")?;

    let client = rpc_session(&cfg.rpc.url);
    let pool = RaydiumV4Pool::new(client, pool_id, target_mint);
    let pool_info = pool.fetch_pool_info().await?;

    Ok(PriceReport::new(
        cfg.target_token.ticker.clone(),
        pool_info.quote.price,
    ))
}

/// Blocks until the network reports the signature confirmed, the expiry
/// height passes, or the status poll itself fails.
async fn await_confirmation(
    client: &RpcClient,
    signature: &Signature,
    last_valid_block_height: u64,
) -> Result<(), SwapError> {
    loop {
        let statuses = client
            .get_signature_statuses(&[*signature])
            .map_err(|e| SwapError::Confirmation(e.to_string()))?;

        if let Some(status) = statuses.value.first().and_then(|s| s.as_ref()) {
            if let Some(err) = &status.err {
                return Err(SwapError::Confirmation(format!(
                    "transaction failed on chain: {}",
                    err
                )));
            }
            if matches!(
                status.confirmation_status,
                Some(TransactionConfirmationStatus::Confirmed)
                    | Some(TransactionConfirmationStatus::Finalized)
            ) {
                return Ok(());
            }
        }

        let block_height = client
            .get_block_height()
            .map_err(|e| SwapError::Confirmation(e.to_string()))?;
        if block_height > last_valid_block_height {
            return Err(SwapError::TransactionExpired(last_valid_block_height));
        }

        tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
    }
}

fn parse_address(value: &str, field: &str) -> Result<Pubkey, SwapError> {
    value
        .parse()
        .map_err(|e| SwapError::Config(format!("invalid {} {}: {}", field, value, e)))
}
