use solana_client::rpc_client::RpcClient;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::Account as TokenAccount;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::parser::{self, PoolKeys};
use crate::error::SwapError;
use crate::math::TARGET_DECIMALS;

pub const RAYDIUM_V4_PROGRAM: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
pub const RAYDIUM_V4_AUTHORITY: &str = "5Q544fKrFoe6tsEbD7S8EmxGTJYAKtTVhAW5Q5pge4j1";
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

// swap_base_in: the input amount is fixed, the output floats above min_out.
const SWAP_BASE_IN_TAG: u8 = 9;

/// A fresh price observation for the configured pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolQuote {
    pub pool_id: Pubkey,
    /// Target-token units per SOL.
    pub price: f64,
}

/// One read of the pool: the quote plus the account keys needed to build the
/// swap instruction against the same state.
#[derive(Debug, Clone, Copy)]
pub struct PoolInfo {
    pub quote: PoolQuote,
    pub keys: PoolKeys,
}

pub struct RaydiumV4Pool {
    client: Arc<RpcClient>,
    pool_id: Pubkey,
    target_mint: Pubkey,
}

impl RaydiumV4Pool {
    pub fn new(client: Arc<RpcClient>, pool_id: Pubkey, target_mint: Pubkey) -> Self {
        Self {
            client,
            pool_id,
            target_mint,
        }
    }

    /// Fetches the pool account, validates its owner, and derives a fresh
    /// price from the vault reserves. Nothing is cached across calls.
    pub async fn fetch_pool_info(&self) -> Result<PoolInfo, SwapError> {
        info!("📡 Fetching pool info for {}", self.pool_id);
        let account = self.client.get_account(&self.pool_id).map_err(|e| {
            SwapError::PoolUnavailable(format!("fetch pool {}: {}", self.pool_id, e))
        })?;

        let program = known_key(RAYDIUM_V4_PROGRAM)?;
        if account.owner != program {
            return Err(SwapError::PoolUnavailable(format!(
                "invalid pool owner: expected {}, got {}",
                program, account.owner
            )));
        }

        let keys = parser::parse_pool_account(&account.data)?;
        let (sol_vault, target_vault) = self.orient_vaults(&keys)?;

        let sol_reserve = self.vault_balance(&sol_vault)?;
        let target_reserve = self.vault_balance(&target_vault)?;
        if sol_reserve == 0 {
            return Err(SwapError::PoolUnavailable(format!(
                "pool {} has an empty SOL vault",
                self.pool_id
            )));
        }

        let sol_ui = sol_reserve as f64 / LAMPORTS_PER_SOL as f64;
        let target_ui = target_reserve as f64 / 10f64.powi(TARGET_DECIMALS as i32);
        let price = target_ui / sol_ui;
        if price <= 0.0 {
            return Err(SwapError::PoolUnavailable(format!(
                "pool {} produced a non-positive price",
                self.pool_id
            )));
        }

        info!(
            "📊 Pool reserves: {:.6} SOL / {:.6} tokens, price {:.8} tokens per SOL",
            sol_ui, target_ui, price
        );
        Ok(PoolInfo {
            quote: PoolQuote {
                pool_id: self.pool_id,
                price,
            },
            keys,
        })
    }

    /// Builds the fixed-side-in swap instruction carrying the scaled input
    /// amount and the slippage-bounded minimum output.
    pub fn swap_instruction(
        &self,
        keys: &PoolKeys,
        user: &Pubkey,
        is_buy: bool,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<Instruction, SwapError> {
        let program = known_key(RAYDIUM_V4_PROGRAM)?;
        let authority = known_key(RAYDIUM_V4_AUTHORITY)?;
        let token_program = known_key(TOKEN_PROGRAM)?;
        let wsol = known_key(WSOL_MINT)?;

        let (source_mint, dest_mint) = if is_buy {
            (wsol, self.target_mint)
        } else {
            (self.target_mint, wsol)
        };
        let user_source = get_associated_token_address(user, &source_mint);
        let user_dest = get_associated_token_address(user, &dest_mint);

        let mut data = Vec::with_capacity(17);
        data.push(SWAP_BASE_IN_TAG);
        data.extend_from_slice(&amount_in.to_le_bytes());
        data.extend_from_slice(&min_amount_out.to_le_bytes());

        let accounts = vec![
            AccountMeta::new_readonly(token_program, false),
            AccountMeta::new(self.pool_id, false),
            AccountMeta::new_readonly(authority, false),
            AccountMeta::new(keys.base_vault, false),
            AccountMeta::new(keys.quote_vault, false),
            AccountMeta::new(user_source, false),
            AccountMeta::new(user_dest, false),
            AccountMeta::new_readonly(*user, true),
        ];

        Ok(Instruction {
            program_id: program,
            accounts,
            data,
        })
    }

    /// Maps the parsed vaults onto (SOL vault, target vault) regardless of
    /// which side of the pool holds WSOL.
    fn orient_vaults(&self, keys: &PoolKeys) -> Result<(Pubkey, Pubkey), SwapError> {
        let wsol = known_key(WSOL_MINT)?;
        if keys.base_mint == wsol && keys.quote_mint == self.target_mint {
            Ok((keys.base_vault, keys.quote_vault))
        } else if keys.quote_mint == wsol && keys.base_mint == self.target_mint {
            Ok((keys.quote_vault, keys.base_vault))
        } else {
            Err(SwapError::PoolUnavailable(format!(
                "pool {} does not pair {} with WSOL",
                self.pool_id, self.target_mint
            )))
        }
    }

    fn vault_balance(&self, vault: &Pubkey) -> Result<u64, SwapError> {
        let account = self
            .client
            .get_account(vault)
            .map_err(|e| SwapError::PoolUnavailable(format!("fetch vault {}: {}", vault, e)))?;
        let token_account = TokenAccount::unpack(&account.data).map_err(|e| {
            SwapError::PoolUnavailable(format!("parse vault {}: {}", vault, e))
        })?;
        Ok(token_account.amount)
    }
}

fn known_key(value: &str) -> Result<Pubkey, SwapError> {
    Pubkey::from_str(value)
        .map_err(|e| SwapError::Config(format!("invalid builtin address {}: {}", value, e)))
}
