// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::SwapError;

#[derive(Debug, Clone, Deserialize)]
pub struct RpcCfg {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletCfg {
    pub keypair: String,
}

/// The immutable target-token record for the process's lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetTokenCfg {
    pub pair_address: String,
    pub mint_address: String,
    pub ticker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc: RpcCfg,
    pub wallet: WalletCfg,
    pub target_token: TargetTokenCfg,
}

impl Config {
    /// Reads and validates the config before any network activity.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read config {}", path.as_ref().display()))?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// All three target-token fields must be non-empty.
    pub fn validate(&self) -> Result<(), SwapError> {
        let required = [
            ("target_token.pair_address", &self.target_token.pair_address),
            ("target_token.mint_address", &self.target_token.mint_address),
            ("target_token.ticker", &self.target_token.ticker),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(SwapError::Config(format!("missing required field {}", field)));
            }
        }
        Ok(())
    }
}
