//! Wallet keypair loading

use anyhow::{anyhow, Context, Result};
use solana_sdk::signature::{read_keypair_file, Keypair};
use std::{fs, path::Path};

/// Loads the signing keypair. Accepts the solana-cli JSON byte-array format,
/// falling back to a base58-encoded secret key for wallet-app exports.
pub fn load_keypair<P: AsRef<Path>>(path: P) -> Result<Keypair> {
    let path = path.as_ref();
    if let Ok(keypair) = read_keypair_file(path) {
        return Ok(keypair);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("read keypair {}", path.display()))?;
    let bytes = bs58::decode(raw.trim()).into_vec().map_err(|e| {
        anyhow!(
            "keypair {} is neither a JSON byte array nor base58: {}",
            path.display(),
            e
        )
    })?;
    Keypair::from_bytes(&bytes).map_err(|e| anyhow!("invalid secret key material: {}", e))
}
