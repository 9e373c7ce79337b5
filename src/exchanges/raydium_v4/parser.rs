use solana_sdk::pubkey::Pubkey;

use crate::error::SwapError;

// Known positions in the Raydium V4 AMM account layout.
const BASE_VAULT_OFFSET: usize = 336;
const QUOTE_VAULT_OFFSET: usize = 368;
const BASE_MINT_OFFSET: usize = 400;
const QUOTE_MINT_OFFSET: usize = 432;
const MIN_ACCOUNT_LEN: usize = 500;

/// Mint and vault addresses parsed out of a V4 pool account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolKeys {
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
}

pub fn parse_pool_account(data: &[u8]) -> Result<PoolKeys, SwapError> {
    if data.len() < MIN_ACCOUNT_LEN {
        return Err(SwapError::PoolUnavailable(format!(
            "pool account too short: {} bytes",
            data.len()
        )));
    }

    Ok(PoolKeys {
        base_mint: read_pubkey(data, BASE_MINT_OFFSET)?,
        quote_mint: read_pubkey(data, QUOTE_MINT_OFFSET)?,
        base_vault: read_pubkey(data, BASE_VAULT_OFFSET)?,
        quote_vault: read_pubkey(data, QUOTE_VAULT_OFFSET)?,
    })
}

fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey, SwapError> {
    data.get(offset..offset + 32)
        .and_then(|slice| Pubkey::try_from(slice).ok())
        .ok_or_else(|| {
            SwapError::PoolUnavailable(format!("pubkey out of bounds at offset {}", offset))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_account_with(keys: &PoolKeys) -> Vec<u8> {
        let mut data = vec![0u8; 752];
        data[BASE_MINT_OFFSET..BASE_MINT_OFFSET + 32].copy_from_slice(keys.base_mint.as_ref());
        data[QUOTE_MINT_OFFSET..QUOTE_MINT_OFFSET + 32].copy_from_slice(keys.quote_mint.as_ref());
        data[BASE_VAULT_OFFSET..BASE_VAULT_OFFSET + 32].copy_from_slice(keys.base_vault.as_ref());
        data[QUOTE_VAULT_OFFSET..QUOTE_VAULT_OFFSET + 32]
            .copy_from_slice(keys.quote_vault.as_ref());
        data
    }

    #[test]
    fn test_parse_known_offsets() {
        let expected = PoolKeys {
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            base_vault: Pubkey::new_unique(),
            quote_vault: Pubkey::new_unique(),
        };
        let data = pool_account_with(&expected);

        let parsed = parse_pool_account(&data).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_short_account_rejected() {
        let data = vec![0u8; 128];
        assert!(matches!(
            parse_pool_account(&data),
            Err(SwapError::PoolUnavailable(_))
        ));
    }
}
