//! Process-wide RPC session

use solana_client::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use std::sync::{Arc, OnceLock};
use tracing::info;

static RPC_SESSION: OnceLock<Arc<RpcClient>> = OnceLock::new();

/// Returns the shared RPC client, building it on first use. Every later call
/// in the same process reuses the handle; it is torn down at process exit.
pub fn rpc_session(url: &str) -> Arc<RpcClient> {
    RPC_SESSION
        .get_or_init(|| {
            info!("😺 Initializing RPC session: {}", url);
            Arc::new(RpcClient::new_with_commitment(
                url.to_string(),
                CommitmentConfig::confirmed(),
            ))
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_is_memoized() {
        let first = rpc_session("http://localhost:8899");
        let second = rpc_session("http://other-endpoint:8899");
        assert!(Arc::ptr_eq(&first, &second));
    }
}
