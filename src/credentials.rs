//! Keypair loading shared by the operator scripts.
use solana_program::msg;
use solana_sdk::signature::Keypair;

use crate::error::{ClientError, ClientResult};

/// Parses a secret key given either as a base58 string or as a JSON array of 64 bytes.
pub fn load_keypair(secret: &str) -> ClientResult<Keypair> {
    let secret = secret.trim();
    let bytes = if secret.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(secret)
            .map_err(|e| ClientError::config(format!("secret key is not a byte array: {e}")))?
    } else {
        bs58::decode(secret)
            .into_vec()
            .map_err(|e| ClientError::config(format!("secret key is not base58: {e}")))?
    };
    Keypair::from_bytes(&bytes)
        .map_err(|e| ClientError::config(format!("invalid secret key: {e}")))
}

pub fn load_keypair_from_env(var: &str) -> ClientResult<Keypair> {
    let secret = std::env::var(var).map_err(|e| {
        msg!("Missing keypair variable {}", var);
        ClientError::config(format!("{var}: {e}"))
    })?;
    load_keypair(&secret)
}
