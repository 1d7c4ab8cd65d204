//! Payer keypair loading

use anyhow::{bail, Context, Result};
use solana_sdk::signature::Keypair;

/// Load a keypair from a file.
///
/// Accepts the Solana CLI JSON byte array, raw 64 bytes, or a base58
/// encoded secret key as exported by browser wallets. `~` is expanded.
pub fn load_keypair(path: &str) -> Result<Keypair> {
    let expanded_path = shellexpand::tilde(path);
    let bytes = std::fs::read(expanded_path.as_ref())
        .context(format!("Failed to read keypair from {}", path))?;

    parse_keypair(&bytes).context(format!("Invalid keypair file {}", path))
}

pub fn parse_keypair(bytes: &[u8]) -> Result<Keypair> {
    if bytes.len() == 64 {
        // Binary format
        return Keypair::try_from(bytes).context("Failed to create keypair from bytes");
    }

    let trimmed = bytes.trim_ascii();
    if trimmed.is_empty() {
        bail!("Keypair file is empty");
    }

    let secret = if trimmed[0] == b'[' {
        // JSON format
        serde_json::from_slice::<Vec<u8>>(trimmed).context("Failed to parse keypair JSON")?
    } else {
        let text = std::str::from_utf8(trimmed).context("Keypair is neither JSON nor base58")?;
        bs58::decode(text)
            .into_vec()
            .context("Failed to decode base58 keypair")?
    };

    Keypair::try_from(&secret[..]).context("Failed to create keypair from bytes")
}
