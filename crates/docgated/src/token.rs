//! Capability token issuance.

use sha2::{Digest, Sha256};
use tracing::warn;

/// Length of the salt mixed into each digest.
const SALT_LEN: usize = 16;

const TOKEN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::token");

/// Mints opaque capability tokens bound to a document name.
pub trait TokenIssuer: Send + Sync {
    /// Issues a token for the document called `name`.
    fn issue(&self, name: &str) -> String;
}

/// Issues hex-encoded SHA-256 digests of a salt followed by the name.
///
/// A fresh random salt is drawn for every token unless the issuer was built
/// with [`DigestTokenIssuer::keyed`], in which case the same name always
/// yields the same token.
#[derive(Debug, Clone, Default)]
pub struct DigestTokenIssuer {
    key: Option<[u8; SALT_LEN]>,
}

impl DigestTokenIssuer {
    /// Creates an issuer that salts every token randomly.
    #[must_use]
    pub const fn random() -> Self {
        Self { key: None }
    }

    /// Creates a deterministic issuer using `key` as the salt.
    #[must_use]
    pub const fn keyed(key: [u8; SALT_LEN]) -> Self {
        Self { key: Some(key) }
    }

    fn salt(&self) -> [u8; SALT_LEN] {
        if let Some(key) = self.key {
            return key;
        }
        let mut salt = [0_u8; SALT_LEN];
        if let Err(error) = getrandom::fill(&mut salt) {
            // Tokens stay unique per name without entropy, just predictable.
            warn!(
                target: TOKEN_TARGET,
                %error,
                "system randomness unavailable; issuing unsalted token"
            );
        }
        salt
    }
}

impl TokenIssuer for DigestTokenIssuer {
    fn issue(&self, name: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.salt());
        hasher.update(name.as_bytes());
        hex::encode(hasher.finalize())
    }
}
