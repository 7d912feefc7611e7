//! Opaque credential issuance.
//!
//! Registration hands the new account a bearer credential bound to its
//! identifier. A credential is an Ed25519 signature over a small JSON claims
//! payload, encoded as `base64url(claims).base64url(signature)`. Callers
//! treat the whole string as opaque; the directory itself never parses
//! credentials it has issued.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use rand::rngs::OsRng;
use serde_json::json;

/// Signs bearer credentials for user identifiers.
#[derive(Clone)]
pub struct TokenIssuer {
    key: SigningKey,
}

impl TokenIssuer {
    /// Create an issuer with a fresh random signing key.
    ///
    /// Credentials issued with an ephemeral key cannot be verified after a
    /// restart; supply a seed to keep them valid across runs.
    pub fn generate() -> Self {
        Self {
            key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create an issuer from a fixed 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create an issuer from a 64-character hex seed string.
    pub fn from_hex_seed(hex_seed: &str) -> Result<Self, String> {
        let bytes = hex::decode(hex_seed).map_err(|e| format!("invalid hex seed: {e}"))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| "seed must be exactly 32 bytes".to_string())?;
        Ok(Self::from_seed(seed))
    }

    /// Issue a signed credential bound to `user_id`.
    pub fn issue(&self, user_id: &str) -> String {
        let claims = json!({
            "sub": user_id,
            "iat": Utc::now().timestamp(),
        })
        .to_string();

        let signature = self.key.sign(claims.as_bytes());

        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(claims.as_bytes()),
            URL_SAFE_NO_PAD.encode(signature.to_bytes()),
        )
    }

    /// Verify a credential and return the user identifier it is bound to.
    ///
    /// Returns `None` for malformed, tampered, or foreign-keyed credentials.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (claims_b64, signature_b64) = token.split_once('.')?;
        let claims = URL_SAFE_NO_PAD.decode(claims_b64).ok()?;
        let signature_bytes = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;
        let signature = Signature::from_slice(&signature_bytes).ok()?;

        self.key.verifying_key().verify(&claims, &signature).ok()?;

        let parsed: serde_json::Value = serde_json::from_slice(&claims).ok()?;
        parsed.get("sub")?.as_str().map(str::to_string)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
