// Cryptographic utilities: HS512 signing key handling and compact token minting

use crate::core::errors::CryptoError;
use crate::core::models::{Token, TokenClaims, VerifiedIdentity};
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine,
};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use serde_json::Value;
use sha2::Sha512;
use std::fmt;
use std::fs;
use std::path::Path;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha512 = Hmac<Sha512>;

/// Key length produced by `SigningKey::generate` (512 bits, matches the HS512 block)
pub const SIGNING_KEY_LENGTH: usize = 64;

/// Header algorithm name written into every token
pub const TOKEN_ALGORITHM: &str = "HS512";

/// Where the signing key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Loaded from configuration; tokens survive a restart
    Configured,
    /// Generated at startup; tokens die with the process
    Ephemeral,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Configured => "configured",
            KeySource::Ephemeral => "ephemeral",
        }
    }
}

/// HMAC-SHA-512 key material, wiped from memory on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    source: KeySource,
}

impl SigningKey {
    /// Generate a fresh random key from the OS RNG
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = vec![0u8; SIGNING_KEY_LENGTH];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::KeyGenerationError(e.to_string()))?;
        Ok(Self {
            bytes,
            source: KeySource::Ephemeral,
        })
    }

    /// Build a key from raw bytes
    ///
    /// HS512 keys shorter than 512 bits are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < SIGNING_KEY_LENGTH {
            return Err(CryptoError::KeyLoadError(format!(
                "Signing key too short: expected at least {} bytes, got {}",
                SIGNING_KEY_LENGTH,
                bytes.len()
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
            source: KeySource::Configured,
        })
    }

    /// Build a key from a standard base64 string
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let mut decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::KeyLoadError(format!("Invalid base64 signing key: {}", e)))?;
        let key = Self::from_bytes(&decoded);
        decoded.zeroize();
        key
    }

    /// Load a base64 key from a file
    pub fn from_file(path: &Path) -> Result<Self, CryptoError> {
        let mut contents = fs::read_to_string(path)
            .map_err(|e| CryptoError::KeyLoadError(format!("Failed to read key file: {}", e)))?;
        let key = Self::from_base64(&contents);
        contents.zeroize();
        key
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    fn mac(&self) -> Result<HmacSha512, String> {
        HmacSha512::new_from_slice(&self.bytes).map_err(|e| e.to_string())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("key", &"<REDACTED>")
            .field("source", &self.source)
            .finish()
    }
}

/// Mints and checks compact HS512 tokens with a single, fixed signing key
///
/// The key is owned for the issuer's whole lifetime and never mutated, so one
/// `Arc<TokenIssuer>` can be shared across every request task.
#[derive(Debug)]
pub struct TokenIssuer {
    signing_key: SigningKey,
}

impl TokenIssuer {
    pub fn new(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    /// Issuer backed by a freshly generated key
    pub fn ephemeral() -> Result<Self, CryptoError> {
        Ok(Self::new(SigningKey::generate()?))
    }

    pub fn key_source(&self) -> KeySource {
        self.signing_key.source()
    }

    /// Mint a token whose subject is the verified username
    ///
    /// Payload structure:
    /// - header: {"alg":"HS512"}
    /// - claims: {"sub": username}
    ///
    /// No expiry is set. Output is deterministic for a given key and subject.
    pub fn issue(&self, identity: &VerifiedIdentity) -> Result<Token, CryptoError> {
        let header = serde_json::json!({ "alg": TOKEN_ALGORITHM });
        let claims = TokenClaims {
            sub: identity.username().to_string(),
        };

        let header_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&header)
                .map_err(|e| CryptoError::SigningError(format!("Failed to serialize header: {}", e)))?,
        );
        let claims_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&claims)
                .map_err(|e| CryptoError::SigningError(format!("Failed to serialize claims: {}", e)))?,
        );

        let message = format!("{}.{}", header_b64, claims_b64);

        let mut mac = self.signing_key.mac().map_err(CryptoError::SigningError)?;
        mac.update(message.as_bytes());
        let signature = mac.finalize().into_bytes();

        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

        Ok(Token::new(format!("{}.{}", message, signature_b64)))
    }

    /// Check a token against this issuer's key and return its claims
    ///
    /// Signature comparison is constant-time.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, CryptoError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(CryptoError::VerificationError(format!(
                "expected 3 segments, got {}",
                parts.len()
            )));
        }
        let (header_b64, claims_b64, signature_b64) = (parts[0], parts[1], parts[2]);

        let header: Value = decode_segment(header_b64, "header")?;
        if header.get("alg").and_then(Value::as_str) != Some(TOKEN_ALGORITHM) {
            return Err(CryptoError::VerificationError("unsupported algorithm".to_string()));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|e| CryptoError::VerificationError(format!("invalid signature encoding: {}", e)))?;

        let mut mac = self
            .signing_key
            .mac()
            .map_err(CryptoError::VerificationError)?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| CryptoError::VerificationError("signature mismatch".to_string()))?;

        decode_segment(claims_b64, "claims")
    }
}

/// Decode one base64url JSON segment of a compact token
fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str, name: &str) -> Result<T, CryptoError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| CryptoError::VerificationError(format!("invalid {} encoding: {}", name, e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CryptoError::VerificationError(format!("invalid {} JSON: {}", name, e)))
}
