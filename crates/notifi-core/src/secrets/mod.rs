//! Session tokens, tenant secrets and at-rest encryption of stored values.
//!
//! - `SessionToken` / `ServiceSecret`: wrappers that prevent accidental logging
//! - `ValueCipher`: AES-256-GCM for stored session values
//! - `scrub_secrets`: Redact secrets from error messages

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use secrecy::{ExposeSecret, SecretBox};
use thiserror::Error;
use zeroize::Zeroize;

/// Errors from encryption operations.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Encryption/decryption failed.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Invalid UTF-8 in decrypted data.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Key material has the wrong shape.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

macro_rules! redacted_secret {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name(SecretBox<str>);

        impl $name {
            /// Wrap a secret value.
            #[must_use]
            pub fn new(value: String) -> Self {
                Self(SecretBox::new(value.into_boxed_str()))
            }

            /// Expose the secret for actual API calls.
            ///
            /// Use sparingly - only when actually sending to the API.
            #[must_use]
            pub fn expose(&self) -> &str {
                self.0.expose_secret()
            }
        }

        impl Clone for $name {
            fn clone(&self) -> Self {
                Self::new(self.expose().to_owned())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "([REDACTED])"))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "[REDACTED]")
            }
        }
    };
}

redacted_secret!(
    /// Session JWT sent as a bearer token.
    SessionToken
);

redacted_secret!(
    /// Tenant service secret used by server-side logins.
    ServiceSecret
);

/// AES-256-GCM cipher for values written to persistent storage.
///
/// Output layout is `nonce (12 bytes) || ciphertext`.
pub struct ValueCipher {
    key: SecretBox<[u8; 32]>,
}

impl ValueCipher {
    /// Create a cipher from a 32-byte key.
    #[must_use]
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            key: SecretBox::new(Box::new(key)),
        }
    }

    /// Create a cipher from a 64-character hex key.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not 32 bytes of hex.
    pub fn from_hex(hex_key: &str) -> Result<Self, CredentialError> {
        let mut bytes =
            hex::decode(hex_key.trim()).map_err(|e| CredentialError::InvalidKey(e.to_string()))?;
        let key: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CredentialError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        bytes.zeroize();
        Ok(Self::new(key))
    }

    /// Encrypt data with AES-256-GCM.
    ///
    /// # Errors
    ///
    /// Returns error if encryption fails.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, CredentialError> {
        let cipher = Aes256Gcm::new(self.key.expose_secret().into());

        let nonce_bytes: [u8; 12] = rand::random();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, data)
            .map_err(|e| CredentialError::Crypto(e.to_string()))?;

        Ok([nonce_bytes.as_slice(), &ciphertext].concat())
    }

    /// Decrypt data produced by [`ValueCipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns error if the data is truncated or fails authentication.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CredentialError> {
        if data.len() < 12 {
            return Err(CredentialError::Crypto("Data too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = data.split_at(12);
        let cipher = Aes256Gcm::new(self.key.expose_secret().into());
        let nonce = Nonce::from_slice(nonce_bytes);

        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CredentialError::Crypto(e.to_string()))
    }

    /// Decrypt into a UTF-8 string, clearing the plaintext buffer afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if decryption fails or the plaintext is not UTF-8.
    pub fn decrypt_string(&self, data: &[u8]) -> Result<String, CredentialError> {
        let mut decrypted = self.decrypt(data)?;
        let text = String::from_utf8(decrypted.clone())?;
        decrypted.zeroize();
        Ok(text)
    }
}

impl std::fmt::Debug for ValueCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ValueCipher([REDACTED])")
    }
}

const REDACTED: &str = "[REDACTED]";

/// Length of the value at the start of `rest`.
fn value_len(rest: &str) -> usize {
    rest.find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '&' | ','))
        .unwrap_or(rest.len())
}

fn redact_after(text: &str, pattern: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(pattern) {
        let value_start = pos + pattern.len();
        out.push_str(&rest[..value_start]);
        let tail = &rest[value_start..];
        let len = value_len(tail);
        if len > 0 {
            out.push_str(REDACTED);
        }
        rest = &tail[len..];
    }
    out.push_str(rest);
    out
}

/// Bare JWTs: `eyJ` followed by exactly three dot-separated segments.
fn redact_jwts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("eyJ") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let len = value_len(tail);
        if tail[..len].matches('.').count() == 2 {
            out.push_str(REDACTED);
        } else {
            out.push_str(&tail[..len]);
        }
        rest = &tail[len..];
    }
    out.push_str(rest);
    out
}

/// Redact values following any of `patterns`, and any bare JWT.
#[must_use]
pub fn scrub_secrets(text: &str, patterns: &[&str]) -> String {
    let scrubbed = patterns
        .iter()
        .filter(|p| !p.is_empty())
        .fold(text.to_string(), |acc, pattern| redact_after(&acc, pattern));
    redact_jwts(&scrubbed)
}

/// Common secret patterns to scrub from logs.
pub const COMMON_SECRET_PATTERNS: &[&str] = &[
    "token=",
    "secret=",
    "\"token\":\"",
    "\"secret\":\"",
    "\"signature\":\"",
    "Authorization: Bearer ",
    "Bearer ",
];
