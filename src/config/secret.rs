//! API token storage
//!
//! The bearer token is read from the config file or `XDR_SWEEP_API_TOKEN` and
//! lives in a [`SecretString`]: `Debug` prints `[REDACTED]`, the buffer is
//! zeroed on drop, and reading it takes an explicit `expose_secret()`.
//!
//! ```rust
//! use xdr_sweep::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("eyJhbGciOi.payload.sig".to_string());
//!
//! assert_eq!(token.expose_secret().bearer_header(), "Bearer eyJhbGciOi.payload.sig");
//! assert_eq!(token.expose_secret().masked(), "****.sig");
//! assert!(!format!("{token:?}").contains("payload"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Characters of the token shown by [`SecretValue::masked`]
const VISIBLE_SUFFIX: usize = 4;

/// Shortest token that still shows a suffix when masked
const MIN_MASKED_LEN: usize = 12;

/// Token text, zeroed on drop
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// `Authorization` header value
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0.trim())
    }

    /// Printable form: the last few characters of a long token, else stars
    pub fn masked(&self) -> String {
        let token = self.0.trim();
        let chars = token.chars().count();
        if chars < MIN_MASKED_LEN {
            return "****".to_string();
        }

        let suffix: String = token.chars().skip(chars - VISIBLE_SUFFIX).collect();
        format!("****{suffix}")
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Bearer token as held by [`ApiConfig`](super::ApiConfig)
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain token
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_blank_token() {
        assert!(secret_string("   ".to_string()).expose_secret().is_blank());
        assert!(secret_string(String::new()).expose_secret().is_blank());
        assert!(!secret_string("t".to_string()).expose_secret().is_blank());
    }

    #[test]
    fn test_bearer_header_trims() {
        let token = secret_string(" abc123 \n".to_string());
        assert_eq!(token.expose_secret().bearer_header(), "Bearer abc123");
    }

    #[test]
    fn test_masked_token() {
        let long = secret_string("0123456789abcdef".to_string());
        assert_eq!(long.expose_secret().masked(), "****cdef");

        let short = secret_string("short".to_string());
        assert_eq!(short.expose_secret().masked(), "****");
    }

    #[test]
    fn test_token_debug_redacted() {
        let token = secret_string("xdr-api-token".to_string());
        let debug_output = format!("{token:?}");

        assert!(!debug_output.contains("xdr-api-token"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_token_from_toml() {
        #[derive(Deserialize)]
        struct ApiSection {
            token: SecretString,
        }

        let section: ApiSection = toml::from_str("token = \"from-file\"").unwrap();
        assert_eq!(section.token.expose_secret(), "from-file");
    }
}
