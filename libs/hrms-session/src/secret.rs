use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Token value that never shows up in logs.
///
/// `Debug` and `Display` print `[REDACTED]`; [`expose`](Self::expose) is the
/// only way to the raw value. The buffer is zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw value, for building the auth header or a refresh body only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn formatting_is_redacted() {
        let token = SecretString::new("eyJhbGciOi.access");
        assert_eq!(format!("{token:?}"), "[REDACTED]");
        assert_eq!(format!("{token}"), "[REDACTED]");
        assert_eq!(token.expose(), "eyJhbGciOi.access");
    }

    #[test]
    fn conversions_keep_value() {
        assert_eq!(SecretString::from("r1").expose(), "r1");
        assert_eq!(SecretString::from("r2".to_owned()).expose(), "r2");
        assert!(SecretString::new("").is_empty());
    }

    #[test]
    fn zeroize_empties_buffer() {
        let mut token = SecretString::new("sensitive");
        token.zeroize();
        assert!(token.is_empty());
    }
}
