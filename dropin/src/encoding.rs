//! Base64 helpers for client tokens.

use std::fmt::{self, Display, Formatter};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;

/// Base64 text as carried in a client token.
///
/// Holds the encoded form; [`Base64Text::decode`] yields the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Text(pub String);

impl Base64Text {
    /// Decodes the text into raw bytes. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid standard base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        b64.decode(self.0.trim())
    }

    /// Encodes raw bytes.
    pub fn encode<T: AsRef<[u8]>>(input: T) -> Self {
        Self(b64.encode(input.as_ref()))
    }
}

impl From<&str> for Base64Text {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for Base64Text {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Base64Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ignores_surrounding_whitespace() {
        let text = Base64Text::from("  eyJhIjoxfQ==\n");
        assert_eq!(text.decode().unwrap(), br#"{"a":1}"#);
    }

    #[test]
    fn test_decode_rejects_invalid_alphabet() {
        assert!(Base64Text::from("not base64!").decode().is_err());
    }
}
