//! Key material generation
//!
//! Produces the plaintext token handed to the caller and the non-secret
//! `start` fragment stored for display.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;

/// Result of generating new key material
#[derive(Debug, Clone)]
pub struct GeneratedKeyMaterial {
    /// The full plaintext token (only shown once at creation)
    pub plaintext: String,
    /// Display fragment: prefix part plus the first few encoded characters
    pub start: String,
}

/// Generator for opaque key tokens
///
/// Bytes come from the operating system CSPRNG on every call; outputs are
/// statistically independent across invocations.
#[derive(Debug, Clone)]
pub struct KeyMaterialGenerator {
    /// Number of encoded characters exposed in the `start` fragment
    start_chars: usize,
}

impl KeyMaterialGenerator {
    /// Create a new generator
    pub fn new(start_chars: usize) -> Self {
        Self { start_chars }
    }

    /// Generate a token from `byte_length` random bytes
    ///
    /// When `prefix` is supplied both the token and the fragment begin with
    /// `"<prefix>_"`. The fragment truncates to the full encoding when the
    /// token is shorter than the configured fragment width.
    pub fn generate(&self, byte_length: usize, prefix: Option<&str>) -> GeneratedKeyMaterial {
        let mut random_bytes = vec![0u8; byte_length];
        OsRng.fill_bytes(&mut random_bytes);

        let encoded = URL_SAFE_NO_PAD.encode(&random_bytes);
        let visible = &encoded[..self.start_chars.min(encoded.len())];

        match prefix {
            Some(prefix) => GeneratedKeyMaterial {
                plaintext: format!("{}_{}", prefix, encoded),
                start: format!("{}_{}", prefix, visible),
            },
            None => GeneratedKeyMaterial {
                start: visible.to_string(),
                plaintext: encoded,
            },
        }
    }
}

impl Default for KeyMaterialGenerator {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_without_prefix() {
        let generator = KeyMaterialGenerator::default();
        let material = generator.generate(16, None);

        // 16 bytes encode to 22 unpadded base64 characters
        assert_eq!(material.plaintext.len(), 22);
        assert_eq!(material.start.len(), 4);
        assert!(material.plaintext.starts_with(&material.start));
    }

    #[test]
    fn test_generate_with_prefix() {
        let generator = KeyMaterialGenerator::default();
        let material = generator.generate(16, Some("prefix"));

        assert!(material.plaintext.starts_with("prefix_"));
        assert!(material.start.starts_with("prefix_"));
        assert_eq!(material.start.len(), "prefix_".len() + 4);
        assert!(material.plaintext.starts_with(&material.start));
    }

    #[test]
    fn test_generated_tokens_are_independent() {
        let generator = KeyMaterialGenerator::default();
        let a = generator.generate(16, None);
        let b = generator.generate(16, None);

        assert_ne!(a.plaintext, b.plaintext);
    }

    #[test]
    fn test_token_is_url_safe() {
        let generator = KeyMaterialGenerator::default();
        let material = generator.generate(64, None);

        assert!(material
            .plaintext
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(!material.plaintext.contains('='));
    }

    #[test]
    fn test_short_token_truncates_fragment() {
        let generator = KeyMaterialGenerator::default();
        // 1 byte encodes to 2 characters, shorter than the fragment width
        let material = generator.generate(1, None);

        assert_eq!(material.plaintext.len(), 2);
        assert_eq!(material.start, material.plaintext);
    }

    #[test]
    fn test_byte_length_drives_token_length() {
        let generator = KeyMaterialGenerator::default();

        // Unpadded base64: ceil(n * 4 / 3) characters
        assert_eq!(generator.generate(16, None).plaintext.len(), 22);
        assert_eq!(generator.generate(32, None).plaintext.len(), 43);
        assert_eq!(generator.generate(255, None).plaintext.len(), 340);
    }

    #[test]
    fn test_fragment_width_is_configurable() {
        let generator = KeyMaterialGenerator::new(8);
        let material = generator.generate(16, None);
        assert_eq!(material.start.len(), 8);
    }
}
