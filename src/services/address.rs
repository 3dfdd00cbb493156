//! EIP-55 checksummed address validation.

use super::AddressValidator;
use crate::domain::Address;
use async_trait::async_trait;
use sha3::{Digest, Keccak256};

/// Validates 20-byte hex addresses and produces their EIP-55 checksum form.
///
/// All-lowercase and all-uppercase inputs are accepted and checksummed;
/// mixed-case inputs must already match the checksum exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eip55Validator;

impl Eip55Validator {
    pub fn new() -> Self {
        Eip55Validator
    }

    /// Checksum a bare (un-prefixed) lowercase hex address per EIP-55.
    fn checksum_bare(lower: &str) -> String {
        let hash = Keccak256::digest(lower.as_bytes());
        lower
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let nibble = if i % 2 == 0 {
                    hash[i / 2] >> 4
                } else {
                    hash[i / 2] & 0x0f
                };
                if nibble >= 8 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    }

    fn validate(input: &str) -> Option<Address> {
        let bare = input.strip_prefix("0x").unwrap_or(input);
        if bare.len() != 40 || !bare.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let lower = bare.to_ascii_lowercase();
        let checksummed = Self::checksum_bare(&lower);

        let has_upper = bare.bytes().any(|b| b.is_ascii_uppercase());
        let has_lower = bare.bytes().any(|b| b.is_ascii_lowercase());
        if has_upper && has_lower && bare != checksummed {
            return None;
        }

        Some(Address::new(format!("0x{}", checksummed)))
    }
}

#[async_trait]
impl AddressValidator for Eip55Validator {
    async fn checksum(&self, input: &str) -> Option<Address> {
        Self::validate(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test vectors from the EIP-55 specification.
    const VECTORS: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[tokio::test]
    async fn test_lowercase_input_is_checksummed() {
        let validator = Eip55Validator::new();
        for vector in VECTORS {
            let lower = vector.to_ascii_lowercase();
            let result = validator.checksum(&lower).await.unwrap();
            assert_eq!(result.as_str(), vector);
        }
    }

    #[tokio::test]
    async fn test_valid_mixed_case_accepted() {
        let validator = Eip55Validator::new();
        for vector in VECTORS {
            let result = validator.checksum(vector).await.unwrap();
            assert_eq!(result.as_str(), vector);
        }
    }

    #[tokio::test]
    async fn test_wrong_checksum_rejected() {
        let validator = Eip55Validator::new();
        // First checksummed letter flipped to the wrong case.
        let bad = "0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert!(validator.checksum(bad).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_inputs_rejected() {
        let validator = Eip55Validator::new();
        for input in ["", "0x", "0x1234", "not an address", "0xZZ5aaeb6053f3e94c9b9a09f33669435e7ef1bea"] {
            assert!(validator.checksum(input).await.is_none(), "{:?}", input);
        }
    }

    #[tokio::test]
    async fn test_missing_prefix_allowed() {
        let validator = Eip55Validator::new();
        let bare = &VECTORS[0][2..];
        let result = validator.checksum(bare).await.unwrap();
        assert_eq!(result.as_str(), VECTORS[0]);
    }
}
