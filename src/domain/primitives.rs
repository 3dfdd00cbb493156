//! Domain primitives: Address, Network.

use serde::{Deserialize, Serialize};

/// On-chain account or contract address (hex string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create an Address from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the address string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network identifier (e.g., "mainnet", "goerli").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Network(pub String);

impl Network {
    /// Create a Network from a string.
    pub fn new(network: impl Into<String>) -> Self {
        Network(network.into())
    }

    /// Get the network as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The default production network.
    pub fn mainnet() -> Self {
        Network("mainnet".to_string())
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        let addr = Address::new("0x123abc");
        assert_eq!(addr.to_string(), "0x123abc");
    }

    #[test]
    fn test_address_is_empty() {
        assert!(Address::new("").is_empty());
        assert!(!Address::new("0x1").is_empty());
    }

    #[test]
    fn test_network_display() {
        let network = Network::mainnet();
        assert_eq!(network.to_string(), "mainnet");
    }

    #[test]
    fn test_network_serialization() {
        let network = Network::new("goerli");
        let json = serde_json::to_string(&network).unwrap();
        assert_eq!(json, "\"goerli\"");
    }
}
