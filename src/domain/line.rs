//! Credit line contract snapshot.

use crate::domain::position::PositionId;
use crate::domain::Address;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a credit line contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineStatus {
    Uninitialized,
    Active,
    Liquidatable,
    Repaid,
    Insolvent,
}

/// A borrowing facility funded by one or more lender positions.
///
/// Read-only from the workflow's perspective; exactly one line is selected at
/// a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLine {
    /// Contract address, doubling as the line identifier.
    pub id: Address,
    /// Activation status; only `Active` lines accept new positions.
    pub status: LineStatus,
    /// Positions recorded against this line.
    pub positions: Vec<PositionId>,
}

impl CreditLine {
    /// Returns true if the line can accept new credit positions.
    pub fn is_active(&self) -> bool {
        self.status == LineStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        let mut line = CreditLine {
            id: Address::new("0xline"),
            status: LineStatus::Active,
            positions: Vec::new(),
        };
        assert!(line.is_active());

        line.status = LineStatus::Repaid;
        assert!(!line.is_active());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&LineStatus::Active).unwrap();
        assert_eq!(json, "\"ACTIVE\"");
        let back: LineStatus = serde_json::from_str("\"LIQUIDATABLE\"").unwrap();
        assert_eq!(back, LineStatus::Liquidatable);
    }
}
