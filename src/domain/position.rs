//! Lender positions within a credit line and the pure principal-update
//! calculator applied after a successful deposit or draw.

use crate::domain::amount::{to_raw_units, AmountError, RawAmount};
use crate::domain::Address;
use serde::{Deserialize, Serialize};

/// Stable identifier of a position within a line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PositionId(pub String);

impl PositionId {
    pub fn new(id: impl Into<String>) -> Self {
        PositionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionStatus {
    Proposed,
    Opened,
    Closed,
}

/// The token a position is denominated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    pub address: Address,
    pub symbol: String,
    pub decimals: u32,
}

/// One lender's funded stake within a credit line.
///
/// Created by the external chain-indexing service. The workflow reads a
/// position to prefill form state and, on a successful accept, produces an
/// updated copy; positions are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    /// Lender address; fixes the accept branch of the workflow once set.
    pub lender: Address,
    /// Deposited amount in raw units.
    pub deposit: RawAmount,
    /// Outstanding principal in raw units.
    pub principal: RawAmount,
    pub interest_accrued: RawAmount,
    pub interest_repaid: RawAmount,
    /// Daily interest rate as a display string (e.g., "5.00").
    pub drate: String,
    /// Facility fee rate as a display string.
    pub frate: String,
    pub token: TokenRef,
    pub status: PositionStatus,
}

impl Position {
    /// New snapshot with the principal increased by a raw-unit delta.
    ///
    /// Every other field is copied unchanged.
    pub fn with_principal_delta(&self, delta: &RawAmount) -> Position {
        Position {
            principal: self.principal.checked_add(delta),
            ..self.clone()
        }
    }
}

/// Compute the position snapshot after a deposit/borrow delta is applied.
///
/// The delta is given in display units and converted at the position token's
/// own precision; the addition is arbitrary-precision and cannot overflow.
///
/// # Errors
/// Returns `InvalidAmount` if the delta is malformed or negative.
pub fn apply_principal_delta(
    position: &Position,
    delta_display: &str,
) -> Result<Position, AmountError> {
    let delta = to_raw_units(delta_display, position.token.decimals)?;
    Ok(position.with_principal_delta(&delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(principal: &str, decimals: u32) -> Position {
        Position {
            id: PositionId::new("0xpos1"),
            lender: Address::new("0x1111111111111111111111111111111111111111"),
            deposit: RawAmount::from_raw_str("5000000000000000000").unwrap(),
            principal: RawAmount::from_raw_str(principal).unwrap(),
            interest_accrued: RawAmount::from_raw_str("120").unwrap(),
            interest_repaid: RawAmount::zero(),
            drate: "5.00".to_string(),
            frate: "1.00".to_string(),
            token: TokenRef {
                address: Address::new("0x6b175474e89094c44da98b954eedeac495271d0f"),
                symbol: "DAI".to_string(),
                decimals,
            },
            status: PositionStatus::Opened,
        }
    }

    #[test]
    fn test_zero_delta_is_identity() {
        let p = position("1000000000000000000", 18);
        let updated = apply_principal_delta(&p, "0").unwrap();
        assert_eq!(updated, p);
    }

    #[test]
    fn test_delta_converted_at_token_decimals() {
        let p = position("1000000000000000000", 18);
        let updated = apply_principal_delta(&p, "2").unwrap();
        assert_eq!(updated.principal.to_string(), "3000000000000000000");
    }

    #[test]
    fn test_other_fields_pass_through() {
        let p = position("1000000", 6);
        let updated = apply_principal_delta(&p, "1.5").unwrap();
        assert_eq!(updated.principal.to_string(), "2500000");
        assert_eq!(updated.id, p.id);
        assert_eq!(updated.lender, p.lender);
        assert_eq!(updated.deposit, p.deposit);
        assert_eq!(updated.interest_accrued, p.interest_accrued);
        assert_eq!(updated.interest_repaid, p.interest_repaid);
        assert_eq!(updated.drate, p.drate);
        assert_eq!(updated.frate, p.frate);
        assert_eq!(updated.token, p.token);
        assert_eq!(updated.status, p.status);
    }

    #[test]
    fn test_rejects_bad_delta() {
        let p = position("1000", 6);
        assert!(apply_principal_delta(&p, "-1").is_err());
        assert!(apply_principal_delta(&p, "").is_err());
        assert!(apply_principal_delta(&p, "two").is_err());
    }

    #[test]
    fn test_no_mutation_of_input() {
        let p = position("1000", 6);
        let _ = apply_principal_delta(&p, "1").unwrap();
        assert_eq!(p.principal.to_string(), "1000");
    }
}
