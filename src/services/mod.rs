//! Chain-facing service abstractions consumed by the workflow.
//!
//! The workflow never talks to the network itself; allowance approval,
//! transaction submission, and address validation are injected behind these
//! traits. Service calls settle into an explicit `Result` instead of a
//! stringly request status.

use crate::domain::{Address, Network, RawAmount};
use async_trait::async_trait;
use thiserror::Error;

pub mod address;
pub mod mock;

pub use address::Eip55Validator;
pub use mock::{CallGate, MockAllowanceService, MockTransactionService};

/// A service call that settled as rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("service rejected: {reason}")]
pub struct ServiceRejected {
    pub reason: String,
}

impl ServiceRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        ServiceRejected {
            reason: reason.into(),
        }
    }
}

/// Request to approve a spending allowance for a line contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequest {
    /// Line contract being granted the allowance.
    pub spender_address: Address,
    /// Token the allowance is drawn from.
    pub token_address: Address,
    /// Allowance in raw token units.
    pub amount: RawAmount,
    pub network: Network,
}

/// Request to submit an add-credit transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCreditRequest {
    pub line_address: Address,
    /// Daily rate in raw 2-decimal units.
    pub drate: RawAmount,
    /// Facility rate in raw 2-decimal units.
    pub frate: RawAmount,
    /// Deposit amount in raw token units.
    pub amount: RawAmount,
    pub token: Address,
    pub lender: Address,
    pub network: Network,
    /// Simulate without broadcasting.
    pub dry_run: bool,
}

/// Spending-allowance approval service.
#[async_trait]
pub trait AllowanceService: Send + Sync {
    /// Request an allowance approval; resolves once the wallet interaction
    /// settles.
    async fn approve(&self, request: ApprovalRequest) -> Result<(), ServiceRejected>;
}

/// On-chain transaction submission service.
///
/// Timeout and retry policy for the underlying chain transaction live behind
/// this trait, not in the workflow.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Submit an add-credit transaction; resolves once it settles.
    async fn add_credit(&self, request: AddCreditRequest) -> Result<(), ServiceRejected>;
}

/// Address format validation.
#[async_trait]
pub trait AddressValidator: Send + Sync {
    /// Validate the input and return its checksummed form, or None if it is
    /// not a well-formed address.
    async fn checksum(&self, input: &str) -> Option<Address>;
}
