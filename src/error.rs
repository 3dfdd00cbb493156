use crate::domain::AmountError;
use crate::services::ServiceRejected;
use thiserror::Error;

/// Failure kinds surfaced by workflow actions.
///
/// None of these escape the workflow uncaught: each is turned into a phase
/// transition or a local abort and reported through the action outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("missing selection: {0}")]
    MissingSelection(String),
    #[error("service rejected: {0}")]
    ServiceRejected(String),
}

impl From<AmountError> for WorkflowError {
    fn from(err: AmountError) -> Self {
        match err {
            AmountError::InvalidAmount(input) => WorkflowError::InvalidAmount(input),
        }
    }
}

impl From<ServiceRejected> for WorkflowError {
    fn from(err: ServiceRejected) -> Self {
        WorkflowError::ServiceRejected(err.reason)
    }
}
