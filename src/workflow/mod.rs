//! Credit-position transaction workflow: phases, actions, and the controller.

use crate::domain::TokenRef;
use crate::error::WorkflowError;
use serde::Serialize;

pub mod controller;

pub use controller::{CloseCallback, CreditWorkflow, DisposeHandle, WorkflowServices};

/// Workflow phase emitted for the presentation layer to render.
///
/// `Succeeded`, `Failed`, and `BadLine` are terminal display states that
/// require explicit dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Editing,
    Approving,
    Submitting,
    Succeeded,
    Failed,
    /// The selected line is not active; only navigation away is offered.
    BadLine,
}

/// Role-dependent branch chosen at workflow entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Lender creating a new funding offer; all fields editable.
    Propose,
    /// Borrower accepting an existing offer; fields prefilled read-only.
    Accept,
}

/// Actions the presentation layer may offer in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Approve,
    Deposit,
    Accept,
}

/// How an approve/submit invocation settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The service call fulfilled; the phase reflects the result.
    Fulfilled,
    /// The service call rejected; the phase reflects the result.
    Rejected,
    /// A local precondition or validation failed; the workflow stayed in (or
    /// returned to) `Editing` with entered values intact.
    Aborted(WorkflowError),
    /// Another approve/submit on this instance is still in flight.
    AlreadyPending,
    /// The workflow was disposed while the call was in flight; the late
    /// result was discarded without touching phase state.
    Disposed,
    /// The action is not offered in the current mode or phase.
    NotAvailable,
}

/// Transient form state owned by one workflow instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    /// Target amount in display units.
    pub amount: String,
    /// Daily rate in display units.
    pub drate: String,
    /// Facility rate in display units.
    pub frate: String,
    /// Lender address as entered.
    pub lender: String,
    /// Currently selected token.
    pub token: TokenRef,
}
