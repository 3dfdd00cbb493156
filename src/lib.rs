pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod store;
pub mod workflow;

pub use config::Config;
pub use domain::{
    apply_principal_delta, format_for_display, to_display_units, to_raw_units, Address,
    AmountError, CreditLine, LineStatus, Network, Position, PositionId, PositionStatus, RawAmount,
    Token, TokenRef,
};
pub use error::WorkflowError;
pub use services::{
    AddCreditRequest, AddressValidator, AllowanceService, ApprovalRequest, CallGate,
    Eip55Validator, MockAllowanceService, MockTransactionService, ServiceRejected,
    TransactionService,
};
pub use store::{MemoryStore, PositionKey, Store, StoreError, StoreSnapshot, UserRole};
pub use workflow::{
    ActionOutcome, CloseCallback, CreditWorkflow, DisposeHandle, FormState, Mode, Phase,
    WorkflowAction, WorkflowServices,
};
