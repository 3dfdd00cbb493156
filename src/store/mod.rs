//! Application store contract: a read path (snapshots) and a write path
//! (position publishes) with observable resolution.
//!
//! The workflow depends on this capability interface instead of any concrete
//! state-management layer, so it stays testable against an in-memory fake.

use crate::domain::{Address, CreditLine, Network, Position, PositionId, Token};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// Role the connected wallet plays on the selected line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Borrower,
    Lender,
    Arbiter,
}

/// Key under which an updated position is published.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub position_id: PositionId,
    pub line_address: Address,
}

/// Read-only view of the store state relevant to the workflow.
///
/// Refreshed externally; the workflow captures one snapshot at entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub wallet_address: Option<Address>,
    pub network: Network,
    pub user_role: UserRole,
    pub selected_line: Option<CreditLine>,
    pub selected_position: Option<Position>,
    pub positions: Vec<Position>,
    pub selected_token: Option<Token>,
    /// Tokens available for selection (the source asset options).
    pub tokens: Vec<Token>,
}

impl StoreSnapshot {
    /// Empty lender-role snapshot on mainnet, for building up test state.
    pub fn empty() -> Self {
        StoreSnapshot {
            wallet_address: None,
            network: Network::mainnet(),
            user_role: UserRole::Lender,
            selected_line: None,
            selected_position: None,
            positions: Vec::new(),
            selected_token: None,
            tokens: Vec::new(),
        }
    }
}

/// Error for a store dispatch that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store dispatch failed: {0}")]
    Dispatch(String),
}

/// Injected store capability: selectors in, dispatched updates out.
#[async_trait]
pub trait Store: Send + Sync {
    /// Current snapshot of workflow-relevant selections.
    fn snapshot(&self) -> StoreSnapshot;

    /// Publish an updated position keyed by `(position_id, line_address)`.
    async fn publish_position(
        &self,
        key: PositionKey,
        position: Position,
    ) -> Result<(), StoreError>;
}
