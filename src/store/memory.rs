//! In-memory store for tests and embedding without an external state layer.

use super::{PositionKey, Store, StoreError, StoreSnapshot, UserRole};
use crate::domain::{Address, CreditLine, Position, Token};
use async_trait::async_trait;
use std::sync::Mutex;

/// Store backed by a mutex-guarded snapshot plus a publish log.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<StoreSnapshot>,
    published: Mutex<Vec<(PositionKey, Position)>>,
}

impl MemoryStore {
    pub fn new(snapshot: StoreSnapshot) -> Self {
        MemoryStore {
            state: Mutex::new(snapshot),
            published: Mutex::new(Vec::new()),
        }
    }

    /// Start from an empty snapshot.
    pub fn empty() -> Self {
        Self::new(StoreSnapshot::empty())
    }

    pub fn with_wallet(self, address: Address) -> Self {
        self.state.lock().expect("store lock poisoned").wallet_address = Some(address);
        self
    }

    pub fn with_role(self, role: UserRole) -> Self {
        self.state.lock().expect("store lock poisoned").user_role = role;
        self
    }

    pub fn with_line(self, line: CreditLine) -> Self {
        self.state.lock().expect("store lock poisoned").selected_line = Some(line);
        self
    }

    pub fn with_position(self, position: Position) -> Self {
        {
            let mut state = self.state.lock().expect("store lock poisoned");
            state.positions.push(position.clone());
            state.selected_position = Some(position);
        }
        self
    }

    pub fn with_token(self, token: Token) -> Self {
        {
            let mut state = self.state.lock().expect("store lock poisoned");
            state.tokens.push(token.clone());
            state.selected_token = Some(token);
        }
        self
    }

    /// Publishes received so far, in order.
    pub fn published(&self) -> Vec<(PositionKey, Position)> {
        self.published.lock().expect("store lock poisoned").clone()
    }

    /// Number of publishes received.
    pub fn publish_count(&self) -> usize {
        self.published.lock().expect("store lock poisoned").len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().expect("store lock poisoned").clone()
    }

    async fn publish_position(
        &self,
        key: PositionKey,
        position: Position,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");
        if let Some(existing) = state.positions.iter_mut().find(|p| p.id == key.position_id) {
            *existing = position.clone();
        }
        if state
            .selected_position
            .as_ref()
            .is_some_and(|p| p.id == key.position_id)
        {
            state.selected_position = Some(position.clone());
        }
        drop(state);

        self.published
            .lock()
            .expect("store lock poisoned")
            .push((key, position));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PositionId, PositionStatus, TokenRef, RawAmount};

    fn position(id: &str, principal: &str) -> Position {
        Position {
            id: PositionId::new(id),
            lender: Address::new("0x1111111111111111111111111111111111111111"),
            deposit: RawAmount::from_raw_str("1000000").unwrap(),
            principal: RawAmount::from_raw_str(principal).unwrap(),
            interest_accrued: RawAmount::zero(),
            interest_repaid: RawAmount::zero(),
            drate: "5.00".to_string(),
            frate: "1.00".to_string(),
            token: TokenRef {
                address: Address::new("0xtoken"),
                symbol: "DAI".to_string(),
                decimals: 6,
            },
            status: PositionStatus::Proposed,
        }
    }

    #[tokio::test]
    async fn test_publish_updates_snapshot_and_log() {
        let store = MemoryStore::empty().with_position(position("0xpos1", "1000000"));
        let updated = position("0xpos1", "2000000");
        let key = PositionKey {
            position_id: PositionId::new("0xpos1"),
            line_address: Address::new("0xline"),
        };

        store.publish_position(key.clone(), updated.clone()).await.unwrap();

        assert_eq!(store.publish_count(), 1);
        assert_eq!(store.published()[0], (key, updated.clone()));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.positions[0], updated);
        assert_eq!(snapshot.selected_position, Some(updated));
    }

    #[tokio::test]
    async fn test_builder_populates_snapshot() {
        let store = MemoryStore::empty()
            .with_wallet(Address::new("0xwallet"))
            .with_role(UserRole::Borrower);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.wallet_address, Some(Address::new("0xwallet")));
        assert_eq!(snapshot.user_role, UserRole::Borrower);
    }
}
