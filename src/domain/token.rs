//! Token snapshot as fetched from the external token service.

use crate::domain::{Address, RawAmount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of a wallet-held token.
///
/// Fetched externally and only ever referenced by the workflow, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token contract address.
    pub address: Address,
    /// Ticker symbol (e.g., "DAI").
    pub symbol: String,
    /// Decimal precision of the token.
    pub decimals: u32,
    /// Wallet balance in raw units.
    pub balance: RawAmount,
    /// Balance valued in the reference currency.
    pub balance_usd: Decimal,
}

impl Token {
    /// Wallet balance converted to display units.
    pub fn balance_display(&self) -> String {
        crate::domain::to_display_units(&self.balance, self.decimals)
    }

    /// Reference form carried inside positions and form state.
    pub fn to_ref(&self) -> crate::domain::TokenRef {
        crate::domain::TokenRef {
            address: self.address.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }
}
