//! Domain types for the credit-line transaction workflow.
//!
//! This module provides:
//! - Lossless raw-unit amounts and display-string conversion
//! - Domain primitives: Address, Network
//! - Token, CreditLine, and Position snapshots
//! - The pure principal-update calculator

pub mod amount;
pub mod line;
pub mod position;
pub mod primitives;
pub mod token;

pub use amount::{format_for_display, to_display_units, to_raw_units, AmountError, RawAmount};
pub use line::{CreditLine, LineStatus};
pub use position::{apply_principal_delta, Position, PositionId, PositionStatus, TokenRef};
pub use primitives::{Address, Network};
pub use token::Token;
