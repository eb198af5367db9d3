//! Ledger module containing wallet management, transaction orchestration,
//! and balance reconciliation

pub mod core;
pub mod reconcile;
pub mod transaction;
pub mod wallet;

pub use core::*;
pub use transaction::*;
pub use wallet::*;
