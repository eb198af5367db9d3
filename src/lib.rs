//! # Expense Core
//!
//! A core library for personal expense tracking: income and expense
//! transactions recorded against named wallets, balance reconciliation,
//! aggregated spending statistics, and profile management.
//!
//! ## Features
//!
//! - **Wallet bookkeeping**: every wallet keeps `balance`, `total_income`,
//!   and `total_expenses` in lockstep through pure reconciliation
//! - **Transaction lifecycle**: create, edit (including moving between
//!   wallets), and delete, with overdraft protection on the expense path
//! - **Spending statistics**: weekly, monthly, and yearly chart-ready series
//! - **Storage abstraction**: document-store-agnostic design with
//!   trait-based wallet, transaction, and profile stores
//! - **Conflict safety**: compare-and-swap wallet updates with bounded
//!   retries instead of blind read-modify-write
//! - **Image hosting seam**: wallet icons, receipts, and avatars are
//!   uploaded through a pluggable host
//!
//! ## Quick Start
//!
//! ```rust
//! use expense_core::utils::{MemoryImageHost, MemoryStorage};
//! use expense_core::{ExpenseLedger, TransactionDraft, TransactionKind, WalletDraft};
//! use bigdecimal::BigDecimal;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ledger = ExpenseLedger::new(MemoryStorage::new(), MemoryImageHost::new());
//!
//! let wallet = ledger
//!     .create_or_update_wallet(WalletDraft::new("user1", "Checking"))
//!     .await?;
//!
//! ledger
//!     .create_or_update_transaction(TransactionDraft::new(
//!         wallet.id.clone(),
//!         "user1",
//!         TransactionKind::Income,
//!         BigDecimal::from(500),
//!         chrono::Utc::now().naive_utc(),
//!     ))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod ledger;
pub mod profile;
pub mod stats;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use profile::*;
pub use stats::*;
pub use traits::*;
pub use types::*;

// Re-export the pure reconciliation functions for direct use
pub use ledger::reconcile;
