//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::types::*;

/// Image host folder for wallet icons
pub const WALLET_IMAGE_FOLDER: &str = "wallets";
/// Image host folder for transaction receipts
pub const TRANSACTION_IMAGE_FOLDER: &str = "transactions";
/// Image host folder for profile avatars
pub const PROFILE_IMAGE_FOLDER: &str = "users";

/// Storage abstraction for wallet documents
///
/// This trait allows the expense core to work with any document store
/// (Firestore-like hosted stores, SQL, in-memory, etc.) by implementing
/// these methods.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Save a brand-new wallet document
    async fn save_wallet(&mut self, wallet: &Wallet) -> LedgerResult<()>;

    /// Get a wallet by ID
    async fn get_wallet(&self, wallet_id: &str) -> LedgerResult<Option<Wallet>>;

    /// List all wallets belonging to a user
    async fn list_wallets(&self, owner: &str) -> LedgerResult<Vec<Wallet>>;

    /// Persist changes to an existing wallet.
    ///
    /// Compare-and-swap contract: implementations must compare
    /// `wallet.revision` (the revision the caller read) against the stored
    /// revision and fail with [`LedgerError::Conflict`] when they differ.
    /// On success the stored record carries `revision + 1`.
    async fn update_wallet(&mut self, wallet: &Wallet) -> LedgerResult<()>;

    /// Delete a wallet document
    async fn delete_wallet(&mut self, wallet_id: &str) -> LedgerResult<()>;
}

/// Storage abstraction for transaction documents
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Save a transaction document, overwriting any existing record with
    /// the same ID
    async fn save_transaction(&mut self, transaction: &Transaction) -> LedgerResult<()>;

    /// Get a transaction by ID
    async fn get_transaction(&self, transaction_id: &str) -> LedgerResult<Option<Transaction>>;

    /// List a user's transactions within a date window, most recent first
    async fn list_user_transactions(
        &self,
        owner: &str,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> LedgerResult<Vec<Transaction>>;

    /// List up to `limit` IDs of transactions referencing a wallet
    async fn list_wallet_transaction_ids(
        &self,
        wallet_id: &str,
        limit: usize,
    ) -> LedgerResult<Vec<String>>;

    /// Delete a single transaction document
    async fn delete_transaction(&mut self, transaction_id: &str) -> LedgerResult<()>;

    /// Delete a batch of transaction documents; IDs that no longer exist
    /// are skipped
    async fn delete_transactions(&mut self, transaction_ids: &[String]) -> LedgerResult<()>;
}

/// Storage abstraction for user profile documents
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get a profile by user ID
    async fn get_profile(&self, uid: &str) -> LedgerResult<Option<UserProfile>>;

    /// Save a profile document, overwriting any existing record
    async fn save_profile(&mut self, profile: &UserProfile) -> LedgerResult<()>;
}

/// External image host used for wallet icons, receipts, and avatars
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload an image under a logical folder and return its stable URL
    async fn upload(&self, image: &ImageData, folder: &str) -> LedgerResult<String>;
}

/// Trait for implementing custom wallet validation rules
pub trait WalletValidator: Send + Sync {
    /// Validate a wallet draft before it is persisted
    fn validate_draft(&self, draft: &WalletDraft) -> LedgerResult<()>;

    /// Validate wallet deletion (e.g., guard wallets with a balance)
    fn validate_deletion(&self, wallet_id: &str) -> LedgerResult<()>;
}

/// Trait for implementing custom transaction validation rules
pub trait TransactionValidator: Send + Sync {
    /// Validate a transaction draft before reconciliation runs
    fn validate_draft(&self, draft: &TransactionDraft) -> LedgerResult<()>;
}

/// Default wallet validator with basic rules
pub struct DefaultWalletValidator;

impl WalletValidator for DefaultWalletValidator {
    fn validate_draft(&self, draft: &WalletDraft) -> LedgerResult<()> {
        if draft.owner.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Wallet owner cannot be empty".to_string(),
            ));
        }

        match &draft.name {
            Some(name) if name.trim().is_empty() => Err(LedgerError::Validation(
                "Wallet name cannot be empty".to_string(),
            )),
            None if draft.id.is_none() => Err(LedgerError::Validation(
                "A new wallet requires a name".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_deletion(&self, _wallet_id: &str) -> LedgerResult<()> {
        Ok(())
    }
}

/// Default transaction validator with basic rules
pub struct DefaultTransactionValidator;

impl TransactionValidator for DefaultTransactionValidator {
    fn validate_draft(&self, draft: &TransactionDraft) -> LedgerResult<()> {
        if draft.amount <= bigdecimal::BigDecimal::from(0) {
            return Err(LedgerError::Validation(
                "Transaction amount must be positive".to_string(),
            ));
        }

        if draft.wallet_id.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Transaction must reference a wallet".to_string(),
            ));
        }

        if draft.owner.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Transaction owner cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
