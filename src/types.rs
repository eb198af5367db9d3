//! Core types and data structures for the expense tracking system

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Whether a transaction adds money to a wallet or takes money out of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money flowing into the wallet
    Income,
    /// Money flowing out of the wallet
    Expense,
}

/// A named balance bucket owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Unique identifier for the wallet
    pub id: String,
    /// Human-readable wallet name
    pub name: String,
    /// Opaque user identifier from the identity provider
    pub owner: String,
    /// Hosted URL of the wallet icon, if one was uploaded
    pub icon: Option<String>,
    /// Current balance; always `total_income - total_expenses`
    pub balance: BigDecimal,
    /// Cumulative income recorded against this wallet
    pub total_income: BigDecimal,
    /// Cumulative expenses recorded against this wallet
    pub total_expenses: BigDecimal,
    /// Compare-and-swap stamp; bumped by the store on every committed update
    pub revision: u64,
    /// When the wallet was created
    pub created_at: NaiveDateTime,
    /// When the wallet was last updated
    pub updated_at: NaiveDateTime,
}

impl Wallet {
    /// Create a new wallet with zeroed balances
    pub fn new(id: String, name: String, owner: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            name,
            owner,
            icon: None,
            balance: BigDecimal::from(0),
            total_income: BigDecimal::from(0),
            total_expenses: BigDecimal::from(0),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Book a transaction against the wallet totals
    pub fn apply(&mut self, kind: TransactionKind, amount: &BigDecimal) {
        match kind {
            TransactionKind::Income => {
                self.balance += amount;
                self.total_income += amount;
            }
            TransactionKind::Expense => {
                self.balance -= amount;
                self.total_expenses += amount;
            }
        }
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Remove a previously booked transaction from the wallet totals,
    /// as if it had never existed
    pub fn revert(&mut self, kind: TransactionKind, amount: &BigDecimal) {
        match kind {
            TransactionKind::Income => {
                self.balance -= amount;
                self.total_income -= amount;
            }
            TransactionKind::Expense => {
                self.balance += amount;
                self.total_expenses -= amount;
            }
        }
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Check the wallet bookkeeping invariant
    pub fn is_consistent(&self) -> bool {
        self.balance == &self.total_income - &self.total_expenses
    }
}

/// A single income or expense event affecting exactly one wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: String,
    /// The wallet this transaction is booked against
    pub wallet_id: String,
    /// Opaque user identifier from the identity provider
    pub owner: String,
    /// Income or expense
    pub kind: TransactionKind,
    /// Positive amount of the transaction
    pub amount: BigDecimal,
    /// Optional spending category
    pub category: Option<String>,
    /// Optional free-form note
    pub note: Option<String>,
    /// Hosted URL of the receipt image, if one was uploaded
    pub receipt: Option<String>,
    /// When the transaction occurred
    pub date: NaiveDateTime,
    /// When the transaction was created
    pub created_at: NaiveDateTime,
    /// When the transaction was last updated
    pub updated_at: NaiveDateTime,
}

/// Raw image payload handed to the image host for upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// Original file name, kept by hosts that preserve one
    pub filename: String,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }
}

/// Tagged update value for optional fields in drafts.
///
/// Makes the caller's intent explicit instead of inferring it from the
/// presence or absence of a key: `Unchanged` keeps the stored value,
/// `Cleared` unsets it, `Set` replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldUpdate<T> {
    /// Keep whatever the stored record currently holds
    Unchanged,
    /// Remove the stored value
    Cleared,
    /// Replace the stored value
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Unchanged
    }
}

impl<T> FieldUpdate<T> {
    /// Resolve the update against the currently stored value
    pub fn merge_into(self, current: Option<T>) -> Option<T> {
        match self {
            FieldUpdate::Unchanged => current,
            FieldUpdate::Cleared => None,
            FieldUpdate::Set(value) => Some(value),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }
}

/// Mutation payload for creating or updating a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Identifier of an existing transaction; `None` creates a new one
    pub id: Option<String>,
    /// The wallet the transaction should be booked against
    pub wallet_id: String,
    /// Opaque user identifier from the identity provider
    pub owner: String,
    /// Income or expense
    pub kind: TransactionKind,
    /// Positive amount of the transaction
    pub amount: BigDecimal,
    /// When the transaction occurred
    pub date: NaiveDateTime,
    /// Spending category update
    pub category: FieldUpdate<String>,
    /// Free-form note update
    pub note: FieldUpdate<String>,
    /// Receipt image update; `Set` payloads are uploaded to the image host
    pub receipt: FieldUpdate<ImageData>,
}

impl TransactionDraft {
    /// Start a draft for a brand-new transaction
    pub fn new(
        wallet_id: impl Into<String>,
        owner: impl Into<String>,
        kind: TransactionKind,
        amount: BigDecimal,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            wallet_id: wallet_id.into(),
            owner: owner.into(),
            kind,
            amount,
            date,
            category: FieldUpdate::Unchanged,
            note: FieldUpdate::Unchanged,
            receipt: FieldUpdate::Unchanged,
        }
    }

    /// Target an existing transaction instead of creating a new one
    pub fn editing(mut self, transaction_id: impl Into<String>) -> Self {
        self.id = Some(transaction_id.into());
        self
    }

    /// Set the spending category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = FieldUpdate::Set(category.into());
        self
    }

    /// Set the free-form note
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = FieldUpdate::Set(note.into());
        self
    }

    /// Attach a receipt image to be uploaded
    pub fn receipt(mut self, image: ImageData) -> Self {
        self.receipt = FieldUpdate::Set(image);
        self
    }
}

/// Mutation payload for creating or updating a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletDraft {
    /// Identifier of an existing wallet; `None` creates a new one
    pub id: Option<String>,
    /// Opaque user identifier from the identity provider
    pub owner: String,
    /// New wallet name; required when creating
    pub name: Option<String>,
    /// Wallet icon update; `Set` payloads are uploaded to the image host
    pub icon: FieldUpdate<ImageData>,
}

impl WalletDraft {
    /// Start a draft for a brand-new wallet
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            owner: owner.into(),
            name: Some(name.into()),
            icon: FieldUpdate::Unchanged,
        }
    }

    /// Start a draft updating an existing wallet
    pub fn update(wallet_id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: Some(wallet_id.into()),
            owner: owner.into(),
            name: None,
            icon: FieldUpdate::Unchanged,
        }
    }

    /// Rename the wallet
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an icon image to be uploaded
    pub fn icon(mut self, image: ImageData) -> Self {
        self.icon = FieldUpdate::Set(image);
        self
    }
}

/// Profile fields kept for a user, scoped by the identity provider's uid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque user identifier from the identity provider
    pub uid: String,
    /// Display name
    pub name: String,
    /// Email address, when the identity provider supplies one
    pub email: Option<String>,
    /// Hosted URL of the avatar image, if one was uploaded
    pub avatar: Option<String>,
    /// When the profile was created
    pub created_at: NaiveDateTime,
    /// When the profile was last updated
    pub updated_at: NaiveDateTime,
}

impl UserProfile {
    /// Create a fresh profile record
    pub fn new(uid: String, name: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            uid,
            name,
            email: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Mutation payload for updating a user profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    /// New display name, when the user changed it
    pub name: Option<String>,
    /// Avatar image update; `Set` payloads are uploaded to the image host
    pub avatar: FieldUpdate<ImageData>,
}

/// Errors that can occur in the expense tracking system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Wallet '{0}' does not have enough balance")]
    InsufficientFunds(String),
    #[error("Conflicting update on wallet '{0}'")]
    Conflict(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Image host error: {0}")]
    ImageHost(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
