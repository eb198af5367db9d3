//! Transaction gateway: orchestrates store reads and writes around the
//! pure reconciliation functions.
//!
//! Write ordering follows the document-store flows: wallet adjustments
//! commit before the transaction document is written, and on deletion the
//! wallet is written before the transaction document is removed. The pairs
//! are not atomic; a crash between the two writes leaves the wallet
//! adjusted with the transaction record out of step.

use uuid::Uuid;

use crate::ledger::reconcile;
use crate::ledger::wallet::WALLET_CAS_RETRIES;
use crate::traits::*;
use crate::types::*;

/// Transaction gateway for creating, editing, and deleting transactions
pub struct TransactionGateway<S: WalletStore + TransactionStore, H: ImageHost> {
    storage: S,
    images: H,
    validator: Box<dyn TransactionValidator>,
}

impl<S: WalletStore + TransactionStore, H: ImageHost> TransactionGateway<S, H> {
    /// Create a new transaction gateway
    pub fn new(storage: S, images: H) -> Self {
        Self {
            storage,
            images,
            validator: Box::new(DefaultTransactionValidator),
        }
    }

    /// Create a new transaction gateway with a custom validator
    pub fn with_validator(storage: S, images: H, validator: Box<dyn TransactionValidator>) -> Self {
        Self {
            storage,
            images,
            validator,
        }
    }

    /// Create a new transaction, or merge changes into an existing one.
    ///
    /// Wallet balances are reconciled first; the merged transaction
    /// document, including its identifier, is returned on success.
    pub async fn create_or_update(&mut self, draft: TransactionDraft) -> LedgerResult<Transaction> {
        self.validator.validate_draft(&draft)?;

        match draft.id.clone() {
            Some(id) => self.update_existing(id, draft).await,
            None => self.create_new(draft).await,
        }
    }

    async fn create_new(&mut self, draft: TransactionDraft) -> LedgerResult<Transaction> {
        let amount = draft.amount.clone();
        let kind = draft.kind;
        self.update_wallet_checked(&draft.wallet_id, |wallet| {
            reconcile::apply_new_transaction(wallet, &amount, kind)
        })
        .await?;

        let receipt = self.resolve_receipt(draft.receipt, None).await?;

        let now = chrono::Utc::now().naive_utc();
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            wallet_id: draft.wallet_id,
            owner: draft.owner,
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category.merge_into(None),
            note: draft.note.merge_into(None),
            receipt,
            date: draft.date,
            created_at: now,
            updated_at: now,
        };

        self.storage.save_transaction(&transaction).await?;
        tracing::debug!(
            transaction_id = %transaction.id,
            wallet_id = %transaction.wallet_id,
            "recorded transaction"
        );
        Ok(transaction)
    }

    async fn update_existing(
        &mut self,
        transaction_id: String,
        draft: TransactionDraft,
    ) -> LedgerResult<Transaction> {
        let old = self.get_transaction_required(&transaction_id).await?;

        let needs_rebooking = old.kind != draft.kind
            || old.amount != draft.amount
            || old.wallet_id != draft.wallet_id;

        if needs_rebooking {
            if old.wallet_id == draft.wallet_id {
                self.rebook_same_wallet(&old, &draft).await?;
            } else {
                self.rebook_across_wallets(&old, &draft).await?;
            }
        }

        let receipt = self.resolve_receipt(draft.receipt, old.receipt.clone()).await?;

        let merged = Transaction {
            id: old.id,
            wallet_id: draft.wallet_id,
            owner: old.owner,
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category.merge_into(old.category),
            note: draft.note.merge_into(old.note),
            receipt,
            date: draft.date,
            created_at: old.created_at,
            updated_at: chrono::Utc::now().naive_utc(),
        };

        self.storage.save_transaction(&merged).await?;
        tracing::debug!(transaction_id = %merged.id, "updated transaction");
        Ok(merged)
    }

    /// Delete a transaction and back its booking out of the owning wallet
    pub async fn delete(&mut self, transaction_id: &str) -> LedgerResult<()> {
        let transaction = self.get_transaction_required(transaction_id).await?;

        let amount = transaction.amount.clone();
        let kind = transaction.kind;
        self.update_wallet_checked(&transaction.wallet_id, |wallet| {
            reconcile::apply_deletion(wallet, &amount, kind)
        })
        .await?;

        self.storage.delete_transaction(transaction_id).await?;
        tracing::debug!(transaction_id = %transaction_id, "deleted transaction");
        Ok(())
    }

    /// Get a transaction by ID
    pub async fn get_transaction(&self, transaction_id: &str) -> LedgerResult<Option<Transaction>> {
        self.storage.get_transaction(transaction_id).await
    }

    /// Get a transaction by ID, returning an error if not found
    pub async fn get_transaction_required(
        &self,
        transaction_id: &str,
    ) -> LedgerResult<Transaction> {
        self.storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| LedgerError::TransactionNotFound(transaction_id.to_string()))
    }

    /// List a user's transactions within a date window, most recent first
    pub async fn list_user_transactions(
        &self,
        owner: &str,
        from: Option<chrono::NaiveDateTime>,
        to: Option<chrono::NaiveDateTime>,
    ) -> LedgerResult<Vec<Transaction>> {
        self.storage.list_user_transactions(owner, from, to).await
    }

    /// Rebook an edited transaction whose wallet did not change
    async fn rebook_same_wallet(
        &mut self,
        old: &Transaction,
        draft: &TransactionDraft,
    ) -> LedgerResult<()> {
        self.update_wallet_checked(&old.wallet_id, |wallet| {
            reconcile::apply_edit_same_wallet(
                wallet,
                &old.amount,
                old.kind,
                &draft.amount,
                draft.kind,
            )
        })
        .await
    }

    /// Rebook an edited transaction onto a different wallet: revert the
    /// source, then apply to the target.
    ///
    /// The target's funds are pre-checked before any write so the mutation
    /// aborts cleanly; only a concurrent drain of the target between the
    /// pre-check and the apply can surface `InsufficientFunds` with the
    /// source revert already committed.
    async fn rebook_across_wallets(
        &mut self,
        old: &Transaction,
        draft: &TransactionDraft,
    ) -> LedgerResult<()> {
        if draft.kind == TransactionKind::Expense {
            let target = self.get_wallet_required(&draft.wallet_id).await?;
            if draft.amount > target.balance {
                return Err(LedgerError::InsufficientFunds(target.id));
            }
        }

        self.update_wallet_checked(&old.wallet_id, |wallet| {
            Ok(reconcile::revert_transaction(wallet, &old.amount, old.kind))
        })
        .await?;

        self.update_wallet_checked(&draft.wallet_id, |wallet| {
            reconcile::apply_new_transaction(wallet, &draft.amount, draft.kind)
        })
        .await
    }

    /// Run a reconciliation against the freshest wallet state and persist
    /// it, retrying a bounded number of times on revision conflicts
    async fn update_wallet_checked<F>(&mut self, wallet_id: &str, compute: F) -> LedgerResult<()>
    where
        F: Fn(&Wallet) -> LedgerResult<Wallet>,
    {
        for _ in 0..WALLET_CAS_RETRIES {
            let wallet = self.get_wallet_required(wallet_id).await?;
            let updated = compute(&wallet)?;

            match self.storage.update_wallet(&updated).await {
                Err(LedgerError::Conflict(_)) => {
                    tracing::debug!(wallet_id = %wallet_id, "wallet revision conflict, retrying");
                    continue;
                }
                other => return other,
            }
        }
        Err(LedgerError::Conflict(wallet_id.to_string()))
    }

    async fn get_wallet_required(&self, wallet_id: &str) -> LedgerResult<Wallet> {
        self.storage
            .get_wallet(wallet_id)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound(wallet_id.to_string()))
    }

    /// Resolve a receipt update, uploading new payloads to the image host
    async fn resolve_receipt(
        &self,
        update: FieldUpdate<ImageData>,
        current: Option<String>,
    ) -> LedgerResult<Option<String>> {
        match update {
            FieldUpdate::Unchanged => Ok(current),
            FieldUpdate::Cleared => Ok(None),
            FieldUpdate::Set(image) => {
                let url = self
                    .images
                    .upload(&image, TRANSACTION_IMAGE_FOLDER)
                    .await?;
                Ok(Some(url))
            }
        }
    }
}
