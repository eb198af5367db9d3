//! Wallet management functionality

use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// Page size for the cascade-delete drain loop
const DELETE_BATCH_SIZE: usize = 250;

/// Retry budget for compare-and-swap wallet updates
pub(crate) const WALLET_CAS_RETRIES: usize = 5;

/// Wallet manager for handling wallet documents and their cascade rules
pub struct WalletManager<S: WalletStore + TransactionStore, H: ImageHost> {
    pub(crate) storage: S,
    images: H,
    validator: Box<dyn WalletValidator>,
}

impl<S: WalletStore + TransactionStore, H: ImageHost> WalletManager<S, H> {
    /// Create a new wallet manager
    pub fn new(storage: S, images: H) -> Self {
        Self {
            storage,
            images,
            validator: Box::new(DefaultWalletValidator),
        }
    }

    /// Create a new wallet manager with a custom validator
    pub fn with_validator(storage: S, images: H, validator: Box<dyn WalletValidator>) -> Self {
        Self {
            storage,
            images,
            validator,
        }
    }

    /// Create a wallet (zero balances) or merge changes into an existing one
    pub async fn create_or_update(&mut self, draft: WalletDraft) -> LedgerResult<Wallet> {
        self.validator.validate_draft(&draft)?;

        // Upload once, outside the retry loop
        let icon_update = match draft.icon {
            FieldUpdate::Set(image) => {
                let url = self.images.upload(&image, WALLET_IMAGE_FOLDER).await?;
                FieldUpdate::Set(url)
            }
            FieldUpdate::Cleared => FieldUpdate::Cleared,
            FieldUpdate::Unchanged => FieldUpdate::Unchanged,
        };

        match draft.id {
            Some(wallet_id) => self.update_existing(wallet_id, draft.name, icon_update).await,
            None => {
                // validator guarantees a name on the create path
                let name = draft.name.unwrap_or_default();
                self.create_new(name, draft.owner, icon_update).await
            }
        }
    }

    async fn create_new(
        &mut self,
        name: String,
        owner: String,
        icon: FieldUpdate<String>,
    ) -> LedgerResult<Wallet> {
        let mut wallet = Wallet::new(Uuid::new_v4().to_string(), name, owner);
        wallet.icon = icon.merge_into(None);

        self.storage.save_wallet(&wallet).await?;
        tracing::info!(wallet_id = %wallet.id, "created wallet");
        Ok(wallet)
    }

    async fn update_existing(
        &mut self,
        wallet_id: String,
        name: Option<String>,
        icon: FieldUpdate<String>,
    ) -> LedgerResult<Wallet> {
        for _ in 0..WALLET_CAS_RETRIES {
            let mut wallet = self.get_wallet_required(&wallet_id).await?;
            if let Some(ref name) = name {
                wallet.name = name.clone();
            }
            wallet.icon = icon.clone().merge_into(wallet.icon.take());
            wallet.updated_at = chrono::Utc::now().naive_utc();

            match self.storage.update_wallet(&wallet).await {
                Err(LedgerError::Conflict(_)) => {
                    tracing::debug!(wallet_id = %wallet_id, "wallet revision conflict, retrying");
                    continue;
                }
                Err(err) => return Err(err),
                Ok(()) => {
                    wallet.revision += 1;
                    return Ok(wallet);
                }
            }
        }
        Err(LedgerError::Conflict(wallet_id))
    }

    /// Get a wallet by ID
    pub async fn get_wallet(&self, wallet_id: &str) -> LedgerResult<Option<Wallet>> {
        self.storage.get_wallet(wallet_id).await
    }

    /// Get a wallet by ID, returning an error if not found
    pub async fn get_wallet_required(&self, wallet_id: &str) -> LedgerResult<Wallet> {
        self.storage
            .get_wallet(wallet_id)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound(wallet_id.to_string()))
    }

    /// List all wallets belonging to a user
    pub async fn list_wallets(&self, owner: &str) -> LedgerResult<Vec<Wallet>> {
        self.storage.list_wallets(owner).await
    }

    /// Delete a wallet and drain every transaction referencing it.
    ///
    /// The wallet document is deleted first; the drain then removes
    /// referencing transactions in bounded batches until a query comes back
    /// empty. The two steps are not atomic.
    pub async fn delete_wallet(&mut self, wallet_id: &str) -> LedgerResult<()> {
        self.validator.validate_deletion(wallet_id)?;

        // Surface a NotFound before issuing any deletes
        self.get_wallet_required(wallet_id).await?;

        self.storage.delete_wallet(wallet_id).await?;
        tracing::info!(wallet_id = %wallet_id, "deleted wallet, draining transactions");

        self.drain_wallet_transactions(wallet_id).await
    }

    async fn drain_wallet_transactions(&mut self, wallet_id: &str) -> LedgerResult<()> {
        loop {
            let page = self
                .storage
                .list_wallet_transaction_ids(wallet_id, DELETE_BATCH_SIZE)
                .await?;
            if page.is_empty() {
                break;
            }

            let count = page.len();
            self.storage.delete_transactions(&page).await?;
            tracing::debug!(wallet_id = %wallet_id, count, "drained transaction batch");
        }
        Ok(())
    }
}
