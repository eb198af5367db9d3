//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    wallets: Arc<RwLock<HashMap<String, Wallet>>>,
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            wallets: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(HashMap::new())),
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.wallets.write().unwrap().clear();
        self.transactions.write().unwrap().clear();
        self.profiles.write().unwrap().clear();
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletStore for MemoryStorage {
    async fn save_wallet(&mut self, wallet: &Wallet) -> LedgerResult<()> {
        self.wallets
            .write()
            .unwrap()
            .insert(wallet.id.clone(), wallet.clone());
        Ok(())
    }

    async fn get_wallet(&self, wallet_id: &str) -> LedgerResult<Option<Wallet>> {
        Ok(self.wallets.read().unwrap().get(wallet_id).cloned())
    }

    async fn list_wallets(&self, owner: &str) -> LedgerResult<Vec<Wallet>> {
        let wallets = self.wallets.read().unwrap();
        let mut owned: Vec<Wallet> = wallets
            .values()
            .filter(|wallet| wallet.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(owned)
    }

    async fn update_wallet(&mut self, wallet: &Wallet) -> LedgerResult<()> {
        let mut wallets = self.wallets.write().unwrap();
        let stored_revision = wallets.get(&wallet.id).map(|stored| stored.revision);
        match stored_revision {
            None => Err(LedgerError::WalletNotFound(wallet.id.clone())),
            Some(revision) if revision != wallet.revision => {
                Err(LedgerError::Conflict(wallet.id.clone()))
            }
            Some(_) => {
                let mut committed = wallet.clone();
                committed.revision += 1;
                wallets.insert(committed.id.clone(), committed);
                Ok(())
            }
        }
    }

    async fn delete_wallet(&mut self, wallet_id: &str) -> LedgerResult<()> {
        if self.wallets.write().unwrap().remove(wallet_id).is_some() {
            Ok(())
        } else {
            Err(LedgerError::WalletNotFound(wallet_id.to_string()))
        }
    }
}

#[async_trait]
impl TransactionStore for MemoryStorage {
    async fn save_transaction(&mut self, transaction: &Transaction) -> LedgerResult<()> {
        self.transactions
            .write()
            .unwrap()
            .insert(transaction.id.clone(), transaction.clone());
        Ok(())
    }

    async fn get_transaction(&self, transaction_id: &str) -> LedgerResult<Option<Transaction>> {
        Ok(self
            .transactions
            .read()
            .unwrap()
            .get(transaction_id)
            .cloned())
    }

    async fn list_user_transactions(
        &self,
        owner: &str,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> LedgerResult<Vec<Transaction>> {
        let transactions = self.transactions.read().unwrap();
        let mut matching: Vec<Transaction> = transactions
            .values()
            .filter(|txn| {
                if txn.owner != owner {
                    return false;
                }
                if let Some(from) = from {
                    if txn.date < from {
                        return false;
                    }
                }
                if let Some(to) = to {
                    if txn.date > to {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matching)
    }

    async fn list_wallet_transaction_ids(
        &self,
        wallet_id: &str,
        limit: usize,
    ) -> LedgerResult<Vec<String>> {
        let transactions = self.transactions.read().unwrap();
        Ok(transactions
            .values()
            .filter(|txn| txn.wallet_id == wallet_id)
            .map(|txn| txn.id.clone())
            .take(limit)
            .collect())
    }

    async fn delete_transaction(&mut self, transaction_id: &str) -> LedgerResult<()> {
        if self
            .transactions
            .write()
            .unwrap()
            .remove(transaction_id)
            .is_some()
        {
            Ok(())
        } else {
            Err(LedgerError::TransactionNotFound(transaction_id.to_string()))
        }
    }

    async fn delete_transactions(&mut self, transaction_ids: &[String]) -> LedgerResult<()> {
        let mut transactions = self.transactions.write().unwrap();
        for id in transaction_ids {
            transactions.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStorage {
    async fn get_profile(&self, uid: &str) -> LedgerResult<Option<UserProfile>> {
        Ok(self.profiles.read().unwrap().get(uid).cloned())
    }

    async fn save_profile(&mut self, profile: &UserProfile) -> LedgerResult<()> {
        self.profiles
            .write()
            .unwrap()
            .insert(profile.uid.clone(), profile.clone());
        Ok(())
    }
}

/// In-memory image host that hands out `memory://` URLs
#[derive(Debug, Clone, Default)]
pub struct MemoryImageHost {
    uploads: Arc<AtomicU64>,
}

impl MemoryImageHost {
    /// Create a new memory image host
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of uploads performed so far
    pub fn upload_count(&self) -> u64 {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for MemoryImageHost {
    async fn upload(&self, image: &ImageData, folder: &str) -> LedgerResult<String> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("memory://{}/{}-{}", folder, n, image.filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[tokio::test]
    async fn test_wallet_update_is_compare_and_swap() {
        let mut storage = MemoryStorage::new();
        let wallet = Wallet::new("w1".to_string(), "Cash".to_string(), "user1".to_string());
        storage.save_wallet(&wallet).await.unwrap();

        // First writer wins and bumps the revision
        let mut first = wallet.clone();
        first.apply(TransactionKind::Income, &BigDecimal::from(10));
        storage.update_wallet(&first).await.unwrap();

        let stored = storage.get_wallet("w1").await.unwrap().unwrap();
        assert_eq!(stored.revision, 1);
        assert_eq!(stored.balance, BigDecimal::from(10));

        // Second writer still holds revision 0 and must be rejected
        let mut second = wallet.clone();
        second.apply(TransactionKind::Income, &BigDecimal::from(99));
        let result = storage.update_wallet(&second).await;
        assert!(matches!(result, Err(LedgerError::Conflict(id)) if id == "w1"));

        // The stale write must not have clobbered the first one
        let stored = storage.get_wallet("w1").await.unwrap().unwrap();
        assert_eq!(stored.balance, BigDecimal::from(10));
    }

    #[tokio::test]
    async fn test_update_missing_wallet_is_not_found() {
        let mut storage = MemoryStorage::new();
        let wallet = Wallet::new("ghost".to_string(), "x".to_string(), "user1".to_string());
        let result = storage.update_wallet(&wallet).await;
        assert!(matches!(result, Err(LedgerError::WalletNotFound(_))));
    }

    #[tokio::test]
    async fn test_wallet_transaction_id_pages_respect_limit() {
        let mut storage = MemoryStorage::new();
        let now = chrono::Utc::now().naive_utc();
        for i in 0..5 {
            let txn = Transaction {
                id: format!("t{}", i),
                wallet_id: "w1".to_string(),
                owner: "user1".to_string(),
                kind: TransactionKind::Income,
                amount: BigDecimal::from(1),
                category: None,
                note: None,
                receipt: None,
                date: now,
                created_at: now,
                updated_at: now,
            };
            storage.save_transaction(&txn).await.unwrap();
        }

        let page = storage.list_wallet_transaction_ids("w1", 2).await.unwrap();
        assert_eq!(page.len(), 2);

        let all = storage.list_wallet_transaction_ids("w1", 100).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn test_user_transactions_sorted_most_recent_first() {
        let mut storage = MemoryStorage::new();
        let base = chrono::Utc::now().naive_utc();
        for i in 0..3i64 {
            let txn = Transaction {
                id: format!("t{}", i),
                wallet_id: "w1".to_string(),
                owner: "user1".to_string(),
                kind: TransactionKind::Income,
                amount: BigDecimal::from(1),
                category: None,
                note: None,
                receipt: None,
                date: base - chrono::Duration::days(i),
                created_at: base,
                updated_at: base,
            };
            storage.save_transaction(&txn).await.unwrap();
        }

        let listed = storage
            .list_user_transactions("user1", None, None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, "t0");
        assert_eq!(listed[2].id, "t2");
    }
}
