//! Main ledger facade that coordinates wallets, transactions, profiles,
//! and statistics

use chrono::{Datelike, Duration};
use serde::{Deserialize, Serialize};

use crate::ledger::{TransactionGateway, WalletManager};
use crate::profile::ProfileManager;
use crate::stats::{self, StatsReport};
use crate::traits::*;
use crate::types::*;

/// Main expense ledger that orchestrates all operations
pub struct ExpenseLedger<S, H>
where
    S: WalletStore + TransactionStore + ProfileStore,
    H: ImageHost,
{
    wallets: WalletManager<S, H>,
    transactions: TransactionGateway<S, H>,
    profiles: ProfileManager<S, H>,
    storage: S,
}

impl<S, H> ExpenseLedger<S, H>
where
    S: WalletStore + TransactionStore + ProfileStore + Clone,
    H: ImageHost + Clone,
{
    /// Create a new ledger over the given storage backend and image host
    pub fn new(storage: S, images: H) -> Self {
        Self {
            wallets: WalletManager::new(storage.clone(), images.clone()),
            transactions: TransactionGateway::new(storage.clone(), images.clone()),
            profiles: ProfileManager::new(storage.clone(), images),
            storage,
        }
    }

    /// Create a new ledger with custom validators
    pub fn with_validators(
        storage: S,
        images: H,
        wallet_validator: Box<dyn WalletValidator>,
        transaction_validator: Box<dyn TransactionValidator>,
    ) -> Self {
        Self {
            wallets: WalletManager::with_validator(
                storage.clone(),
                images.clone(),
                wallet_validator,
            ),
            transactions: TransactionGateway::with_validator(
                storage.clone(),
                images.clone(),
                transaction_validator,
            ),
            profiles: ProfileManager::new(storage.clone(), images),
            storage,
        }
    }

    // Wallet operations
    /// Create a wallet or merge changes into an existing one
    pub async fn create_or_update_wallet(&mut self, draft: WalletDraft) -> LedgerResult<Wallet> {
        self.wallets.create_or_update(draft).await
    }

    /// Get a wallet by ID
    pub async fn get_wallet(&self, wallet_id: &str) -> LedgerResult<Option<Wallet>> {
        self.wallets.get_wallet(wallet_id).await
    }

    /// List all wallets belonging to a user
    pub async fn list_wallets(&self, owner: &str) -> LedgerResult<Vec<Wallet>> {
        self.wallets.list_wallets(owner).await
    }

    /// Delete a wallet and every transaction referencing it
    pub async fn delete_wallet(&mut self, wallet_id: &str) -> LedgerResult<()> {
        self.wallets.delete_wallet(wallet_id).await
    }

    // Transaction operations
    /// Create a transaction or merge changes into an existing one
    pub async fn create_or_update_transaction(
        &mut self,
        draft: TransactionDraft,
    ) -> LedgerResult<Transaction> {
        self.transactions.create_or_update(draft).await
    }

    /// Get a transaction by ID
    pub async fn get_transaction(&self, transaction_id: &str) -> LedgerResult<Option<Transaction>> {
        self.transactions.get_transaction(transaction_id).await
    }

    /// Delete a transaction and back it out of its wallet
    pub async fn delete_transaction(&mut self, transaction_id: &str) -> LedgerResult<()> {
        self.transactions.delete(transaction_id).await
    }

    /// List a user's transactions within a date window, most recent first
    pub async fn list_transactions(
        &self,
        owner: &str,
        from: Option<chrono::NaiveDateTime>,
        to: Option<chrono::NaiveDateTime>,
    ) -> LedgerResult<Vec<Transaction>> {
        self.transactions.list_user_transactions(owner, from, to).await
    }

    // Profile operations
    /// Get a user's profile
    pub async fn get_profile(&self, uid: &str) -> LedgerResult<Option<UserProfile>> {
        self.profiles.get_profile(uid).await
    }

    /// Merge profile changes for a user
    pub async fn update_profile(
        &mut self,
        uid: &str,
        draft: ProfileDraft,
    ) -> LedgerResult<UserProfile> {
        self.profiles.update_profile(uid, draft).await
    }

    // Statistics
    /// Per-day income/expense series for the last seven days
    pub async fn weekly_stats(&self, owner: &str) -> LedgerResult<StatsReport> {
        let now = chrono::Utc::now().naive_utc();
        let transactions = self
            .storage
            .list_user_transactions(owner, Some(now - Duration::days(7)), Some(now))
            .await?;

        let mut buckets = stats::last_seven_days(now.date());
        stats::fold_daily(&mut buckets, &transactions);

        Ok(StatsReport {
            series: stats::to_chart_series(&buckets),
            transactions,
        })
    }

    /// Per-month income/expense series for the last twelve months
    pub async fn monthly_stats(&self, owner: &str) -> LedgerResult<StatsReport> {
        let now = chrono::Utc::now().naive_utc();
        let from = now.checked_sub_months(chrono::Months::new(12)).unwrap_or(now);
        let transactions = self
            .storage
            .list_user_transactions(owner, Some(from), Some(now))
            .await?;

        let mut buckets = stats::last_twelve_months(now.date());
        stats::fold_monthly(&mut buckets, &transactions);

        Ok(StatsReport {
            series: stats::to_chart_series(&buckets),
            transactions,
        })
    }

    /// Per-year income/expense series from the earliest transaction's year
    /// through the current year
    pub async fn yearly_stats(&self, owner: &str) -> LedgerResult<StatsReport> {
        let now = chrono::Utc::now().naive_utc();
        let transactions = self
            .storage
            .list_user_transactions(owner, None, None)
            .await?;

        let first_year = stats::earliest_year(&transactions, now.date().year());
        let mut buckets = stats::years_range(first_year, now.date().year());
        stats::fold_yearly(&mut buckets, &transactions);

        Ok(StatsReport {
            series: stats::to_chart_series(&buckets),
            transactions,
        })
    }

    /// Check the bookkeeping invariant across all of a user's wallets
    pub async fn check_wallet_integrity(
        &self,
        owner: &str,
    ) -> LedgerResult<WalletIntegrityReport> {
        let wallets = self.wallets.list_wallets(owner).await?;

        let mut issues = Vec::new();
        for wallet in &wallets {
            if !wallet.is_consistent() {
                issues.push(format!(
                    "Wallet '{}' is inconsistent: balance = {}, income - expenses = {}",
                    wallet.id,
                    wallet.balance,
                    &wallet.total_income - &wallet.total_expenses
                ));
            }
        }

        Ok(WalletIntegrityReport {
            is_valid: issues.is_empty(),
            issues,
        })
    }
}

/// Report on wallet bookkeeping integrity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletIntegrityReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::{MemoryImageHost, MemoryStorage};
    use bigdecimal::BigDecimal;

    #[tokio::test]
    async fn test_ledger_basic_operations() {
        let storage = MemoryStorage::new();
        let mut ledger = ExpenseLedger::new(storage, MemoryImageHost::new());

        let wallet = ledger
            .create_or_update_wallet(WalletDraft::new("user1", "Checking"))
            .await
            .unwrap();
        assert_eq!(wallet.balance, BigDecimal::from(0));

        let now = chrono::Utc::now().naive_utc();
        let income = ledger
            .create_or_update_transaction(TransactionDraft::new(
                wallet.id.clone(),
                "user1",
                TransactionKind::Income,
                BigDecimal::from(500),
                now,
            ))
            .await
            .unwrap();

        let expense = ledger
            .create_or_update_transaction(
                TransactionDraft::new(
                    wallet.id.clone(),
                    "user1",
                    TransactionKind::Expense,
                    BigDecimal::from(120),
                    now,
                )
                .category("groceries"),
            )
            .await
            .unwrap();

        let stored = ledger.get_wallet(&wallet.id).await.unwrap().unwrap();
        assert_eq!(stored.balance, BigDecimal::from(380));
        assert_eq!(stored.total_income, BigDecimal::from(500));
        assert_eq!(stored.total_expenses, BigDecimal::from(120));
        assert!(stored.is_consistent());

        assert!(ledger.get_transaction(&income.id).await.unwrap().is_some());
        assert_eq!(expense.category.as_deref(), Some("groceries"));

        let report = ledger.check_wallet_integrity("user1").await.unwrap();
        assert!(report.is_valid);
    }
}
