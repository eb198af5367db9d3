//! Basic wallet and transaction usage example

use bigdecimal::BigDecimal;
use expense_core::utils::{MemoryImageHost, MemoryStorage};
use expense_core::{ExpenseLedger, TransactionDraft, TransactionKind, WalletDraft};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("💰 Expense Core - Basic Wallet Example\n");

    // Create a ledger with in-memory storage
    let storage = MemoryStorage::new();
    let mut ledger = ExpenseLedger::new(storage, MemoryImageHost::new());

    // 1. Set up a wallet
    println!("👛 Creating a wallet...");
    let wallet = ledger
        .create_or_update_wallet(WalletDraft::new("demo-user", "Checking"))
        .await?;
    println!("  ✓ Created wallet: {} - {}", wallet.id, wallet.name);
    println!();

    // 2. Record some transactions
    println!("🧾 Recording transactions...\n");

    let now = chrono::Utc::now().naive_utc();

    ledger
        .create_or_update_transaction(
            TransactionDraft::new(
                wallet.id.clone(),
                "demo-user",
                TransactionKind::Income,
                BigDecimal::from(2500),
                now,
            )
            .category("salary")
            .note("March salary"),
        )
        .await?;
    println!("  ✓ Recorded: salary income of 2500");

    let groceries = ledger
        .create_or_update_transaction(
            TransactionDraft::new(
                wallet.id.clone(),
                "demo-user",
                TransactionKind::Expense,
                BigDecimal::from(180),
                now,
            )
            .category("groceries"),
        )
        .await?;
    println!("  ✓ Recorded: grocery expense of 180");

    let balance = ledger.get_wallet(&wallet.id).await?.unwrap();
    println!("\n📊 Wallet after booking:");
    println!("  Balance:        {}", balance.balance);
    println!("  Total income:   {}", balance.total_income);
    println!("  Total expenses: {}", balance.total_expenses);
    println!();

    // 3. Edit the grocery run up to 220
    println!("✏️  Editing the grocery expense to 220...");
    ledger
        .create_or_update_transaction(
            TransactionDraft::new(
                wallet.id.clone(),
                "demo-user",
                TransactionKind::Expense,
                BigDecimal::from(220),
                now,
            )
            .editing(groceries.id.clone()),
        )
        .await?;

    let balance = ledger.get_wallet(&wallet.id).await?.unwrap();
    println!("  ✓ Balance is now {}", balance.balance);
    println!();

    // 4. An overdraft attempt is rejected before anything is written
    println!("🚫 Trying to overspend...");
    let result = ledger
        .create_or_update_transaction(TransactionDraft::new(
            wallet.id.clone(),
            "demo-user",
            TransactionKind::Expense,
            BigDecimal::from(1_000_000),
            now,
        ))
        .await;
    match result {
        Err(err) => println!("  ✓ Rejected as expected: {}", err),
        Ok(_) => println!("  ✗ Unexpectedly accepted!"),
    }
    println!();

    // 5. Delete the grocery expense again
    println!("🗑️  Deleting the grocery expense...");
    ledger.delete_transaction(&groceries.id).await?;

    let balance = ledger.get_wallet(&wallet.id).await?.unwrap();
    println!("  ✓ Balance restored to {}", balance.balance);
    println!();

    // 6. Integrity check across all wallets
    let report = ledger.check_wallet_integrity("demo-user").await?;
    println!(
        "🔍 Integrity check: {}",
        if report.is_valid { "OK" } else { "FAILED" }
    );

    Ok(())
}
