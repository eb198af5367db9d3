//! Spending statistics example

use bigdecimal::BigDecimal;
use expense_core::utils::{MemoryImageHost, MemoryStorage};
use expense_core::{ExpenseLedger, TransactionDraft, TransactionKind, WalletDraft};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📈 Expense Core - Spending Statistics Example\n");

    let mut ledger = ExpenseLedger::new(MemoryStorage::new(), MemoryImageHost::new());

    let wallet = ledger
        .create_or_update_wallet(WalletDraft::new("demo-user", "Everyday"))
        .await?;

    // Seed a week of activity
    println!("🧾 Seeding a week of transactions...");
    let now = chrono::Utc::now().naive_utc();

    ledger
        .create_or_update_transaction(
            TransactionDraft::new(
                wallet.id.clone(),
                "demo-user",
                TransactionKind::Income,
                BigDecimal::from(1200),
                now - chrono::Duration::days(5),
            )
            .category("freelance"),
        )
        .await?;

    for (days_ago, amount, category) in [
        (4i64, 35, "coffee"),
        (3, 80, "groceries"),
        (1, 42, "transport"),
        (0, 210, "rent share"),
    ] {
        ledger
            .create_or_update_transaction(
                TransactionDraft::new(
                    wallet.id.clone(),
                    "demo-user",
                    TransactionKind::Expense,
                    BigDecimal::from(amount),
                    now - chrono::Duration::days(days_ago),
                )
                .category(category),
            )
            .await?;
    }
    println!("  ✓ Seeded 5 transactions\n");

    // Weekly series: one income and one expense bar per day
    println!("📅 Weekly series (oldest day first):");
    let weekly = ledger.weekly_stats("demo-user").await?;
    for pair in weekly.series.chunks(2) {
        let label = pair[0].label.as_deref().unwrap_or("?");
        println!(
            "  {:>3}  income {:>6}  expense {:>6}",
            label, pair[0].value, pair[1].value
        );
    }
    println!();

    // Monthly series
    println!("🗓️  Monthly series (last twelve months):");
    let monthly = ledger.monthly_stats("demo-user").await?;
    for pair in monthly.series.chunks(2) {
        let label = pair[0].label.as_deref().unwrap_or("?");
        if pair[0].value != BigDecimal::from(0) || pair[1].value != BigDecimal::from(0) {
            println!(
                "  {:>6}  income {:>6}  expense {:>6}",
                label, pair[0].value, pair[1].value
            );
        }
    }
    println!();

    // Yearly series spans from the earliest transaction's year
    println!("📆 Yearly series:");
    let yearly = ledger.yearly_stats("demo-user").await?;
    for pair in yearly.series.chunks(2) {
        let label = pair[0].label.as_deref().unwrap_or("?");
        println!(
            "  {:>6}  income {:>6}  expense {:>6}",
            label, pair[0].value, pair[1].value
        );
    }

    Ok(())
}
