//! Pure balance reconciliation for wallet bookkeeping.
//!
//! Every function takes the wallet state as read from the store and returns
//! the adjusted wallet without performing any I/O. A failed balance check
//! returns an error before anything is written, so callers can abort the
//! whole mutation with no compensating writes to undo.

use bigdecimal::BigDecimal;

use crate::types::*;

/// Book a brand-new transaction against a wallet.
///
/// Rejects an expense larger than the current balance; an expense equal to
/// the balance is allowed and drains the wallet to zero.
pub fn apply_new_transaction(
    wallet: &Wallet,
    amount: &BigDecimal,
    kind: TransactionKind,
) -> LedgerResult<Wallet> {
    if kind == TransactionKind::Expense && *amount > wallet.balance {
        return Err(LedgerError::InsufficientFunds(wallet.id.clone()));
    }

    let mut updated = wallet.clone();
    updated.apply(kind, amount);
    Ok(updated)
}

/// Compute the wallet as if the given transaction had never existed.
///
/// The inverse of [`apply_new_transaction`]; never fails. Callers that need
/// a negative-balance guard on top of the plain inverse use
/// [`apply_deletion`].
pub fn revert_transaction(wallet: &Wallet, amount: &BigDecimal, kind: TransactionKind) -> Wallet {
    let mut updated = wallet.clone();
    updated.revert(kind, amount);
    updated
}

/// Rebook a transaction within the same wallet: revert the old booking,
/// then apply the new one.
///
/// The expense check runs against the reverted balance, not the stale
/// stored one. Shrinking an expense therefore never trips the guard, and
/// growing one is judged with the old booking already backed out.
pub fn apply_edit_same_wallet(
    wallet: &Wallet,
    old_amount: &BigDecimal,
    old_kind: TransactionKind,
    new_amount: &BigDecimal,
    new_kind: TransactionKind,
) -> LedgerResult<Wallet> {
    let reverted = revert_transaction(wallet, old_amount, old_kind);
    apply_new_transaction(&reverted, new_amount, new_kind)
}

/// Remove a transaction from its wallet for good.
///
/// Rejects the deletion when the post-deletion balance would be negative,
/// which happens when deleting an income that has since been spent.
pub fn apply_deletion(
    wallet: &Wallet,
    amount: &BigDecimal,
    kind: TransactionKind,
) -> LedgerResult<Wallet> {
    let reverted = revert_transaction(wallet, amount, kind);
    if reverted.balance < BigDecimal::from(0) {
        return Err(LedgerError::InsufficientFunds(wallet.id.clone()));
    }
    Ok(reverted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet_with_income(income: i64) -> Wallet {
        let mut wallet = Wallet::new(
            "w1".to_string(),
            "Checking".to_string(),
            "user1".to_string(),
        );
        wallet.apply(TransactionKind::Income, &BigDecimal::from(income));
        wallet
    }

    #[test]
    fn income_increases_balance_and_total() {
        let wallet = wallet_with_income(100);
        let updated =
            apply_new_transaction(&wallet, &BigDecimal::from(40), TransactionKind::Income).unwrap();

        assert_eq!(updated.balance, BigDecimal::from(140));
        assert_eq!(updated.total_income, BigDecimal::from(140));
        assert_eq!(updated.total_expenses, BigDecimal::from(0));
        assert!(updated.is_consistent());
    }

    #[test]
    fn expense_decreases_balance_and_tracks_total() {
        let wallet = wallet_with_income(100);
        let updated =
            apply_new_transaction(&wallet, &BigDecimal::from(30), TransactionKind::Expense)
                .unwrap();

        assert_eq!(updated.balance, BigDecimal::from(70));
        assert_eq!(updated.total_expenses, BigDecimal::from(30));
        assert!(updated.is_consistent());
    }

    #[test]
    fn expense_may_drain_wallet_to_zero() {
        let wallet = wallet_with_income(100);
        let updated =
            apply_new_transaction(&wallet, &BigDecimal::from(100), TransactionKind::Expense)
                .unwrap();

        assert_eq!(updated.balance, BigDecimal::from(0));
    }

    #[test]
    fn overdraft_is_rejected() {
        let wallet = wallet_with_income(100);
        let result =
            apply_new_transaction(&wallet, &BigDecimal::from(101), TransactionKind::Expense);

        assert!(matches!(result, Err(LedgerError::InsufficientFunds(id)) if id == "w1"));
        // input wallet untouched
        assert_eq!(wallet.balance, BigDecimal::from(100));
    }

    #[test]
    fn apply_then_revert_round_trips() {
        let wallet = wallet_with_income(100);
        let applied =
            apply_new_transaction(&wallet, &BigDecimal::from(25), TransactionKind::Expense)
                .unwrap();
        let reverted = revert_transaction(&applied, &BigDecimal::from(25), TransactionKind::Expense);

        assert_eq!(reverted.balance, wallet.balance);
        assert_eq!(reverted.total_income, wallet.total_income);
        assert_eq!(reverted.total_expenses, wallet.total_expenses);
    }

    #[test]
    fn same_wallet_edit_checks_reverted_balance() {
        // Balance 70 after a 30 expense; growing it to 90 must pass because
        // the reverted balance is 100, even though 90 > 70.
        let wallet = wallet_with_income(100);
        let booked =
            apply_new_transaction(&wallet, &BigDecimal::from(30), TransactionKind::Expense)
                .unwrap();

        let edited = apply_edit_same_wallet(
            &booked,
            &BigDecimal::from(30),
            TransactionKind::Expense,
            &BigDecimal::from(90),
            TransactionKind::Expense,
        )
        .unwrap();

        assert_eq!(edited.balance, BigDecimal::from(10));
        assert_eq!(edited.total_expenses, BigDecimal::from(90));
        assert!(edited.is_consistent());
    }

    #[test]
    fn same_wallet_edit_still_rejects_true_overdraft() {
        let wallet = wallet_with_income(100);
        let booked =
            apply_new_transaction(&wallet, &BigDecimal::from(30), TransactionKind::Expense)
                .unwrap();

        let result = apply_edit_same_wallet(
            &booked,
            &BigDecimal::from(30),
            TransactionKind::Expense,
            &BigDecimal::from(101),
            TransactionKind::Expense,
        );

        assert!(matches!(result, Err(LedgerError::InsufficientFunds(_))));
    }

    #[test]
    fn edit_may_flip_kind() {
        let wallet = wallet_with_income(100);
        let booked =
            apply_new_transaction(&wallet, &BigDecimal::from(30), TransactionKind::Expense)
                .unwrap();

        let edited = apply_edit_same_wallet(
            &booked,
            &BigDecimal::from(30),
            TransactionKind::Expense,
            &BigDecimal::from(30),
            TransactionKind::Income,
        )
        .unwrap();

        assert_eq!(edited.balance, BigDecimal::from(130));
        assert_eq!(edited.total_income, BigDecimal::from(130));
        assert_eq!(edited.total_expenses, BigDecimal::from(0));
        assert!(edited.is_consistent());
    }

    #[test]
    fn deleting_expense_restores_balance() {
        let wallet = wallet_with_income(100);
        let booked =
            apply_new_transaction(&wallet, &BigDecimal::from(30), TransactionKind::Expense)
                .unwrap();

        let deleted =
            apply_deletion(&booked, &BigDecimal::from(30), TransactionKind::Expense).unwrap();

        assert_eq!(deleted.balance, BigDecimal::from(100));
        assert_eq!(deleted.total_expenses, BigDecimal::from(0));
    }

    #[test]
    fn deleting_spent_income_is_rejected() {
        // Income 100 followed by a 60 expense leaves balance 40; deleting
        // the income would push the balance to -60.
        let wallet = wallet_with_income(100);
        let booked =
            apply_new_transaction(&wallet, &BigDecimal::from(60), TransactionKind::Expense)
                .unwrap();

        let result = apply_deletion(&booked, &BigDecimal::from(100), TransactionKind::Income);
        assert!(matches!(result, Err(LedgerError::InsufficientFunds(_))));
    }

    #[test]
    fn worked_example_apply_edit_delete() {
        // Wallet at 100/100/0; expense 30 -> 70/100/30; edit to 50 ->
        // 50/100/50; delete -> back to 100/100/0.
        let wallet = wallet_with_income(100);

        let step1 =
            apply_new_transaction(&wallet, &BigDecimal::from(30), TransactionKind::Expense)
                .unwrap();
        assert_eq!(step1.balance, BigDecimal::from(70));
        assert_eq!(step1.total_expenses, BigDecimal::from(30));

        let step2 = apply_edit_same_wallet(
            &step1,
            &BigDecimal::from(30),
            TransactionKind::Expense,
            &BigDecimal::from(50),
            TransactionKind::Expense,
        )
        .unwrap();
        assert_eq!(step2.balance, BigDecimal::from(50));
        assert_eq!(step2.total_expenses, BigDecimal::from(50));

        let step3 =
            apply_deletion(&step2, &BigDecimal::from(50), TransactionKind::Expense).unwrap();
        assert_eq!(step3.balance, BigDecimal::from(100));
        assert_eq!(step3.total_income, BigDecimal::from(100));
        assert_eq!(step3.total_expenses, BigDecimal::from(0));
        assert!(step3.is_consistent());
    }
}
