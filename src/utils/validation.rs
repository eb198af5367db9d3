//! Validation utilities

use bigdecimal::BigDecimal;

use crate::traits::*;
use crate::types::*;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(LedgerError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a wallet ID is valid
pub fn validate_wallet_id(wallet_id: &str) -> LedgerResult<()> {
    if wallet_id.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Wallet ID cannot be empty".to_string(),
        ));
    }

    if wallet_id.len() > 64 {
        return Err(LedgerError::Validation(
            "Wallet ID cannot exceed 64 characters".to_string(),
        ));
    }

    // Check for valid characters (alphanumeric, dashes, underscores)
    if !wallet_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(LedgerError::Validation(
            "Wallet ID can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate that a wallet name is valid
pub fn validate_wallet_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Wallet name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "Wallet name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a transaction note is valid
pub fn validate_note(note: &str) -> LedgerResult<()> {
    if note.len() > 500 {
        return Err(LedgerError::Validation(
            "Note cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Enhanced transaction validator with detailed checks
pub struct EnhancedTransactionValidator;

impl TransactionValidator for EnhancedTransactionValidator {
    fn validate_draft(&self, draft: &TransactionDraft) -> LedgerResult<()> {
        // Basic validation
        DefaultTransactionValidator.validate_draft(draft)?;

        // Enhanced validations
        validate_positive_amount(&draft.amount)?;
        validate_wallet_id(&draft.wallet_id)?;

        if let FieldUpdate::Set(ref note) = draft.note {
            validate_note(note)?;
        }

        if let FieldUpdate::Set(ref category) = draft.category {
            if category.trim().is_empty() {
                return Err(LedgerError::Validation(
                    "Category cannot be blank; clear it instead".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Enhanced wallet validator with detailed checks
pub struct EnhancedWalletValidator;

impl WalletValidator for EnhancedWalletValidator {
    fn validate_draft(&self, draft: &WalletDraft) -> LedgerResult<()> {
        DefaultWalletValidator.validate_draft(draft)?;

        if let Some(ref id) = draft.id {
            validate_wallet_id(id)?;
        }

        if let Some(ref name) = draft.name {
            validate_wallet_name(name)?;
        }

        Ok(())
    }

    fn validate_deletion(&self, wallet_id: &str) -> LedgerResult<()> {
        validate_wallet_id(wallet_id)
    }
}
