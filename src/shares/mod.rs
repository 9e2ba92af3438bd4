//! Share-equity subsystem: shareholder contributions, profit/loss
//! distribution, and installment payment history
//!
//! Structurally mirrors the posting journal: typed rows behind a storage
//! trait, with a manager owning the validation rules.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::traits::*;
use crate::types::*;

/// A share-user transaction joined with its underlying posting leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareUserTransactionDetail {
    pub transaction: ShareUserTransaction,
    pub posting: PostingLeg,
}

/// Manager for shareholders and their profit/loss records
pub struct ShareManager<S: ShareStorage + JournalStorage> {
    storage: S,
}

impl<S: ShareStorage + JournalStorage> ShareManager<S> {
    /// Create a new share manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Register a shareholder.
    pub async fn create_share_user(
        &mut self,
        name: &str,
        mobile: Option<String>,
        address: Option<String>,
        profit_percentage: BigDecimal,
    ) -> JournalResult<ShareUser> {
        if name.trim().is_empty() {
            return Err(JournalError::Validation(
                "share user name cannot be empty".to_string(),
            ));
        }
        let zero = BigDecimal::from(0);
        let hundred = BigDecimal::from(100);
        if profit_percentage < zero || profit_percentage > hundred {
            return Err(JournalError::Validation(format!(
                "profit percentage must be between 0 and 100, got {}",
                profit_percentage
            )));
        }
        self.storage
            .insert_share_user(name, mobile, address, profit_percentage)
            .await
    }

    /// Get a share user by id
    pub async fn get_share_user(&self, id: i64) -> JournalResult<Option<ShareUser>> {
        self.storage.get_share_user(id).await
    }

    /// List all share users
    pub async fn list_share_users(&self) -> JournalResult<Vec<ShareUser>> {
        self.storage.list_share_users().await
    }

    /// Record a shareholder's stake in an existing posting leg.
    pub async fn create_share_user_transaction(
        &mut self,
        share_user: i64,
        transaction: i64,
        total_amount: BigDecimal,
        paid_amount: BigDecimal,
    ) -> JournalResult<ShareUserTransaction> {
        if self.storage.get_share_user(share_user).await?.is_none() {
            return Err(JournalError::Validation(format!(
                "share user {} does not exist",
                share_user
            )));
        }
        if self.storage.get_leg(transaction).await?.is_none() {
            return Err(JournalError::Validation(format!(
                "posting leg {} does not exist",
                transaction
            )));
        }
        self.storage
            .insert_share_user_transaction(share_user, transaction, total_amount, paid_amount)
            .await
    }

    /// A shareholder's transactions joined with their underlying postings,
    /// in id order.
    pub async fn user_transactions(
        &self,
        share_user: i64,
    ) -> JournalResult<Vec<ShareUserTransactionDetail>> {
        let transactions = self.storage.share_user_transactions(share_user).await?;
        let mut details = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            let posting = self
                .storage
                .get_leg(transaction.transaction)
                .await?
                .ok_or_else(|| {
                    JournalError::Storage(format!(
                        "share transaction {} references missing leg {}",
                        transaction.id, transaction.transaction
                    ))
                })?;
            details.push(ShareUserTransactionDetail {
                transaction,
                posting,
            });
        }
        Ok(details)
    }

    /// Record an installment payment against a share-user transaction.
    pub async fn record_payment(
        &mut self,
        share_user_transaction: i64,
        amount: BigDecimal,
        date: NaiveDate,
        remarks: Option<String>,
    ) -> JournalResult<SharePaymentHistory> {
        if self
            .storage
            .get_share_user_transaction(share_user_transaction)
            .await?
            .is_none()
        {
            return Err(JournalError::Validation(format!(
                "share user transaction {} does not exist",
                share_user_transaction
            )));
        }
        if amount < BigDecimal::from(0) {
            return Err(JournalError::Validation(format!(
                "payment amount must not be negative, got {}",
                amount
            )));
        }
        self.storage
            .insert_share_payment(share_user_transaction, amount, date, remarks)
            .await
    }

    /// Payment history for a share-user transaction; empty when none exist.
    pub async fn payment_history(
        &self,
        share_user_transaction: i64,
    ) -> JournalResult<Vec<SharePaymentHistory>> {
        self.storage
            .share_payments_by_transaction(share_user_transaction)
            .await
    }

    /// Record a profit/loss distribution event.
    pub async fn create_profit_loss_share(
        &mut self,
        transaction_no: i64,
        period_from: NaiveDate,
        period_to: NaiveDate,
        total_profit: BigDecimal,
        total_loss: BigDecimal,
    ) -> JournalResult<ProfitLossShareTransaction> {
        let record = self
            .storage
            .insert_profit_loss_share(
                transaction_no,
                period_from,
                period_to,
                total_profit,
                total_loss,
            )
            .await?;
        info!(transaction_no, "recorded profit/loss share transaction");
        Ok(record)
    }

    /// Distribution records, optionally filtered by transaction number.
    ///
    /// An empty match under the `transaction_no` filter is a not-found error;
    /// listing everything with no filter may legitimately be empty.
    pub async fn profit_loss_shares(
        &self,
        transaction_no: Option<i64>,
    ) -> JournalResult<Vec<ProfitLossShareTransaction>> {
        let records = self.storage.profit_loss_shares(transaction_no).await?;
        if let Some(no) = transaction_no {
            if records.is_empty() {
                return Err(JournalError::NotFound(format!(
                    "transaction {} not found",
                    no
                )));
            }
        }
        Ok(records)
    }
}
