//! Core types and data structures for the posting journal

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Top-level accounting classification (e.g. "Income", "Expense").
///
/// Nature group names are unique case-insensitively; lookups ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatureGroup {
    /// Storage-assigned identifier
    pub id: i64,
    /// Classification name, unique ignoring case
    pub name: String,
}

/// Mid-level grouping under exactly one nature group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainGroup {
    /// Storage-assigned identifier
    pub id: i64,
    /// Group name
    pub name: String,
    /// Parent nature group id
    pub nature_group: i64,
}

/// Named account under a main group; the unit postings are recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Storage-assigned identifier
    pub id: i64,
    /// Ledger name
    pub name: String,
    /// Parent main group id
    pub group: i64,
}

/// Closed set of posting types recognised by the journal.
///
/// Pay-in/out come from the two-leg payment workflow; the sales and purchase
/// variants correspond to the fixed slots of the sales-entry workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    PayIn,
    PayOut,
    SalesCash1,
    SalesCash2,
    SalesBank1,
    SalesBank2,
    Purchase1,
    Purchase2,
}

impl TransactionType {
    /// Wire-level name of the type, matching its serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::PayIn => "payin",
            TransactionType::PayOut => "payout",
            TransactionType::SalesCash1 => "salescash1",
            TransactionType::SalesCash2 => "salescash2",
            TransactionType::SalesBank1 => "salesbank1",
            TransactionType::SalesBank2 => "salesbank2",
            TransactionType::Purchase1 => "purchase1",
            TransactionType::Purchase2 => "purchase2",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted journal row: a single debit/credit posting against a ledger.
///
/// Legs sharing a `voucher_no` form one logical batch. The reporting engine
/// only ever reads these rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingLeg {
    /// Storage-assigned identifier, ascending in insertion order
    pub id: i64,
    /// Ledger this leg posts against
    pub ledger: i64,
    /// Batch number shared by sibling legs; non-unique
    pub voucher_no: i64,
    /// Workflow type that created this leg
    pub transaction_type: TransactionType,
    /// Debit side, non-negative
    pub debit_amount: BigDecimal,
    /// Credit side, non-negative
    pub credit_amount: BigDecimal,
    /// Business date of the posting
    pub date: NaiveDate,
    /// Free-form note
    pub remarks: Option<String>,
    /// When the leg was persisted
    pub created_at: NaiveDateTime,
    /// When the leg was last touched
    pub updated_at: NaiveDateTime,
}

/// An unvalidated leg payload, prior to voucher stamping and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegDraft {
    pub ledger: i64,
    pub transaction_type: TransactionType,
    pub debit_amount: BigDecimal,
    pub credit_amount: BigDecimal,
    pub date: NaiveDate,
    pub remarks: Option<String>,
}

impl LegDraft {
    pub fn new(
        ledger: i64,
        transaction_type: TransactionType,
        debit_amount: BigDecimal,
        credit_amount: BigDecimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            ledger,
            transaction_type,
            debit_amount,
            credit_amount,
            date,
            remarks: None,
        }
    }

    /// Attach a remark to the draft.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

/// Ordered set of legs committed under one voucher number.
///
/// All persistence goes through the batch: either every leg is appended to the
/// journal or none is. The voucher number itself is allocated by the storage
/// backend at append time, inside the same critical section as the insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherBatch {
    legs: Vec<LegDraft>,
}

impl VoucherBatch {
    /// Create a batch from ordered drafts. An empty batch is malformed input.
    pub fn new(legs: Vec<LegDraft>) -> JournalResult<Self> {
        if legs.is_empty() {
            return Err(JournalError::InvalidInput(
                "a posting batch requires at least one leg".to_string(),
            ));
        }
        Ok(Self { legs })
    }

    /// Legs in submission order.
    pub fn legs(&self) -> &[LegDraft] {
        &self.legs
    }

    /// Consume the batch, yielding legs in submission order.
    pub fn into_legs(self) -> Vec<LegDraft> {
        self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Always `false`: the constructor rejects empty batches. Exists only to
    /// pair with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Sum of the debit sides.
    pub fn total_debits(&self) -> BigDecimal {
        self.legs.iter().map(|leg| &leg.debit_amount).sum()
    }

    /// Sum of the credit sides.
    pub fn total_credits(&self) -> BigDecimal {
        self.legs.iter().map(|leg| &leg.credit_amount).sum()
    }

    /// Whether total debits equal total credits.
    ///
    /// Inspection only. The journal does not require batches to balance, and
    /// a leg may legitimately carry both a debit and a credit amount.
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }
}

/// Shareholder participating in profit/loss distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareUser {
    pub id: i64,
    pub name: String,
    pub mobile: Option<String>,
    pub address: Option<String>,
    /// Share of distributed profit, in percent
    pub profit_percentage: BigDecimal,
    pub created_at: NaiveDateTime,
}

/// A shareholder's stake in one underlying journal posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareUserTransaction {
    pub id: i64,
    /// Owning share user id
    pub share_user: i64,
    /// Underlying posting leg id
    pub transaction: i64,
    pub total_amount: BigDecimal,
    pub paid_amount: BigDecimal,
    /// Remaining amount, `total_amount - paid_amount`
    pub balance_amount: BigDecimal,
    pub created_at: NaiveDateTime,
}

/// One installment payment against a share-user transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePaymentHistory {
    pub id: i64,
    /// Parent share-user transaction id
    pub share_user_transaction: i64,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub remarks: Option<String>,
}

/// A recorded profit/loss distribution event across shareholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLossShareTransaction {
    pub id: i64,
    /// Caller-facing distribution number used for lookups
    pub transaction_no: i64,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    pub total_profit: BigDecimal,
    pub total_loss: BigDecimal,
    pub created_at: NaiveDateTime,
}

/// Errors that can occur in the journal system
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Backend failure
    #[error("storage error: {0}")]
    Storage(String),
    /// Malformed request: missing legs, bad date range, non-numeric amount
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A leg or catalog row failed validation; nothing was persisted
    #[error("validation error: {0}")]
    Validation(String),
    /// A lookup whose empty result is an error for that operation
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;
