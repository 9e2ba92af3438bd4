//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Storage abstraction for the ledger catalog
///
/// The catalog is the NatureGroup -> MainGroup -> Ledger hierarchy that every
/// posting leg ultimately references. Identifiers are assigned by the backend.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// Insert a nature group and return the stored row
    async fn insert_nature_group(&mut self, name: &str) -> JournalResult<NatureGroup>;

    /// Get a nature group by id
    async fn get_nature_group(&self, id: i64) -> JournalResult<Option<NatureGroup>>;

    /// Look up a nature group by name, ignoring case
    async fn nature_group_by_name(&self, name: &str) -> JournalResult<Option<NatureGroup>>;

    /// List all nature groups
    async fn list_nature_groups(&self) -> JournalResult<Vec<NatureGroup>>;

    /// Insert a main group under a nature group
    async fn insert_main_group(&mut self, name: &str, nature_group: i64)
        -> JournalResult<MainGroup>;

    /// Get a main group by id
    async fn get_main_group(&self, id: i64) -> JournalResult<Option<MainGroup>>;

    /// List all main groups
    async fn list_main_groups(&self) -> JournalResult<Vec<MainGroup>>;

    /// Insert a ledger under a main group
    async fn insert_ledger(&mut self, name: &str, group: i64) -> JournalResult<Ledger>;

    /// Get a ledger by id
    async fn get_ledger(&self, id: i64) -> JournalResult<Option<Ledger>>;

    /// Look up a ledger by exact name
    async fn ledger_by_name(&self, name: &str) -> JournalResult<Option<Ledger>>;

    /// List all ledgers
    async fn list_ledgers(&self) -> JournalResult<Vec<Ledger>>;

    /// Ledgers whose main group has the given name
    async fn ledgers_by_group_name(&self, group_name: &str) -> JournalResult<Vec<Ledger>>;

    /// Ledgers whose name contains the fragment, ignoring case
    async fn ledgers_by_name_contains(&self, fragment: &str) -> JournalResult<Vec<Ledger>>;
}

/// Storage abstraction for the transaction journal
///
/// The journal is append-mostly: batches go in through [`append_batch`], and
/// everything else is a typed read. Voucher allocation happens inside
/// `append_batch`, in the same critical section as the inserts, so concurrent
/// batches can never share a voucher number.
///
/// [`append_batch`]: JournalStorage::append_batch
#[async_trait]
pub trait JournalStorage: Send + Sync {
    /// Highest voucher number currently present, or `None` on an empty journal
    async fn max_voucher_no(&self) -> JournalResult<Option<i64>>;

    /// Atomically allocate the next voucher number, stamp every leg of the
    /// batch with it, and persist them all. Returns the created legs in
    /// submission order. On any failure nothing is persisted.
    async fn append_batch(&mut self, batch: VoucherBatch) -> JournalResult<Vec<PostingLeg>>;

    /// Get a single leg by id
    async fn get_leg(&self, id: i64) -> JournalResult<Option<PostingLeg>>;

    /// Legs posted against a ledger, optionally bounded by an inclusive date
    /// range; ordered most-recently-updated first
    async fn legs_by_ledger(
        &self,
        ledger: i64,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostingLeg>>;

    /// All legs sharing a voucher number, in id order
    async fn legs_by_voucher(&self, voucher_no: i64) -> JournalResult<Vec<PostingLeg>>;

    /// Legs whose ledger's main group belongs to the named nature group
    /// (matched ignoring case), within an inclusive date range, in id order
    async fn legs_by_nature_group(
        &self,
        nature_group_name: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> JournalResult<Vec<PostingLeg>>;

    /// The minimum-id leg of each voucher group, optionally restricted to one
    /// transaction type
    async fn first_leg_per_voucher(
        &self,
        transaction_type: Option<TransactionType>,
    ) -> JournalResult<Vec<PostingLeg>>;
}

/// Storage abstraction for the share-equity subsystem
#[async_trait]
pub trait ShareStorage: Send + Sync {
    /// Insert a share user and return the stored row
    async fn insert_share_user(
        &mut self,
        name: &str,
        mobile: Option<String>,
        address: Option<String>,
        profit_percentage: BigDecimal,
    ) -> JournalResult<ShareUser>;

    /// Get a share user by id
    async fn get_share_user(&self, id: i64) -> JournalResult<Option<ShareUser>>;

    /// List all share users
    async fn list_share_users(&self) -> JournalResult<Vec<ShareUser>>;

    /// Insert a share-user transaction
    async fn insert_share_user_transaction(
        &mut self,
        share_user: i64,
        transaction: i64,
        total_amount: BigDecimal,
        paid_amount: BigDecimal,
    ) -> JournalResult<ShareUserTransaction>;

    /// All transactions belonging to a share user, in id order
    async fn share_user_transactions(
        &self,
        share_user: i64,
    ) -> JournalResult<Vec<ShareUserTransaction>>;

    /// Get a share-user transaction by id
    async fn get_share_user_transaction(
        &self,
        id: i64,
    ) -> JournalResult<Option<ShareUserTransaction>>;

    /// Insert an installment payment against a share-user transaction
    async fn insert_share_payment(
        &mut self,
        share_user_transaction: i64,
        amount: BigDecimal,
        date: NaiveDate,
        remarks: Option<String>,
    ) -> JournalResult<SharePaymentHistory>;

    /// Payment history rows keyed by parent transaction id, in id order
    async fn share_payments_by_transaction(
        &self,
        share_user_transaction: i64,
    ) -> JournalResult<Vec<SharePaymentHistory>>;

    /// Insert a profit/loss distribution record
    async fn insert_profit_loss_share(
        &mut self,
        transaction_no: i64,
        period_from: NaiveDate,
        period_to: NaiveDate,
        total_profit: BigDecimal,
        total_loss: BigDecimal,
    ) -> JournalResult<ProfitLossShareTransaction>;

    /// Distribution records, optionally filtered by transaction number
    async fn profit_loss_shares(
        &self,
        transaction_no: Option<i64>,
    ) -> JournalResult<Vec<ProfitLossShareTransaction>>;
}

/// Storage for standalone reportable documents
///
/// Income statements, balance sheets, and cash count sheets are opaque
/// records populated outside the posting pipeline; the core only stores and
/// lists them.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    async fn insert_income_statement(
        &mut self,
        record: IncomeStatementRecord,
    ) -> JournalResult<IncomeStatementRecord>;

    async fn list_income_statements(&self) -> JournalResult<Vec<IncomeStatementRecord>>;

    async fn insert_balance_sheet(
        &mut self,
        record: BalanceSheetRecord,
    ) -> JournalResult<BalanceSheetRecord>;

    async fn list_balance_sheets(&self) -> JournalResult<Vec<BalanceSheetRecord>>;

    async fn insert_cash_count_sheet(
        &mut self,
        record: CashCountSheetRecord,
    ) -> JournalResult<CashCountSheetRecord>;

    async fn list_cash_count_sheets(&self) -> JournalResult<Vec<CashCountSheetRecord>>;
}

/// Everything a [`Journal`](crate::journal::Journal) facade needs from one
/// storage value.
pub trait BooksStorage: CatalogStorage + JournalStorage + ShareStorage + ReportStorage {}

impl<T: CatalogStorage + JournalStorage + ShareStorage + ReportStorage> BooksStorage for T {}

/// Trait for implementing custom leg validation rules
pub trait LegValidator: Send + Sync {
    /// Validate a draft leg before it joins a batch
    fn validate_leg(&self, leg: &LegDraft) -> JournalResult<()>;
}

/// Trait for implementing custom catalog validation rules
pub trait CatalogValidator: Send + Sync {
    /// Validate a catalog row name before saving
    fn validate_name(&self, name: &str) -> JournalResult<()>;
}

/// Default leg validator with the journal's baseline rules
///
/// Amounts must be non-negative. Nothing here requires a batch to balance or
/// forbids a leg carrying both a debit and a credit; the journal deliberately
/// leaves double-entry balance unenforced.
pub struct DefaultLegValidator;

impl LegValidator for DefaultLegValidator {
    fn validate_leg(&self, leg: &LegDraft) -> JournalResult<()> {
        let zero = BigDecimal::from(0);
        if leg.debit_amount < zero {
            return Err(JournalError::Validation(format!(
                "debit_amount must not be negative, got {}",
                leg.debit_amount
            )));
        }
        if leg.credit_amount < zero {
            return Err(JournalError::Validation(format!(
                "credit_amount must not be negative, got {}",
                leg.credit_amount
            )));
        }
        Ok(())
    }
}

/// Default catalog validator with basic rules
pub struct DefaultCatalogValidator;

impl CatalogValidator for DefaultCatalogValidator {
    fn validate_name(&self, name: &str) -> JournalResult<()> {
        if name.trim().is_empty() {
            return Err(JournalError::Validation(
                "name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Profit-and-loss summary over a date range
///
/// `total_expense` sums debit amounts of legs under the "Expense" nature
/// group; `total_income` sums credit amounts under "Income". Exactly one of
/// `net_profit`/`net_loss` is non-zero, or both are zero on exact balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total_expense: BigDecimal,
    pub total_income: BigDecimal,
    pub net_profit: BigDecimal,
    pub net_loss: BigDecimal,
}

/// Stored income-statement document (opaque body)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatementRecord {
    pub id: i64,
    pub title: String,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    /// Serialized statement body, not interpreted by the core
    pub body: String,
    pub created_at: NaiveDateTime,
}

/// Stored balance-sheet document (opaque body)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetRecord {
    pub id: i64,
    pub title: String,
    pub as_of_date: NaiveDate,
    /// Serialized sheet body, not interpreted by the core
    pub body: String,
    pub created_at: NaiveDateTime,
}

/// Stored cash-count-sheet document: a day's till count (opaque body)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashCountSheetRecord {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    /// Serialized denomination breakdown, not interpreted by the core
    pub body: String,
    pub created_at: NaiveDateTime,
}
