//! Main journal orchestrator that coordinates the catalog, posting
//! workflows, reports, and the share subsystem

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::journal::{CatalogManager, JournalManager, PostingWorkflow, ReportEngine};
use crate::shares::{ShareManager, ShareUserTransactionDetail};
use crate::traits::*;
use crate::types::*;

/// Facade over one storage backend, combining every subsystem of the books.
pub struct Journal<S: BooksStorage> {
    catalog: CatalogManager<S>,
    journal: JournalManager<S>,
    reports: ReportEngine<S>,
    shares: ShareManager<S>,
    storage: S,
}

impl<S: BooksStorage + Clone> Journal<S> {
    /// Create a new journal with the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            catalog: CatalogManager::new(storage.clone()),
            journal: JournalManager::new(storage.clone()),
            reports: ReportEngine::new(storage.clone()),
            shares: ShareManager::new(storage.clone()),
            storage,
        }
    }

    /// Create a new journal with custom validators
    pub fn with_validators(
        storage: S,
        catalog_validator: Box<dyn CatalogValidator>,
        leg_validator: Box<dyn LegValidator>,
    ) -> Self {
        Self {
            catalog: CatalogManager::with_validator(storage.clone(), catalog_validator),
            journal: JournalManager::with_validator(storage.clone(), leg_validator),
            reports: ReportEngine::new(storage.clone()),
            shares: ShareManager::new(storage.clone()),
            storage,
        }
    }

    // Catalog operations
    /// Create a nature group (name unique ignoring case)
    pub async fn create_nature_group(&mut self, name: &str) -> JournalResult<NatureGroup> {
        self.catalog.create_nature_group(name).await
    }

    /// Create a main group under a nature group
    pub async fn create_main_group(
        &mut self,
        name: &str,
        nature_group: i64,
    ) -> JournalResult<MainGroup> {
        self.catalog.create_main_group(name, nature_group).await
    }

    /// Create a ledger under a main group
    pub async fn create_ledger(&mut self, name: &str, group: i64) -> JournalResult<Ledger> {
        self.catalog.create_ledger(name, group).await
    }

    /// Get a ledger by id
    pub async fn get_ledger(&self, id: i64) -> JournalResult<Option<Ledger>> {
        self.catalog.get_ledger(id).await
    }

    /// List all nature groups
    pub async fn list_nature_groups(&self) -> JournalResult<Vec<NatureGroup>> {
        self.catalog.list_nature_groups().await
    }

    /// List all ledgers
    pub async fn list_ledgers(&self) -> JournalResult<Vec<Ledger>> {
        self.catalog.list_ledgers().await
    }

    /// Resolve a ledger from an id-or-name reference
    pub async fn resolve_ledger(&self, reference: &str) -> JournalResult<Option<Ledger>> {
        self.catalog.resolve_ledger(reference).await
    }

    /// Ledgers under the named main group
    pub async fn ledgers_by_group_name(&self, group_name: &str) -> JournalResult<Vec<Ledger>> {
        self.catalog.ledgers_by_group_name(group_name).await
    }

    /// Ledgers whose name contains the fragment, ignoring case
    pub async fn ledgers_by_name_contains(&self, fragment: &str) -> JournalResult<Vec<Ledger>> {
        self.catalog.ledgers_by_name_contains(fragment).await
    }

    // Posting operations
    /// Post a workflow as one atomic voucher batch
    pub async fn post(&mut self, workflow: PostingWorkflow) -> JournalResult<Vec<PostingLeg>> {
        self.journal.post(workflow).await
    }

    /// The voucher number the next batch will receive
    pub async fn next_voucher_no(&self) -> JournalResult<i64> {
        self.journal.next_voucher_no().await
    }

    /// Get a single posting leg by id
    pub async fn get_leg(&self, id: i64) -> JournalResult<Option<PostingLeg>> {
        self.journal.get_leg(id).await
    }

    // Reporting operations
    /// Ledger statement by id-or-name reference, optional inclusive bounds
    pub async fn ledger_report(
        &self,
        ledger: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostingLeg>> {
        self.reports.ledger_report(ledger, from_date, to_date).await
    }

    /// Legs under a nature group; both bounds required, else empty
    pub async fn nature_group_report(
        &self,
        nature_group_name: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostingLeg>> {
        self.reports
            .nature_group_report(nature_group_name, from_date, to_date)
            .await
    }

    /// Profit-and-loss summary; both bounds required, else an input error
    pub async fn profit_and_loss(
        &self,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<ProfitAndLoss> {
        self.reports.profit_and_loss(from_date, to_date).await
    }

    /// The minimum-id leg of each voucher batch
    pub async fn first_leg_per_voucher(
        &self,
        transaction_type: Option<TransactionType>,
    ) -> JournalResult<Vec<PostingLeg>> {
        self.reports.first_leg_per_voucher(transaction_type).await
    }

    /// All legs sharing a voucher number
    pub async fn legs_by_voucher(&self, voucher_no: i64) -> JournalResult<Vec<PostingLeg>> {
        self.reports.legs_by_voucher(voucher_no).await
    }

    // Share operations
    /// Register a shareholder
    pub async fn create_share_user(
        &mut self,
        name: &str,
        mobile: Option<String>,
        address: Option<String>,
        profit_percentage: BigDecimal,
    ) -> JournalResult<ShareUser> {
        self.shares
            .create_share_user(name, mobile, address, profit_percentage)
            .await
    }

    /// Record a shareholder's stake in an existing posting leg
    pub async fn create_share_user_transaction(
        &mut self,
        share_user: i64,
        transaction: i64,
        total_amount: BigDecimal,
        paid_amount: BigDecimal,
    ) -> JournalResult<ShareUserTransaction> {
        self.shares
            .create_share_user_transaction(share_user, transaction, total_amount, paid_amount)
            .await
    }

    /// A shareholder's transactions joined with the underlying postings
    pub async fn share_user_transactions(
        &self,
        share_user: i64,
    ) -> JournalResult<Vec<ShareUserTransactionDetail>> {
        self.shares.user_transactions(share_user).await
    }

    /// Record an installment payment against a share-user transaction
    pub async fn record_share_payment(
        &mut self,
        share_user_transaction: i64,
        amount: BigDecimal,
        date: NaiveDate,
        remarks: Option<String>,
    ) -> JournalResult<SharePaymentHistory> {
        self.shares
            .record_payment(share_user_transaction, amount, date, remarks)
            .await
    }

    /// Payment history by parent transaction id
    pub async fn share_payment_history(
        &self,
        share_user_transaction: i64,
    ) -> JournalResult<Vec<SharePaymentHistory>> {
        self.shares.payment_history(share_user_transaction).await
    }

    /// Record a profit/loss distribution event
    pub async fn create_profit_loss_share(
        &mut self,
        transaction_no: i64,
        period_from: NaiveDate,
        period_to: NaiveDate,
        total_profit: BigDecimal,
        total_loss: BigDecimal,
    ) -> JournalResult<ProfitLossShareTransaction> {
        self.shares
            .create_profit_loss_share(
                transaction_no,
                period_from,
                period_to,
                total_profit,
                total_loss,
            )
            .await
    }

    /// Distribution records, optionally filtered by transaction number;
    /// an empty filtered match is a not-found error
    pub async fn profit_loss_shares(
        &self,
        transaction_no: Option<i64>,
    ) -> JournalResult<Vec<ProfitLossShareTransaction>> {
        self.shares.profit_loss_shares(transaction_no).await
    }

    // Stored report documents
    /// Store an income-statement document
    pub async fn save_income_statement(
        &mut self,
        record: IncomeStatementRecord,
    ) -> JournalResult<IncomeStatementRecord> {
        self.storage.insert_income_statement(record).await
    }

    /// List stored income-statement documents
    pub async fn list_income_statements(&self) -> JournalResult<Vec<IncomeStatementRecord>> {
        self.storage.list_income_statements().await
    }

    /// Store a balance-sheet document
    pub async fn save_balance_sheet(
        &mut self,
        record: BalanceSheetRecord,
    ) -> JournalResult<BalanceSheetRecord> {
        self.storage.insert_balance_sheet(record).await
    }

    /// List stored balance-sheet documents
    pub async fn list_balance_sheets(&self) -> JournalResult<Vec<BalanceSheetRecord>> {
        self.storage.list_balance_sheets().await
    }

    /// Store a cash-count-sheet document
    pub async fn save_cash_count_sheet(
        &mut self,
        record: CashCountSheetRecord,
    ) -> JournalResult<CashCountSheetRecord> {
        self.storage.insert_cash_count_sheet(record).await
    }

    /// List stored cash-count-sheet documents
    pub async fn list_cash_count_sheets(&self) -> JournalResult<Vec<CashCountSheetRecord>> {
        self.storage.list_cash_count_sheets().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::posting::{LegInput, PayKind};
    use crate::utils::memory_storage::MemoryStorage;

    #[tokio::test]
    async fn facade_posts_and_reports_through_one_storage() {
        let storage = MemoryStorage::new();
        let mut journal = Journal::new(storage);

        let nature = journal.create_nature_group("Income").await.unwrap();
        let group = journal.create_main_group("Sales", nature.id).await.unwrap();
        let cash = journal.create_ledger("Cash", group.id).await.unwrap();
        let revenue = journal.create_ledger("Revenue", group.id).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let workflow = PostingWorkflow::pay_in_out(
            PayKind::PayIn,
            Some(LegInput::new(
                cash.id,
                BigDecimal::from(500),
                BigDecimal::from(0),
                date,
            )),
            Some(LegInput::new(
                revenue.id,
                BigDecimal::from(0),
                BigDecimal::from(500),
                date,
            )),
        )
        .unwrap();

        let legs = journal.post(workflow).await.unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].voucher_no, legs[1].voucher_no);

        let statement = journal.ledger_report("Cash", None, None).await.unwrap();
        assert_eq!(statement.len(), 1);
        assert_eq!(statement[0].debit_amount, BigDecimal::from(500));
    }
}
