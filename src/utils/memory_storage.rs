//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct Tables {
    nature_groups: BTreeMap<i64, NatureGroup>,
    main_groups: BTreeMap<i64, MainGroup>,
    ledgers: BTreeMap<i64, Ledger>,
    legs: BTreeMap<i64, PostingLeg>,
    share_users: BTreeMap<i64, ShareUser>,
    share_user_transactions: BTreeMap<i64, ShareUserTransaction>,
    share_payments: BTreeMap<i64, SharePaymentHistory>,
    profit_loss_shares: BTreeMap<i64, ProfitLossShareTransaction>,
    income_statements: BTreeMap<i64, IncomeStatementRecord>,
    balance_sheets: BTreeMap<i64, BalanceSheetRecord>,
    cash_count_sheets: BTreeMap<i64, CashCountSheetRecord>,
}

fn next_id<T>(table: &BTreeMap<i64, T>) -> i64 {
    table.keys().next_back().map_or(1, |max| max + 1)
}

fn in_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if let Some(from) = from {
        if date < from {
            return false;
        }
    }
    if let Some(to) = to {
        if date > to {
            return false;
        }
    }
    true
}

/// In-memory storage implementation for testing and development
///
/// Clones share state. All tables live behind a single lock so that
/// [`append_batch`](JournalStorage::append_batch) can allocate the next
/// voucher number and insert every leg of a batch in one critical section;
/// two concurrent batches can never receive the same voucher number.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        *self.tables.write().unwrap() = Tables::default();
    }
}

#[async_trait]
impl CatalogStorage for MemoryStorage {
    async fn insert_nature_group(&mut self, name: &str) -> JournalResult<NatureGroup> {
        let mut tables = self.tables.write().unwrap();
        let id = next_id(&tables.nature_groups);
        let row = NatureGroup {
            id,
            name: name.to_string(),
        };
        tables.nature_groups.insert(id, row.clone());
        Ok(row)
    }

    async fn get_nature_group(&self, id: i64) -> JournalResult<Option<NatureGroup>> {
        Ok(self.tables.read().unwrap().nature_groups.get(&id).cloned())
    }

    async fn nature_group_by_name(&self, name: &str) -> JournalResult<Option<NatureGroup>> {
        let needle = name.to_lowercase();
        Ok(self
            .tables
            .read()
            .unwrap()
            .nature_groups
            .values()
            .find(|group| group.name.to_lowercase() == needle)
            .cloned())
    }

    async fn list_nature_groups(&self) -> JournalResult<Vec<NatureGroup>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .nature_groups
            .values()
            .cloned()
            .collect())
    }

    async fn insert_main_group(
        &mut self,
        name: &str,
        nature_group: i64,
    ) -> JournalResult<MainGroup> {
        let mut tables = self.tables.write().unwrap();
        if !tables.nature_groups.contains_key(&nature_group) {
            return Err(JournalError::Validation(format!(
                "nature group {} does not exist",
                nature_group
            )));
        }
        let id = next_id(&tables.main_groups);
        let row = MainGroup {
            id,
            name: name.to_string(),
            nature_group,
        };
        tables.main_groups.insert(id, row.clone());
        Ok(row)
    }

    async fn get_main_group(&self, id: i64) -> JournalResult<Option<MainGroup>> {
        Ok(self.tables.read().unwrap().main_groups.get(&id).cloned())
    }

    async fn list_main_groups(&self) -> JournalResult<Vec<MainGroup>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .main_groups
            .values()
            .cloned()
            .collect())
    }

    async fn insert_ledger(&mut self, name: &str, group: i64) -> JournalResult<Ledger> {
        let mut tables = self.tables.write().unwrap();
        if !tables.main_groups.contains_key(&group) {
            return Err(JournalError::Validation(format!(
                "main group {} does not exist",
                group
            )));
        }
        let id = next_id(&tables.ledgers);
        let row = Ledger {
            id,
            name: name.to_string(),
            group,
        };
        tables.ledgers.insert(id, row.clone());
        Ok(row)
    }

    async fn get_ledger(&self, id: i64) -> JournalResult<Option<Ledger>> {
        Ok(self.tables.read().unwrap().ledgers.get(&id).cloned())
    }

    async fn ledger_by_name(&self, name: &str) -> JournalResult<Option<Ledger>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .ledgers
            .values()
            .find(|ledger| ledger.name == name)
            .cloned())
    }

    async fn list_ledgers(&self) -> JournalResult<Vec<Ledger>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .ledgers
            .values()
            .cloned()
            .collect())
    }

    async fn ledgers_by_group_name(&self, group_name: &str) -> JournalResult<Vec<Ledger>> {
        let tables = self.tables.read().unwrap();
        let group_ids: Vec<i64> = tables
            .main_groups
            .values()
            .filter(|group| group.name == group_name)
            .map(|group| group.id)
            .collect();
        Ok(tables
            .ledgers
            .values()
            .filter(|ledger| group_ids.contains(&ledger.group))
            .cloned()
            .collect())
    }

    async fn ledgers_by_name_contains(&self, fragment: &str) -> JournalResult<Vec<Ledger>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .tables
            .read()
            .unwrap()
            .ledgers
            .values()
            .filter(|ledger| ledger.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JournalStorage for MemoryStorage {
    async fn max_voucher_no(&self) -> JournalResult<Option<i64>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .legs
            .values()
            .map(|leg| leg.voucher_no)
            .max())
    }

    async fn append_batch(&mut self, batch: VoucherBatch) -> JournalResult<Vec<PostingLeg>> {
        // One write guard covers the existence checks, the voucher
        // allocation, and every insert; a failed batch leaves no rows behind.
        let mut tables = self.tables.write().unwrap();

        for draft in batch.legs() {
            if !tables.ledgers.contains_key(&draft.ledger) {
                return Err(JournalError::Validation(format!(
                    "ledger {} does not exist",
                    draft.ledger
                )));
            }
        }

        let voucher_no = tables
            .legs
            .values()
            .map(|leg| leg.voucher_no)
            .max()
            .map_or(1, |max| max + 1);
        let now = chrono::Utc::now().naive_utc();

        let mut created = Vec::with_capacity(batch.len());
        for draft in batch.into_legs() {
            let id = next_id(&tables.legs);
            let leg = PostingLeg {
                id,
                ledger: draft.ledger,
                voucher_no,
                transaction_type: draft.transaction_type,
                debit_amount: draft.debit_amount,
                credit_amount: draft.credit_amount,
                date: draft.date,
                remarks: draft.remarks,
                created_at: now,
                updated_at: now,
            };
            tables.legs.insert(id, leg.clone());
            created.push(leg);
        }
        Ok(created)
    }

    async fn get_leg(&self, id: i64) -> JournalResult<Option<PostingLeg>> {
        Ok(self.tables.read().unwrap().legs.get(&id).cloned())
    }

    async fn legs_by_ledger(
        &self,
        ledger: i64,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostingLeg>> {
        let mut legs: Vec<PostingLeg> = self
            .tables
            .read()
            .unwrap()
            .legs
            .values()
            .filter(|leg| leg.ledger == ledger && in_range(leg.date, from_date, to_date))
            .cloned()
            .collect();
        legs.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(legs)
    }

    async fn legs_by_voucher(&self, voucher_no: i64) -> JournalResult<Vec<PostingLeg>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .legs
            .values()
            .filter(|leg| leg.voucher_no == voucher_no)
            .cloned()
            .collect())
    }

    async fn legs_by_nature_group(
        &self,
        nature_group_name: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> JournalResult<Vec<PostingLeg>> {
        let needle = nature_group_name.to_lowercase();
        let tables = self.tables.read().unwrap();

        let nature_ids: Vec<i64> = tables
            .nature_groups
            .values()
            .filter(|group| group.name.to_lowercase() == needle)
            .map(|group| group.id)
            .collect();
        let group_ids: Vec<i64> = tables
            .main_groups
            .values()
            .filter(|group| nature_ids.contains(&group.nature_group))
            .map(|group| group.id)
            .collect();
        let ledger_ids: Vec<i64> = tables
            .ledgers
            .values()
            .filter(|ledger| group_ids.contains(&ledger.group))
            .map(|ledger| ledger.id)
            .collect();

        Ok(tables
            .legs
            .values()
            .filter(|leg| {
                ledger_ids.contains(&leg.ledger)
                    && in_range(leg.date, Some(from_date), Some(to_date))
            })
            .cloned()
            .collect())
    }

    async fn first_leg_per_voucher(
        &self,
        transaction_type: Option<TransactionType>,
    ) -> JournalResult<Vec<PostingLeg>> {
        let tables = self.tables.read().unwrap();
        let mut representatives: BTreeMap<i64, PostingLeg> = BTreeMap::new();
        // Legs iterate in ascending id order, so the first leg seen for a
        // voucher is the minimum-id leg of its group.
        for leg in tables.legs.values() {
            if let Some(filter) = transaction_type {
                if leg.transaction_type != filter {
                    continue;
                }
            }
            representatives
                .entry(leg.voucher_no)
                .or_insert_with(|| leg.clone());
        }
        Ok(representatives.into_values().collect())
    }
}

#[async_trait]
impl ShareStorage for MemoryStorage {
    async fn insert_share_user(
        &mut self,
        name: &str,
        mobile: Option<String>,
        address: Option<String>,
        profit_percentage: BigDecimal,
    ) -> JournalResult<ShareUser> {
        let mut tables = self.tables.write().unwrap();
        let id = next_id(&tables.share_users);
        let row = ShareUser {
            id,
            name: name.to_string(),
            mobile,
            address,
            profit_percentage,
            created_at: chrono::Utc::now().naive_utc(),
        };
        tables.share_users.insert(id, row.clone());
        Ok(row)
    }

    async fn get_share_user(&self, id: i64) -> JournalResult<Option<ShareUser>> {
        Ok(self.tables.read().unwrap().share_users.get(&id).cloned())
    }

    async fn list_share_users(&self) -> JournalResult<Vec<ShareUser>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .share_users
            .values()
            .cloned()
            .collect())
    }

    async fn insert_share_user_transaction(
        &mut self,
        share_user: i64,
        transaction: i64,
        total_amount: BigDecimal,
        paid_amount: BigDecimal,
    ) -> JournalResult<ShareUserTransaction> {
        let mut tables = self.tables.write().unwrap();
        let id = next_id(&tables.share_user_transactions);
        let balance_amount = &total_amount - &paid_amount;
        let row = ShareUserTransaction {
            id,
            share_user,
            transaction,
            total_amount,
            paid_amount,
            balance_amount,
            created_at: chrono::Utc::now().naive_utc(),
        };
        tables.share_user_transactions.insert(id, row.clone());
        Ok(row)
    }

    async fn share_user_transactions(
        &self,
        share_user: i64,
    ) -> JournalResult<Vec<ShareUserTransaction>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .share_user_transactions
            .values()
            .filter(|row| row.share_user == share_user)
            .cloned()
            .collect())
    }

    async fn get_share_user_transaction(
        &self,
        id: i64,
    ) -> JournalResult<Option<ShareUserTransaction>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .share_user_transactions
            .get(&id)
            .cloned())
    }

    async fn insert_share_payment(
        &mut self,
        share_user_transaction: i64,
        amount: BigDecimal,
        date: NaiveDate,
        remarks: Option<String>,
    ) -> JournalResult<SharePaymentHistory> {
        let mut tables = self.tables.write().unwrap();
        let id = next_id(&tables.share_payments);
        let row = SharePaymentHistory {
            id,
            share_user_transaction,
            amount,
            date,
            remarks,
        };
        tables.share_payments.insert(id, row.clone());
        Ok(row)
    }

    async fn share_payments_by_transaction(
        &self,
        share_user_transaction: i64,
    ) -> JournalResult<Vec<SharePaymentHistory>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .share_payments
            .values()
            .filter(|row| row.share_user_transaction == share_user_transaction)
            .cloned()
            .collect())
    }

    async fn insert_profit_loss_share(
        &mut self,
        transaction_no: i64,
        period_from: NaiveDate,
        period_to: NaiveDate,
        total_profit: BigDecimal,
        total_loss: BigDecimal,
    ) -> JournalResult<ProfitLossShareTransaction> {
        let mut tables = self.tables.write().unwrap();
        let id = next_id(&tables.profit_loss_shares);
        let row = ProfitLossShareTransaction {
            id,
            transaction_no,
            period_from,
            period_to,
            total_profit,
            total_loss,
            created_at: chrono::Utc::now().naive_utc(),
        };
        tables.profit_loss_shares.insert(id, row.clone());
        Ok(row)
    }

    async fn profit_loss_shares(
        &self,
        transaction_no: Option<i64>,
    ) -> JournalResult<Vec<ProfitLossShareTransaction>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .profit_loss_shares
            .values()
            .filter(|row| transaction_no.is_none_or(|no| row.transaction_no == no))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReportStorage for MemoryStorage {
    async fn insert_income_statement(
        &mut self,
        mut record: IncomeStatementRecord,
    ) -> JournalResult<IncomeStatementRecord> {
        let mut tables = self.tables.write().unwrap();
        record.id = next_id(&tables.income_statements);
        tables.income_statements.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_income_statements(&self) -> JournalResult<Vec<IncomeStatementRecord>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .income_statements
            .values()
            .cloned()
            .collect())
    }

    async fn insert_balance_sheet(
        &mut self,
        mut record: BalanceSheetRecord,
    ) -> JournalResult<BalanceSheetRecord> {
        let mut tables = self.tables.write().unwrap();
        record.id = next_id(&tables.balance_sheets);
        tables.balance_sheets.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_balance_sheets(&self) -> JournalResult<Vec<BalanceSheetRecord>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .balance_sheets
            .values()
            .cloned()
            .collect())
    }

    async fn insert_cash_count_sheet(
        &mut self,
        mut record: CashCountSheetRecord,
    ) -> JournalResult<CashCountSheetRecord> {
        let mut tables = self.tables.write().unwrap();
        record.id = next_id(&tables.cash_count_sheets);
        tables.cash_count_sheets.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_cash_count_sheets(&self) -> JournalResult<Vec<CashCountSheetRecord>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .cash_count_sheets
            .values()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_ledger(storage: &mut MemoryStorage) -> i64 {
        let nature = storage.insert_nature_group("Income").await.unwrap();
        let group = storage.insert_main_group("Sales", nature.id).await.unwrap();
        storage.insert_ledger("Cash", group.id).await.unwrap().id
    }

    fn draft(ledger: i64, debit: i64) -> LegDraft {
        LegDraft::new(
            ledger,
            TransactionType::PayIn,
            BigDecimal::from(debit),
            BigDecimal::from(0),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn max_voucher_is_none_on_empty_journal() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.max_voucher_no().await.unwrap(), None);
    }

    #[tokio::test]
    async fn append_stamps_one_voucher_across_the_batch() {
        let mut storage = MemoryStorage::new();
        let ledger = seeded_ledger(&mut storage).await;

        let batch = VoucherBatch::new(vec![draft(ledger, 10), draft(ledger, 20)]).unwrap();
        let legs = storage.append_batch(batch).await.unwrap();

        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].voucher_no, 1);
        assert_eq!(legs[1].voucher_no, 1);
        assert!(legs[0].id < legs[1].id);
        assert_eq!(storage.max_voucher_no().await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn append_rejects_unknown_ledger_and_persists_nothing() {
        let mut storage = MemoryStorage::new();
        let ledger = seeded_ledger(&mut storage).await;

        let batch = VoucherBatch::new(vec![draft(ledger, 10), draft(999, 20)]).unwrap();
        let err = storage.append_batch(batch).await.unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
        assert_eq!(storage.max_voucher_no().await.unwrap(), None);
    }

    #[tokio::test]
    async fn first_leg_per_voucher_picks_minimum_id() {
        let mut storage = MemoryStorage::new();
        let ledger = seeded_ledger(&mut storage).await;

        for _ in 0..3 {
            let batch = VoucherBatch::new(vec![draft(ledger, 10), draft(ledger, 20)]).unwrap();
            storage.append_batch(batch).await.unwrap();
        }

        let firsts = storage.first_leg_per_voucher(None).await.unwrap();
        assert_eq!(firsts.len(), 3);
        for leg in &firsts {
            let siblings = storage.legs_by_voucher(leg.voucher_no).await.unwrap();
            let min_id = siblings.iter().map(|s| s.id).min().unwrap();
            assert_eq!(leg.id, min_id);
        }
    }
}
