//! Read-only reporting and aggregation over the journal

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::debug;

use crate::journal::catalog::resolve_ledger;
use crate::traits::*;
use crate::types::*;

/// Nature-group names the profit-and-loss report aggregates over.
const EXPENSE_GROUP: &str = "Expense";
const INCOME_GROUP: &str = "Income";

/// Reporting engine: date-ranged filters and sums over posted legs
///
/// Never writes to the journal. The empty-result-vs-error policies here are
/// deliberate and differ per report; see the individual methods.
pub struct ReportEngine<S: JournalStorage + CatalogStorage> {
    storage: S,
}

impl<S: JournalStorage + CatalogStorage> ReportEngine<S> {
    /// Create a new report engine
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Statement of one ledger, most-recently-updated first.
    ///
    /// The ledger reference may be an id (integer text, takes precedence) or
    /// an exact name. Date bounds are optional and inclusive when present.
    /// An unresolvable reference yields an empty list, not an error.
    pub async fn ledger_report(
        &self,
        ledger: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostingLeg>> {
        let Some(ledger) = resolve_ledger(&self.storage, ledger).await? else {
            return Ok(Vec::new());
        };
        debug!(ledger = ledger.id, "running ledger report");
        self.storage
            .legs_by_ledger(ledger.id, from_date, to_date)
            .await
    }

    /// Legs whose nature group matches the given name, ignoring case.
    ///
    /// Both bounds are required; a missing bound yields an empty list rather
    /// than an error. There is no open-ended range for this report.
    pub async fn nature_group_report(
        &self,
        nature_group_name: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<Vec<PostingLeg>> {
        let (Some(from), Some(to)) = (from_date, to_date) else {
            return Ok(Vec::new());
        };
        self.storage
            .legs_by_nature_group(nature_group_name, from, to)
            .await
    }

    /// Profit-and-loss summary for an inclusive date range.
    ///
    /// Unlike the other reports, a missing bound is an input error. Expense is
    /// the debit sum of "Expense" legs, income the credit sum of "Income"
    /// legs; the net figures are clamped at zero so exactly one is non-zero
    /// (or both are zero on exact balance).
    pub async fn profit_and_loss(
        &self,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> JournalResult<ProfitAndLoss> {
        let (Some(from), Some(to)) = (from_date, to_date) else {
            return Err(JournalError::InvalidInput(
                "both from_date and to_date are required".to_string(),
            ));
        };

        let expense_legs = self
            .storage
            .legs_by_nature_group(EXPENSE_GROUP, from, to)
            .await?;
        let income_legs = self
            .storage
            .legs_by_nature_group(INCOME_GROUP, from, to)
            .await?;

        let total_expense: BigDecimal = expense_legs.iter().map(|leg| &leg.debit_amount).sum();
        let total_income: BigDecimal = income_legs.iter().map(|leg| &leg.credit_amount).sum();

        let zero = BigDecimal::from(0);
        let net_profit = if total_income > total_expense {
            &total_income - &total_expense
        } else {
            zero.clone()
        };
        let net_loss = if total_expense > total_income {
            &total_expense - &total_income
        } else {
            zero
        };

        debug!(%total_expense, %total_income, "computed profit and loss");

        Ok(ProfitAndLoss {
            from_date: from,
            to_date: to,
            total_expense,
            total_income,
            net_profit,
            net_loss,
        })
    }

    /// The representative (minimum-id) leg of each voucher batch, optionally
    /// restricted to one transaction type.
    pub async fn first_leg_per_voucher(
        &self,
        transaction_type: Option<TransactionType>,
    ) -> JournalResult<Vec<PostingLeg>> {
        self.storage.first_leg_per_voucher(transaction_type).await
    }

    /// All legs sharing a voucher number.
    pub async fn legs_by_voucher(&self, voucher_no: i64) -> JournalResult<Vec<PostingLeg>> {
        self.storage.legs_by_voucher(voucher_no).await
    }
}
