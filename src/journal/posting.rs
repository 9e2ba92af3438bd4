//! Posting workflows and batch creation

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::parse_amount;

/// Direction of a two-leg payment batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayKind {
    PayIn,
    PayOut,
}

impl PayKind {
    /// Transaction type stamped on both legs of the batch.
    pub fn transaction_type(self) -> TransactionType {
        match self {
            PayKind::PayIn => TransactionType::PayIn,
            PayKind::PayOut => TransactionType::PayOut,
        }
    }
}

/// Fixed slot set of the sales-entry workflow.
///
/// Each slot fixes the transaction type of its leg; a batch carries each slot
/// at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesSlot {
    SalesCash1,
    SalesCash2,
    SalesBank1,
    SalesBank2,
    Purchase1,
    Purchase2,
}

impl SalesSlot {
    /// All slots, in the order the workflow recognises them.
    pub const ALL: [SalesSlot; 6] = [
        SalesSlot::SalesCash1,
        SalesSlot::SalesCash2,
        SalesSlot::SalesBank1,
        SalesSlot::SalesBank2,
        SalesSlot::Purchase1,
        SalesSlot::Purchase2,
    ];

    /// Transaction type carried by legs filling this slot.
    pub fn transaction_type(self) -> TransactionType {
        match self {
            SalesSlot::SalesCash1 => TransactionType::SalesCash1,
            SalesSlot::SalesCash2 => TransactionType::SalesCash2,
            SalesSlot::SalesBank1 => TransactionType::SalesBank1,
            SalesSlot::SalesBank2 => TransactionType::SalesBank2,
            SalesSlot::Purchase1 => TransactionType::Purchase1,
            SalesSlot::Purchase2 => TransactionType::Purchase2,
        }
    }
}

/// One leg payload of a pay-in/out batch, amounts already numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegInput {
    pub ledger: i64,
    pub debit_amount: BigDecimal,
    pub credit_amount: BigDecimal,
    pub date: NaiveDate,
    pub remarks: Option<String>,
}

impl LegInput {
    pub fn new(
        ledger: i64,
        debit_amount: BigDecimal,
        credit_amount: BigDecimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            ledger,
            debit_amount,
            credit_amount,
            date,
            remarks: None,
        }
    }
}

/// One leg payload of a sales-entry batch.
///
/// Amount fields arrive as text and are coerced to decimals during workflow
/// resolution; non-numeric text fails the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesLegInput {
    pub ledger: i64,
    pub debit_amount: String,
    pub credit_amount: String,
    pub date: NaiveDate,
    pub remarks: Option<String>,
}

impl SalesLegInput {
    pub fn new(
        ledger: i64,
        debit_amount: impl Into<String>,
        credit_amount: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            ledger,
            debit_amount: debit_amount.into(),
            credit_amount: credit_amount.into(),
            date,
            remarks: None,
        }
    }
}

/// A posting request, resolved once at the boundary into a closed variant.
///
/// Constructors enforce the leg-count rules, so an in-flight workflow is
/// always structurally valid: pay-in/out carries exactly two legs, a sales
/// entry carries one to six distinct slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostingWorkflow {
    PayInOut {
        kind: PayKind,
        first: LegInput,
        second: LegInput,
    },
    SalesEntry {
        slots: Vec<(SalesSlot, SalesLegInput)>,
    },
}

impl PostingWorkflow {
    /// Build a pay-in/out workflow. Both legs are required.
    pub fn pay_in_out(
        kind: PayKind,
        first: Option<LegInput>,
        second: Option<LegInput>,
    ) -> JournalResult<Self> {
        match (first, second) {
            (Some(first), Some(second)) => Ok(Self::PayInOut {
                kind,
                first,
                second,
            }),
            _ => Err(JournalError::InvalidInput(
                "both transactions are required for pay in/out".to_string(),
            )),
        }
    }

    /// Build a sales-entry workflow from the slots present in the request.
    pub fn sales_entry(slots: Vec<(SalesSlot, SalesLegInput)>) -> JournalResult<Self> {
        if slots.is_empty() {
            return Err(JournalError::InvalidInput(
                "at least one transaction is required for sales entry".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for (slot, _) in &slots {
            if !seen.insert(*slot) {
                return Err(JournalError::InvalidInput(format!(
                    "slot {} supplied more than once",
                    slot.transaction_type()
                )));
            }
        }
        Ok(Self::SalesEntry { slots })
    }

    /// Resolve the workflow into ordered leg drafts, coercing text amounts.
    pub fn into_drafts(self) -> JournalResult<Vec<LegDraft>> {
        match self {
            PostingWorkflow::PayInOut {
                kind,
                first,
                second,
            } => {
                let transaction_type = kind.transaction_type();
                Ok([first, second]
                    .into_iter()
                    .map(|leg| LegDraft {
                        ledger: leg.ledger,
                        transaction_type,
                        debit_amount: leg.debit_amount,
                        credit_amount: leg.credit_amount,
                        date: leg.date,
                        remarks: leg.remarks,
                    })
                    .collect())
            }
            PostingWorkflow::SalesEntry { slots } => slots
                .into_iter()
                .map(|(slot, leg)| {
                    Ok(LegDraft {
                        ledger: leg.ledger,
                        transaction_type: slot.transaction_type(),
                        debit_amount: parse_amount(&leg.debit_amount)?,
                        credit_amount: parse_amount(&leg.credit_amount)?,
                        date: leg.date,
                        remarks: leg.remarks,
                    })
                })
                .collect(),
        }
    }
}

/// Journal manager: turns posting workflows into committed voucher batches
pub struct JournalManager<S: JournalStorage + CatalogStorage> {
    storage: S,
    validator: Box<dyn LegValidator>,
}

impl<S: JournalStorage + CatalogStorage> JournalManager<S> {
    /// Create a new journal manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultLegValidator),
        }
    }

    /// Create a new journal manager with a custom leg validator
    pub fn with_validator(storage: S, validator: Box<dyn LegValidator>) -> Self {
        Self { storage, validator }
    }

    /// Post a workflow as one atomic voucher batch.
    ///
    /// Every leg is validated and its ledger reference checked before anything
    /// is appended; one voucher number is allocated for the whole batch inside
    /// the storage critical section. Returns the created legs in submission
    /// order.
    pub async fn post(&mut self, workflow: PostingWorkflow) -> JournalResult<Vec<PostingLeg>> {
        let drafts = workflow.into_drafts()?;
        debug!(legs = drafts.len(), "resolved posting workflow");

        for draft in &drafts {
            self.validator.validate_leg(draft)?;
            if self.storage.get_ledger(draft.ledger).await?.is_none() {
                return Err(JournalError::Validation(format!(
                    "ledger {} does not exist",
                    draft.ledger
                )));
            }
        }

        let batch = VoucherBatch::new(drafts)?;
        let legs = self.storage.append_batch(batch).await?;

        if let Some(first) = legs.first() {
            info!(
                voucher_no = first.voucher_no,
                legs = legs.len(),
                "posted voucher batch"
            );
        }
        Ok(legs)
    }

    /// The voucher number the next batch will receive: `max + 1`, or 1 on an
    /// empty journal.
    pub async fn next_voucher_no(&self) -> JournalResult<i64> {
        Ok(self.storage.max_voucher_no().await?.map_or(1, |max| max + 1))
    }

    /// Get a single leg by id
    pub async fn get_leg(&self, id: i64) -> JournalResult<Option<PostingLeg>> {
        self.storage.get_leg(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn leg(ledger: i64) -> LegInput {
        LegInput::new(ledger, BigDecimal::from(100), BigDecimal::from(0), date())
    }

    #[test]
    fn pay_in_out_requires_both_legs() {
        let err = PostingWorkflow::pay_in_out(PayKind::PayIn, Some(leg(1)), None).unwrap_err();
        assert!(matches!(err, JournalError::InvalidInput(_)));

        let err = PostingWorkflow::pay_in_out(PayKind::PayOut, None, None).unwrap_err();
        assert!(matches!(err, JournalError::InvalidInput(_)));
    }

    #[test]
    fn sales_entry_rejects_empty_and_duplicate_slots() {
        let err = PostingWorkflow::sales_entry(vec![]).unwrap_err();
        assert!(matches!(err, JournalError::InvalidInput(_)));

        let err = PostingWorkflow::sales_entry(vec![
            (
                SalesSlot::SalesCash1,
                SalesLegInput::new(1, "10", "0", date()),
            ),
            (
                SalesSlot::SalesCash1,
                SalesLegInput::new(1, "20", "0", date()),
            ),
        ])
        .unwrap_err();
        assert!(matches!(err, JournalError::InvalidInput(_)));
    }

    #[test]
    fn slots_map_to_their_transaction_types() {
        assert_eq!(
            SalesSlot::SalesBank2.transaction_type(),
            TransactionType::SalesBank2
        );
        assert_eq!(
            SalesSlot::Purchase1.transaction_type(),
            TransactionType::Purchase1
        );
        assert_eq!(PayKind::PayOut.transaction_type(), TransactionType::PayOut);
    }

    #[test]
    fn sales_amounts_are_coerced_from_text() {
        let workflow = PostingWorkflow::sales_entry(vec![(
            SalesSlot::SalesCash1,
            SalesLegInput::new(1, "150.25", "0", date()),
        )])
        .unwrap();

        let drafts = workflow.into_drafts().unwrap();
        assert_eq!(drafts[0].debit_amount, "150.25".parse::<BigDecimal>().unwrap());
        assert_eq!(drafts[0].transaction_type, TransactionType::SalesCash1);
    }

    #[test]
    fn non_numeric_sales_amount_fails_resolution() {
        let workflow = PostingWorkflow::sales_entry(vec![(
            SalesSlot::SalesBank1,
            SalesLegInput::new(1, "lots", "0", date()),
        )])
        .unwrap();

        let err = workflow.into_drafts().unwrap_err();
        assert!(matches!(err, JournalError::InvalidInput(_)));
    }
}
