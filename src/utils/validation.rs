//! Validation and boundary-parsing utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

/// Parse an ISO-8601 calendar date; `None` when the text is not a date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Coerce a textual amount to a decimal; non-numeric text is malformed input.
pub fn parse_amount(value: &str) -> JournalResult<BigDecimal> {
    BigDecimal::from_str(value.trim())
        .map_err(|_| JournalError::InvalidInput(format!("invalid amount: '{}'", value)))
}

/// Validate that an amount is not negative
pub fn validate_non_negative(amount: &BigDecimal, field: &str) -> JournalResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(JournalError::Validation(format!(
            "{} must not be negative, got {}",
            field, amount
        )))
    } else {
        Ok(())
    }
}

/// Validate that a catalog row name is usable
pub fn validate_catalog_name(name: &str) -> JournalResult<()> {
    if name.trim().is_empty() {
        return Err(JournalError::Validation(
            "name cannot be empty".to_string(),
        ));
    }
    if name.len() > 100 {
        return Err(JournalError::Validation(
            "name cannot exceed 100 characters".to_string(),
        ));
    }
    Ok(())
}

/// Validate a remarks field
pub fn validate_remarks(remarks: &str) -> JournalResult<()> {
    if remarks.len() > 500 {
        return Err(JournalError::Validation(
            "remarks cannot exceed 500 characters".to_string(),
        ));
    }
    Ok(())
}

/// Leg validator with stricter field checks than the default
///
/// Still does not require a batch to balance; that rule is deliberately
/// absent from the journal.
pub struct StrictLegValidator;

impl LegValidator for StrictLegValidator {
    fn validate_leg(&self, leg: &LegDraft) -> JournalResult<()> {
        validate_non_negative(&leg.debit_amount, "debit_amount")?;
        validate_non_negative(&leg.credit_amount, "credit_amount")?;
        if let Some(remarks) = &leg.remarks {
            validate_remarks(remarks)?;
        }
        Ok(())
    }
}

/// Catalog validator with stricter name checks than the default
pub struct StrictCatalogValidator;

impl CatalogValidator for StrictCatalogValidator {
    fn validate_name(&self, name: &str) -> JournalResult<()> {
        validate_catalog_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_and_rejects_garbage() {
        assert_eq!(
            parse_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_date(" 2024-01-05 "), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert!(parse_date("05/01/2024").is_none());
        assert!(parse_date("not-a-date").is_none());
        assert!(parse_date("2024-13-01").is_none());
    }

    #[test]
    fn coerces_text_amounts() {
        assert_eq!(parse_amount("100").unwrap(), BigDecimal::from(100));
        assert_eq!(
            parse_amount(" 99.50 ").unwrap(),
            BigDecimal::from_str("99.50").unwrap()
        );
        assert!(matches!(
            parse_amount("ten").unwrap_err(),
            JournalError::InvalidInput(_)
        ));
    }

    #[test]
    fn strict_validator_accepts_zero_amounts() {
        let leg = LegDraft::new(
            1,
            TransactionType::SalesCash1,
            BigDecimal::from(0),
            BigDecimal::from(0),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(StrictLegValidator.validate_leg(&leg).is_ok());
    }

    #[test]
    fn strict_validator_rejects_negative_amounts() {
        let leg = LegDraft::new(
            1,
            TransactionType::SalesCash1,
            BigDecimal::from(-5),
            BigDecimal::from(0),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(matches!(
            StrictLegValidator.validate_leg(&leg).unwrap_err(),
            JournalError::Validation(_)
        ));
    }
}
