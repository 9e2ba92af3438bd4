//! Basic posting example: build a small catalog, post a day's entries, and
//! run the reports.
//!
//! Run with: cargo run --example basic_posting

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use restro_books::utils::MemoryStorage;
use restro_books::{
    Journal, JournalError, LegInput, PayKind, PostingWorkflow, SalesLegInput, SalesSlot,
};

#[tokio::main]
async fn main() -> Result<(), JournalError> {
    let mut journal = Journal::new(MemoryStorage::new());

    // Catalog: nature group -> main group -> ledger.
    let income = journal.create_nature_group("Income").await?;
    let expense = journal.create_nature_group("Expense").await?;
    let asset = journal.create_nature_group("Asset").await?;

    let sales = journal.create_main_group("Sales", income.id).await?;
    let overheads = journal.create_main_group("Overheads", expense.id).await?;
    let current = journal.create_main_group("Current Assets", asset.id).await?;

    let revenue = journal.create_ledger("Food Sales", sales.id).await?;
    let rent = journal.create_ledger("Rent", overheads.id).await?;
    let cash = journal.create_ledger("Counter Cash", current.id).await?;
    let bank = journal.create_ledger("Bank", current.id).await?;

    let month_start = NaiveDate::from_ymd_opt(2024, 6, 1)
        .ok_or_else(|| JournalError::InvalidInput("bad demo date".to_string()))?;
    let today = NaiveDate::from_ymd_opt(2024, 6, 15)
        .ok_or_else(|| JournalError::InvalidInput("bad demo date".to_string()))?;

    // Day's sales, keyed by the fixed sales-entry slots. Amounts arrive as
    // text and are coerced during posting.
    let sales_entry = PostingWorkflow::sales_entry(vec![
        (
            SalesSlot::SalesCash1,
            SalesLegInput::new(cash.id, "5200", "0", today),
        ),
        (
            SalesSlot::SalesBank1,
            SalesLegInput::new(bank.id, "3100", "0", today),
        ),
        (
            SalesSlot::Purchase1,
            SalesLegInput::new(revenue.id, "0", "8300", today),
        ),
    ])?;
    let legs = journal.post(sales_entry).await?;
    println!(
        "posted sales voucher {} with {} legs",
        legs[0].voucher_no,
        legs.len()
    );

    // Rent paid out of the till.
    let pay_out = PostingWorkflow::pay_in_out(
        PayKind::PayOut,
        Some(LegInput::new(
            rent.id,
            BigDecimal::from(1500),
            BigDecimal::from(0),
            today,
        )),
        Some(LegInput::new(
            cash.id,
            BigDecimal::from(0),
            BigDecimal::from(1500),
            today,
        )),
    )?;
    let legs = journal.post(pay_out).await?;
    println!("posted rent voucher {}", legs[0].voucher_no);

    // Ledger statement, by name or by id.
    let statement = journal.ledger_report("Counter Cash", None, None).await?;
    println!("\nCounter Cash statement ({} legs):", statement.len());
    for leg in &statement {
        println!(
            "  voucher {:>3}  {:<10}  dr {:>8}  cr {:>8}",
            leg.voucher_no, leg.transaction_type, leg.debit_amount, leg.credit_amount
        );
    }

    // Profit and loss over the month.
    let report = journal
        .profit_and_loss(Some(month_start), Some(today))
        .await?;
    println!(
        "\nP&L {} to {}: expense {}, income {}, profit {}, loss {}",
        report.from_date,
        report.to_date,
        report.total_expense,
        report.total_income,
        report.net_profit,
        report.net_loss
    );

    Ok(())
}
