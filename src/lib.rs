//! # Restro Books
//!
//! Accounting core for a restaurant management backend: a voucher-numbered
//! posting journal with date-ranged reporting and shareholder profit
//! distribution.
//!
//! ## Features
//!
//! - **Ledger catalog**: NatureGroup -> MainGroup -> Ledger hierarchy with
//!   id-or-name resolution
//! - **Atomic posting**: pay-in/out and sales-entry workflows committed as
//!   voucher batches — all legs of a batch share one voucher number and
//!   persist together or not at all
//! - **Reporting**: ledger statements, nature-group filters,
//!   profit-and-loss summaries, and per-voucher representative legs
//! - **Share equity**: shareholder contributions, profit/loss distribution
//!   records, and installment payment history
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage and an in-memory backend for tests
//!
//! ## Quick Start
//!
//! ```rust
//! use restro_books::utils::MemoryStorage;
//! use restro_books::{Journal, LegInput, PayKind, PostingWorkflow};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! # async fn run() -> Result<(), restro_books::JournalError> {
//! let mut journal = Journal::new(MemoryStorage::new());
//!
//! let nature = journal.create_nature_group("Income").await?;
//! let group = journal.create_main_group("Sales", nature.id).await?;
//! let cash = journal.create_ledger("Counter Cash", group.id).await?;
//! let revenue = journal.create_ledger("Food Sales", group.id).await?;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let workflow = PostingWorkflow::pay_in_out(
//!     PayKind::PayIn,
//!     Some(LegInput::new(cash.id, BigDecimal::from(1200), BigDecimal::from(0), date)),
//!     Some(LegInput::new(revenue.id, BigDecimal::from(0), BigDecimal::from(1200), date)),
//! )?;
//! let legs = journal.post(workflow).await?;
//! assert_eq!(legs[0].voucher_no, legs[1].voucher_no);
//! # Ok(())
//! # }
//! ```

pub mod journal;
pub mod shares;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use journal::*;
pub use shares::*;
pub use traits::*;
pub use types::*;
