//! Journal module containing catalog management, posting workflows, and
//! reporting

pub mod catalog;
pub mod core;
pub mod posting;
pub mod reports;

pub use self::core::*;
pub use catalog::*;
pub use posting::*;
pub use reports::*;
