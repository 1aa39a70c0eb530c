//! Journal record model: trades, accounts, strategies and checklist
//! templates, plus the pure per-record calculations the persistence layer
//! relies on.

pub mod calculations;
pub mod records;

pub use records::*;
