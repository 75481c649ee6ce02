//! # orgpulse-sql
//!
//! Parsing and safety validation for the restricted query dialect accepted by
//! the orgpulse data-access layer.
//!
//! The row store behind orgpulse has no SQL endpoint, so queries are never
//! executed as text. Instead they are parsed into a [`ParsedIntent`] that the
//! access layer maps onto REST filter/sort/paginate calls.
//!
//! ## Dialect
//!
//! ```text
//! SELECT <cols> FROM <table>
//!   [WHERE <col> ILIKE $<n>]
//!   [ORDER BY <col> [ASC|DESC]]
//!   [LIMIT $<n>] [OFFSET $<n>]
//! ```
//!
//! | Clause     | Accepted operands                      |
//! |------------|----------------------------------------|
//! | `WHERE`    | first `col ILIKE x` or `col LIKE x`    |
//! | `ORDER BY` | one column, optional `ASC` / `DESC`    |
//! | `LIMIT`    | `$n` or integer literal                |
//! | `OFFSET`   | `$n` or integer literal                |
//!
//! Keywords are case-insensitive. A REST filter call carries exactly one
//! predicate, so only the first pattern predicate of a `WHERE` clause is kept;
//! the other `AND` / `OR` operands are skipped. A `WHERE` clause without a
//! pattern predicate contributes no filter.
//!
//! [`ParsedIntent`]: orgpulse_core::ParsedIntent

pub mod error;
pub mod guard;
pub mod parser;

pub use error::{SafetyViolation, SqlError};
pub use guard::{BLOCKED_KEYWORDS, SafetyGuard};
pub use parser::QueryParser;
