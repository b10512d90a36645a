//! Database ID type definition.

/// Alias for the integer type used for identifying expenses.
pub type ExpenseId = i64;
