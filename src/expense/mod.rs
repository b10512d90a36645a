//! Expenses: the domain model, request payloads and the REST endpoints.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;
mod summary_endpoint;

#[cfg(test)]
pub(crate) mod test_utils;

pub use core::{
    Amount, CategoryTotal, Expense, ExpenseUpdate, Label, NewExpense, ValidationError, parse_date,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use form::{AmountInput, ExpensePayload};
pub use list_endpoint::list_expenses_endpoint;
pub use summary_endpoint::get_category_totals_endpoint;
