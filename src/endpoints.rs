//! The API endpoints URIs.

/// The root route, used by clients to check that the backend is reachable.
pub const ROOT: &str = "/";
/// The route for listing and creating expenses.
pub const EXPENSES: &str = "/expenses";
/// The route for updating and deleting a single expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";
/// The route for the total amount spent per category.
pub const EXPENSES_BY_CATEGORY: &str = "/expenses/by-category";

/// Replace the `{expense_id}` parameter in `endpoint` with `expense_id`.
#[cfg(test)]
pub fn format_endpoint(endpoint: &str, expense_id: crate::ExpenseId) -> String {
    endpoint.replace("{expense_id}", &expense_id.to_string())
}
