use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    expense::{Expense, ExpensePayload, NewExpense, form::parse_json_body},
    stores::ExpenseStore,
};

/// A route handler for creating a new expense, responds with the stored expense.
///
/// Responds with 400 if a field is missing or malformed, in which case no
/// expense is added.
pub async fn create_expense_endpoint<S>(
    State(state): State<AppState<S>>,
    body: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), Error>
where
    S: ExpenseStore,
{
    let payload = parse_json_body(body)?;
    let new_expense = NewExpense::try_from(payload).inspect_err(|error| {
        tracing::warn!("Rejected new expense: {error}");
    })?;

    let expense = state.expense_store.create(new_expense)?;
    tracing::info!("Created expense {}", expense.id);

    Ok((StatusCode::CREATED, Json(expense)))
}
