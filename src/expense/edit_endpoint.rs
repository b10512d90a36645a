use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    expense::{Expense, ExpensePayload, ExpenseUpdate, form::parse_json_body},
    stores::ExpenseStore,
};

/// A route handler for updating an expense, responds with the updated expense.
///
/// Only the fields given in the body are changed. Responds with 404 if the
/// expense does not exist and 400 if a given field is malformed.
pub async fn edit_expense_endpoint<S>(
    State(state): State<AppState<S>>,
    expense_id: Result<Path<ExpenseId>, PathRejection>,
    body: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Json<Expense>, Error>
where
    S: ExpenseStore,
{
    let Path(expense_id) = parse_expense_id(expense_id)?;
    let payload = parse_json_body(body)?;
    let changes = ExpenseUpdate::try_from(payload).inspect_err(|error| {
        tracing::warn!("Rejected update for expense {expense_id}: {error}");
    })?;

    let expense = state
        .expense_store
        .update(expense_id, changes)
        .inspect_err(|error| {
            if *error == Error::NotFound {
                tracing::warn!("Tried to update missing expense {expense_id}");
            }
        })?;
    tracing::info!("Updated expense {expense_id}");

    Ok(Json(expense))
}

/// An expense ID that is not an integer cannot refer to an expense, so the
/// rejection is treated as a missing expense.
pub(crate) fn parse_expense_id(
    expense_id: Result<Path<ExpenseId>, PathRejection>,
) -> Result<Path<ExpenseId>, Error> {
    expense_id.map_err(|rejection| {
        tracing::warn!("Invalid expense ID: {}", rejection.body_text());
        Error::NotFound
    })
}
