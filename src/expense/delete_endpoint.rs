use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    expense::{Expense, edit_endpoint::parse_expense_id},
    stores::ExpenseStore,
};

/// A route handler for deleting an expense, responds with the deleted expense.
///
/// Responds with 404 if the expense does not exist, e.g. it was already deleted.
pub async fn delete_expense_endpoint<S>(
    State(state): State<AppState<S>>,
    expense_id: Result<Path<ExpenseId>, PathRejection>,
) -> Result<Json<Expense>, Error>
where
    S: ExpenseStore,
{
    let Path(expense_id) = parse_expense_id(expense_id)?;

    let expense = state
        .expense_store
        .delete(expense_id)
        .inspect_err(|error| {
            if *error == Error::NotFound {
                tracing::warn!("Tried to delete missing expense {expense_id}");
            }
        })?;
    tracing::info!("Deleted expense {expense_id}");

    Ok(Json(expense))
}

#[cfg(test)]
mod tests {
    use crate::{
        endpoints::{self, format_endpoint},
        expense::{
            Expense,
            test_utils::{dinner, get_test_server, notebook},
        },
        stores::ExpenseStore,
    };

    #[tokio::test]
    async fn deletes_expense_and_returns_it() {
        let (server, store) = get_test_server();
        let notebook = store.create(notebook()).unwrap();
        let dinner = store.create(dinner()).unwrap();

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE, notebook.id))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Expense>(), notebook);
        assert_eq!(store.get_all(), Ok(vec![dinner]));
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let (server, store) = get_test_server();
        let expense = store.create(notebook()).unwrap();
        let endpoint = format_endpoint(endpoints::EXPENSE, expense.id);

        server.delete(&endpoint).await.assert_status_ok();
        server.delete(&endpoint).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn non_integer_id_is_not_found() {
        let (server, _) = get_test_server();

        server
            .delete("/expenses/abc123")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn deleting_category_totals_is_not_found() {
        let (server, store) = get_test_server();
        let expense = store.create(notebook()).unwrap();

        server
            .delete(endpoints::EXPENSES_BY_CATEGORY)
            .await
            .assert_status_not_found();
        assert_eq!(store.get_all(), Ok(vec![expense]));
    }
}
