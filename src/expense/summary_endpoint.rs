use axum::{Json, extract::State};

use crate::{AppState, Error, expense::CategoryTotal, stores::ExpenseStore};

/// A route handler for the total amount spent in each category.
pub async fn get_category_totals_endpoint<S>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<CategoryTotal>>, Error>
where
    S: ExpenseStore,
{
    state.expense_store.sum_by_category().map(Json)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        expense::{
            CategoryTotal, Expense,
            test_utils::{dinner, get_test_server, notebook},
        },
        stores::ExpenseStore,
    };

    #[tokio::test]
    async fn sums_amounts_by_category() {
        let (server, store) = get_test_server();
        let notebook = store.create(notebook()).unwrap();
        store.create(dinner()).unwrap();

        let response = server.get(endpoints::EXPENSES_BY_CATEGORY).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!([
                { "category": "Food", "total": 3.0 },
                { "category": "School", "total": 12.0 },
            ])
        );

        server
            .delete(&format_endpoint(endpoints::EXPENSE, notebook.id))
            .await
            .assert_status_ok();

        let totals = server
            .get(endpoints::EXPENSES_BY_CATEGORY)
            .await
            .json::<Vec<CategoryTotal>>();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].category.as_ref(), "Food");
        assert_eq!(totals[0].total, 3.0);
    }

    #[tokio::test]
    async fn totals_add_up_to_the_sum_of_all_expenses() {
        let (server, store) = get_test_server();
        store.create(notebook()).unwrap();
        store.create(dinner()).unwrap();
        store.create(dinner()).unwrap();

        let totals = server
            .get(endpoints::EXPENSES_BY_CATEGORY)
            .await
            .json::<Vec<CategoryTotal>>();
        let expenses = server.get(endpoints::EXPENSES).await.json::<Vec<Expense>>();

        assert_eq!(
            totals.iter().map(|total| total.total).sum::<f64>(),
            expenses
                .iter()
                .map(|expense| expense.amount.as_f64())
                .sum::<f64>()
        );
    }

    #[tokio::test]
    async fn no_expenses_gives_empty_list() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::EXPENSES_BY_CATEGORY).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));
    }
}
