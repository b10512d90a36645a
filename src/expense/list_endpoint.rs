use std::cmp::Ordering;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    expense::{Expense, ValidationError},
    stores::ExpenseStore,
};

/// Controls how [list_expenses_endpoint] orders expenses.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// The field to sort by. `None` returns expenses in the order they are stored.
    pub sort_by: Option<SortField>,
    /// The direction to sort in, ascending if not given.
    pub order: Option<SortOrder>,
}

/// A field expenses can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Sort by date.
    Date,
    /// Sort by amount.
    Amount,
    /// Sort by item, case-sensitive.
    Item,
    /// Sort by category, case-sensitive.
    Category,
}

/// The order to sort expenses in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Sort in order of increasing value.
    #[default]
    Asc,
    /// Sort in order of decreasing value.
    Desc,
}

/// A route handler for listing every expense.
pub async fn list_expenses_endpoint<S>(
    State(state): State<AppState<S>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Expense>>, Error>
where
    S: ExpenseStore,
{
    let Query(query) = query.map_err(|rejection| {
        tracing::warn!("Rejected expense query: {}", rejection.body_text());
        ValidationError::InvalidQuery(rejection.body_text())
    })?;

    let mut expenses = state.expense_store.get_all()?;

    if let Some(field) = query.sort_by {
        sort_expenses(&mut expenses, field, query.order.unwrap_or_default());
    }

    Ok(Json(expenses))
}

/// Sort `expenses` by `field`. Expenses with equal values keep their relative order.
fn sort_expenses(expenses: &mut [Expense], field: SortField, order: SortOrder) {
    let compare = |a: &Expense, b: &Expense| -> Ordering {
        match field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.as_f64().total_cmp(&b.amount.as_f64()),
            SortField::Item => a.item.cmp(&b.item),
            SortField::Category => a.category.cmp(&b.category),
        }
    };

    match order {
        SortOrder::Asc => expenses.sort_by(compare),
        SortOrder::Desc => expenses.sort_by(|a, b| compare(b, a)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{
        endpoints,
        expense::{
            Amount, Expense, Label, NewExpense,
            test_utils::{dinner, get_test_server, notebook},
        },
        stores::ExpenseStore,
    };

    use super::{SortField, SortOrder, sort_expenses};

    #[tokio::test]
    async fn lists_all_expenses() {
        let (server, store) = get_test_server();
        let want = vec![
            store.create(notebook()).unwrap(),
            store.create(dinner()).unwrap(),
        ];

        let response = server.get(endpoints::EXPENSES).await;

        response.assert_status_ok();
        let mut got = response.json::<Vec<Expense>>();
        got.sort_by_key(|expense| expense.id);
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn empty_store_gives_empty_list() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::EXPENSES).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), serde_json::json!([]));
    }

    #[tokio::test]
    async fn sorts_by_amount_descending() {
        let (server, store) = get_test_server();
        let dinner = store.create(dinner()).unwrap();
        let notebook = store.create(notebook()).unwrap();

        let response = server
            .get(endpoints::EXPENSES)
            .add_query_param("sort_by", "amount")
            .add_query_param("order", "desc")
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Expense>>(), vec![notebook, dinner]);
    }

    #[tokio::test]
    async fn order_defaults_to_ascending() {
        let (server, store) = get_test_server();
        let dinner = store.create(dinner()).unwrap();
        let notebook = store.create(notebook()).unwrap();

        let response = server
            .get(endpoints::EXPENSES)
            .add_query_param("sort_by", "date")
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Expense>>(), vec![notebook, dinner]);
    }

    #[tokio::test]
    async fn unknown_sort_field_is_bad_request() {
        let (server, _) = get_test_server();

        server
            .get(endpoints::EXPENSES)
            .add_query_param("sort_by", "colour")
            .await
            .assert_status_bad_request();
    }

    #[test]
    fn sort_keeps_order_of_equal_values() {
        let lunch = NewExpense {
            item: Label::new_unchecked("Lunch"),
            amount: Amount::new_unchecked(5.0),
            ..dinner()
        };
        let mut expenses = vec![
            dinner().into_expense(1),
            notebook().into_expense(2),
            lunch.into_expense(3),
        ];

        sort_expenses(&mut expenses, SortField::Category, SortOrder::Asc);

        let ids: Vec<_> = expenses.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn sort_by_item_descending() {
        let mut expenses = vec![dinner().into_expense(1), notebook().into_expense(2)];

        sort_expenses(&mut expenses, SortField::Item, SortOrder::Desc);

        let ids: Vec<_> = expenses.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
