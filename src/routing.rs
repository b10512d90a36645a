//! Application router configuration.

use axum::{
    Json, Router,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    response::Response,
    routing::{get, put},
};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState, Error, endpoints, error_response,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_category_totals_endpoint, list_expenses_endpoint,
    },
    stores::ExpenseStore,
};

/// Return a router with all the app's routes.
///
/// Any origin may call the API since the browser client is served separately.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: ExpenseStore + Clone + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint::<S>).post(create_expense_endpoint::<S>),
        )
        .route(
            endpoints::EXPENSES_BY_CATEGORY,
            get(get_category_totals_endpoint::<S>)
                .put(category_totals_are_not_an_expense)
                .delete(category_totals_are_not_an_expense),
        )
        .route(
            endpoints::EXPENSE,
            put(edit_expense_endpoint::<S>).delete(delete_expense_endpoint::<S>),
        )
        .fallback(get_404_not_found)
        .layer(cors)
        .with_state(state)
}

/// The root path '/' lets clients check that the backend is up.
async fn get_index() -> Json<Value> {
    Json(json!({ "message": "Hello from the expense tracker backend!" }))
}

/// `/expenses/by-category` shadows the expense route, so editing or deleting
/// it is treated like any other ID that names no expense.
async fn category_totals_are_not_an_expense() -> Error {
    Error::NotFound
}

async fn get_404_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "no route matches the requested path")
}
