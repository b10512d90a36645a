//! Expense tracker is a small web service for recording personal expenses.
//!
//! This library provides a REST API that serves JSON. Expenses are kept in an
//! [ExpenseStore], either backed by SQLite ([SQLiteExpenseStore]) or held in
//! memory ([InMemoryExpenseStore]).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod logging;
mod routing;
mod stores;

pub use app_state::AppState;
pub use database_id::ExpenseId;
pub use db::initialize as initialize_db;
pub use expense::{
    Amount, AmountInput, CategoryTotal, Expense, ExpensePayload, ExpenseUpdate, Label, NewExpense,
    ValidationError, parse_date,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use routing::build_router;
pub use stores::{ExpenseStore, InMemoryExpenseStore, SQLiteExpenseStore};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent an expense, update or query that is missing a required
    /// field or has a field in the wrong shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the expense has not already been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested expense could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the lock guarding the store.
    #[error("could not acquire the store lock")]
    StoreLockError,

    /// The total for a category is too large to represent as a number.
    #[error("the total for the category \"{0}\" is too large to represent")]
    TotalOverflow(Label),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(error) => {
                error_response(StatusCode::BAD_REQUEST, &error.to_string())
            }
            Error::NotFound => error_response(StatusCode::NOT_FOUND, &self.to_string()),
            // Storage faults are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an unexpected error occurred, check the server logs for more details",
                )
            }
        }
    }
}

/// Create a JSON response of the form `{"error": message}`.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
