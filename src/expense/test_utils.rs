//! Sample expenses and a test server shared by tests.

use axum_test::TestServer;
use time::macros::date;

use crate::{
    AppState, build_router,
    expense::{Amount, Label, NewExpense},
    stores::InMemoryExpenseStore,
};

/// A school expense of 12 on 2025-08-12.
pub(crate) fn notebook() -> NewExpense {
    NewExpense {
        item: Label::new_unchecked("Notebook"),
        category: Label::new_unchecked("School"),
        amount: Amount::new_unchecked(12.0),
        date: date!(2025 - 08 - 12),
    }
}

/// A food expense of 3 on 2025-08-16.
pub(crate) fn dinner() -> NewExpense {
    NewExpense {
        item: Label::new_unchecked("Dinner"),
        category: Label::new_unchecked("Food"),
        amount: Amount::new_unchecked(3.0),
        date: date!(2025 - 08 - 16),
    }
}

/// Create a test server for the app with an empty in-memory store.
///
/// The returned store shares its expenses with the server.
pub(crate) fn get_test_server() -> (TestServer, InMemoryExpenseStore) {
    let store = InMemoryExpenseStore::new();
    let app = build_router(AppState::new(store.clone()));
    let server = TestServer::try_new(app).expect("Could not create test server.");

    (server, store)
}
