//! Contains the expense store trait and its implementations.

mod memory;
mod sqlite;

pub use memory::InMemoryExpenseStore;
pub use sqlite::SQLiteExpenseStore;

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{CategoryTotal, Expense, ExpenseUpdate, NewExpense},
};

/// Creates, retrieves, updates, deletes and aggregates expenses.
///
/// Implementers must make each call atomic with respect to other calls on the
/// same store. No ordering of expenses is guaranteed.
pub trait ExpenseStore {
    /// Retrieve every expense in the store.
    fn get_all(&self) -> Result<Vec<Expense>, Error>;

    /// Add a new expense to the store, assigning it a fresh ID.
    fn create(&self, new_expense: NewExpense) -> Result<Expense, Error>;

    /// Apply `changes` over the expense with `id` and return the updated expense.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no expense with `id`.
    fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> Result<Expense, Error>;

    /// Remove the expense with `id` and return it as it was before removal.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no expense with `id`.
    fn delete(&self, id: ExpenseId) -> Result<Expense, Error>;

    /// Sum the amounts of all expenses grouped by category.
    ///
    /// # Errors
    /// Returns [Error::TotalOverflow] if a category's total is not a finite number.
    fn sum_by_category(&self) -> Result<Vec<CategoryTotal>, Error>;
}

/// Generates the tests every [ExpenseStore] implementation must pass.
///
/// `$get_store` is an expression that creates an empty store.
#[cfg(test)]
macro_rules! expense_store_tests {
    ($get_store:expr) => {
        use std::collections::{HashMap, HashSet};

        use time::macros::date;

        use crate::{
            Error,
            expense::{Amount, ExpenseUpdate, Label, NewExpense, test_utils::{dinner, notebook}},
            stores::ExpenseStore,
        };

        #[test]
        fn get_all_on_empty_store_is_empty() {
            let store = $get_store;

            assert_eq!(store.get_all(), Ok(vec![]));
        }

        #[test]
        fn create_returns_stored_expense() {
            let store = $get_store;

            let expense = store.create(notebook()).unwrap();

            assert_eq!(expense, notebook().into_expense(expense.id));
            assert_eq!(store.get_all(), Ok(vec![expense]));
        }

        #[test]
        fn create_assigns_unique_ids() {
            let store = $get_store;
            let mut ids = HashSet::new();

            for _ in 0..5 {
                let expense = store.create(dinner()).unwrap();
                assert!(ids.insert(expense.id), "ID {} was reused", expense.id);
            }
        }

        #[test]
        fn create_does_not_reuse_deleted_ids() {
            let store = $get_store;
            let first = store.create(notebook()).unwrap();
            let second = store.create(dinner()).unwrap();
            store.delete(second.id).unwrap();

            let third = store.create(dinner()).unwrap();

            assert_ne!(third.id, first.id);
            assert_ne!(third.id, second.id);
        }

        #[test]
        fn get_all_returns_every_expense() {
            let store = $get_store;
            let want = vec![
                store.create(notebook()).unwrap(),
                store.create(dinner()).unwrap(),
            ];

            let mut got = store.get_all().unwrap();
            got.sort_by_key(|expense| expense.id);

            assert_eq!(got, want);
        }

        #[test]
        fn update_changes_only_given_fields() {
            let store = $get_store;
            let expense = store.create(notebook()).unwrap();
            let changes = ExpenseUpdate {
                category: Some(Label::new_unchecked("Stationery")),
                amount: Some(Amount::new_unchecked(15.5)),
                ..Default::default()
            };

            let updated = store.update(expense.id, changes).unwrap();

            assert_eq!(updated.id, expense.id);
            assert_eq!(updated.item, expense.item);
            assert_eq!(updated.category, Label::new_unchecked("Stationery"));
            assert_eq!(updated.amount, Amount::new_unchecked(15.5));
            assert_eq!(updated.date, expense.date);
            assert_eq!(store.get_all(), Ok(vec![updated]));
        }

        #[test]
        fn empty_update_leaves_expense_unchanged() {
            let store = $get_store;
            let expense = store.create(notebook()).unwrap();

            let updated = store.update(expense.id, ExpenseUpdate::default());

            assert_eq!(updated, Ok(expense));
        }

        #[test]
        fn update_missing_expense_is_not_found() {
            let store = $get_store;
            let expense = store.create(notebook()).unwrap();
            let changes = ExpenseUpdate {
                date: Some(date!(2025 - 01 - 01)),
                ..Default::default()
            };

            assert_eq!(store.update(expense.id + 1, changes), Err(Error::NotFound));
            assert_eq!(store.get_all(), Ok(vec![expense]));
        }

        #[test]
        fn delete_twice_is_not_found_the_second_time() {
            let store = $get_store;
            let expense = store.create(notebook()).unwrap();

            assert_eq!(store.delete(expense.id), Ok(expense.clone()));
            assert_eq!(store.delete(expense.id), Err(Error::NotFound));
            assert_eq!(store.get_all(), Ok(vec![]));
        }

        #[test]
        fn sum_by_category_groups_amounts() {
            let store = $get_store;
            let notebook = store.create(notebook()).unwrap();
            store.create(dinner()).unwrap();
            store.create(dinner()).unwrap();

            let totals: HashMap<String, f64> = store
                .sum_by_category()
                .unwrap()
                .into_iter()
                .map(|total| (total.category.to_string(), total.total))
                .collect();
            assert_eq!(
                totals,
                HashMap::from([("School".to_owned(), 12.0), ("Food".to_owned(), 6.0)])
            );

            store.delete(notebook.id).unwrap();

            let totals: HashMap<String, f64> = store
                .sum_by_category()
                .unwrap()
                .into_iter()
                .map(|total| (total.category.to_string(), total.total))
                .collect();
            assert_eq!(totals, HashMap::from([("Food".to_owned(), 6.0)]));
        }

        #[test]
        fn sum_by_category_conserves_total_amount() {
            let store = $get_store;
            store.create(notebook()).unwrap();
            store.create(dinner()).unwrap();
            store.create(dinner()).unwrap();

            let grouped_sum: f64 = store
                .sum_by_category()
                .unwrap()
                .iter()
                .map(|total| total.total)
                .sum();
            let sum: f64 = store
                .get_all()
                .unwrap()
                .iter()
                .map(|expense| expense.amount.as_f64())
                .sum();

            assert_eq!(grouped_sum, sum);
        }

        #[test]
        fn sum_by_category_rejects_totals_that_overflow() {
            let store = $get_store;
            let huge = NewExpense {
                category: Label::new_unchecked("Big"),
                amount: Amount::new_unchecked(1e308),
                ..notebook()
            };
            store.create(huge.clone()).unwrap();
            store.create(huge).unwrap();

            assert_eq!(
                store.sum_by_category(),
                Err(Error::TotalOverflow(Label::new_unchecked("Big")))
            );
        }

        #[test]
        fn sum_by_category_on_empty_store_is_empty() {
            let store = $get_store;

            assert_eq!(store.sum_by_category(), Ok(vec![]));
        }
    };
}

#[cfg(test)]
pub(crate) use expense_store_tests;
