//! Implements an expense store that keeps expenses in memory.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{CategoryTotal, Expense, ExpenseUpdate, Label, NewExpense},
    stores::ExpenseStore,
};

/// Keeps expenses in memory. Expenses are lost when the last clone of the
/// store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExpenseStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    expenses: BTreeMap<ExpenseId, Expense>,
    last_id: ExpenseId,
}

impl InMemoryExpenseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, Error> {
        self.state.lock().map_err(|error| {
            tracing::error!("Could not acquire the in-memory store lock: {error}");
            Error::StoreLockError
        })
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn get_all(&self) -> Result<Vec<Expense>, Error> {
        Ok(self.lock()?.expenses.values().cloned().collect())
    }

    fn create(&self, new_expense: NewExpense) -> Result<Expense, Error> {
        let mut state = self.lock()?;

        state.last_id += 1;
        let expense = new_expense.into_expense(state.last_id);
        state.expenses.insert(expense.id, expense.clone());

        Ok(expense)
    }

    fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> Result<Expense, Error> {
        let mut state = self.lock()?;
        let expense = state.expenses.get_mut(&id).ok_or(Error::NotFound)?;

        *expense = changes.apply(expense.clone());

        Ok(expense.clone())
    }

    fn delete(&self, id: ExpenseId) -> Result<Expense, Error> {
        self.lock()?.expenses.remove(&id).ok_or(Error::NotFound)
    }

    fn sum_by_category(&self) -> Result<Vec<CategoryTotal>, Error> {
        let state = self.lock()?;
        let mut totals: BTreeMap<&Label, f64> = BTreeMap::new();

        for expense in state.expenses.values() {
            *totals.entry(&expense.category).or_insert(0.0) += expense.amount.as_f64();
        }

        totals
            .into_iter()
            .map(|(category, total)| {
                if total.is_finite() {
                    Ok(CategoryTotal {
                        category: category.clone(),
                        total,
                    })
                } else {
                    tracing::error!("The total for the category {category} overflowed: {total}");
                    Err(Error::TotalOverflow(category.clone()))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::stores::expense_store_tests;

    use super::InMemoryExpenseStore;

    expense_store_tests!(InMemoryExpenseStore::new());

    #[test]
    fn clones_share_expenses() {
        let store = InMemoryExpenseStore::new();
        let expense = store.clone().create(notebook()).unwrap();

        assert_eq!(store.get_all(), Ok(vec![expense]));
    }
}
