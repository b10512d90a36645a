//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::ExpenseId,
    db::{CreateTable, MapRow},
    expense::{Amount, CategoryTotal, Expense, ExpenseUpdate, Label, NewExpense},
    stores::ExpenseStore,
};

/// Creates, retrieves, updates and deletes expenses in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new expense store with a SQLite database.
    ///
    /// The caller should make sure the database has been initialized with
    /// [initialize](crate::initialize_db).
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire the database lock: {error}");
            Error::StoreLockError
        })
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Retrieve all expenses in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Expense>, Error> {
        let connection = self.lock()?;
        let mut statement =
            connection.prepare("SELECT id, item, category, amount, date FROM expense;")?;

        statement
            .query_map([], SQLiteExpenseStore::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
            .collect()
    }

    /// Insert an expense into the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&self, new_expense: NewExpense) -> Result<Expense, Error> {
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO expense (item, category, amount, date) VALUES (?1, ?2, ?3, ?4);",
            (
                new_expense.item.as_ref(),
                new_expense.category.as_ref(),
                new_expense.amount.as_f64(),
                new_expense.date,
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(new_expense.into_expense(id))
    }

    /// Update the expense with `id` in a single statement.
    ///
    /// # Errors
    /// This function will return an error if:
    /// - `id` does not refer to an expense,
    /// - or there is some other SQL error.
    fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> Result<Expense, Error> {
        let connection = self.lock()?;

        connection
            .query_row(
                "UPDATE expense SET
                    item = COALESCE(?1, item),
                    category = COALESCE(?2, category),
                    amount = COALESCE(?3, amount),
                    date = COALESCE(?4, date)
                WHERE id = ?5
                RETURNING id, item, category, amount, date;",
                (
                    changes.item.as_ref().map(|item| item.as_ref()),
                    changes.category.as_ref().map(|category| category.as_ref()),
                    changes.amount.map(|amount| amount.as_f64()),
                    changes.date,
                    id,
                ),
                SQLiteExpenseStore::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Delete the expense with `id` and return the deleted row.
    ///
    /// # Errors
    /// This function will return an error if:
    /// - `id` does not refer to an expense,
    /// - or there is some other SQL error.
    fn delete(&self, id: ExpenseId) -> Result<Expense, Error> {
        let connection = self.lock()?;

        connection
            .query_row(
                "DELETE FROM expense WHERE id = :id RETURNING id, item, category, amount, date;",
                &[(":id", &id)],
                SQLiteExpenseStore::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Sum expense amounts per category, ordered by category.
    ///
    /// # Errors
    /// This function will return an error if:
    /// - a category's total is not a finite number,
    /// - or there is some other SQL error.
    fn sum_by_category(&self) -> Result<Vec<CategoryTotal>, Error> {
        let connection = self.lock()?;
        let mut statement = connection.prepare(
            "SELECT category, TOTAL(amount) FROM expense GROUP BY category ORDER BY category;",
        )?;

        let rows = statement
            .query_map([], |row| {
                let raw_category: String = row.get(0)?;
                // SQLite stores a NaN sum as NULL.
                let total: Option<f64> = row.get(1)?;

                Ok((Label::new_unchecked(&raw_category), total))
            })?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;

        rows.into_iter()
            .map(|(category, total)| match total {
                Some(total) if total.is_finite() => Ok(CategoryTotal { category, total }),
                _ => {
                    tracing::error!("The total for the category {category} overflowed: {total:?}");
                    Err(Error::TotalOverflow(category))
                }
            })
            .collect()
    }
}

impl CreateTable for SQLiteExpenseStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        // AUTOINCREMENT stops the IDs of deleted expenses from being handed out again.
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                date TEXT NOT NULL
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteExpenseStore {
    type ReturnType = Expense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_item: String = row.get(offset + 1)?;
        let raw_category: String = row.get(offset + 2)?;

        Ok(Self::ReturnType {
            id: row.get(offset)?,
            item: Label::new_unchecked(&raw_item),
            category: Label::new_unchecked(&raw_category),
            amount: Amount::new_unchecked(row.get(offset + 3)?),
            date: row.get(offset + 4)?,
        })
    }
}
