//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{CategoryId, ExpenseId},
};

// ============================================================================
// MODELS
// ============================================================================

/// A single recorded transaction: an amount spent on a date, optionally
/// assigned to a category.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// A short name for the expense, e.g. "Coffee".
    pub title: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The ID of the category the expense belongs to.
    pub category_id: Option<CategoryId>,
    /// Free-form notes about the expense.
    pub description: String,
    /// When the money was spent. Distinct from when the record was created.
    pub expense_date: Date,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [NewExpense] for discoverability.
    pub fn build(title: &str, amount: f64, expense_date: Date) -> NewExpense {
        NewExpense {
            title: title.to_owned(),
            amount,
            category_id: None,
            description: String::new(),
            expense_date,
        }
    }
}

/// The fields needed to insert an expense.
///
/// Optional fields default to empty and can be set with the builder methods.
/// Pass the finished value to [create_expense].
#[derive(Debug, PartialEq, Clone)]
pub struct NewExpense {
    /// A short name for the expense.
    pub title: String,
    /// The amount of money spent. Validated as non-negative at the HTTP
    /// boundary; this layer stores what it is given.
    pub amount: f64,
    /// The category the expense belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// Free-form notes about the expense.
    pub description: String,
    /// When the money was spent.
    pub expense_date: Date,
}

impl NewExpense {
    /// Set the category for the expense.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the description for the expense.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new expense in the database.
///
/// The row's `created_at` column is set by the database with millisecond
/// precision; it breaks ordering ties between expenses that share a date.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expenses (title, amount, category_id, description, expense_date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, title, amount, category_id, description, expense_date",
        )?
        .query_row(
            (
                new_expense.title,
                new_expense.amount,
                new_expense.category_id,
                new_expense.description,
                new_expense.expense_date,
            ),
            map_expense_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(new_expense.category_id),
            error => error.into(),
        })?;

    Ok(expense)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, title, amount, category_id, description, expense_date
             FROM expenses WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// The number of rows changed by a delete.
pub type RowsAffected = usize;

/// Delete the expense with `id` if it exists.
///
/// Deleting an expense that does not exist is not an error; the returned row
/// count is zero. This makes deletion idempotent, which matters when two
/// clients race to delete the same row.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM expenses WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Create the expenses table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                category_id INTEGER,
                description TEXT NOT NULL DEFAULT '',
                expense_date TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                FOREIGN KEY(category_id) REFERENCES categories(id)
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('expenses', 0)",
        (),
    )?;

    // Composite index covering the listing order.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date_created
         ON expenses(expense_date, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Expense.
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let category_id = row.get(3)?;
    let description = row.get(4)?;
    let expense_date = row.get(5)?;

    Ok(Expense {
        id,
        title,
        amount,
        category_id,
        description,
        expense_date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        expense::{Expense, create_expense, delete_expense, get_expense},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = 12.3;

        let result = create_expense(
            Expense::build("Lunch", amount, date!(2025 - 10 - 05)),
            &conn,
        );

        match result {
            Ok(expense) => {
                assert_eq!(expense.title, "Lunch");
                assert_eq!(expense.amount, amount);
                assert_eq!(expense.category_id, None);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_with_category_succeeds() {
        let conn = get_test_connection();
        let category_id: i64 = conn
            .query_row("SELECT id FROM categories LIMIT 1", [], |row| row.get(0))
            .unwrap();

        let expense = create_expense(
            Expense::build("Bus fare", 3.5, date!(2025 - 10 - 05)).category_id(Some(category_id)),
            &conn,
        )
        .expect("Could not create expense");

        assert_eq!(expense.category_id, Some(category_id));
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();
        let category_id = Some(9999);

        let result = create_expense(
            Expense::build("Bad", 1.0, date!(2025 - 10 - 04)).category_id(category_id),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(category_id)));
    }

    #[test]
    fn delete_removes_expense() {
        let conn = get_test_connection();
        let expense =
            create_expense(Expense::build("Lunch", 9.99, date!(2025 - 10 - 05)), &conn).unwrap();

        let rows_affected = delete_expense(expense.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_expense(expense.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_is_idempotent() {
        let conn = get_test_connection();
        let expense =
            create_expense(Expense::build("Lunch", 9.99, date!(2025 - 10 - 05)), &conn).unwrap();

        let first = delete_expense(expense.id, &conn).unwrap();
        let second = delete_expense(expense.id, &conn).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0, "second delete should be a no-op, not an error");
    }

    #[test]
    fn delete_missing_expense_is_not_an_error() {
        let conn = get_test_connection();

        let rows_affected = delete_expense(42, &conn).unwrap();

        assert_eq!(rows_affected, 0);
    }
}
