/*! Database schema initialization. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, category, expense};

/// Create the application's tables if they do not exist and seed the default
/// categories.
///
/// This function is idempotent and safe to invoke on every startup.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Foreign keys are off by default in SQLite. The expense table relies on
    // them to keep category references valid.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    category::create_category_table(&transaction)?;
    expense::create_expense_table(&transaction)?;
    category::seed_default_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}
