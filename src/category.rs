//! Defines the category model and its database queries.
//!
//! Categories are a fixed grouping for expenses. The full set is seeded when
//! the database is initialized and there is no endpoint for creating,
//! renaming, or deleting them.

use rusqlite::{Connection, Row};

use crate::{Error, database_id::CategoryId};

/// The category names seeded into every new database.
pub(crate) const DEFAULT_CATEGORIES: [&str; 9] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Travel",
    "Other",
];

/// A named grouping for expenses, e.g. "Food & Dining".
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: String,
}

/// Retrieve all categories ordered alphabetically by name.
pub(crate) fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM categories ORDER BY name ASC;")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Create the categories table and its index.
pub(crate) fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_categories_name ON categories(name);",
    )?;

    Ok(())
}

/// Insert the default categories, skipping any name that already exists.
///
/// Safe to call repeatedly.
pub(crate) fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement =
        connection.prepare("INSERT OR IGNORE INTO categories (name) VALUES (?1);")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute((name,))?;
    }

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
