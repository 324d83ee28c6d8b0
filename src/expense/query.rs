//! Database query helpers for listing and summing expenses.
//!
//! All listing queries share the same ordering: most recent expense date
//! first, then most recently created first. This is what decides "what are my
//! ten most recent expenses" when several expenses share a date.

use rusqlite::{Connection, Row, ToSql};
use time::Date;

use crate::{
    Error,
    database_id::{CategoryId, ExpenseId},
};

/// How many expenses the home page shows.
pub(crate) const RECENT_EXPENSE_LIMIT: u32 = 10;

/// An expense joined with the name of its category, for display.
///
/// The join is a LEFT JOIN: an expense without a category still appears, with
/// `category_name` set to `None`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExpenseWithCategory {
    /// The ID of the expense.
    pub(crate) id: ExpenseId,
    /// A short name for the expense.
    pub(crate) title: String,
    /// The amount of money spent.
    pub(crate) amount: f64,
    /// The name of the expense's category, if it has one.
    pub(crate) category_name: Option<String>,
    /// Free-form notes about the expense.
    pub(crate) description: String,
    /// When the money was spent.
    pub(crate) expense_date: Date,
}

/// Optional constraints for the expense listing page.
///
/// Each field that is `Some` adds an AND clause; `None` fields impose no
/// constraint.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct ExpenseFilter {
    /// Only include expenses in this category.
    pub(crate) category_id: Option<CategoryId>,
    /// Only include expenses dated on or after this date.
    pub(crate) date_from: Option<Date>,
    /// Only include expenses dated on or before this date.
    pub(crate) date_to: Option<Date>,
}

const LISTING_ORDER: &str = "ORDER BY expenses.expense_date DESC, expenses.created_at DESC, expenses.id DESC";

/// Get the most recently dated expenses, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_recent_expenses(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<ExpenseWithCategory>, Error> {
    let query = format!(
        "SELECT expenses.id, title, amount, categories.name, description, expense_date
         FROM expenses
         LEFT JOIN categories ON expenses.category_id = categories.id
         {LISTING_ORDER}
         LIMIT :limit"
    );

    connection
        .prepare(&query)?
        .query_map(&[(":limit", &limit)], map_expense_with_category_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Get all expenses matching `filter`, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_filtered_expenses(
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<ExpenseWithCategory>, Error> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(category_id) = filter.category_id {
        clauses.push("expenses.category_id = ?");
        params.push(Box::new(category_id));
    }

    if let Some(date_from) = filter.date_from {
        clauses.push("expenses.expense_date >= ?");
        params.push(Box::new(date_from));
    }

    if let Some(date_to) = filter.date_to {
        clauses.push("expenses.expense_date <= ?");
        params.push(Box::new(date_to));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let query = format!(
        "SELECT expenses.id, title, amount, categories.name, description, expense_date
         FROM expenses
         LEFT JOIN categories ON expenses.category_id = categories.id
         {where_clause}
         {LISTING_ORDER}"
    );

    connection
        .prepare(&query)?
        .query_map(
            rusqlite::params_from_iter(params.iter().map(|param| param.as_ref())),
            map_expense_with_category_row,
        )?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Total amount of expenses dated exactly `date`. Zero when there are none.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn sum_for_date(date: Date, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE expense_date = :date",
            &[(":date", &date)],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Total amount of expenses dated on or after `date`. Zero when there are none.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn sum_from_date(date: Date, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE expense_date >= :date",
            &[(":date", &date)],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_expense_with_category_row(row: &Row) -> Result<ExpenseWithCategory, rusqlite::Error> {
    Ok(ExpenseWithCategory {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        category_name: row.get(3)?,
        description: row.get(4)?,
        expense_date: row.get(5)?,
    })
}
