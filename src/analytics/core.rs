//! Aggregation queries over the expense set.
//!
//! Both aggregations are recomputed on each request. The expense volume of a
//! personal tracker stays small enough that caching or incremental
//! maintenance would not pay for its complexity.

use rusqlite::Connection;
use serde::Serialize;
use time::{Date, Month};

use crate::Error;

/// How many trailing months the monthly aggregation covers by default.
pub(crate) const DEFAULT_WINDOW_MONTHS: u32 = 6;

/// The total spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct MonthlyTotal {
    /// The calendar month, formatted "YYYY-MM".
    pub(crate) month: String,
    /// The sum of expense amounts in that month.
    pub(crate) total: f64,
}

/// The total spent in one category, with the number of expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CategoryTotal {
    /// The name of the category.
    pub(crate) name: String,
    /// The sum of expense amounts in the category.
    pub(crate) total: f64,
    /// How many expenses the category has.
    pub(crate) count: u32,
}

/// Sum expenses per calendar month over the trailing window.
///
/// The window runs from `today` minus `window_months` calendar months
/// (day-of-month clamped for short target months) through `today`. Months in
/// which nothing was spent produce no bucket; the result only contains months
/// with at least one expense, in ascending label order.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn monthly_totals(
    window_months: u32,
    today: Date,
    connection: &Connection,
) -> Result<Vec<MonthlyTotal>, Error> {
    let window_start = months_back(today, window_months);

    connection
        .prepare(
            "SELECT strftime('%Y-%m', expense_date) AS month, SUM(amount) AS total
             FROM expenses
             WHERE expense_date >= :window_start
             GROUP BY month
             ORDER BY month ASC",
        )?
        .query_map(&[(":window_start", &window_start)], |row| {
            Ok(MonthlyTotal {
                month: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

/// Sum and count expenses per category, biggest spender first.
///
/// Categories with no expenses are excluded entirely (an inner join, unlike
/// the listing views which tolerate a missing category).
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn category_totals(connection: &Connection) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT categories.name, SUM(expenses.amount) AS total, COUNT(expenses.id) AS count
             FROM expenses
             INNER JOIN categories ON expenses.category_id = categories.id
             GROUP BY categories.id, categories.name
             ORDER BY total DESC",
        )?
        .query_map([], |row| {
            Ok(CategoryTotal {
                name: row.get(0)?,
                total: row.get(1)?,
                count: row.get(2)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

/// The date `months` calendar months before `date`.
///
/// The day of month is kept where possible and clamped to the last day of the
/// target month otherwise, e.g. August 31 minus six months is February 28 (or
/// 29 in a leap year).
pub(crate) fn months_back(date: Date, months: u32) -> Date {
    let mut year = date.year();
    let mut month = date.month() as i32 - months as i32;

    while month < 1 {
        month += 12;
        year -= 1;
    }

    // `month` is in 1..=12 here, so the conversion cannot fail.
    let month = Month::try_from(month as u8).unwrap();
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).unwrap()
}

#[cfg(test)]
mod aggregation_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        expense::{Expense, create_expense, delete_expense},
    };

    use super::{CategoryTotal, MonthlyTotal, category_totals, monthly_totals, months_back};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn category_id_by_name(name: &str, conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT id FROM categories WHERE name = :name",
            &[(":name", name)],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn monthly_totals_buckets_by_calendar_month() {
        let conn = get_test_connection();
        let today = date!(2025 - 02 - 15);

        create_expense(Expense::build("A", 10.0, date!(2025 - 01 - 05)), &conn).unwrap();
        create_expense(Expense::build("B", 20.0, date!(2025 - 01 - 20)), &conn).unwrap();
        create_expense(Expense::build("C", 5.0, date!(2025 - 01 - 31)), &conn).unwrap();
        create_expense(Expense::build("D", 7.5, date!(2025 - 02 - 01)), &conn).unwrap();
        create_expense(Expense::build("E", 2.5, date!(2025 - 02 - 10)), &conn).unwrap();

        let totals = monthly_totals(6, today, &conn).unwrap();

        assert_eq!(
            totals,
            vec![
                MonthlyTotal {
                    month: "2025-01".to_owned(),
                    total: 35.0
                },
                MonthlyTotal {
                    month: "2025-02".to_owned(),
                    total: 10.0
                },
            ]
        );
    }

    #[test]
    fn monthly_totals_never_contains_empty_buckets() {
        let conn = get_test_connection();
        let today = date!(2025 - 06 - 15);

        // Nothing in February through May.
        create_expense(Expense::build("Jan", 10.0, date!(2025 - 01 - 20)), &conn).unwrap();
        create_expense(Expense::build("Jun", 20.0, date!(2025 - 06 - 10)), &conn).unwrap();

        let totals = monthly_totals(6, today, &conn).unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].month, "2025-01");
        assert_eq!(totals[1].month, "2025-06");
    }

    #[test]
    fn monthly_totals_excludes_expenses_outside_the_window() {
        let conn = get_test_connection();
        let today = date!(2025 - 07 - 15);

        create_expense(Expense::build("Too old", 99.0, date!(2024 - 12 - 31)), &conn).unwrap();
        create_expense(Expense::build("In window", 10.0, date!(2025 - 07 - 01)), &conn).unwrap();

        let totals = monthly_totals(6, today, &conn).unwrap();

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].month, "2025-07");
    }

    #[test]
    fn monthly_totals_is_empty_without_expenses() {
        let conn = get_test_connection();

        let totals = monthly_totals(6, date!(2025 - 07 - 15), &conn).unwrap();

        assert!(totals.is_empty());
    }

    #[test]
    fn category_totals_sums_and_counts_per_category() {
        let conn = get_test_connection();
        let food = category_id_by_name("Food & Dining", &conn);
        let travel = category_id_by_name("Travel", &conn);

        create_expense(
            Expense::build("Groceries", 50.0, date!(2025 - 10 - 01)).category_id(Some(food)),
            &conn,
        )
        .unwrap();
        create_expense(
            Expense::build("Lunch", 15.0, date!(2025 - 10 - 02)).category_id(Some(food)),
            &conn,
        )
        .unwrap();
        create_expense(
            Expense::build("Flight", 300.0, date!(2025 - 10 - 03)).category_id(Some(travel)),
            &conn,
        )
        .unwrap();

        let totals = category_totals(&conn).unwrap();

        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    name: "Travel".to_owned(),
                    total: 300.0,
                    count: 1
                },
                CategoryTotal {
                    name: "Food & Dining".to_owned(),
                    total: 65.0,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn category_totals_excludes_zero_expense_categories() {
        let conn = get_test_connection();
        let food = category_id_by_name("Food & Dining", &conn);
        create_expense(
            Expense::build("Lunch", 15.0, date!(2025 - 10 - 02)).category_id(Some(food)),
            &conn,
        )
        .unwrap();

        let totals = category_totals(&conn).unwrap();

        assert_eq!(totals.len(), 1, "only categories with expenses may appear");
    }

    #[test]
    fn category_totals_ignores_uncategorized_expenses() {
        let conn = get_test_connection();
        create_expense(Expense::build("Misc", 5.0, date!(2025 - 10 - 02)), &conn).unwrap();

        let totals = category_totals(&conn).unwrap();

        assert!(totals.is_empty());
    }

    #[test]
    fn category_totals_reflect_deletion() {
        let conn = get_test_connection();
        let food = category_id_by_name("Food & Dining", &conn);
        let kept = create_expense(
            Expense::build("Groceries", 50.0, date!(2025 - 10 - 01)).category_id(Some(food)),
            &conn,
        )
        .unwrap();
        let deleted = create_expense(
            Expense::build("Lunch", 15.0, date!(2025 - 10 - 02)).category_id(Some(food)),
            &conn,
        )
        .unwrap();

        delete_expense(deleted.id, &conn).unwrap();

        let totals = category_totals(&conn).unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total, kept.amount);
        assert_eq!(totals[0].count, 1);
    }

    #[test]
    fn months_back_steps_within_a_year() {
        assert_eq!(months_back(date!(2025 - 10 - 15), 6), date!(2025 - 04 - 15));
    }

    #[test]
    fn months_back_crosses_year_boundary() {
        assert_eq!(months_back(date!(2025 - 02 - 10), 6), date!(2024 - 08 - 10));
        assert_eq!(months_back(date!(2025 - 01 - 01), 12), date!(2024 - 01 - 01));
    }

    #[test]
    fn months_back_clamps_day_of_month() {
        assert_eq!(months_back(date!(2025 - 08 - 31), 6), date!(2025 - 02 - 28));
        assert_eq!(months_back(date!(2024 - 08 - 31), 6), date!(2024 - 02 - 29));
        assert_eq!(months_back(date!(2025 - 07 - 31), 1), date!(2025 - 06 - 30));
    }
}
