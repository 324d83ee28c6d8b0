//! JSON endpoints serving aggregate data to chart consumers.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{Error, clock::today_local};

use super::{
    AnalyticsState, MonthlyTotal,
    core::{DEFAULT_WINDOW_MONTHS, category_totals, monthly_totals},
};

/// One category's total, as served by the category data endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CategoryDatum {
    /// The name of the category.
    name: String,
    /// The sum of expense amounts in the category.
    total: f64,
}

/// Serve monthly spending totals for the trailing six months as JSON.
///
/// An empty array is served if the store cannot be read, so chart consumers
/// never see an error response.
pub async fn get_monthly_data(State(state): State<AnalyticsState>) -> Json<Vec<MonthlyTotal>> {
    let totals = fetch_monthly(&state).unwrap_or_else(|error| {
        tracing::error!("could not load monthly totals: {error}");
        Vec::new()
    });

    Json(totals)
}

/// Serve all-time per-category spending totals as JSON, biggest spender
/// first.
///
/// An empty array is served if the store cannot be read.
pub async fn get_category_data(State(state): State<AnalyticsState>) -> Json<Vec<CategoryDatum>> {
    let totals = fetch_by_category(&state).unwrap_or_else(|error| {
        tracing::error!("could not load category totals: {error}");
        Vec::new()
    });

    Json(totals)
}

fn fetch_monthly(state: &AnalyticsState) -> Result<Vec<MonthlyTotal>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    monthly_totals(DEFAULT_WINDOW_MONTHS, today_local(), &connection)
}

fn fetch_by_category(state: &AnalyticsState) -> Result<Vec<CategoryDatum>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let totals = category_totals(&connection)?
        .into_iter()
        .map(|bucket| CategoryDatum {
            name: bucket.name,
            total: bucket.total,
        })
        .collect();

    Ok(totals)
}

#[cfg(test)]
mod analytics_api_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;
    use serde_json::json;
    use time::Duration;

    use crate::{
        analytics::AnalyticsState,
        clock::today_local,
        db::initialize,
        expense::{Expense, create_expense},
    };

    use super::{get_category_data, get_monthly_data};

    fn get_test_state() -> AnalyticsState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        AnalyticsState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn monthly_data_serializes_month_and_total() {
        let state = get_test_state();
        let today = today_local();
        let month_label = format!("{:04}-{:02}", today.year(), today.month() as u8);
        {
            let conn = state.db_connection.lock().unwrap();
            create_expense(Expense::build("Coffee", 4.5, today), &conn).unwrap();
            create_expense(Expense::build("Lunch", 15.5, today), &conn).unwrap();
        }

        let Json(totals) = get_monthly_data(State(state)).await;

        let got = serde_json::to_value(&totals).unwrap();
        assert_eq!(got, json!([{"month": month_label, "total": 20.0}]));
    }

    #[tokio::test]
    async fn monthly_data_excludes_old_expenses() {
        let state = get_test_state();
        let long_ago = today_local() - Duration::days(400);
        {
            let conn = state.db_connection.lock().unwrap();
            create_expense(Expense::build("Old", 99.0, long_ago), &conn).unwrap();
        }

        let Json(totals) = get_monthly_data(State(state)).await;

        assert!(totals.is_empty());
    }

    #[tokio::test]
    async fn category_data_serializes_name_and_total_only() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            let food: i64 = conn
                .query_row(
                    "SELECT id FROM categories WHERE name = 'Food & Dining'",
                    [],
                    |row| row.get(0),
                )
                .unwrap();
            create_expense(
                Expense::build("Groceries", 50.0, today_local()).category_id(Some(food)),
                &conn,
            )
            .unwrap();
        }

        let Json(totals) = get_category_data(State(state)).await;

        let got = serde_json::to_value(&totals).unwrap();
        assert_eq!(got, json!([{"name": "Food & Dining", "total": 50.0}]));
    }

    #[tokio::test]
    async fn endpoints_serve_empty_arrays_without_expenses() {
        let state = get_test_state();

        let Json(monthly) = get_monthly_data(State(state.clone())).await;
        let Json(by_category) = get_category_data(State(state)).await;

        assert!(monthly.is_empty());
        assert!(by_category.is_empty());
    }
}
