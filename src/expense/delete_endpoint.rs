//! The endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::{HeaderMap, header::REFERER},
    response::Redirect,
};
use rusqlite::Connection;

use crate::{AppState, alert::Notice, database_id::ExpenseId};

use super::core::delete_expense;

/// The state needed for deleting expenses.
#[derive(Debug, Clone)]
pub(crate) struct DeleteExpenseState {
    /// The database connection for deleting expenses.
    pub(crate) db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete the expense with the ID in the URL path.
///
/// Deleting an ID that does not exist still succeeds, so repeating a delete
/// (a double-click, a stale page) is harmless. On success the client is sent
/// back to the page the request came from, falling back to the home page when
/// there is no referer.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    headers: HeaderMap,
) -> Redirect {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| crate::Error::DatabaseLockError)
        .and_then(|connection| delete_expense(expense_id, &connection));

    match result {
        Ok(rows_affected) => {
            tracing::info!("deleted expense {expense_id} ({rows_affected} rows)");

            match referer_path(&headers) {
                Some(path) => Redirect::to(&path),
                None => Notice::ExpenseDeleted.redirect_home(),
            }
        }
        Err(error) => {
            tracing::error!("could not delete expense {expense_id}: {error}");
            Notice::ExpenseDeleteFailed.redirect_home()
        }
    }
}

/// The path of the page the request came from, if the referer header is
/// present and parses as a URI.
fn referer_path(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REFERER)?
        .to_str()
        .ok()?
        .parse::<axum::http::Uri>()
        .ok()
        .map(|uri| uri.path_and_query().map_or_else(
            || uri.path().to_owned(),
            |path_and_query| path_and_query.as_str().to_owned(),
        ))
}
