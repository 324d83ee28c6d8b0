//! Aggregate spending views: the analytics page and the JSON API endpoints
//! that feed its charts.

mod api;
mod charts;
mod core;
mod page;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub(crate) use api::{get_category_data, get_monthly_data};
pub(crate) use core::{CategoryTotal, MonthlyTotal};
pub(crate) use page::get_analytics_page;

/// The state needed for the analytics page and API endpoints.
#[derive(Debug, Clone)]
pub(crate) struct AnalyticsState {
    /// The database connection for reading expenses.
    pub(crate) db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
