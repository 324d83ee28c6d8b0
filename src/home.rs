//! The home page: summary totals, the most recent expenses, and any notice
//! carried over from a redirect.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::{AlertKind, Notice, alert},
    clock::today_local,
    endpoints::{self, format_endpoint},
    expense::{
        ExpenseWithCategory, RECENT_EXPENSE_LIMIT, get_recent_expenses, sum_for_date,
        sum_from_date,
    },
    html::{
        BUTTON_DELETE_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
};

/// The state needed for the home page.
#[derive(Debug, Clone)]
pub(crate) struct HomeState {
    /// The database connection for reading expenses.
    pub(crate) db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters the home page accepts.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HomeQuery {
    /// A notice code set by a redirecting endpoint.
    notice: Option<String>,
}

/// The figures and rows the home page displays.
struct HomeSummary {
    today_total: f64,
    month_total: f64,
    recent_expenses: Vec<ExpenseWithCategory>,
}

/// Display summary totals for today and the current month and the ten most
/// recently dated expenses.
///
/// If the store cannot be read the page is still served, with zeroed totals,
/// an empty listing, and a visible error notice.
pub async fn get_home_page(
    State(state): State<HomeState>,
    Query(query): Query<HomeQuery>,
) -> Response {
    let notice = query
        .notice
        .as_deref()
        .and_then(Notice::from_query_value)
        .map(Notice::into_alert);

    match fetch_summary(&state) {
        Ok(summary) => home_view(&summary, notice).into_response(),
        Err(error) => {
            tracing::error!("could not load the home page summary: {error}");

            let warning = alert(
                AlertKind::Error,
                "Could not load expenses.",
                "Try again later or check the server logs.",
            );
            let summary = HomeSummary {
                today_total: 0.0,
                month_total: 0.0,
                recent_expenses: Vec::new(),
            };

            home_view(&summary, Some(warning)).into_response()
        }
    }
}

fn fetch_summary(state: &HomeState) -> Result<HomeSummary, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let today = today_local();
    let month_start = today.replace_day(1).unwrap_or(today);

    Ok(HomeSummary {
        today_total: sum_for_date(today, &connection)?,
        month_total: sum_from_date(month_start, &connection)?,
        recent_expenses: get_recent_expenses(RECENT_EXPENSE_LIMIT, &connection)?,
    })
}

fn home_view(summary: &HomeSummary, notice: Option<Markup>) -> Markup {
    let nav_bar = NavBar::new(endpoints::HOME).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(notice) = notice {
                (notice)
            }

            div class="w-full max-w-2xl grid grid-cols-1 sm:grid-cols-2 gap-4 mb-6"
            {
                div class=(CARD_STYLE)
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Spent today" }
                    p class="text-2xl font-bold" { (format_currency(summary.today_total)) }
                }

                div class=(CARD_STYLE)
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Spent this month" }
                    p class="text-2xl font-bold" { (format_currency(summary.month_total)) }
                }
            }

            h2 class="text-xl font-bold mb-2" { "Recent Expenses" }

            @if summary.recent_expenses.is_empty() {
                p
                {
                    "No expenses yet. "
                    (link(endpoints::ADD_EXPENSE, "Add your first expense."))
                }
            } @else {
                (recent_expenses_table(&summary.recent_expenses))
            }
        }
    );

    base("Home", &[], &content)
}

fn recent_expenses_table(expenses: &[ExpenseWithCategory]) -> Markup {
    html!(
        div class="w-full max-w-2xl relative overflow-x-auto shadow-md sm:rounded-lg"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Action" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (expense.expense_date) }
                            td class=(TABLE_CELL_STYLE) { (expense.title) }

                            td class=(TABLE_CELL_STYLE)
                            {
                                (expense.category_name.as_deref().unwrap_or("-"))
                            }

                            td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }

                            td class=(TABLE_CELL_STYLE)
                            {
                                a
                                    href=(format_endpoint(endpoints::DELETE_EXPENSE, expense.id))
                                    class=(BUTTON_DELETE_STYLE)
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}
