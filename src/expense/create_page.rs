//! The form page for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState,
    alert::{AlertKind, alert},
    category::{Category, get_all_categories},
    clock::today_local,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the add-expense page.
#[derive(Debug, Clone)]
pub(crate) struct AddExpensePageState {
    /// The database connection for reading categories.
    pub(crate) db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the form for recording a new expense.
///
/// The category dropdown is populated from the database. If the categories
/// cannot be read the form is still served with an empty dropdown and a
/// visible error notice, so the user can keep recording expenses.
pub async fn get_add_expense_page(State(state): State<AddExpensePageState>) -> Response {
    let categories = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
        })
        .and_then(|connection| {
            get_all_categories(&connection).map_err(|error| {
                tracing::error!("could not load categories: {error}");
            })
        });

    match categories {
        Ok(categories) => add_expense_view(&categories, None).into_response(),
        Err(()) => {
            let warning = alert(
                AlertKind::Error,
                "Could not load categories.",
                "You can still add an expense without one.",
            );

            add_expense_view(&[], Some(warning)).into_response()
        }
    }
}

fn add_expense_view(categories: &[Category], warning: Option<Markup>) -> Markup {
    let nav_bar = NavBar::new(endpoints::ADD_EXPENSE).into_html();
    let today = today_local();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(warning) = warning {
                (warning)
            }

            div class="w-full max-w-md bg-white rounded-lg shadow dark:border dark:bg-gray-800 dark:border-gray-700"
            {
                div class="p-6 space-y-4"
                {
                    h1
                        class="text-xl font-bold leading-tight tracking-tight
                            text-gray-900 md:text-2xl dark:text-white"
                    {
                        "Add Expense"
                    }

                    form
                        class="space-y-4"
                        action=(endpoints::ADD_EXPENSE)
                        method="post"
                    {
                        div
                        {
                            label for="title" class=(FORM_LABEL_STYLE) { "Title" }
                            input
                                type="text"
                                name="title"
                                id="title"
                                class=(FORM_TEXT_INPUT_STYLE)
                                placeholder="e.g. Coffee"
                                required;
                        }

                        div
                        {
                            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                            input
                                type="number"
                                name="amount"
                                id="amount"
                                class=(FORM_TEXT_INPUT_STYLE)
                                step="0.01"
                                min="0"
                                placeholder="0.00"
                                required;
                        }

                        div
                        {
                            label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }
                            select
                                name="category_id"
                                id="category_id"
                                class=(FORM_TEXT_INPUT_STYLE)
                            {
                                option value="" { "No category" }

                                @for category in categories {
                                    option value=(category.id) { (category.name) }
                                }
                            }
                        }

                        div
                        {
                            label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                            textarea
                                name="description"
                                id="description"
                                class=(FORM_TEXT_INPUT_STYLE)
                                rows="3"
                                placeholder="Optional notes"
                            {}
                        }

                        div
                        {
                            label for="expense_date" class=(FORM_LABEL_STYLE) { "Date" }
                            input
                                type="date"
                                name="expense_date"
                                id="expense_date"
                                class=(FORM_TEXT_INPUT_STYLE)
                                value=(today)
                                required;
                        }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
                    }
                }
            }
        }
    );

    base("Add Expense", &[], &content)
}
