//! The expense listing page with category and date range filters.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    alert::{AlertKind, alert},
    category::{Category, get_all_categories},
    database_id::CategoryId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
};

use super::query::{ExpenseFilter, ExpenseWithCategory, get_filtered_expenses};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The state needed for the expense listing page.
#[derive(Debug, Clone)]
pub(crate) struct ExpensesPageState {
    /// The database connection for reading expenses and categories.
    pub(crate) db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw filter query parameters.
///
/// All fields arrive as strings. Blank or malformed values mean "no
/// constraint" rather than an error, so a hand-edited URL degrades to a less
/// filtered listing instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExpenseFilterParams {
    /// Only include expenses in this category.
    #[serde(default)]
    category: String,
    /// Only include expenses dated on or after this date.
    #[serde(default)]
    date_from: String,
    /// Only include expenses dated on or before this date.
    #[serde(default)]
    date_to: String,
}

impl ExpenseFilterParams {
    fn to_filter(&self) -> ExpenseFilter {
        ExpenseFilter {
            category_id: self.category.trim().parse::<CategoryId>().ok(),
            date_from: Date::parse(self.date_from.trim(), DATE_FORMAT).ok(),
            date_to: Date::parse(self.date_to.trim(), DATE_FORMAT).ok(),
        }
    }
}

/// Display all expenses matching the filter query parameters, newest first.
///
/// If the store cannot be read the page is still served, with an empty
/// listing and a visible error notice.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(params): Query<ExpenseFilterParams>,
) -> Response {
    let filter = params.to_filter();

    let page_data = fetch_page_data(&state, &filter);

    match page_data {
        Ok((expenses, categories)) => {
            expenses_view(&expenses, &categories, &filter, None).into_response()
        }
        Err(error) => {
            tracing::error!("could not load the expense listing: {error}");

            let warning = alert(
                AlertKind::Error,
                "Could not load expenses.",
                "Try again later or check the server logs.",
            );

            expenses_view(&[], &[], &filter, Some(warning)).into_response()
        }
    }
}

fn fetch_page_data(
    state: &ExpensesPageState,
    filter: &ExpenseFilter,
) -> Result<(Vec<ExpenseWithCategory>, Vec<Category>), Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_filtered_expenses(filter, &connection)?;
    let categories = get_all_categories(&connection)?;

    Ok((expenses, categories))
}

fn expenses_view(
    expenses: &[ExpenseWithCategory],
    categories: &[Category],
    filter: &ExpenseFilter,
    warning: Option<Markup>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(warning) = warning {
                (warning)
            }

            (filter_form(categories, filter))

            @if expenses.is_empty() {
                p class="mt-4" { "No expenses match." }
            } @else {
                (expenses_table(expenses))
            }
        }
    );

    base("Expenses", &[], &content)
}

fn filter_form(categories: &[Category], filter: &ExpenseFilter) -> Markup {
    html!(
        form
            class="w-full max-w-4xl flex flex-wrap items-end gap-4 mb-4"
            action=(endpoints::EXPENSES)
            method="get"
        {
            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All categories" }

                    @for category in categories {
                        option
                            value=(category.id)
                            selected[filter.category_id == Some(category.id)]
                        {
                            (category.name)
                        }
                    }
                }
            }

            div
            {
                label for="date_from" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="date_from"
                    id="date_from"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[filter.date_from];
            }

            div
            {
                label for="date_to" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="date_to"
                    id="date_to"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[filter.date_to];
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
        }
    )
}

fn expenses_table(expenses: &[ExpenseWithCategory]) -> Markup {
    html!(
        div class="w-full max-w-4xl relative overflow-x-auto shadow-md sm:rounded-lg"
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

                            td class=(TABLE_CELL_STYLE)
                            {
                                (expense.title)

                                @if !expense.description.is_empty() {
                                    p class="text-xs text-gray-400" { (expense.description) }
                                }
                            }

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
