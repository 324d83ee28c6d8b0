//! The endpoint that records a new expense from the add-expense form.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::Redirect,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{AppState, alert::Notice, database_id::CategoryId};

use super::core::{Expense, NewExpense, create_expense};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The state needed for creating expenses.
#[derive(Debug, Clone)]
pub(crate) struct CreateExpenseState {
    /// The database connection for inserting expenses.
    pub(crate) db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw form data for creating an expense.
///
/// All fields arrive as strings; validation and parsing happen in the
/// endpoint so a bad value becomes a user-facing notice instead of a 422.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateExpenseForm {
    /// A short name for the expense.
    title: String,
    /// The amount of money spent.
    amount: String,
    /// The ID of the category, or the empty string for no category.
    #[serde(default)]
    category_id: String,
    /// Free-form notes about the expense.
    #[serde(default)]
    description: String,
    /// When the money was spent, formatted "YYYY-MM-DD".
    expense_date: String,
}

/// Validate the form data and record a new expense.
///
/// Always redirects to the home page. The redirect carries a notice code
/// describing the outcome: success, a validation failure naming the bad
/// field, or a generic failure when the store rejects the insert.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Form(form): Form<CreateExpenseForm>,
) -> Redirect {
    let new_expense = match parse_expense_form(form) {
        Ok(new_expense) => new_expense,
        Err(notice) => return notice.redirect_home(),
    };

    let result = state
        .db_connection
        .lock()
        .map_err(|_| crate::Error::DatabaseLockError)
        .and_then(|connection| create_expense(new_expense, &connection));

    match result {
        Ok(expense) => {
            tracing::info!("created expense {} ({})", expense.id, expense.title);
            Notice::ExpenseAdded.redirect_home()
        }
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            Notice::ExpenseAddFailed.redirect_home()
        }
    }
}

fn parse_expense_form(form: CreateExpenseForm) -> Result<NewExpense, Notice> {
    let title = form.title.trim();

    if title.is_empty() {
        return Err(Notice::MissingTitle);
    }

    let amount: f64 = form
        .amount
        .trim()
        .parse()
        .map_err(|_| Notice::InvalidAmount)?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(Notice::InvalidAmount);
    }

    let expense_date = Date::parse(form.expense_date.trim(), DATE_FORMAT)
        .map_err(|_| Notice::InvalidDate)?;

    let category_id: Option<CategoryId> = match form.category_id.trim() {
        "" => None,
        // A non-numeric ID cannot have come from the form's dropdown.
        raw => Some(raw.parse().map_err(|_| Notice::ExpenseAddFailed)?),
    };

    Ok(Expense::build(title, amount, expense_date)
        .category_id(category_id)
        .description(form.description.trim()))
}

#[cfg(test)]
mod create_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        expense::{ExpenseFilter, get_filtered_expenses},
    };

    use super::{CreateExpenseForm, CreateExpenseState, create_expense_endpoint};

    fn get_test_state() -> CreateExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn valid_form() -> CreateExpenseForm {
        CreateExpenseForm {
            title: "Coffee".to_owned(),
            amount: "4.50".to_owned(),
            category_id: String::new(),
            description: String::new(),
            expense_date: "2025-10-05".to_owned(),
        }
    }

    async fn expense_count(state: &CreateExpenseState) -> usize {
        let conn = state.db_connection.lock().unwrap();
        get_filtered_expenses(&ExpenseFilter::default(), &conn)
            .unwrap()
            .len()
    }

    fn location_of(redirect: axum::response::Redirect) -> String {
        use axum::response::IntoResponse;

        let response = redirect.into_response();
        response
            .headers()
            .get("location")
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn valid_form_creates_expense_and_redirects_home() {
        let state = get_test_state();

        let redirect = create_expense_endpoint(State(state.clone()), Form(valid_form())).await;

        assert_eq!(location_of(redirect), "/?notice=expense_added");
        assert_eq!(expense_count(&state).await, 1);
    }

    #[tokio::test]
    async fn form_with_category_assigns_it() {
        let state = get_test_state();
        let category_id: i64 = {
            let conn = state.db_connection.lock().unwrap();
            conn.query_row("SELECT id FROM categories LIMIT 1", [], |row| row.get(0))
                .unwrap()
        };

        let form = CreateExpenseForm {
            category_id: category_id.to_string(),
            ..valid_form()
        };
        create_expense_endpoint(State(state.clone()), Form(form)).await;

        let conn = state.db_connection.lock().unwrap();
        let stored: i64 = conn
            .query_row("SELECT category_id FROM expenses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, category_id);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let state = get_test_state();
        let form = CreateExpenseForm {
            title: "   ".to_owned(),
            ..valid_form()
        };

        let redirect = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(location_of(redirect), "/?notice=missing_title");
        assert_eq!(expense_count(&state).await, 0);
    }

    #[tokio::test]
    async fn non_numeric_amount_is_rejected() {
        let state = get_test_state();
        let form = CreateExpenseForm {
            amount: "lots".to_owned(),
            ..valid_form()
        };

        let redirect = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(location_of(redirect), "/?notice=invalid_amount");
        assert_eq!(expense_count(&state).await, 0);
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let state = get_test_state();
        let form = CreateExpenseForm {
            amount: "-5".to_owned(),
            ..valid_form()
        };

        let redirect = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(location_of(redirect), "/?notice=invalid_amount");
    }

    #[tokio::test]
    async fn zero_amount_is_accepted() {
        let state = get_test_state();
        let form = CreateExpenseForm {
            amount: "0".to_owned(),
            ..valid_form()
        };

        let redirect = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(location_of(redirect), "/?notice=expense_added");
    }

    #[tokio::test]
    async fn malformed_date_is_rejected() {
        let state = get_test_state();
        let form = CreateExpenseForm {
            expense_date: "05/10/2025".to_owned(),
            ..valid_form()
        };

        let redirect = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(location_of(redirect), "/?notice=invalid_date");
        assert_eq!(expense_count(&state).await, 0);
    }

    #[tokio::test]
    async fn unknown_category_id_fails_without_creating() {
        let state = get_test_state();
        let form = CreateExpenseForm {
            category_id: "9999".to_owned(),
            ..valid_form()
        };

        let redirect = create_expense_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(location_of(redirect), "/?notice=expense_add_failed");
        assert_eq!(expense_count(&state).await, 0);
    }
}
