//! Alert partials for displaying success and error messages to users.
//!
//! Redirecting handlers cannot carry markup with them, so they attach a
//! [Notice] code to the redirect's `notice` query parameter instead. The home
//! page decodes the code back into an alert.

use axum::response::Redirect;
use maud::{Markup, html};

use crate::endpoints;

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertKind {
    Success,
    Error,
}

/// Render an alert banner with appropriate styling.
pub fn alert(kind: AlertKind, message: &str, details: &str) -> Markup {
    let style = match kind {
        AlertKind::Success => {
            "w-full max-w-2xl p-4 mb-4 rounded-lg text-green-800 bg-green-50 \
            dark:bg-gray-800 dark:text-green-400"
        }
        AlertKind::Error => {
            "w-full max-w-2xl p-4 mb-4 rounded-lg text-red-800 bg-red-50 \
            dark:bg-gray-800 dark:text-red-400"
        }
    };

    html!(
        div class=(style) role="alert"
        {
            span class="font-medium" { (message) }

            @if !details.is_empty() {
                " " (details)
            }
        }
    )
}

/// The notice codes a redirect can carry to the home page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notice {
    ExpenseAdded,
    ExpenseAddFailed,
    MissingTitle,
    InvalidAmount,
    InvalidDate,
    ExpenseDeleted,
    ExpenseDeleteFailed,
}

impl Notice {
    /// The value used for the `notice` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Notice::ExpenseAdded => "expense_added",
            Notice::ExpenseAddFailed => "expense_add_failed",
            Notice::MissingTitle => "missing_title",
            Notice::InvalidAmount => "invalid_amount",
            Notice::InvalidDate => "invalid_date",
            Notice::ExpenseDeleted => "expense_deleted",
            Notice::ExpenseDeleteFailed => "expense_delete_failed",
        }
    }

    /// Decode a `notice` query parameter value. Unknown values are ignored.
    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "expense_added" => Some(Notice::ExpenseAdded),
            "expense_add_failed" => Some(Notice::ExpenseAddFailed),
            "missing_title" => Some(Notice::MissingTitle),
            "invalid_amount" => Some(Notice::InvalidAmount),
            "invalid_date" => Some(Notice::InvalidDate),
            "expense_deleted" => Some(Notice::ExpenseDeleted),
            "expense_delete_failed" => Some(Notice::ExpenseDeleteFailed),
            _ => None,
        }
    }

    /// Render the notice as an alert banner.
    pub fn into_alert(self) -> Markup {
        match self {
            Notice::ExpenseAdded => alert(AlertKind::Success, "Expense added successfully!", ""),
            Notice::ExpenseAddFailed => alert(
                AlertKind::Error,
                "Failed to add expense.",
                "Try again later or check the server logs.",
            ),
            Notice::MissingTitle => alert(
                AlertKind::Error,
                "Could not add expense:",
                "the title must not be empty.",
            ),
            Notice::InvalidAmount => alert(
                AlertKind::Error,
                "Could not add expense:",
                "the amount must be a non-negative number.",
            ),
            Notice::InvalidDate => alert(
                AlertKind::Error,
                "Could not add expense:",
                "the date must be in the format YYYY-MM-DD.",
            ),
            Notice::ExpenseDeleted => {
                alert(AlertKind::Success, "Expense deleted successfully!", "")
            }
            Notice::ExpenseDeleteFailed => alert(
                AlertKind::Error,
                "Failed to delete expense.",
                "Try again later or check the server logs.",
            ),
        }
    }

    /// A redirect to the home page that carries this notice.
    pub fn redirect_home(self) -> Redirect {
        Redirect::to(&format!(
            "{}?notice={}",
            endpoints::HOME,
            self.as_query_value()
        ))
    }
}

#[cfg(test)]
mod notice_tests {
    use super::Notice;

    #[test]
    fn query_values_round_trip() {
        let notices = [
            Notice::ExpenseAdded,
            Notice::ExpenseAddFailed,
            Notice::MissingTitle,
            Notice::InvalidAmount,
            Notice::InvalidDate,
            Notice::ExpenseDeleted,
            Notice::ExpenseDeleteFailed,
        ];

        for notice in notices {
            assert_eq!(
                Notice::from_query_value(notice.as_query_value()),
                Some(notice)
            );
        }
    }

    #[test]
    fn unknown_query_value_is_ignored() {
        assert_eq!(Notice::from_query_value("nonsense"), None);
    }
}
