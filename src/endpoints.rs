//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete_expense/{expense_id}',
//! use [format_endpoint].

/// The home page showing recent expenses and summary totals.
pub const HOME: &str = "/";
/// The page for adding a new expense (GET) and the form submission target (POST).
pub const ADD_EXPENSE: &str = "/add_expense";
/// The page for listing all expenses with optional filters.
pub const EXPENSES: &str = "/expenses";
/// The route for deleting an expense by ID.
pub const DELETE_EXPENSE: &str = "/delete_expense/{expense_id}";
/// The page with aggregate spending views.
pub const ANALYTICS: &str = "/analytics";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for monthly spending totals as JSON.
pub const MONTHLY_DATA_API: &str = "/api/monthly_data";
/// The route for per-category spending totals as JSON.
pub const CATEGORY_DATA_API: &str = "/api/category_data";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/delete_expense/{expense_id}',
/// '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
