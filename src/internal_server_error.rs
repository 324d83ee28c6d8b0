//! The 500 internal server error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// The text shown on the internal server error page.
pub struct InternalServerErrorPage<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerErrorPage<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

/// Get a 500 response rendering the internal server error page.
pub fn render_internal_server_error(page: InternalServerErrorPage) -> Response {
    let body = error_view("Server Error", "500", page.description, page.fix);

    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
