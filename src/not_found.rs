//! The 404 not found page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// Route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Get the response for the 404 not found page.
pub fn get_404_not_found_response() -> Response {
    let body = error_view(
        "Page Not Found",
        "404",
        "Page not found.",
        "Check the address, or head back home.",
    );

    (StatusCode::NOT_FOUND, body).into_response()
}
