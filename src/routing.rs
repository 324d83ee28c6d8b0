//! Defines the routes of the application and wires them to their handlers.

use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    analytics::{get_analytics_page, get_category_data, get_monthly_data},
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_add_expense_page, get_expenses_page,
    },
    home::get_home_page,
    not_found::get_404_not_found,
};

/// Creates the router for the application with all routes and the given
/// state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HOME, get(get_home_page))
        .route(
            endpoints::ADD_EXPENSE,
            get(get_add_expense_page).post(create_expense_endpoint),
        )
        .route(endpoints::EXPENSES, get(get_expenses_page))
        .route(endpoints::DELETE_EXPENSE, get(delete_expense_endpoint))
        .route(endpoints::ANALYTICS, get(get_analytics_page))
        .route(endpoints::MONTHLY_DATA_API, get(get_monthly_data))
        .route(endpoints::CATEGORY_DATA_API, get(get_category_data))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get(get_404_not_found))
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, clock::today_local, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().unwrap();
        let state = AppState::new(conn).unwrap();

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn pages_load() {
        let server = get_test_server();

        for endpoint in [
            endpoints::HOME,
            endpoints::ADD_EXPENSE,
            endpoints::EXPENSES,
            endpoints::ANALYTICS,
        ] {
            let response = server.get(endpoint).await;
            response.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn api_endpoints_serve_json() {
        let server = get_test_server();

        for endpoint in [endpoints::MONTHLY_DATA_API, endpoints::CATEGORY_DATA_API] {
            let response = server.get(endpoint).await;
            response.assert_status_ok();
            response.assert_text("[]");
        }
    }

    #[tokio::test]
    async fn unknown_route_returns_404_page() {
        let server = get_test_server();

        let response = server.get("/does_not_exist").await;

        response.assert_status_not_found();
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn adding_an_expense_updates_the_home_page() {
        let server = get_test_server();
        let today = today_local().to_string();

        let response = server
            .post(endpoints::ADD_EXPENSE)
            .form(&[
                ("title", "Coffee"),
                ("amount", "4.50"),
                ("category_id", ""),
                ("description", ""),
                ("expense_date", today.as_str()),
            ])
            .await;
        response.assert_status_see_other();
        assert_eq!(
            response.header("location").to_str().unwrap(),
            "/?notice=expense_added"
        );

        let home = server.get(endpoints::HOME).await;
        let text = home.text();
        assert!(text.contains("Coffee"));
        assert!(text.contains("$4.50"));
    }

    #[tokio::test]
    async fn deleting_an_expense_removes_it_from_the_home_page() {
        let server = get_test_server();
        let today = today_local().to_string();

        server
            .post(endpoints::ADD_EXPENSE)
            .form(&[
                ("title", "Coffee"),
                ("amount", "4.50"),
                ("expense_date", today.as_str()),
            ])
            .await;

        let response = server.get("/delete_expense/1").await;
        response.assert_status_see_other();

        let home = server.get(endpoints::HOME).await;
        assert!(!home.text().contains("Coffee"));
    }
}
