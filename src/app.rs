use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page))
        .route("/signup", get(handlers::signup_page))
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/worksheets", get(handlers::worksheets_page))
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/session", get(handlers::session))
        .route(
            "/api/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route("/api/entries/series", get(handlers::entry_series))
        .route(
            "/api/entries/:id",
            patch(handlers::update_entry).delete(handlers::delete_entry),
        )
        .route(
            "/api/worksheets",
            get(handlers::list_worksheets).post(handlers::create_worksheet),
        )
        .with_state(state)
}
