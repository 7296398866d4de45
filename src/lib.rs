pub mod app;
pub mod auth;
pub mod chart;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod store;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use store::{load_data, resolve_data_path};
