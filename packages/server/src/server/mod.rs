// HTTP server setup (Axum + server-rendered page)
pub mod app;
pub mod routes;
pub mod templates;

pub use app::*;
