//! HTTP surface: the request gate, its axum middleware and the static-site app.

pub mod app;
pub mod gate;
pub mod middleware;
pub mod settings;

pub use gate::{Decision, Outcome, RequestGate};
pub use settings::Settings;
