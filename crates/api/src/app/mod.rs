//! HTTP application wiring (Axum router + gate + asset layer).
//!
//! - `assets.rs`: the prebuilt-site collaborator (file serving, pretty URLs)
//! - `routes/`: the few dynamic routes (health)

use std::sync::Arc;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use sitegate_auth::{KeyError, SigningKey, TokenVerifier};

use crate::gate::RequestGate;
use crate::middleware;
use crate::settings::Settings;

pub mod assets;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(settings: &Settings) -> Result<Router, KeyError> {
    let verifier: Arc<dyn TokenVerifier> = Arc::new(settings.verifier());
    build_app_with_verifier(settings, verifier)
}

/// Same as [`build_app`] with a caller-supplied verification capability.
pub fn build_app_with_verifier(
    settings: &Settings,
    verifier: Arc<dyn TokenVerifier>,
) -> Result<Router, KeyError> {
    let key = SigningKey::parse(&settings.signing_key)?;
    let gate = Arc::new(RequestGate::new(settings.gate.clone(), key, verifier));
    let gate_state = middleware::GateState { gate };

    // Every site request passes the gate; public paths are waved through by it.
    let site = assets::router(settings.assets_dir.clone()).layer(
        axum::middleware::from_fn_with_state(gate_state, middleware::gate_middleware),
    );

    // Health stays reachable whatever the protected prefix is.
    let app = Router::new()
        .route("/health", get(routes::system::health))
        .merge(site)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    Ok(app)
}
