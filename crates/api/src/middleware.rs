use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::gate::{Decision, RequestGate};

#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<RequestGate>,
}

/// Run every request through the gate; denied requests get a 302 to sign-in.
pub async fn gate_middleware(
    State(state): State<GateState>,
    req: axum::http::Request<Body>,
    next: Next,
) -> Response {
    match state.gate.decide(req.uri(), req.headers()).await {
        Decision::Allow => next.run(req).await,
        Decision::Deny { location } => redirect_found(&location),
    }
}

fn redirect_found(location: &str) -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::FORBIDDEN.into_response())
}
