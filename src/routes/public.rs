use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// These are the identity gateway (login/registration) and the health probe.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // POST /connexion
        // Verifies credentials and returns a 24-hour JWT in the Authorization
        // response header.
        .route("/connexion", post(handlers::login))
        // POST /inscription
        // Creates a new user after validating the payload and the uniqueness of
        // both the name and the email.
        .route("/inscription", post(handlers::register))
}
