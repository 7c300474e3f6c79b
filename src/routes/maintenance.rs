use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Maintenance Router Module
///
/// Fixture endpoints used to reset and repopulate the database during
/// development and testing. No auth middleware is attached, matching the
/// shipped contract; do not expose these routes on a public deployment.
pub fn maintenance_routes() -> Router<AppState> {
    Router::new()
        // GET /db/seed
        // Builds the deterministic two-user fixture tree.
        .route("/db/seed", get(handlers::db_seed))
        // GET /db/drop
        // Unconditionally removes every row of every entity type.
        .route("/db/drop", get(handlers::db_drop))
}
