//! Router Module Index
//!
//! Organizes the application's routing logic into access-segregated modules,
//! so the access-control decision for every endpoint is visible at the module
//! level (via Axum layers) instead of being scattered across handlers.

/// Routes accessible to all clients: health check, login and registration.
pub mod public;

/// The whole /tableaux resource tree, protected by the `AuthUser` extractor
/// middleware. Ownership checks happen per-level inside the handlers.
pub mod boards;

/// The /db seed/drop fixture endpoints. Deliberately unauthenticated,
/// matching the shipped contract.
pub mod maintenance;
