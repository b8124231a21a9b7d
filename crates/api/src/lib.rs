//! Asset administration API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! pipeline stages) so integration tests, the admin console tests and the
//! binary entrypoint all assemble the same application.

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
