//! HTTP surface of the PantryLink gateway.
//!
//! This crate wires everything together: the static operation table, the
//! request boundary (body collection, API-key check, panic containment),
//! the typed handlers for every endpoint, and the hyper accept loop. The
//! `pantrylink` binary lives here too.
//!
//! # Request flow
//!
//! ```text
//! TCP ─▶ hyper ─▶ ApiServer::handle_request
//!                   │  GET /api/  ──────────▶ embedded doc page
//!                   ▼
//!                 dispatch (auth check, route resolve, panic guard)
//!                   ▼
//!                 handler (validation, store/workflow calls)
//!                   ▼
//!                 ApiResponse envelope ─▶ transport status = http_code
//! ```

pub mod dispatch;
pub mod handlers;
pub mod operations;
pub mod server;
pub mod state;

#[cfg(test)]
mod test_support;

pub use operations::{route_table, Operation};
pub use server::{ApiServer, ServerError};
pub use state::AppState;

/// Human-readable gateway version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Monotonic integer version for scanner clients that compare versions
/// numerically.
pub const VERSION_INT: u64 = 100;
