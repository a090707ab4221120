//! Ordered route table for the PantryLink API.
//!
//! This crate implements the gateway's routing rules:
//!
//! - Path templates use `{name}` placeholders, each matching any run of
//!   characters except `/`. Templates are compiled into typed segments
//!   once, at registration time.
//! - Matching is anchored to the full path; there are no partial matches.
//! - A route may restrict itself to one HTTP method; a route without a
//!   restriction matches any method. Method comparison is exact.
//! - Dispatch checks literal routes by exact string equality first, then
//!   scans pattern routes in registration order; first match wins. An
//!   exact literal match beats an overlapping pattern regardless of
//!   registration order.
//! - Placeholders bind positionally, in left-to-right template order.
//!
//! The router is generic over its payload: it stores whatever
//! handler-reference type the server associates with each route and hands
//! it back on a match. The table is built once at startup and read-only
//! afterwards, so dispatch needs no synchronization.
//!
//! # Example
//!
//! ```rust
//! use pantrylink_router::{Route, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert(Route::new(None, "/api/state/getmode", "getMode"));
//! router.insert(Route::new(
//!     Some(Method::DELETE),
//!     "/api/system/unknownbarcodes/{id}",
//!     "deleteBarcode",
//! ));
//!
//! let matched = router
//!     .resolve(&Method::DELETE, "/api/system/unknownbarcodes/42")
//!     .unwrap();
//! assert_eq!(*matched.payload(), "deleteBarcode");
//! assert_eq!(matched.params().get("id"), Some("42"));
//!
//! // Method restriction: a GET on the same path is not a match.
//! assert!(router
//!     .resolve(&Method::GET, "/api/system/unknownbarcodes/42")
//!     .is_none());
//! ```

mod params;
mod route;
mod router;

pub use params::Params;
pub use route::Route;
pub use router::{RouteMatch, Router};
