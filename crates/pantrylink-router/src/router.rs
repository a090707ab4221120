//! The route table and dispatch logic.

use http::Method;

use crate::params::Params;
use crate::route::Route;

/// A matched route: the registered payload plus extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    payload: &'a T,
    params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Returns the payload registered with the matched route.
    #[must_use]
    pub const fn payload(&self) -> &'a T {
        self.payload
    }

    /// Returns the extracted path parameters, in template order.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Splits the match into payload and parameters.
    #[must_use]
    pub fn into_parts(self) -> (&'a T, Params) {
        (self.payload, self.params)
    }
}

/// Ordered collection of routes with first-match-wins resolution.
///
/// Literal templates are checked by exact string equality before any
/// pattern is consulted, so an exact match wins over an overlapping
/// pattern regardless of registration order. Pattern routes are then
/// scanned in registration order.
///
/// # Example
///
/// ```rust
/// use pantrylink_router::{Route, Router};
/// use http::Method;
///
/// let mut router = Router::new();
/// // Pattern registered FIRST...
/// router.insert(Route::new(None, "/api/system/{name}", "byName"));
/// // ...literal registered later still wins on its exact path.
/// router.insert(Route::new(None, "/api/system/info", "info"));
///
/// let matched = router.resolve(&Method::GET, "/api/system/info").unwrap();
/// assert_eq!(*matched.payload(), "info");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router<T> {
    routes: Vec<Route<T>>,
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Adds a route to the table.
    pub fn insert(&mut self, route: Route<T>) {
        self.routes.push(route);
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolves a (method, path) pair to a route.
    ///
    /// Returns `None` when nothing matches; the caller decides what a
    /// miss means (the API boundary turns it into the 404 envelope).
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        // Exact-literal fast path.
        for route in &self.routes {
            if route.matches_exact(path) && route.allows_method(method) {
                return Some(RouteMatch {
                    payload: route.payload(),
                    params: Params::new(),
                });
            }
        }

        // Pattern scan, registration order, first match wins.
        for route in &self.routes {
            if !route.allows_method(method) {
                continue;
            }
            if let Some(params) = route.match_path(path) {
                return Some(RouteMatch {
                    payload: route.payload(),
                    params,
                });
            }
        }

        None
    }
}
