//! Property tests for the route matcher.

use http::Method;
use proptest::prelude::*;

use pantrylink_router::{Route, Router};

/// A path segment value: anything non-empty that contains no `/`.
fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._-]{1,12}"
}

proptest! {
    /// A `{id}` placeholder matches any single segment and binds it
    /// verbatim.
    #[test]
    fn placeholder_binds_any_segment(value in segment()) {
        let mut router = Router::new();
        router.insert(Route::new(None, "/api/system/unknownbarcodes/{id}", "delete"));

        let path = format!("/api/system/unknownbarcodes/{value}");
        let matched = router.resolve(&Method::DELETE, &path).unwrap();
        prop_assert_eq!(matched.params().get("id"), Some(value.as_str()));
    }

    /// Matching is anchored: appending a segment always breaks the match.
    #[test]
    fn extra_segment_never_matches(value in segment(), extra in segment()) {
        let mut router = Router::new();
        router.insert(Route::new(None, "/api/system/unknownbarcodes/{id}", "delete"));

        let path = format!("/api/system/unknownbarcodes/{value}/{extra}");
        prop_assert!(router.resolve(&Method::DELETE, &path).is_none());
    }

    /// A literal route never beats a different literal path, and an exact
    /// literal always beats an overlapping pattern, wherever it was
    /// registered.
    #[test]
    fn literal_priority_is_registration_order_independent(value in segment()) {
        prop_assume!(value != "info");

        let mut pattern_first = Router::new();
        pattern_first.insert(Route::new(None, "/api/system/{name}", "byName"));
        pattern_first.insert(Route::new(None, "/api/system/info", "info"));

        let mut literal_first = Router::new();
        literal_first.insert(Route::new(None, "/api/system/info", "info"));
        literal_first.insert(Route::new(None, "/api/system/{name}", "byName"));

        for router in [&pattern_first, &literal_first] {
            let matched = router.resolve(&Method::GET, "/api/system/info").unwrap();
            prop_assert_eq!(*matched.payload(), "info");

            let path = format!("/api/system/{value}");
            let matched = router.resolve(&Method::GET, &path).unwrap();
            prop_assert_eq!(*matched.payload(), "byName");
        }
    }

    /// Two placeholders bind left to right.
    #[test]
    fn placeholders_bind_in_template_order(a in segment(), b in segment()) {
        let mut router = Router::new();
        router.insert(Route::new(None, "/{first}/{second}", "pair"));

        let path = format!("/{a}/{b}");
        let matched = router.resolve(&Method::GET, &path).unwrap();
        let values: Vec<&str> = matched.params().values().collect();
        prop_assert_eq!(values, vec![a.as_str(), b.as_str()]);
    }
}
