//! A single registered route.

use http::Method;

use crate::params::Params;

/// A segment of a compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    /// A literal segment (e.g. `"scan"`).
    Literal(String),
    /// A placeholder segment (e.g. `"{id}"`), matching anything but `/`.
    Param(String),
}

/// A registered route: optional method restriction, compiled template,
/// and the payload (handler reference) to return on a match.
#[derive(Debug, Clone)]
pub struct Route<T> {
    /// Method restriction; `None` matches any method.
    method: Option<Method>,
    /// Compiled template segments.
    segments: Vec<PathSegment>,
    /// Original template, used for the exact-literal fast path and for
    /// debug output.
    template: String,
    /// Whether the template contains no placeholders.
    is_literal: bool,
    /// Handler reference.
    payload: T,
}

impl<T> Route<T> {
    /// Creates a route, compiling the template into segments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pantrylink_router::Route;
    /// use http::Method;
    ///
    /// let route = Route::new(Some(Method::POST), "/api/action/scan", "scan");
    /// assert_eq!(route.template(), "/api/action/scan");
    /// ```
    #[must_use]
    pub fn new(method: Option<Method>, template: impl Into<String>, payload: T) -> Self {
        let template = template.into();
        let segments = parse_segments(&template);
        let is_literal = segments
            .iter()
            .all(|s| matches!(s, PathSegment::Literal(_)));
        Self {
            method,
            segments,
            template,
            is_literal,
            payload,
        }
    }

    /// Returns the original template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the method restriction, if any.
    #[must_use]
    pub const fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Returns the route payload.
    #[must_use]
    pub const fn payload(&self) -> &T {
        &self.payload
    }

    /// Returns true if the template has no placeholders.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        self.is_literal
    }

    /// Returns true if the route's method restriction (if any) allows the
    /// given transport method. Comparison is exact.
    #[must_use]
    pub fn allows_method(&self, method: &Method) -> bool {
        self.method.as_ref().map_or(true, |m| m == method)
    }

    /// Returns true if this literal route's template equals the path
    /// exactly.
    #[must_use]
    pub fn matches_exact(&self, path: &str) -> bool {
        self.is_literal && self.template == path
    }

    /// Attempts to match the compiled pattern against a path, anchored to
    /// the whole path. Returns the bound parameters in template order.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (pattern, actual) in self.segments.iter().zip(path_segments.iter()) {
            match pattern {
                PathSegment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                PathSegment::Param(name) => {
                    params.push(name.clone(), (*actual).to_string());
                }
            }
        }

        Some(params)
    }
}

/// Parses a path template into segments.
fn parse_segments(template: &str) -> Vec<PathSegment> {
    template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('{') && s.ends_with('}') && s.len() > 2 {
                PathSegment::Param(s[1..s.len() - 1].to_string())
            } else {
                PathSegment::Literal(s.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_route_detection() {
        let route = Route::new(None, "/api/system/info", "info");
        assert!(route.is_literal());

        let route = Route::new(None, "/api/system/unknownbarcodes/{id}", "delete");
        assert!(!route.is_literal());
    }

    #[test]
    fn exact_match_requires_identical_string() {
        let route = Route::new(None, "/api/system/info", "info");
        assert!(route.matches_exact("/api/system/info"));
        assert!(!route.matches_exact("/api/system/info/"));
        assert!(!route.matches_exact("/api/system"));
    }

    #[test]
    fn pattern_binds_params_in_template_order() {
        let route = Route::new(None, "/api/system/unknownbarcodes/{id}/associate", "assoc");
        let params = route
            .match_path("/api/system/unknownbarcodes/42/associate")
            .unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.values().collect::<Vec<_>>(), vec!["42"]);
    }

    #[test]
    fn pattern_is_anchored() {
        let route = Route::new(None, "/api/system/unknownbarcodes/{id}", "delete");
        assert!(route.match_path("/api/system/unknownbarcodes/42/extra").is_none());
        assert!(route.match_path("/api/system/unknownbarcodes").is_none());
    }

    #[test]
    fn placeholder_does_not_cross_slashes() {
        let route = Route::new(None, "/api/{section}", "section");
        assert!(route.match_path("/api/system/info").is_none());
        assert_eq!(
            route.match_path("/api/system").unwrap().get("section"),
            Some("system")
        );
    }

    #[test]
    fn method_restriction() {
        let route = Route::new(Some(Method::DELETE), "/api/x/{id}", "x");
        assert!(route.allows_method(&Method::DELETE));
        assert!(!route.allows_method(&Method::GET));

        let any = Route::new(None, "/api/x/{id}", "x");
        assert!(any.allows_method(&Method::GET));
        assert!(any.allows_method(&Method::POST));
    }

    #[test]
    fn malformed_braces_stay_literal() {
        // "{}" and "{x" are not placeholders; they only match themselves.
        let route = Route::new(None, "/api/{}", "odd");
        assert!(route.is_literal());
        assert!(route.match_path("/api/{}").is_some());
        assert!(route.match_path("/api/42").is_none());
    }
}
