//! Router - path → view table with an admin navigation guard
//!
//! | Path | View | Guarded |
//! |------|------|---------|
//! | `/` | Home | no |
//! | `/book/:id` | Book | no |
//! | `/admin` | Admin | yes |
//!
//! `navigate` resolves a location, runs the guard and follows redirects.

mod guard;

pub use guard::{AdminGuard, Navigation};

use crate::core::paths::routes;
use crate::core::pattern::{Params, PatternError, RoutePattern};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("no route matches {0}")]
    NotFound(String),
    #[error("too many redirects starting at {0}")]
    RedirectLoop(String),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    Book,
    Admin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouteMeta {
    pub requires_admin: bool,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: RoutePattern,
    pub view: View,
    pub meta: RouteMeta,
}

impl Route {
    pub fn new(path: &str, view: View) -> Result<Self, RouterError> {
        Ok(Self { pattern: RoutePattern::parse(path)?, view, meta: RouteMeta::default() })
    }

    pub fn requires_admin(mut self) -> Self {
        self.meta.requires_admin = true;
        self
    }
}

/// A location matched against the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub location: String,
    pub pattern: String,
    pub view: View,
    pub params: Params,
    pub meta: RouteMeta,
}

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub location: String,
    pub view: View,
    pub params: Params,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
}

pub struct Router {
    routes: Vec<Route>,
    guard: AdminGuard,
}

impl Router {
    pub fn new(routes: Vec<Route>, guard: AdminGuard) -> Self {
        Self { routes, guard }
    }

    /// The site's route table.
    pub fn app_routes() -> Result<Vec<Route>, RouterError> {
        Ok(vec![
            Route::new(routes::HOME, View::Home)?,
            Route::new(routes::BOOK, View::Book)?,
            Route::new(routes::ADMIN, View::Admin)?.requires_admin(),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First route matching `location`.
    pub fn resolve(&self, location: &str) -> Option<RouteMatch> {
        self.routes.iter().find_map(|route| {
            route.pattern.matches(location).map(|params| RouteMatch {
                location: location.to_string(),
                pattern: route.pattern.as_str().to_string(),
                view: route.view,
                params,
                meta: route.meta,
            })
        })
    }

    /// Resolve `location`, run the guard, and follow any redirect it issues.
    pub async fn navigate(&self, location: &str) -> Result<Resolved, RouterError> {
        let mut current = location.to_string();
        for _ in 0..=MAX_REDIRECTS {
            let target = self.resolve(&current)
                .ok_or_else(|| RouterError::NotFound(current.clone()))?;
            match self.guard.before_each(&target).await {
                Navigation::Allow => {
                    debug!(location = %current, view = ?target.view, "Navigation allowed");
                    let redirected_from = (current != location).then(|| location.to_string());
                    return Ok(Resolved {
                        location: current,
                        view: target.view,
                        params: target.params,
                        redirected_from,
                    });
                }
                Navigation::Redirect(to) => {
                    debug!(from = %current, to = %to, "Navigation redirected");
                    current = to;
                }
            }
        }
        Err(RouterError::RedirectLoop(location.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_routes_table() {
        let table = Router::app_routes().unwrap();
        let summary: Vec<(&str, View, bool)> = table.iter()
            .map(|r| (r.pattern.as_str(), r.view, r.meta.requires_admin))
            .collect();
        assert_eq!(summary, vec![
            ("/", View::Home, false),
            ("/book/:id", View::Book, false),
            ("/admin", View::Admin, true),
        ]);
    }

    #[test]
    fn test_route_new_rejects_bad_pattern() {
        assert!(matches!(Route::new("book", View::Book), Err(RouterError::Pattern(_))));
    }
}
