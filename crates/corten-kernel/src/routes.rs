//! Route aggregation
//!
//! Routes from plugins and the project route file collect into one ordered,
//! name-unique set. A handful of site routes must sit at the very end
//! because the catch-all consumes every remaining path; they are re-added
//! after aggregation to move them to the tail.

use corten_plugin::RouteDefinition;

/// Route names that are re-appended after aggregation so they stay last
pub const LATE_ROUTES: [&str; 4] = ["site.frontend", "site.index", "site.root", "site.catch_all"];

/// Ordered route set with unique names
///
/// Adding a name that already exists drops the old entry and appends the new
/// one, so re-adding an unchanged route moves it to the tail.
#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
    routes: Vec<RouteDefinition>,
}

impl RouteCollection {
    pub fn new() -> Self {
        RouteCollection::default()
    }

    pub fn add(&mut self, route: RouteDefinition) {
        self.routes.retain(|existing| existing.name != route.name);
        self.routes.push(route);
    }

    pub fn extend<I>(&mut self, routes: I)
    where
        I: IntoIterator<Item = RouteDefinition>,
    {
        for route in routes {
            self.add(route);
        }
    }

    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.routes.iter().find(|route| route.name.as_ref() == name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn into_routes(self) -> Vec<RouteDefinition> {
        self.routes
    }

    /// Moves the late site routes to the tail, keeping their relative order
    pub fn push_late_routes(&mut self) {
        for name in LATE_ROUTES {
            if let Some(route) = self.get(name).cloned() {
                self.add(route);
            }
        }
    }
}
