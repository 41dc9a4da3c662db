//! App Router
//!
//! Route table of the booking client and gated navigation over it.

use derive_more::Display;

use crate::application::context::SessionContext;
use crate::domain::repository::{IdentityBackend, ProfileSource};
use crate::presentation::guard::{Gate, GateDecision, RequireAdmin, RequireAuthenticated};

/// Which gate protects a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RouteAccess {
    #[display("public")]
    Public,
    #[display("authenticated")]
    Authenticated,
    #[display("admin")]
    Admin,
}

/// Route patterns; `:name` matches one non-empty segment
pub const ROUTES: [(&str, RouteAccess); 10] = [
    ("/", RouteAccess::Public),
    ("/events", RouteAccess::Public),
    ("/events/:id", RouteAccess::Public),
    ("/login", RouteAccess::Public),
    ("/register", RouteAccess::Public),
    ("/profile", RouteAccess::Authenticated),
    ("/bookings", RouteAccess::Authenticated),
    ("/admin/dashboard", RouteAccess::Admin),
    ("/admin/events/create", RouteAccess::Admin),
    ("/admin/events/edit/:id", RouteAccess::Admin),
];

/// Outcome of a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(String),
    Redirect(String),
}

fn segments(path: &str) -> Vec<&str> {
    path.split(['?', '#'])
        .next()
        .unwrap_or_default()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

fn matches_pattern(pattern: &str, path: &[&str]) -> bool {
    let pattern = segments(pattern);
    pattern.len() == path.len()
        && pattern
            .iter()
            .zip(path)
            .all(|(p, s)| p.starts_with(':') || p == s)
}

/// Access level of `path`, or `None` for an unknown route
pub fn route_access(path: &str) -> Option<RouteAccess> {
    let path = segments(path);
    ROUTES
        .iter()
        .find(|(pattern, _)| matches_pattern(pattern, &path))
        .map(|(_, access)| *access)
}

/// Navigation through the route table, mounting the gate each route needs
pub struct AppRouter<B, P>
where
    B: IdentityBackend,
    P: ProfileSource,
{
    context: SessionContext<B, P>,
}

impl<B, P> AppRouter<B, P>
where
    B: IdentityBackend + Send + Sync + 'static,
    P: ProfileSource + Send + Sync + 'static,
{
    pub fn new(context: SessionContext<B, P>) -> Self {
        Self { context }
    }

    /// Resolve `path` to a render or a redirect
    ///
    /// Unknown routes go home.
    pub async fn navigate(&self, path: &str) -> Navigation {
        let config = &self.context.config;
        let Some(access) = route_access(path) else {
            tracing::debug!(path, "Unknown route, redirecting home");
            return Navigation::Redirect(config.home_route.clone());
        };

        let decision = match access {
            RouteAccess::Public => GateDecision::Allow,
            RouteAccess::Authenticated => {
                let gate = RequireAuthenticated::mount(&self.context.identity, config);
                let decision = gate.confirmed().await;
                gate.unmount();
                decision
            }
            RouteAccess::Admin => {
                let gate = RequireAdmin::new();
                gate.evaluate(self.context.sessions.as_ref(), config).await;
                gate.settled().await
            }
        };

        tracing::debug!(path, access = %access, decision = ?decision, "Route resolved");
        match decision {
            GateDecision::Redirect(target) => Navigation::Redirect(target),
            GateDecision::Allow => Navigation::Render(path.to_string()),
            // Only reachable if a gate was torn down mid-check
            GateDecision::Pending => Navigation::Redirect(config.home_route.clone()),
        }
    }
}
