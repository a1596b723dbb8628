//! Navigation guarding for views that require an authenticated session

use std::sync::Arc;

use log::debug;

use crate::session::SessionStore;

/// The application's views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    Profile,
    Search,
    Plan,
}

impl Route {
    /// Whether this view requires an authenticated session
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Profile | Route::Search | Route::Plan)
    }

    /// The path this view is served under
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Profile => "/profile",
            Route::Search => "/generate",
            Route::Plan => "/plan",
        }
    }
}

/// The guard's verdict for a navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested view
    Render(Route),

    /// Navigate to `to` instead. When `replace` is set the redirect replaces
    /// the current history entry, so the user cannot navigate back into the
    /// guarded view.
    Redirect { to: Route, replace: bool },
}

/// Gate for protected views.
///
/// A pure decision over the current session state: no suspension, no
/// retries. Callers render only on [`RouteDecision::Render`], which keeps a
/// protected view's side effects (its own data fetches) from ever running
/// for an anonymous user.
pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    /// Create a guard consulting the given session store
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Decide whether `target` may be rendered
    pub fn check(&self, target: Route) -> RouteDecision {
        if target.is_protected() && !self.session.is_authenticated() {
            debug!("redirecting anonymous visit of {} to login", target.path());
            return RouteDecision::Redirect {
                to: Route::Login,
                replace: true,
            };
        }
        RouteDecision::Render(target)
    }
}
