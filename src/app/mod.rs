//! Client routes and the guard in front of the protected ones.

use std::fmt;

use crate::error::TaskboardError;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Tasks,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Tasks => "/tasks",
        }
    }

    /// `/` aliases to the login view.
    pub fn from_path(path: &str) -> Result<Self, TaskboardError> {
        let trimmed = path.trim().trim_start_matches('#');
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match normalized {
            "/" | "/login" => Ok(Self::Login),
            "/signup" => Ok(Self::Signup),
            "/tasks" => Ok(Self::Tasks),
            _ => Err(TaskboardError::unknown_route(path)),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Tasks)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Resolves the view to render for `requested`.
///
/// Protected routes without a token redirect to login. Evaluated on every
/// navigation.
pub fn guard(requested: Route, session: &Session) -> Route {
    if requested.is_protected() && !session.is_authenticated() {
        tracing::debug!(route = %requested, "no session token; redirecting to login");
        Route::Login
    } else {
        requested
    }
}

/// Outcome of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub requested: Route,
    pub resolved: Route,
}

impl Navigation {
    pub fn redirected(&self) -> bool {
        self.requested != self.resolved
    }
}

/// Holds the session and the currently rendered route.
#[derive(Debug)]
pub struct App<A> {
    pub session: Session,
    pub api: A,
    current: Route,
}

impl<A> App<A> {
    pub fn new(session: Session, api: A) -> Self {
        Self {
            session,
            api,
            current: Route::Login,
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn navigate(&mut self, requested: Route) -> Navigation {
        let resolved = guard(requested, &self.session);
        self.current = resolved;
        Navigation { requested, resolved }
    }

    pub fn navigate_path(&mut self, path: &str) -> Result<Navigation, TaskboardError> {
        Ok(self.navigate(Route::from_path(path)?))
    }
}
