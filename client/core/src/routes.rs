//! Navigable paths and the authentication guard

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Segments,
    Campaigns,
    Analytics,
    Login,
    Register,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Root,
        Route::Segments,
        Route::Campaigns,
        Route::Analytics,
        Route::Login,
        Route::Register,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Segments => "/segments",
            Route::Campaigns => "/campaigns",
            Route::Analytics => "/analytics",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Everything except the auth pages needs a session
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

impl FromStr for Route {
    type Err = ClientError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let path = raw.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == normalized)
            .ok_or_else(|| ClientError::UnknownRoute(raw.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Result of resolving a route against the session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up on screen
    pub fn target(&self) -> Route {
        match self {
            Navigation::Render(r) | Navigation::Redirect(r) => *r,
        }
    }
}

/// Protected routes without a session go to the login page. The root path
/// has no page of its own and forwards to campaigns.
pub fn guard(route: Route, authenticated: bool) -> Navigation {
    if route.requires_auth() && !authenticated {
        return Navigation::Redirect(Route::Login);
    }
    match route {
        Route::Root => Navigation::Redirect(Route::Campaigns),
        other => Navigation::Render(other),
    }
}

/// Follows redirects until a route renders
pub fn resolve(mut route: Route, authenticated: bool) -> Route {
    loop {
        match guard(route, authenticated) {
            Navigation::Render(target) => return target,
            Navigation::Redirect(target) => route = target,
        }
    }
}
