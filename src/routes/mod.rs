//! View routing. A path resolves to a [`Route`]; [`navigate`] then applies the
//! guards against the current [`AuthState`] before the view is entered, so a view
//! that should not be shown is never built.

mod form;
mod login;
mod not_found;
mod register;

pub use form::{Field, FormErrors};
pub use login::{LoginForm, LoginSubmission};
pub use not_found::NotFoundPage;
pub use register::{RegisterForm, RegisterSubmission};

use crate::features::auth::AuthState;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Main,
    Login,
    Register,
    NotFound,
}

impl Route {
    /// Resolves a path, ignoring query strings, fragments and trailing slashes.
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim()
            .trim_end_matches('/');

        match path {
            "" | "/main" => Route::Main,
            "/login" => Route::Login,
            "/register" => Route::Register,
            _ => Route::NotFound,
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Route::Main => "/main",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::NotFound => "/404",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Enter the view for this route.
    Render(Route),
    /// Replace the current location with this route.
    Redirect(Route),
}

/// Resolves `path` and applies the auth guards:
/// login and register are for anonymous users only, main requires a session.
#[must_use]
pub fn navigate(path: &str, auth: &AuthState) -> Navigation {
    match Route::resolve(path) {
        Route::Login | Route::Register if auth.is_authenticated() => {
            Navigation::Redirect(Route::Main)
        }
        Route::Main if !auth.is_authenticated() => Navigation::Redirect(Route::Login),
        route => Navigation::Render(route),
    }
}
