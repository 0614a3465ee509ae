#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::session::Session;
use crate::session::claims::is_admin_role;
use crate::storage::Storage;
use crate::util::format::username_from_email;

/// Where a page sends the user when it cannot render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// No usable session; go to the login entry point.
    Login,
    /// Signed in but not allowed to see this view.
    Home,
}

/// Snapshot of the session as the header and gated pages see it.
///
/// `role` comes from unverified claims and only decides what to show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub signed_in: bool,
    pub role: Option<String>,
    pub email: Option<String>,
}

impl AuthState {
    pub fn read<S: Storage>(session: &Session<S>) -> Self {
        Self { signed_in: session.is_signed_in(), role: session.role_of(), email: session.user_email() }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.signed_in && is_admin_role(self.role.as_deref())
    }

    /// Greeting name: the local part of the cached email.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        if !self.signed_in {
            return None;
        }
        self.email.as_deref().map(username_from_email)
    }
}

/// Gate for pages that need a stored token.
///
/// # Errors
///
/// Returns [`Redirect::Login`] when no access token is stored.
pub fn require_session<S: Storage>(session: &Session<S>) -> Result<(), Redirect> {
    if session.access_token().is_some() { Ok(()) } else { Err(Redirect::Login) }
}

/// Gate for the admin views. Hides the view; the backend still enforces.
///
/// # Errors
///
/// Returns [`Redirect::Login`] without a token and [`Redirect::Home`] when
/// the role claim is not an admin role.
pub fn require_admin<S: Storage>(session: &Session<S>) -> Result<(), Redirect> {
    require_session(session)?;
    if is_admin_role(session.role_of().as_deref()) { Ok(()) } else { Err(Redirect::Home) }
}

/// Data-fetch page convention: any failure of an authenticated read means
/// the session is no good. Clear it and send the user to log in.
///
/// # Errors
///
/// Returns [`Redirect::Login`] when `result` is an error.
pub fn invalidate_on_failure<S, T, E>(session: &Session<S>, result: Result<T, E>) -> Result<T, Redirect>
where
    S: Storage,
    E: std::fmt::Display,
{
    result.map_err(|e| {
        tracing::warn!(error = %e, "authenticated read failed; clearing session");
        if let Err(clear_err) = session.clear() {
            tracing::warn!(error = %clear_err, "failed to clear session");
        }
        Redirect::Login
    })
}
