//! Driving port for sign-up and login.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SignupErrors, SignupForm, User};

/// Result of submitting the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Registered(User),
    Rejected(SignupErrors),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account.
    async fn sign_up(&self, form: SignupForm) -> Result<SignupOutcome, Error>;

    /// Check credentials and return the matching user.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::Unauthorized`] for an unknown username or
    /// a wrong password; the two cases are indistinguishable to callers.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
