//! Sign-up and login.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AccountService, NewAccount, PasswordHasher, SignupOutcome, UserRepository,
    UserRepositoryError,
};
use crate::domain::storage_errors::{map_hash_error, map_user_error};
use crate::domain::{Error, LoginCredentials, SignupErrors, SignupForm, User, UserId, Username};

const INVALID_CREDENTIALS: &str = "invalid username or password";

/// Service implementing [`AccountService`] on top of a user repository.
#[derive(Clone)]
pub struct AccountServiceImpl {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl AccountServiceImpl {
    /// Create an account service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn sign_up(&self, form: SignupForm) -> Result<SignupOutcome, Error> {
        let valid = match form.validate() {
            Ok(valid) => valid,
            Err(errors) => return Ok(SignupOutcome::Rejected(errors)),
        };
        let password_hash = self
            .hasher
            .hash(valid.password.as_str())
            .map_err(map_hash_error)?;
        let user = User::new(UserId::random(), valid.username)
            .with_names(valid.first_name, valid.last_name);
        let account = NewAccount {
            user,
            password_hash,
            created_at: self.clock.utc(),
        };
        match self.users.create(account).await {
            Ok(user) => {
                info!(user = %user.id(), username = %user.username(), "account created");
                Ok(SignupOutcome::Registered(user))
            }
            Err(UserRepositoryError::UsernameTaken { .. }) => {
                Ok(SignupOutcome::Rejected(SignupErrors {
                    username: Some("a user with that username already exists".to_owned()),
                    ..SignupErrors::default()
                }))
            }
            Err(err) => Err(map_user_error(err)),
        }
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let stored = self
            .users
            .find_credentials(&username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(stored.user)
    }
}
