//! Authentication inputs: login credentials and sign-up forms.
//!
//! Handlers hand raw strings to these constructors before talking to the
//! account service, so the service only ever sees validated values.

use zeroize::Zeroizing;

use super::{UserValidationError, Username};

/// Minimum password length accepted at sign-up.
pub const PASSWORD_MIN: usize = 8;
/// Maximum length of first and last names.
pub const PERSON_NAME_MAX: usize = 150;

/// Errors returned when login form values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; whitespace is preserved.
///
/// # Examples
/// ```
/// use yatube::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" leo ", "secret").unwrap();
/// assert_eq!(creds.username(), "leo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raw sign-up form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub password_confirmation: Zeroizing<String>,
}

/// Per-field sign-up validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupErrors {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl SignupErrors {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.password_confirmation.is_none()
    }
}

/// A sign-up form whose fields are individually valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub first_name: String,
    pub last_name: String,
    pub username: Username,
    pub password: Zeroizing<String>,
}

fn check_person_name(value: &str) -> Option<String> {
    (value.chars().count() > PERSON_NAME_MAX)
        .then(|| format!("must be at most {PERSON_NAME_MAX} characters"))
}

impl SignupForm {
    /// Validate every field, collecting all messages at once.
    pub fn validate(&self) -> Result<ValidSignup, SignupErrors> {
        let mut errors = SignupErrors {
            first_name: check_person_name(&self.first_name),
            last_name: check_person_name(&self.last_name),
            ..SignupErrors::default()
        };

        let username = Username::new(self.username.trim())
            .map_err(|err: UserValidationError| errors.username = Some(err.to_string()))
            .ok();

        if self.password.chars().count() < PASSWORD_MIN {
            errors.password = Some(format!(
                "password must be at least {PASSWORD_MIN} characters"
            ));
        }
        if self.password.as_str() != self.password_confirmation.as_str() {
            errors.password_confirmation = Some("passwords do not match".to_owned());
        }

        match username {
            Some(username) if errors.is_empty() => Ok(ValidSignup {
                first_name: self.first_name.trim().to_owned(),
                last_name: self.last_name.trim().to_owned(),
                username,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn form() -> SignupForm {
        SignupForm {
            first_name: "Leo".to_owned(),
            last_name: "Tolstoy".to_owned(),
            username: "leo".to_owned(),
            password: Zeroizing::new("war-and-peace".to_owned()),
            password_confirmation: Zeroizing::new("war-and-peace".to_owned()),
        }
    }

    #[rstest]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("leo", "", LoginValidationError::EmptyPassword)]
    fn login_rejects_blank_fields(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        assert_eq!(
            LoginCredentials::try_from_parts(username, password),
            Err(expected)
        );
    }

    #[rstest]
    fn valid_signup_passes(form: SignupForm) {
        let valid = form.validate().expect("valid form");
        assert_eq!(valid.username.as_str(), "leo");
        assert_eq!(valid.first_name, "Leo");
    }

    #[rstest]
    fn short_password_is_rejected(mut form: SignupForm) {
        form.password = Zeroizing::new("short".to_owned());
        form.password_confirmation = Zeroizing::new("short".to_owned());
        let errors = form.validate().expect_err("rejected");
        assert!(errors.password.is_some());
        assert!(errors.password_confirmation.is_none());
    }

    #[rstest]
    fn mismatched_confirmation_is_rejected(mut form: SignupForm) {
        form.password_confirmation = Zeroizing::new("something-else".to_owned());
        let errors = form.validate().expect_err("rejected");
        assert!(errors.password_confirmation.is_some());
    }

    #[rstest]
    fn invalid_username_is_rejected(mut form: SignupForm) {
        form.username = "no spaces".to_owned();
        let errors = form.validate().expect_err("rejected");
        assert!(errors.username.is_some());
    }
}
