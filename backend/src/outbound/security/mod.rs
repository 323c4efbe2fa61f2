//! Password hashing adapter.
//!
//! Hashes are PHC strings produced by Argon2id with the crate's default
//! parameters and a random salt per password.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// [`PasswordHasher`] adapter backed by Argon2id.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(hash).map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("war-and-peace", true)]
    #[case("anna-karenina", false)]
    fn verify_accepts_only_the_hashed_password(#[case] attempt: &str, #[case] expected: bool) {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("war-and-peace").expect("hashed");
        assert_eq!(hasher.verify(attempt, &hash), Ok(expected));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = Argon2PasswordHasher;
        let first = hasher.hash("same").expect("hashed");
        let second = hasher.hash("same").expect("hashed");
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn malformed_hashes_are_errors() {
        let err = Argon2PasswordHasher
            .verify("pw", "not-a-phc-string")
            .expect_err("malformed");
        assert!(matches!(err, PasswordHashError::MalformedHash { .. }));
    }
}
