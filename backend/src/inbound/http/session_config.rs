//! Environment-driven session cookie settings.
//!
//! Debug builds fall back to permissive defaults with a warning; release
//! builds refuse to start on any missing or malformed toggle.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_DEFAULT: &str = "/run/secrets/yatube_session_key";
const KEY_MIN_LEN: usize = 64;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Whether configuration problems are fatal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// The mode matching the current compilation profile.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Resolved cookie session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read session settings through `env`.
///
/// # Errors
/// In [`BuildMode::Release`], any missing or invalid toggle, an unreadable
/// or short key file, `SameSite=None` without secure cookies, or a request
/// for ephemeral keys.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let resolver = Resolver { env, mode };
    let cookie_secure = resolver.flag(COOKIE_SECURE_ENV, true)?;
    let same_site = resolver.same_site(cookie_secure)?;
    let allow_ephemeral = resolver.flag(ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = resolver.key(allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

struct Resolver<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> Resolver<'_, E> {
    /// Debug builds log `error` and continue with `fallback`.
    fn lenient<T>(&self, fallback: T, error: SessionConfigError) -> Result<T, SessionConfigError> {
        match self.mode {
            BuildMode::Debug => {
                warn!(%error, "using default session setting");
                Ok(fallback)
            }
            BuildMode::Release => Err(error),
        }
    }

    fn flag(&self, name: &'static str, default: bool) -> Result<bool, SessionConfigError> {
        let Some(value) = self.env.string(name) else {
            return self.lenient(default, SessionConfigError::MissingEnv { name });
        };
        match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => self.lenient(
                default,
                SessionConfigError::InvalidEnv {
                    name,
                    value,
                    expected: BOOL_EXPECTED,
                },
            ),
        }
    }

    fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let default = match self.mode {
            BuildMode::Debug => SameSite::Lax,
            BuildMode::Release => SameSite::Strict,
        };
        let Some(value) = self.env.string(SAMESITE_ENV) else {
            return self.lenient(default, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
        };
        match value.to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" if cookie_secure => Ok(SameSite::None),
            "none" => self.lenient(SameSite::None, SessionConfigError::InsecureSameSiteNone),
            _ => self.lenient(
                default,
                SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value,
                    expected: SAMESITE_EXPECTED,
                },
            ),
        }
    }

    fn key(&self, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path = PathBuf::from(
            self.env
                .string(KEY_FILE_ENV)
                .unwrap_or_else(|| KEY_FILE_DEFAULT.to_owned()),
        );
        let mut bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) if allow_ephemeral || self.mode == BuildMode::Debug => {
                warn!(path = %path.display(), error = %source, "using ephemeral session key");
                return Ok(Key::generate());
            }
            Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
        };
        let length = bytes.len();
        if self.mode == BuildMode::Release && length < KEY_MIN_LEN {
            bytes.zeroize();
            return Err(SessionConfigError::KeyTooShort {
                path,
                length,
                min_len: KEY_MIN_LEN,
            });
        }
        let key = Key::derive_from(&bytes);
        bytes.zeroize();
        Ok(key)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write as _;

    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |name| vars.get(name).cloned());
        env
    }

    fn key_file(length: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp key file");
        file.write_all(&vec![b'k'; length]).expect("write key");
        file
    }

    #[rstest]
    fn release_accepts_complete_configuration() {
        let key = key_file(64);
        let path = key.path().to_str().expect("utf-8 path").to_owned();
        let env = env_with(&[
            (KEY_FILE_ENV, &path),
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Strict"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ]);

        let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid");

        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    fn debug_defaults_everything() {
        let env = env_with(&[(KEY_FILE_ENV, "/nonexistent/yatube/key")]);

        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("defaults");

        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn release_requires_cookie_secure() {
        let env = env_with(&[]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("missing toggle");
        assert!(matches!(
            err,
            SessionConfigError::MissingEnv {
                name: COOKIE_SECURE_ENV
            }
        ));
    }

    #[rstest]
    #[case("maybe")]
    #[case("")]
    fn release_rejects_malformed_flags(#[case] value: &str) {
        let env = env_with(&[(COOKIE_SECURE_ENV, value)]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("malformed toggle");
        assert!(matches!(err, SessionConfigError::InvalidEnv { .. }));
    }

    #[rstest]
    fn release_rejects_insecure_same_site_none() {
        let env = env_with(&[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("insecure none");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }

    #[rstest]
    fn release_refuses_ephemeral_keys() {
        let env = env_with(&[
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Lax"),
            (ALLOW_EPHEMERAL_ENV, "yes"),
        ]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("ephemeral refused");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let key = key_file(16);
        let path = key.path().to_str().expect("utf-8 path").to_owned();
        let env = env_with(&[
            (KEY_FILE_ENV, &path),
            (COOKIE_SECURE_ENV, "true"),
            (SAMESITE_ENV, "lax"),
            (ALLOW_EPHEMERAL_ENV, "n"),
        ]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("short key");
        assert!(matches!(
            err,
            SessionConfigError::KeyTooShort { length: 16, .. }
        ));
    }

    #[rstest]
    fn release_requires_a_readable_key() {
        let env = env_with(&[
            (KEY_FILE_ENV, "/nonexistent/yatube/key"),
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Strict"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("unreadable key");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }
}
