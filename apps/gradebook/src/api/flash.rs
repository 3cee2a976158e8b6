//! One-shot messages carried from `POST /upload` to the next `GET /`.
//!
//! The message lives in a signed `flash` cookie. The index page reads it,
//! renders it once and removes the cookie in the same response. A cookie whose
//! signature does not verify is dropped without being shown.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the cookie holding the pending message.
pub const FLASH_COOKIE: &str = "flash";

/// Minimum length of a configured session secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 64;

/// Reasons a signing key cannot be built.
#[derive(Debug, Error)]
pub enum SessionKeyError {
    #[error("session secret must be at least {MIN_SECRET_BYTES} bytes (got {0})")]
    TooShort(usize),

    #[error("no system randomness available to generate a session key")]
    NoRandomness,
}

/// Key used to sign flash cookies.
///
/// A configured secret keeps messages valid across restarts and between
/// instances; without one a random per-process key is generated.
pub fn session_key(secret: Option<&str>) -> Result<Key, SessionKeyError> {
    match secret {
        Some(secret) => Key::try_from(secret.as_bytes())
            .map_err(|_| SessionKeyError::TooShort(secret.len())),
        None => Key::try_generate().ok_or(SessionKeyError::NoRandomness),
    }
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(rename = "flash")]
    pub message: String,
    pub level: FlashLevel,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FlashLevel::Success,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FlashLevel::Error,
        }
    }

    /// Cookie value: `flash=<text>&level=<level>`.
    fn encode(&self) -> Option<String> {
        match serde_urlencoded::to_string(self) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(error = %err, "could not encode flash message");
                None
            }
        }
    }

    fn decode(value: &str) -> Option<Self> {
        serde_urlencoded::from_str::<Flash>(value)
            .ok()
            .filter(|flash| !flash.message.is_empty())
    }

    /// Queue this message for the next page view.
    #[must_use]
    pub fn store(self, jar: SignedCookieJar) -> SignedCookieJar {
        match self.encode() {
            Some(value) => jar.add(
                Cookie::build((FLASH_COOKIE, value))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax),
            ),
            None => jar,
        }
    }

    /// Read the pending message, if any, and remove it from the jar.
    #[must_use]
    pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Self>) {
        let flash = jar
            .get(FLASH_COOKIE)
            .and_then(|cookie| Self::decode(cookie.value()));
        let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
        (jar, flash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar() -> SignedCookieJar {
        SignedCookieJar::new(Key::generate())
    }

    #[test]
    fn encodes_message_and_level() {
        let flash = Flash::error("Some files were not uploaded");
        assert_eq!(
            flash.encode().as_deref(),
            Some("flash=Some+files+were+not+uploaded&level=error")
        );
    }

    #[test]
    fn stored_message_is_read_back() {
        let flash = Flash::success("averages: 12.0, 13.5 & more");
        let jar = flash.clone().store(jar());
        let (_, taken) = Flash::take(jar);
        assert_eq!(taken, Some(flash));
    }

    #[test]
    fn take_on_empty_jar_has_no_flash() {
        let (jar, taken) = Flash::take(jar());
        assert_eq!(taken, None);
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn unknown_level_or_empty_message_is_ignored() {
        assert_eq!(Flash::decode("flash=x&level=bogus"), None);
        assert_eq!(Flash::decode("flash=&level=success"), None);
        assert_eq!(
            Flash::decode("flash=ok&level=success"),
            Some(Flash::success("ok"))
        );
    }

    #[test]
    fn configured_secret_must_be_long_enough() {
        assert!(matches!(
            session_key(Some("short")),
            Err(SessionKeyError::TooShort(5))
        ));
        let secret = "s".repeat(MIN_SECRET_BYTES);
        assert!(session_key(Some(&secret)).is_ok());
        assert!(session_key(None).is_ok());
    }

    #[test]
    fn unsigned_cookie_is_not_shown() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("flash=flash%3Dforged%26level%3Dsuccess"),
        );
        let jar = SignedCookieJar::from_headers(&headers, Key::generate());
        let (_, taken) = Flash::take(jar);
        assert_eq!(taken, None);
    }
}
