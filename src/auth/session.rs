use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};

use crate::app::AppState;
use crate::auth::models::{Session, SessionClaims};
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "betteh_session";

/// Derive the cookie signing key from the configured secret.
///
/// `Key` needs 64 bytes of material; SHA-512 turns a secret of any length
/// into exactly that.
pub fn signing_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) if !secret.is_empty() => {
            let digest = Sha512::digest(secret.as_bytes());
            Key::from(digest.as_slice())
        }
        _ => {
            tracing::warn!("No session secret configured; sessions will not survive a restart");
            Key::generate()
        }
    }
}

/// Read the current session from a signed cookie jar.
pub fn current_session(jar: &SignedCookieJar) -> Session {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| SessionClaims::decode(cookie.value()))
        .map(|claims| claims.into_session(chrono::Utc::now()))
        .unwrap_or(Session::Anonymous)
}

/// Store `Authenticated(username)` in the jar.
pub fn start_session(jar: SignedCookieJar, username: &str, ttl: chrono::Duration) -> SignedCookieJar {
    let claims = SessionClaims::new(username, ttl);
    let cookie = Cookie::build((SESSION_COOKIE, claims.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build();
    jar.add(cookie)
}

/// Drop the session cookie, returning to `Anonymous`.
pub fn end_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
}

/// Extractor that only succeeds for an authenticated admin that still exists.
///
/// The store is consulted on every request, so a session naming an admin
/// that has since disappeared is rejected.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        require_authenticated(state, &current_session(&jar)).await
    }
}

/// Gate used by every admin-only operation.
pub async fn require_authenticated(state: &AppState, session: &Session) -> Result<AdminSession, AppError> {
    let Session::Authenticated { username } = session else {
        return Err(AppError::Unauthorized);
    };

    let data = state.store.load().await?;
    if data.find_admin_by_username(username).is_none() {
        tracing::warn!("Session for unknown admin '{}' rejected", username);
        return Err(AppError::Unauthorized);
    }

    Ok(AdminSession {
        username: username.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::HeaderMap;
    use axum::response::IntoResponse;

    fn jar_from_response(key: &Key, resp: axum::response::Response) -> SignedCookieJar {
        let mut headers = HeaderMap::new();
        for value in resp.headers().get_all(SET_COOKIE) {
            let pair = value.to_str().unwrap().split(';').next().unwrap().to_string();
            headers.append(COOKIE, pair.parse().unwrap());
        }
        SignedCookieJar::from_headers(&headers, key.clone())
    }

    #[test]
    fn test_same_secret_same_key() {
        let a = signing_key(Some("betteh-secret"));
        let b = signing_key(Some("betteh-secret"));
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), signing_key(Some("other")).master());
    }

    #[test]
    fn test_empty_jar_is_anonymous() {
        let jar = SignedCookieJar::new(signing_key(Some("k")));
        assert_eq!(current_session(&jar), Session::Anonymous);
    }

    #[test]
    fn test_session_roundtrip_through_headers() {
        let key = signing_key(Some("k"));
        let jar = start_session(
            SignedCookieJar::new(key.clone()),
            "betteh",
            chrono::Duration::hours(1),
        );
        let jar = jar_from_response(&key, jar.into_response());
        assert_eq!(
            current_session(&jar),
            Session::Authenticated {
                username: "betteh".into()
            }
        );
    }

    #[test]
    fn test_cookie_signed_with_other_key_is_anonymous() {
        let jar = start_session(
            SignedCookieJar::new(signing_key(Some("attacker"))),
            "betteh",
            chrono::Duration::hours(1),
        );
        let jar = jar_from_response(&signing_key(Some("server")), jar.into_response());
        assert_eq!(current_session(&jar), Session::Anonymous);
    }
}
