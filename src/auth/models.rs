use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The state of a client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated { username: String },
}

impl Session {
    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { username } => Some(username),
        }
    }
}

/// What the session cookie carries. The cookie is signed, so these values
/// can be trusted once the signature has been checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    pub fn new(username: impl Into<String>, ttl: chrono::Duration) -> Self {
        Self {
            username: username.into(),
            expires_at: Utc::now() + ttl,
        }
    }

    /// Cookie-safe encoding: base64url over JSON.
    pub fn encode(&self) -> String {
        // Serializing a String and a DateTime cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Resolve to a [`Session`], treating expired claims as anonymous.
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        if self.expires_at <= now {
            Session::Anonymous
        } else {
            Session::Authenticated {
                username: self.username,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_encode_decode() {
        let claims = SessionClaims::new("Betteh music", chrono::Duration::hours(1));
        let encoded = claims.encode();
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        let decoded = SessionClaims::decode(&encoded).unwrap();
        assert_eq!(decoded.username, "Betteh music");
    }

    #[test]
    fn test_decode_garbage() {
        assert!(SessionClaims::decode("!!!").is_none());
        assert!(SessionClaims::decode(&URL_SAFE_NO_PAD.encode("{}")).is_none());
    }

    #[test]
    fn test_live_claims_are_authenticated() {
        let session = SessionClaims::new("betteh", chrono::Duration::minutes(5))
            .into_session(Utc::now());
        assert_eq!(session.username(), Some("betteh"));
    }

    #[test]
    fn test_expired_claims_are_anonymous() {
        let claims = SessionClaims::new("betteh", chrono::Duration::minutes(5));
        let later = Utc::now() + chrono::Duration::minutes(10);
        assert_eq!(claims.into_session(later), Session::Anonymous);
    }
}
