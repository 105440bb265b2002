//! Session tokens carried in the `session` cookie.
//!
//! A token is the JSON document `{"hospitalId", "expires"}` base64url-encoded
//! and signed with HMAC-SHA256, in the compact JWS form. Decoding never
//! fails loudly: anything malformed, forged or expired is simply "no session".

use actix_web::cookie::{
    time::{Duration as CookieDuration, OffsetDateTime},
    Cookie,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{AppError, AppResult};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub hospital_id: Uuid,
    pub expires: DateTime<Utc>,
}

pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionCodec {
    pub fn new(config: &SessionConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry lives in our own `expires` field and is checked against the
        // caller's clock in `decode`.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: Duration::days(config.ttl_days),
        }
    }

    /// Starts a session for `hospital_id` lasting the configured TTL.
    pub fn issue(&self, hospital_id: Uuid, now: DateTime<Utc>) -> AppResult<(String, Session)> {
        let session = Session {
            hospital_id,
            expires: now + self.ttl,
        };
        let token = self.encode(&session)?;
        Ok((token, session))
    }

    pub fn encode(&self, session: &Session) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), session, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to encode session: {}", e)))
    }

    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let session = match decode::<Session>(token, &self.decoding, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(error = %e, "rejected session token");
                return None;
            }
        };

        if session.expires < now {
            debug!(hospital_id = %session.hospital_id, "session expired");
            return None;
        }
        Some(session)
    }

    /// The httpOnly cookie carrying `token`, expiring with the session.
    pub fn cookie(token: String, session: &Session) -> Cookie<'static> {
        let remaining = (session.expires - Utc::now()).num_seconds().max(0);
        let mut builder = Cookie::build(SESSION_COOKIE, token)
            .http_only(true)
            .path("/")
            .max_age(CookieDuration::seconds(remaining));
        if let Ok(expires) = OffsetDateTime::from_unix_timestamp(session.expires.timestamp()) {
            builder = builder.expires(expires);
        }
        builder.finish()
    }

    /// A cookie that tells the browser to drop the session.
    pub fn removal_cookie() -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> SessionCodec {
        SessionCodec::new(&SessionConfig {
            secret: secret.into(),
            ttl_days: 7,
        })
    }

    #[test]
    fn issued_token_decodes_before_expiry() {
        let codec = codec("s3cret");
        let now = Utc::now();
        let hospital_id = Uuid::new_v4();
        let (token, session) = codec.issue(hospital_id, now).unwrap();

        assert_eq!(session.expires, now + Duration::days(7));
        let decoded = codec.decode(&token, now + Duration::days(6)).unwrap();
        assert_eq!(decoded, session);
    }

    #[test]
    fn expired_token_is_no_session() {
        let codec = codec("s3cret");
        let now = Utc::now();
        let (token, _) = codec.issue(Uuid::new_v4(), now).unwrap();
        assert!(codec.decode(&token, now + Duration::days(8)).is_none());
    }

    #[test]
    fn malformed_tokens_are_no_session() {
        let codec = codec("s3cret");
        let now = Utc::now();
        for token in ["", "not-a-token", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30.!!!"] {
            assert!(codec.decode(token, now).is_none(), "accepted {:?}", token);
        }
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let now = Utc::now();
        let (forged, _) = codec("attacker").issue(Uuid::new_v4(), now).unwrap();
        assert!(codec("s3cret").decode(&forged, now).is_none());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec("s3cret");
        let now = Utc::now();
        let (token, _) = codec.issue(Uuid::new_v4(), now).unwrap();
        let (other, _) = codec.issue(Uuid::new_v4(), now).unwrap();

        // Splice the other session's payload under the first signature.
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        assert!(codec.decode(&parts.join("."), now).is_none());
    }

    #[test]
    fn cookie_is_http_only_and_site_wide() {
        let codec = codec("s3cret");
        let (token, session) = codec.issue(Uuid::new_v4(), Utc::now()).unwrap();
        let cookie = SessionCodec::cookie(token.clone(), &session);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), token);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
