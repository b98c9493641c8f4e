//! Session token service
//!
//! Tokens are HS256 JWTs carrying `SessionClaims`. Verification is pure: no
//! lookup, no revocation list. Logout is a client-side discard.

use chrono::{DateTime, Duration, Utc};
use config::ConfigError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::{
    config::AuthConfig,
    error::TokenError,
    models::user::{PublicUser, SessionClaims},
};

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_secret(&config.jwt_secret, config.token_ttl()?))
    }

    pub fn with_secret(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issue a token for `user` valid for the configured lifetime
    pub fn issue(&self, user: &PublicUser) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now(), self.ttl)
    }

    /// Issue a token with an explicit issue time and lifetime
    pub fn issue_at(
        &self,
        user: &PublicUser,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and shape, then expiry as of `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?
            .claims;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service(secret: &str) -> TokenService {
        TokenService::with_secret(secret, Duration::hours(24))
    }

    fn reader() -> PublicUser {
        PublicUser {
            id: 1,
            email: "swi@gmail.com".into(),
            name: "Test User".into(),
        }
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let tokens = service("dev-secret");
        let token = tokens.issue(&reader()).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.email, "swi@gmail.com");
        assert_eq!(claims.name, "Test User");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn accepted_until_the_last_minute() {
        let tokens = service("dev-secret");
        let t = issued_at();
        let token = tokens.issue_at(&reader(), t, Duration::hours(24)).unwrap();

        let later = t + Duration::hours(23) + Duration::minutes(59);
        let claims = tokens.verify_at(&token, later).unwrap();
        assert_eq!(claims.iat, t.timestamp());
        assert_eq!(claims.expires_at(), Some(t + Duration::hours(24)));
    }

    #[test]
    fn rejected_after_twenty_four_hours() {
        let tokens = service("dev-secret");
        let t = issued_at();
        let token = tokens.issue_at(&reader(), t, Duration::hours(24)).unwrap();

        let too_late = t + Duration::hours(24) + Duration::seconds(1);
        assert_eq!(tokens.verify_at(&token, too_late), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_secret_is_bad_signature() {
        let token = service("secret-a").issue(&reader()).unwrap();
        assert_eq!(service("secret-b").verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn tampered_payload_is_bad_signature() {
        let tokens = service("dev-secret");
        let token = tokens.issue(&reader()).unwrap();
        let forged = tokens
            .issue(&PublicUser { id: 2, ..reader() })
            .unwrap();

        // Keep the original signature, swap in another user's payload.
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let tampered = parts.join(".");

        assert_eq!(tokens.verify(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = service("dev-secret");
        assert_eq!(tokens.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(tokens.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn configured_lifetime_is_applied() {
        let config = AuthConfig {
            jwt_secret: "dev-secret".into(),
            jwt_expiration_hours: 2,
        };
        let tokens = TokenService::new(&config).unwrap();
        let claims = tokens.verify(&tokens.issue(&reader()).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 2 * 3600);

        let config = AuthConfig {
            jwt_expiration_hours: u64::MAX,
            ..config
        };
        assert!(TokenService::new(&config).is_err());
    }
}
