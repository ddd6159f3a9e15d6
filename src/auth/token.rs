use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::clock::{Clock, SystemClock};
use crate::auth::user::UserId;
use crate::config::AuthConfig;
use crate::error::{AuthError, Result, SpectrumError};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
}

impl Claims {
    /// Creates claims for a user, valid for `lifetime` from `issued_at`
    pub fn new(user_id: UserId, issued_at: DateTime<Utc>, lifetime: TimeDelta) -> Result<Self> {
        let expires_at = issued_at.checked_add_signed(lifetime).ok_or_else(|| {
            SpectrumError::SystemError(format!(
                "Token expiry overflows: {} + {}",
                issued_at, lifetime
            ))
        })?;

        Ok(Self {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        })
    }

    /// Numeric subject, if the claim holds one
    pub fn subject_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    /// A token is live only while its expiry is strictly in the future
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// Signs and verifies session tokens.
///
/// Key, algorithm and lifetime come from `AuthConfig` and never change after
/// construction, so one manager is shared by every request.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    lifetime: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    /// Creates a token manager backed by the wall clock
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a token manager with an explicit time source
    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(config.algorithm());
        // Expiry is checked against `clock`, not the library's own wall-clock read
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.signing_key()),
            decoding_key: DecodingKey::from_secret(config.signing_key()),
            header: Header::new(config.algorithm()),
            validation,
            lifetime: config.token_lifetime(),
            clock,
        }
    }

    /// Mints a signed token whose subject is `principal_id`
    pub fn issue(&self, principal_id: UserId) -> Result<String> {
        let claims = Claims::new(principal_id, self.clock.now(), self.lifetime)?;
        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| SpectrumError::SystemError(format!("Failed to sign token: {}", e)))
    }

    /// Verifies signature, then expiry, and returns the claims.
    ///
    /// Every failure collapses into `AuthError::InvalidToken`; the cause is
    /// only visible in debug logs.
    pub fn decode(&self, token: &str) -> std::result::Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Token rejected: {:?}", e.kind());
                AuthError::InvalidToken
            })?
            .claims;

        if claims.is_expired_at(self.clock.now()) {
            debug!("Token rejected: expired at {}", claims.exp);
            return Err(AuthError::InvalidToken);
        }

        if claims.subject_id().is_none() {
            debug!("Token rejected: non-numeric subject");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::ManualClock;
    use jsonwebtoken::Algorithm;

    const KEY: &str = "token-unit-test-signing-key-0123456789";

    fn config() -> AuthConfig {
        AuthConfig::new(KEY, Algorithm::HS256, TimeDelta::minutes(30)).unwrap()
    }

    fn manager_at(clock: Arc<ManualClock>) -> TokenManager {
        TokenManager::with_clock(&config(), clock)
    }

    #[test]
    fn test_issue_and_decode() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let manager = manager_at(clock.clone());

        let token = manager.issue(42).unwrap();
        let claims = manager.decode(&token).unwrap();
        assert_eq!(claims.subject_id(), Some(42));
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_issue_is_deterministic_for_same_instant() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let manager = manager_at(clock);
        assert_eq!(manager.issue(7).unwrap(), manager.issue(7).unwrap());
    }

    #[test]
    fn test_expiry_boundary() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let manager = manager_at(clock.clone());
        let token = manager.issue(1).unwrap();

        clock.advance(TimeDelta::minutes(30) - TimeDelta::seconds(1));
        assert!(manager.decode(&token).is_ok());

        clock.advance(TimeDelta::seconds(1));
        assert_eq!(manager.decode(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let hs512 = AuthConfig::new(KEY, Algorithm::HS512, TimeDelta::minutes(30)).unwrap();
        let other = TokenManager::with_clock(&hs512, clock.clone());
        let manager = manager_at(clock);

        let token = other.issue(1).unwrap();
        assert_eq!(manager.decode(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_missing_subject_rejected() {
        #[derive(Serialize)]
        struct NoSubject {
            exp: i64,
        }

        let manager = TokenManager::new(&config());
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoSubject {
                exp: (Utc::now() + TimeDelta::minutes(5)).timestamp(),
            },
            &EncodingKey::from_secret(KEY.as_bytes()),
        )
        .unwrap();

        assert_eq!(manager.decode(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let manager = TokenManager::new(&config());
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (Utc::now() + TimeDelta::minutes(5)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(KEY.as_bytes()),
        )
        .unwrap();

        assert_eq!(manager.decode(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let lifetime = TimeDelta::days(1);
        assert!(matches!(
            Claims::new(1, DateTime::<Utc>::MAX_UTC, lifetime),
            Err(SpectrumError::SystemError(_))
        ));

        let clock = Arc::new(ManualClock::new(DateTime::<Utc>::MAX_UTC - TimeDelta::minutes(1)));
        let manager = manager_at(clock);
        assert!(matches!(manager.issue(1), Err(SpectrumError::SystemError(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let manager = TokenManager::new(&config());
        assert_eq!(manager.decode(""), Err(AuthError::InvalidToken));
        assert_eq!(manager.decode("invalid.token.here"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
    }
}
