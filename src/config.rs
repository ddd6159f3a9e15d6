//! Server configuration module
//! Loads process-wide settings once at startup. Nothing here is mutated afterwards.

use crate::constants::{
    DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES, DEFAULT_ALGORITHM, DEFAULT_HOST,
    DEFAULT_LOGIN_FAILURE_FLOOR_MS, DEFAULT_PORT, MAX_TOKEN_LIFETIME_DAYS, MIN_SIGNING_KEY_LEN,
};
use crate::error::{Result, SpectrumError};
use chrono::TimeDelta;
use jsonwebtoken::Algorithm;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Token signing and login settings
#[derive(Clone)]
pub struct AuthConfig {
    signing_key: String,
    algorithm: Algorithm,
    token_lifetime: TimeDelta,
    login_failure_floor: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("token_lifetime", &self.token_lifetime)
            .field("login_failure_floor", &self.login_failure_floor)
            .finish()
    }
}

impl AuthConfig {
    /// Build a validated auth configuration
    pub fn new(
        signing_key: impl Into<String>,
        algorithm: Algorithm,
        token_lifetime: TimeDelta,
    ) -> Result<Self> {
        let signing_key = signing_key.into();
        Self::validate_signing_key(&signing_key)?;
        Self::validate_algorithm(algorithm)?;

        if token_lifetime <= TimeDelta::zero() {
            return Err(SpectrumError::ConfigError(
                "Token lifetime must be positive".to_string(),
            ));
        }

        if token_lifetime > TimeDelta::days(MAX_TOKEN_LIFETIME_DAYS) {
            return Err(SpectrumError::ConfigError(format!(
                "Token lifetime must not exceed {} days",
                MAX_TOKEN_LIFETIME_DAYS
            )));
        }

        Ok(Self {
            signing_key,
            algorithm,
            token_lifetime,
            login_failure_floor: Duration::from_millis(DEFAULT_LOGIN_FAILURE_FLOOR_MS),
        })
    }

    /// Override the minimum duration of a failed login
    pub fn with_login_failure_floor(mut self, floor: Duration) -> Self {
        self.login_failure_floor = floor;
        self
    }

    pub fn signing_key(&self) -> &[u8] {
        self.signing_key.as_bytes()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn token_lifetime(&self) -> TimeDelta {
        self.token_lifetime
    }

    pub fn login_failure_floor(&self) -> Duration {
        self.login_failure_floor
    }

    /// Validate that the signing key meets security requirements
    fn validate_signing_key(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(SpectrumError::ConfigError(
                "Signing key must not be empty".to_string(),
            ));
        }

        if key.len() < MIN_SIGNING_KEY_LEN {
            return Err(SpectrumError::ConfigError(format!(
                "Signing key must be at least {} characters long",
                MIN_SIGNING_KEY_LEN
            )));
        }

        // Placeholder values copied from sample .env files
        let insecure_patterns = ["your-secret-key", "change-this", "changeme"];
        let lowered = key.to_lowercase();
        for pattern in &insecure_patterns {
            if lowered.contains(pattern) {
                return Err(SpectrumError::ConfigError(format!(
                    "Signing key contains placeholder pattern '{}'. Generate one with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        Ok(())
    }

    /// Only shared-secret algorithms make sense with a string key
    fn validate_algorithm(algorithm: Algorithm) -> Result<()> {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(()),
            other => Err(SpectrumError::ConfigError(format!(
                "Unsupported signing algorithm {:?}: only HS256, HS384 and HS512 are allowed",
                other
            ))),
        }
    }
}

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SPECTRUM_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("SPECTRUM_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let signing_key = lookup("SPECTRUM_SECRET_KEY")
            .or_else(|| lookup("SECRET_KEY"))
            .ok_or_else(|| {
                SpectrumError::ConfigError(
                    "SECRET_KEY environment variable is required. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let algorithm_name = lookup("SPECTRUM_ALGORITHM")
            .or_else(|| lookup("ALGORITHM"))
            .unwrap_or_else(|| DEFAULT_ALGORITHM.to_string());
        let algorithm = Algorithm::from_str(algorithm_name.trim()).map_err(|_| {
            SpectrumError::ConfigError(format!("Unknown signing algorithm: {}", algorithm_name))
        })?;

        let expire_minutes = match lookup("SPECTRUM_ACCESS_TOKEN_EXPIRE_MINUTES")
            .or_else(|| lookup("ACCESS_TOKEN_EXPIRE_MINUTES"))
        {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                SpectrumError::ConfigError(format!(
                    "ACCESS_TOKEN_EXPIRE_MINUTES must be an integer, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
        };

        let failure_floor_ms = lookup("SPECTRUM_LOGIN_FAILURE_FLOOR_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LOGIN_FAILURE_FLOOR_MS);

        let token_lifetime = TimeDelta::try_minutes(expire_minutes).ok_or_else(|| {
            SpectrumError::ConfigError(format!(
                "ACCESS_TOKEN_EXPIRE_MINUTES is out of range: {}",
                expire_minutes
            ))
        })?;

        let auth = AuthConfig::new(signing_key, algorithm, token_lifetime)?
            .with_login_failure_floor(Duration::from_millis(failure_floor_ms));

        Ok(Self { host, port, auth })
    }
}
