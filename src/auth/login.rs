//! Login flow: credential check followed by token mint

use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::password::verify_password_blocking;
use crate::auth::token::TokenManager;
use crate::auth::user::UserRole;
use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::security::AuthTimer;
use crate::storage::StorageProvider;

/// Exchanges email, password and claimed account type for a signed token.
///
/// Unknown email, wrong password and wrong claimed role all produce the same
/// `InvalidCredentials`, so a caller cannot learn which accounts exist or
/// what type they are.
pub struct LoginService {
    tokens: Arc<TokenManager>,
    storage: Arc<dyn StorageProvider>,
    failure_floor: Duration,
}

impl LoginService {
    pub fn new(
        config: &AuthConfig,
        tokens: Arc<TokenManager>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            tokens,
            storage,
            failure_floor: config.login_failure_floor(),
        }
    }

    pub async fn login(&self, email: &str, secret: &str, claimed_role: UserRole) -> Result<String> {
        let timer = AuthTimer::new(self.failure_floor);
        let outcome = self.attempt(email, secret, claimed_role).await;
        if outcome.is_err() {
            timer.wait().await;
        }
        outcome
    }

    async fn attempt(&self, email: &str, secret: &str, claimed_role: UserRole) -> Result<String> {
        let record = match self
            .storage
            .user_storage()
            .find_credential_by_email(email)
            .await?
        {
            Some(record) => record,
            None => {
                debug!("Login rejected: unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !verify_password_blocking(secret.to_string(), record.password_hash.clone()).await? {
            debug!("Login rejected for user {}: wrong password", record.user_id);
            return Err(AuthError::InvalidCredentials.into());
        }

        if record.role != claimed_role {
            debug!(
                "Login rejected for user {}: claimed role {} but account is {}",
                record.user_id, claimed_role, record.role
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        if !record.is_active {
            debug!("Login rejected for user {}: account inactive", record.user_id);
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue(record.user_id)?;
        info!("User {} logged in as {}", record.user_id, record.role);
        Ok(token)
    }
}
