//! Per-request identity resolution

use log::debug;
use std::sync::Arc;

use crate::auth::token::{extract_bearer_token, TokenManager};
use crate::auth::user::Principal;
use crate::error::{AuthError, Result};
use crate::storage::StorageProvider;

/// Turns a bearer token into the live `Principal` it names.
///
/// Performs exactly one store lookup per call. The result belongs to the
/// calling request and is never cached.
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: Arc<TokenManager>,
    storage: Arc<dyn StorageProvider>,
}

impl IdentityResolver {
    pub fn new(tokens: Arc<TokenManager>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { tokens, storage }
    }

    /// Resolve a raw token.
    ///
    /// A token for a deleted or deactivated account fails exactly like a
    /// forged one.
    pub async fn resolve(&self, token: &str) -> Result<Principal> {
        let claims = self.tokens.decode(token)?;
        let user_id = claims.subject_id().ok_or(AuthError::InvalidToken)?;

        match self
            .storage
            .user_storage()
            .find_principal_by_id(user_id)
            .await?
        {
            Some(principal) if principal.is_active => Ok(principal),
            Some(_) => {
                debug!("Token rejected: user {} is inactive", user_id);
                Err(AuthError::InvalidToken.into())
            }
            None => {
                debug!("Token rejected: user {} does not exist", user_id);
                Err(AuthError::InvalidToken.into())
            }
        }
    }

    /// Resolve from an `Authorization` header value, if one was sent
    pub async fn resolve_header(&self, authorization: Option<&str>) -> Result<Principal> {
        let token = authorization
            .and_then(extract_bearer_token)
            .ok_or(AuthError::InvalidToken)?;
        self.resolve(token).await
    }
}
