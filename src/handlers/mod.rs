//! Request handlers for the HTTP API
//!
//! Every protected route receives its `Principal` explicitly from
//! `auth::with_principal` or `auth::with_role`; handlers never look the
//! caller up on their own.

pub mod appointments;
pub mod auth;
pub mod rejection;
pub mod therapists;
pub mod users;

use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

use crate::auth::{IdentityResolver, LoginService, TokenManager};
use crate::config::AuthConfig;
use crate::security::with_api_security_headers;
use crate::storage::StorageProvider;

pub use rejection::handle_rejection;

/// Largest JSON body accepted by any endpoint
const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Everything a handler may need, cloned into each request
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageProvider>,
    pub resolver: IdentityResolver,
    pub login: Arc<LoginService>,
}

impl AppState {
    pub fn new(
        config: &AuthConfig,
        tokens: Arc<TokenManager>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(tokens.clone(), storage.clone()),
            login: Arc::new(LoginService::new(config, tokens, storage.clone())),
            storage,
        }
    }
}

// Helper function to include app state in request
fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Full route tree with error recovery and security headers applied
pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
    let root = warp::path::end().and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "message": "Welcome to SpectrumConnect API"
        }))
    });

    let health = warp::path!("health")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|state: AppState| async move {
            let healthy = state.storage.health_check().await.unwrap_or(false);
            Ok::<_, Infallible>(warp::reply::json(&serde_json::json!({
                "status": if healthy { "ok" } else { "degraded" }
            })))
        });

    root.or(health)
        .or(auth::routes(&state))
        .or(users::routes(&state))
        .or(therapists::routes(&state))
        .or(appointments::routes(&state))
        .recover(handle_rejection)
        .map(|reply| with_api_security_headers(reply))
}
