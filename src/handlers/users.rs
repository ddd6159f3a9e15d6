//! Account registration

use log::info;
use serde::{Deserialize, Serialize};
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Reply};

use super::{json_body, with_state, AppState};
use crate::auth::password::hash_password_blocking;
use crate::auth::{UserId, UserRole};
use crate::error::SpectrumError;
use crate::storage::NewUser;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, alias = "userType")]
    pub role: UserRole,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), SpectrumError> {
        if self.name.trim().is_empty() {
            return Err(SpectrumError::ValidationError("name must not be empty".to_string()));
        }

        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => {
                return Err(SpectrumError::ValidationError(
                    "email is not a valid address".to_string(),
                ))
            }
        }

        if self.password.is_empty() {
            return Err(SpectrumError::ValidationError(
                "password must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserOut {
    pub id: UserId,
    pub email: String,
}

pub fn routes(state: &AppState) -> BoxedFilter<(Response,)> {
    warp::path!("users")
        .and(warp::post())
        .and(json_body::<RegisterRequest>())
        .and(with_state(state.clone()))
        .and_then(|request: RegisterRequest, state: AppState| async move {
            register(request, state).await.map_err(warp::reject::custom)
        })
        .boxed()
}

async fn register(request: RegisterRequest, state: AppState) -> Result<Response, SpectrumError> {
    request.validate()?;

    let password_hash = hash_password_blocking(request.password).await?;
    let user = state
        .storage
        .user_storage()
        .create_user(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            role: request.role,
        })
        .await?;

    info!("Registered user {} ({}) as {}", user.id, user.name, user.role);

    let body = UserOut {
        id: user.id,
        email: user.email,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::CREATED).into_response())
}
