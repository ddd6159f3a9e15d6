//! Authentication filters and the login endpoint

use serde::{Deserialize, Serialize};
use warp::filters::BoxedFilter;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use super::{json_body, with_state, AppState};
use crate::auth::{require_role, IdentityResolver, Principal, UserRole};
use crate::constants::TOKEN_TYPE;
use crate::error::SpectrumError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(alias = "userType")]
    pub user_type: UserRole,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Resolve the caller from the `Authorization: Bearer` header
pub fn with_principal(
    resolver: IdentityResolver,
) -> impl Filter<Extract = (Principal,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(
        move |authorization: Option<String>| {
            let resolver = resolver.clone();
            async move {
                resolver
                    .resolve_header(authorization.as_deref())
                    .await
                    .map_err(warp::reject::custom)
            }
        },
    )
}

/// Resolve the caller and require `required` as their role
pub fn with_role(
    resolver: IdentityResolver,
    required: UserRole,
) -> impl Filter<Extract = (Principal,), Error = Rejection> + Clone {
    let gate = require_role(required);
    with_principal(resolver).and_then(move |principal: Principal| async move {
        gate.check(principal)
            .map_err(|e| warp::reject::custom(SpectrumError::from(e)))
    })
}

pub fn routes(state: &AppState) -> BoxedFilter<(Response,)> {
    warp::path!("login")
        .and(warp::post())
        .and(json_body::<LoginRequest>())
        .and(with_state(state.clone()))
        .and_then(|request: LoginRequest, state: AppState| async move {
            login(request, state).await.map_err(warp::reject::custom)
        })
        .boxed()
}

async fn login(request: LoginRequest, state: AppState) -> Result<Response, SpectrumError> {
    let access_token = state
        .login
        .login(&request.email, &request.password, request.user_type)
        .await?;

    Ok(warp::reply::json(&TokenResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
    })
    .into_response())
}
