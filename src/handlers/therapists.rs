//! Therapist profiles

use log::info;
use serde::Deserialize;
use warp::filters::BoxedFilter;
use warp::reply::Response;
use warp::{Filter, Reply};

use super::auth::{with_principal, with_role};
use super::{json_body, with_state, AppState};
use crate::auth::{Principal, UserRole};
use crate::error::SpectrumError;
use crate::storage::{NewTherapist, TherapistId};

#[derive(Debug, Deserialize)]
pub struct CreateTherapistRequest {
    pub name: String,
    pub specialization: String,
    pub contact: String,
    pub experience: i32,
}

pub fn routes(state: &AppState) -> BoxedFilter<(Response,)> {
    let create = warp::path!("therapists")
        .and(warp::post())
        .and(with_role(state.resolver.clone(), UserRole::Therapist))
        .and(json_body::<CreateTherapistRequest>())
        .and(with_state(state.clone()))
        .and_then(
            |principal: Principal, request: CreateTherapistRequest, state: AppState| async move {
                create_profile(principal, request, state)
                    .await
                    .map_err(warp::reject::custom)
            },
        );

    let list = warp::path!("therapists")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|state: AppState| async move {
            list_profiles(state).await.map_err(warp::reject::custom)
        });

    let me = warp::path!("therapists" / "me")
        .and(warp::get())
        .and(with_principal(state.resolver.clone()))
        .and(with_state(state.clone()))
        .and_then(|principal: Principal, state: AppState| async move {
            my_profile(principal, state).await.map_err(warp::reject::custom)
        });

    let by_id = warp::path!("therapists" / TherapistId)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|therapist_id: TherapistId, state: AppState| async move {
            get_profile(therapist_id, state)
                .await
                .map_err(warp::reject::custom)
        });

    create.or(list).unify().or(me).unify().or(by_id).unify().boxed()
}

async fn create_profile(
    principal: Principal,
    request: CreateTherapistRequest,
    state: AppState,
) -> Result<Response, SpectrumError> {
    if request.experience < 0 {
        return Err(SpectrumError::ValidationError(
            "experience must not be negative".to_string(),
        ));
    }

    let therapist = state
        .storage
        .therapist_storage()
        .create_therapist(NewTherapist {
            user_id: principal.id,
            name: request.name,
            specialization: request.specialization,
            contact: request.contact,
            experience: request.experience,
        })
        .await?;

    info!("User {} created therapist profile {}", principal.id, therapist.id);
    Ok(warp::reply::json(&therapist).into_response())
}

async fn list_profiles(state: AppState) -> Result<Response, SpectrumError> {
    let therapists = state.storage.therapist_storage().list_therapists().await?;
    Ok(warp::reply::json(&therapists).into_response())
}

async fn my_profile(principal: Principal, state: AppState) -> Result<Response, SpectrumError> {
    let therapist = state
        .storage
        .therapist_storage()
        .get_therapist_by_user(principal.id)
        .await?
        .ok_or_else(|| {
            SpectrumError::NotFound(
                "Therapist profile not found. Please complete your setup.".to_string(),
            )
        })?;
    Ok(warp::reply::json(&therapist).into_response())
}

async fn get_profile(therapist_id: TherapistId, state: AppState) -> Result<Response, SpectrumError> {
    let therapist = state
        .storage
        .therapist_storage()
        .get_therapist(therapist_id)
        .await?
        .ok_or_else(|| SpectrumError::NotFound("Therapist not found".to_string()))?;
    Ok(warp::reply::json(&therapist).into_response())
}
