//! Appointment booking and confirmation

use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;
use warp::filters::BoxedFilter;
use warp::reply::Response;
use warp::{Filter, Reply};

use super::auth::{with_principal, with_role};
use super::{json_body, with_state, AppState};
use crate::auth::{Principal, UserRole};
use crate::error::{AuthError, SpectrumError};
use crate::storage::{AppointmentId, NewAppointment, TherapistId};

/// Booking payload. The booking user is always the caller, never the body.
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub therapist_id: TherapistId,
    pub scheduled_time: DateTime<Utc>,
}

pub fn routes(state: &AppState) -> BoxedFilter<(Response,)> {
    let create_route = warp::path!("appointments")
        .and(warp::post())
        .and(with_principal(state.resolver.clone()))
        .and(json_body::<CreateAppointmentRequest>())
        .and(with_state(state.clone()))
        .and_then(
            |principal: Principal, request: CreateAppointmentRequest, state: AppState| async move {
                book(principal, request, state)
                    .await
                    .map_err(warp::reject::custom)
            },
        );

    let pending_route = warp::path!("appointments" / "pending")
        .and(warp::get())
        .and(with_role(state.resolver.clone(), UserRole::Therapist))
        .and(with_state(state.clone()))
        .and_then(|principal: Principal, state: AppState| async move {
            pending(principal, state).await.map_err(warp::reject::custom)
        });

    let confirm_route = warp::path!("appointments" / AppointmentId / "confirm")
        .and(warp::put())
        .and(with_role(state.resolver.clone(), UserRole::Therapist))
        .and(with_state(state.clone()))
        .and_then(
            |appointment_id: AppointmentId, principal: Principal, state: AppState| async move {
                confirm(appointment_id, principal, state)
                    .await
                    .map_err(warp::reject::custom)
            },
        );

    create_route
        .or(pending_route)
        .unify()
        .or(confirm_route)
        .unify()
        .boxed()
}

async fn book(
    principal: Principal,
    request: CreateAppointmentRequest,
    state: AppState,
) -> Result<Response, SpectrumError> {
    state
        .storage
        .therapist_storage()
        .get_therapist(request.therapist_id)
        .await?
        .ok_or_else(|| SpectrumError::NotFound("Therapist not found".to_string()))?;

    let appointment = state
        .storage
        .appointment_storage()
        .create_appointment(NewAppointment {
            user_id: principal.id,
            therapist_id: request.therapist_id,
            scheduled_time: request.scheduled_time,
        })
        .await?;

    info!(
        "User {} booked appointment {} with therapist {}",
        principal.id, appointment.id, appointment.therapist_id
    );
    Ok(warp::reply::json(&appointment).into_response())
}

async fn pending(principal: Principal, state: AppState) -> Result<Response, SpectrumError> {
    let therapist = state
        .storage
        .therapist_storage()
        .get_therapist_by_user(principal.id)
        .await?
        .ok_or_else(|| SpectrumError::NotFound("Therapist profile not found".to_string()))?;

    let appointments = state
        .storage
        .appointment_storage()
        .pending_for_therapist(therapist.id)
        .await?;

    if appointments.is_empty() {
        return Err(SpectrumError::NotFound(
            "No pending appointments found".to_string(),
        ));
    }

    Ok(warp::reply::json(&appointments).into_response())
}

async fn confirm(
    appointment_id: AppointmentId,
    principal: Principal,
    state: AppState,
) -> Result<Response, SpectrumError> {
    // A therapist-typed account without a profile cannot own appointments
    let therapist = state
        .storage
        .therapist_storage()
        .get_therapist_by_user(principal.id)
        .await?
        .ok_or(AuthError::Forbidden)?;

    let appointment = state
        .storage
        .appointment_storage()
        .confirm_appointment(appointment_id, therapist.id)
        .await?
        .ok_or_else(|| {
            SpectrumError::NotFound("Appointment not found or unauthorized".to_string())
        })?;

    info!(
        "Notification: appointment {} confirmed for user {}",
        appointment.id, appointment.user_id
    );
    Ok(warp::reply::json(&appointment).into_response())
}
