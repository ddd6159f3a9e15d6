//! Maps rejections to HTTP responses

use log::{debug, error};
use serde::Serialize;
use std::convert::Infallible;
use warp::http::header::{HeaderValue, WWW_AUTHENTICATE};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::error::{AuthError, SpectrumError};

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Status code and client-facing message for a crate error.
///
/// Internal failures get a generic message; their details only go to the log.
pub fn status_for(err: &SpectrumError) -> (StatusCode, String) {
    match err {
        SpectrumError::Auth(AuthError::InvalidToken) => (StatusCode::UNAUTHORIZED, err.to_string()),
        SpectrumError::Auth(AuthError::InvalidCredentials) => (StatusCode::FORBIDDEN, err.to_string()),
        SpectrumError::Auth(AuthError::Forbidden) => (StatusCode::FORBIDDEN, err.to_string()),
        SpectrumError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        SpectrumError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        SpectrumError::ValidationError(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        SpectrumError::MalformedDigest(_)
        | SpectrumError::StorageError(_)
        | SpectrumError::SystemError(_)
        | SpectrumError::ConfigError(_) => {
            error!("Request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            )
        }
    }
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, detail) = if let Some(e) = err.find::<SpectrumError>() {
        status_for(e)
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected application/json".to_string(),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Length required".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };

    debug!("Responding {} ({})", status, detail);

    let mut response =
        warp::reply::with_status(warp::reply::json(&ErrorBody { detail }), status).into_response();
    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }

    Ok(response)
}
