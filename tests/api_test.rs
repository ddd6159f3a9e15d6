use chrono::TimeDelta;
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use warp::http::StatusCode;

use spectrum_connect::auth::{hash_password, TokenManager, UserId, UserRole};
use spectrum_connect::config::AuthConfig;
use spectrum_connect::handlers::auth::TokenResponse;
use spectrum_connect::handlers::{routes, AppState};
use spectrum_connect::storage::{MemoryStorageProvider, NewUser, StorageProvider};

const KEY: &str = "api-test-signing-key-abcdefghijklmnop-0123";

fn state() -> AppState {
    let config = AuthConfig::new(KEY, Algorithm::HS256, TimeDelta::minutes(30))
        .unwrap()
        .with_login_failure_floor(Duration::ZERO);
    let storage: Arc<dyn StorageProvider> = Arc::new(MemoryStorageProvider::new());
    AppState::new(&config, Arc::new(TokenManager::new(&config)), storage)
}

/// Registers an account directly in storage and logs it in
async fn seed(state: &AppState, email: &str, role: UserRole) -> (UserId, String) {
    let user = state
        .storage
        .user_storage()
        .create_user(NewUser {
            name: "Seeded".to_string(),
            email: email.to_string(),
            password_hash: hash_password("pw123").unwrap(),
            role,
        })
        .await
        .unwrap();
    let token = state.login.login(email, "pw123", role).await.unwrap();
    (user.id, format!("Bearer {}", token))
}

fn body(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

#[tokio::test]
async fn test_welcome_and_health() {
    let api = routes(state());

    let resp = warp::test::request().path("/").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(&resp)["message"], "Welcome to SpectrumConnect API");
    assert_eq!(resp.headers()["X-Content-Type-Options"], "nosniff");

    let resp = warp::test::request().path("/health").reply(&api).await;
    assert_eq!(body(&resp)["status"], "ok");
}

#[tokio::test]
async fn test_register_login_and_use_token() {
    let state = state();
    let api = routes(state.clone());

    let resp = warp::test::request()
        .method("POST")
        .path("/users")
        .json(&json!({"name": "Ann", "email": "a@x.com", "password": "pw123"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body(&resp);
    assert_eq!(created["email"], "a@x.com");
    assert!(created.get("password").is_none());

    let resp = warp::test::request()
        .method("POST")
        .path("/users")
        .json(&json!({"name": "Ann", "email": "a@x.com", "password": "other"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&resp)["detail"], "Email already registered");

    let resp = warp::test::request()
        .method("POST")
        .path("/login")
        .json(&json!({"email": "a@x.com", "password": "pw123", "userType": "user"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["Cache-Control"], "no-store");
    let token: TokenResponse = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(token.token_type, "bearer");

    let principal = state.resolver.resolve(&token.access_token).await.unwrap();
    assert_eq!(principal.id, created["id"].as_i64().unwrap());
}

#[tokio::test]
async fn test_therapist_signup_with_user_type_field() {
    let api = routes(state());

    let resp = warp::test::request()
        .method("POST")
        .path("/users")
        .json(&json!({"name": "Dr", "email": "t@x.com", "password": "pw123", "userType": "therapist"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = warp::test::request()
        .method("POST")
        .path("/login")
        .json(&json!({"email": "t@x.com", "password": "pw123", "userType": "therapist"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_share_one_response() {
    let state = state();
    let api = routes(state.clone());
    seed(&state, "a@x.com", UserRole::User).await;

    let attempts = [
        json!({"email": "a@x.com", "password": "wrong", "user_type": "user"}),
        json!({"email": "nobody@x.com", "password": "pw123", "user_type": "user"}),
        json!({"email": "a@x.com", "password": "pw123", "user_type": "therapist"}),
    ];

    let mut bodies = Vec::new();
    for attempt in attempts.iter() {
        let resp = warp::test::request()
            .method("POST")
            .path("/login")
            .json(attempt)
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        bodies.push(body(&resp));
    }
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn test_protected_route_requires_valid_token() {
    let state = state();
    let api = routes(state.clone());

    let resp = warp::test::request().path("/therapists/me").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()["WWW-Authenticate"], "Bearer");

    let resp = warp::test::request()
        .path("/therapists/me")
        .header("authorization", "Bearer not.a.token")
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(&resp)["detail"], "Could not validate credentials");
}

#[tokio::test]
async fn test_only_therapists_create_profiles() {
    let state = state();
    let api = routes(state.clone());
    let (_, user_auth) = seed(&state, "u@x.com", UserRole::User).await;
    let (therapist_id, therapist_auth) = seed(&state, "t@x.com", UserRole::Therapist).await;

    let profile = json!({
        "name": "Dr. Tee",
        "specialization": "Speech therapy",
        "contact": "t@x.com",
        "experience": 7
    });

    let resp = warp::test::request()
        .method("POST")
        .path("/therapists")
        .header("authorization", user_auth.as_str())
        .json(&profile)
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = warp::test::request()
        .method("POST")
        .path("/therapists")
        .header("authorization", therapist_auth.as_str())
        .json(&profile)
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body(&resp);
    assert_eq!(created["user_id"], therapist_id);

    let resp = warp::test::request()
        .method("POST")
        .path("/therapists")
        .header("authorization", therapist_auth.as_str())
        .json(&profile)
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&resp)["detail"], "Therapist profile already exists.");

    let resp = warp::test::request()
        .path("/therapists/me")
        .header("authorization", therapist_auth.as_str())
        .reply(&api)
        .await;
    assert_eq!(body(&resp), created);

    let resp = warp::test::request()
        .path("/therapists/me")
        .header("authorization", user_auth.as_str())
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = warp::test::request().path("/therapists").reply(&api).await;
    assert_eq!(body(&resp), json!([created.clone()]));

    let path = format!("/therapists/{}", created["id"]);
    let resp = warp::test::request().path(&path).reply(&api).await;
    assert_eq!(body(&resp), created);

    let resp = warp::test::request().path("/therapists/404").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_appointment_lifecycle() {
    let state = state();
    let api = routes(state.clone());
    let (user_id, user_auth) = seed(&state, "u@x.com", UserRole::User).await;
    let (_, owner_auth) = seed(&state, "t1@x.com", UserRole::Therapist).await;
    let (_, other_auth) = seed(&state, "t2@x.com", UserRole::Therapist).await;
    let (_, bare_auth) = seed(&state, "t3@x.com", UserRole::Therapist).await;

    let mut therapist_ids = Vec::new();
    for auth in [&owner_auth, &other_auth] {
        let resp = warp::test::request()
            .method("POST")
            .path("/therapists")
            .header("authorization", auth.as_str())
            .json(&json!({"name": "Dr", "specialization": "OT", "contact": "c", "experience": 3}))
            .reply(&api)
            .await;
        therapist_ids.push(body(&resp)["id"].as_i64().unwrap());
    }

    let resp = warp::test::request()
        .method("POST")
        .path("/appointments")
        .header("authorization", user_auth.as_str())
        .json(&json!({"therapist_id": 999, "scheduled_time": "2026-11-01T10:00:00Z"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // user_id in the body is ignored; the caller is the booking user
    let resp = warp::test::request()
        .method("POST")
        .path("/appointments")
        .header("authorization", user_auth.as_str())
        .json(&json!({
            "user_id": 12345,
            "therapist_id": therapist_ids[0],
            "scheduled_time": "2026-11-01T10:00:00Z"
        }))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let appointment = body(&resp);
    assert_eq!(appointment["user_id"], user_id);
    assert_eq!(appointment["status"], "pending");

    let resp = warp::test::request()
        .path("/appointments/pending")
        .header("authorization", user_auth.as_str())
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = warp::test::request()
        .path("/appointments/pending")
        .header("authorization", owner_auth.as_str())
        .reply(&api)
        .await;
    assert_eq!(body(&resp), json!([appointment.clone()]));

    let resp = warp::test::request()
        .path("/appointments/pending")
        .header("authorization", other_auth.as_str())
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let confirm_path = format!("/appointments/{}/confirm", appointment["id"]);
    let attempts = [
        (&user_auth, StatusCode::FORBIDDEN),
        (&bare_auth, StatusCode::FORBIDDEN),
        (&other_auth, StatusCode::NOT_FOUND),
        (&owner_auth, StatusCode::OK),
    ];
    for (auth, expected) in attempts {
        let resp = warp::test::request()
            .method("PUT")
            .path(&confirm_path)
            .header("authorization", auth.as_str())
            .reply(&api)
            .await;
        assert_eq!(resp.status(), expected);
        if expected == StatusCode::OK {
            assert_eq!(body(&resp)["status"], "confirmed");
        }
    }
}

#[tokio::test]
async fn test_bad_bodies_rejected() {
    let state = state();
    let api = routes(state.clone());

    let resp = warp::test::request()
        .method("POST")
        .path("/users")
        .json(&json!({"name": "Ann", "email": "not-an-email", "password": "pw"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = warp::test::request()
        .method("POST")
        .path("/login")
        .json(&json!({"email": "a@x.com", "password": "pw", "user_type": "admin"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = warp::test::request().path("/nowhere").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
