use std::convert::Infallible;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;

use stagepass_core::gateway::GatewayError;
use stagepass_core::identity::UserProfile;
use stagepass_shared::models::events::SessionChangedEvent;
use stagepass_store::StorefrontEvent;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/signup", post(signup))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/logout", post(logout))
        .route("/v1/auth/session", get(session))
        .route("/v1/auth/stream", get(stream))
}

#[derive(Debug, Deserialize)]
struct SignupRequest {
    email: String,
    password: String,
    confirm_password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user: UserProfile,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    loading: bool,
    user: Option<UserProfile>,
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    // 1. Local checks before the identity provider is involved
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() || req.confirm_password.is_empty() {
        return Err(AppError::ValidationError("Please fill in all fields".to_string()));
    }
    if req.password != req.confirm_password {
        return Err(AppError::ValidationError("Passwords do not match".to_string()));
    }
    if req.password.chars().count() < 6 {
        return Err(AppError::ValidationError(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    // 2. Create the account and open its session
    let session = state
        .gateway
        .signup(email, &req.password)
        .await
        .map_err(|e| match e {
            GatewayError::EmailInUse => AppError::ConflictError(e.to_string()),
            _ => AppError::UpstreamError(e.to_string()),
        })?;

    // 3. Announce the session change
    publish_session_change(&state, Some(&session.user), true);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: session.token,
            user: session.user,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError("Please fill in all fields".to_string()));
    }

    let session = state
        .gateway
        .login(email, &req.password)
        .await
        .map_err(|e| AppError::AuthenticationError(e.to_string()))?;

    publish_session_change(&state, Some(&session.user), true);

    Ok(Json(AuthResponse {
        token: session.token,
        user: session.user,
    }))
}

async fn logout(State(state): State<AppState>) -> StatusCode {
    state.gateway.logout().await;
    publish_session_change(&state, None, false);
    StatusCode::NO_CONTENT
}

async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    let current = state.gateway.current();
    Json(SessionResponse {
        loading: !current.is_resolved(),
        user: current.user().cloned(),
    })
}

/// Live feed of session and booking activity as server-sent events.
async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.bus.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(StorefrontEvent::SessionChanged(event)) => Some(Ok(Event::default()
                .event("session_changed")
                .data(serde_json::to_string(&event).ok()?))),
            Ok(StorefrontEvent::BookingRecorded(event)) => Some(Ok(Event::default()
                .event("booking_recorded")
                .data(serde_json::to_string(&event).ok()?))),
            // Lagged receivers skip ahead rather than closing the stream
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn publish_session_change(state: &AppState, user: Option<&UserProfile>, signed_in: bool) {
    state
        .bus
        .publish(StorefrontEvent::SessionChanged(SessionChangedEvent {
            uid: user.map(|u| u.uid),
            signed_in,
            changed_at: Utc::now().timestamp(),
        }));
}
