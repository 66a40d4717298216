use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use stagepass_core::gateway::AuthorizeError;

use crate::error::AppError;
use crate::state::AppState;

/// Gate for routes that need a signed-in user.
///
/// While the session is still resolving the answer is neither a grant nor a
/// denial: the request gets a 503 with Retry-After and the client asks again.
pub async fn session_guard(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Pull the bearer token, if the client sent one
    let token = bearer.as_ref().map(|TypedHeader(Authorization(b))| b.token());

    // 2. Map it to a verified profile
    let user = state.gateway.authorize(token).await.map_err(|e| match e {
        AuthorizeError::SessionPending => AppError::SessionPending,
        AuthorizeError::NotSignedIn => AppError::AuthenticationError(e.to_string()),
    })?;

    // 3. Hand the profile to the handler
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
