use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    error::Result,
    extract::{ApiJson, CurrentUser},
    models::user::{AuthStatus, LoginRequest, SignupRequest},
    response::ApiResponse,
    services::AuthService,
    session::SessionContext,
};

/// Handler for `POST /api/auth/signup`
pub async fn signup(
    State(auth): State<AuthService>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse> {
    let new_user = request.validate()?;
    let identity = auth.signup(new_user).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(identity).with_message("User registered successfully"),
    ))
}

/// Handler for `POST /api/auth/login`
pub async fn login(
    State(auth): State<AuthService>,
    session: SessionContext,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    let credentials = request.validate()?;
    let identity = auth.login(credentials).await?;

    session.persist_user(identity.id).await?;

    Ok(ApiResponse::ok(identity).with_message("Logged in successfully"))
}

/// Handler for `POST /api/auth/logout`
pub async fn logout(session: SessionContext) -> Result<impl IntoResponse> {
    session.clear().await?;
    Ok(ApiResponse::message("Logged out successfully"))
}

/// Handler for `GET /api/auth/me`
pub async fn me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    ApiResponse::ok(user)
}

/// Handler for `GET /api/auth/status`; never rejects anonymous callers.
pub async fn status(
    State(auth): State<AuthService>,
    session: SessionContext,
) -> Result<impl IntoResponse> {
    let user = match session.user_id().await? {
        Some(user_id) => auth.current_user(user_id).await?,
        None => None,
    };

    Ok(ApiResponse::ok(AuthStatus {
        authenticated: user.is_some(),
        user,
    }))
}
