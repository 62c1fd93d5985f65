//! Request extractors whose rejections render as the JSON error envelope.

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, Result},
    models::user::UserIdentity,
    services::AuthService,
    session::SessionContext,
};

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// The authenticated user behind the request's session. Rejects with
/// `401` when there is no session or its user no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AuthService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let session = SessionContext::from_request_parts(parts, state).await?;
        let auth = AuthService::from_ref(state);

        let user = match session.user_id().await? {
            Some(user_id) => auth.current_user(user_id).await?,
            None => None,
        };

        user.map(CurrentUser)
            .ok_or_else(|| AppError::Unauthenticated("Not authenticated".into()))
    }
}

/// Route layer that rejects requests without a logged-in user. Applied to
/// the resource routes when `REQUIRE_AUTH` is enabled.
pub async fn require_auth(_user: CurrentUser, request: Request, next: Next) -> Response {
    next.run(request).await
}
