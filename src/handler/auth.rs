use std::sync::Arc;

use axum::{
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    dtos::{CreateSessionDto, SessionResponseDto},
    error::HttpError,
    models::identitymodel::FarcasterIdentity,
    utils::token,
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new().route("/session", post(create_session))
}

/// Exchange verified Farcaster identity attributes for a session token.
/// The sign-in handshake itself happens upstream; this endpoint only mints
/// the credential the rest of the API checks.
pub async fn create_session(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateSessionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let identity = FarcasterIdentity {
        fid: body.fid,
        username: body.username,
        display_name: body.display_name,
    };

    let token = token::create_token(
        &identity,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage * 60);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, cookie.to_string().parse().unwrap());

    let response = Json(SessionResponseDto {
        status: "success".to_string(),
        token,
    });

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}
