use std::sync::Arc;

use axum::{response::IntoResponse, Extension, Json};
use validator::Validate;

use crate::{
    db::WaitlistExt,
    dtos::{
        EntryData, FilterEntryDto, JoinWaitlistDto, JoinWaitlistResponseDto,
        ReferralCountResponseDto, ReferralLinkResponseDto, WaitlistCountResponseDto,
    },
    error::HttpError,
    middleware::FarcasterAuth,
    service::{
        leaderboard::POINTS_PER_REFERRAL,
        referral::generate_referral_link,
        signup::{self, WaitlistBackend},
    },
    AppState,
};

pub async fn join_waitlist(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<FarcasterAuth>,
    Json(body): Json<JoinWaitlistDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let receipt = match &app_state.waitlist_backend {
        WaitlistBackend::Database => {
            signup::submit(
                &app_state.db_client,
                Some(&auth.identity),
                &body.email,
                body.referral_source.as_deref(),
            )
            .await?
        }
        WaitlistBackend::Formspree(client) => {
            signup::submit_form(
                client,
                Some(&auth.identity),
                &body.email,
                body.referral_source.as_deref(),
            )
            .await?
        }
    };

    match receipt.entry.as_ref().and_then(|entry| entry.referral_source.as_deref()) {
        Some(referrer) => tracing::info!(
            "Referral successful: {} referred {}",
            referrer,
            auth.identity.username
        ),
        None => tracing::info!("{} joined the waitlist", auth.identity.username),
    }

    Ok(Json(JoinWaitlistResponseDto {
        status: "success".to_string(),
        message: "You've joined the waitlist!".to_string(),
        data: EntryData {
            entry: receipt.entry.as_ref().map(FilterEntryDto::filter_entry),
            referral_count: receipt.referral_count,
        },
    }))
}

pub async fn get_referral_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<FarcasterAuth>,
) -> Result<impl IntoResponse, HttpError> {
    let referral_count = app_state
        .db_client
        .count_by_referrer(&auth.identity.fid)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ReferralCountResponseDto {
        status: "success".to_string(),
        fid: auth.identity.fid,
        referral_count,
        points: referral_count * POINTS_PER_REFERRAL,
    }))
}

pub async fn get_referral_link(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<FarcasterAuth>,
) -> Result<impl IntoResponse, HttpError> {
    let referral_link = generate_referral_link(&app_state.env.app_url, &auth.identity.fid);

    Ok(Json(ReferralLinkResponseDto {
        status: "success".to_string(),
        referral_link,
    }))
}

pub async fn get_waitlist_count(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let count = app_state
        .db_client
        .get_entry_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(WaitlistCountResponseDto {
        status: "success".to_string(),
        count,
    }))
}
