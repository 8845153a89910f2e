use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::get,
    Extension, Json, Router,
};
use futures::stream::Stream;

use crate::{dtos::LeaderboardResponseDto, error::HttpError, AppState};

pub fn leaderboard_handler() -> Router {
    Router::new()
        .route("/", get(get_leaderboard))
        .route("/stream", get(stream_leaderboard))
}

pub async fn get_leaderboard(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let leaderboard = app_state.leaderboard.current();

    Ok(Json(LeaderboardResponseDto {
        status: "success".to_string(),
        results: leaderboard.len() as i64,
        leaderboard,
    }))
}

/// Live leaderboard over SSE: the current snapshot immediately, then one
/// event per recomputation. Dropping the connection drops the watch handle.
pub async fn stream_leaderboard(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = app_state.leaderboard.watch();

    let stream = futures::stream::unfold((updates, true), |(mut updates, first)| async move {
        if !first && updates.changed().await.is_err() {
            return None;
        }

        let board = updates.borrow_and_update().clone();
        let event = match Event::default().json_data(&board) {
            Ok(event) => event,
            Err(err) => {
                tracing::error!("failed to encode leaderboard event: {}", err);
                return None;
            }
        };

        Some((Ok(event), (updates, false)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
