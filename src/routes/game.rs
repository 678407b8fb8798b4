use std::sync::Arc;

use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::error::Error;
use crate::player::actor::PlayerActor;
use crate::player::Player;
use crate::routes::room::DetailResponse;
use crate::routes::AppState;
use crate::websocket::send_error_and_close;

#[derive(Serialize)]
pub struct EndAllResponse {
    ended: usize,
}

pub async fn start(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<DetailResponse>, Error> {
    state.room_factory.get_room(&room_id).await?.start().await?;
    Ok(DetailResponse::success())
}

pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<DetailResponse>, Error> {
    state
        .room_factory
        .get_room(&room_id)
        .await?
        .request_advance()
        .await?;
    Ok(DetailResponse::success())
}

pub async fn restart(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<DetailResponse>, Error> {
    state
        .room_factory
        .get_room(&room_id)
        .await?
        .restart()
        .await?;
    Ok(DetailResponse::success())
}

pub async fn end(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<DetailResponse>, Error> {
    state.room_factory.get_room(&room_id).await?.end().await?;
    Ok(DetailResponse::success())
}

pub async fn end_all(State(state): State<Arc<AppState>>) -> Result<Json<EndAllResponse>, Error> {
    let ended = state.room_factory.end_all().await?;
    Ok(Json(EndAllResponse { ended }))
}

pub async fn kick(
    State(state): State<Arc<AppState>>,
    Path((room_id, player_id)): Path<(String, String)>,
) -> Result<Json<DetailResponse>, Error> {
    state
        .room_factory
        .get_room(&room_id)
        .await?
        .kick_player(&player_id)
        .await?;
    Ok(DetailResponse::success())
}

pub async fn connect_player_to_websocket(
    State(state): State<Arc<AppState>>,
    Path((room_id, player_id, nickname)): Path<(String, String, String)>,
    websocket_upgrade: WebSocketUpgrade,
) -> Response {
    websocket_upgrade.on_upgrade(move |websocket| async move {
        match state.room_factory.get_room(&room_id).await {
            Ok(room) => {
                PlayerActor::create(
                    Player::new(&player_id, &nickname),
                    room,
                    websocket,
                    state.websocket.idle_timeout(),
                )
                .await
            }
            Err(error) => send_error_and_close(websocket, &error).await,
        }
    })
}
