use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::error::Error;
use crate::room::{PlayerView, RoomStats};
use crate::room_factory::RoomOptions;
use crate::routes::AppState;

#[derive(Serialize)]
pub struct CreateRoomResponse {
    id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllStatsResponse {
    rooms: usize,
    connected_players: usize,
    stats: Vec<RoomStats>,
}

#[derive(Serialize)]
pub struct DetailResponse {
    detail: &'static str,
}

impl DetailResponse {
    pub fn success() -> Json<DetailResponse> {
        Json(DetailResponse { detail: "success" })
    }
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    options: Option<Json<RoomOptions>>,
) -> Result<Json<CreateRoomResponse>, Error> {
    let options = options.map(|Json(options)| options).unwrap_or_default();
    let id = state.room_factory.create_room(None, options).await?;
    Ok(Json(CreateRoomResponse { id }))
}

pub async fn create_with_id(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    options: Option<Json<RoomOptions>>,
) -> Result<Json<CreateRoomResponse>, Error> {
    let options = options.map(|Json(options)| options).unwrap_or_default();
    let id = state.room_factory.create_room(Some(room_id), options).await?;
    Ok(Json(CreateRoomResponse { id }))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<DetailResponse>, Error> {
    state.room_factory.delete_room(&room_id).await?;
    Ok(DetailResponse::success())
}

pub async fn all_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AllStatsResponse>, Error> {
    let stats = state.room_factory.stats().await?;
    Ok(Json(AllStatsResponse {
        rooms: stats.len(),
        connected_players: stats.iter().map(|stats| stats.connected_players).sum(),
        stats,
    }))
}

pub async fn room_stats(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomStats>, Error> {
    let room = state.room_factory.get_room(&room_id).await?;
    Ok(Json(room.get_stats().await?))
}

pub async fn snapshot(
    State(state): State<Arc<AppState>>,
    Path((room_id, player_id)): Path<(String, String)>,
) -> Result<Json<PlayerView>, Error> {
    let room = state.room_factory.get_room(&room_id).await?;
    Ok(Json(room.get_snapshot(&player_id).await?))
}
