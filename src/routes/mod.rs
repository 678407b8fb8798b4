use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::{Config, WebsocketSettings};
use crate::room_factory::actor_client::RoomFactoryClient;

mod game;
mod health;
mod metrics;
mod room;

pub struct AppState {
    pub room_factory: RoomFactoryClient,
    pub websocket: WebsocketSettings,
}

pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::get))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/stats", get(room::all_stats))
        .route("/stats/:room_id", get(room::room_stats))
        .route("/room", post(room::create))
        .route(
            "/room/:room_id",
            post(room::create_with_id).delete(room::delete),
        )
        .route(
            "/room/:room_id/player/:player_id/snapshot",
            get(room::snapshot),
        )
        .route("/game/end_all", post(game::end_all))
        .route("/game/:room_id/start", post(game::start))
        .route("/game/:room_id/advance", post(game::advance))
        .route("/game/:room_id/restart", post(game::restart))
        .route("/game/:room_id/end", post(game::end))
        .route("/game/:room_id/kick/:player_id", post(game::kick))
        .route(
            "/ws/:room_id/:player_id/:nickname",
            get(game::connect_player_to_websocket),
        )
        .layer(if config.allow_cors {
            log::info!("CorsLayer Permissive");
            CorsLayer::permissive()
        } else {
            CorsLayer::default()
        })
}
