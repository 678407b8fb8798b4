use std::future::{Future, IntoFuture};
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::export::{ExportError, Exporter};
use crate::metrics::register_metrics;
use crate::room_factory::actor::RoomFactoryActor;
use crate::routes::{self, AppState};

pub fn create_web_server(
    config: Config,
    listener: TcpListener,
) -> Result<impl Future<Output = std::io::Result<()>>, ExportError> {
    register_metrics();
    let exporter = Exporter::new(config.export.clone())?;
    let room_factory = RoomFactoryActor::spawn(config.room.clone(), exporter);

    let router = routes::create_router(&config).with_state(Arc::new(AppState {
        room_factory,
        websocket: config.websocket.clone(),
    }));

    match listener.local_addr() {
        Ok(address) => log::info!("Listening on {address}"),
        Err(error) => log::warn!("Listening on an unknown address. Error: '{error}'."),
    }
    Ok(axum::serve(listener, router).into_future())
}
