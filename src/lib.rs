pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod player;
pub mod room;
pub mod room_factory;
pub mod round;
pub mod routes;
pub mod startup;
pub mod websocket;
