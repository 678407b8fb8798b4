use lazy_static::lazy_static;
use prometheus::{IntCounter, IntGauge, Registry};

lazy_static! {
    pub static ref ACTIVE_ROOMS: IntGauge =
        IntGauge::new("category_rush_active_rooms", "Rooms with a running actor").expect("metric cannot be created");
    pub static ref CONNECTED_PLAYERS: IntGauge =
        IntGauge::new("category_rush_connected_players", "Amount of players connected")
            .expect("metric cannot be created");
    pub static ref ROUNDS_SCORED: IntCounter =
        IntCounter::new("category_rush_rounds_scored_total", "Rounds that reached the score display")
            .expect("metric cannot be created");
    pub static ref EXPORT_FAILURES: IntCounter =
        IntCounter::new("category_rush_export_failures_total", "Webhook calls that failed")
            .expect("metric cannot be created");
    // Collectors are registered once, the first time the registry is touched
    pub static ref REGISTRY: Registry = {
        let registry = Registry::new();
        registry
            .register(Box::new(ACTIVE_ROOMS.clone()))
            .expect("collector cannot be registered");
        registry
            .register(Box::new(CONNECTED_PLAYERS.clone()))
            .expect("collector cannot be registered");
        registry
            .register(Box::new(ROUNDS_SCORED.clone()))
            .expect("collector cannot be registered");
        registry
            .register(Box::new(EXPORT_FAILURES.clone()))
            .expect("collector cannot be registered");
        registry
    };
}

pub fn register_metrics() {
    lazy_static::initialize(&REGISTRY);
}
