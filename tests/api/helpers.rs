pub mod test_app;
pub mod test_player;
pub mod webhook;
