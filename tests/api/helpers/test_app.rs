use std::net::SocketAddr;

use category_rush::config::Config;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;

use super::test_player::TestPlayer;
use super::webhook::WebhookCapture;

pub struct TestApp {
    pub base_address: String,
    pub config: Config,
    pub webhook: WebhookCapture,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        TestApp::spawn_app_with(|_| {}).await
    }

    pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
        // Binding to port 0 triggers an OS scan for an available port, this way we can run tests in parallel where each runs its own application
        let random_port_address = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(random_port_address)
            .await
            .expect("Failed to bind to bind random port.");
        let address = listener.local_addr().unwrap();
        let (webhook, webhook_url) = WebhookCapture::spawn().await;

        std::env::set_var("ENVIRONMENT", "dev");
        let config = {
            let mut config = Config::get().expect("Failed to read configuration.");
            config.export.base_url = Some(webhook_url);
            configure(&mut config);
            config
        };

        let server = category_rush::startup::create_web_server(config.clone(), listener)
            .expect("Failed to create the web server.");
        let _ = tokio::spawn(server);

        TestApp {
            base_address: format!("localhost:{}", address.port()),
            config,
            webhook,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("http://{}{path}", self.base_address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, path: &str) -> reqwest::Response {
        self.client
            .post(format!("http://{}{path}", self.base_address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("http://{}{path}", self.base_address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("http://{}{path}", self.base_address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_room(&self) -> String {
        let response = self.post("/room").await;
        assert!(response.status().is_success());

        let room_created_response: RoomCreatedResponse = response
            .json()
            .await
            .expect("Failed to parse RoomCreatedResponse.");
        assert!(!room_created_response.id.is_empty());
        room_created_response.id
    }

    pub async fn join(&self, room_id: &str, player_id: &str, nickname: &str) -> TestPlayer {
        let (websocket, _) = tokio_tungstenite::connect_async(format!(
            "ws://{}/ws/{room_id}/{player_id}/{nickname}",
            self.base_address
        ))
        .await
        .expect("WebSocket could not be created.");
        let (tx, rx) = websocket.split();
        TestPlayer {
            id: player_id.to_string(),
            tx,
            rx,
        }
    }

    /// Creates a room where two players have joined, which starts the first round.
    pub async fn create_started_room(&self) -> (String, TestPlayer, TestPlayer) {
        let room_id = self.create_room().await;

        let mut alice = self.join(&room_id, "p1", "alice").await;
        let state = alice.receive_game_state().await.unwrap();
        assert_eq!(state.phase, "LOBBY");

        let mut bob = self.join(&room_id, "p2", "bob").await;
        assert_eq!(alice.receive_game_state().await.unwrap().phase, "COMPLETING");
        assert_eq!(bob.receive_game_state().await.unwrap().phase, "COMPLETING");

        (room_id, alice, bob)
    }
}

#[derive(Deserialize)]
struct RoomCreatedResponse {
    id: String,
}
