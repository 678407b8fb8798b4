use serde_json::{json, Value};

use crate::helpers::test_app::TestApp;

#[tokio::test]
async fn create_room_works() {
    let app = TestApp::spawn_app().await;

    let room_id = app.create_room().await;

    assert_eq!(room_id.len(), 5);
    assert!(!room_id.contains('O'));
    assert!(!room_id.contains('0'));
}

#[tokio::test]
async fn create_room_with_a_taken_id_fails() {
    let app = TestApp::spawn_app().await;

    let response = app.post("/room/fixed").await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], "fixed");

    let response = app.post("/room/fixed").await;
    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["type"], "ROOM_ALREADY_EXISTS");
}

#[tokio::test]
async fn stats_of_an_unknown_room_are_not_found() {
    let app = TestApp::spawn_app().await;

    let response = app.get("/stats/missing").await;

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["type"], "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn deleted_room_is_closed_for_its_players() {
    let app = TestApp::spawn_app().await;
    let room_id = app.create_room().await;
    let mut player = app.join(&room_id, "p1", "alice").await;
    let _ = player.receive_game_state().await.unwrap();

    let response = app.delete(&format!("/room/{room_id}")).await;

    assert!(response.status().is_success());
    assert!(player.receive_text().await.is_err());
    assert_eq!(
        app.get(&format!("/stats/{room_id}")).await.status().as_u16(),
        404
    );
}

#[tokio::test]
async fn stats_report_the_connected_players() {
    let app = TestApp::spawn_app().await;
    let room_id = app.create_room().await;
    let mut player = app.join(&room_id, "p1", "alice").await;
    let _ = player.receive_game_state().await.unwrap();

    let room_stats: Value = app
        .get(&format!("/stats/{room_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(room_stats["roomId"], room_id.as_str());
    assert_eq!(room_stats["phase"], "LOBBY");
    assert_eq!(room_stats["playerIds"], json!(["p1"]));
    assert_eq!(room_stats["mostPlayers"], 1);
    assert_eq!(room_stats["roundsPlayed"], 0);

    let all_stats: Value = app.get("/stats").await.json().await.unwrap();
    assert_eq!(all_stats["rooms"], 1);
    assert_eq!(all_stats["connectedPlayers"], 1);
}

#[tokio::test]
async fn snapshot_is_returned_for_members_only() {
    let app = TestApp::spawn_app().await;
    let (room_id, _alice, _bob) = app.create_started_room().await;

    let snapshot: Value = app
        .get(&format!("/room/{room_id}/player/p1/snapshot"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["phase"], "COMPLETING");
    assert_eq!(snapshot["otherPlayers"], json!(["bob"]));
    assert_eq!(
        snapshot["phaseData"]["categories"],
        json!(app.config.room.categories)
    );

    let response = app
        .get(&format!("/room/{room_id}/player/stranger/snapshot"))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn room_options_override_the_defaults() {
    let app = TestApp::spawn_app().await;
    let response = app
        .post_json("/room", &json!({"categories": ["City"], "maxPlayers": 1}))
        .await;
    let body: Value = response.json().await.unwrap();
    let room_id = body["id"].as_str().unwrap().to_string();

    let mut alice = app.join(&room_id, "p1", "alice").await;
    let _ = alice.receive_game_state().await.unwrap();
    let mut bob = app.join(&room_id, "p2", "bob").await;

    assert_eq!(
        bob.receive_game_state().await.unwrap_err(),
        "ROOM_IS_FULL"
    );
    let room_stats: Value = app
        .get(&format!("/stats/{room_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(room_stats["maximumPlayers"], 1);
}

#[tokio::test]
async fn joining_and_leaving_export_the_room_status() {
    let app = TestApp::spawn_app().await;
    let room_id = app.create_room().await;
    let path = app.config.export.room_status_path.clone();

    let mut alice = app.join(&room_id, "p1", "alice").await;
    let _ = alice.receive_game_state().await.unwrap();

    let body = app
        .webhook
        .wait_for(&path, |body| body["activePlayers"] == json!(["p1"]))
        .await;
    assert_eq!(body["roomId"], room_id.as_str());

    drop(alice);
    app.webhook
        .wait_for(&path, |body| body["activePlayers"] == json!([]))
        .await;
}
