use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

use crate::helpers::test_app::TestApp;
use crate::helpers::test_player::ServerMessage;

#[tokio::test]
async fn first_player_waits_in_the_lobby() {
    let app = TestApp::spawn_app().await;
    let room_id = app.create_room().await;

    let mut alice = app.join(&room_id, "p1", "alice").await;
    let state = alice.receive_game_state().await.unwrap();

    assert_eq!(state.phase, "LOBBY");
    assert!(state.other_players.is_empty());
    assert!(state.deadline.is_none());
}

#[tokio::test]
async fn second_player_starts_the_round() {
    let app = TestApp::spawn_app().await;
    let room_id = app.create_room().await;
    let mut alice = app.join(&room_id, "p1", "alice").await;
    let _ = alice.receive_game_state().await.unwrap();

    let mut bob = app.join(&room_id, "p2", "bob").await;

    let state = bob.receive_game_state().await.unwrap();
    assert_eq!(state.phase, "COMPLETING");
    assert_eq!(state.other_players, vec!["alice"]);
    assert!(state.deadline.is_some());
    assert_eq!(
        state.phase_data["categories"],
        json!(app.config.room.categories)
    );
    assert_eq!(state.letter().chars().count(), 1);

    let state = alice.receive_game_state().await.unwrap();
    assert_eq!(state.phase, "COMPLETING");
    assert_eq!(state.other_players, vec!["bob"]);
}

#[tokio::test]
async fn joining_with_a_player_id_in_use_fails() {
    let app = TestApp::spawn_app().await;
    let room_id = app.create_room().await;
    let mut alice = app.join(&room_id, "p1", "alice").await;
    let _ = alice.receive_game_state().await.unwrap();

    let mut impostor = app.join(&room_id, "p1", "impostor").await;

    assert_eq!(
        impostor.receive_game_state().await.unwrap_err(),
        "PLAYER_ID_IN_USE"
    );
}

#[tokio::test]
async fn joining_with_a_nickname_in_use_fails() {
    let app = TestApp::spawn_app().await;
    let room_id = app.create_room().await;
    let mut first_sam = app.join(&room_id, "p1", "sam").await;
    let _ = first_sam.receive_game_state().await.unwrap();

    let mut second_sam = app.join(&room_id, "p2", "sam").await;

    assert_eq!(
        second_sam.receive_game_state().await.unwrap_err(),
        "NICKNAME_IN_USE"
    );
    let room_stats: Value = app
        .get(&format!("/stats/{room_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(room_stats["playerIds"], json!(["p1"]));
    assert_eq!(room_stats["phase"], "LOBBY");
}

#[tokio::test]
async fn joining_an_unknown_room_fails() {
    let app = TestApp::spawn_app().await;

    let mut player = app.join("missing", "p1", "alice").await;

    assert_eq!(
        player.receive_game_state().await.unwrap_err(),
        "ROOM_NOT_FOUND"
    );
}

#[tokio::test]
async fn ping_is_answered_and_bad_messages_are_reported() {
    let app = TestApp::spawn_app().await;
    let room_id = app.create_room().await;
    let mut alice = app.join(&room_id, "p1", "alice").await;
    let _ = alice.receive_game_state().await.unwrap();

    alice.sync().await;

    alice
        .send_message(Message::Text(r#"{"kind": "startGame"}"#.to_string()))
        .await;
    assert_eq!(
        alice.receive_game_state().await.unwrap_err(),
        "UNPROCESSABLE_MESSAGE"
    );
    // The connection survives a bad message
    alice.sync().await;
}

#[tokio::test]
async fn a_full_round_is_scored_and_exported() {
    let app = TestApp::spawn_app().await;
    let (room_id, mut alice, mut bob) = app.create_started_room().await;
    let snapshot: Value = app
        .get(&format!("/room/{room_id}/player/p1/snapshot"))
        .await
        .json()
        .await
        .unwrap();
    let letter = snapshot["phaseData"]["letter"].as_str().unwrap().to_string();
    let alice_city = format!("{letter}aaa");
    let bob_city = format!("{letter}bbb");
    let bob_animal = format!("{letter}ccc");

    alice.submit_words(json!({"City": alice_city})).await;
    bob.submit_words(json!({"City": bob_city, "Animal": bob_animal}))
        .await;
    assert!(app
        .post(&format!("/game/{room_id}/advance"))
        .await
        .status()
        .is_success());

    let state = alice.receive_game_state().await.unwrap();
    assert_eq!(state.phase, "VOTING");
    assert_eq!(
        state.phase_data["candidates"]["City"],
        json!([alice_city, bob_city])
    );
    assert_eq!(state.phase_data["candidates"]["Animal"], json!([bob_animal]));
    let _ = bob.receive_game_state().await.unwrap();

    alice
        .submit_votes(json!({"City": {bob_city.clone(): false}}))
        .await;
    assert!(app
        .post(&format!("/game/{room_id}/advance"))
        .await
        .status()
        .is_success());

    let state = bob.receive_game_state().await.unwrap();
    assert_eq!(state.phase, "SCORE_DISPLAY");
    let results = &state.phase_data["results"];
    assert_eq!(results["alice"]["score"], 15);
    assert_eq!(results["bob"]["score"], 15);
    let _ = alice.receive_game_state().await.unwrap();

    let export = app
        .webhook
        .wait_for(&app.config.export.results_path, |_| true)
        .await;
    assert_eq!(export["roomId"], room_id.as_str());
    assert_eq!(export["results"], json!({"alice": 15, "bob": 15}));

    let room_stats: Value = app
        .get(&format!("/stats/{room_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(room_stats["roundsPlayed"], 1);
}

#[tokio::test]
async fn phases_advance_on_their_own_when_the_countdown_elapses() {
    let app = TestApp::spawn_app_with(|config| {
        config.room.completing_timeout_seconds = 1;
        config.room.voting_timeout_seconds = 1;
        config.room.deadline_lead_seconds = 0;
    })
    .await;
    let (_, mut alice, _bob) = app.create_started_room().await;

    assert_eq!(alice.receive_game_state().await.unwrap().phase, "VOTING");
    assert_eq!(
        alice.receive_game_state().await.unwrap().phase,
        "SCORE_DISPLAY"
    );
}

#[tokio::test]
async fn admin_commands_drive_the_room() {
    let app = TestApp::spawn_app().await;
    let (room_id, mut alice, _bob) = app.create_started_room().await;

    let response = app.post(&format!("/game/{room_id}/end")).await;
    assert!(response.status().is_success());
    assert_eq!(alice.receive_game_state().await.unwrap().phase, "LOBBY");

    let response = app.post(&format!("/game/{room_id}/restart")).await;
    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["type"], "INVALID_PHASE_TRANSITION");

    let response = app.post(&format!("/game/{room_id}/start")).await;
    assert!(response.status().is_success());
    assert_eq!(
        alice.receive_game_state().await.unwrap().phase,
        "COMPLETING"
    );

    let response = app.post(&format!("/game/{room_id}/restart")).await;
    assert!(response.status().is_success());
    let state = alice.receive_game_state().await.unwrap();
    assert_eq!(state.phase, "COMPLETING");
}

#[tokio::test]
async fn kicked_player_is_notified_and_removed() {
    let app = TestApp::spawn_app().await;
    let (room_id, mut alice, mut bob) = app.create_started_room().await;
    let mut carol = app.join(&room_id, "p3", "carol").await;
    let _ = carol.receive_game_state().await.unwrap();
    let _ = alice.receive_game_state().await.unwrap();
    let _ = bob.receive_game_state().await.unwrap();

    let response = app.post(&format!("/game/{room_id}/kick/p3")).await;

    assert!(response.status().is_success());
    assert!(matches!(
        carol.receive_message().await.unwrap(),
        ServerMessage::Kicked
    ));
    let state = alice.receive_game_state().await.unwrap();
    assert_eq!(state.other_players, vec!["bob"]);

    let response = app.post(&format!("/game/{room_id}/kick/p3")).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn room_returns_to_the_lobby_when_one_player_is_left() {
    let app = TestApp::spawn_app().await;
    let (_, mut alice, bob) = app.create_started_room().await;

    drop(bob);

    let state = alice.wait_for_phase("LOBBY").await;
    assert!(state.other_players.is_empty());
}

#[tokio::test]
async fn end_all_sends_every_room_back_to_the_lobby() {
    let app = TestApp::spawn_app().await;
    let (_, mut alice, _bob) = app.create_started_room().await;
    let _ = app.create_room().await;

    let body: Value = app.post("/game/end_all").await.json().await.unwrap();

    assert_eq!(body["ended"], 2);
    assert_eq!(alice.receive_game_state().await.unwrap().phase, "LOBBY");
    let all_stats: Value = app.get("/stats").await.json().await.unwrap();
    assert_eq!(all_stats["rooms"], 2);
}
