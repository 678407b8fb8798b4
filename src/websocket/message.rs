use serde::{Deserialize, Serialize};

use crate::room::{PlayerView, Words};
use crate::round::vote_tally::PlayerVotes;

#[derive(Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WsMessageIn {
    SubmitWords { words: Words },
    SubmitVotes { votes: PlayerVotes },
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WsMessageOut {
    GameState(PlayerView),
    Error {
        r#type: &'static str,
        title: &'static str,
        detail: String,
    },
    Kicked,
}
