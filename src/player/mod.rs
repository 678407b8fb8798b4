pub mod actor;

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub nickname: String,
}

impl Player {
    pub fn new(id: &str, nickname: &str) -> Self {
        Player {
            id: id.to_string(),
            nickname: nickname.to_string(),
        }
    }
}
