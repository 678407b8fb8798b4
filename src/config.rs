use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde_aux::prelude::deserialize_number_from_string;

use crate::room::phase_fsm::Phase;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub application: ApplicationSettings,
    pub allow_cors: bool,
    pub room: RoomSettings,
    pub websocket: WebsocketSettings,
    pub export: ExportSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RoomSettings {
    pub categories: Vec<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub minimum_players: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub maximum_players: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub completing_timeout_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub voting_timeout_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub score_display_timeout_seconds: u64,
    /// Seconds subtracted from the deadline sent to clients, so their countdown ends before the
    /// server moves on.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub deadline_lead_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub inactivity_timeout_seconds: u64,
    pub adhoc_categories: AdhocCategoryPolicy,
    pub allow_late_join: bool,
}

impl RoomSettings {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_seconds)
    }

    pub fn deadline_lead(&self) -> Duration {
        Duration::from_secs(self.deadline_lead_seconds)
    }

    /// Countdown armed when the room enters `phase`. The lobby waits for players, not for a clock.
    pub fn phase_timeout(&self, phase: &Phase) -> Option<Duration> {
        match phase {
            Phase::Lobby => None,
            Phase::Completing => Some(Duration::from_secs(self.completing_timeout_seconds)),
            Phase::Voting => Some(Duration::from_secs(self.voting_timeout_seconds)),
            Phase::ScoreDisplay => Some(Duration::from_secs(self.score_display_timeout_seconds)),
        }
    }
}

/// What happens to a submitted word whose category is not one of the room's categories.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdhocCategoryPolicy {
    Accept,
    Reject,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WebsocketSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub idle_timeout_seconds: u64,
}

impl WebsocketSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ExportSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    pub results_path: String,
    pub room_status_path: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_seconds: u64,
}

impl ExportSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    pub fn get() -> Result<Config, ConfigError> {
        let base_path = std::env::current_dir().map_err(|error| {
            ConfigError::Message(format!(
                "Failed to determine the current directory. Error: '{error}'."
            ))
        })?;
        let configuration_directory = base_path.join("config");

        let environment: Environment = std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| DEV.to_string())
            .try_into()
            .map_err(ConfigError::Message)?;

        let environment_filename = format!("{}.yaml", environment.as_str());

        let config = config::Config::builder()
            .add_source(config::File::from(
                configuration_directory.join("base.yaml"),
            ))
            .add_source(config::File::from(
                configuration_directory.join(environment_filename),
            ))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize::<Config>()
    }
}

enum Environment {
    Dev,
    Prod,
}

const DEV: &str = "dev";
const PROD: &str = "prod";

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => DEV,
            Environment::Prod => PROD,
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(string: String) -> Result<Self, Self::Error> {
        match string.to_lowercase().as_str() {
            DEV => Ok(Self::Dev),
            PROD => Ok(Self::Prod),
            other => Err(format!(
                "{other} is not a supported environment. Use either `{DEV}` or `{PROD}`.",
            )),
        }
    }
}
