use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::config::ExportSettings;
use crate::metrics::EXPORT_FAILURES;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No export base url is configured.")]
    NotConfigured,
    #[error("The export request failed. Error: '{0}'.")]
    Transport(#[from] reqwest::Error),
    #[error("The export endpoint answered with an error. Status: '{0}', Body: '{1}'.")]
    Status(reqwest::StatusCode, String),
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ResultsPayload<'a> {
    room_id: &'a str,
    /// Round totals keyed by nickname.
    results: &'a BTreeMap<String, u32>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RoomStatusPayload<'a> {
    room_id: &'a str,
    active_players: &'a [String],
}

/// Fire-and-forget webhooks towards the platform hosting the rooms.
#[derive(Clone, Debug)]
pub struct Exporter {
    client: reqwest::Client,
    settings: ExportSettings,
}

impl Exporter {
    pub fn new(settings: ExportSettings) -> Result<Self, ExportError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        if settings.base_url.is_none() {
            log::warn!("No export base url configured, results and room status will not be exported.");
        }
        Ok(Exporter { client, settings })
    }

    pub fn export_results(&self, room_id: &str, results: BTreeMap<String, u32>) {
        let exporter = self.clone();
        let room_id = room_id.to_string();
        tokio::spawn(async move {
            let payload = ResultsPayload {
                room_id: &room_id,
                results: &results,
            };
            exporter
                .post(&exporter.settings.results_path, &payload)
                .await
                .log_failure("results", &room_id);
        });
    }

    pub fn export_room_status(&self, room_id: &str, active_players: Vec<String>) {
        let exporter = self.clone();
        let room_id = room_id.to_string();
        tokio::spawn(async move {
            let payload = RoomStatusPayload {
                room_id: &room_id,
                active_players: &active_players,
            };
            exporter
                .post(&exporter.settings.room_status_path, &payload)
                .await
                .log_failure("room status", &room_id);
        });
    }

    async fn post<T>(&self, path: &str, payload: &T) -> Result<(), ExportError>
    where
        T: ?Sized + Serialize,
    {
        let url = self.url(path)?;
        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();
        if status.is_success() {
            log::info!("Export succeeded. Url: '{url}'.");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ExportError::Status(status, body))
        }
    }

    fn url(&self, path: &str) -> Result<String, ExportError> {
        match &self.settings.base_url {
            Some(base_url) if !base_url.trim().is_empty() => Ok(format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )),
            _ => Err(ExportError::NotConfigured),
        }
    }
}

trait LogFailure {
    fn log_failure(self, export: &str, room_id: &str);
}

impl LogFailure for Result<(), ExportError> {
    fn log_failure(self, export: &str, room_id: &str) {
        match self {
            Ok(()) => {}
            Err(ExportError::NotConfigured) => {
                log::debug!("Skipped the {export} export. RoomId: '{room_id}'.")
            }
            Err(error) => {
                EXPORT_FAILURES.inc();
                log::warn!("The {export} export failed. RoomId: '{room_id}', Error: '{error}'.");
            }
        }
    }
}
