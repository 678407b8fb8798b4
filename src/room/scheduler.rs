use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::WeakSender;
use tokio::task::JoinHandle;
use tokio::time;

use crate::room::actor::RoomCommand;

/// Single-shot countdown that posts a `PhaseTimeout` into the room mailbox when it elapses.
///
/// Every `arm` supersedes the previous countdown. The timeout carries the generation it was armed
/// with, and the room only applies it while that generation is still current, so an expiry that
/// was already queued when a manual transition happened is ignored.
#[derive(Debug, Default)]
pub struct PhaseScheduler {
    handle: Option<JoinHandle<()>>,
    generation: u64,
    deadline: Option<DateTime<Utc>>,
}

impl PhaseScheduler {
    pub(crate) fn arm(&mut self, timeout: Duration, room_tx: WeakSender<RoomCommand>) {
        self.cancel();
        self.generation += 1;
        self.deadline = chrono::Duration::from_std(timeout)
            .ok()
            .map(|timeout| Utc::now() + timeout);

        let generation = self.generation;
        self.handle = Some(tokio::spawn(async move {
            time::sleep(timeout).await;
            // The room is gone when the upgrade fails
            if let Some(room_tx) = room_tx.upgrade() {
                if let Err(error) = room_tx.send(RoomCommand::PhaseTimeout { generation }).await {
                    log::debug!("The room stopped before its phase timed out. Error: '{error}'.");
                }
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.deadline = None;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && self.generation == generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }
}

impl Drop for PhaseScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
