use crate::api::client::LocationClient;
use crate::app::event::AppEvent;
use crate::selector::{FetchOutcome, Level, Ticket};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs option-list fetches as tokio tasks and reports each completion as an
/// [`AppEvent::OptionsLoaded`].
///
/// At most one fetch per level is in flight. Starting a fetch aborts whatever
/// is still running for that level and every level below it.
pub struct FetchManager {
    client: LocationClient,
    in_flight: HashMap<Level, JoinHandle<()>>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl FetchManager {
    pub fn new(client: LocationClient, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            client,
            in_flight: HashMap::new(),
            event_tx,
        }
    }

    pub fn spawn(&mut self, ticket: Ticket) {
        let level = ticket.level;
        self.cancel_from(level);

        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        let handle = tokio::spawn(async move {
            tracing::info!(
                level = %ticket.level,
                generation = ticket.generation,
                country = ?ticket.country,
                state = ?ticket.state,
                "fetching options"
            );
            let outcome = client.fetch(&ticket).await;
            match &outcome {
                FetchOutcome::Loaded(items) => {
                    tracing::info!(level = %ticket.level, count = items.len(), "options loaded")
                }
                FetchOutcome::Empty => {
                    tracing::warn!(level = %ticket.level, "server returned no options")
                }
                FetchOutcome::Failed(reason) => {
                    tracing::warn!(level = %ticket.level, %reason, "fetch failed")
                }
            }
            let _ = event_tx.send(AppEvent::OptionsLoaded { ticket, outcome });
        });
        self.in_flight.insert(level, handle);
    }

    /// Abort in-flight fetches for `level` and everything below it.
    pub fn cancel_from(&mut self, level: Level) {
        for l in Level::ALL.into_iter().filter(|l| *l >= level) {
            if let Some(handle) = self.in_flight.remove(&l) {
                if !handle.is_finished() {
                    tracing::debug!(level = %l, "aborting superseded fetch");
                }
                handle.abort();
            }
        }
    }

    pub fn cancel_all(&mut self) {
        self.cancel_from(Level::Country);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.values().filter(|h| !h.is_finished()).count()
    }
}
