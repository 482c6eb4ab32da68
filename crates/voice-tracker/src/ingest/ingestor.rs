//! Event ingestor
//!
//! Applies platform events to the session table and directory, one at a
//! time in arrival order. Closing a session commits its remaining time to
//! the store under the day the leave happened.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use voice_core::{SessionKey, TransitionKind, VoicePresence, VoiceStateTransition};

use crate::services::context::TrackerContext;
use crate::services::error::{TrackerError, TrackerResult};

use super::events::{GuildSnapshot, PlatformEvent};

/// What a voice transition did to the session table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Opened,
    AlreadyOpen,
    /// Session closed; `committed` is false if the store write failed
    Closed { seconds: u64, committed: bool },
    NotOpen,
    /// Channel switch or no channel on either side
    Ignored,
}

/// Sending half of the ingest queue
#[derive(Debug, Clone)]
pub struct IngestHandle {
    tx: mpsc::Sender<PlatformEvent>,
}

impl IngestHandle {
    /// Queue an event without waiting
    ///
    /// # Errors
    /// Returns `TrackerError::Unavailable` if the queue is full or the ingestor stopped
    pub fn submit(&self, event: PlatformEvent) -> TrackerResult<()> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TrackerError::unavailable("ingest queue is full"),
            mpsc::error::TrySendError::Closed(_) => TrackerError::unavailable("ingestor has stopped"),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Create the bounded ingest queue
pub fn ingest_channel(capacity: usize) -> (IngestHandle, mpsc::Receiver<PlatformEvent>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (IngestHandle { tx }, rx)
}

/// Applies platform events to tracker state
#[derive(Debug, Clone)]
pub struct EventIngestor {
    ctx: TrackerContext,
}

impl EventIngestor {
    pub fn new(ctx: TrackerContext) -> Self {
        Self { ctx }
    }

    /// Apply one event at the current time
    pub async fn apply(&self, event: PlatformEvent) {
        self.apply_at(event, Utc::now()).await;
    }

    /// Apply one event as if it arrived at `now`
    pub async fn apply_at(&self, event: PlatformEvent, now: DateTime<Utc>) {
        debug!(event = event.kind(), "Applying platform event");

        match event {
            PlatformEvent::Ready(ready) => {
                let mut opened = 0;
                for snapshot in &ready.guilds {
                    opened += self.apply_snapshot(snapshot, now);
                }
                info!(
                    guilds = ready.guilds.len(),
                    opened, "Platform ready, sessions bootstrapped"
                );
            }
            PlatformEvent::GuildCreate(snapshot) => {
                let opened = self.apply_snapshot(&snapshot, now);
                info!(guild_id = %snapshot.id, opened, "Guild available");
            }
            PlatformEvent::GuildMemberUpdate(update) => {
                self.ctx
                    .directory()
                    .upsert_member(update.guild_id, update.user_id, update.display_name);
            }
            PlatformEvent::VoiceStateUpdate(payload) => {
                self.handle_transition_at(&payload.into(), now).await;
            }
        }
    }

    fn apply_snapshot(&self, snapshot: &GuildSnapshot, now: DateTime<Utc>) -> usize {
        self.ctx.directory().apply_snapshot(snapshot);
        self.bootstrap_at(&snapshot.presences(), now)
    }

    /// Open sessions for members already present, counting from `now`
    ///
    /// Members with an open session keep their original checkpoint.
    /// Returns how many sessions were opened.
    pub fn bootstrap_at(&self, presences: &[VoicePresence], now: DateTime<Utc>) -> usize {
        presences
            .iter()
            .filter(|p| {
                self.ctx
                    .sessions()
                    .open(SessionKey::new(p.member_id, p.guild_id), now)
            })
            .count()
    }

    /// Apply a voice transition observed at `now`
    #[instrument(skip(self, transition), fields(guild_id = %transition.guild_id, member_id = %transition.member_id))]
    pub async fn handle_transition_at(
        &self,
        transition: &VoiceStateTransition,
        now: DateTime<Utc>,
    ) -> TransitionOutcome {
        let key = transition.key();

        match transition.kind() {
            TransitionKind::Join => {
                self.ctx
                    .directory()
                    .set_in_voice(key.guild_id, key.member_id, true);
                if self.ctx.sessions().open(key, now) {
                    debug!("Session opened");
                    TransitionOutcome::Opened
                } else {
                    TransitionOutcome::AlreadyOpen
                }
            }
            TransitionKind::Leave => {
                self.ctx
                    .directory()
                    .set_in_voice(key.guild_id, key.member_id, false);

                // Close and commit as one step relative to readers
                let _gate = self.ctx.sessions().begin_commit().await;
                let Some(seconds) = self.ctx.sessions().close(key, now) else {
                    return TransitionOutcome::NotOpen;
                };
                debug!(seconds, "Session closed");

                if seconds == 0 {
                    return TransitionOutcome::Closed {
                        seconds,
                        committed: true,
                    };
                }

                let day = self.ctx.day_of(now);
                let committed = match self
                    .ctx
                    .store()
                    .add(key.guild_id, key.member_id, day, seconds)
                    .await
                {
                    Ok(_) => true,
                    Err(e) => {
                        warn!(error = %e, seconds, day = %day, "Failed to commit closed session");
                        false
                    }
                };
                TransitionOutcome::Closed { seconds, committed }
            }
            TransitionKind::Switch | TransitionKind::Unchanged => TransitionOutcome::Ignored,
        }
    }

    /// Consume the queue until it closes or shutdown is signalled
    ///
    /// On shutdown the queue is closed to new events and whatever is
    /// already queued is still applied.
    pub async fn run(self, mut rx: mpsc::Receiver<PlatformEvent>, mut shutdown: watch::Receiver<bool>) {
        info!("Event ingestor started");

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => self.apply(event).await,
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        rx.close();
                        while let Some(event) = rx.recv().await {
                            self.apply(event).await;
                        }
                        break;
                    }
                }
            }
        }

        info!(open_sessions = self.ctx.sessions().len(), "Event ingestor stopped");
    }
}
