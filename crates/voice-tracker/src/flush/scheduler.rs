//! Flush scheduler
//!
//! On a fixed period, moves every open session's time since its last
//! checkpoint into the store without closing the session. Ticks run inside
//! one task and are awaited in turn, so a slow flush delays the next tick
//! instead of overlapping it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::services::context::TrackerContext;

/// Summary of one flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Sessions whose time was committed
    pub committed: usize,
    /// Seconds committed across all sessions
    pub seconds: u64,
    /// Sessions whose commit failed and were rewound
    pub failed: usize,
}

/// Periodic commit of open sessions
#[derive(Debug, Clone)]
pub struct FlushScheduler {
    ctx: TrackerContext,
}

impl FlushScheduler {
    pub fn new(ctx: TrackerContext) -> Self {
        Self { ctx }
    }

    /// Flush all open sessions as of now
    pub async fn flush(&self) -> FlushReport {
        self.flush_at(Utc::now()).await
    }

    /// Flush all open sessions as of `now`
    ///
    /// A failed commit is logged and its time handed back to the session
    /// so the next tick or the eventual close retries it. Other sessions
    /// are unaffected.
    #[instrument(skip(self))]
    pub async fn flush_at(&self, now: DateTime<Utc>) -> FlushReport {
        let sessions = self.ctx.sessions();
        let _gate = sessions.begin_commit().await;

        let drained = sessions.drain_elapsed(now);
        let day = self.ctx.day_of(now);
        let mut report = FlushReport::default();

        for item in &drained {
            match self
                .ctx
                .store()
                .add(item.key.guild_id, item.key.member_id, day, item.seconds)
                .await
            {
                Ok(_) => {
                    report.committed += 1;
                    report.seconds += item.seconds;
                }
                Err(e) => {
                    let rewound = sessions.rewind(item);
                    warn!(
                        guild_id = %item.key.guild_id,
                        member_id = %item.key.member_id,
                        seconds = item.seconds,
                        rewound,
                        error = %e,
                        "Failed to flush session"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.committed > 0 || report.failed > 0 {
            info!(
                committed = report.committed,
                seconds = report.seconds,
                failed = report.failed,
                day = %day,
                "Flushed open sessions"
            );
        } else {
            debug!(open_sessions = sessions.len(), "Nothing to flush");
        }

        report
    }

    /// Run the flush loop until shutdown, then flush once more
    pub fn spawn(self, period: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<FlushReport> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            info!(period_secs = period.as_secs(), "Flush scheduler started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.flush().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            let last = self.flush().await;
            info!(
                committed = last.committed,
                seconds = last.seconds,
                "Flush scheduler stopped after final flush"
            );
            last
        })
    }
}
