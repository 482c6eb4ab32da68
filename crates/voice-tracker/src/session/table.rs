//! Session table - the single owner of open voice sessions
//!
//! Every operation runs under one coarse mutex covering the whole map, so
//! entry creation and removal are atomic with respect to the flush and
//! query snapshots. No operation awaits while holding it.
//!
//! Elapsed time is handed out in whole seconds. When time is taken from a
//! session without closing it, the checkpoint moves forward by exactly the
//! seconds returned; any sub-second remainder stays with the session.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use voice_core::{LiveSession, SessionKey, Snowflake};

#[derive(Debug, Clone, Copy)]
struct Entry {
    checkpoint: DateTime<Utc>,
    /// Distinguishes this session from a later one under the same key
    epoch: u64,
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<SessionKey, Entry>,
    next_epoch: u64,
}

/// Time taken from a session that stays open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drained {
    pub key: SessionKey,
    pub seconds: u64,
    pub epoch: u64,
}

/// Open sessions keyed by (member, guild)
#[derive(Debug, Default)]
pub struct SessionTable {
    inner: Mutex<Inner>,
    /// Held exclusively while time moves from the table into the store,
    /// shared while a query reads both
    commit_gate: RwLock<()>,
}

/// Whole seconds from `from` to `to`, 0 when `to` is earlier
fn whole_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_seconds()).unwrap_or(0)
}

/// `seconds` never exceeds a span that already exists between two instants
fn advance(checkpoint: DateTime<Utc>, seconds: u64) -> DateTime<Utc> {
    checkpoint + Duration::seconds(seconds as i64)
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session with checkpoint `at`
    ///
    /// Returns false, leaving the original checkpoint, if one is already open.
    pub fn open(&self, key: SessionKey, at: DateTime<Utc>) -> bool {
        let mut inner = self.inner.lock();
        if inner.sessions.contains_key(&key) {
            return false;
        }
        let epoch = inner.next_epoch;
        inner.next_epoch += 1;
        inner.sessions.insert(key, Entry { checkpoint: at, epoch });
        true
    }

    /// Remove a session and return its time since the last checkpoint
    pub fn close(&self, key: SessionKey, at: DateTime<Utc>) -> Option<u64> {
        self.inner
            .lock()
            .sessions
            .remove(&key)
            .map(|entry| whole_seconds(entry.checkpoint, at))
    }

    /// Take a session's elapsed time without closing it
    ///
    /// Returns `None` if no session is open for `key`.
    pub fn checkpoint_and_reset(&self, key: SessionKey, at: DateTime<Utc>) -> Option<u64> {
        let mut inner = self.inner.lock();
        let entry = inner.sessions.get_mut(&key)?;
        let seconds = whole_seconds(entry.checkpoint, at);
        entry.checkpoint = advance(entry.checkpoint, seconds);
        Some(seconds)
    }

    /// Open sessions of one guild with their elapsed time at `at`
    pub fn snapshot(&self, guild_id: Snowflake, at: DateTime<Utc>) -> Vec<LiveSession> {
        self.inner
            .lock()
            .sessions
            .iter()
            .filter(|(key, _)| key.guild_id == guild_id)
            .map(|(key, entry)| LiveSession {
                key: *key,
                elapsed_seconds: whole_seconds(entry.checkpoint, at),
            })
            .collect()
    }

    /// Checkpoint every open session at once, returning the non-zero deltas
    pub fn drain_elapsed(&self, at: DateTime<Utc>) -> Vec<Drained> {
        let mut inner = self.inner.lock();
        inner
            .sessions
            .iter_mut()
            .filter_map(|(key, entry)| {
                let seconds = whole_seconds(entry.checkpoint, at);
                if seconds == 0 {
                    return None;
                }
                entry.checkpoint = advance(entry.checkpoint, seconds);
                Some(Drained {
                    key: *key,
                    seconds,
                    epoch: entry.epoch,
                })
            })
            .collect()
    }

    /// Give drained time back to a session that could not commit it
    ///
    /// Only applies if the same session is still open.
    pub fn rewind(&self, drained: &Drained) -> bool {
        let mut inner = self.inner.lock();
        match inner.sessions.get_mut(&drained.key) {
            Some(entry) if entry.epoch == drained.epoch => {
                entry.checkpoint -= Duration::seconds(drained.seconds as i64);
                true
            }
            _ => false,
        }
    }

    pub fn is_open(&self, key: SessionKey) -> bool {
        self.inner.lock().sessions.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().sessions.is_empty()
    }

    /// Exclusive access while moving time into the store
    pub async fn begin_commit(&self) -> RwLockWriteGuard<'_, ()> {
        self.commit_gate.write().await
    }

    /// Shared access while reading the store and the table together
    pub async fn begin_read(&self) -> RwLockReadGuard<'_, ()> {
        self.commit_gate.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn key(member: i64, guild: i64) -> SessionKey {
        SessionKey::new(Snowflake::new(member), Snowflake::new(guild))
    }

    #[test]
    fn test_open_close_returns_elapsed() {
        let table = SessionTable::new();
        assert!(table.open(key(1, 10), t(0)));
        assert_eq!(table.close(key(1, 10), t(90)), Some(90));
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_open_keeps_checkpoint() {
        let table = SessionTable::new();
        assert!(table.open(key(1, 10), t(0)));
        assert!(!table.open(key(1, 10), t(50)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.close(key(1, 10), t(60)), Some(60));
    }

    #[test]
    fn test_close_without_session() {
        let table = SessionTable::new();
        assert_eq!(table.close(key(1, 10), t(5)), None);
    }

    #[test]
    fn test_negative_elapsed_clamps_to_zero() {
        let table = SessionTable::new();
        table.open(key(1, 10), t(100));
        assert_eq!(table.checkpoint_and_reset(key(1, 10), t(40)), Some(0));
        // Checkpoint untouched, so later time is measured from 100
        assert_eq!(table.close(key(1, 10), t(130)), Some(30));
    }

    #[test]
    fn test_checkpoint_then_close_has_no_double_count() {
        let table = SessionTable::new();
        table.open(key(1, 10), t(0));
        assert_eq!(table.checkpoint_and_reset(key(1, 10), t(60)), Some(60));
        assert!(table.is_open(key(1, 10)));
        assert_eq!(table.close(key(1, 10), t(90)), Some(30));
    }

    #[test]
    fn test_checkpoint_without_session() {
        let table = SessionTable::new();
        assert_eq!(table.checkpoint_and_reset(key(1, 10), t(60)), None);
    }

    #[test]
    fn test_sub_second_remainder_carries_over() {
        let table = SessionTable::new();
        table.open(key(1, 10), t(0));

        let half = t(10) + Duration::milliseconds(500);
        assert_eq!(table.checkpoint_and_reset(key(1, 10), half), Some(10));

        let later = t(20) + Duration::milliseconds(500);
        assert_eq!(table.checkpoint_and_reset(key(1, 10), later), Some(10));
        assert_eq!(table.close(key(1, 10), t(21)), Some(1));
    }

    #[test]
    fn test_interleaved_takes_sum_to_session_length() {
        let table = SessionTable::new();
        table.open(key(1, 10), t(0));

        let mut total = 0;
        for at in [7, 19, 19, 60, 61, 200] {
            total += table.checkpoint_and_reset(key(1, 10), t(at)).unwrap();
        }
        total += table.close(key(1, 10), t(333)).unwrap();
        assert_eq!(total, 333);
    }

    #[test]
    fn test_snapshot_filters_by_guild() {
        let table = SessionTable::new();
        table.open(key(1, 10), t(0));
        table.open(key(2, 10), t(30));
        table.open(key(1, 20), t(0));

        let mut snap = table.snapshot(Snowflake::new(10), t(60));
        snap.sort_by_key(|s| s.key.member_id);

        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].elapsed_seconds, 60);
        assert_eq!(snap[1].elapsed_seconds, 30);
        // Read-only
        assert_eq!(table.close(key(2, 10), t(60)), Some(30));
    }

    #[test]
    fn test_drain_skips_zero_and_advances() {
        let table = SessionTable::new();
        table.open(key(1, 10), t(0));
        table.open(key(2, 10), t(60));

        let drained = table.drain_elapsed(t(60));
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].key, key(1, 10));
        assert_eq!(drained[0].seconds, 60);

        assert!(table.drain_elapsed(t(60)).is_empty());
        assert_eq!(table.close(key(1, 10), t(75)), Some(15));
    }

    #[test]
    fn test_rewind_restores_time() {
        let table = SessionTable::new();
        table.open(key(1, 10), t(0));

        let drained = table.drain_elapsed(t(60));
        assert!(table.rewind(&drained[0]));
        assert_eq!(table.close(key(1, 10), t(90)), Some(90));
    }

    #[test]
    fn test_rewind_ignores_replaced_session() {
        let table = SessionTable::new();
        table.open(key(1, 10), t(0));
        let drained = table.drain_elapsed(t(60));

        table.close(key(1, 10), t(70));
        table.open(key(1, 10), t(80));

        assert!(!table.rewind(&drained[0]));
        assert_eq!(table.close(key(1, 10), t(100)), Some(20));
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;

        let table = Arc::new(SessionTable::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let table = Arc::clone(&table);
                std::thread::spawn(move || {
                    for n in 0..100 {
                        let k = key(i * 1000 + n, 10);
                        table.open(k, t(0));
                        table.checkpoint_and_reset(k, t(5));
                        if n % 2 == 0 {
                            table.close(k, t(10));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(table.len(), 8 * 50);
    }
}
