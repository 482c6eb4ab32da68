//! Stats aggregator
//!
//! Combines committed daily totals inside a window with the live,
//! not-yet-committed time of open sessions, then ranks members.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};
use voice_core::{AggregateRow, DayWindow, MemberProfile, Snowflake};

use crate::services::context::TrackerContext;
use crate::services::error::TrackerResult;

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    seconds: u64,
    online: bool,
}

/// Ranked per-member totals for one guild
pub struct StatsAggregator<'a> {
    ctx: &'a TrackerContext,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(ctx: &'a TrackerContext) -> Self {
        Self { ctx }
    }

    /// Rank members of `guild_id` over the trailing `days` as of now
    pub async fn query(&self, guild_id: Snowflake, days: u32) -> TrackerResult<Vec<AggregateRow>> {
        let _gate = self.ctx.sessions().begin_read().await;
        self.collect(guild_id, days, Utc::now()).await
    }

    /// Rank members of `guild_id` over the trailing `days` as of `now`
    pub async fn query_at(
        &self,
        guild_id: Snowflake,
        days: u32,
        now: DateTime<Utc>,
    ) -> TrackerResult<Vec<AggregateRow>> {
        let _gate = self.ctx.sessions().begin_read().await;
        self.collect(guild_id, days, now).await
    }

    /// Caller holds the read side of the commit gate, so no time is in
    /// flight between the session table and the store while both are read.
    #[instrument(skip(self))]
    async fn collect(
        &self,
        guild_id: Snowflake,
        days: u32,
        now: DateTime<Utc>,
    ) -> TrackerResult<Vec<AggregateRow>> {
        let window = DayWindow::trailing(self.ctx.day_of(now), days);
        let history = self.ctx.store().totals_for_guild(guild_id, window).await?;

        let mut tallies: BTreeMap<Snowflake, Tally> = BTreeMap::new();
        for entry in &history {
            tallies.entry(entry.member_id).or_default().seconds += entry.seconds;
        }
        // Members whose window sums to nothing only show up while online
        tallies.retain(|_, t| t.seconds > 0);

        let live = self.ctx.sessions().snapshot(guild_id, now);
        for session in &live {
            let tally = tallies.entry(session.key.member_id).or_default();
            tally.seconds += session.elapsed_seconds;
            tally.online = true;
        }

        let mut rows = Vec::with_capacity(tallies.len());
        for (member_id, tally) in tallies {
            let name = match self.ctx.platform().member(guild_id, member_id).await {
                Some(profile) => profile.display_name,
                None => MemberProfile::fallback_label(member_id),
            };
            rows.push(AggregateRow {
                member_id,
                name,
                total_seconds: tally.seconds,
                is_online: tally.online,
            });
        }
        rows.sort_by(|a, b| b.total_seconds.cmp(&a.total_seconds));

        debug!(
            window_start = %window.start,
            window_end = %window.end,
            history_entries = history.len(),
            live_sessions = live.len(),
            rows = rows.len(),
            "Aggregated guild stats"
        );

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Offset, TimeZone};
    use voice_common::JwtService;
    use voice_core::{DailyTotalStore, DayKey, SessionKey};
    use voice_store::MemoryStore;

    use crate::flush::FlushScheduler;
    use crate::services::context::TrackerContextBuilder;

    const GUILD: Snowflake = Snowflake::new(100);

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap() + chrono::Duration::seconds(secs)
    }

    fn day(d: u32) -> DayKey {
        DayKey::from_ymd(2024, 5, d).unwrap()
    }

    fn member(id: i64) -> Snowflake {
        Snowflake::new(id)
    }

    fn setup() -> (TrackerContext, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let ctx = TrackerContextBuilder::new()
            .store(store.clone())
            .jwt_service(Arc::new(JwtService::new("test-secret", 60)))
            .build()
            .unwrap();
        (ctx, store)
    }

    #[tokio::test]
    async fn test_history_plus_live_session() {
        let (ctx, store) = setup();
        store.add(GUILD, member(1), day(9), 100).await.unwrap();
        store.add(GUILD, member(1), day(10), 200).await.unwrap();
        ctx.sessions().open(SessionKey::new(member(1), GUILD), t(-30));

        let rows = StatsAggregator::new(&ctx).query_at(GUILD, 7, t(0)).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_seconds, 330);
        assert!(rows[0].is_online);
        assert_eq!(rows[0].name, "User 1");
    }

    #[tokio::test]
    async fn test_window_excludes_old_days() {
        let (ctx, store) = setup();
        store.add(GUILD, member(1), day(2), 500).await.unwrap();
        store.add(GUILD, member(1), day(3), 40).await.unwrap();
        store.add(GUILD, member(1), day(10), 60).await.unwrap();

        // 10 May minus 7 days starts the window on 3 May
        let rows = StatsAggregator::new(&ctx).query_at(GUILD, 7, t(0)).await.unwrap();
        assert_eq!(rows[0].total_seconds, 100);

        let today_only = StatsAggregator::new(&ctx).query_at(GUILD, 0, t(0)).await.unwrap();
        assert_eq!(today_only[0].total_seconds, 60);
    }

    #[tokio::test]
    async fn test_window_follows_configured_offset() {
        let (ctx, store) = setup();
        store.add(GUILD, member(1), day(11), 70).await.unwrap();
        // 23:30 UTC on 10 May is 11 May at +02:00
        let late = Utc.with_ymd_and_hms(2024, 5, 10, 23, 30, 0).unwrap();

        let utc_rows = StatsAggregator::new(&ctx).query_at(GUILD, 0, late).await.unwrap();
        assert!(utc_rows.is_empty());

        let shifted = TrackerContextBuilder::new()
            .store(store.clone())
            .jwt_service(Arc::new(JwtService::new("test-secret", 60)))
            .settings(crate::services::context::TrackerSettings {
                utc_offset: chrono::FixedOffset::east_opt(2 * 3600).unwrap(),
                ..Default::default()
            })
            .build()
            .unwrap();
        let rows = StatsAggregator::new(&shifted).query_at(GUILD, 0, late).await.unwrap();
        assert_eq!(rows[0].total_seconds, 70);
    }

    #[tokio::test]
    async fn test_ranking_and_online_flags() {
        let (ctx, store) = setup();
        ctx.directory().upsert_member(GUILD, member(1), "alice");
        ctx.directory().upsert_member(GUILD, member(2), "bob");
        store.add(GUILD, member(1), day(10), 50).await.unwrap();
        store.add(GUILD, member(2), day(10), 400).await.unwrap();
        ctx.sessions().open(SessionKey::new(member(1), GUILD), t(-20));

        let rows = StatsAggregator::new(&ctx).query_at(GUILD, 7, t(0)).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "bob");
        assert_eq!(rows[0].total_seconds, 400);
        assert!(!rows[0].is_online);
        assert_eq!(rows[1].name, "alice");
        assert_eq!(rows[1].total_seconds, 70);
        assert!(rows[1].is_online);
    }

    #[tokio::test]
    async fn test_exact_ties_are_all_listed() {
        let (ctx, store) = setup();
        store.add(GUILD, member(1), day(10), 10).await.unwrap();
        store.add(GUILD, member(2), day(10), 10).await.unwrap();

        let rows = StatsAggregator::new(&ctx).query_at(GUILD, 1, t(0)).await.unwrap();
        let mut ids: Vec<_> = rows.iter().map(|r| r.member_id).collect();
        ids.sort();
        assert_eq!(ids, vec![member(1), member(2)]);
    }

    #[tokio::test]
    async fn test_fresh_session_listed_with_zero() {
        let (ctx, _store) = setup();
        ctx.sessions().open(SessionKey::new(member(3), GUILD), t(0));

        let rows = StatsAggregator::new(&ctx).query_at(GUILD, 7, t(0)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_seconds, 0);
        assert!(rows[0].is_online);
    }

    #[tokio::test]
    async fn test_other_guilds_ignored() {
        let (ctx, store) = setup();
        let other = Snowflake::new(999);
        store.add(other, member(1), day(10), 300).await.unwrap();
        ctx.sessions().open(SessionKey::new(member(2), other), t(-10));

        let rows = StatsAggregator::new(&ctx).query_at(GUILD, 7, t(0)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_join_flush_leave_scenario() {
        let (ctx, store) = setup();
        let key = SessionKey::new(member(1), GUILD);
        let today = DayKey::from_instant(t(0), Utc.fix());

        ctx.sessions().open(key, t(0));
        FlushScheduler::new(ctx.clone()).flush_at(t(60)).await;
        let remaining = ctx.sessions().close(key, t(90)).unwrap();
        store.add(GUILD, member(1), today, remaining).await.unwrap();

        let rows = StatsAggregator::new(&ctx).query_at(GUILD, 1, t(91)).await.unwrap();
        assert_eq!(rows[0].total_seconds, 90);
        assert!(!rows[0].is_online);
    }

    #[tokio::test]
    async fn test_repeated_queries_do_not_decrease() {
        let (ctx, store) = setup();
        store.add(GUILD, member(1), day(10), 100).await.unwrap();
        ctx.sessions().open(SessionKey::new(member(1), GUILD), t(0));

        let aggregator = StatsAggregator::new(&ctx);
        let first = aggregator.query_at(GUILD, 7, t(10)).await.unwrap();
        let second = aggregator.query_at(GUILD, 7, t(10)).await.unwrap();
        let later = aggregator.query_at(GUILD, 7, t(25)).await.unwrap();

        assert_eq!(first[0].total_seconds, 110);
        assert_eq!(second[0].total_seconds, 110);
        assert_eq!(later[0].total_seconds, 125);
    }

    const CROWD: i64 = 50;

    fn open_crowd(ctx: &TrackerContext) {
        for id in 1..=CROWD {
            ctx.sessions().open(SessionKey::new(member(id), GUILD), t(0));
        }
    }

    /// Queries `rounds` times at `now`, counting rows that disagree with `expected`
    fn spawn_queries(
        ctx: TrackerContext,
        rounds: usize,
        now: DateTime<Utc>,
        expected: u64,
    ) -> tokio::task::JoinHandle<usize> {
        tokio::spawn(async move {
            let mut inconsistent = 0;
            for _ in 0..rounds {
                let rows = StatsAggregator::new(&ctx).query_at(GUILD, 7, now).await.unwrap();
                if rows.len() != CROWD as usize {
                    inconsistent += 1;
                }
                inconsistent += rows.iter().filter(|r| r.total_seconds != expected).count();
                tokio::task::yield_now().await;
            }
            inconsistent
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_queries_during_flushes_see_each_second_once() {
        let (ctx, store) = setup();
        open_crowd(&ctx);
        let now = t(100);

        let queries = spawn_queries(ctx.clone(), 200, now, 100);
        let flusher = {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                let scheduler = FlushScheduler::new(ctx);
                for _ in 0..200 {
                    scheduler.flush_at(now).await;
                    tokio::task::yield_now().await;
                }
            })
        };

        flusher.await.unwrap();
        assert_eq!(queries.await.unwrap(), 0);

        let today = DayKey::from_instant(now, Utc.fix());
        for id in 1..=CROWD {
            assert_eq!(store.get(GUILD, member(id), today).await.unwrap(), 100);
        }
        assert_eq!(ctx.sessions().len(), CROWD as usize);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_queries_during_leaves_see_each_second_once() {
        let (ctx, store) = setup();
        open_crowd(&ctx);
        let now = t(100);

        let queries = spawn_queries(ctx.clone(), 200, now, 100);
        let leaves = {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                let ingestor = crate::ingest::EventIngestor::new(ctx);
                for id in 1..=CROWD {
                    let leave = voice_core::VoiceStateTransition {
                        guild_id: GUILD,
                        member_id: member(id),
                        before_channel_id: Some(Snowflake::new(7)),
                        channel_id: None,
                    };
                    ingestor.handle_transition_at(&leave, now).await;
                    tokio::task::yield_now().await;
                }
            })
        };

        leaves.await.unwrap();
        assert_eq!(queries.await.unwrap(), 0);
        assert!(ctx.sessions().is_empty());

        let rows = StatsAggregator::new(&ctx).query_at(GUILD, 7, now).await.unwrap();
        assert_eq!(rows.len(), CROWD as usize);
        assert!(rows.iter().all(|r| r.total_seconds == 100 && !r.is_online));

        let today = DayKey::from_instant(now, Utc.fix());
        assert_eq!(store.get(GUILD, member(CROWD), today).await.unwrap(), 100);
    }
}
