//! API Integration Tests
//!
//! Every test runs its own server on the in-memory store; no external
//! services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use chrono::Utc;
use integration_tests::{
    assert_json, assert_status, eventually, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use voice_core::{SessionKey, Snowflake};

const GUILD: u64 = 1_000;
const ALICE: u64 = 11;
const BOB: u64 = 12;

fn stats_path(guild: u64) -> String {
    format!("/api/v1/guilds/{guild}/stats")
}

async fn fetch_stats(server: &TestServer, token: &str, query: &str) -> Vec<StatsRow> {
    let response = server
        .get_auth(&format!("{}{query}", stats_path(GUILD)), token)
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["store"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_login() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post("/api/v1/auth/login", &serde_json::json!({ "password": integration_tests::TEST_PASSWORD }))
        .await
        .unwrap();
    let token: TokenResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(token.token_type, "Bearer");
    assert!(token.expires_in > 0);
    assert!(!token.access_token.is_empty());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post("/api/v1/auth/login", &serde_json::json!({ "password": "wrong" }))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(body.error.code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_empty_password_is_validation_error() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post("/api/v1/auth/login", &serde_json::json!({ "password": "" }))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(body.error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_routes_require_token() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/guilds").await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTHORIZATION");

    let response = server.get_auth("/api/v1/guilds", "garbage").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post("/api/v1/platform/events", &voice_join(GUILD, ALICE, 1))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let other = TestServer::start_with(&[("JWT_SECRET", "another-secret")]).await.unwrap();
    let foreign_token = other.login().await.unwrap();

    let server = TestServer::start().await.unwrap();
    let response = server.get_auth("/api/v1/guilds", &foreign_token).await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "INVALID_TOKEN");
}

// ============================================================================
// Platform Ingress Tests
// ============================================================================

#[tokio::test]
async fn test_guild_create_populates_listing() {
    let server = TestServer::start().await.unwrap();
    let token = server.login().await.unwrap();

    server
        .push_event(&token, &guild_create(2, "zeta", &[], &[]))
        .await
        .unwrap();
    server
        .push_event(&token, &guild_create(GUILD, "Alpha", &[(ALICE, "alice")], &[]))
        .await
        .unwrap();

    let (srv, tok) = (&server, token.as_str());
    let listed = eventually(|| async move {
        let response = srv.get_auth("/api/v1/guilds", tok).await.unwrap();
        let guilds: Vec<GuildEntry> = response.json().await.unwrap();
        guilds.len() == 2
    })
    .await;
    assert!(listed);

    let response = server.get_auth("/api/v1/guilds", &token).await.unwrap();
    let guilds: Vec<GuildEntry> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(guilds[0].name, "Alpha");
    assert_eq!(guilds[0].id, GUILD.to_string());
    assert_eq!(guilds[1].name, "zeta");
}

#[tokio::test]
async fn test_malformed_event_rejected() {
    let server = TestServer::start().await.unwrap();
    let token = server.login().await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/platform/events",
            &token,
            &serde_json::json!({ "t": "MESSAGE_CREATE", "d": {} }),
        )
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_BODY");
}

#[tokio::test]
async fn test_join_then_leave_updates_online_flag() {
    let server = TestServer::start().await.unwrap();
    let token = server.login().await.unwrap();

    server
        .push_event(&token, &guild_create(GUILD, "Lounge", &[(ALICE, "alice")], &[]))
        .await
        .unwrap();
    server.push_event(&token, &voice_join(GUILD, ALICE, 5)).await.unwrap();

    let (srv, tok) = (&server, token.as_str());
    let online = eventually(|| async move {
        let rows = fetch_stats(srv, tok, "").await;
        rows.len() == 1 && rows[0].is_online
    })
    .await;
    assert!(online);

    let rows = fetch_stats(&server, &token, "").await;
    assert_eq!(rows[0].name, "alice");
    assert_eq!(rows[0].member_id, ALICE.to_string());

    // Switching channels keeps the session open
    server
        .push_event(&token, &voice_state(GUILD, ALICE, Some(5), Some(6)))
        .await
        .unwrap();
    server.push_event(&token, &voice_leave(GUILD, ALICE, 6)).await.unwrap();

    let key = SessionKey::new(Snowflake::new(ALICE as i64), Snowflake::new(GUILD as i64));
    let closed = eventually(|| async move { !srv.state.tracker().sessions().is_open(key) }).await;
    assert!(closed);
}

#[tokio::test]
async fn test_bootstrap_from_guild_snapshot() {
    let server = TestServer::start().await.unwrap();
    let token = server.login().await.unwrap();

    server
        .push_event(
            &token,
            &guild_create(GUILD, "Lounge", &[(ALICE, "alice"), (BOB, "bob")], &[BOB]),
        )
        .await
        .unwrap();

    let key = SessionKey::new(Snowflake::new(BOB as i64), Snowflake::new(GUILD as i64));
    let srv = &server;
    assert!(eventually(|| async move { srv.state.tracker().sessions().is_open(key) }).await);

    let rows = fetch_stats(&server, &token, "").await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "bob");
    assert!(rows[0].is_online);
}

// ============================================================================
// Stats Tests
// ============================================================================

#[tokio::test]
async fn test_stats_rank_history_and_fallback_names() {
    let server = TestServer::start().await.unwrap();
    let token = server.login().await.unwrap();
    let tracker = server.state.tracker();
    let today = tracker.day_of(Utc::now());
    let guild = Snowflake::new(GUILD as i64);

    tracker.store().add(guild, Snowflake::new(ALICE as i64), today, 125).await.unwrap();
    tracker.store().add(guild, Snowflake::new(BOB as i64), today, 3605).await.unwrap();

    let rows = fetch_stats(&server, &token, "?days=1").await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].member_id, BOB.to_string());
    assert_eq!(rows[0].formatted_time, "1h 0m 5s");
    assert_eq!(rows[0].name, format!("User {BOB}"));
    assert!(!rows[0].is_online);
    assert_eq!(rows[1].total_seconds, 125);
    assert_eq!(rows[1].formatted_time, "2m 5s");
}

#[tokio::test]
async fn test_stats_window_excludes_old_days() {
    let server = TestServer::start().await.unwrap();
    let token = server.login().await.unwrap();
    let tracker = server.state.tracker();
    let today = tracker.day_of(Utc::now());
    let guild = Snowflake::new(GUILD as i64);
    let alice = Snowflake::new(ALICE as i64);

    tracker.store().add(guild, alice, today, 60).await.unwrap();
    tracker.store().add(guild, alice, today.minus_days(10), 500).await.unwrap();

    let week = fetch_stats(&server, &token, "?days=7").await;
    assert_eq!(week[0].total_seconds, 60);

    let fortnight = fetch_stats(&server, &token, "?days=14").await;
    assert_eq!(fortnight[0].total_seconds, 560);
}

#[tokio::test]
async fn test_stats_query_validation() {
    let server = TestServer::start_with(&[("STATS_MAX_WINDOW_DAYS", "30")]).await.unwrap();
    let token = server.login().await.unwrap();

    let response = server
        .get_auth(&format!("{}?days=-1", stats_path(GUILD)), &token)
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");

    let response = server
        .get_auth(&format!("{}?days=31", stats_path(GUILD)), &token)
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "WINDOW_TOO_LARGE");

    let response = server
        .get_auth("/api/v1/guilds/not-a-number/stats", &token)
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_member_days_newest_first() {
    let server = TestServer::start().await.unwrap();
    let token = server.login().await.unwrap();
    let tracker = server.state.tracker();
    let today = tracker.day_of(Utc::now());
    let guild = Snowflake::new(GUILD as i64);
    let alice = Snowflake::new(ALICE as i64);

    tracker.store().add(guild, alice, today.minus_days(2), 30).await.unwrap();
    tracker.store().add(guild, alice, today, 45).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/guilds/{GUILD}/members/{ALICE}/days"), &token)
        .await
        .unwrap();
    let days: Vec<DayEntry> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day, today.to_string());
    assert_eq!(days[0].seconds, 45);
    assert_eq!(days[1].seconds, 30);
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_shutdown_flushes_open_sessions() {
    let server = TestServer::start().await.unwrap();
    let token = server.login().await.unwrap();
    let key = SessionKey::new(Snowflake::new(ALICE as i64), Snowflake::new(GUILD as i64));

    server.push_event(&token, &voice_join(GUILD, ALICE, 5)).await.unwrap();
    let srv = &server;
    assert!(eventually(|| async move { srv.state.tracker().sessions().is_open(key) }).await);

    tokio::time::sleep(std::time::Duration::from_millis(1_100)).await;

    let tracker = server.state.tracker().clone();
    let report = server.shutdown().await.unwrap().unwrap();
    assert_eq!(report.committed, 1);

    let today = tracker.day_of(Utc::now());
    let stored = tracker
        .store()
        .get(key.guild_id, key.member_id, today)
        .await
        .unwrap();
    assert!(stored >= 1);
}
