//! Integration tests for the relational seeding runs.
//!
//! Every table is created as a temporary table that shadows any real one for
//! the lifetime of the connection, so these tests can run against a
//! development database and leave nothing behind.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -p seed-data --test relational_seeding`

use rand::{SeedableRng, rngs::StdRng};
use seed_data::batch::{BatchSink, KeyRegistry};
use seed_data::config::{AnalyticsSeedConfig, LoggingSeedConfig, UserSeedConfig};
use seed_data::db::{SeedError, Seeder, UserSink};
use seed_data::generators::UserGenerator;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use time::OffsetDateTime;

const USER_TABLES: &[&str] = &[
    r#"CREATE TEMP TABLE usuario (
        user_id serial PRIMARY KEY,
        email text NOT NULL UNIQUE,
        password_hash text NOT NULL,
        full_name text NOT NULL,
        profile_picture text,
        created_at timestamp NOT NULL,
        last_login timestamp,
        email_verified boolean NOT NULL,
        is_activated boolean NOT NULL,
        account_type text NOT NULL,
        storage_quota bigint NOT NULL,
        used_storage bigint NOT NULL
    )"#,
    r#"CREATE TEMP TABLE plan_suscripcion (
        plan_id serial PRIMARY KEY,
        user_id int NOT NULL REFERENCES usuario (user_id),
        name text NOT NULL,
        description text NOT NULL,
        storage_limit bigint NOT NULL,
        price numeric(10, 2) NOT NULL,
        is_active boolean NOT NULL
    )"#,
    r#"CREATE TEMP TABLE sesion_usuario (
        session_id serial PRIMARY KEY,
        user_id int NOT NULL REFERENCES usuario (user_id),
        is_active boolean NOT NULL,
        device_info text NOT NULL,
        ip_address inet NOT NULL,
        created_at timestamp NOT NULL,
        expires_at timestamp NOT NULL
    )"#,
];

const ANALYTICS_TABLES: &[&str] = &[
    r#"CREATE TEMP TABLE file_access_metrics (
        file_id int NOT NULL,
        date date NOT NULL,
        view_count int NOT NULL,
        download_count int NOT NULL,
        last_accessed_by_user int,
        PRIMARY KEY (file_id, date)
    )"#,
    r#"CREATE TEMP TABLE user_usage_metrics (
        user_id int NOT NULL,
        date date NOT NULL,
        files_uploaded int NOT NULL,
        files_downloaded int NOT NULL,
        used_storage_mb numeric(10, 2) NOT NULL,
        active_minutes int NOT NULL,
        login_count int NOT NULL,
        shared_items_count int NOT NULL
    )"#,
    r#"CREATE TEMP TABLE sharing_activity_metrics (
        "timestamp" timestamp NOT NULL,
        user_id int NOT NULL,
        date date NOT NULL,
        links_created int NOT NULL,
        shared_files int NOT NULL,
        revoked_links int NOT NULL
    )"#,
    r#"CREATE TEMP TABLE system_performance_metrics (
        "timestamp" timestamp NOT NULL,
        cpu_usage_percent numeric(5, 2) NOT NULL,
        disk_io_mb numeric(10, 2) NOT NULL,
        avg_response_time_ms int NOT NULL,
        active_sessions int NOT NULL,
        concurrent_uploads int NOT NULL
    )"#,
    r#"CREATE TEMP TABLE tag_usage_metrics (
        tag_id int NOT NULL,
        date date NOT NULL,
        assigned_to_files int NOT NULL,
        assigned_to_folders int NOT NULL,
        search_hits int NOT NULL,
        PRIMARY KEY (tag_id, date)
    )"#,
];

const LOGGING_TABLES: &[&str] = &[
    r#"CREATE TEMP TABLE activity_log (
        log_id serial PRIMARY KEY,
        user_id int NOT NULL,
        activity_type text NOT NULL,
        resource_id int NOT NULL,
        resource_type text NOT NULL,
        "timestamp" timestamp NOT NULL,
        ip_address inet NOT NULL,
        user_agent text NOT NULL
    )"#,
    r#"CREATE TEMP TABLE authentication_log (
        log_id serial PRIMARY KEY,
        user_id int NOT NULL,
        action_type text NOT NULL,
        "timestamp" timestamp NOT NULL,
        ip_address inet NOT NULL,
        user_agent text NOT NULL,
        success boolean NOT NULL
    )"#,
    r#"CREATE TEMP TABLE version_history (
        version_id serial PRIMARY KEY,
        file_id int NOT NULL,
        created_by int NOT NULL,
        created_at timestamp NOT NULL,
        version_path text NOT NULL,
        size bigint NOT NULL,
        checksum text NOT NULL
    )"#,
];

/// Get database pool, skipping tests if DATABASE_URL is not set.
///
/// The pool holds a single connection so temporary tables stay visible to
/// every statement the seeder issues.
async fn get_test_pool() -> Option<PgPool> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) if url.starts_with("postgres") => url,
        _ => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    match PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            None
        }
    }
}

async fn create_tables(pool: &PgPool, statements: &[&str]) {
    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .expect("Failed to create temp table");
    }
}

async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar(sql)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}

/// Returns `(user_id, plans, sessions)` for every stored user.
async fn dependents_per_user(pool: &PgPool) -> Vec<(i64, i64, i64)> {
    sqlx::query_as(
        r#"
        SELECT u.user_id::bigint,
               (SELECT COUNT(*) FROM plan_suscripcion p WHERE p.user_id = u.user_id),
               (SELECT COUNT(*) FROM sesion_usuario s WHERE s.user_id = u.user_id)
        FROM usuario u
        ORDER BY u.user_id
        "#,
    )
    .fetch_all(pool)
    .await
    .expect("Failed to fetch dependents")
}

#[tokio::test]
async fn test_users_get_one_plan_and_sessions_each() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    create_tables(&pool, USER_TABLES).await;

    let config = UserSeedConfig {
        user_count: 7,
        batch_size: 3,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(2025);
    let summary = Seeder::new(pool.clone())
        .seed_users(&config, OffsetDateTime::now_utc(), &mut rng)
        .await
        .unwrap();

    assert_eq!(summary.produced(), 7);
    assert_eq!(summary.written(), 7);
    assert_eq!(summary.batches(), 3);

    let rows = dependents_per_user(&pool).await;
    assert_eq!(rows.len(), 7);
    for (user_id, plans, sessions) in rows {
        assert_eq!(plans, 1, "user {user_id} has {plans} plans");
        assert!(
            (1..=5).contains(&sessions),
            "user {user_id} has {sessions} sessions"
        );
    }

    let emails = count(&pool, "SELECT COUNT(DISTINCT email) FROM usuario").await;
    assert_eq!(emails, 7);
}

#[tokio::test]
async fn test_failed_user_batch_rolls_back_dependents() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    create_tables(&pool, USER_TABLES).await;

    let now = OffsetDateTime::now_utc();
    let users = UserGenerator::new(now);
    let mut rng = StdRng::seed_from_u64(2025);
    let mut emails = KeyRegistry::new();
    let first = users.generate(&mut emails, &mut rng).unwrap();
    let second = users.generate(&mut emails, &mut rng).unwrap();

    let mut sink = UserSink::new(pool.clone(), users, StdRng::seed_from_u64(7));
    let written = sink.flush(vec![first.clone(), second]).await.unwrap();
    assert_eq!(written, 2);

    // Same email twice violates the unique constraint.
    let result = sink.flush(vec![first.clone(), first]).await;
    assert!(matches!(result, Err(SeedError::Database(_))));

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM usuario").await, 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM plan_suscripcion").await, 2);
    let rows = dependents_per_user(&pool).await;
    assert!(rows.iter().all(|&(_, plans, _)| plans == 1));
}

#[tokio::test]
async fn test_analytics_run_fills_every_table() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    create_tables(&pool, ANALYTICS_TABLES).await;

    let config = AnalyticsSeedConfig {
        file_access_count: 50,
        user_usage_count: 20,
        sharing_count: 10,
        system_performance_days: 15,
        tag_usage_count: 40,
        batch_size: 8,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(2025);
    let summaries = Seeder::new(pool.clone())
        .seed_analytics(&config, OffsetDateTime::now_utc(), &mut rng)
        .await
        .unwrap();

    let labels: Vec<_> = summaries.iter().map(|s| s.label).collect();
    assert_eq!(
        labels,
        [
            "file_access_metrics",
            "user_usage_metrics",
            "sharing_activity_metrics",
            "system_performance_metrics",
            "tag_usage_metrics",
        ]
    );

    let file_access = &summaries[0];
    assert_eq!(file_access.written(), 50);
    assert_eq!(
        count(&pool, "SELECT COUNT(DISTINCT (file_id, date)) FROM file_access_metrics").await,
        50
    );

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM user_usage_metrics").await, 20);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM sharing_activity_metrics").await,
        10
    );

    // One statement covering every day.
    let performance = &summaries[3];
    assert_eq!(performance.batches(), 1);
    assert_eq!(performance.written(), 15);
    assert_eq!(
        count(
            &pool,
            "SELECT COUNT(DISTINCT \"timestamp\") FROM system_performance_metrics"
        )
        .await,
        15
    );

    // Merged: every produced row is accounted for, collisions collapse.
    let tag_usage = &summaries[4];
    assert_eq!(tag_usage.produced(), 40);
    assert!(tag_usage.written() <= 40);
    let stored = count(&pool, "SELECT COUNT(*) FROM tag_usage_metrics").await;
    assert!(stored as usize <= tag_usage.written());
}

#[tokio::test]
async fn test_logging_run_writes_inet_addresses() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    create_tables(&pool, LOGGING_TABLES).await;

    let config = LoggingSeedConfig {
        activity_count: 25,
        auth_count: 15,
        version_count: 10,
        batch_size: 6,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(2025);
    let summaries = Seeder::new(pool.clone())
        .seed_logging(&config, OffsetDateTime::now_utc(), &mut rng)
        .await
        .unwrap();

    assert_eq!(
        summaries.iter().map(|s| s.written()).collect::<Vec<_>>(),
        [25, 15, 10]
    );
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM activity_log WHERE family(ip_address) = 4").await,
        25
    );
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM authentication_log").await,
        15
    );
    assert_eq!(
        count(
            &pool,
            "SELECT COUNT(*) FROM version_history WHERE version_path LIKE 's3://bucket/%'"
        )
        .await,
        10
    );
}

#[tokio::test]
async fn test_invalid_config_fails_before_writing() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    create_tables(&pool, ANALYTICS_TABLES).await;

    let mut config = AnalyticsSeedConfig {
        file_access_count: 5,
        ..Default::default()
    };
    config.generator.tag_ids = (100, 1);

    let mut rng = StdRng::seed_from_u64(2025);
    let result = Seeder::new(pool.clone())
        .seed_analytics(&config, OffsetDateTime::now_utc(), &mut rng)
        .await;

    assert!(matches!(result, Err(SeedError::InvalidConfig(_))));
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM file_access_metrics").await, 0);
}
