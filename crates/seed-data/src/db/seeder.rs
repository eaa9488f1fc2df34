//! Relational seeding: analytics, logging and user domains.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::{PgSink, UserSink};
use crate::batch::{BatchRun, KeyRegistry, RunSummary};
use crate::config::{AnalyticsSeedConfig, LoggingSeedConfig, SeedConfig, UserSeedConfig};
use crate::generators::{AnalyticsGenerator, LogGenerator, UserGenerator};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Document store error: {0}")]
    Document(#[from] mongodb::error::Error),
    #[error("No MongoDB URL found in {0}")]
    MissingMongoUrl(String),
    #[error("Invalid port: {0}")]
    InvalidPort(String),
    #[error("Batch size for {0} must be greater than zero")]
    InvalidBatchSize(&'static str),
    #[error("Key space exhausted: {attempts} consecutive collisions with {claimed} keys claimed")]
    KeySpaceExhausted { claimed: usize, attempts: usize },
    #[error("Failed to read config file {path}: {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Database seeder for inserting generated rows.
pub struct Seeder {
    pool: PgPool,
}

impl Seeder {
    /// Creates a new seeder with the given database pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Seeds the five analytics metric tables.
    pub async fn seed_analytics(
        &self,
        config: &AnalyticsSeedConfig,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<RunSummary>, SeedError> {
        config.validate()?;
        let analytics = AnalyticsGenerator::with_config(config.generator.clone(), now);
        let mut summaries = Vec::with_capacity(5);

        if (config.file_access_count as u64) * 2 > analytics.file_access_key_space() {
            warn!(
                "file_access_metrics: {} rows requested from a key space of {}",
                config.file_access_count,
                analytics.file_access_key_space()
            );
        }

        let mut access_keys = KeyRegistry::with_max_attempts(config.max_key_attempts);
        let run = BatchRun::new("file_access_metrics", config.file_access_count, config.batch_size)?;
        summaries.push(
            run.plain(&mut PgSink::new(self.pool.clone()), || {
                analytics.file_access(&mut access_keys, rng)
            })
            .await?,
        );

        let run = BatchRun::new("user_usage_metrics", config.user_usage_count, config.batch_size)?;
        summaries.push(
            run.plain(&mut PgSink::new(self.pool.clone()), || {
                Ok(analytics.user_usage(rng))
            })
            .await?,
        );

        let run = BatchRun::new("sharing_activity_metrics", config.sharing_count, config.batch_size)?;
        summaries.push(
            run.plain(&mut PgSink::new(self.pool.clone()), || {
                Ok(analytics.sharing_activity(rng))
            })
            .await?,
        );

        // One row per day, written as a single statement.
        let days = config.system_performance_days;
        let run = BatchRun::new("system_performance_metrics", days, days.max(1))?;
        let mut day: i64 = 0;
        summaries.push(
            run.plain(&mut PgSink::new(self.pool.clone()), || {
                let row = analytics.system_performance(day, rng);
                day += 1;
                Ok(row)
            })
            .await?,
        );

        let run = BatchRun::new("tag_usage_metrics", config.tag_usage_count, config.batch_size)?;
        summaries.push(
            run.merged(&mut PgSink::new(self.pool.clone()), || {
                Ok(analytics.tag_usage(rng))
            })
            .await?,
        );

        info!("Seeded analytics domain");
        Ok(summaries)
    }

    /// Seeds the activity, authentication and version history logs.
    pub async fn seed_logging(
        &self,
        config: &LoggingSeedConfig,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<RunSummary>, SeedError> {
        config.validate()?;
        let logs = LogGenerator::with_config(config.generator.clone(), now);
        let mut summaries = Vec::with_capacity(3);

        let run = BatchRun::new("activity_log", config.activity_count, config.batch_size)?;
        summaries.push(
            run.plain(&mut PgSink::new(self.pool.clone()), || Ok(logs.activity(rng)))
                .await?,
        );

        let run = BatchRun::new("authentication_log", config.auth_count, config.batch_size)?;
        summaries.push(
            run.plain(&mut PgSink::new(self.pool.clone()), || Ok(logs.auth_event(rng)))
                .await?,
        );

        let run = BatchRun::new("version_history", config.version_count, config.batch_size)?;
        summaries.push(
            run.plain(&mut PgSink::new(self.pool.clone()), || Ok(logs.version(rng)))
                .await?,
        );

        info!("Seeded logging domain");
        Ok(summaries)
    }

    /// Seeds users together with one plan and several sessions each.
    pub async fn seed_users(
        &self,
        config: &UserSeedConfig,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<RunSummary, SeedError> {
        config.validate()?;
        let users = UserGenerator::with_config(config.generator.clone(), now);
        let dependents_rng = StdRng::seed_from_u64(rng.r#gen());
        let mut sink = UserSink::new(self.pool.clone(), users.clone(), dependents_rng);
        let mut emails = KeyRegistry::with_max_attempts(config.max_key_attempts);

        let run = BatchRun::new("usuario", config.user_count, config.batch_size)?;
        let summary = run
            .plain(&mut sink, || users.generate(&mut emails, rng))
            .await?;

        info!("Seeded {} users", summary.written());
        Ok(summary)
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
