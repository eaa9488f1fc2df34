//! Synthetic data seeding for the drive app.
//!
//! This crate fills the app's stores with reproducible test data for
//! development and load testing:
//! - PostgreSQL analytics, logging and user schemas via [`db::Seeder`]
//! - the MongoDB file store (tags, folders, files) via [`db::DocumentSeeder`]
//!
//! Every table is populated through a [`batch::BatchRun`]: rows are generated
//! from an explicitly seeded RNG, collected into fixed-size batches, and each
//! batch is written and committed before the next one starts.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let config = AnalyticsSeedConfig::default();
//! let pool = connect(PgTarget::METRICS.from_env()?).await?;
//! let mut rng = StdRng::seed_from_u64(config.seed);
//!
//! let summaries = Seeder::new(pool)
//!     .seed_analytics(&config, OffsetDateTime::now_utc(), &mut rng)
//!     .await?;
//! ```

pub mod batch;
pub mod config;
pub mod db;
pub mod generators;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::batch::{BatchRun, BatchSink, KeyRegistry, Merge, RunSummary};
    pub use crate::config::{
        AnalyticsSeedConfig, FileStoreSeedConfig, LoggingSeedConfig, PgTarget, SeedConfig,
        UserSeedConfig, load_seed_config, mongo_url,
    };
    pub use crate::db::{DocumentSeeder, MongoSink, PgSink, SeedError, Seeder, connect};
    pub use crate::generators::{
        AnalyticsGenerator, FileStoreGenerator, LogGenerator, UserGenerator,
    };
    pub use rand::{SeedableRng, rngs::StdRng};
    pub use time::OffsetDateTime;
}
