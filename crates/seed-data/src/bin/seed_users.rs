//! Seeds user accounts with their subscription plans and sessions.
//!
//! Run with:
//! ```
//! DATABASE_URL=postgres://... cargo run -p seed-data --bin seed_users
//! ```

use rand::{SeedableRng, rngs::StdRng};
use seed_data::config::{self, PgTarget, UserSeedConfig};
use seed_data::db::{self, Seeder};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: UserSeedConfig = config::load_seed_config(|name| std::env::var(name).ok())?;
    let pool = db::connect(PgTarget::USERS.from_env()?).await?;

    tracing::info!("Connected to database");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let summary = Seeder::new(pool.clone())
        .seed_users(&config, OffsetDateTime::now_utc(), &mut rng)
        .await?;

    tracing::info!(
        "  Users: {} in {} batches",
        summary.written(),
        summary.batches()
    );

    pool.close().await;
    tracing::info!("Seed completed!");

    Ok(())
}
