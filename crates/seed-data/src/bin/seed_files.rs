//! Seeds the file-store collections: tags, folders and files.
//!
//! Run with:
//! ```
//! MONGO_URL=mongodb://... cargo run -p seed-data --bin seed_files
//! ```

use rand::{SeedableRng, rngs::StdRng};
use seed_data::config::{self, FileStoreSeedConfig};
use seed_data::db::DocumentSeeder;
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

    let lookup = |name: &str| std::env::var(name).ok();
    let config: FileStoreSeedConfig = config::load_seed_config(lookup)?;
    let seeder = DocumentSeeder::connect(&config::mongo_url(lookup)?).await?;

    tracing::info!("Connected to document store");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let summaries = seeder
        .seed_file_store(&config, OffsetDateTime::now_utc(), &mut rng)
        .await?;

    for summary in &summaries {
        tracing::info!("  {}: {} documents", summary.label, summary.written());
    }

    seeder.close().await;
    tracing::info!("Seed completed!");

    Ok(())
}
