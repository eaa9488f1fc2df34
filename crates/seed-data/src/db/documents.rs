//! Document store seeding: tags, folders and files.

use std::time::Duration;

use async_trait::async_trait;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use rand::Rng;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use super::SeedError;
use crate::batch::{BatchRun, BatchSink, KeyRegistry, RunSummary};
use crate::config::{
    FILES_COLLECTION, FOLDERS_COLLECTION, FileStoreSeedConfig, MONGO_DATABASE, SeedConfig,
    TAGS_COLLECTION,
};
use crate::generators::{FileStoreGenerator, GeneratedFile, GeneratedFolder, GeneratedTag};

/// Writes each batch as one unordered bulk insert.
pub struct MongoSink<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T: Send + Sync> MongoSink<T> {
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl<T> BatchSink<T> for MongoSink<T>
where
    T: Serialize + Send + Sync + 'static,
{
    async fn flush(&mut self, docs: Vec<T>) -> Result<usize, SeedError> {
        if docs.is_empty() {
            return Ok(0);
        }

        let result = self.collection.insert_many(docs).ordered(false).await?;
        Ok(result.inserted_ids.len())
    }
}

/// Seeds the file-store collections.
pub struct DocumentSeeder {
    client: Client,
    database: Database,
}

impl DocumentSeeder {
    /// Connects to the deployment at `url` and targets the file-store database.
    pub async fn connect(url: &str) -> Result<Self, SeedError> {
        let mut options = ClientOptions::parse(url).await?;
        options.server_selection_timeout = Some(Duration::from_secs(10));
        let client = Client::with_options(options)?;

        Ok(Self::new(client))
    }

    pub fn new(client: Client) -> Self {
        Self::with_database(client, MONGO_DATABASE)
    }

    /// Targets a database other than the file-store default.
    pub fn with_database(client: Client, name: &str) -> Self {
        let database = client.database(name);
        Self { client, database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Seeds tags, then folders that reference them, then files that
    /// reference both.
    pub async fn seed_file_store(
        &self,
        config: &FileStoreSeedConfig,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<RunSummary>, SeedError> {
        config.validate()?;
        let mut store = FileStoreGenerator::with_config(config.generator.clone(), now);
        let mut tag_names = KeyRegistry::with_max_attempts(config.max_key_attempts);

        let mut tags = MongoSink::new(self.database.collection::<GeneratedTag>(TAGS_COLLECTION));
        let mut folders =
            MongoSink::new(self.database.collection::<GeneratedFolder>(FOLDERS_COLLECTION));
        let mut files = MongoSink::new(self.database.collection::<GeneratedFile>(FILES_COLLECTION));

        // All tags go out in a single batch.
        let tag_run = BatchRun::new(TAGS_COLLECTION, config.tag_count, config.tag_count.max(1))?;
        let tag_summary = tag_run
            .plain(&mut tags, || store.tag(&mut tag_names, rng))
            .await?;
        info!("Tags inserted: {}", tag_summary.written());

        let folder_run = BatchRun::new(
            FOLDERS_COLLECTION,
            config.folder_count,
            config.folder_batch_size,
        )?;
        let folder_summary = folder_run
            .plain(&mut folders, || Ok(store.folder(rng)))
            .await?;
        info!("Folders inserted: {}", folder_summary.written());

        let file_run = BatchRun::new(FILES_COLLECTION, config.file_count, config.file_batch_size)?;
        let file_summary = file_run.plain(&mut files, || Ok(store.file(rng))).await?;
        info!("Files inserted: {}", file_summary.written());

        Ok(vec![tag_summary, folder_summary, file_summary])
    }

    /// Closes the client once every pending operation is done.
    pub async fn close(self) {
        self.client.shutdown().await;
    }
}
