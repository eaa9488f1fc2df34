//! File-store document generation: tags, folders and files.
//!
//! Folders may nest under folders generated earlier in the same run, and files
//! always sit in an existing folder, so the generator keeps the ids and tag
//! names it has handed out.

use fake::{Fake, faker::lorem::en::Word};
use mongodb::bson::{DateTime, oid::ObjectId};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::{check_size_range, random_hex};
use crate::batch::KeyRegistry;
use crate::db::SeedError;

/// Parent id stored on top-level folders.
pub const ROOT_FOLDER_ID: &str = "0";

const MIME_TYPES: [(&str, &str); 5] = [
    ("application/pdf", ".pdf"),
    ("image/jpeg", ".jpg"),
    ("text/plain", ".txt"),
    ("application/vnd.ms-excel", ".xls"),
    ("application/zip", ".zip"),
];

/// A tag document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTag {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tag_name: String,
    pub created_by: String,
    pub created_at: DateTime,
}

/// A folder document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFolder {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub owner_id: String,
    pub name: String,
    pub parent_folder_id: String,
    pub created_at: DateTime,
    pub last_modified: DateTime,
    pub is_deleted: bool,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub shared_with: Vec<String>,
    pub has_active_link: bool,
    pub access_count: i32,
    pub last_accessed_at: DateTime,
}

/// A file document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub owner_id: String,
    pub file_name: String,
    pub parent_folder_id: String,
    pub size: i64,
    pub mime_type: String,
    pub created_at: DateTime,
    pub last_modified: DateTime,
    pub is_deleted: bool,
    pub tags: Vec<String>,
    pub version: i32,
    pub checksum: String,
    pub encryption_key: String,
    pub is_public: bool,
    pub shared_with: Vec<String>,
    pub has_active_link: bool,
    pub download_count: i32,
    pub view_count: i32,
    pub last_accessed_at: DateTime,
    pub last_accessed_by: String,
}

/// Configuration for file-store generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreGenConfig {
    /// Size of the `userNNN` owner pool.
    pub user_pool_size: usize,
    /// How far back creation dates reach.
    pub history_days: i64,
    /// Probability that a folder nests under an earlier folder.
    pub nested_folder_rate: f64,
    pub folder_public_rate: f64,
    pub folder_link_rate: f64,
    pub file_public_rate: f64,
    pub file_link_rate: f64,
    /// Most tags attached to a folder.
    pub max_folder_tags: usize,
    /// Most tags attached to a file.
    pub max_file_tags: usize,
    /// Most users a folder is shared with.
    pub max_folder_shares: usize,
    /// Most users a file is shared with.
    pub max_file_shares: usize,
    /// Inclusive range of file sizes in bytes.
    pub file_size_bytes: (i64, i64),
}

impl Default for FileStoreGenConfig {
    fn default() -> Self {
        Self {
            user_pool_size: 400,
            history_days: 730,
            nested_folder_rate: 0.7,
            folder_public_rate: 0.05,
            folder_link_rate: 0.10,
            file_public_rate: 0.04,
            file_link_rate: 0.15,
            max_folder_tags: 3,
            max_file_tags: 4,
            max_folder_shares: 4,
            max_file_shares: 6,
            file_size_bytes: (10_000, 10_000_000),
        }
    }
}

impl FileStoreGenConfig {
    /// Rejects size ranges a generator could not sample from.
    pub fn validate(&self) -> Result<(), SeedError> {
        check_size_range("file_size_bytes", &self.file_size_bytes)
    }
}

/// Generates file-store documents relative to a fixed "now".
pub struct FileStoreGenerator {
    config: FileStoreGenConfig,
    now: OffsetDateTime,
    user_pool: Vec<String>,
    tag_names: Vec<String>,
    folder_ids: Vec<String>,
}

impl FileStoreGenerator {
    /// Creates a generator with default configuration.
    pub fn new(now: OffsetDateTime) -> Self {
        Self::with_config(FileStoreGenConfig::default(), now)
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: FileStoreGenConfig, now: OffsetDateTime) -> Self {
        let user_pool = (1..=config.user_pool_size)
            .map(|n| format!("user{n:03}"))
            .collect();

        Self {
            config,
            now,
            user_pool,
            tag_names: Vec::new(),
            folder_ids: Vec::new(),
        }
    }

    pub fn user_pool(&self) -> &[String] {
        &self.user_pool
    }

    pub fn tag_names(&self) -> &[String] {
        &self.tag_names
    }

    pub fn folder_ids(&self) -> &[String] {
        &self.folder_ids
    }

    /// Generates a tag whose name is unused so far in this run.
    pub fn tag(
        &mut self,
        names: &mut KeyRegistry<String>,
        rng: &mut impl Rng,
    ) -> Result<GeneratedTag, SeedError> {
        let tag_name = names.claim_with(|| Word().fake_with_rng(rng))?;
        self.tag_names.push(tag_name.clone());

        Ok(GeneratedTag {
            id: self.object_id(rng),
            tag_name,
            created_by: self.pick_user(rng),
            created_at: bson_time(self.created_at(rng)),
        })
    }

    /// Generates a folder, possibly nested under an earlier folder.
    pub fn folder(&mut self, rng: &mut impl Rng) -> GeneratedFolder {
        let id = self.object_id(rng);
        let parent_folder_id = match self.folder_ids.choose(rng) {
            Some(parent) if rng.r#gen::<f64>() < self.config.nested_folder_rate => parent.clone(),
            _ => ROOT_FOLDER_ID.to_string(),
        };
        let created_at = self.created_at(rng);
        let name: String = Word().fake_with_rng(rng);

        let folder = GeneratedFolder {
            id,
            owner_id: self.pick_user(rng),
            name: capitalize(&name),
            parent_folder_id,
            created_at: bson_time(created_at),
            last_modified: bson_time(created_at + Duration::days(rng.gen_range(0..=30))),
            is_deleted: false,
            tags: sample(&self.tag_names, self.config.max_folder_tags, rng),
            is_public: rng.r#gen::<f64>() < self.config.folder_public_rate,
            shared_with: sample(&self.user_pool, self.config.max_folder_shares, rng),
            has_active_link: rng.r#gen::<f64>() < self.config.folder_link_rate,
            access_count: rng.gen_range(0..=200),
            last_accessed_at: bson_time(created_at + Duration::days(rng.gen_range(0..=60))),
        };

        self.folder_ids.push(id.to_hex());
        folder
    }

    /// Generates a file inside one of the folders generated so far.
    pub fn file(&self, rng: &mut impl Rng) -> GeneratedFile {
        let (mime_type, extension) = MIME_TYPES.choose(rng).copied().unwrap_or(MIME_TYPES[0]);
        let created_at = self.created_at(rng);
        let stem: String = Word().fake_with_rng(rng);
        let (min_size, max_size) = self.config.file_size_bytes;

        GeneratedFile {
            id: self.object_id(rng),
            owner_id: self.pick_user(rng),
            file_name: format!("{stem}{}{extension}", rng.gen_range(0..1_000)),
            parent_folder_id: self
                .folder_ids
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| ROOT_FOLDER_ID.to_string()),
            size: rng.gen_range(min_size..=max_size),
            mime_type: mime_type.to_string(),
            created_at: bson_time(created_at),
            last_modified: bson_time(created_at + Duration::days(rng.gen_range(0..=90))),
            is_deleted: false,
            tags: sample(&self.tag_names, self.config.max_file_tags, rng),
            version: rng.gen_range(1..=10),
            checksum: random_hex(rng, 32),
            encryption_key: random_hex(rng, 40),
            is_public: rng.r#gen::<f64>() < self.config.file_public_rate,
            shared_with: sample(&self.user_pool, self.config.max_file_shares, rng),
            has_active_link: rng.r#gen::<f64>() < self.config.file_link_rate,
            download_count: rng.gen_range(0..=1_000),
            view_count: rng.gen_range(0..=2_000),
            last_accessed_at: bson_time(created_at + Duration::days(rng.gen_range(0..=90))),
            last_accessed_by: self.pick_user(rng),
        }
    }

    /// Object id stamped with "now", the remaining bytes drawn from `rng`.
    fn object_id(&self, rng: &mut impl Rng) -> ObjectId {
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&(self.now.unix_timestamp() as u32).to_be_bytes());
        rng.fill(&mut bytes[4..]);
        ObjectId::from_bytes(bytes)
    }

    fn created_at(&self, rng: &mut impl Rng) -> OffsetDateTime {
        self.now - Duration::days(rng.gen_range(0..=self.config.history_days.max(0)))
    }

    fn pick_user(&self, rng: &mut impl Rng) -> String {
        self.user_pool.choose(rng).cloned().unwrap_or_default()
    }
}

/// Picks between zero and `max` distinct entries.
fn sample(pool: &[String], max: usize, rng: &mut impl Rng) -> Vec<String> {
    let amount = rng.gen_range(0..=max.min(pool.len()));
    pool.choose_multiple(rng, amount).cloned().collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn bson_time(at: OffsetDateTime) -> DateTime {
    DateTime::from_millis((at.unix_timestamp_nanos() / 1_000_000) as i64)
}
