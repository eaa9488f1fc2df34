//! Audit log and version history generation.

use std::net::IpAddr;

use fake::{Fake, faker::internet::en::UserAgent};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use super::{check_range, check_size_range, naive, random_hex, random_ipv4};
use crate::db::SeedError;

const ACTIVITY_TYPES: [&str; 5] = ["upload", "download", "delete", "share", "rename"];
const RESOURCE_TYPES: [&str; 2] = ["file", "folder"];
const AUTH_ACTIONS: [&str; 3] = ["login", "logout", "mfa"];
const FILE_EXTENSIONS: [&str; 5] = [".pdf", ".jpg", ".txt", ".xls", ".zip"];

/// A user action against a file or folder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedActivityLog {
    pub user_id: i32,
    pub activity_type: &'static str,
    pub resource_id: i32,
    pub resource_type: &'static str,
    pub timestamp: PrimitiveDateTime,
    pub ip_address: IpAddr,
    pub user_agent: String,
}

/// A login, logout or MFA attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAuthEvent {
    pub user_id: i32,
    pub action_type: &'static str,
    pub timestamp: PrimitiveDateTime,
    pub ip_address: IpAddr,
    pub user_agent: String,
    pub success: bool,
}

/// A stored revision of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedVersion {
    pub file_id: i32,
    pub created_by: i32,
    pub created_at: PrimitiveDateTime,
    pub version_path: String,
    pub size: i64,
    pub checksum: String,
}

/// Configuration for log generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogGenConfig {
    /// Inclusive range of user ids.
    pub user_ids: (i32, i32),
    /// Inclusive range of file ids for version history.
    pub file_ids: (i32, i32),
    /// Upper bound of activity resource ids.
    pub max_resource_id: i32,
    /// How far back timestamps reach.
    pub history_days: i64,
    /// Probability that an authentication attempt succeeds.
    pub auth_success_rate: f64,
    /// Inclusive range of stored file sizes in bytes.
    pub version_size_bytes: (i64, i64),
    /// Bucket name used in version paths.
    pub bucket: String,
}

impl Default for LogGenConfig {
    fn default() -> Self {
        Self {
            user_ids: (1, 5_000),
            file_ids: (1, 20_000),
            max_resource_id: 100_000,
            history_days: 365,
            auth_success_rate: 0.92,
            version_size_bytes: (1_000, 50_000_000),
            bucket: "bucket".to_string(),
        }
    }
}

impl LogGenConfig {
    /// Rejects id and size ranges a generator could not sample from.
    pub fn validate(&self) -> Result<(), SeedError> {
        check_range("user_ids", &self.user_ids)?;
        check_range("file_ids", &self.file_ids)?;
        check_range("resource ids", &(1, self.max_resource_id))?;
        check_size_range("version_size_bytes", &self.version_size_bytes)
    }
}

/// Generates log entries relative to a fixed "now".
pub struct LogGenerator {
    config: LogGenConfig,
    now: OffsetDateTime,
}

impl LogGenerator {
    /// Creates a generator with default configuration.
    pub fn new(now: OffsetDateTime) -> Self {
        Self::with_config(LogGenConfig::default(), now)
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: LogGenConfig, now: OffsetDateTime) -> Self {
        Self { config, now }
    }

    /// Generates an activity log entry.
    pub fn activity(&self, rng: &mut impl Rng) -> GeneratedActivityLog {
        GeneratedActivityLog {
            user_id: self.user_id(rng),
            activity_type: pick(&ACTIVITY_TYPES, rng),
            resource_id: rng.gen_range(1..=self.config.max_resource_id),
            resource_type: pick(&RESOURCE_TYPES, rng),
            timestamp: self.timestamp(rng),
            ip_address: random_ipv4(rng),
            user_agent: UserAgent().fake_with_rng(rng),
        }
    }

    /// Generates an authentication log entry.
    pub fn auth_event(&self, rng: &mut impl Rng) -> GeneratedAuthEvent {
        GeneratedAuthEvent {
            user_id: self.user_id(rng),
            action_type: pick(&AUTH_ACTIONS, rng),
            timestamp: self.timestamp(rng),
            ip_address: random_ipv4(rng),
            user_agent: UserAgent().fake_with_rng(rng),
            success: rng.r#gen::<f64>() < self.config.auth_success_rate,
        }
    }

    /// Generates a version history entry.
    pub fn version(&self, rng: &mut impl Rng) -> GeneratedVersion {
        let (lo, hi) = self.config.file_ids;
        let file_id = rng.gen_range(lo..=hi);
        let created_by = self.user_id(rng);
        let created_at = self.timestamp(rng);
        let revision: u32 = rng.gen_range(1..=10);
        let extension = pick(&FILE_EXTENSIONS, rng);
        let (min_size, max_size) = self.config.version_size_bytes;

        GeneratedVersion {
            file_id,
            created_by,
            created_at,
            version_path: format!(
                "s3://{}/{file_id}/v{revision}{extension}",
                self.config.bucket
            ),
            size: rng.gen_range(min_size..=max_size),
            checksum: random_hex(rng, 32),
        }
    }

    fn user_id(&self, rng: &mut impl Rng) -> i32 {
        let (lo, hi) = self.config.user_ids;
        rng.gen_range(lo..=hi)
    }

    /// A whole number of days back plus up to one extra day of seconds.
    fn timestamp(&self, rng: &mut impl Rng) -> PrimitiveDateTime {
        let days = rng.gen_range(0..=self.config.history_days.max(0));
        let seconds = rng.gen_range(0..=86_400);
        naive(self.now - Duration::days(days) - Duration::seconds(seconds))
    }
}

fn pick(options: &[&'static str], rng: &mut impl Rng) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}
