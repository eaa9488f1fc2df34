//! Analytics metric generation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};

use super::{check_range, gaussian, moment_within, naive, round2};
use crate::batch::{KeyRegistry, Merge};
use crate::db::SeedError;

/// Natural key of a file access row: one row per file per day.
pub type FileAccessKey = (i32, Date);

/// Daily view/download counters for a file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFileAccess {
    pub file_id: i32,
    pub date: Date,
    pub view_count: i32,
    pub download_count: i32,
    pub last_accessed_by_user: Option<i32>,
}

/// Daily activity counters for a user.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUserUsage {
    pub user_id: i32,
    pub date: Date,
    pub files_uploaded: i32,
    pub files_downloaded: i32,
    pub used_storage_mb: f64,
    pub active_minutes: i32,
    pub login_count: i32,
    pub shared_items_count: i32,
}

/// A sharing event with link counters.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSharingActivity {
    pub timestamp: PrimitiveDateTime,
    pub user_id: i32,
    pub date: Date,
    pub links_created: i32,
    pub shared_files: i32,
    pub revoked_links: i32,
}

/// One day of system-wide performance figures.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSystemPerformance {
    pub timestamp: PrimitiveDateTime,
    pub cpu_usage_percent: f64,
    pub disk_io_mb: f64,
    pub avg_response_time_ms: i32,
    pub active_sessions: i32,
    pub concurrent_uploads: i32,
}

/// Daily usage counters for a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTagUsage {
    pub tag_id: i32,
    pub date: Date,
    pub assigned_to_files: i32,
    pub assigned_to_folders: i32,
    pub search_hits: i32,
}

impl Merge for GeneratedTagUsage {
    type Key = (i32, Date);

    fn key(&self) -> Self::Key {
        (self.tag_id, self.date)
    }

    fn merge(&mut self, other: Self) {
        self.assigned_to_files += other.assigned_to_files;
        self.assigned_to_folders += other.assigned_to_folders;
        self.search_hits += other.search_hits;
    }
}

/// Configuration for analytics generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsGenConfig {
    /// Inclusive range of user ids, matching the users domain.
    pub user_ids: (i32, i32),
    /// Inclusive range of file ids, matching the file store.
    pub file_ids: (i32, i32),
    /// Inclusive range of tag ids, matching the file store.
    pub tag_ids: (i32, i32),
    /// How far back metric dates reach.
    pub history_days: i64,
    /// How far back tag usage dates reach.
    pub tag_history_days: i64,
    /// Probability that a file access row names the last user to open it.
    pub last_accessed_rate: f64,
}

impl Default for AnalyticsGenConfig {
    fn default() -> Self {
        Self {
            user_ids: (1, 5_000),
            file_ids: (1, 20_000),
            tag_ids: (1, 100),
            history_days: 365,
            tag_history_days: 180,
            last_accessed_rate: 0.7,
        }
    }
}

impl AnalyticsGenConfig {
    /// Rejects id ranges a generator could not sample from.
    pub fn validate(&self) -> Result<(), SeedError> {
        check_range("user_ids", &self.user_ids)?;
        check_range("file_ids", &self.file_ids)?;
        check_range("tag_ids", &self.tag_ids)
    }
}

/// Generates analytics metric rows relative to a fixed "now".
pub struct AnalyticsGenerator {
    config: AnalyticsGenConfig,
    now: OffsetDateTime,
}

impl AnalyticsGenerator {
    /// Creates a generator with default configuration.
    pub fn new(now: OffsetDateTime) -> Self {
        Self::with_config(AnalyticsGenConfig::default(), now)
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: AnalyticsGenConfig, now: OffsetDateTime) -> Self {
        Self { config, now }
    }

    pub fn config(&self) -> &AnalyticsGenConfig {
        &self.config
    }

    /// Number of distinct `(file_id, date)` pairs the configuration allows.
    pub fn file_access_key_space(&self) -> u64 {
        let (lo, hi) = self.config.file_ids;
        let files = (i64::from(hi) - i64::from(lo) + 1).max(0) as u64;
        files * (self.config.history_days.max(0) as u64 + 1)
    }

    /// Generates a file access row whose `(file_id, date)` was never produced
    /// before in this run.
    pub fn file_access(
        &self,
        keys: &mut KeyRegistry<FileAccessKey>,
        rng: &mut impl Rng,
    ) -> Result<GeneratedFileAccess, SeedError> {
        let (lo, hi) = self.config.file_ids;
        let (file_id, date) = keys.claim_with(|| {
            (
                rng.gen_range(lo..=hi),
                self.date_within(self.config.history_days, rng),
            )
        })?;

        let last_accessed_by_user = if rng.r#gen::<f64>() < self.config.last_accessed_rate {
            Some(self.user_id(rng))
        } else {
            None
        };

        Ok(GeneratedFileAccess {
            file_id,
            date,
            view_count: rng.gen_range(0..=800),
            download_count: rng.gen_range(0..=200),
            last_accessed_by_user,
        })
    }

    /// Generates a daily usage row for a random user.
    pub fn user_usage(&self, rng: &mut impl Rng) -> GeneratedUserUsage {
        let user_id = self.user_id(rng);
        let date = self.date_within(self.config.history_days, rng);
        let files_uploaded = rng.gen_range(0..=20);
        let files_downloaded = rng.gen_range(0..=40);

        GeneratedUserUsage {
            user_id,
            date,
            files_uploaded,
            files_downloaded,
            used_storage_mb: round2(rng.gen_range(10.0..8_000.0)),
            active_minutes: rng.gen_range(5..=480),
            login_count: rng.gen_range(0..=6),
            shared_items_count: rng.gen_range(0..=files_uploaded + files_downloaded),
        }
    }

    /// Generates a sharing event somewhere in the history window.
    pub fn sharing_activity(&self, rng: &mut impl Rng) -> GeneratedSharingActivity {
        let when = naive(moment_within(self.now, self.config.history_days, rng));
        let user_id = self.user_id(rng);
        let links_created = rng.gen_range(0..=5);

        GeneratedSharingActivity {
            timestamp: when,
            user_id,
            date: when.date(),
            links_created,
            shared_files: rng.gen_range(0..=15),
            revoked_links: rng.gen_range(0..=links_created),
        }
    }

    /// Generates performance figures for midnight `days_ago` days before today.
    pub fn system_performance(&self, days_ago: i64, rng: &mut impl Rng) -> GeneratedSystemPerformance {
        let day = self.now.date() - Duration::days(days_ago);
        let cpu = round2(gaussian(42.0, 15.0, rng));

        GeneratedSystemPerformance {
            timestamp: PrimitiveDateTime::new(day, Time::MIDNIGHT),
            cpu_usage_percent: cpu.clamp(0.0, 99.99),
            disk_io_mb: round2(gaussian(500.0, 200.0, rng).abs()),
            avg_response_time_ms: (gaussian(120.0, 40.0, rng) as i32).abs(),
            active_sessions: (gaussian(350.0, 150.0, rng) as i32).abs(),
            concurrent_uploads: (gaussian(80.0, 40.0, rng) as i32).abs(),
        }
    }

    /// Generates one tag usage observation; several may share a key.
    pub fn tag_usage(&self, rng: &mut impl Rng) -> GeneratedTagUsage {
        let (lo, hi) = self.config.tag_ids;

        GeneratedTagUsage {
            tag_id: rng.gen_range(lo..=hi),
            date: self.date_within(self.config.tag_history_days, rng),
            assigned_to_files: rng.gen_range(0..=50),
            assigned_to_folders: rng.gen_range(0..=20),
            search_hits: rng.gen_range(0..=120),
        }
    }

    fn user_id(&self, rng: &mut impl Rng) -> i32 {
        let (lo, hi) = self.config.user_ids;
        rng.gen_range(lo..=hi)
    }

    fn date_within(&self, days: i64, rng: &mut impl Rng) -> Date {
        self.now.date() - Duration::days(rng.gen_range(0..=days.max(0)))
    }
}
