//! Row generators for seeded data.
//!
//! This module provides generators for each seeded domain:
//! - [`AnalyticsGenerator`]: file access, usage, sharing, performance and tag metrics
//! - [`LogGenerator`]: activity, authentication and version history entries
//! - [`UserGenerator`]: user accounts with their plans and sessions
//! - [`FileStoreGenerator`]: tag, folder and file documents

pub mod analytics;
pub mod file_store;
pub mod logging;
pub mod user;

use std::fmt::Debug;
use std::net::{IpAddr, Ipv4Addr};

use rand::Rng;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use crate::db::SeedError;

pub use analytics::{
    AnalyticsGenConfig, AnalyticsGenerator, FileAccessKey, GeneratedFileAccess,
    GeneratedSharingActivity, GeneratedSystemPerformance, GeneratedTagUsage, GeneratedUserUsage,
};
pub use file_store::{
    FileStoreGenConfig, FileStoreGenerator, GeneratedFile, GeneratedFolder, GeneratedTag,
};
pub use logging::{
    GeneratedActivityLog, GeneratedAuthEvent, GeneratedVersion, LogGenConfig, LogGenerator,
};
pub use user::{GeneratedPlan, GeneratedSession, GeneratedUser, PlanTier, UserGenConfig, UserGenerator};

/// Lowest and highest addresses handed out; keeps clear of the reserved low
/// and multicast/experimental high ranges.
const IPV4_RANGE: (u32, u32) = (0x0B00_0000, 0xDF00_0000);

/// Returns a random routable IPv4 address.
pub(crate) fn random_ipv4(rng: &mut impl Rng) -> IpAddr {
    IpAddr::V4(Ipv4Addr::from(rng.gen_range(IPV4_RANGE.0..=IPV4_RANGE.1)))
}

/// Returns `len` random lowercase hex digits.
pub(crate) fn random_hex(rng: &mut impl Rng, len: usize) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    (0..len)
        .map(|_| DIGITS[rng.gen_range(0..16)] as char)
        .collect()
}

/// Drops the offset from a UTC timestamp for `timestamp without time zone` columns.
pub(crate) fn naive(at: OffsetDateTime) -> PrimitiveDateTime {
    PrimitiveDateTime::new(at.date(), at.time())
}

/// Returns a moment uniformly distributed in the `days` days before `now`.
pub(crate) fn moment_within(now: OffsetDateTime, days: i64, rng: &mut impl Rng) -> OffsetDateTime {
    let span = Duration::days(days.max(0)).whole_seconds();
    now - Duration::seconds(rng.gen_range(0..=span))
}

/// Samples a normal distribution without a fallible constructor.
pub(crate) fn gaussian(mean: f64, std_dev: f64, rng: &mut impl Rng) -> f64 {
    let z: f64 = rng.sample(rand_distr::StandardNormal);
    mean + std_dev * z
}

/// Rejects an inclusive range whose bounds are reversed.
pub(crate) fn check_range<T: PartialOrd + Debug>(
    field: &str,
    (lo, hi): &(T, T),
) -> Result<(), SeedError> {
    if lo > hi {
        return Err(SeedError::InvalidConfig(format!(
            "{field} range {lo:?}..={hi:?} is reversed"
        )));
    }
    Ok(())
}

/// Rejects an inclusive range of sizes that is reversed or dips below zero.
pub(crate) fn check_size_range(field: &str, range: &(i64, i64)) -> Result<(), SeedError> {
    check_range(field, range)?;
    if range.0 < 0 {
        return Err(SeedError::InvalidConfig(format!(
            "{field} must not be negative, got {}",
            range.0
        )));
    }
    Ok(())
}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
