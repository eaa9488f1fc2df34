//! User account generation with subscription plans and sessions.

use std::net::IpAddr;

use fake::{
    Fake,
    faker::{internet::en::UserAgent, name::en::Name},
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use super::{check_range, moment_within, naive, random_hex, random_ipv4};
use crate::batch::KeyRegistry;
use crate::db::SeedError;

/// Generated user data ready for database insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub profile_picture: String,
    pub created_at: PrimitiveDateTime,
    pub last_login: PrimitiveDateTime,
    pub email_verified: bool,
    pub is_activated: bool,
    pub account_type: String,
    pub storage_quota: i64,
    pub used_storage: i64,
}

/// Subscription plan attached to an inserted user.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub user_id: i64,
    pub name: &'static str,
    pub description: &'static str,
    pub storage_limit: i64,
    pub price: f64,
    pub is_active: bool,
}

/// Login session attached to an inserted user.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSession {
    pub user_id: i64,
    pub is_active: bool,
    pub device_info: String,
    pub ip_address: IpAddr,
    pub created_at: PrimitiveDateTime,
    pub expires_at: PrimitiveDateTime,
}

/// A purchasable plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanTier {
    pub name: &'static str,
    pub description: &'static str,
    pub storage_limit: i64,
    pub price: f64,
}

/// Plans offered by the app, cheapest first.
pub const PLAN_TIERS: [PlanTier; 3] = [
    PlanTier {
        name: "Free",
        description: "Plan gratuito",
        storage_limit: 5_000,
        price: 0.00,
    },
    PlanTier {
        name: "Básico",
        description: "Hasta 100 GB",
        storage_limit: 100_000,
        price: 3.99,
    },
    PlanTier {
        name: "Premium",
        description: "Hasta 1 TB + extras",
        storage_limit: 1_000_000,
        price: 9.99,
    },
];

/// Configuration for user generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGenConfig {
    /// Cumulative probability thresholds for picking each plan tier.
    pub plan_distribution: [f64; 3],
    /// Storage quotas a user may be given.
    pub storage_quotas: Vec<i64>,
    /// Probability that the email is verified.
    pub email_verified_rate: f64,
    /// Probability that the account is activated.
    pub activated_rate: f64,
    /// Account type label stored on every user.
    pub account_type: String,
    /// How far back account creation and last login reach.
    pub history_days: i64,
    /// Inclusive range of sessions per user.
    pub sessions_per_user: (usize, usize),
    /// How far back session creation reaches.
    pub session_window_days: i64,
    /// Inclusive range of session lifetimes in days.
    pub session_lifetime_days: (i64, i64),
    /// Email domains to draw from.
    pub email_domains: Vec<String>,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            plan_distribution: [0.60, 0.90, 1.0],
            storage_quotas: vec![5_000, 100_000, 1_000_000],
            email_verified_rate: 0.7,
            activated_rate: 0.9,
            account_type: "free".to_string(),
            history_days: 730,
            sessions_per_user: (1, 5),
            session_window_days: 90,
            session_lifetime_days: (1, 14),
            email_domains: vec![
                "gmail.com".to_string(),
                "outlook.com".to_string(),
                "yahoo.com".to_string(),
                "proton.me".to_string(),
            ],
        }
    }
}

impl UserGenConfig {
    /// Rejects quotas and ranges a generator could not sample from.
    pub fn validate(&self) -> Result<(), SeedError> {
        if self.storage_quotas.is_empty() {
            return Err(SeedError::InvalidConfig(
                "storage_quotas must list at least one quota".to_string(),
            ));
        }
        if let Some(quota) = self.storage_quotas.iter().find(|&&q| q < 0) {
            return Err(SeedError::InvalidConfig(format!(
                "storage_quotas must not be negative, got {quota}"
            )));
        }
        check_range("sessions_per_user", &self.sessions_per_user)?;
        check_range("session_lifetime_days", &self.session_lifetime_days)
    }
}

/// Generates realistic user data for testing.
#[derive(Debug, Clone)]
pub struct UserGenerator {
    config: UserGenConfig,
    now: OffsetDateTime,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new(now: OffsetDateTime) -> Self {
        Self::with_config(UserGenConfig::default(), now)
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig, now: OffsetDateTime) -> Self {
        Self { config, now }
    }

    /// Generates a single user with an email unused so far in this run.
    pub fn generate(
        &self,
        emails: &mut KeyRegistry<String>,
        rng: &mut impl Rng,
    ) -> Result<GeneratedUser, SeedError> {
        let full_name: String = Name().fake_with_rng(rng);
        let email = emails.claim_with(|| self.generate_email(&full_name, rng))?;

        let storage_quota = self
            .config
            .storage_quotas
            .choose(rng)
            .copied()
            .unwrap_or(PLAN_TIERS[0].storage_limit);

        Ok(GeneratedUser {
            email,
            password_hash: random_hex(rng, 64),
            profile_picture: format!(
                "https://picsum.photos/seed/{}/256/256",
                rng.gen_range(1..100_000)
            ),
            full_name,
            created_at: naive(moment_within(self.now, self.config.history_days, rng)),
            last_login: naive(moment_within(self.now, self.config.history_days, rng)),
            email_verified: rng.r#gen::<f64>() < self.config.email_verified_rate,
            is_activated: rng.r#gen::<f64>() < self.config.activated_rate,
            account_type: self.config.account_type.clone(),
            storage_quota,
            used_storage: rng.gen_range(0..=storage_quota),
        })
    }

    /// Picks a plan for an inserted user according to the plan distribution.
    pub fn plan_for(&self, user_id: i64, rng: &mut impl Rng) -> GeneratedPlan {
        let tier = self.pick_tier(rng);

        GeneratedPlan {
            user_id,
            name: tier.name,
            description: tier.description,
            storage_limit: tier.storage_limit,
            price: tier.price,
            is_active: true,
        }
    }

    /// Generates the login sessions of an inserted user.
    pub fn sessions_for(&self, user_id: i64, rng: &mut impl Rng) -> Vec<GeneratedSession> {
        let (min, max) = self.config.sessions_per_user;
        let (min_life, max_life) = self.config.session_lifetime_days;
        let count = rng.gen_range(min..=max);

        (0..count)
            .map(|_| {
                let created = moment_within(self.now, self.config.session_window_days, rng);
                let expires = created + Duration::days(rng.gen_range(min_life..=max_life));

                GeneratedSession {
                    user_id,
                    is_active: expires > self.now,
                    device_info: UserAgent().fake_with_rng(rng),
                    ip_address: random_ipv4(rng),
                    created_at: naive(created),
                    expires_at: naive(expires),
                }
            })
            .collect()
    }

    /// Generates an email from a name.
    fn generate_email(&self, name: &str, rng: &mut impl Rng) -> String {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");

        let suffix: u32 = rng.gen_range(1..9999);
        let domain = self
            .config
            .email_domains
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("example.com");

        format!("{normalized}{suffix}@{domain}")
    }

    fn pick_tier(&self, rng: &mut impl Rng) -> PlanTier {
        let roll: f64 = rng.r#gen();

        self.config
            .plan_distribution
            .iter()
            .position(|&threshold| roll < threshold)
            .map(|idx| PLAN_TIERS[idx])
            .unwrap_or(PLAN_TIERS[PLAN_TIERS.len() - 1])
    }
}
