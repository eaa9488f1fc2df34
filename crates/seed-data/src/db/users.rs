//! User batches with their dependent plans and sessions.

use async_trait::async_trait;
use rand::rngs::StdRng;
use sqlx::PgPool;
use tracing::debug;

use super::{SeedError, insert_statement};
use crate::batch::BatchSink;
use crate::generators::{GeneratedPlan, GeneratedSession, GeneratedUser, UserGenerator};

/// Inserts a batch of users, then one plan and a handful of sessions for
/// every id the database handed back, all in one transaction.
pub struct UserSink {
    pool: PgPool,
    users: UserGenerator,
    rng: StdRng,
}

impl UserSink {
    /// `rng` drives plan and session generation and should be forked from
    /// the run's generator so user rows stay reproducible on their own.
    pub fn new(pool: PgPool, users: UserGenerator, rng: StdRng) -> Self {
        Self { pool, users, rng }
    }

    /// Builds the dependent rows for freshly inserted users.
    pub fn dependents(&mut self, user_ids: &[i64]) -> (Vec<GeneratedPlan>, Vec<GeneratedSession>) {
        let mut plans = Vec::with_capacity(user_ids.len());
        let mut sessions = Vec::new();

        for &user_id in user_ids {
            plans.push(self.users.plan_for(user_id, &mut self.rng));
            sessions.extend(self.users.sessions_for(user_id, &mut self.rng));
        }

        (plans, sessions)
    }
}

#[async_trait]
impl BatchSink<GeneratedUser> for UserSink {
    async fn flush(&mut self, rows: Vec<GeneratedUser>) -> Result<usize, SeedError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        let mut statement = insert_statement(&rows);
        statement.push(" RETURNING user_id::bigint");
        let user_ids: Vec<i64> = statement
            .build_query_scalar()
            .fetch_all(&mut *tx)
            .await?;

        let (plans, sessions) = self.dependents(&user_ids);
        debug!(
            "Inserting {} plans and {} sessions",
            plans.len(),
            sessions.len()
        );

        if !plans.is_empty() {
            insert_statement(&plans).build().execute(&mut *tx).await?;
        }
        if !sessions.is_empty() {
            insert_statement(&sessions).build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(user_ids.len())
    }
}
