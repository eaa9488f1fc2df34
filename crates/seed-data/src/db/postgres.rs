//! Multi-row inserts into PostgreSQL.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::SeedError;
use crate::batch::BatchSink;

/// A generated row that maps onto a table.
pub trait InsertRow: Send + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Clause appended after the `VALUES` list, such as an upsert policy.
    const ON_CONFLICT: Option<&'static str> = None;

    /// Binds the row's values in `COLUMNS` order.
    fn push_binds<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>);
}

/// Builds a single `INSERT ... VALUES (...), (...)` statement for `rows`.
pub fn insert_statement<R: InsertRow>(rows: &[R]) -> QueryBuilder<'static, Postgres> {
    let mut statement = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        R::TABLE,
        R::COLUMNS.join(", ")
    ));
    statement.push_values(rows, |mut values, row| row.push_binds(&mut values));

    if let Some(clause) = R::ON_CONFLICT {
        statement.push(" ");
        statement.push(clause);
    }

    statement
}

/// Opens the single connection a seeding run works over.
pub async fn connect(options: PgConnectOptions) -> Result<PgPool, SeedError> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Writes each batch as one statement inside its own transaction.
pub struct PgSink<R> {
    pool: PgPool,
    _rows: PhantomData<fn() -> R>,
}

impl<R> PgSink<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _rows: PhantomData,
        }
    }
}

#[async_trait]
impl<R: InsertRow> BatchSink<R> for PgSink<R> {
    async fn flush(&mut self, rows: Vec<R>) -> Result<usize, SeedError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut statement = insert_statement(&rows);
        let result = statement.build().execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.rows_affected() as usize)
    }
}
