//! Database integration for seeding generated data.
//!
//! Relational rows go through [`PgSink`] (one multi-row `INSERT` per batch,
//! committed before the next batch starts) and are orchestrated by
//! [`Seeder`]. Documents go through [`MongoSink`] and are orchestrated by
//! [`DocumentSeeder`].

mod documents;
mod postgres;
mod rows;
mod seeder;
mod users;

pub use documents::{DocumentSeeder, MongoSink};
pub use postgres::{InsertRow, PgSink, connect, insert_statement};
pub use seeder::{SeedError, Seeder};
pub use users::UserSink;
