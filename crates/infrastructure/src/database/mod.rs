use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use domain::DomainError;
use std::time::Duration;
use tracing::info;

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const IN_MEMORY: &str = ":memory:";

/// Per-connection pragmas. SQLite leaves foreign keys off unless asked.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the SQLite database at `database_url` and bring its
    /// schema up to date.
    pub fn new(database_url: &str, pool_size: u32) -> Result<Self, DomainError> {
        // Every connection to `:memory:` is a separate database, so the pool
        // must hold exactly one connection and never recycle it.
        let in_memory = database_url == IN_MEMORY;
        let max_size = if in_memory { 1 } else { pool_size.max(1) };

        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let mut builder = r2d2::Pool::builder()
            .max_size(max_size)
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout: Duration::from_secs(5),
            }));
        if in_memory {
            builder = builder.max_lifetime(None).idle_timeout(None);
        }

        let pool = builder
            .build(manager)
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let database = Database { pool };
        database.run_migrations()?;
        info!("Database ready at {} (pool size {})", database_url, max_size);
        Ok(database)
    }

    /// A private, empty database that lives as long as the pool.
    pub fn in_memory() -> Result<Self, DomainError> {
        Self::new(IN_MEMORY, 1)
    }

    fn run_migrations(&self) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DomainError::RepositoryError(format!("migration failed: {}", e)))?;
        if !applied.is_empty() {
            info!("Applied {} migration(s)", applied.len());
        }
        Ok(())
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}
