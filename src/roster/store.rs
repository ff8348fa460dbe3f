//! SQLite-backed roster behind an r2d2 connection pool

use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use super::{Roster, RosterEntry};
use crate::core::error::{AppError, AppResult};

pub type RosterPool = Pool<SqliteConnectionManager>;
pub type RosterConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new roster connection pool
///
/// Initializes the pool and ensures the roster schema exists. The table is
/// append-only from the application's point of view.
///
/// # Arguments
/// * `database_path` - Path to the SQLite database file
pub fn create_pool(database_path: &str) -> Result<RosterPool, AppError> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder().max_size(4).build(manager)?;

    let conn = pool.get()?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS roster (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nickname TEXT NOT NULL,
            game_id TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    Ok(pool)
}

/// Roster implementation over a pooled SQLite database
pub struct SqliteRoster {
    pool: RosterPool,
}

impl SqliteRoster {
    pub fn new(pool: RosterPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Roster for SqliteRoster {
    async fn append(&self, entry: &RosterEntry) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO roster (nickname, game_id) VALUES (?1, ?2)",
            params![entry.nickname, entry.game_id],
        )?;
        log::info!("Roster row added: {} | {}", entry.nickname, entry.game_id);
        Ok(())
    }

    async fn read_all(&self) -> AppResult<Vec<RosterEntry>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nickname, game_id FROM roster ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(RosterEntry {
                nickname: row.get(0)?,
                game_id: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
