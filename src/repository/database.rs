use anyhow::{Context, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// Handle to the SQLite store. The connection sits behind a mutex because
/// swap events arrive concurrently from every scan worker.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        let db_path = db_path.strip_prefix("sqlite:").unwrap_or(db_path);
        let conn = Connection::open(db_path).context("Failed to open database")?;

        let db = Database {
            inner: Arc::new(Mutex::new(conn)),
        };
        db.create_tables()?;
        Ok(db)
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.inner.lock().expect("database mutex poisoned")
    }

    fn create_tables(&self) -> Result<()> {
        let conn = self.conn();

        // The primary key on (tx_hash, event_type) is the authoritative dedup
        // for rescanned transactions.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS swap_events (
                tx_hash TEXT NOT NULL,
                event_type TEXT NOT NULL,
                token_address TEXT,
                block_number INTEGER NOT NULL,
                block_time INTEGER NOT NULL,
                amount TEXT NOT NULL,
                normalized_amount TEXT NOT NULL,
                user_address TEXT NOT NULL,
                PRIMARY KEY (tx_hash, event_type)
            )",
            [],
        )?;

        // Indexes for the downstream accounting reader
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_swap_events_block_number
             ON swap_events(block_number)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_swap_events_user
             ON swap_events(user_address)",
            [],
        )?;

        Ok(())
    }
}
