use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Mutex, MutexGuard};

use crate::store::repo::SoundStore;

/// Custom sound payloads in a single sqlite table.
pub struct SqliteSoundStore {
    conn: Mutex<Connection>,
}

impl SqliteSoundStore {
    pub fn open(path: &std::path::Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sounds (
                id    TEXT PRIMARY KEY,
                data  BLOB NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("sound store connection poisoned"))
    }
}

impl SoundStore for SqliteSoundStore {
    fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn()?;
        let data = conn
            .query_row(
                r#"SELECT data FROM sounds WHERE id=?1"#,
                params![id],
                |r| r.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(data)
    }

    fn put(&self, id: &str, data: &[u8]) -> Result<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO sounds (id, data) VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET data=excluded.data
            "#,
            params![id, data],
        )?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.conn()?
            .execute(r#"DELETE FROM sounds WHERE id=?1"#, params![id])?;
        Ok(())
    }
}
