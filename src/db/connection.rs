use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tracing::info;

use crate::errors::ServerError;

// Thread-local connection slots, one per database path.
thread_local! {
    static DB_CONNS: RefCell<HashMap<String, Connection>> = RefCell::new(HashMap::new());
}

#[derive(Debug, Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Provides this thread's connection to the closure, opening it on first use.
    ///
    /// `f` must not call `with_conn` again.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        DB_CONNS
            .try_with(|cell| {
                let mut conns = cell
                    .try_borrow_mut()
                    .map_err(|_| ServerError::Internal("nested database access".into()))?;

                let conn = match conns.entry(self.path.clone()) {
                    Entry::Occupied(slot) => slot.into_mut(),
                    Entry::Vacant(slot) => {
                        let conn = Connection::open(&self.path)
                            .map_err(|e| ServerError::Db(format!("Open DB failed: {e}")))?;
                        conn.busy_timeout(Duration::from_secs(5))?;
                        slot.insert(conn)
                    }
                };

                f(conn)
            })
            .map_err(|_| ServerError::Internal("thread-local connection unavailable".into()))?
    }
}

/// Initialize database from a SQL schema file
pub fn init_db(db: &Database, schema_path: &str) -> Result<(), ServerError> {
    let schema_sql = fs::read_to_string(schema_path)
        .map_err(|e| ServerError::Db(format!("Failed to read schema file: {e}")))?;

    db.with_conn(|conn| {
        conn.execute_batch(&schema_sql)
            .map_err(|e| ServerError::Db(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    info!(schema = schema_path, db = db.path(), "database initialized");
    Ok(())
}
