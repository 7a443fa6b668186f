use crate::domain::model::{ProjectId, Rule};
use crate::domain::ports::DomainStore;
use crate::utils::error::Result;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tokio::sync::Mutex;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS domains (
        project_id INTEGER,
        name TEXT PRIMARY KEY
    );
    CREATE TABLE IF NOT EXISTS rules (
        project_id INTEGER PRIMARY KEY,
        regexp TEXT
    );
";

const SELECT_PROJECT_IDS: &str = "SELECT DISTINCT project_id FROM domains ORDER BY project_id";

const SELECT_DOMAIN_NAMES: &str = "SELECT name FROM domains WHERE project_id = ?1 ORDER BY rowid";

const UPSERT_RULE: &str = "
    INSERT INTO rules (project_id, regexp) VALUES (?1, ?2)
    ON CONFLICT(project_id) DO UPDATE SET regexp = excluded.regexp
";

/// One SQLite connection held for the whole run.
///
/// Staged rules live in an open transaction until `commit`. Dropping the
/// store with a transaction still open rolls it back.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens an existing database file. Missing tables are created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::from_connection(conn)
    }

    /// Opens or creates a database file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts domain rows; used to seed fixtures and imports.
    pub async fn add_domains(&self, project_id: ProjectId, names: &[&str]) -> Result<usize> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached("INSERT INTO domains (project_id, name) VALUES (?1, ?2)")?;
        let mut inserted = 0;
        for name in names {
            inserted += stmt.execute(params![project_id, name])?;
        }
        Ok(inserted)
    }

    /// Reads back the rules visible on this connection.
    pub async fn rules(&self) -> Result<Vec<Rule>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT project_id, regexp FROM rules ORDER BY project_id")?;
        let rules = stmt
            .query_map([], |row| {
                Ok(Rule {
                    project_id: row.get(0)?,
                    regexp: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rules)
    }

    pub async fn in_transaction(&self) -> bool {
        !self.conn.lock().await.is_autocommit()
    }
}

impl DomainStore for SqliteStore {
    async fn project_ids(&self) -> Result<Vec<ProjectId>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(SELECT_PROJECT_IDS)?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<ProjectId>>>()?;
        Ok(ids)
    }

    async fn domain_names(&self, project_id: ProjectId) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(SELECT_DOMAIN_NAMES)?;
        let names = stmt
            .query_map(params![project_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    async fn stage_rules(&self, rules: &[Rule]) -> Result<usize> {
        let conn = self.conn.lock().await;
        if conn.is_autocommit() {
            conn.execute_batch("BEGIN")?;
        }

        let mut stmt = conn.prepare_cached(UPSERT_RULE)?;
        for rule in rules {
            stmt.execute(params![rule.project_id, rule.regexp])?;
        }
        tracing::debug!("Staged {} rules in open transaction", rules.len());
        Ok(rules.len())
    }

    async fn commit(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        if !conn.is_autocommit() {
            conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        let conn = self.conn.get_mut();
        if !conn.is_autocommit() {
            tracing::warn!("Rolling back uncommitted rules on close");
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                tracing::error!("Rollback on close failed: {}", e);
            }
        }
    }
}
