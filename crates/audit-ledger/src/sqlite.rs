//! SQLite-backed audit store on a dedicated executor thread.
//!
//! All SQL runs inside `conn.call()` on the executor thread; row conversion
//! happens back on the caller's side. Only SQL belongs inside `call()`.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::info;

use tracker_core::{AuditAction, AuditId, AuditRecord, UserId};

use crate::error::{AuditError, AuditResult};
use crate::migrations;
use crate::store::AuditStore;

/// Convert a tokio_rusqlite::Error to AuditError.
fn from_tokio_rusqlite(e: tokio_rusqlite::Error) -> AuditError {
    match e {
        tokio_rusqlite::Error::Rusqlite(e) => AuditError::Sqlite(e),
        tokio_rusqlite::Error::Close(_) => AuditError::Connection("Connection closed".to_string()),
        other => AuditError::Connection(other.to_string()),
    }
}

/// Audit store persisted to a WAL-mode SQLite file.
#[derive(Clone)]
pub struct SqliteAuditStore {
    conn: Connection,
}

impl SqliteAuditStore {
    /// Open (or create) the audit database at `path` and run migrations.
    pub async fn open(path: &Path) -> AuditResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let path_str = path.to_string_lossy().to_string();
        let conn = Connection::open(&path_str)
            .await
            .map_err(|e| AuditError::Connection(e.to_string()))?;

        conn.call(|conn| {
            conn.execute_batch(
                "
                PRAGMA journal_mode = WAL;
                PRAGMA synchronous = NORMAL;
                PRAGMA foreign_keys = ON;
                PRAGMA cache_size = -64000;
                PRAGMA temp_store = MEMORY;
                PRAGMA busy_timeout = 5000;
                ",
            )?;
            Ok(())
        })
        .await
        .map_err(from_tokio_rusqlite)?;

        Self::migrate(&conn).await?;
        info!(path = %path_str, "audit database ready");
        Ok(Self { conn })
    }

    /// Open an in-memory audit database for testing.
    pub async fn open_in_memory() -> AuditResult<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| AuditError::Connection(e.to_string()))?;
        // WAL mode doesn't apply to in-memory databases
        conn.call(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA temp_store = MEMORY;")?;
            Ok(())
        })
        .await
        .map_err(from_tokio_rusqlite)?;

        Self::migrate(&conn).await?;
        Ok(Self { conn })
    }

    async fn migrate(conn: &Connection) -> AuditResult<()> {
        conn.call(|conn| {
            migrations::run_migrations(conn)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Ok(())
        })
        .await
        .map_err(from_tokio_rusqlite)
    }

    /// Total number of stored records.
    pub async fn count(&self) -> AuditResult<u64> {
        let count: i64 = self
            .conn
            .call(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?)
            })
            .await
            .map_err(from_tokio_rusqlite)?;
        Ok(count as u64)
    }
}

type AuditRow = (String, String, String, Option<String>, String, String);

fn row_to_record(row: AuditRow) -> AuditResult<AuditRecord> {
    let (id, action, actor, subject, details, timestamp) = row;
    let action = AuditAction::from_label(&action)
        .ok_or_else(|| AuditError::InvalidData(format!("unknown audit action: {action}")))?;
    Ok(AuditRecord {
        id: AuditId::from_string(id),
        action,
        actor: UserId::from_string(actor),
        subject: subject.map(UserId::from_string),
        details,
        timestamp: parse_datetime(timestamp),
    })
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl AuditStore for SqliteAuditStore {
    async fn append(&self, record: &AuditRecord) -> AuditResult<()> {
        let record = record.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO audit_log (id, action, actor, subject, details, timestamp)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        record.id.as_str(),
                        record.action.as_str(),
                        record.actor.as_str(),
                        record.subject.as_ref().map(|s| s.as_str().to_string()),
                        record.details,
                        record.timestamp.to_rfc3339(),
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(from_tokio_rusqlite)
    }

    async fn recent(&self, limit: usize) -> AuditResult<Vec<AuditRecord>> {
        let rows: Vec<AuditRow> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, action, actor, subject, details, timestamp
                     FROM audit_log
                     ORDER BY timestamp DESC, rowid DESC
                     LIMIT ?1",
                )?;
                let rows = stmt
                    .query_map(params![limit as i64], |row| {
                        Ok((
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                        ))
                    })?
                    .collect::<Result<Vec<AuditRow>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(from_tokio_rusqlite)?;

        rows.into_iter().map(row_to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(details: &str, action: AuditAction) -> AuditRecord {
        AuditRecord {
            id: AuditId::new(),
            action,
            actor: UserId::from_string("u-1"),
            subject: Some(UserId::from_string("u-2")),
            details: details.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn append_then_recent_round_trips() {
        let store = SqliteAuditStore::open_in_memory().await.unwrap();
        store
            .append(&record("Avery created project \"Apollo\"", AuditAction::ProjectCreated))
            .await
            .unwrap();
        store
            .append(&record(
                "Avery updated Task \"Ship it\" from \"To Do\" to \"Completed\"",
                AuditAction::TaskUpdate,
            ))
            .await
            .unwrap();

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].action, AuditAction::TaskUpdate);
        assert_eq!(recent[1].action, AuditAction::ProjectCreated);
        assert_eq!(recent[0].subject, Some(UserId::from_string("u-2")));
    }

    #[tokio::test]
    async fn recent_honors_limit() {
        let store = SqliteAuditStore::open_in_memory().await.unwrap();
        for i in 0..5 {
            store
                .append(&record(&format!("entry {i}"), AuditAction::TaskUpdate))
                .await
                .unwrap();
        }

        let recent = store.recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].details, "entry 4");
        assert_eq!(store.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.sqlite3");

        {
            let store = SqliteAuditStore::open(&path).await.unwrap();
            store
                .append(&record("persisted", AuditAction::ProjectDeleted))
                .await
                .unwrap();
        }

        let store = SqliteAuditStore::open(&path).await.unwrap();
        let recent = store.recent(1).await.unwrap();
        assert_eq!(recent[0].details, "persisted");
    }
}
