//! Audit database migrations.
//!
//! Migrations run in order and are tracked in the `migrations` table.

use rusqlite::Connection;
use tracing::info;

use crate::error::AuditResult;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> AuditResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < CURRENT_VERSION {
        info!(current_version, target_version = CURRENT_VERSION, "Running audit migrations");
    }

    if current_version < 1 {
        migrate_v1_audit_log(conn)?;
    }

    Ok(())
}

fn migrate_v1_audit_log(conn: &Connection) -> AuditResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE audit_log (
            id TEXT PRIMARY KEY,
            action TEXT NOT NULL,
            actor TEXT NOT NULL,
            subject TEXT,
            details TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );
        CREATE INDEX idx_audit_log_timestamp ON audit_log(timestamp DESC);
        ",
    )?;
    conn.execute(
        "INSERT INTO migrations (version, name) VALUES (1, 'audit_log')",
        [],
    )?;
    Ok(())
}
