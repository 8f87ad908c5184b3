// src/store.rs
//! Screening results store - append-only SQLite table, created on first use.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// One screening result, as produced by the pipeline. Never mutated after
/// creation; persisted best-effort, exactly once per completed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub resume_name: String,
    pub job_match_score: u32,
    pub category: String,
    pub decision: String,
    pub timestamp: DateTime<Utc>,
}

/// A result row as read back from the store, with its assigned id.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredRow {
    pub id: i64,
    pub resume_name: String,
    pub job_match_score: i64,
    pub category: String,
    pub decision: String,
    pub timestamp: DateTime<Utc>,
}

impl StoredRow {
    pub fn into_row(self) -> ResultRow {
        ResultRow {
            resume_name: self.resume_name,
            job_match_score: self.job_match_score.clamp(0, i64::from(u32::MAX)) as u32,
            category: self.category,
            decision: self.decision,
            timestamp: self.timestamp,
        }
    }
}

pub struct ResultStore {
    pool: SqlitePool,
}

impl ResultStore {
    /// Open (creating if needed) the database at `database_path` and make
    /// sure the results table exists.
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let store = Self::connect(&database_url).await?;
        info!(
            "Database connection established: {}",
            database_path.display()
        );
        Ok(store)
    }

    /// Connect by URL. Tests use `sqlite::memory:` here.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resume_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                resume_name TEXT NOT NULL,
                job_match_score INTEGER NOT NULL,
                category TEXT NOT NULL,
                decision TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create resume_results table")?;

        Ok(())
    }

    /// Append one row. Rows are never deduplicated: re-screening the same
    /// resume adds a new row.
    pub async fn insert_row(&self, row: &ResultRow) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO resume_results (resume_name, job_match_score, category, decision, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.resume_name)
        .bind(i64::from(row.job_match_score))
        .bind(&row.category)
        .bind(&row.decision)
        .bind(row.timestamp)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert result row for {}", row.resume_name))?;

        Ok(result.last_insert_rowid())
    }

    /// All stored rows, oldest first.
    pub async fn list_rows(&self) -> Result<Vec<StoredRow>> {
        sqlx::query_as::<_, StoredRow>(
            r#"
            SELECT id, resume_name, job_match_score, category, decision, timestamp
            FROM resume_results
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list result rows")
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> ResultRow {
        ResultRow {
            resume_name: "jane.docx".into(),
            job_match_score: 85,
            category: "High Fit (Selected for Interview)".into(),
            decision: "Send Interview Invite".into(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_list_round_trip() {
        let store = ResultStore::connect("sqlite::memory:").await.unwrap();

        let id = store.insert_row(&sample_row()).await.unwrap();
        assert!(id > 0);

        let rows = store.list_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].resume_name, "jane.docx");
        assert_eq!(rows[0].job_match_score, 85);
    }

    #[tokio::test]
    async fn duplicate_inserts_are_not_deduplicated() {
        let store = ResultStore::connect("sqlite::memory:").await.unwrap();
        let row = sample_row();

        store.insert_row(&row).await.unwrap();
        store.insert_row(&row).await.unwrap();

        let rows = store.list_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].id, rows[1].id);
    }

    #[tokio::test]
    async fn ids_are_assigned_in_insert_order() {
        let store = ResultStore::connect("sqlite::memory:").await.unwrap();

        let first = store.insert_row(&sample_row()).await.unwrap();
        let second = store.insert_row(&sample_row()).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn health_check_passes_on_open_store() {
        let store = ResultStore::connect("sqlite::memory:").await.unwrap();
        store.health_check().await.unwrap();
    }
}
