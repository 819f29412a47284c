/// Host-side registry of project descriptors
///
/// Lives in the application's own SQLite file, never in a tenant database.
/// Each row keeps the whole `Project` as JSON; `name` and `driver` are
/// duplicated into columns so listings can sort without decoding.

use crate::project::types::Project;
use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePool;

/// Project descriptor store
#[derive(Debug, Clone)]
pub struct ProjectStorage {
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `projects` table and its name index if they are missing
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                driver TEXT NOT NULL DEFAULT '',
                descriptor TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("creating projects table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_name ON projects(name)")
            .execute(&self.pool)
            .await
            .context("creating projects name index")?;

        Ok(())
    }

    /// Insert or replace the descriptor stored under `project.id`
    ///
    /// `created_at` survives updates; `updated_at` is bumped.
    pub async fn save_project(&self, project: &Project) -> Result<()> {
        let descriptor = serde_json::to_string(project)?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, driver, descriptor)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                driver = excluded.driver,
                descriptor = excluded.descriptor,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(project.db_driver.trim().to_ascii_lowercase())
        .bind(&descriptor)
        .execute(&self.pool)
        .await
        .with_context(|| format!("saving project {}", project.id))?;

        Ok(())
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let descriptor: Option<String> =
            sqlx::query_scalar("SELECT descriptor FROM projects WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        descriptor.as_deref().map(decode).transpose()
    }

    /// Every stored project, alphabetical by name then id
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let descriptors: Vec<String> =
            sqlx::query_scalar("SELECT descriptor FROM projects ORDER BY name COLLATE NOCASE, id")
                .fetch_all(&self.pool)
                .await?;

        descriptors.iter().map(|json| decode(json)).collect()
    }

    /// Returns `false` when no project had that id
    pub async fn delete_project(&self, id: &str) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

fn decode(descriptor: &str) -> Result<Project> {
    serde_json::from_str(descriptor).context("decoding stored project descriptor")
}
