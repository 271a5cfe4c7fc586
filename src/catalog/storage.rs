/// SQLite persistence layer for the marketplace catalog
/// 
/// Handles the `workflows` and `purchases` tables. Tags are stored as JSON text
/// and parsed back into lists on every read.

use crate::catalog::types::{
    CatalogCounts, CatalogEntry, CatalogFilter, CatalogWorkflow, ExtractedUpdate,
    NewCatalogWorkflow, Purchase,
};
use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};
use std::path::Path;

const WORKFLOW_COLUMNS: &str = "id, title, description, category, price, demo_url, download_url, \
     created_at, tags, downloads, rating, image_url, workflow_json";

/// SQLite-based catalog storage manager
#[derive(Debug, Clone)]
pub struct CatalogStorage {
    /// SQLite connection pool for the catalog database
    pool: SqlitePool,
}

impl CatalogStorage {
    /// Create new storage instance with database connection
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the catalog database file and initialize its schema
    pub async fn connect(db_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(db_path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create database directory '{}': {}", parent.display(), e)
            })?;
        }

        tracing::info!("🗄️ Opening catalog database: {}", db_path);

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let storage = Self::new(pool);
        storage.init_schema().await?;

        tracing::info!("✅ Catalog database ready: {}", db_path);

        Ok(storage)
    }

    /// Create an in-memory catalog (single connection so every query sees the same database)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize the catalog schema
    /// 
    /// Safe to call multiple times (uses IF NOT EXISTS).
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS workflows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                price REAL NOT NULL DEFAULT 0,
                demo_url TEXT,
                download_url TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                tags TEXT NOT NULL DEFAULT '[]',
                downloads INTEGER NOT NULL DEFAULT 0,
                rating REAL NOT NULL DEFAULT 0,
                image_url TEXT,
                workflow_json TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS purchases (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workflow_id INTEGER NOT NULL REFERENCES workflows(id),
                email TEXT NOT NULL,
                purchased_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Indexes for category filtering and title upserts
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workflows_category ON workflows(category)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workflows_title ON workflows(title)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List workflows newest first, optionally filtered by category and search text
    pub async fn list_workflows(&self, filter: &CatalogFilter) -> Result<Vec<CatalogWorkflow>> {
        let category = filter.category.as_deref().filter(|c| !c.is_empty());

        let rows = match category {
            Some(category) => {
                sqlx::query(&format!(
                    "SELECT {} FROM workflows WHERE category = ? ORDER BY created_at DESC, id DESC",
                    WORKFLOW_COLUMNS
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM workflows ORDER BY created_at DESC, id DESC",
                    WORKFLOW_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut workflows = Vec::with_capacity(rows.len());
        for row in rows {
            let workflow = workflow_from_row(&row)?;
            if filter.search.as_deref().map_or(true, |q| workflow.matches_search(q)) {
                workflows.push(workflow);
            }
        }

        Ok(workflows)
    }

    /// Retrieve a workflow by ID
    pub async fn get_workflow(&self, id: i64) -> Result<Option<CatalogWorkflow>> {
        let row = sqlx::query(&format!("SELECT {} FROM workflows WHERE id = ?", WORKFLOW_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(workflow_from_row).transpose()
    }

    /// Find the ID of a workflow by its exact title
    pub async fn find_id_by_title(&self, title: &str) -> Result<Option<i64>> {
        let row = sqlx::query("SELECT id FROM workflows WHERE title = ? ORDER BY id LIMIT 1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("id")))
    }

    /// Insert a new catalog workflow and return its ID
    pub async fn insert_workflow(&self, workflow: &NewCatalogWorkflow) -> Result<i64> {
        let tags_json = serde_json::to_string(&workflow.tags)?;
        let created_at = timestamp_now();

        let result = sqlx::query(
            r#"
            INSERT INTO workflows
                (title, description, category, price, demo_url, download_url, created_at, tags, image_url, workflow_json)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&workflow.title)
        .bind(&workflow.description)
        .bind(&workflow.category)
        .bind(workflow.price)
        .bind(&workflow.demo_url)
        .bind(&workflow.download_url)
        .bind(&created_at)
        .bind(&tags_json)
        .bind(&workflow.image_url)
        .bind(&workflow.workflow_json)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Refresh extracted metadata for every workflow with the given title
    /// 
    /// Returns true if at least one row was updated.
    pub async fn update_extracted(&self, title: &str, update: &ExtractedUpdate) -> Result<bool> {
        let tags_json = serde_json::to_string(&update.tags)?;

        let result = sqlx::query(
            r#"
            UPDATE workflows
            SET description = ?, category = ?, tags = ?, workflow_json = ?
            WHERE title = ?
            "#,
        )
        .bind(&update.description)
        .bind(&update.category)
        .bind(&tags_json)
        .bind(&update.workflow_json)
        .bind(title)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a purchase and bump the workflow's download counter atomically
    pub async fn record_purchase(&self, workflow_id: i64, email: &str) -> Result<Purchase> {
        let purchased_at = timestamp_now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO purchases (workflow_id, email, purchased_at) VALUES (?, ?, ?)",
        )
        .bind(workflow_id)
        .bind(email)
        .bind(&purchased_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE workflows SET downloads = downloads + 1 WHERE id = ?")
            .bind(workflow_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Purchase {
            id: result.last_insert_rowid(),
            workflow_id,
            email: email.to_string(),
            purchased_at,
        })
    }

    /// Close the pool; later queries fail with a pool-closed error
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Purchases of one workflow, oldest first
    #[cfg(test)]
    async fn list_purchases(&self, workflow_id: i64) -> Result<Vec<Purchase>> {
        let rows = sqlx::query(
            "SELECT id, workflow_id, email, purchased_at FROM purchases WHERE workflow_id = ? ORDER BY id",
        )
        .bind(workflow_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Purchase {
                id: row.get("id"),
                workflow_id: row.get("workflow_id"),
                email: row.get("email"),
                purchased_at: row.get("purchased_at"),
            })
            .collect())
    }

    /// Distinct categories present in the catalog, sorted
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT DISTINCT category FROM workflows ORDER BY category")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("category")).collect())
    }

    /// Count all, paid and free workflows
    pub async fn counts(&self) -> Result<CatalogCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN price > 0 THEN 1 ELSE 0 END), 0) AS paid,
                COALESCE(SUM(CASE WHEN price = 0 THEN 1 ELSE 0 END), 0) AS free
            FROM workflows
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CatalogCounts {
            total: row.get("total"),
            paid: row.get("paid"),
            free: row.get("free"),
        })
    }

    /// Workflows with a non-zero price
    pub async fn list_paid(&self) -> Result<Vec<CatalogEntry>> {
        let rows = sqlx::query("SELECT id, title, price FROM workflows WHERE price > 0 ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    /// All workflows ordered by title
    pub async fn list_entries(&self) -> Result<Vec<CatalogEntry>> {
        let rows = sqlx::query("SELECT id, title, price FROM workflows ORDER BY title")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(entry_from_row).collect())
    }
}

/// Fixed-width RFC 3339 timestamp so that text ordering matches time ordering
fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

fn workflow_from_row(row: &SqliteRow) -> Result<CatalogWorkflow> {
    let tags_json: Option<String> = row.get("tags");
    let tags = serde_json::from_str(tags_json.as_deref().unwrap_or("[]"))?;

    Ok(CatalogWorkflow {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        price: row.get("price"),
        demo_url: row.get("demo_url"),
        download_url: row.get("download_url"),
        created_at: row.get("created_at"),
        tags,
        downloads: row.get("downloads"),
        rating: row.get("rating"),
        image_url: row.get("image_url"),
        workflow_json: row.get("workflow_json"),
    })
}

fn entry_from_row(row: &SqliteRow) -> CatalogEntry {
    CatalogEntry {
        id: row.get("id"),
        title: row.get("title"),
        price: row.get("price"),
    }
}
