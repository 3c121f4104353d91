// 中文说明：
// 结果存储：基于 sqlx 的 SQLite 连接池，启动时建表（若不存在），每次 Web 分析
// 追加一条记录（文件名、语言、判定、修复文本、时间戳）。只追加，不更新、不删除。
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::analyzer::Verdict;
use crate::detector::Language;
use crate::utils::constants::DEFAULT_DB_CONNECTIONS;
use crate::utils::error::StoreError;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS analysis_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    language TEXT NOT NULL,
    prediction INTEGER NOT NULL,
    fixed_code TEXT,
    timestamp TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PersistedRecord {
    pub id: i64,
    pub filename: String,
    pub language: String,
    pub prediction: i64,
    pub fixed_code: Option<String>,
    pub timestamp: String,
}

impl PersistedRecord {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_code(self.prediction)
    }
}

#[derive(Debug, Clone)]
pub struct ResultStore {
    pool: SqlitePool,
}

impl ResultStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(DEFAULT_DB_CONNECTIONS)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// Private in-memory database. A single connection that never expires
    /// keeps every query on the same database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn save_result(
        &self,
        filename: &str,
        language: Language,
        verdict: Verdict,
        fixed_code: Option<&str>,
    ) -> Result<i64, StoreError> {
        let id = sqlx::query(
            "INSERT INTO analysis_results (filename, language, prediction, fixed_code)
             VALUES (?, ?, ?, ?)",
        )
        .bind(filename)
        .bind(language.as_str())
        .bind(verdict.code())
        .bind(fixed_code)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!("Stored analysis result #{} for {}", id, filename);
        Ok(id)
    }

    /// Newest records first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<PersistedRecord>, StoreError> {
        let rows = sqlx::query_as::<_, PersistedRecord>(
            "SELECT id, filename, language, prediction, fixed_code, timestamp
             FROM analysis_results ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM analysis_results")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
