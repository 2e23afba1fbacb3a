//! Persisted slot holding the current access token.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tokio::sync::Mutex;

use crate::types::SessionToken;

/// Well-known key under which the token is stored.
pub const SESSION_SLOT: &str = "accessToken";

/// Single-slot token storage. The auth controller is the only writer.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<SessionToken>>;

    /// Replace the stored token (last write wins).
    async fn save(&self, token: &SessionToken) -> anyhow::Result<()>;

    async fn clear(&self) -> anyhow::Result<()>;
}

/// In-memory slot.
///
/// Intended for tests and sessions that must not outlive the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<SessionToken>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            slot: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> anyhow::Result<Option<SessionToken>> {
        let slot = self.slot.read().map_err(|_| anyhow!("session slot lock poisoned"))?;
        Ok(slot.clone())
    }

    async fn save(&self, token: &SessionToken) -> anyhow::Result<()> {
        let mut slot = self.slot.write().map_err(|_| anyhow!("session slot lock poisoned"))?;
        *slot = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let mut slot = self.slot.write().map_err(|_| anyhow!("session slot lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

/// SQLite-backed slot that survives restarts.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    path: PathBuf,
    /// Opened lazily on first use.
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create session directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open session database at {:?}", self.path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session_slots (
                slot       TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create session_slots table")?;

        *guard = Some(pool.clone());
        Ok(pool)
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self) -> anyhow::Result<Option<SessionToken>> {
        let pool = self.pool().await?;

        let row = sqlx::query(
            r#"
            SELECT value
            FROM session_slots
            WHERE slot = ?1
            "#,
        )
        .bind(SESSION_SLOT)
        .fetch_optional(&pool)
        .await
        .context("failed to read session slot")?;

        match row {
            Some(row) => {
                let value: String = row.try_get("value")?;
                Ok(Some(SessionToken::new(value)))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, token: &SessionToken) -> anyhow::Result<()> {
        let pool = self.pool().await?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO session_slots (slot, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(slot)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(SESSION_SLOT)
        .bind(token.as_str())
        .bind(&now)
        .execute(&pool)
        .await
        .context("failed to write session slot")?;

        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let pool = self.pool().await?;

        sqlx::query(
            r#"
            DELETE FROM session_slots
            WHERE slot = ?1
            "#,
        )
        .bind(SESSION_SLOT)
        .execute(&pool)
        .await
        .context("failed to clear session slot")?;

        Ok(())
    }
}
