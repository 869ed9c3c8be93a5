use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{config::DatabaseConfig, parser::Parser, types::Match};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("empty token")]
    EmptyToken,
    #[error("no editable match {0} for this token")]
    NotFound(Uuid),
}

/// Durable home of submitted match documents.
///
/// Every match row carries the digest of the token of the client that
/// created it. Only that client may update the document, and only until the
/// match has a winner.
#[derive(Debug, Clone)]
pub struct MatchStore {
    pool: SqlitePool,
}

fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl MatchStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!("Opened match database at {}", config.url);
        Ok(store)
    }

    /// A private database living as long as the store; for tests and dry runs.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS matches (
                uuid     TEXT NOT NULL PRIMARY KEY,
                token    TEXT,
                json     TEXT,
                modified INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Reserves a new match owned by `token`.
    pub async fn create(&self, token: &str) -> Result<Uuid, StoreError> {
        if token.is_empty() {
            return Err(StoreError::EmptyToken);
        }

        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO matches (uuid, token, modified) VALUES (?1, ?2, ?3)")
            .bind(id.to_string())
            .bind(token_digest(token))
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await?;

        debug!("Created match {}", id);
        Ok(id)
    }

    /// Stores the raw document of a validated match. Once the match has a
    /// winner the token is dropped and the row can no longer be edited.
    pub async fn update(
        &self,
        id: Uuid,
        token: &str,
        raw: &str,
        validated: &Match,
    ) -> Result<(), StoreError> {
        let digest = token_digest(token);
        let new_token = (!validated.is_finished()).then(|| digest.clone());

        let result = sqlx::query(
            "UPDATE matches SET json = ?1, token = ?2, modified = ?3 WHERE uuid = ?4 AND token = ?5",
        )
        .bind(raw)
        .bind(new_token)
        .bind(Utc::now().timestamp())
        .bind(id.to_string())
        .bind(digest)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        if validated.is_finished() {
            info!("Match {} finished, locking it", id);
        }
        Ok(())
    }

    /// Matches modified within `window`, newest first. Documents that no
    /// longer pass validation are skipped.
    pub async fn recent(&self, window: Duration, parser: &Parser) -> Result<Vec<Match>, StoreError> {
        let cutoff = (Utc::now() - window).timestamp();
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT uuid, json FROM matches
            WHERE json IS NOT NULL AND modified >= ?1
            ORDER BY modified DESC, rowid DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        let matches = rows
            .into_iter()
            .filter_map(|(id, json)| match parser.parse(&json) {
                Ok(m) => Some(m),
                Err(e) => {
                    warn!("Skipping stored match {}: {}", id, e);
                    None
                }
            })
            .collect();
        Ok(matches)
    }
}
