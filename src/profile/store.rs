//! Profile store client.
//!
//! Owns the connection pool to the document database and performs the two
//! operations of the profile path against the fixed key `userid = 1`.
//!
//! # Design Decisions
//! - Backed by SQLite through an r2d2 pool; one row per document
//! - Each operation checks out a connection for its own duration only; the
//!   pooled guard returns it on success, error or panic
//! - SQLite calls block, so they run on the blocking thread pool. If the caller
//!   is cancelled the blocking task still runs to completion
//! - Upsert is a single `INSERT ... ON CONFLICT DO UPDATE` statement

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::StoreConfig;
use crate::observability::metrics;
use crate::profile::types::{Profile, ProfileFields, PROFILE_USER_ID};

/// Store error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("Store query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid store url '{0}'")]
    InvalidUrl(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Store result type.
pub type StoreResult<T> = Result<T, StoreError>;

/// SQL for one collection, rendered once at connect time.
struct Statements {
    create: String,
    upsert: String,
    select: String,
}

impl Statements {
    fn for_collection(collection: &str) -> Self {
        Self {
            create: format!(
                "CREATE TABLE IF NOT EXISTS {collection} (
                    userid INTEGER PRIMARY KEY,
                    name TEXT NOT NULL DEFAULT '',
                    email TEXT NOT NULL DEFAULT '',
                    interests TEXT NOT NULL DEFAULT ''
                )"
            ),
            upsert: format!(
                "INSERT INTO {collection} (userid, name, email, interests)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(userid) DO UPDATE SET
                    name = excluded.name,
                    email = excluded.email,
                    interests = excluded.interests"
            ),
            select: format!(
                "SELECT userid, name, email, interests FROM {collection} WHERE userid = ?1"
            ),
        }
    }
}

/// Client for the profile collection.
///
/// Cheap to clone; clones share the same pool.
#[derive(Clone)]
pub struct ProfileStore {
    pool: Pool<SqliteConnectionManager>,
    statements: Arc<Statements>,
}

impl ProfileStore {
    /// Open the pool described by `config` and make sure the collection exists.
    ///
    /// Blocks while the pool establishes its connections.
    pub fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let path = database_path(&config.url)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let manager = SqliteConnectionManager::file(&path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch("PRAGMA journal_mode=WAL;\nPRAGMA synchronous=NORMAL;")
        });

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.pool_timeout_secs))
            .build(manager)?;

        let statements = Statements::for_collection(&config.collection);
        pool.get()?.execute(&statements.create, [])?;

        tracing::info!(
            path = %path.display(),
            collection = %config.collection,
            pool_size = config.pool_size,
            "Profile store connected"
        );

        Ok(Self {
            pool,
            statements: Arc::new(statements),
        })
    }

    /// Insert or replace the profile document with `fields`.
    pub async fn upsert_profile(&self, fields: ProfileFields) -> StoreResult<()> {
        let profile = fields.into_profile();
        self.with_connection("upsert", move |conn, sql| {
            conn.execute(
                &sql.upsert,
                params![profile.userid, profile.name, profile.email, profile.interests],
            )?;
            Ok(())
        })
        .await
    }

    /// Fetch the profile document, if one has been written.
    pub async fn get_profile(&self) -> StoreResult<Option<Profile>> {
        self.with_connection("get", |conn, sql| {
            conn.query_row(&sql.select, params![PROFILE_USER_ID], |row| {
                Ok(Profile {
                    userid: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    interests: row.get(3)?,
                })
            })
            .optional()
        })
        .await
    }

    /// Number of connections currently open in the pool.
    pub fn open_connections(&self) -> u32 {
        self.pool.state().connections
    }

    async fn with_connection<T, F>(&self, op: &'static str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection, &Statements) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        let statements = Arc::clone(&self.statements);
        let start = Instant::now();

        let result = tokio::task::spawn_blocking(move || -> StoreResult<T> {
            let conn = pool.get()?;
            Ok(f(&*conn, &*statements)?)
        })
        .await
        .map_err(StoreError::from)
        .and_then(|inner| inner);

        metrics::record_store_operation(op, result.is_ok(), start);
        match &result {
            Ok(_) => tracing::debug!(op, elapsed = ?start.elapsed(), "Store operation complete"),
            Err(e) => tracing::error!(op, error = %e, "Store operation failed"),
        }
        result
    }
}

/// Resolve a connection string to a database file path.
///
/// Accepts `sqlite://<path>`, `sqlite:<path>` or a bare path.
fn database_path(url: &str) -> StoreResult<PathBuf> {
    let path = if let Some(rest) = url.strip_prefix("sqlite://") {
        rest
    } else if let Some(rest) = url.strip_prefix("sqlite:") {
        rest
    } else if url.contains("://") {
        return Err(StoreError::InvalidUrl(url.to_string()));
    } else {
        url
    };

    if path.trim().is_empty() || path == ":memory:" {
        return Err(StoreError::InvalidUrl(url.to_string()));
    }
    Ok(PathBuf::from(path))
}
