// File: crates/chart-store/src/lib.rs
// Summary: Persistence for projects and their named chart specs; contracts plus a SQLite implementation.
// Notes:
// - Configs are stored verbatim as JSON text and never interpreted here.
// - The connection is the only shared mutable state; access is serialized by a mutex.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Validation(String),
    #[error("bad timestamp '{0}' in store")]
    Timestamp(String),
    #[error("store connection poisoned by a panicked writer")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_date: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// A named chart configuration saved under a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpecRecord {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub config: Json,
    pub created_date: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

pub trait ChartSpecStore: Send + Sync {
    /// Persist `config` under `project_id` and return the new spec id.
    fn save(&self, project_id: &str, name: &str, description: Option<&str>, config: &Json) -> Result<String>;
    /// `None` when the id is unknown or belongs to another project.
    fn get(&self, project_id: &str, spec_id: &str) -> Result<Option<ChartSpecRecord>>;
    /// All specs of a project, oldest first.
    fn list(&self, project_id: &str) -> Result<Vec<ChartSpecRecord>>;
}

pub trait ProjectStore: Send + Sync {
    /// Name and description are trimmed and must both be non-empty.
    fn create_project(&self, name: &str, description: &str) -> Result<ProjectRecord>;
    fn list_projects(&self) -> Result<Vec<ProjectRecord>>;
    fn get_project(&self, id: &str) -> Result<Option<ProjectRecord>>;
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    createdDate TEXT NOT NULL,
    lastModified TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS visualizations (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    config_json TEXT NOT NULL,
    createdDate TEXT NOT NULL,
    lastModified TEXT NOT NULL,
    FOREIGN KEY(project_id) REFERENCES projects(id)
);
CREATE INDEX IF NOT EXISTS idx_visualizations_project ON visualizations(project_id);
"#;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        info!("opening spec store at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn now() -> (DateTime<Utc>, String) {
    let t = Utc::now();
    (t, t.to_rfc3339())
}

fn parse_time(raw: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StoreError::Timestamp(raw))
}

/// Raw columns as stored; converted outside the rusqlite row closure.
struct SpecRow {
    id: String,
    project_id: String,
    name: String,
    description: Option<String>,
    config_json: String,
    created: String,
    modified: String,
}

impl SpecRow {
    const COLUMNS: &'static str = "id, project_id, name, description, config_json, createdDate, lastModified";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            config_json: row.get(4)?,
            created: row.get(5)?,
            modified: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<ChartSpecRecord> {
        Ok(ChartSpecRecord {
            id: self.id,
            project_id: self.project_id,
            name: self.name,
            description: self.description,
            config: serde_json::from_str(&self.config_json)?,
            created_date: parse_time(self.created)?,
            last_modified: parse_time(self.modified)?,
        })
    }
}

struct ProjectRow {
    id: String,
    name: String,
    description: String,
    created: String,
    modified: String,
}

impl ProjectRow {
    const COLUMNS: &'static str = "id, name, description, createdDate, lastModified";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            created: row.get(3)?,
            modified: row.get(4)?,
        })
    }

    fn into_record(self) -> Result<ProjectRecord> {
        Ok(ProjectRecord {
            id: self.id,
            name: self.name,
            description: self.description,
            created_date: parse_time(self.created)?,
            last_modified: parse_time(self.modified)?,
        })
    }
}

impl ChartSpecStore for SqliteStore {
    fn save(&self, project_id: &str, name: &str, description: Option<&str>, config: &Json) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let config_json = serde_json::to_string(config)?;
        let (_, stamp) = now();
        self.lock()?.execute(
            "INSERT INTO visualizations (id, project_id, name, description, config_json, createdDate, lastModified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![&id, project_id, name, description, &config_json, &stamp],
        )?;
        debug!("saved chart spec {id} ('{name}') in project {project_id}");
        Ok(id)
    }

    fn get(&self, project_id: &str, spec_id: &str) -> Result<Option<ChartSpecRecord>> {
        let row = self
            .lock()?
            .query_row(
                &format!("SELECT {} FROM visualizations WHERE id = ?1 AND project_id = ?2", SpecRow::COLUMNS),
                params![spec_id, project_id],
                SpecRow::from_row,
            )
            .optional()?;
        row.map(SpecRow::into_record).transpose()
    }

    fn list(&self, project_id: &str) -> Result<Vec<ChartSpecRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM visualizations WHERE project_id = ?1 ORDER BY rowid ASC",
            SpecRow::COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![project_id], SpecRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(SpecRow::into_record).collect()
    }
}

impl ProjectStore for SqliteStore {
    fn create_project(&self, name: &str, description: &str) -> Result<ProjectRecord> {
        let name = name.trim();
        let description = description.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("Project name is required".into()));
        }
        if description.is_empty() {
            return Err(StoreError::Validation("Project description is required".into()));
        }

        let id = Uuid::new_v4().to_string();
        let (at, stamp) = now();
        self.lock()?.execute(
            "INSERT INTO projects (id, name, description, createdDate, lastModified) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![&id, name, description, &stamp],
        )?;
        info!("created project {id} ('{name}')");
        Ok(ProjectRecord {
            id,
            name: name.to_string(),
            description: description.to_string(),
            created_date: at,
            last_modified: at,
        })
    }

    fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM projects ORDER BY rowid ASC", ProjectRow::COLUMNS))?;
        let rows = stmt
            .query_map([], ProjectRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ProjectRow::into_record).collect()
    }

    fn get_project(&self, id: &str) -> Result<Option<ProjectRecord>> {
        let row = self
            .lock()?
            .query_row(
                &format!("SELECT {} FROM projects WHERE id = ?1", ProjectRow::COLUMNS),
                params![id],
                ProjectRow::from_row,
            )
            .optional()?;
        row.map(ProjectRow::into_record).transpose()
    }
}
