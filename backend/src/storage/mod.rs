//! # Frozen Template Store
//!
//! Frozen templates are kept in SQLite (`frozen_templates` table) together
//! with their freeze report. Rows are only ever inserted: a template id that
//! already exists is rejected, so a frozen artifact can't be overwritten.
//!
//! A connection is opened per call, which keeps the store `Send + Sync` and
//! cheap to share as `web::Data`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use common::model::template::{FreezeReport, FrozenTemplate, StoredTemplate};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{EngineError, Result};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS frozen_templates (
    id TEXT PRIMARY KEY,
    bytes BLOB NOT NULL,
    report TEXT NOT NULL,
    md5 TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    /// Opens (and if needed creates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.connect()?.execute(SCHEMA, [])?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Stores a freshly frozen template under `template_id`.
    pub fn insert(&self, template_id: &str, template: &FrozenTemplate) -> Result<StoredTemplate> {
        if template_id.trim().is_empty() {
            return Err(EngineError::InvalidInput("template id is empty".to_string()));
        }
        let conn = self.connect()?;
        let exists: Option<String> = conn
            .query_row(
                "SELECT id FROM frozen_templates WHERE id = ?1",
                params![template_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(EngineError::AlreadyFrozen(template_id.to_string()));
        }

        let stored = StoredTemplate {
            template_id: template_id.to_string(),
            md5: format!("{:x}", md5::compute(template.bytes())),
            size: template.bytes().len(),
            created_at: Utc::now(),
            report: template.report().clone(),
        };
        let report = serde_json::to_string(&stored.report)
            .map_err(|e| EngineError::PersistenceFailure(e.to_string()))?;
        conn.execute(
            "INSERT INTO frozen_templates (id, bytes, report, md5, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                template_id,
                template.bytes(),
                report,
                stored.md5,
                stored.created_at.to_rfc3339()
            ],
        )?;
        info!(
            "Stored frozen template {} ({} bytes, md5 {})",
            template_id, stored.size, stored.md5
        );
        Ok(stored)
    }

    /// Template bytes and metadata for `template_id`.
    pub fn get(&self, template_id: &str) -> Result<(Vec<u8>, StoredTemplate)> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT bytes, report, md5, created_at FROM frozen_templates WHERE id = ?1",
                params![template_id],
                |row| {
                    Ok((
                        row.get::<_, Vec<u8>>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        let (bytes, report, md5, created_at) =
            row.ok_or_else(|| EngineError::TemplateNotFound(template_id.to_string()))?;

        let report: FreezeReport = serde_json::from_str(&report)
            .map_err(|e| EngineError::PersistenceFailure(format!("corrupt report: {}", e)))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| EngineError::PersistenceFailure(format!("corrupt timestamp: {}", e)))?
            .with_timezone(&Utc);
        let stored = StoredTemplate {
            template_id: template_id.to_string(),
            md5,
            size: bytes.len(),
            created_at,
            report,
        };
        Ok((bytes, stored))
    }
}
