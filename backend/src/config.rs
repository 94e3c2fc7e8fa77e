//! Runtime configuration.
//!
//! Values come from `TEXTAMI_*` environment variables, optionally loaded from
//! a `.env` file, with defaults suitable for a local run.

use std::path::PathBuf;

use crate::engines::mapping::DEFAULT_THRESHOLD;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file holding frozen templates.
    pub database_path: PathBuf,
    /// Directory generated documents are written to and served from.
    pub output_dir: PathBuf,
    /// Directory with the TTF families used for PDF output.
    pub fonts_dir: PathBuf,
    pub mapping_threshold: f64,
    /// Maximum accepted JSON body, in bytes.
    pub json_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TEXTAMI_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("TEXTAMI_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            database_path: std::env::var("TEXTAMI_DATABASE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("textami.sqlite")),
            output_dir: std::env::var("TEXTAMI_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./generated")),
            fonts_dir: std::env::var("TEXTAMI_FONTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./fonts")),
            mapping_threshold: std::env::var("TEXTAMI_MAPPING_THRESHOLD")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|t| (0.0..=1.0).contains(t))
                .unwrap_or(DEFAULT_THRESHOLD),
            json_limit: std::env::var("TEXTAMI_JSON_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024), // 10 MB
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::default()
    }

    pub fn bind_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
