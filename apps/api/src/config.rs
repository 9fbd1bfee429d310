use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use crate::persistence::scheduler::DEFAULT_QUIET_WINDOW;
use crate::resume::history::DEFAULT_MAX_DEPTH;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root of the local document store.
    pub data_dir: PathBuf,
    /// Quiet window before a burst of edits is written.
    pub save_debounce: Duration,
    /// Undo-stack bound.
    pub history_depth: usize,
    /// Profile to open at startup.
    pub profile_id: Option<Uuid>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            data_dir: PathBuf::from("./data"),
            save_debounce: DEFAULT_QUIET_WINDOW,
            history_depth: DEFAULT_MAX_DEPTH,
            profile_id: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(v) => v
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };

        let save_debounce = match lookup("FOLIO_SAVE_DEBOUNCE_MS") {
            Some(v) => Duration::from_millis(
                v.parse::<u64>()
                    .context("FOLIO_SAVE_DEBOUNCE_MS must be a number of milliseconds")?,
            ),
            None => defaults.save_debounce,
        };

        let history_depth = match lookup("FOLIO_HISTORY_DEPTH") {
            Some(v) => {
                let depth = v
                    .parse::<usize>()
                    .context("FOLIO_HISTORY_DEPTH must be a positive integer")?;
                if depth == 0 {
                    bail!("FOLIO_HISTORY_DEPTH must be at least 1");
                }
                depth
            }
            None => defaults.history_depth,
        };

        let profile_id = lookup("FOLIO_PROFILE_ID")
            .map(|v| Uuid::parse_str(&v).context("FOLIO_PROFILE_ID must be a UUID"))
            .transpose()?;

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            data_dir: lookup("FOLIO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            save_debounce,
            history_depth,
            profile_id,
        })
    }
}
