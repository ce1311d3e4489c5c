use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DB_FILE_NAME: &str = "expensetui.db";
pub(crate) const LOG_FILE_NAME: &str = "expensetui.log";
const DEFAULT_CURRENCY: &str = "₹";

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    /// Holds the database and the log file.
    pub(crate) data_dir: PathBuf,
    /// Where `export` writes `expenses.csv` and bills are downloaded.
    pub(crate) export_dir: PathBuf,
    /// Symbol shown in front of every amount.
    pub(crate) currency: String,
}

impl Config {
    /// Resolve settings from the environment and create the data directory.
    ///
    /// - `EXPENSETUI_DATA_DIR` overrides the platform data directory.
    /// - `EXPENSETUI_EXPORT_DIR` defaults to the working directory.
    /// - `EXPENSETUI_CURRENCY` defaults to `₹`.
    pub(crate) fn load() -> Result<Self> {
        let config = Self::from_vars(|key| std::env::var(key).ok())?;
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                config.data_dir.display()
            )
        })?;
        Ok(config)
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let data_dir = match var("EXPENSETUI_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => directories::ProjectDirs::from("com", "expensetui", "ExpenseTUI")
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
                .data_dir()
                .to_path_buf(),
        };
        let export_dir = var("EXPENSETUI_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let currency = var("EXPENSETUI_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(Self {
            data_dir,
            export_dir,
            currency,
        })
    }

    pub(crate) fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}
