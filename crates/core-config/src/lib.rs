//! Configuration loading and parsing.
//!
//! Parses `vimbox.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [general]
//! debug = false          # verbose logging in the binary
//!
//! [input]
//! timeout = true         # chords expire after `timeoutlen`
//! timeoutlen = 600       # chord window in milliseconds
//! passthrough = ["tab", "f1", "f2"]   # keys never handled by the engine
//!
//! [history]
//! depth = 100            # undo snapshots kept per surface
//! ```
//!
//! Every field has a default. Unknown fields are ignored so older binaries
//! accept newer files; a file that fails to parse falls back to defaults
//! with a warning instead of aborting startup.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_timeout")] // Vim default: enabled
    pub timeout: bool,
    #[serde(default = "InputConfig::default_timeoutlen")]
    pub timeoutlen: u32,
    #[serde(default = "InputConfig::default_passthrough")]
    pub passthrough: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            timeoutlen: Self::default_timeoutlen(),
            passthrough: Self::default_passthrough(),
        }
    }
}

impl InputConfig {
    const fn default_timeout() -> bool {
        true
    }
    const fn default_timeoutlen() -> u32 {
        600
    }
    fn default_passthrough() -> Vec<String> {
        std::iter::once("tab".to_string())
            .chain((1..=12).map(|n| format!("f{n}")))
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_depth")]
    pub depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            depth: Self::default_depth(),
        }
    }
}

impl HistoryConfig {
    const fn default_depth() -> usize {
        100
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File the settings came from; `None` when running on defaults.
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("vimbox.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vimbox").join("vimbox.toml");
    }
    PathBuf::from("vimbox.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Chord window, `None` when chords never expire.
    pub fn chord_window(&self) -> Option<Duration> {
        let input = &self.file.input;
        input
            .timeout
            .then(|| Duration::from_millis(u64::from(input.timeoutlen)))
    }

    /// Undo depth per surface, at least one snapshot.
    pub fn history_depth(&self) -> usize {
        let raw = self.file.history.depth;
        if raw == 0 {
            info!(target: "config", raw, clamped = 1, "history_depth_clamped");
            return 1;
        }
        raw
    }

    pub fn passthrough(&self) -> &[String] {
        &self.file.input.passthrough
    }

    pub fn debug(&self) -> bool {
        self.file.general.debug
    }
}
