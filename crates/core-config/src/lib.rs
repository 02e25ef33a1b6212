//! Configuration loading and parsing.
//!
//! Parses `ptedit.toml` (or an override path provided by the binary). Every
//! table and field is optional; absent values take the defaults below and
//! unknown fields are ignored so older binaries tolerate newer files.
//!
//! ```toml
//! [document]
//! path = "saved.txt"
//!
//! [viewport]
//! width = 800
//! height = 600
//! line_height = 16
//!
//! [cursor]
//! width = 2
//!
//! [colors]
//! foreground = 0xFF000000
//! background = 0xFFFFFFFF
//! cursor = 0xFF000000
//! ```
//!
//! Raw parsed values are kept as-is; `Config::viewport` derives the clamped
//! geometry the editor actually uses and logs any clamp at target `config`.

use anyhow::Result;
use serde::Deserialize;
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// Config file name looked up in the working directory and the platform dir.
pub const CONFIG_FILE_NAME: &str = "ptedit.toml";
/// Environment variable naming the document path.
pub const DOCUMENT_PATH_ENV: &str = "SAVE_TXT";
/// Document path used when nothing else names one.
pub const DEFAULT_DOCUMENT_PATH: &str = "saved.txt";

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewportConfig {
    #[serde(default = "ViewportConfig::default_width")]
    pub width: usize,
    #[serde(default = "ViewportConfig::default_height")]
    pub height: usize,
    #[serde(default = "ViewportConfig::default_line_height")]
    pub line_height: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            line_height: Self::default_line_height(),
        }
    }
}

impl ViewportConfig {
    const fn default_width() -> usize {
        800
    }
    const fn default_height() -> usize {
        600
    }
    const fn default_line_height() -> usize {
        16
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CursorConfig {
    #[serde(default = "CursorConfig::default_width")]
    pub width: usize,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
        }
    }
}

impl CursorConfig {
    const fn default_width() -> usize {
        2
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    #[serde(default = "ColorConfig::default_foreground")]
    pub foreground: u32,
    #[serde(default = "ColorConfig::default_background")]
    pub background: u32,
    #[serde(default = "ColorConfig::default_cursor")]
    pub cursor: u32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            foreground: Self::default_foreground(),
            background: Self::default_background(),
            cursor: Self::default_cursor(),
        }
    }
}

impl ColorConfig {
    const fn default_foreground() -> u32 {
        0xFF00_0000
    }
    const fn default_background() -> u32 {
        0xFFFF_FFFF
    }
    const fn default_cursor() -> u32 {
        0xFF00_0000
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,     // original file string (optional)
    pub file: ConfigFile,        // parsed (or default) data
    pub source: Option<PathBuf>, // path the file was read from
}

/// Geometry after clamping; every field is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    pub line_height: usize,
    pub cursor_width: usize,
}

impl Viewport {
    /// Lines shown in the initial view: `max(1, height / line_height)`.
    pub fn initial_line_count(&self) -> usize {
        (self.height / self.line_height).max(1)
    }
}

/// Best-effort config path: `./ptedit.toml` first, then the platform config
/// dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ptedit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
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
                raw: Some(content),
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

/// Document path precedence: CLI argument, then the `SAVE_TXT` value, then
/// `[document].path`, then `saved.txt`. Empty values are skipped.
pub fn resolve_document_path(
    cli: Option<&Path>,
    env: Option<OsString>,
    configured: Option<&Path>,
) -> PathBuf {
    if let Some(p) = cli.filter(|p| !p.as_os_str().is_empty()) {
        return p.to_path_buf();
    }
    if let Some(p) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }
    if let Some(p) = configured.filter(|p| !p.as_os_str().is_empty()) {
        return p.to_path_buf();
    }
    PathBuf::from(DEFAULT_DOCUMENT_PATH)
}

fn clamp_nonzero(field: &'static str, raw: usize) -> usize {
    if raw == 0 {
        info!(target: "config", field, raw, clamped = 1, "viewport_value_clamped");
        1
    } else {
        raw
    }
}

impl Config {
    /// Clamped viewport geometry. Zero dimensions become 1.
    pub fn viewport(&self) -> Viewport {
        let v = &self.file.viewport;
        Viewport {
            width: clamp_nonzero("viewport.width", v.width),
            height: clamp_nonzero("viewport.height", v.height),
            line_height: clamp_nonzero("viewport.line_height", v.line_height),
            cursor_width: clamp_nonzero("cursor.width", self.file.cursor.width),
        }
    }

    pub fn initial_line_count(&self) -> usize {
        self.viewport().initial_line_count()
    }

    /// Resolve the document path against the process environment.
    pub fn document_path(&self, cli: Option<&Path>) -> PathBuf {
        resolve_document_path(
            cli,
            std::env::var_os(DOCUMENT_PATH_ENV),
            self.file.document.path.as_deref(),
        )
    }
}
