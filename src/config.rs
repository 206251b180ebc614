//! Migration configuration.
//!
//! Loaded from `migrate.toml` in the project root. Stock defaults describe the
//! usual blog layout (two locales, legacy posts one directory up); a user file
//! only needs the keys it wants to change.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! extensions = ["md"]          # Which files count as documents
//!
//! [corpus]
//! legacy = ["../blog/src/posts", "../blog/src/posts-zh_cn"]
//! target = ["src/content/blog/en", "src/content/blog/zh"]
//!
//! [reconstruct]
//! hero_image = "/blog-placeholder-1.jpg"
//! strict_dates = false         # Fail instead of defaulting unreadable dates
//!
//! [tags]
//! mode = "replace"             # or "merge"
//!
//! [rewrite]
//! asset_root = "/src/assets/"
//! images_root = "/src/assets/images/"
//! ```
//!
//! Corpus paths are relative to the project root unless absolute. The legacy
//! and target lists are locale-ordered: when two legacy directories contain
//! the same filename, the later one wins.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the project root.
pub const CONFIG_FILENAME: &str = "migrate.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrateConfig {
    /// File extensions (without dot) treated as documents.
    pub extensions: Vec<String>,
    pub corpus: CorpusConfig,
    pub reconstruct: ReconstructConfig,
    pub tags: TagsConfig,
    pub rewrite: RewriteConfig,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            corpus: CorpusConfig::default(),
            reconstruct: ReconstructConfig::default(),
            tags: TagsConfig::default(),
            rewrite: RewriteConfig::default(),
        }
    }
}

impl MigrateConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        if self.extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
            return Err(ConfigError::Validation(
                "extensions must be non-empty and given without a leading dot".into(),
            ));
        }
        if !self.rewrite.asset_root.ends_with('/') || !self.rewrite.images_root.ends_with('/') {
            return Err(ConfigError::Validation(
                "rewrite.asset_root and rewrite.images_root must end with '/'".into(),
            ));
        }
        Ok(())
    }
}

/// Locale-ordered legacy and target directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusConfig {
    /// Read-only source corpus.
    pub legacy: Vec<PathBuf>,
    /// Corpus rewritten in place.
    pub target: Vec<PathBuf>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            legacy: vec![
                PathBuf::from("../blog/src/posts"),
                PathBuf::from("../blog/src/posts-zh_cn"),
            ],
            target: vec![
                PathBuf::from("src/content/blog/en"),
                PathBuf::from("src/content/blog/zh"),
            ],
        }
    }
}

impl CorpusConfig {
    /// Resolve both lists against `root`.
    pub fn resolve(&self, root: &Path) -> CorpusConfig {
        let join = |dirs: &[PathBuf]| -> Vec<PathBuf> { dirs.iter().map(|d| root.join(d)).collect() };
        CorpusConfig {
            legacy: join(&self.legacy),
            target: join(&self.target),
        }
    }
}

/// Frontmatter reconstruction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconstructConfig {
    /// Placeholder written to every document's `heroImage`.
    pub hero_image: String,
    /// Treat an unreadable or missing date as an error instead of using today.
    pub strict_dates: bool,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            hero_image: "/blog-placeholder-1.jpg".to_string(),
            strict_dates: false,
        }
    }
}

/// How carried-over tags combine with tags already on the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMode {
    /// Legacy tags replace whatever the target has.
    #[default]
    Replace,
    /// Target tags first, then legacy tags not already present.
    Merge,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagsConfig {
    pub mode: TagMode,
}

/// Image reference rewrite targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// Replaces everything up to and including `assets/`.
    pub asset_root: String,
    /// Prefix for bare relative image paths.
    pub images_root: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            asset_root: "/src/assets/".to_string(),
            images_root: "/src/assets/images/".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(MigrateConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `migrate.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `migrate.toml` in `root`, on top of stock defaults.
pub fn load_config(root: &Path) -> Result<MigrateConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: MigrateConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `migrate.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Corpus migration configuration
# ==============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# File extensions (without the dot) that count as documents.
extensions = ["md"]

# ---------------------------------------------------------------------------
# Corpora
# ---------------------------------------------------------------------------
# One directory per locale, relative to this file unless absolute.
# Documents are matched between the two sides by filename. If the same
# filename exists in several legacy directories, the last one listed wins.
[corpus]
legacy = ["../blog/src/posts", "../blog/src/posts-zh_cn"]
target = ["src/content/blog/en", "src/content/blog/zh"]

# ---------------------------------------------------------------------------
# Frontmatter reconstruction
# ---------------------------------------------------------------------------
[reconstruct]
# Written to every document's heroImage field.
hero_image = "/blog-placeholder-1.jpg"

# When a date is missing or unreadable the document gets today's date.
# Set to true to abort the pass instead.
strict_dates = false

# ---------------------------------------------------------------------------
# Tag carryover
# ---------------------------------------------------------------------------
[tags]
# "replace": legacy tags overwrite the target's tags.
# "merge":   keep the target's tags and append legacy tags it lacks.
mode = "replace"

# ---------------------------------------------------------------------------
# Image reference rewrite
# ---------------------------------------------------------------------------
[rewrite]
# Paths containing "assets/" are re-rooted here.
asset_root = "/src/assets/"

# Other relative image paths are prefixed with this.
images_root = "/src/assets/images/"
"##
}
