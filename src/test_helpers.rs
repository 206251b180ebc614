//! Shared test utilities for the migration test suite.
//!
//! Provides a throwaway project layout with a legacy and a target corpus,
//! each split into `en` and `zh` locale directories, plus small file helpers.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let corpus = TestCorpus::new();
//! corpus.legacy("en", "post-a.md", "---\ndate: \"2021-05-01\"\n---\n");
//! let target = corpus.target("en", "post-a.md", "---\npubDate: \"2000-01-01\"\n---\n");
//!
//! let report = run_carryover(&pass, &corpus.config(), &["md".into()], false, None).unwrap();
//! assert_eq!(read(&target), "...");
//! ```
//!
//! Locale directories are only created when a document is written into them,
//! so an untouched locale doubles as a "missing directory" fixture.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{CorpusConfig, MigrateConfig};

const LOCALES: [&str; 2] = ["en", "zh"];

/// Write `content` to `dir/rel`, creating parent directories. Returns the path.
pub fn write_doc(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Read a file to string. Panics with the path on failure.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// Bare filenames of a list of paths, in order.
pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// A temporary project with `legacy/<locale>` and `target/<locale>` corpora.
pub struct TestCorpus {
    tmp: TempDir,
}

impl TestCorpus {
    pub fn new() -> Self {
        Self {
            tmp: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Write a legacy document.
    pub fn legacy(&self, locale: &str, name: &str, content: &str) -> PathBuf {
        write_doc(&self.root().join("legacy").join(locale), name, content)
    }

    /// Write a target document.
    pub fn target(&self, locale: &str, name: &str, content: &str) -> PathBuf {
        write_doc(&self.root().join("target").join(locale), name, content)
    }

    /// Corpus with absolute paths, ready for the pass drivers.
    pub fn config(&self) -> CorpusConfig {
        self.migrate_config().corpus.resolve(self.root())
    }

    /// Full config with root-relative corpus paths.
    pub fn migrate_config(&self) -> MigrateConfig {
        let rel = |side: &str| {
            LOCALES
                .iter()
                .map(|l| Path::new(side).join(l))
                .collect::<Vec<_>>()
        };
        MigrateConfig {
            corpus: CorpusConfig {
                legacy: rel("legacy"),
                target: rel("target"),
            },
            ..MigrateConfig::default()
        }
    }
}
