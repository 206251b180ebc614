//! Corpus enumeration and the filename-keyed migration index.
//!
//! A corpus is an ordered list of locale directories. Documents are matched
//! across corpora by bare filename only: `en/post-a.md` in the legacy tree is
//! the counterpart of `en/post-a.md`, `zh/post-a.md`, or any other
//! `post-a.md` in the target tree. Filenames are assumed to be stable and
//! unique per locale; nothing verifies that, so every pass reports the target
//! files it could not match.
//!
//! Only the top level of each directory is listed. A directory that does not
//! exist is skipped (legacy corpora are often partially present), while a path
//! that exists but is not a directory is an error.

use crate::frontmatter::{self, Extracted, Fields};
use crate::migrate::{MigrateError, MigrateEvent, emit};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use walkdir::WalkDir;

/// A document read from disk.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub filename: String,
    pub text: String,
    /// `None` when the document has no metadata block.
    pub parsed: Option<Extracted>,
}

impl Document {
    pub fn read(path: &Path) -> Result<Self, MigrateError> {
        let text = fs::read_to_string(path).map_err(|source| MigrateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(path, text))
    }

    pub fn from_text(path: &Path, text: String) -> Self {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parsed = frontmatter::extract(&text);
        Self {
            path: path.to_path_buf(),
            filename,
            text,
            parsed,
        }
    }

    pub fn fields(&self) -> Option<&Fields> {
        self.parsed.as_ref().map(|p| &p.fields)
    }

    /// Filename without its extension.
    pub fn stem(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// What a selector found in one legacy document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<V> {
    Found(V),
    /// The document simply does not carry the value.
    Absent,
    /// The value is present but unusable; the reason is reported.
    Rejected(String),
}

/// Filename → what the legacy document offered, built once per pass and then
/// dropped.
///
/// Every legacy document gets an entry, including those without a usable
/// value, so their target counterparts still count as matched.
#[derive(Debug, Clone)]
pub struct MigrationIndex<V> {
    entries: HashMap<String, Selection<V>>,
}

impl<V> Default for MigrationIndex<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> MigrationIndex<V> {
    /// Record a legacy document. A later document replaces an earlier one
    /// with the same filename unless it is `Absent`, which never shadows a
    /// value or a rejection.
    pub fn insert(&mut self, filename: String, selection: Selection<V>) {
        if matches!(selection, Selection::Absent) && self.entries.contains_key(&filename) {
            return;
        }
        self.entries.insert(filename, selection);
    }

    pub fn get(&self, filename: &str) -> Option<&Selection<V>> {
        self.entries.get(filename)
    }

    /// The usable value for `filename`, if any.
    pub fn value(&self, filename: &str) -> Option<&V> {
        match self.entries.get(filename)? {
            Selection::Found(value) => Some(value),
            Selection::Absent | Selection::Rejected(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e.as_str())))
        .unwrap_or(false)
}

/// List document files directly inside `dir`, sorted by filename.
///
/// Returns `Ok(None)` when `dir` does not exist.
pub fn list_documents(dir: &Path, extensions: &[String]) -> Result<Option<Vec<PathBuf>>, MigrateError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(MigrateError::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(MigrateError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| MigrateError::Io {
            path: err.path().unwrap_or(dir).to_path_buf(),
            source: err.into(),
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            paths.push(entry.into_path());
        }
    }
    Ok(Some(paths))
}

/// Build a filename-keyed index over a set of directories.
///
/// Directories are read in order, so a filename present in several of them
/// ends up with the value from the last. Missing directories and rejected
/// documents are reported through `events`.
pub fn build_index<V, F>(
    dirs: &[PathBuf],
    extensions: &[String],
    mut select: F,
    events: Option<&Sender<MigrateEvent>>,
) -> Result<MigrationIndex<V>, MigrateError>
where
    F: FnMut(&Document) -> Selection<V>,
{
    let mut index = MigrationIndex::default();

    for dir in dirs {
        let Some(paths) = list_documents(dir, extensions)? else {
            emit(events, MigrateEvent::DirectoryMissing { path: dir.clone() });
            continue;
        };

        for path in paths {
            let doc = Document::read(&path)?;
            let selection = select(&doc);
            if let Selection::Rejected(reason) = &selection {
                emit(
                    events,
                    MigrateEvent::SourceRejected {
                        path,
                        reason: reason.clone(),
                    },
                );
            }
            index.insert(doc.filename, selection);
        }
    }

    Ok(index)
}
