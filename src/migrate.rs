//! Migration passes.
//!
//! Four independent passes mutate the target corpus in place:
//!
//! | Pass          | Reads legacy? | Mutation                                       |
//! |---------------|---------------|------------------------------------------------|
//! | `frontmatter` | no            | rebuilds the metadata block to a fixed schema  |
//! | `dates`       | yes           | patches `pubDate` with the legacy `date`       |
//! | `tags`        | yes           | rewrites the `tags` entry with legacy tags     |
//! | `images`      | no            | re-roots image references in the body          |
//!
//! Passes that read the legacy corpus share one shape ([`Carryover`]): build a
//! filename index from the legacy directories, then walk the target
//! directories and apply the indexed value to each matching document. Target
//! documents without a legacy counterpart are reported and left byte-identical.
//! A target whose counterpart has no usable value is skipped with the reason,
//! not reported as unmatched.
//! Passes over the target alone implement [`Transform`].
//!
//! ## Failure model
//!
//! Missing directories, unmatched files and missing fields are reported as
//! [`MigrateEvent`]s and the pass carries on. Any other I/O failure aborts the
//! pass with a [`MigrateError`]. Nothing is retried or rolled back; files
//! already written stay written, and re-running a carryover pass is safe.
//!
//! Each file is read whole, transformed in memory and written back whole.
//! Running two migrations against the same corpus at once is not supported.

use crate::config::{CorpusConfig, MigrateConfig, TagMode};
use crate::frontmatter::{self, FieldValue, Fields};
use crate::index::{self, Document, Selection};
use crate::normalize::{self, Normalized};
use crate::rewrite::Rewriter;
use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Legacy field holding the publication date.
pub const LEGACY_DATE_FIELD: &str = "date";
/// Target field holding the publication date.
pub const TARGET_DATE_FIELD: &str = "pubDate";
pub const TAGS_FIELD: &str = "tags";

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Unusable date {raw:?} in {}: {reason}", .path.display())]
    UnparseableDate {
        path: PathBuf,
        raw: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Frontmatter,
    Dates,
    Tags,
    Images,
}

impl PassKind {
    /// Order used when running every pass.
    pub const ALL: [PassKind; 4] = [
        PassKind::Frontmatter,
        PassKind::Dates,
        PassKind::Tags,
        PassKind::Images,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PassKind::Frontmatter => "frontmatter",
            PassKind::Dates => "dates",
            PassKind::Tags => "tags",
            PassKind::Images => "images",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress and diagnostics emitted while a pass runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrateEvent {
    PassStarted { pass: PassKind },
    IndexBuilt { entries: usize },
    DirectoryMissing { path: PathBuf },
    /// A legacy document carried a value that could not be used.
    SourceRejected { path: PathBuf, reason: String },
    /// Target document with no legacy counterpart.
    Unmatched { path: PathBuf },
    Updated { path: PathBuf, detail: String },
    Unchanged { path: PathBuf },
    Skipped { path: PathBuf, reason: String },
    /// A date could not be read and today's date was written instead.
    DateDefaulted { path: PathBuf, value: String, reason: String },
}

pub(crate) fn emit(events: Option<&Sender<MigrateEvent>>, event: MigrateEvent) {
    if let Some(tx) = events {
        // Receiver gone means nobody is listening; the pass itself goes on.
        tx.send(event).ok();
    }
}

/// Summary of one pass over the target corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub pass: PassKind,
    pub dry_run: bool,
    /// Legacy index size, for passes that build one.
    pub indexed: Option<usize>,
    pub updated: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, String)>,
    /// Target documents with no legacy counterpart.
    pub unmatched: Vec<PathBuf>,
    /// Documents that received a substituted date.
    pub defaulted: Vec<PathBuf>,
}

impl PassReport {
    fn new(pass: PassKind, dry_run: bool) -> Self {
        Self {
            pass,
            dry_run,
            indexed: None,
            updated: Vec::new(),
            unchanged: Vec::new(),
            skipped: Vec::new(),
            unmatched: Vec::new(),
            defaulted: Vec::new(),
        }
    }
}

/// What a pass decided for one target document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// New full document text. Written only if it differs from the original.
    Rewrite {
        text: String,
        detail: String,
        /// Set when a fallback date went into `text`.
        defaulted: Option<Defaulted>,
    },
    /// Leave the document alone, with a reason.
    Skip(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaulted {
    pub value: String,
    pub reason: String,
}

impl Outcome {
    fn rewrite(text: String, detail: String) -> Self {
        Outcome::Rewrite {
            text,
            detail,
            defaulted: None,
        }
    }
}

/// A pass joining legacy documents to target documents by filename.
pub trait Carryover {
    type Value;

    fn kind(&self) -> PassKind;

    /// Legacy field the value comes from, for diagnostics.
    fn source_field(&self) -> &'static str;

    /// Pull the value to carry over out of a legacy document.
    fn select(&self, doc: &Document) -> Selection<Self::Value>;

    /// Merge the value into a target document.
    fn apply(&self, doc: &Document, value: &Self::Value) -> Outcome;
}

/// A pass that rewrites target documents on their own.
pub trait Transform {
    fn kind(&self) -> PassKind;

    fn transform(&self, doc: &Document) -> Result<Outcome, MigrateError>;
}

// ============================================================================
// Concrete passes
// ============================================================================

/// Copies the legacy `date` into the target's `pubDate` line.
#[derive(Debug, Clone)]
pub struct DateCarryover {
    pub today: NaiveDate,
}

impl Carryover for DateCarryover {
    type Value = String;

    fn kind(&self) -> PassKind {
        PassKind::Dates
    }

    fn source_field(&self) -> &'static str {
        LEGACY_DATE_FIELD
    }

    fn select(&self, doc: &Document) -> Selection<String> {
        let Some(raw) = doc
            .fields()
            .and_then(|f| frontmatter::get_scalar(f, LEGACY_DATE_FIELD))
        else {
            return Selection::Absent;
        };
        // A substituted "today" would overwrite a real date with a wrong one.
        match normalize::normalize_date(raw, self.today) {
            Normalized::Parsed(date) => Selection::Found(date),
            Normalized::Defaulted { reason, .. } => Selection::Rejected(reason),
        }
    }

    fn apply(&self, doc: &Document, value: &String) -> Outcome {
        if !frontmatter::has_field(&doc.text, TARGET_DATE_FIELD) {
            return Outcome::Skip(format!("no {TARGET_DATE_FIELD} field"));
        }
        Outcome::rewrite(
            frontmatter::replace_field(&doc.text, TARGET_DATE_FIELD, value),
            format!("{TARGET_DATE_FIELD} = {value}"),
        )
    }
}

/// Tags of a field, whichever form they were written in.
fn tags_of(fields: &Fields) -> Vec<String> {
    match frontmatter::get(fields, TAGS_FIELD) {
        Some(FieldValue::List(items)) => items
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        Some(FieldValue::Scalar(raw)) => normalize::normalize_tags(raw),
        None => Vec::new(),
    }
}

/// Tags already in a target document's YAML mapping.
fn yaml_tags(mapping: &serde_yaml::Mapping) -> Vec<String> {
    use serde_yaml::Value;

    fn text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    match mapping.get(TAGS_FIELD) {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(text)
            .filter(|t| !t.is_empty())
            .collect(),
        Some(Value::String(raw)) => normalize::normalize_tags(raw),
        _ => Vec::new(),
    }
}

/// Copies legacy `tags` into the target's `tags` entry.
///
/// Only that entry is rewritten. The target block has to be valid YAML so
/// its existing tags can be read; a block that is not is skipped.
#[derive(Debug, Clone)]
pub struct TagCarryover {
    pub mode: TagMode,
}

impl Carryover for TagCarryover {
    type Value = Vec<String>;

    fn kind(&self) -> PassKind {
        PassKind::Tags
    }

    fn source_field(&self) -> &'static str {
        TAGS_FIELD
    }

    fn select(&self, doc: &Document) -> Selection<Vec<String>> {
        match doc.fields().map(tags_of) {
            Some(tags) if !tags.is_empty() => Selection::Found(tags),
            _ => Selection::Absent,
        }
    }

    fn apply(&self, doc: &Document, value: &Vec<String>) -> Outcome {
        let existing = match frontmatter::parse_yaml(&doc.text) {
            None => Vec::new(),
            Some(Ok(mapping)) => yaml_tags(&mapping),
            Some(Err(err)) => return Outcome::Skip(err.to_string()),
        };

        let tags = match self.mode {
            TagMode::Replace => value.clone(),
            TagMode::Merge => {
                let mut merged = existing;
                for tag in value {
                    if !merged.contains(tag) {
                        merged.push(tag.clone());
                    }
                }
                merged
            }
        };

        let detail = format!("{TAGS_FIELD} = {}", tags.join(", "));
        Outcome::rewrite(frontmatter::upsert_list(&doc.text, TAGS_FIELD, &tags), detail)
    }
}

/// Rebuilds every metadata block to the schema the site expects.
///
/// Output fields, in order: `title`, `description`, `pubDate`, `heroImage`,
/// `tags`. Everything else is dropped, so this pass is not safe to re-run
/// over hand-edited documents.
#[derive(Debug, Clone)]
pub struct Reconstruct {
    pub hero_image: String,
    pub strict_dates: bool,
    pub today: NaiveDate,
}

impl Transform for Reconstruct {
    fn kind(&self) -> PassKind {
        PassKind::Frontmatter
    }

    fn transform(&self, doc: &Document) -> Result<Outcome, MigrateError> {
        let Some(parsed) = &doc.parsed else {
            return Ok(Outcome::Skip("no frontmatter".to_string()));
        };
        let fields = &parsed.fields;

        let title = frontmatter::get_scalar(fields, "title")
            .map(String::from)
            .unwrap_or_else(|| doc.stem());
        let description = frontmatter::get_scalar(fields, "description")
            .or_else(|| frontmatter::get_scalar(fields, "title"))
            .unwrap_or_default()
            .to_string();

        let raw_date = frontmatter::get_scalar(fields, LEGACY_DATE_FIELD)
            .or_else(|| frontmatter::get_scalar(fields, TARGET_DATE_FIELD))
            .unwrap_or_default();
        let (pub_date, defaulted) = match normalize::normalize_date(raw_date, self.today) {
            Normalized::Parsed(date) => (date, None),
            Normalized::Defaulted { reason, .. } if self.strict_dates => {
                return Err(MigrateError::UnparseableDate {
                    path: doc.path.clone(),
                    raw: raw_date.to_string(),
                    reason,
                });
            }
            Normalized::Defaulted { value, reason } => (
                value.clone(),
                Some(Defaulted { value, reason }),
            ),
        };

        let tags = tags_of(fields);
        let rebuilt: Fields = vec![
            ("title".to_string(), FieldValue::Scalar(title)),
            ("description".to_string(), FieldValue::Scalar(description)),
            (TARGET_DATE_FIELD.to_string(), FieldValue::Scalar(pub_date.clone())),
            ("heroImage".to_string(), FieldValue::Scalar(self.hero_image.clone())),
            (TAGS_FIELD.to_string(), FieldValue::List(tags)),
        ];

        Ok(Outcome::Rewrite {
            text: frontmatter::serialize_with(
                frontmatter::Layout::of(&doc.text),
                &rebuilt,
                &parsed.body,
            ),
            detail: format!("{TARGET_DATE_FIELD} = {pub_date}"),
            defaulted,
        })
    }
}

/// Re-roots image references in document bodies.
#[derive(Debug, Clone)]
pub struct ImageRewrite {
    pub rewriter: Rewriter,
}

impl Transform for ImageRewrite {
    fn kind(&self) -> PassKind {
        PassKind::Images
    }

    fn transform(&self, doc: &Document) -> Result<Outcome, MigrateError> {
        let result = self.rewriter.rewrite_document(&doc.text);
        let noun = if result.rewritten == 1 { "reference" } else { "references" };
        Ok(Outcome::rewrite(
            result.text,
            format!("{} image {noun}", result.rewritten),
        ))
    }
}

// ============================================================================
// Drivers
// ============================================================================

/// Walk the target directories and apply `decide` to every document.
///
/// `decide` returns `Ok(None)` for a document with no legacy counterpart.
fn drive<F>(
    targets: &[PathBuf],
    extensions: &[String],
    dry_run: bool,
    events: Option<&Sender<MigrateEvent>>,
    report: &mut PassReport,
    mut decide: F,
) -> Result<(), MigrateError>
where
    F: FnMut(&Document) -> Result<Option<Outcome>, MigrateError>,
{
    for dir in targets {
        let Some(paths) = index::list_documents(dir, extensions)? else {
            emit(events, MigrateEvent::DirectoryMissing { path: dir.clone() });
            continue;
        };

        for path in paths {
            let doc = Document::read(&path)?;
            match decide(&doc)? {
                None => {
                    emit(events, MigrateEvent::Unmatched { path: path.clone() });
                    report.unmatched.push(path);
                }
                Some(Outcome::Skip(reason)) => {
                    emit(
                        events,
                        MigrateEvent::Skipped {
                            path: path.clone(),
                            reason: reason.clone(),
                        },
                    );
                    report.skipped.push((path, reason));
                }
                Some(Outcome::Rewrite {
                    text,
                    detail,
                    defaulted,
                }) => {
                    if let Some(Defaulted { value, reason }) = defaulted {
                        emit(
                            events,
                            MigrateEvent::DateDefaulted {
                                path: path.clone(),
                                value,
                                reason,
                            },
                        );
                        report.defaulted.push(path.clone());
                    }
                    if text == doc.text {
                        emit(events, MigrateEvent::Unchanged { path: path.clone() });
                        report.unchanged.push(path);
                        continue;
                    }
                    if !dry_run {
                        write_document(&path, &text)?;
                    }
                    emit(
                        events,
                        MigrateEvent::Updated {
                            path: path.clone(),
                            detail,
                        },
                    );
                    report.updated.push(path);
                }
            }
        }
    }
    Ok(())
}

fn write_document(path: &Path, text: &str) -> Result<(), MigrateError> {
    fs::write(path, text).map_err(|source| MigrateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Run a legacy → target carryover pass.
pub fn run_carryover<C: Carryover>(
    pass: &C,
    corpus: &CorpusConfig,
    extensions: &[String],
    dry_run: bool,
    events: Option<&Sender<MigrateEvent>>,
) -> Result<PassReport, MigrateError> {
    let mut report = PassReport::new(pass.kind(), dry_run);

    let legacy = index::build_index(&corpus.legacy, extensions, |doc| pass.select(doc), events)?;
    emit(events, MigrateEvent::IndexBuilt { entries: legacy.len() });
    report.indexed = Some(legacy.len());

    drive(
        &corpus.target,
        extensions,
        dry_run,
        events,
        &mut report,
        |doc| {
            Ok(legacy.get(&doc.filename).map(|selection| match selection {
                Selection::Found(value) => pass.apply(doc, value),
                Selection::Absent => {
                    Outcome::Skip(format!("legacy document has no {}", pass.source_field()))
                }
                Selection::Rejected(reason) => {
                    Outcome::Skip(format!("legacy {} unusable: {reason}", pass.source_field()))
                }
            }))
        },
    )?;
    Ok(report)
}

/// Run a pass over the target corpus alone.
pub fn run_in_place<T: Transform>(
    pass: &T,
    targets: &[PathBuf],
    extensions: &[String],
    dry_run: bool,
    events: Option<&Sender<MigrateEvent>>,
) -> Result<PassReport, MigrateError> {
    let mut report = PassReport::new(pass.kind(), dry_run);
    drive(
        targets,
        extensions,
        dry_run,
        events,
        &mut report,
        |doc| pass.transform(doc).map(Some),
    )?;
    Ok(report)
}

// ============================================================================
// Migrator
// ============================================================================

/// Runs passes against one project using its resolved configuration.
///
/// ```no_run
/// # use corpus_migrate::{config, migrate::{Migrator, PassKind}};
/// # use std::path::Path;
/// let root = Path::new(".");
/// let config = config::load_config(root).unwrap();
/// let report = Migrator::new(config, root).dry_run(true).run(PassKind::Dates).unwrap();
/// println!("{} unmatched", report.unmatched.len());
/// ```
pub struct Migrator {
    config: MigrateConfig,
    corpus: CorpusConfig,
    dry_run: bool,
    today: NaiveDate,
    events: Option<Sender<MigrateEvent>>,
}

impl Migrator {
    /// Corpus paths in `config` are resolved against `root`.
    pub fn new(config: MigrateConfig, root: &Path) -> Self {
        let corpus = config.corpus.resolve(root);
        Self {
            config,
            corpus,
            dry_run: false,
            today: chrono::Local::now().date_naive(),
            events: None,
        }
    }

    /// Compute reports without writing any file.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Date substituted for missing or unreadable dates.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn events(mut self, tx: Sender<MigrateEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn run(&self, pass: PassKind) -> Result<PassReport, MigrateError> {
        let events = self.events.as_ref();
        let extensions = &self.config.extensions;
        emit(events, MigrateEvent::PassStarted { pass });

        match pass {
            PassKind::Dates => run_carryover(
                &DateCarryover { today: self.today },
                &self.corpus,
                extensions,
                self.dry_run,
                events,
            ),
            PassKind::Tags => run_carryover(
                &TagCarryover {
                    mode: self.config.tags.mode,
                },
                &self.corpus,
                extensions,
                self.dry_run,
                events,
            ),
            PassKind::Frontmatter => run_in_place(
                &Reconstruct {
                    hero_image: self.config.reconstruct.hero_image.clone(),
                    strict_dates: self.config.reconstruct.strict_dates,
                    today: self.today,
                },
                &self.corpus.target,
                extensions,
                self.dry_run,
                events,
            ),
            PassKind::Images => run_in_place(
                &ImageRewrite {
                    rewriter: Rewriter::new(&self.config.rewrite),
                },
                &self.corpus.target,
                extensions,
                self.dry_run,
                events,
            ),
        }
    }

    /// Run every pass in [`PassKind::ALL`] order, stopping at the first error.
    pub fn run_all(&self) -> Result<Vec<PassReport>, MigrateError> {
        PassKind::ALL.iter().map(|&pass| self.run(pass)).collect()
    }
}
