//! # Corpus Migrate
//!
//! A one-shot batch tool that carries metadata and references from a legacy
//! blog corpus into a restructured one. Both sides are plain directories of
//! Markdown files with a `---`-delimited frontmatter block, split into one
//! directory per locale.
//!
//! # Architecture: Independent Passes
//!
//! ```text
//! frontmatter   target            →  target   (rebuild block to fixed schema)
//! dates         legacy + target   →  target   (patch pubDate from legacy date)
//! tags          legacy + target   →  target   (carry legacy tags over)
//! images        target            →  target   (re-root image references)
//! ```
//!
//! Each pass reads whole files, transforms them in memory and writes them
//! back. Passes do not depend on each other beyond seeing what earlier passes
//! left on disk. Carryover passes match documents across corpora by filename
//! alone and report every target file they could not match.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | Metadata block parsing, total reconstruction, targeted patch |
//! | [`normalize`] | Date and tag canonicalization with explicit fallbacks |
//! | [`index`] | Corpus listing and the filename-keyed migration index |
//! | [`migrate`] | Pass drivers, the four passes, events and reports |
//! | [`rewrite`] | Image path classification and body rewriting |
//! | [`config`] | `migrate.toml` loading, defaults and validation |
//! | [`output`] | CLI formatting of events and pass summaries |
//!
//! # Design Decisions
//!
//! ## Two Ways to Write Frontmatter
//!
//! [`frontmatter::serialize`] rebuilds a whole block and drops anything it is
//! not given; [`frontmatter::replace_field`] changes one value and nothing
//! else. They are separate functions so a pass that means to patch one field
//! cannot drop the others by accident.
//!
//! ## Fallbacks Are Values, Not Log Lines
//!
//! An unreadable date becomes today's date, which is wrong in a way nobody
//! notices later. [`normalize::normalize_date`] returns
//! [`normalize::Normalized::Defaulted`] for that case, passes surface it as a
//! [`migrate::MigrateEvent::DateDefaulted`] and in
//! [`migrate::PassReport::defaulted`], and `strict_dates` turns it into an
//! error.
//!
//! ## Line-Based Frontmatter
//!
//! Legacy frontmatter is not reliably YAML. The codec reads `key: value`
//! lines and simple block sequences, which is all the migration needs, and
//! never fails on a line it does not understand. Target blocks are read as
//! YAML before the tag pass patches them, and only the `tags` entry is
//! rewritten, so fields the line reader cannot represent survive.

pub mod config;
pub mod frontmatter;
pub mod index;
pub mod migrate;
pub mod normalize;
pub mod output;
pub mod rewrite;

#[cfg(test)]
pub(crate) mod test_helpers;
