//! CLI output formatting for migration passes.
//!
//! # Output Format
//!
//! Events stream as the pass runs, one entity per line with indented context:
//!
//! ```text
//! ==> dates
//!     Missing directory: ../blog/src/posts-zh_cn
//!     Indexed 42 legacy documents
//!     Updated post-a.md
//!         pubDate = 2021-05-01
//!     No match post-b.md
//!     Skipped post-c.md
//!         Reason: no pubDate field
//! ```
//!
//! and each pass ends with a summary:
//!
//! ```text
//! dates: 1 updated, 0 unchanged, 1 skipped, 1 unmatched
//!     Unmatched: post-b.md
//! ```
//!
//! Format functions return `Vec<String>` and do no I/O so they can be tested;
//! the `print_*` wrappers write to stdout.

use crate::migrate::{MigrateEvent, PassReport};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display name for a document: its filename, or the whole path if it has none.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format a single migration event as display lines.
pub fn format_event(event: &MigrateEvent) -> Vec<String> {
    match event {
        MigrateEvent::PassStarted { pass } => vec![format!("==> {pass}")],
        MigrateEvent::IndexBuilt { entries } => vec![format!(
            "{}Indexed {}",
            indent(1),
            plural(*entries, "legacy document", "legacy documents")
        )],
        MigrateEvent::DirectoryMissing { path } => {
            vec![format!("{}Missing directory: {}", indent(1), path.display())]
        }
        MigrateEvent::SourceRejected { path, reason } => vec![
            format!("{}Ignored legacy {}", indent(1), file_label(path)),
            format!("{}Reason: {}", indent(2), reason),
        ],
        MigrateEvent::Unmatched { path } => {
            vec![format!("{}No match {}", indent(1), file_label(path))]
        }
        MigrateEvent::Updated { path, detail } => vec![
            format!("{}Updated {}", indent(1), file_label(path)),
            format!("{}{}", indent(2), detail),
        ],
        MigrateEvent::Unchanged { path } => {
            vec![format!("{}Unchanged {}", indent(1), file_label(path))]
        }
        MigrateEvent::Skipped { path, reason } => vec![
            format!("{}Skipped {}", indent(1), file_label(path)),
            format!("{}Reason: {}", indent(2), reason),
        ],
        MigrateEvent::DateDefaulted {
            path,
            value,
            reason,
        } => vec![
            format!("{}WARNING date defaulted in {}", indent(1), file_label(path)),
            format!("{}Used {} ({})", indent(2), value, reason),
        ],
    }
}

/// Format the end-of-pass summary.
pub fn format_report(report: &PassReport) -> Vec<String> {
    let mut lines = Vec::new();
    let verb = if report.dry_run { "would update" } else { "updated" };
    lines.push(format!(
        "{}: {} {}, {} unchanged, {} skipped, {} unmatched",
        report.pass,
        report.updated.len(),
        verb,
        report.unchanged.len(),
        report.skipped.len(),
        report.unmatched.len(),
    ));

    if !report.unmatched.is_empty() {
        let names: Vec<String> = report.unmatched.iter().map(|p| file_label(p)).collect();
        lines.push(format!("{}Unmatched: {}", indent(1), names.join(", ")));
    }
    if !report.defaulted.is_empty() {
        let names: Vec<String> = report.defaulted.iter().map(|p| file_label(p)).collect();
        lines.push(format!(
            "{}Defaulted dates: {}",
            indent(1),
            names.join(", ")
        ));
    }
    lines
}

/// Print a pass summary to stdout.
pub fn print_report(report: &PassReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::PassKind;
    use std::path::PathBuf;

    fn empty_report(pass: PassKind) -> PassReport {
        PassReport {
            pass,
            dry_run: false,
            indexed: None,
            updated: vec![],
            unchanged: vec![],
            skipped: vec![],
            unmatched: vec![],
            defaulted: vec![],
        }
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn format_pass_started() {
        let lines = format_event(&MigrateEvent::PassStarted {
            pass: PassKind::Tags,
        });
        assert_eq!(lines, vec!["==> tags"]);
    }

    #[test]
    fn format_index_built_pluralizes() {
        assert_eq!(
            format_event(&MigrateEvent::IndexBuilt { entries: 1 }),
            vec!["    Indexed 1 legacy document"]
        );
        assert_eq!(
            format_event(&MigrateEvent::IndexBuilt { entries: 3 }),
            vec!["    Indexed 3 legacy documents"]
        );
    }

    #[test]
    fn format_updated_names_file_and_detail() {
        let lines = format_event(&MigrateEvent::Updated {
            path: PathBuf::from("/site/en/post-a.md"),
            detail: "pubDate = 2021-05-01".to_string(),
        });
        assert_eq!(
            lines,
            vec!["    Updated post-a.md", "        pubDate = 2021-05-01"]
        );
    }

    #[test]
    fn format_unmatched_names_file() {
        let lines = format_event(&MigrateEvent::Unmatched {
            path: PathBuf::from("/site/zh/post-b.md"),
        });
        assert_eq!(lines, vec!["    No match post-b.md"]);
    }

    #[test]
    fn format_skipped_with_reason() {
        let lines = format_event(&MigrateEvent::Skipped {
            path: PathBuf::from("c.md"),
            reason: "no pubDate field".to_string(),
        });
        assert_eq!(lines[1], "        Reason: no pubDate field");
    }

    #[test]
    fn format_date_defaulted_is_a_warning() {
        let lines = format_event(&MigrateEvent::DateDefaulted {
            path: PathBuf::from("d.md"),
            value: "2024-06-01".to_string(),
            reason: "could not parse date: soon".to_string(),
        });
        assert!(lines[0].contains("WARNING"));
        assert!(lines[1].contains("2024-06-01"));
    }

    #[test]
    fn format_report_summary_line() {
        let mut report = empty_report(PassKind::Dates);
        report.updated.push(PathBuf::from("a.md"));
        report.unmatched.push(PathBuf::from("/x/b.md"));
        report.unmatched.push(PathBuf::from("/x/c.md"));

        let lines = format_report(&report);
        assert_eq!(
            lines,
            vec![
                "dates: 1 updated, 0 unchanged, 0 skipped, 2 unmatched",
                "    Unmatched: b.md, c.md",
            ]
        );
    }

    #[test]
    fn format_report_dry_run_and_defaulted() {
        let mut report = empty_report(PassKind::Frontmatter);
        report.dry_run = true;
        report.defaulted.push(PathBuf::from("x.md"));

        let lines = format_report(&report);
        assert_eq!(
            lines[0],
            "frontmatter: 0 would update, 0 unchanged, 0 skipped, 0 unmatched"
        );
        assert_eq!(lines[1], "    Defaulted dates: x.md");
    }
}
