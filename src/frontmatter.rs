//! Frontmatter parsing and serialization.
//!
//! Documents carry an optional metadata block at the very top, delimited by
//! `---` marker lines:
//!
//! ```text
//! ---
//! title: "Hello"
//! pubDate: "2021-05-01"
//! tags:
//!   - rust
//!   - notes
//! ---
//! Body text starts here.
//! ```
//!
//! Two mutation disciplines live here and are kept deliberately separate:
//!
//! - [`serialize`] is **total reconstruction**. It writes exactly the fields
//!   it is given; anything else is gone.
//! - [`replace_field`] and [`upsert_list`] are **targeted patches**. They
//!   rewrite one entry and leave every other byte of the document alone.
//!
//! [`extract`] is line-based rather than a YAML parser. Legacy documents are
//! full of values that are not valid YAML (unescaped colons in titles, mixed
//! quoting) and reading them only needs `key: value` pairs plus simple block
//! sequences. Target documents are read as YAML with [`parse_yaml`] before a
//! patch that depends on their existing values.
//!
//! Rebuilt and patched blocks keep the document's BOM and line endings.

use serde_yaml::Mapping;
use std::borrow::Cow;
use thiserror::Error;

const MARKER: &str = "---";
const BOM: char = '\u{feff}';

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("metadata block is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("metadata block is not a mapping")]
    NotAMapping,
}

/// Byte-level conventions of a document that rebuilt blocks must follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layout {
    pub bom: bool,
    pub crlf: bool,
}

impl Layout {
    /// Read the conventions off the first line of `text`.
    pub fn of(text: &str) -> Self {
        let bom = text.starts_with(BOM);
        let crlf = text
            .find('\n')
            .is_some_and(|i| i > 0 && text.as_bytes()[i - 1] == b'\r');
        Self { bom, crlf }
    }

    fn newline(self) -> &'static str {
        if self.crlf { "\r\n" } else { "\n" }
    }
}

/// Raw value of a frontmatter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// `key: value`, with surrounding quotes removed.
    Scalar(String),
    /// `key:` followed by `  - item` lines.
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }
}

/// Ordered field list of a metadata block.
pub type Fields = Vec<(String, FieldValue)>;

/// Look up a field by name. First occurrence wins.
pub fn get<'a>(fields: &'a Fields, key: &str) -> Option<&'a FieldValue> {
    fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Look up a scalar field, ignoring empty values.
pub fn get_scalar<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    get(fields, key)
        .and_then(FieldValue::as_scalar)
        .filter(|s| !s.trim().is_empty())
}

/// A parsed document: metadata fields plus the untouched body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub fields: Fields,
    /// Everything after the closing marker, usually starting with `\n`.
    pub body: String,
}

/// Byte ranges of the metadata block inside a document.
struct Block {
    /// Start of the first line after the opening marker.
    inner_start: usize,
    /// Start of the closing marker line.
    inner_end: usize,
    /// First byte after the closing marker's three characters.
    body_start: usize,
}

fn locate_block(text: &str) -> Option<Block> {
    let offset = if text.starts_with(BOM) { BOM.len_utf8() } else { 0 };
    let rest = &text[offset..];

    let first_end = rest.find('\n')?;
    if rest[..first_end].trim_end_matches('\r') != MARKER {
        return None;
    }
    let inner_start = offset + first_end + 1;

    let mut line_start = inner_start;
    while line_start <= text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(text.len());
        if text[line_start..line_end].trim_end_matches('\r') == MARKER {
            return Some(Block {
                inner_start,
                inner_end: line_start,
                body_start: line_start + MARKER.len(),
            });
        }
        if line_end == text.len() {
            break;
        }
        line_start = line_end + 1;
    }
    None
}

/// Split a document into its metadata head (both markers included) and body.
///
/// Returns `None` when the document has no complete metadata block.
pub fn split(text: &str) -> Option<(&str, &str)> {
    let block = locate_block(text)?;
    Some(text.split_at(block.body_start))
}

/// Parse the metadata block and body of a document.
///
/// Returns `None` if the document does not open with a marker line or the
/// block is never closed.
pub fn extract(text: &str) -> Option<Extracted> {
    let block = locate_block(text)?;
    let inner = &text[block.inner_start..block.inner_end];
    Some(Extracted {
        fields: parse_fields(inner),
        body: text[block.body_start..].to_string(),
    })
}

fn parse_fields(inner: &str) -> Fields {
    let mut fields: Fields = Vec::new();
    // Key whose empty value may be followed by `- item` lines.
    let mut open_list: Option<usize> = None;

    for line in inner.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(item) = list_item(trimmed) {
            if let Some(idx) = open_list {
                let item = unquote(item);
                match &mut fields[idx].1 {
                    FieldValue::List(items) => items.push(item),
                    slot => *slot = FieldValue::List(vec![item]),
                }
                continue;
            }
        }

        open_list = None;
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim();
        if value.is_empty() {
            open_list = Some(fields.len());
        }
        fields.push((key.to_string(), FieldValue::Scalar(unquote(value))));
    }

    fields
}

fn list_item(line: &str) -> Option<&str> {
    if line == "-" {
        return Some("");
    }
    line.strip_prefix("- ").map(str::trim)
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == b'"' && last == b'"' {
            return unescape(&value[1..value.len() - 1]);
        }
        if first == b'\'' && last == b'\'' {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A list item, bare when that reads back as the same string.
fn list_item_text(item: &str) -> Cow<'_, str> {
    let plain = !item.is_empty()
        && !item.starts_with(['-', ' '])
        && !item.ends_with(' ')
        && item
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '+' | ' '));
    if plain {
        Cow::Borrowed(item)
    } else {
        Cow::Owned(format!("\"{}\"", escape(item)))
    }
}

fn push_list(out: &mut String, key: &str, items: &[String], newline: &str) {
    if items.is_empty() {
        return;
    }
    out.push_str(key);
    out.push(':');
    out.push_str(newline);
    for item in items {
        out.push_str("  - ");
        out.push_str(&list_item_text(item));
        out.push_str(newline);
    }
}

/// Rebuild a document from scratch: marker, fields, marker, body.
///
/// Scalars are always written double-quoted. Lists are written as block
/// sequences and omitted entirely when empty.
pub fn serialize(fields: &[(String, FieldValue)], body: &str) -> String {
    serialize_with(Layout::default(), fields, body)
}

/// [`serialize`] following the BOM and line endings of `layout`.
pub fn serialize_with(layout: Layout, fields: &[(String, FieldValue)], body: &str) -> String {
    let newline = layout.newline();
    let mut out = String::with_capacity(body.len() + 64 * fields.len() + 8);
    if layout.bom {
        out.push(BOM);
    }
    out.push_str(MARKER);
    out.push_str(newline);
    for (key, value) in fields {
        match value {
            FieldValue::Scalar(s) => {
                out.push_str(&format!("{key}: \"{}\"{newline}", escape(s)));
            }
            FieldValue::List(items) => push_list(&mut out, key, items, newline),
        }
    }
    out.push_str(MARKER);
    out.push_str(body);
    out
}

/// Parse the metadata block as a YAML mapping.
///
/// Returns `None` when the document has no metadata block. An empty block is
/// an empty mapping.
pub fn parse_yaml(text: &str) -> Option<Result<Mapping, FrontmatterError>> {
    let block = locate_block(text)?;
    let inner = &text[block.inner_start..block.inner_end];
    if inner.trim().is_empty() {
        return Some(Ok(Mapping::new()));
    }
    let parsed = serde_yaml::from_str::<serde_yaml::Value>(inner)
        .map_err(FrontmatterError::from)
        .and_then(|value| match value {
            serde_yaml::Value::Mapping(mapping) => Ok(mapping),
            serde_yaml::Value::Null => Ok(Mapping::new()),
            _ => Err(FrontmatterError::NotAMapping),
        });
    Some(parsed)
}

/// Whether `line` is the top-level key line for `name`.
fn is_key_line(line: &str, name: &str) -> bool {
    line.strip_prefix(name)
        .and_then(|rest| rest.trim_start().strip_prefix(':'))
        .is_some()
}

/// Byte range of `name`'s whole entry inside the block: its key line plus any
/// indented or `- ` lines that follow.
fn entry_range(text: &str, block: &Block, name: &str) -> Option<(usize, usize)> {
    let mut start = None;
    let mut line_start = block.inner_start;
    while line_start < block.inner_end {
        let next = text[line_start..block.inner_end]
            .find('\n')
            .map(|i| line_start + i + 1)
            .unwrap_or(block.inner_end);
        let line = text[line_start..next].trim_end_matches(['\n', '\r']);

        match start {
            None if is_key_line(line, name) => start = Some(line_start),
            None => {}
            Some(s) => {
                let continues = line.starts_with([' ', '\t']) || line == "-" || line.starts_with("- ");
                if !continues {
                    return Some((s, line_start));
                }
            }
        }
        line_start = next;
    }
    start.map(|s| (s, block.inner_end))
}

/// Write `name` as a block sequence of `items`, touching no other entry.
///
/// An existing entry is replaced where it stands, whatever form it had;
/// otherwise the entry goes at the end of the block. A document without a
/// block gets a new one. Empty `items` removes the entry.
pub fn upsert_list(text: &str, name: &str, items: &[String]) -> String {
    let layout = Layout::of(text);
    let newline = layout.newline();
    let mut entry = String::new();
    push_list(&mut entry, name, items, newline);

    let Some(block) = locate_block(text) else {
        let rest = text.strip_prefix(BOM).unwrap_or(text);
        let bom = if layout.bom { "\u{feff}" } else { "" };
        return format!("{bom}{MARKER}{newline}{entry}{MARKER}{newline}{rest}");
    };
    let (start, end) = entry_range(text, &block, name).unwrap_or((block.inner_end, block.inner_end));
    let mut out = String::with_capacity(text.len() + entry.len());
    out.push_str(&text[..start]);
    out.push_str(&entry);
    out.push_str(&text[end..]);
    out
}

/// Byte range of `name`'s value on its line inside the metadata block.
fn field_value_range(text: &str, name: &str) -> Option<(usize, usize)> {
    let block = locate_block(text)?;
    let mut line_start = block.inner_start;
    while line_start < block.inner_end {
        let line_end = text[line_start..block.inner_end]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(block.inner_end);
        let line = text[line_start..line_end].trim_end_matches('\r');

        let after_colon = line
            .strip_prefix(name)
            .and_then(|rest| rest.trim_start().strip_prefix(':'));
        if let Some(after_colon) = after_colon {
            let value = after_colon.trim();
            if !value.is_empty() {
                let leading = after_colon.len() - after_colon.trim_start().len();
                let value_start = line_start + (line.len() - after_colon.len()) + leading;
                return Some((value_start, value_start + value.len()));
            }
        }
        line_start = line_end + 1;
    }
    None
}

/// Whether the metadata block has a non-empty scalar line for `name`.
pub fn has_field(text: &str, name: &str) -> bool {
    field_value_range(text, name).is_some()
}

/// Replace the value of one field with `"value"`, touching nothing else.
///
/// The existing value may be double-quoted, single-quoted, or bare. If the
/// document has no metadata block or no such line, the input is returned
/// unchanged; use [`has_field`] first when absence must be reported.
pub fn replace_field(text: &str, name: &str, value: &str) -> String {
    match field_value_range(text, name) {
        Some((start, end)) => {
            let mut out = String::with_capacity(text.len() + value.len());
            out.push_str(&text[..start]);
            out.push('"');
            out.push_str(&escape(value));
            out.push('"');
            out.push_str(&text[end..]);
            out
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> FieldValue {
        FieldValue::Scalar(s.to_string())
    }

    // =========================================================================
    // extract()
    // =========================================================================

    #[test]
    fn extract_basic_fields_and_body() {
        let doc = "---\ntitle: \"Hello\"\ndate: '2021-05-01'\ndraft: true\n---\n# Hello\n";
        let parsed = extract(doc).unwrap();
        assert_eq!(
            parsed.fields,
            vec![
                ("title".to_string(), scalar("Hello")),
                ("date".to_string(), scalar("2021-05-01")),
                ("draft".to_string(), scalar("true")),
            ]
        );
        assert_eq!(parsed.body, "\n# Hello\n");
    }

    #[test]
    fn extract_without_markers_is_none() {
        assert!(extract("# Just a heading\n\nBody").is_none());
    }

    #[test]
    fn extract_unclosed_block_is_none() {
        assert!(extract("---\ntitle: x\nno closing marker\n").is_none());
    }

    #[test]
    fn extract_splits_at_first_colon_only() {
        let parsed = extract("---\ntitle: Rust: the good parts\nurl: http://x/y\n---\n").unwrap();
        assert_eq!(get_scalar(&parsed.fields, "title"), Some("Rust: the good parts"));
        assert_eq!(get_scalar(&parsed.fields, "url"), Some("http://x/y"));
    }

    #[test]
    fn extract_ignores_lines_without_colon() {
        let parsed = extract("---\njust some words\ntitle: ok\n---\n").unwrap();
        assert_eq!(parsed.fields.len(), 1);
        assert_eq!(get_scalar(&parsed.fields, "title"), Some("ok"));
    }

    #[test]
    fn extract_block_sequence() {
        let parsed = extract("---\ntags:\n  - x\n  - \"y z\"\ntitle: t\n---\n").unwrap();
        assert_eq!(
            get(&parsed.fields, "tags"),
            Some(&FieldValue::List(vec!["x".to_string(), "y z".to_string()]))
        );
        assert_eq!(get_scalar(&parsed.fields, "title"), Some("t"));
    }

    #[test]
    fn extract_flow_list_stays_scalar() {
        let parsed = extract("---\ntags: [x, y]\n---\n").unwrap();
        assert_eq!(get(&parsed.fields, "tags"), Some(&scalar("[x, y]")));
    }

    #[test]
    fn extract_mismatched_quotes_kept() {
        let parsed = extract("---\ntitle: \"half'\n---\n").unwrap();
        assert_eq!(get_scalar(&parsed.fields, "title"), Some("\"half'"));
    }

    #[test]
    fn extract_tolerates_bom_and_crlf() {
        let parsed = extract("\u{feff}---\r\ntitle: x\r\n---\r\nbody").unwrap();
        assert_eq!(get_scalar(&parsed.fields, "title"), Some("x"));
        assert_eq!(parsed.body, "\r\nbody");
    }

    #[test]
    fn extract_empty_block() {
        let parsed = extract("---\n---\nbody").unwrap();
        assert!(parsed.fields.is_empty());
        assert_eq!(parsed.body, "\nbody");
    }

    #[test]
    fn extract_marker_inside_body_not_confused() {
        let doc = "---\ntitle: a\n---\ntext\n---\nmore\n";
        let parsed = extract(doc).unwrap();
        assert_eq!(parsed.body, "\ntext\n---\nmore\n");
    }

    // =========================================================================
    // serialize()
    // =========================================================================

    #[test]
    fn serialize_round_trips_canonical_document() {
        let doc = "---\ntitle: \"Hello\"\ndescription: \"\"\npubDate: \"2021-05-01\"\ntags:\n  - a\n  - b\n---\n\nBody with --- inside\n";
        let parsed = extract(doc).unwrap();
        assert_eq!(serialize(&parsed.fields, &parsed.body), doc);
    }

    #[test]
    fn serialize_round_trips_escaped_quotes() {
        let fields = vec![("title".to_string(), scalar("He said \"hi\" \\o/"))];
        let doc = serialize(&fields, "\nbody");
        assert_eq!(doc, "---\ntitle: \"He said \\\"hi\\\" \\\\o/\"\n---\nbody");
        assert_eq!(extract(&doc).unwrap().fields, fields);
    }

    #[test]
    fn serialize_omits_empty_lists() {
        let fields = vec![
            ("title".to_string(), scalar("x")),
            ("tags".to_string(), FieldValue::List(vec![])),
        ];
        assert_eq!(serialize(&fields, "\n"), "---\ntitle: \"x\"\n---\n");
    }

    #[test]
    fn serialize_is_total_reconstruction() {
        let parsed = extract("---\ntitle: x\nextra: y\n---\nbody").unwrap();
        let kept: Fields = parsed
            .fields
            .into_iter()
            .filter(|(k, _)| k == "title")
            .collect();
        assert_eq!(serialize(&kept, &parsed.body), "---\ntitle: \"x\"\n---\nbody");
    }

    // =========================================================================
    // replace_field()
    // =========================================================================

    #[test]
    fn replace_field_patches_only_the_value() {
        let doc = "---\ntitle:  'Keep   me'\npubDate: \"2000-01-01\"\n---\npubDate: \"body\"\n";
        let out = replace_field(doc, "pubDate", "2021-05-01");
        assert_eq!(
            out,
            "---\ntitle:  'Keep   me'\npubDate: \"2021-05-01\"\n---\npubDate: \"body\"\n"
        );
    }

    #[test]
    fn replace_field_handles_single_quotes_and_bare_values() {
        assert_eq!(
            replace_field("---\npubDate: '2000-01-01'\n---\n", "pubDate", "2021-05-01"),
            "---\npubDate: \"2021-05-01\"\n---\n"
        );
        assert_eq!(
            replace_field("---\npubDate: 2000-01-01\n---\n", "pubDate", "2021-05-01"),
            "---\npubDate: \"2021-05-01\"\n---\n"
        );
    }

    #[test]
    fn replace_field_missing_field_is_identity() {
        let doc = "---\ntitle: \"x\"\n---\nbody\n";
        assert_eq!(replace_field(doc, "pubDate", "2021-05-01"), doc);
        assert!(!has_field(doc, "pubDate"));
    }

    #[test]
    fn replace_field_without_block_is_identity() {
        let doc = "pubDate: \"2000-01-01\"\n";
        assert_eq!(replace_field(doc, "pubDate", "2021-05-01"), doc);
    }

    #[test]
    fn replace_field_does_not_match_key_prefix() {
        let doc = "---\npubDateLocal: \"x\"\n---\n";
        assert!(!has_field(doc, "pubDate"));
        assert_eq!(replace_field(doc, "pubDate", "y"), doc);
    }

    // =========================================================================
    // split() / set()
    // =========================================================================

    #[test]
    fn split_returns_head_and_body() {
        let (head, body) = split("---\na: b\n---\nbody").unwrap();
        assert_eq!(head, "---\na: b\n---");
        assert_eq!(body, "\nbody");
    }

    // =========================================================================
    // serialize_with() / Layout
    // =========================================================================

    #[test]
    fn layout_reads_bom_and_line_endings() {
        assert_eq!(Layout::of("---\na: b\n---\n"), Layout::default());
        assert_eq!(
            Layout::of("\u{feff}---\r\na: b\r\n---\r\n"),
            Layout { bom: true, crlf: true }
        );
    }

    #[test]
    fn serialize_with_keeps_bom_and_crlf() {
        let doc = "\u{feff}---\r\ntitle: x\r\n---\r\nbody\r\n";
        let parsed = extract(doc).unwrap();
        let fields = vec![
            ("title".to_string(), scalar("x")),
            ("tags".to_string(), FieldValue::List(vec!["a".to_string()])),
        ];
        assert_eq!(
            serialize_with(Layout::of(doc), &fields, &parsed.body),
            "\u{feff}---\r\ntitle: \"x\"\r\ntags:\r\n  - a\r\n---\r\nbody\r\n"
        );
    }

    #[test]
    fn serialize_quotes_list_items_that_need_it() {
        let fields = vec![(
            "tags".to_string(),
            FieldValue::List(vec!["c++".to_string(), "#meta".to_string(), "a: b".to_string()]),
        )];
        let doc = serialize(&fields, "\n");
        assert_eq!(doc, "---\ntags:\n  - c++\n  - \"#meta\"\n  - \"a: b\"\n---\n");
        assert_eq!(extract(&doc).unwrap().fields, fields);
    }

    // =========================================================================
    // parse_yaml()
    // =========================================================================

    #[test]
    fn parse_yaml_reads_nested_values() {
        let doc = "---\ndescription: >\n  first line\n  second line\nauthor:\n  name: Jo\n---\n";
        let mapping = parse_yaml(doc).unwrap().unwrap();
        assert_eq!(
            mapping.get("description").and_then(|v| v.as_str()),
            Some("first line second line\n")
        );
        assert!(mapping.get("author").is_some_and(|v| v.is_mapping()));
        assert!(mapping.get("name").is_none());
    }

    #[test]
    fn parse_yaml_empty_and_missing_blocks() {
        assert!(parse_yaml("---\n---\nbody").unwrap().unwrap().is_empty());
        assert!(parse_yaml("no block").is_none());
    }

    #[test]
    fn parse_yaml_rejects_invalid_blocks() {
        assert!(matches!(
            parse_yaml("---\ntitle: Rust: the good parts\n---\n"),
            Some(Err(FrontmatterError::Yaml(_)))
        ));
        assert!(matches!(
            parse_yaml("---\n- a\n- b\n---\n"),
            Some(Err(FrontmatterError::NotAMapping))
        ));
    }

    // =========================================================================
    // upsert_list()
    // =========================================================================

    fn items(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn upsert_list_appends_and_keeps_other_entries_verbatim() {
        let doc = "---\ndescription: >\n  first line\n  second line\nauthor:\n  name: Jo\n---\nbody\n";
        assert_eq!(
            upsert_list(doc, "tags", &items(&["x"])),
            "---\ndescription: >\n  first line\n  second line\nauthor:\n  name: Jo\ntags:\n  - x\n---\nbody\n"
        );
    }

    #[test]
    fn upsert_list_replaces_entry_in_place() {
        let doc = "---\ntitle: a\ntags:\n- old\n- older\npubDate: 2021-01-01\n---\n";
        assert_eq!(
            upsert_list(doc, "tags", &items(&["x", "y"])),
            "---\ntitle: a\ntags:\n  - x\n  - y\npubDate: 2021-01-01\n---\n"
        );
        assert_eq!(
            upsert_list("---\ntags: [a, b]\n---\n", "tags", &items(&["c"])),
            "---\ntags:\n  - c\n---\n"
        );
    }

    #[test]
    fn upsert_list_ignores_key_prefixes_and_nested_keys() {
        let doc = "---\ntagsline: keep\nmeta:\n  tags: nested\n---\n";
        assert_eq!(
            upsert_list(doc, "tags", &items(&["x"])),
            "---\ntagsline: keep\nmeta:\n  tags: nested\ntags:\n  - x\n---\n"
        );
    }

    #[test]
    fn upsert_list_creates_block_and_follows_layout() {
        assert_eq!(
            upsert_list("# Heading\n", "tags", &items(&["x"])),
            "---\ntags:\n  - x\n---\n# Heading\n"
        );
        assert_eq!(
            upsert_list("\u{feff}---\r\ntitle: t\r\n---\r\nbody", "tags", &items(&["x"])),
            "\u{feff}---\r\ntitle: t\r\ntags:\r\n  - x\r\n---\r\nbody"
        );
    }

    #[test]
    fn upsert_list_empty_items_removes_entry() {
        assert_eq!(
            upsert_list("---\na: 1\ntags:\n  - x\n---\n", "tags", &[]),
            "---\na: 1\n---\n"
        );
    }
}
