//! Image reference rewriting.
//!
//! The target site serves images from a different place than the legacy blog,
//! so every image reference in a document body is re-rooted. Two syntaxes are
//! recognised:
//!
//! - Markdown images: `![alt](path)` and `![alt](path "title")`
//! - Inline markup: `<img ... src="path" ...>` (single or double quotes)
//!
//! Each path is classified before anything is touched:
//!
//! | Path                | Class      | Result                                  |
//! |---------------------|------------|-----------------------------------------|
//! | `/abs/img.png`      | Absolute   | unchanged                               |
//! | `http://h/i.png`    | Network    | unchanged                               |
//! | `../assets/img.png` | Asset      | `asset_root` + `img.png`                |
//! | `foo.png`           | Relative   | `images_root` + `foo.png`               |
//!
//! `assets/` only counts as a whole path segment: `myassets/a.png` is a
//! relative path like any other.
//!
//! Rewriting is textual. Nothing checks that the file exists at the new
//! location, so a wrong guess becomes a broken link on the built site.
//!
//! Only the body is scanned: the metadata block is left alone (its
//! `heroImage` is owned by frontmatter reconstruction), and so are fenced code
//! blocks, where image syntax is usually an example rather than a reference.

use crate::config::RewriteConfig;
use crate::frontmatter;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static MARKDOWN_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("valid markdown image regex"));

static IMG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    // `src` must follow whitespace, a quote or a slash, so `data-src` is not it.
    Regex::new(r#"<img\b[^>]*?[\s"'/]src\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid img tag regex")
});

const ASSETS_SEGMENT: &str = "assets/";

/// How an image path is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Absolute,
    Network,
    Asset,
    Relative,
}

pub fn classify(path: &str) -> PathClass {
    if path.starts_with('/') {
        PathClass::Absolute
    } else if path.starts_with("http") {
        PathClass::Network
    } else if asset_remainder(path).is_some() {
        PathClass::Asset
    } else {
        PathClass::Relative
    }
}

/// What follows the first `assets/` segment, at the start or after a `/`.
fn asset_remainder(path: &str) -> Option<&str> {
    if let Some(rest) = path.strip_prefix(ASSETS_SEGMENT) {
        return Some(rest);
    }
    path.match_indices(ASSETS_SEGMENT)
        .find(|&(idx, _)| idx > 0 && path.as_bytes()[idx - 1] == b'/')
        .map(|(idx, _)| &path[idx + ASSETS_SEGMENT.len()..])
}

/// Result of rewriting a document or body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub text: String,
    /// Number of references whose path changed.
    pub rewritten: usize,
}

#[derive(Debug, Clone)]
pub struct Rewriter {
    asset_root: String,
    images_root: String,
}

impl Rewriter {
    pub fn new(config: &RewriteConfig) -> Self {
        Self {
            asset_root: config.asset_root.clone(),
            images_root: config.images_root.clone(),
        }
    }

    /// New location for `path`, or `None` if it stays as is.
    pub fn rewrite_path(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        match classify(path) {
            PathClass::Absolute | PathClass::Network => None,
            PathClass::Asset => {
                let rest = asset_remainder(path)?;
                Some(format!("{}{}", self.asset_root, rest))
            }
            PathClass::Relative => {
                let rest = path.strip_prefix("./").unwrap_or(path);
                Some(format!("{}{}", self.images_root, rest))
            }
        }
    }

    /// Rewrite a whole document, leaving its metadata block untouched.
    pub fn rewrite_document(&self, text: &str) -> Rewritten {
        match frontmatter::split(text) {
            Some((head, body)) => {
                let rewritten = self.rewrite_body(body);
                Rewritten {
                    text: format!("{head}{}", rewritten.text),
                    rewritten: rewritten.rewritten,
                }
            }
            None => self.rewrite_body(text),
        }
    }

    /// Rewrite image references in body text, skipping fenced code blocks.
    pub fn rewrite_body(&self, body: &str) -> Rewritten {
        let mut out = String::with_capacity(body.len());
        let mut rewritten = 0;
        let mut prose = String::new();
        let mut fence: Option<&str> = None;

        for line in body.split_inclusive('\n') {
            let marker = fence_marker(line);
            match (fence, marker) {
                (None, Some(m)) => {
                    rewritten += self.flush_prose(&mut prose, &mut out);
                    fence = Some(m);
                    out.push_str(line);
                }
                (None, None) => prose.push_str(line),
                (Some(open), Some(m)) if m == open => {
                    fence = None;
                    out.push_str(line);
                }
                (Some(_), _) => out.push_str(line),
            }
        }
        rewritten += self.flush_prose(&mut prose, &mut out);

        Rewritten {
            text: out,
            rewritten,
        }
    }

    fn flush_prose(&self, prose: &mut String, out: &mut String) -> usize {
        if prose.is_empty() {
            return 0;
        }
        let (text, count) = self.rewrite_prose(prose);
        out.push_str(&text);
        prose.clear();
        count
    }

    fn rewrite_prose(&self, text: &str) -> (String, usize) {
        let mut count = 0;

        let text = MARKDOWN_IMAGE_RE.replace_all(text, |caps: &Captures| {
            let alt = &caps[1];
            let target = &caps[2];
            // `path "title"`: only the path part is rewritten.
            let (path, title) = match target.find(char::is_whitespace) {
                Some(i) => target.split_at(i),
                None => (target, ""),
            };
            match self.rewrite_path(path) {
                Some(new_path) => {
                    count += 1;
                    format!("![{alt}]({new_path}{title})")
                }
                None => caps[0].to_string(),
            }
        });

        let text = IMG_TAG_RE.replace_all(&text, |caps: &Captures| {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let Some(src) = caps.get(1).or_else(|| caps.get(2)) else {
                return whole.to_string();
            };
            match self.rewrite_path(src.as_str()) {
                Some(new_path) => {
                    count += 1;
                    let start = caps.get(0).map(|m| m.start()).unwrap_or_default();
                    let (from, to) = (src.start() - start, src.end() - start);
                    format!("{}{}{}", &whole[..from], new_path, &whole[to..])
                }
                None => whole.to_string(),
            }
        });

        (text.into_owned(), count)
    }
}

/// The fence string if `line` opens or closes a fenced code block.
fn fence_marker(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}
