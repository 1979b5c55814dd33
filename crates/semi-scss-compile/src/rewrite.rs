//! Override import injection for component partials.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Component partials start by importing their local variables:
//!
//! ```scss
//! @import './variables.scss';
//!
//! $module: #{$prefix}-button;
//! ```
//!
//! When an extra import is configured, it is spliced in right after that
//! anchor so the overrides it contains win over the component defaults:
//!
//! ```scss
//! @import './variables.scss';
//! @import "~@custom/theme/local.scss";
//!
//! $module: #{$prefix}-button;
//! ```

use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the anchor statement at the start of the haystack.
///
/// Either quote style is accepted (but not mixed), the trailing `;` is
/// optional. Without `;` the statement must end the line, see
/// [`ends_statement`].
static ANCHOR_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^@import[ \t]+(?:'\./variables\.scss'|"\./variables\.scss")(?:[ \t]*;)?"#)
        .unwrap()
});

/// Result of applying the override import to a partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// No extra import is configured.
    NoExtraImport,
    /// The partial has no `./variables.scss` import.
    AnchorNotFound,
    /// The extra import was inserted.
    Injected(String),
}

impl RewriteOutcome {
    /// The text to hand to the compiler.
    pub fn into_content(self, original: &str) -> String {
        match self {
            RewriteOutcome::Injected(content) => content,
            RewriteOutcome::NoExtraImport | RewriteOutcome::AnchorNotFound => original.to_string(),
        }
    }

    pub fn is_injected(&self) -> bool {
        matches!(self, RewriteOutcome::Injected(_))
    }
}

/// Insert `@import "<extra_import>";` after the anchor import of `content`.
///
/// With several anchors the import goes after the last one. Anchors inside
/// comments are ignored.
pub fn inject_extra_import(content: &str, extra_import: Option<&str>) -> RewriteOutcome {
    let Some(extra_import) = extra_import else {
        return RewriteOutcome::NoExtraImport;
    };

    let Some(insert_at) = find_anchor_ends(content).last().copied() else {
        return RewriteOutcome::AnchorNotFound;
    };

    let statement = format!("\n@import \"{extra_import}\";");
    let mut rewritten = String::with_capacity(content.len() + statement.len());
    rewritten.push_str(&content[..insert_at]);
    rewritten.push_str(&statement);
    rewritten.push_str(&content[insert_at..]);
    RewriteOutcome::Injected(rewritten)
}

/// Read a partial from disk and apply [`inject_extra_import`].
///
/// Invalid UTF-8 sequences are replaced with U+FFFD (and logged) so the
/// partial can still be rewritten and compiled.
pub fn rewrite_file(path: &Path, extra_import: Option<&str>) -> io::Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;

    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e.utf8_error(),
                "Partial is not valid UTF-8, replacing invalid sequences"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    let outcome = inject_extra_import(&content, extra_import);
    if outcome.is_injected() {
        tracing::debug!(path = %path.display(), "Injected override import");
    }
    Ok(outcome.into_content(&content).into_bytes())
}

/// Byte offsets just past each anchor statement, in source order.
///
/// Comments, quoted strings and unquoted `url(...)` bodies are skipped, so
/// neither an anchor nor a `//` inside them is seen.
fn find_anchor_ends(content: &str) -> Vec<usize> {
    let bytes = content.as_bytes();
    let mut ends = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = content[i..].find('\n').map_or(bytes.len(), |n| i + n);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = content[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 2);
            }
            quote @ (b'"' | b'\'') => i = skip_string(bytes, i, quote),
            b'u' if content[i..].starts_with("url(") => {
                i = content[i..].find(')').map_or(bytes.len(), |n| i + n + 1);
            }
            b'@' => match ANCHOR_IMPORT.find(&content[i..]) {
                Some(m) if ends_statement(m.as_str(), &content[i + m.end()..]) => {
                    ends.push(i + m.end());
                    i += m.end();
                }
                _ => i += 1,
            },
            _ => i += 1,
        }
    }

    ends
}

/// An anchor without `;` only counts when nothing but blanks follow it on
/// its line, so `@import './variables.scss', './other.scss';` is not one.
fn ends_statement(anchor: &str, rest: &str) -> bool {
    if anchor.ends_with(';') {
        return true;
    }
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n")
}

/// Index just past the string literal opened by `quote` at `start`.
///
/// An unterminated string ends at the line break.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}
