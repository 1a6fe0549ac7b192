//! Lexical pre-processing of registry text
//!
//! Strips `#` line comments and rewrites `include "registries/X"`
//! directives to `include "X"` so includes resolve relative to a
//! caller-supplied registries root instead of a nested path.

/// Include path prefix stripped by [`preprocess`].
pub const DEFAULT_INCLUDE_PREFIX: &str = "registries/";

/// Remove `#` line comments.
///
/// Operates line by line: everything from the first `#` to the end of
/// the line is dropped. A `#` inside a quoted string is also treated as
/// a comment start. That limitation is inherited from the tooling this
/// replaces and is pinned by tests rather than fixed, because callers
/// rely on the exact behavior.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match line.find('#') {
            Some(pos) => out.push_str(&line[..pos]),
            None => out.push_str(line),
        }
    }
    out
}

/// Rewrite `include "<prefix>X"` directives to `include "X"`.
pub fn rewrite_includes(text: &str, prefix: &str) -> String {
    let needle = format!("include \"{prefix}");
    text.replace(&needle, "include \"")
}

/// Comment stripping followed by include rewriting with the default
/// registries prefix. Idempotent: running it on already-processed text
/// is a no-op.
pub fn preprocess(text: &str) -> String {
    rewrite_includes(&strip_comments(text), DEFAULT_INCLUDE_PREFIX)
}

/// Paths named by `include "X"` directives, in document order.
///
/// Only whole-line directives are recognized; an include buried after
/// other tokens on the same line is ignored.
pub fn include_targets(text: &str) -> Vec<String> {
    let mut targets = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("include") else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(quoted) = rest.strip_prefix('"') else {
            continue;
        };
        if let Some(end) = quoted.find('"') {
            targets.push(quoted[..end].to_string());
        }
    }
    targets
}
