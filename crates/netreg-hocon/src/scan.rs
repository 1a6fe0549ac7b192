//! Single-pass scanner for named brace-delimited blocks
//!
//! Locates `"name": { ... }` regions with an integer brace depth and an
//! in-string flag instead of a grammar. Braces and lookalike keys inside
//! string literals (regular or triple-quoted) never perturb the scan,
//! and no backtracking happens anywhere, so scanning is linear in the
//! document size.

use std::collections::{BTreeSet, HashSet};

/// Keys that are structural or parameter names in the registry schema,
/// never entity names. Candidate blocks with these names are discarded.
const DEFAULT_DENY_LIST: &[&str] = &[
    "type",
    "properties",
    "items",
    "args",
    "kwargs",
    "parameters",
    "schema",
    "required",
    "input",
    "output",
    "jira_api_wrapper",
    "agent_name",
    "inquiry",
    "query",
    "to",
    "attachment_paths",
    "cc",
    "bcc",
    "subject",
    "message",
    "aspect_ratio",
    "image_size",
    "google_search",
    "search_terms",
    "media_type",
    "limit",
    "offset",
    "k",
    "gl",
    "hl",
    "tbs",
    "app_name",
    "urls",
];

/// How far into a block body [`first_field_value`] searches for a key.
/// Fields whose key starts beyond this window are silently missed; the
/// window exists so a huge instructions literal near the top of a block
/// cannot turn a two-field lookup into a full-document scan.
pub const FIELD_WINDOW: usize = 1000;

/// A named, brace-delimited object region.
///
/// `start..end` is the span of the block body, exclusive of both
/// braces. Nested blocks are not decomposed; the body is an opaque span
/// that callers inspect with the lookup helpers below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The key that introduces the block
    pub name: String,
    /// Offset of the first byte after the opening brace
    pub start: usize,
    /// Offset of the matching closing brace
    pub end: usize,
}

impl Block {
    /// The block body as a slice of the scanned document.
    pub fn body<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Scanner configuration.
///
/// The deny-list is the implicit schema of the registry format: it
/// names the keys that open objects without being entities. It is
/// caller-supplied rather than baked in so the scanner can follow
/// schema variations.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Block names excluded from the result
    pub deny: BTreeSet<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            deny: DEFAULT_DENY_LIST.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ScanOptions {
    /// Options with an empty deny-list: every named block is reported.
    pub fn permissive() -> Self {
        Self { deny: BTreeSet::new() }
    }

    /// Options with a caller-supplied deny-list.
    pub fn with_deny<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deny: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Add one more denied key.
    #[must_use]
    pub fn deny(mut self, key: impl Into<String>) -> Self {
        self.deny.insert(key.into());
        self
    }
}

/// Scan `text` for named blocks at every depth.
///
/// A block is a quoted or bare key followed by `:` or `=` and an open
/// brace. Output is in order of first appearance. Duplicate names keep
/// the first occurrence only. A candidate whose closing brace cannot be
/// found is skipped without aborting the rest of the scan, a regular
/// string left unterminated by comment stripping costs at most its
/// enclosing block, and zero matches yields an empty vector, not an
/// error.
pub fn scan_blocks(text: &str, options: &ScanOptions) -> Vec<Block> {
    let b = text.as_bytes();
    let mut blocks = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut i = 0;

    while i < b.len() {
        if starts_triple(b, i) {
            match skip_triple(b, i) {
                Some(j) => i = j,
                None => break,
            }
        } else if b[i] == b'"' {
            match skip_string(b, i) {
                Some(end) => {
                    let key = &text[i + 1..end - 1];
                    i = consider_candidate(b, key, end, options, &mut seen, &mut blocks)
                        .unwrap_or(end);
                }
                None => i = string_recovery(b, i),
            }
        } else if is_ident_start(b[i]) {
            let end = ident_end(b, i);
            let key = &text[i..end];
            i = consider_candidate(b, key, end, options, &mut seen, &mut blocks).unwrap_or(end);
        } else {
            i += 1;
        }
    }

    blocks
}

/// If the key ending at `after_key` opens a block, record it (subject
/// to the deny-list and first-wins deduplication) and return the offset
/// just past the opening brace so nested blocks are still visited.
fn consider_candidate<'t>(
    b: &[u8],
    key: &'t str,
    after_key: usize,
    options: &ScanOptions,
    seen: &mut HashSet<&'t str>,
    blocks: &mut Vec<Block>,
) -> Option<usize> {
    let open = block_opener(b, after_key)?;
    if !key.is_empty() && !options.deny.contains(key) {
        if let Some(close) = find_block_end(b, open) {
            if seen.insert(key) {
                blocks.push(Block {
                    name: key.to_string(),
                    start: open + 1,
                    end: close,
                });
            }
        }
    }
    Some(open + 1)
}

/// First occurrence of `key` bound to a quoted or triple-quoted value
/// inside `body`, searching only the first [`FIELD_WINDOW`] bytes for
/// the key. The value itself may extend past the window. Returns the
/// raw interior of the literal; `None` when the key is absent, beyond
/// the window, or bound to some other value shape.
pub fn first_field_value<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    let window = floor_char_boundary(body, FIELD_WINDOW.min(body.len()));
    let b = body.as_bytes();
    let mut i = 0;

    while i < window {
        if starts_triple(b, i) {
            i = skip_triple(b, i)?;
        } else if b[i] == b'"' {
            match skip_string(b, i) {
                Some(end) => {
                    if &body[i + 1..end - 1] == key {
                        if let Some(value) = quoted_value_after(body, b, end) {
                            return Some(value);
                        }
                    }
                    i = end;
                }
                None => i = string_recovery(b, i),
            }
        } else if is_ident_start(b[i]) {
            let end = ident_end(b, i);
            if &body[i..end] == key {
                if let Some(value) = quoted_value_after(body, b, end) {
                    return Some(value);
                }
            }
            i = end;
        } else {
            i += 1;
        }
    }

    None
}

/// First occurrence of `key` bound to a bare `true`/`false` inside
/// `body`. Used for manifest flags.
pub fn first_bool_value(body: &str, key: &str) -> Option<bool> {
    let b = body.as_bytes();
    let mut i = 0;

    while i < b.len() {
        if starts_triple(b, i) {
            i = skip_triple(b, i)?;
        } else if b[i] == b'"' {
            match skip_string(b, i) {
                Some(end) => {
                    if &body[i + 1..end - 1] == key {
                        if let Some((value, _)) = bool_after_binding(b, end) {
                            return Some(value);
                        }
                    }
                    i = end;
                }
                None => i = string_recovery(b, i),
            }
        } else if is_ident_start(b[i]) {
            let end = ident_end(b, i);
            if &body[i..end] == key {
                if let Some((value, _)) = bool_after_binding(b, end) {
                    return Some(value);
                }
                i = end;
            } else {
                i = end;
            }
        } else {
            i += 1;
        }
    }

    None
}

/// Contents of every regular quoted string in `body`, in document
/// order. Triple-quoted literals are skipped entirely so prose in an
/// instructions field never leaks tokens into the result.
pub fn quoted_strings(body: &str) -> Vec<&str> {
    let b = body.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < b.len() {
        if starts_triple(b, i) {
            match skip_triple(b, i) {
                Some(j) => i = j,
                None => break,
            }
        } else if b[i] == b'"' {
            match skip_string(b, i) {
                Some(end) => {
                    tokens.push(&body[i + 1..end - 1]);
                    i = end;
                }
                None => i = string_recovery(b, i),
            }
        } else {
            i += 1;
        }
    }

    tokens
}

// --- low-level cursor helpers shared with splice and manifest ---

pub(crate) fn starts_triple(b: &[u8], i: usize) -> bool {
    i + 3 <= b.len() && &b[i..i + 3] == b"\"\"\""
}

/// `b[i..]` must start with `"""`. Index just past the closing `"""`
/// (first occurrence; the format has no nested triple quotes).
pub(crate) fn skip_triple(b: &[u8], i: usize) -> Option<usize> {
    let mut j = i + 3;
    while j + 3 <= b.len() {
        if &b[j..j + 3] == b"\"\"\"" {
            return Some(j + 3);
        }
        j += 1;
    }
    None
}

/// `b[i]` must be the opening quote of a regular string. Index just
/// past the closing quote, honoring backslash escapes. `None` when the
/// line ends before the quote closes; callers resume at
/// [`string_recovery`] so one truncated line cannot derail the rest of
/// the document.
pub(crate) fn skip_string(b: &[u8], i: usize) -> Option<usize> {
    let mut j = i + 1;
    while j < b.len() {
        match b[j] {
            b'\\' => j += 2,
            b'"' => return Some(j + 1),
            b'\n' => return None,
            _ => j += 1,
        }
    }
    None
}

/// Where scanning continues after a string that never closes on its
/// line: the terminating newline, or the end of input. Comment
/// stripping can truncate a line mid-string, and an unterminated
/// string must lose at most its enclosing block.
pub(crate) fn string_recovery(b: &[u8], i: usize) -> usize {
    let mut j = i + 1;
    while j < b.len() && b[j] != b'\n' {
        j += 1;
    }
    j
}

pub(crate) fn skip_ws(b: &[u8], mut i: usize) -> usize {
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

pub(crate) fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

pub(crate) fn ident_end(b: &[u8], i: usize) -> usize {
    let mut j = i;
    while j < b.len() && (b[j].is_ascii_alphanumeric() || matches!(b[j], b'_' | b'-' | b'.')) {
        j += 1;
    }
    j
}

/// If position `i` starts a `: {` / `= {` binding, the offset of the
/// opening brace.
pub(crate) fn block_opener(b: &[u8], i: usize) -> Option<usize> {
    let j = skip_ws(b, i);
    if j >= b.len() || (b[j] != b':' && b[j] != b'=') {
        return None;
    }
    let k = skip_ws(b, j + 1);
    (k < b.len() && b[k] == b'{').then_some(k)
}

/// `b[open]` must be `{`. Offset of the matching `}`, with nested
/// braces counted and string contents ignored.
pub(crate) fn find_block_end(b: &[u8], open: usize) -> Option<usize> {
    let mut depth = 1_usize;
    let mut i = open + 1;
    while i < b.len() {
        if starts_triple(b, i) {
            i = skip_triple(b, i)?;
        } else if b[i] == b'"' {
            i = match skip_string(b, i) {
                Some(end) => end,
                None => string_recovery(b, i),
            };
        } else {
            match b[i] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }
    None
}

/// Bare `true`/`false` starting at the first non-whitespace byte at or
/// after `i`, with its end offset.
pub(crate) fn read_bool(b: &[u8], i: usize) -> Option<(bool, usize)> {
    let i = skip_ws(b, i);
    for (word, value) in [(&b"true"[..], true), (&b"false"[..], false)] {
        let end = i + word.len();
        if b.len() >= end && &b[i..end] == word {
            let terminated = end == b.len() || !b[end].is_ascii_alphanumeric();
            if terminated {
                return Some((value, end));
            }
        }
    }
    None
}

fn bool_after_binding(b: &[u8], after_key: usize) -> Option<(bool, usize)> {
    let j = skip_ws(b, after_key);
    if j >= b.len() || (b[j] != b':' && b[j] != b'=') {
        return None;
    }
    read_bool(b, j + 1)
}

/// Interior of the quoted or triple-quoted value bound at `after_key`,
/// or `None` for any other value shape.
fn quoted_value_after<'a>(body: &'a str, b: &[u8], after_key: usize) -> Option<&'a str> {
    let j = skip_ws(b, after_key);
    if j >= b.len() || (b[j] != b':' && b[j] != b'=') {
        return None;
    }
    let k = skip_ws(b, j + 1);
    if starts_triple(b, k) {
        let end = skip_triple(b, k)?;
        Some(&body[k + 3..end - 3])
    } else if k < b.len() && b[k] == b'"' {
        let end = skip_string(b, k)?;
        Some(&body[k + 1..end - 1])
    } else {
        None
    }
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
