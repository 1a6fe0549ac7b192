//! Manifest entry extraction
//!
//! Manifests are flat HOCON documents mapping configuration filenames
//! to a served flag, either directly (`"a.hocon": true`) or through an
//! object (`"a.hocon": { serve = true, public = false }`). This module
//! extracts those entries from a single pre-processed document;
//! aggregation across a registry tree lives in `netreg-core`.

use serde::{Deserialize, Serialize};

use crate::error::{HoconError, HoconResult};
use crate::scan::{
    find_block_end, first_bool_value, is_ident_start, read_bool, skip_string, skip_triple, skip_ws,
    starts_triple,
};
use crate::HOCON_EXT;

/// One manifest line: a configuration filename and its flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Filename as written in the manifest, extension included
    pub filename: String,
    /// Whether the network is served
    #[serde(default)]
    pub serve: bool,
    /// Whether the network is public (defaults to true when unstated)
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_public() -> bool {
    true
}

impl ManifestEntry {
    /// Served and public, the condition for appearing in the portal.
    pub fn is_listed(&self) -> bool {
        self.serve && self.public
    }

    /// Filename with the registry extension stripped.
    pub fn network_name(&self) -> &str {
        self.filename.strip_suffix(HOCON_EXT).unwrap_or(&self.filename)
    }
}

/// Extract manifest entries from pre-processed manifest text.
///
/// Only keys ending in `.hocon` are entries; anything else is skipped.
/// Boolean-valued entries default `public` to true. Object-valued
/// entries read optional `serve` (default false) and `public` (default
/// true) flags. When the same filename appears in both shapes, the
/// object form wins regardless of order; otherwise later entries
/// override earlier ones when the caller folds the returned list into a
/// map.
///
/// # Errors
/// Returns [`HoconError::Malformed`] when an entry's object value has
/// no closing brace.
pub fn parse_manifest_entries(text: &str) -> HoconResult<Vec<ManifestEntry>> {
    let b = text.as_bytes();
    let mut simple = Vec::new();
    let mut object = Vec::new();
    let mut i = 0;

    while i < b.len() {
        if starts_triple(b, i) {
            i = skip_triple(b, i)
                .ok_or_else(|| HoconError::Malformed("unterminated multi-line string".into()))?;
        } else if b[i] == b'"' {
            let Some(end) = skip_string(b, i) else {
                return Err(HoconError::Malformed("unterminated quoted string".into()));
            };
            let key = &text[i + 1..end - 1];
            i = end;
            if !key.ends_with(HOCON_EXT) {
                continue;
            }
            let j = skip_ws(b, end);
            if j >= b.len() || (b[j] != b':' && b[j] != b'=') {
                continue;
            }
            let k = skip_ws(b, j + 1);
            if let Some((serve, value_end)) = read_bool(b, k) {
                simple.push(ManifestEntry {
                    filename: key.to_string(),
                    serve,
                    public: true,
                });
                i = value_end;
            } else if k < b.len() && b[k] == b'{' {
                let close = find_block_end(b, k).ok_or_else(|| {
                    HoconError::Malformed(format!("unclosed object for manifest entry '{key}'"))
                })?;
                let body = &text[k + 1..close];
                object.push(ManifestEntry {
                    filename: key.to_string(),
                    serve: first_bool_value(body, "serve").unwrap_or(false),
                    public: first_bool_value(body, "public").unwrap_or(true),
                });
                i = close + 1;
            }
        } else if is_ident_start(b[i]) {
            // bare words (true/false values, stray keys) are not entries
            let mut j = i;
            while j < b.len() && (b[j].is_ascii_alphanumeric() || matches!(b[j], b'_' | b'-' | b'.'))
            {
                j += 1;
            }
            i = j;
        } else {
            i += 1;
        }
    }

    // Object entries override simple ones for the same filename, which
    // the caller's fold order guarantees when they come last.
    simple.extend(object);
    Ok(simple)
}
