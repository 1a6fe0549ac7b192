//! In-place instruction updates
//!
//! File-level wrapper around the text splice: read the document, apply
//! the single-span replacement, and write the file back only when the
//! splice succeeded. On any failure the file on disk is untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use netreg_hocon::splice::replace_triple_quoted;

use crate::error::{CoreError, CoreResult};

/// Field updated when the caller does not name one.
pub const DEFAULT_INSTRUCTIONS_FIELD: &str = "instructions";

/// Record of a completed update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    /// File that was rewritten
    pub path: PathBuf,
    /// Agent whose field changed
    pub agent: String,
    /// Field that changed
    pub field: String,
}

/// Produce the updated document text without touching the file.
///
/// Used for dry-run previews; [`update_instructions`] is the writing
/// variant.
///
/// # Errors
/// Returns an error if the file cannot be read or the splice fails
/// (agent or field missing, unsupported value shape, unterminated
/// literal).
pub fn render_update(
    path: &Path,
    agent: &str,
    field: &str,
    new_value: &str,
) -> CoreResult<String> {
    let text = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    replace_triple_quoted(&text, agent, field, new_value).map_err(|e| CoreError::hocon(path, e))
}

/// Replace the agent's triple-quoted field and rewrite the file.
///
/// All-or-nothing: the file is only written after the full replacement
/// text has been produced, so a failed update never leaves a truncated
/// or partially edited document behind.
///
/// # Errors
/// Same conditions as [`render_update`], plus write failures.
pub fn update_instructions(
    path: &Path,
    agent: &str,
    field: &str,
    new_value: &str,
) -> CoreResult<UpdateOutcome> {
    let updated = render_update(path, agent, field, new_value)?;
    fs::write(path, updated).map_err(|e| CoreError::io(path, e))?;
    Ok(UpdateOutcome {
        path: path.to_path_buf(),
        agent: agent.to_string(),
        field: field.to_string(),
    })
}
