//! Toolbox description scan
//!
//! A toolbox file declares coded tools as named blocks carrying a
//! `class` and usually a `description`. This scan is a degenerate use
//! of the block scanner: only those two fields are read, through the
//! bounded lookup window, so a deeply nested parameter schema never
//! has to be parsed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use netreg_hocon::preprocess::strip_comments;
use netreg_hocon::scan::{first_field_value, scan_blocks};
use netreg_hocon::ScanOptions;

use crate::error::{CoreError, CoreResult};

/// One coded tool from a toolbox document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Block name, the identifier agents reference
    pub id: String,
    /// Implementation class path
    pub class: String,
    /// Human-readable description, synthesized when absent
    pub description: String,
}

/// Scan a toolbox file for its tool descriptions.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn scan_toolbox(path: &Path, options: &ScanOptions) -> CoreResult<Vec<ToolInfo>> {
    let text = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    Ok(toolbox_from_text(&text, options))
}

/// Extract tool triples from toolbox text.
///
/// Blocks without a `class` within the lookup window are not tools and
/// are skipped. A missing description becomes `"<id> tool"` so every
/// listed tool has something to display.
pub fn toolbox_from_text(text: &str, options: &ScanOptions) -> Vec<ToolInfo> {
    let clean = strip_comments(text);
    scan_blocks(&clean, options)
        .iter()
        .filter_map(|block| {
            let body = block.body(&clean);
            let class = first_field_value(body, "class")?.trim();
            if class.is_empty() {
                return None;
            }
            let description = first_field_value(body, "description")
                .map(collapse_whitespace)
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| format!("{} tool", block.name));
            Some(ToolInfo {
                id: block.name.clone(),
                class: class.to_string(),
                description,
            })
        })
        .collect()
}

/// Multi-line descriptions collapse to single-spaced display text.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOLBOX: &str = r#"
"web_search": {
    "class": "tools.web.WebSearch"
    "description": """
        Searches the web
        and summarizes results.
    """
    "parameters": {
        "type": "object"
    }
}
"bare_tool": {
    "class": "tools.misc.Bare"
}
"not_a_tool": {
    "description": "has no class"
}
"#;

    #[test]
    fn test_tools_with_class_are_listed() {
        let tools = toolbox_from_text(TOOLBOX, &ScanOptions::default());
        let ids: Vec<&str> = tools.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["web_search", "bare_tool"]);
    }

    #[test]
    fn test_description_collapsed() {
        let tools = toolbox_from_text(TOOLBOX, &ScanOptions::default());
        assert_eq!(tools[0].description, "Searches the web and summarizes results.");
    }

    #[test]
    fn test_missing_description_synthesized() {
        let tools = toolbox_from_text(TOOLBOX, &ScanOptions::default());
        assert_eq!(tools[1].description, "bare_tool tool");
    }

    #[test]
    fn test_structural_blocks_never_become_tools() {
        let tools = toolbox_from_text(TOOLBOX, &ScanOptions::default());
        assert!(tools.iter().all(|t| t.id != "parameters" && t.id != "type"));
    }
}
