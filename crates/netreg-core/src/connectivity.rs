//! Agent call-graph extraction
//!
//! Builds the directed "who calls whom" graph a visualization layer
//! consumes: one edge per recognized block, in discovery order, with
//! the downstream list restricted to names that are themselves
//! recognized blocks. References to unknown names are dropped silently,
//! matching the permissive registry schema.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use netreg_hocon::preprocess::{include_targets, preprocess};
use netreg_hocon::scan::{quoted_strings, scan_blocks};
use netreg_hocon::ScanOptions;

use crate::error::{CoreError, CoreResult};

/// One origin block and the known blocks it calls.
///
/// Leaf blocks carry no `tools` key at all in serialized form, matching
/// the wire shape downstream UIs expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityEdge {
    /// Name of the calling block
    pub origin: String,
    /// Known downstream block names, first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

impl ConnectivityEdge {
    /// A leaf edge with no downstream calls.
    pub fn leaf(origin: impl Into<String>) -> Self {
        Self { origin: origin.into(), tools: Vec::new() }
    }
}

/// The full graph for one network document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub connectivity: Vec<ConnectivityEdge>,
}

/// Extract the call graph from a network file.
///
/// Includes are resolved relative to `include_root` (the registries
/// root; defaults to the document's own directory) after the
/// pre-processor has rewritten their paths. Included documents extend
/// the closure recursively; an include that cannot be read is warned
/// about and skipped rather than failing the extraction.
///
/// # Errors
/// Returns an error if the network file itself cannot be read.
pub fn extract_connectivity(
    path: &Path,
    include_root: Option<&Path>,
    options: &ScanOptions,
) -> CoreResult<ConnectivityReport> {
    let root = include_root
        .map(Path::to_path_buf)
        .or_else(|| path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let text = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    let pre = preprocess(&text);

    let mut visited: HashSet<PathBuf> = HashSet::new();
    visited.insert(path.to_path_buf());

    let mut combined = pre.clone();
    for target in include_targets(&pre) {
        append_closure(&root.join(target), &root, &mut visited, &mut combined);
    }

    Ok(ConnectivityReport {
        connectivity: connectivity_from_text(&combined, options),
    })
}

/// Follow one include, then its own includes, skipping anything already
/// visited so include cycles terminate.
fn append_closure(path: &Path, root: &Path, visited: &mut HashSet<PathBuf>, out: &mut String) {
    if !visited.insert(path.to_path_buf()) {
        return;
    }
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Warning: could not read include {}: {e}", path.display());
            return;
        }
    };
    let pre = preprocess(&text);
    out.push('\n');
    out.push_str(&pre);
    for target in include_targets(&pre) {
        append_closure(&root.join(target), root, visited, out);
    }
}

/// Build edges from (possibly concatenated) network text.
///
/// Downstream references are the quoted tokens inside a block's body
/// that name another recognized block, deduplicated in first-seen
/// order, with self-references excluded.
pub fn connectivity_from_text(text: &str, options: &ScanOptions) -> Vec<ConnectivityEdge> {
    let pre = preprocess(text);
    let blocks = scan_blocks(&pre, options);
    let known: HashSet<&str> = blocks.iter().map(|b| b.name.as_str()).collect();

    blocks
        .iter()
        .map(|block| {
            let mut tools: Vec<String> = Vec::new();
            for token in quoted_strings(block.body(&pre)) {
                if token != block.name
                    && known.contains(token)
                    && !tools.iter().any(|t| t == token)
                {
                    tools.push(token.to_string());
                }
            }
            ConnectivityEdge { origin: block.name.clone(), tools }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_billing_support() {
        let text = r#"
"Router": { tools: ["Billing", "Support"] }
"Billing": {}
"Support": {}
"#;
        let edges = connectivity_from_text(text, &ScanOptions::default());
        assert_eq!(
            edges,
            vec![
                ConnectivityEdge {
                    origin: "Router".into(),
                    tools: vec!["Billing".into(), "Support".into()],
                },
                ConnectivityEdge::leaf("Billing"),
                ConnectivityEdge::leaf("Support"),
            ]
        );
    }

    #[test]
    fn test_unknown_references_dropped() {
        let text = r#"
"Router": { tools: ["Billing", "NotDeclared"] }
"Billing": {}
"#;
        let edges = connectivity_from_text(text, &ScanOptions::default());
        assert_eq!(edges[0].tools, vec!["Billing"]);
    }

    #[test]
    fn test_duplicate_references_deduplicated() {
        let text = r#"
"Router": { tools: ["Billing", "Billing"] }
"Billing": {}
"#;
        let edges = connectivity_from_text(text, &ScanOptions::default());
        assert_eq!(edges[0].tools, vec!["Billing"]);
    }

    #[test]
    fn test_self_reference_excluded() {
        let text = r#"
"Echo": { tools: ["Echo"] }
"#;
        let edges = connectivity_from_text(text, &ScanOptions::default());
        assert_eq!(edges, vec![ConnectivityEdge::leaf("Echo")]);
    }

    #[test]
    fn test_leaf_edge_serializes_without_tools() {
        let edge = ConnectivityEdge::leaf("URLProvider");
        let json = serde_json::to_string(&edge).unwrap();
        assert_eq!(json, r#"{"origin":"URLProvider"}"#);
    }

    #[test]
    fn test_comment_marker_inside_url_does_not_empty_graph() {
        // Stripping truncates the url string mid-line. The damage must
        // stay local: both blocks and the Router edge survive.
        let text = r##"
"Router": {
    tools = ["Billing"]
    url = "http://svc.example/#status"
}
"Billing": {}
"##;
        let edges = connectivity_from_text(text, &ScanOptions::default());
        assert_eq!(
            edges,
            vec![
                ConnectivityEdge {
                    origin: "Router".into(),
                    tools: vec!["Billing".into()],
                },
                ConnectivityEdge::leaf("Billing"),
            ]
        );
    }

    #[test]
    fn test_references_inside_instructions_are_ignored() {
        let text = r#"
"Router": { instructions = """Ask "Billing" politely""" }
"Billing": {}
"#;
        let edges = connectivity_from_text(text, &ScanOptions::default());
        assert!(edges[0].tools.is_empty());
    }
}
