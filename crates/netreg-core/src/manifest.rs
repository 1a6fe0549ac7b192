//! Manifest aggregation across a registry tree
//!
//! A registry root carries a top-level `manifest.hocon` plus optional
//! per-category manifests one directory below it. Aggregation scans
//! them in a fixed deterministic order (root first, then categories
//! sorted by name), merges entries by filename with later files
//! overriding earlier ones, and reports the sorted set of networks
//! that are both served and public.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use netreg_hocon::manifest::{parse_manifest_entries, ManifestEntry};
use netreg_hocon::preprocess::strip_comments;

use crate::error::{CoreError, CoreResult};

/// Filename every manifest uses.
pub const MANIFEST_FILE: &str = "manifest.hocon";

/// The aggregated served-and-public network list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServedNetworks {
    /// Sorted, deduplicated network names, extension stripped
    pub networks: Vec<String>,
}

/// Aggregate every manifest under `registries_root`.
///
/// The root manifest is read first, then each category manifest
/// (`<root>/<category>/manifest.hocon`) in sorted category order.
/// Later files win when two manifests declare the same filename, so
/// with categories sorted alphabetically a duplicate in `tools`
/// overrides one in `industry`, not the other way around.
/// Missing manifests are skipped silently; a manifest that cannot be
/// read or parsed is warned about on stderr and skipped. Only the root
/// directory itself is required to exist.
///
/// # Errors
/// Returns [`CoreError::RegistriesNotFound`] when `registries_root` is
/// not a directory.
pub fn served_networks(registries_root: &Path) -> CoreResult<ServedNetworks> {
    if !registries_root.is_dir() {
        return Err(CoreError::RegistriesNotFound(registries_root.to_path_buf()));
    }

    let mut merged: BTreeMap<String, ManifestEntry> = BTreeMap::new();
    for path in manifest_paths(registries_root) {
        if !path.is_file() {
            continue;
        }
        match read_manifest(&path) {
            Ok(entries) => {
                for entry in entries {
                    merged.insert(entry.filename.clone(), entry);
                }
            }
            Err(e) => {
                eprintln!("Warning: could not parse {}: {e}", path.display());
            }
        }
    }

    let networks = merged
        .values()
        .filter(|entry| entry.is_listed())
        .map(|entry| entry.network_name().to_string())
        .collect();

    Ok(ServedNetworks { networks })
}

/// Root manifest followed by category manifests in sorted order.
fn manifest_paths(root: &Path) -> Vec<PathBuf> {
    let mut paths = vec![root.join(MANIFEST_FILE)];
    let categories = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir());
    for category in categories {
        paths.push(category.path().join(MANIFEST_FILE));
    }
    paths
}

fn read_manifest(path: &Path) -> CoreResult<Vec<ManifestEntry>> {
    let text = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    parse_manifest_entries(&strip_comments(&text)).map_err(|e| CoreError::hocon(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, content: &str) {
        fs::create_dir_all(dir).expect("create manifest dir");
        fs::write(dir.join(MANIFEST_FILE), content).expect("write manifest");
    }

    #[test]
    fn test_served_and_public_only() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), "\"a.hocon\": true\n");
        write_manifest(
            &tmp.path().join("basic"),
            "\"b.hocon\": { serve = true, public = false }\n",
        );

        let served = served_networks(tmp.path()).unwrap();
        assert_eq!(served.networks, vec!["a"]);
    }

    #[test]
    fn test_later_manifest_wins() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), "\"x.hocon\": true\n");
        write_manifest(&tmp.path().join("tools"), "\"x.hocon\": false\n");

        let served = served_networks(tmp.path()).unwrap();
        assert!(served.networks.is_empty());
    }

    #[test]
    fn test_missing_category_manifest_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), "\"a.hocon\": true\n");
        fs::create_dir_all(tmp.path().join("empty-category")).unwrap();

        let served = served_networks(tmp.path()).unwrap();
        assert_eq!(served.networks, vec!["a"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let err = served_networks(Path::new("/no/such/registries")).unwrap_err();
        assert!(matches!(err, CoreError::RegistriesNotFound(_)));
    }

    #[test]
    fn test_output_sorted_and_deduplicated() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), "\"zeta.hocon\": true\n\"alpha.hocon\": true\n");
        write_manifest(&tmp.path().join("cat"), "\"alpha.hocon\": true\n");

        let served = served_networks(tmp.path()).unwrap();
        assert_eq!(served.networks, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_malformed_manifest_skipped_with_warning() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), "\"ok.hocon\": true\n");
        write_manifest(&tmp.path().join("broken"), "\"bad.hocon\": { serve = true\n");

        let served = served_networks(tmp.path()).unwrap();
        assert_eq!(served.networks, vec!["ok"]);
    }

    #[test]
    fn test_comments_stripped_before_parsing() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), "# disabled below\n# \"ghost.hocon\": true\n\"live.hocon\": true\n");

        let served = served_networks(tmp.path()).unwrap();
        assert_eq!(served.networks, vec!["live"]);
    }
}
