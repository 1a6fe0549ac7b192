//! netreg-hocon - format-preserving HOCON subset reader and editor
//!
//! This crate implements the text-level operations that agent-network
//! registry tooling needs: stripping comments and normalizing includes,
//! locating named brace-delimited blocks with a single-pass scanner,
//! extracting manifest entries, and splicing a new value into one
//! triple-quoted field while leaving every other byte of the document
//! untouched.
//!
//! It is deliberately not a general HOCON parser. Substitutions,
//! include expansion, multi-line arrays, and type coercion are out of
//! scope; the scanner only recognizes the shapes the registry files
//! actually use.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod error;
pub mod manifest;
pub mod preprocess;
pub mod scan;
pub mod splice;

pub use error::{HoconError, HoconResult};
pub use manifest::ManifestEntry;
pub use scan::{Block, ScanOptions};

/// Extension carried by registry configuration files.
pub const HOCON_EXT: &str = ".hocon";

/// Delimiter of a multi-line string literal.
pub const TRIPLE_QUOTE: &str = "\"\"\"";
