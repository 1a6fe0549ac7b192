//! netreg-core - registry-level operations over agent-network files
//!
//! Composes the text-level primitives from `netreg-hocon` into the
//! operations callers actually run: extracting the agent call graph
//! from a network file and its include closure, aggregating served
//! manifests across a registry tree, scanning toolbox descriptions,
//! and updating one agent's instructions in place.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod connectivity;
pub mod error;
pub mod manifest;
pub mod toolbox;
pub mod update;

pub use netreg_hocon;

pub use connectivity::{ConnectivityEdge, ConnectivityReport};
pub use error::{CoreError, CoreResult};
pub use manifest::ServedNetworks;
pub use toolbox::ToolInfo;
pub use update::UpdateOutcome;
