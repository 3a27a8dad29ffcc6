//! Exact graph coloring by best-first branch & bound

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// errors of the crate
pub mod error;

/// coloring base types, solutions and checker
pub mod color;

/// dense graph (adjacency matrix)
pub mod graph;

/// read/write DIMACS formats
pub mod dimacs;

/// random instance generator
pub mod generator;

/// branch & bound for the graph coloring problem
pub mod search;

/// helper and utility methods for executables
pub mod util;
