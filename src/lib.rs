//! Conflict graph coloring (DSATUR and exact branch and bound) for timetabling

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


/// coloring vocabulary, solutions and checker
pub mod color;

/// undirected simple graph and vertex relabeling
pub mod graph;

/// read/write DIMACS formats
pub mod dimacs;

/// synthetic graph families
pub mod generators;

/// exam timetabling (conflict graphs, slots)
pub mod timetable;

/// helper and utility methods for executables
pub mod util;

/// coloring algorithms
pub mod search;

pub use color::{Coloring, VertexId};
pub use graph::{Graph, GraphError};
pub use search::greedy_dsatur::greedy_dsatur as heuristic_color;
pub use search::coloring_bnb::exact_color;
