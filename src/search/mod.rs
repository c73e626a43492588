//! Coloring algorithms for the graph coloring problem.

/// greedy DSATUR algorithm
pub mod greedy_dsatur;

/// exact anytime branch and bound seeded by DSATUR
pub mod coloring_bnb;
