//! Branch & bound search for the graph coloring problem.

/// search tree nodes (partial colorings) and their expansion
pub mod partial;

/// priority frontier with bounded size
pub mod frontier;

/// optimistic and pessimistic bound functions
pub mod bounds;

/// greedy helpers (DSATUR completion, clique)
pub mod greedy;

/// stopping criteria
pub mod stopping;

/// branch & bound solver
pub mod solver;
