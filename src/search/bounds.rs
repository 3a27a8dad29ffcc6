use bit_set::BitSet;

use crate::color::nb_colors;
use crate::graph::Graph;
use crate::search::greedy::{dsatur_completion, greedy_clique};
use crate::search::partial::PartialColoring;

/**
A bound on the number of colors reachable from a partial coloring.
Used by the solver both as optimistic bound (must never exceed the number
of colors of any completion for the search to be exact) and as pessimistic
bound (must be reachable by some completion).
*/
pub trait BoundFunction {
    /// evaluates the bound of a node
    fn bound(&self, graph:&Graph, node:&PartialColoring) -> f64;
}

impl<F> BoundFunction for F where F: Fn(&Graph, &PartialColoring) -> f64 {
    fn bound(&self, graph:&Graph, node:&PartialColoring) -> f64 {
        self(graph, node)
    }
}


/// optimistic bound: number of colors already used. Admissible
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorsUsed;

impl BoundFunction for ColorsUsed {
    fn bound(&self, _graph:&Graph, node:&PartialColoring) -> f64 {
        node.nb_colors() as f64
    }
}


/**
Optimistic bound. Admissible.
    - colors already used,
    - +1 if the colored neighbors of the next vertex already see every used color,
    - never less than the size of a clique (computed once with a greedy).
*/
#[derive(Debug, Clone)]
pub struct SaturationBound {
    /// size of a clique of the graph
    clique_size: usize,
}

impl SaturationBound {
    /// builds the bound for a given graph (finds a clique)
    pub fn new(graph:&Graph) -> Self {
        Self { clique_size: greedy_clique(graph).len() }
    }

    /// size of the clique used as a global lower bound
    pub fn clique_size(&self) -> usize { self.clique_size }
}

impl BoundFunction for SaturationBound {
    fn bound(&self, graph:&Graph, node:&PartialColoring) -> f64 {
        let used = node.nb_colors();
        let forced = match node.next_vertex() {
            None => 0,
            Some(v) => if node.neighbor_colors(graph, v).len() == used { 1 } else { 0 }
        };
        std::cmp::max(used + forced, self.clique_size) as f64
    }
}


/**
Optimistic estimate from the neighborhood of the next vertex.
Computes the average number of uncolored neighbors of the next vertex that
are adjacent to each other (overlap). If the neighborhood was a clique, it
would need (overlap + 2) colors.
NOT admissible (dense bipartite-like neighborhoods overestimate): the
search is not exact with this bound. Can be fractional.
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct GuessNeighbors;

impl BoundFunction for GuessNeighbors {
    fn bound(&self, graph:&Graph, node:&PartialColoring) -> f64 {
        let used = node.nb_colors() as f64;
        let v = match node.next_vertex() {
            None => return used,
            Some(v) => v
        };
        let uncolored:BitSet = graph.row(v).iter().filter(|u| *u > node.depth()).collect();
        if uncolored.is_empty() { return used; }
        let overlap:usize = uncolored.iter()
            .map(|u| graph.row(u).intersection(&uncolored).count())
            .sum();
        let average = overlap as f64 / uncolored.len() as f64;
        used.max(average + 2.)
    }
}


/// pessimistic bound: colors used + uncolored vertices (each one gets its own new color)
#[derive(Debug, Clone, Copy, Default)]
pub struct RemainingNodes;

impl BoundFunction for RemainingNodes {
    fn bound(&self, _graph:&Graph, node:&PartialColoring) -> f64 {
        (node.nb_colors() + node.nb_uncolored()) as f64
    }
}


/// pessimistic bound: number of colors of a DSATUR completion of the node
#[derive(Debug, Clone, Copy, Default)]
pub struct DsaturCompletion;

impl BoundFunction for DsaturCompletion {
    fn bound(&self, graph:&Graph, node:&PartialColoring) -> f64 {
        if node.is_complete() { return node.nb_colors() as f64; }
        nb_colors(&dsatur_completion(graph, node.assignment())) as f64
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_plus_isolated() -> Graph {
        Graph::from_edges(4, &[(0,1), (1,2), (0,2)], false).unwrap()
    }

    #[test]
    fn test_closure_is_bound() {
        let g = triangle_plus_isolated();
        let root = PartialColoring::root(4, 0);
        let f = |_:&Graph, n:&PartialColoring| n.depth() as f64 + 0.5;
        assert_eq!(f.bound(&g, &root), 0.5);
    }

    #[test]
    fn test_colors_used_and_remaining() {
        let g = triangle_plus_isolated();
        let root = PartialColoring::root(4, 0);
        assert_eq!(ColorsUsed.bound(&g, &root), 1.);
        assert_eq!(RemainingNodes.bound(&g, &root), 4.);
        let child = root.child(&g, 1, 1).unwrap();
        assert_eq!(ColorsUsed.bound(&g, &child), 2.);
        assert_eq!(RemainingNodes.bound(&g, &child), 4.);
    }

    #[test]
    fn test_saturation_bound() {
        let g = triangle_plus_isolated();
        let bound = SaturationBound::new(&g);
        assert_eq!(bound.clique_size(), 3);
        let root = PartialColoring::root(4, 0);
        assert_eq!(bound.bound(&g, &root), 3.);
        // path 0-1-2: vertex 1 sees the only used color
        let path = Graph::from_edges(3, &[(0,1), (1,2)], false).unwrap();
        let bound = SaturationBound { clique_size: 0 };
        assert_eq!(bound.bound(&path, &PartialColoring::root(3, 0)), 2.);
        let empty = Graph::new(3, false);
        assert_eq!(bound.bound(&empty, &PartialColoring::root(3, 0)), 1.);
    }

    #[test]
    fn test_dsatur_completion_bound() {
        let g = triangle_plus_isolated();
        let root = PartialColoring::root(4, 0);
        assert_eq!(DsaturCompletion.bound(&g, &root), 3.);
        let leaf = root.child(&g, 1, 1).unwrap()
            .child(&g, 2, 2).unwrap()
            .child(&g, 3, 3).unwrap();
        assert!(leaf.is_complete());
        assert_eq!(DsaturCompletion.bound(&g, &leaf), 4.);
    }

    #[test]
    fn test_guess_neighbors() {
        // vertex 1 has uncolored neighbors 2,3 that are adjacent: overlap 1
        let g = Graph::from_edges(4, &[(0,1), (1,2), (1,3), (2,3)], false).unwrap();
        let root = PartialColoring::root(4, 0);
        assert_eq!(GuessNeighbors.bound(&g, &root), 3.);
        let empty = Graph::new(4, false);
        assert_eq!(GuessNeighbors.bound(&empty, &root), 1.);
    }
}
