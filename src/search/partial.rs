use bit_set::BitSet;

use crate::color::{Color, VertexId};
use crate::graph::Graph;

/**
A search tree node: colors a prefix 0..=depth of the vertices.
Bounds are expressed in number of colors and are filled by the solver
once the node is built.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct PartialColoring {
    /// assignment[v]: color of v (None if v > depth)
    assignment: Vec<Option<Color>>,
    /// last colored vertex
    depth: VertexId,
    /// maximum color used in the prefix
    highest_color_used: Color,
    /// lower bound on the number of colors of any completion
    optimistic_bound: f64,
    /// achievable number of colors from this node
    pessimistic_bound: f64,
    /// creation order (tie-break in the frontier)
    sequence_id: u64,
}

impl PartialColoring {

    /// creates the root: vertex 0 colored with 0. The graph must have at least one vertex
    pub fn root(nb_vertices:usize, sequence_id:u64) -> Self {
        debug_assert!(nb_vertices > 0);
        let mut assignment = vec![None ; nb_vertices];
        assignment[0] = Some(0);
        Self {
            assignment,
            depth: 0,
            highest_color_used: 0,
            optimistic_bound: 0.,
            pessimistic_bound: 0.,
            sequence_id,
        }
    }

    /// assignment of the vertices (None for uncolored ones)
    pub fn assignment(&self) -> &[Option<Color>] { &self.assignment }

    /// consumes the node and returns its assignment
    pub fn into_assignment(self) -> Vec<Option<Color>> { self.assignment }

    /// last colored vertex
    pub fn depth(&self) -> VertexId { self.depth }

    /// maximum color used so far
    pub fn highest_color_used(&self) -> Color { self.highest_color_used }

    /// number of colors used so far
    pub fn nb_colors(&self) -> usize { self.highest_color_used + 1 }

    /// number of vertices
    pub fn nb_vertices(&self) -> usize { self.assignment.len() }

    /// number of uncolored vertices
    pub fn nb_uncolored(&self) -> usize { self.assignment.len() - self.depth - 1 }

    /// next vertex to color (None if the node is complete)
    pub fn next_vertex(&self) -> Option<VertexId> {
        if self.is_complete() { None } else { Some(self.depth+1) }
    }

    /// true if every vertex is colored
    pub fn is_complete(&self) -> bool { self.depth + 1 == self.assignment.len() }

    /// optimistic bound (as set by the solver)
    pub fn optimistic_bound(&self) -> f64 { self.optimistic_bound }

    /// pessimistic bound (as set by the solver)
    pub fn pessimistic_bound(&self) -> f64 { self.pessimistic_bound }

    /// creation order of the node
    pub fn sequence_id(&self) -> u64 { self.sequence_id }

    pub(crate) fn set_bounds(&mut self, optimistic:f64, pessimistic:f64) {
        self.optimistic_bound = optimistic;
        self.pessimistic_bound = pessimistic;
    }

    /** colors used by the already colored neighbors of v.
    uncolored neighbors contribute nothing.
    */
    pub fn neighbor_colors(&self, graph:&Graph, v:VertexId) -> BitSet {
        let mut res = BitSet::default();
        for u in graph.row(v).iter().take_while(|u| *u <= self.depth) {
            if let Some(c) = self.assignment[u] { res.insert(c); }
        }
        res
    }

    /** candidate colors for the next vertex, in ascending order:
    every c in 0..=highest_color_used+1 not used by a colored neighbor.
    Trying at most one new color breaks the color permutation symmetry.
    */
    pub fn candidate_colors(&self, graph:&Graph) -> Vec<Color> {
        match self.next_vertex() {
            None => Vec::new(),
            Some(v) => {
                let forbidden = self.neighbor_colors(graph, v);
                (0..=self.highest_color_used+1).filter(|c| !forbidden.contains(*c)).collect()
            }
        }
    }

    /** builds the child coloring the next vertex with color c.
    returns None if c is not a candidate (conflict or symmetry breaking).
    bounds of the child are left to 0 (the solver evaluates them).
    */
    pub fn child(&self, graph:&Graph, c:Color, sequence_id:u64) -> Option<Self> {
        let v = self.next_vertex()?;
        if c > self.highest_color_used+1 || self.neighbor_colors(graph, v).contains(c) {
            return None;
        }
        let mut res = self.clone();
        res.assignment[v] = Some(c);
        res.depth = v;
        res.highest_color_used = std::cmp::max(c, self.highest_color_used);
        res.optimistic_bound = 0.;
        res.pessimistic_bound = 0.;
        res.sequence_id = sequence_id;
        Some(res)
    }
}
