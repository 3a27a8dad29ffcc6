use std::collections::VecDeque;

use bit_set::BitSet;

use crate::color::VertexId;
use crate::error::ColoringError;

/**
Models a graph by a dense adjacency matrix.
Each row is a bitset: matrix[i] contains j iff (i,j) is an edge.
For an undirected graph, the matrix is kept symmetric.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    /// adjacency matrix (one bitset per vertex)
    matrix: Vec<BitSet>,
    /// if false, setting (i,j) also sets (j,i)
    directed: bool,
}

impl Graph {

    /// creates a graph with n vertices and no edge
    pub fn new(n:usize, directed:bool) -> Self {
        Self { matrix: vec![BitSet::default() ; n], directed }
    }

    /// creates a graph with n vertices from an edge list
    pub fn from_edges(n:usize, edges:&[(VertexId,VertexId)], directed:bool) -> Result<Self, ColoringError> {
        let mut res = Self::new(n, directed);
        res.add_edges(edges)?;
        Ok(res)
    }

    /// true if the graph is directed
    pub fn directed(&self) -> bool { self.directed }

    /// number of vertices
    pub fn nb_vertices(&self) -> usize { self.matrix.len() }

    /// number of edges (each undirected edge is counted once)
    pub fn nb_edges(&self) -> usize { self.edges().count() }

    /// iterates over the vertices
    pub fn vertices(&self) -> std::ops::Range<VertexId> { 0..self.nb_vertices() }

    fn check(&self, v:VertexId) -> Result<(), ColoringError> {
        if v < self.nb_vertices() { Ok(()) }
        else { Err(ColoringError::IndexOutOfRange { index: v, nb_vertices: self.nb_vertices() }) }
    }

    /// returns true if (i,j) is an edge. O(1)
    pub fn adjacent(&self, i:VertexId, j:VertexId) -> Result<bool, ColoringError> {
        self.check(i)?;
        self.check(j)?;
        Ok(self.matrix[i].contains(j))
    }

    /// sets or clears (i,j) (and (j,i) if the graph is undirected). O(1)
    pub fn set_adjacent(&mut self, i:VertexId, j:VertexId, value:bool) -> Result<(), ColoringError> {
        self.check(i)?;
        self.check(j)?;
        self.apply(i, j, value);
        if !self.directed { self.apply(j, i, value); }
        Ok(())
    }

    fn apply(&mut self, i:VertexId, j:VertexId, value:bool) {
        if value { self.matrix[i].insert(j); }
        else { self.matrix[i].remove(j); }
    }

    /// adds the undirected edge (i,j) (no bound check, i and j must be vertices)
    pub(crate) fn link(&mut self, i:VertexId, j:VertexId) {
        self.apply(i, j, true);
        self.apply(j, i, true);
    }

    /// adds a list of edges. Fails on the first out-of-range endpoint
    pub fn add_edges(&mut self, edges:&[(VertexId,VertexId)]) -> Result<(), ColoringError> {
        for (i,j) in edges {
            self.set_adjacent(*i, *j, true)?;
        }
        Ok(())
    }

    /// removes a list of edges. Fails on the first out-of-range endpoint
    pub fn remove_edges(&mut self, edges:&[(VertexId,VertexId)]) -> Result<(), ColoringError> {
        for (i,j) in edges {
            self.set_adjacent(*i, *j, false)?;
        }
        Ok(())
    }

    /// removes every edge (keeps the vertices)
    pub fn clear(&mut self) {
        for row in self.matrix.iter_mut() { row.clear(); }
    }

    /** appends a vertex with no edge and returns its id.
    Existing entries are left untouched (new vertices are always added last).
    */
    pub fn add_node(&mut self) -> VertexId {
        self.matrix.push(BitSet::default());
        self.matrix.len()-1
    }

    /** vertices adjacent to v, in ascending order.
    The iterator borrows the graph: calling this again restarts the enumeration.
    */
    pub fn neighbors(&self, v:VertexId) -> Result<impl Iterator<Item=VertexId> + '_, ColoringError> {
        self.check(v)?;
        Ok(self.matrix[v].iter())
    }

    /// number of vertices adjacent to v
    pub fn degree(&self, v:VertexId) -> Result<usize, ColoringError> {
        self.check(v)?;
        Ok(self.matrix[v].len())
    }

    /** edges of the graph.
    undirected: every (i,j) with i<j exactly once. directed: every arc (i,j).
    */
    pub fn edges(&self) -> impl Iterator<Item=(VertexId,VertexId)> + '_ {
        let directed = self.directed;
        self.matrix.iter().enumerate().flat_map(move |(i,row)| {
            row.iter().filter(move |j| directed || *j > i).map(move |j| (i,j))
        })
    }

    /// row of the adjacency matrix (no bound check, used by the search)
    pub(crate) fn row(&self, v:VertexId) -> &BitSet { &self.matrix[v] }

    /// first vertex adjacent to itself, if any
    pub fn self_loop(&self) -> Option<VertexId> {
        self.vertices().find(|v| self.matrix[*v].contains(*v))
    }

    /** true if the graph is (weakly) connected.
    The graphs with 0 or 1 vertex are connected.
    */
    pub fn is_connected(&self) -> bool {
        let n = self.nb_vertices();
        if n <= 1 { return true; }
        let mut visited = BitSet::with_capacity(n);
        let mut queue = VecDeque::new();
        visited.insert(0);
        queue.push_back(0);
        while let Some(u) = queue.pop_front() {
            for w in self.vertices() {
                let linked = self.matrix[u].contains(w) || self.matrix[w].contains(u);
                if linked && visited.insert(w) {
                    queue.push_back(w);
                }
            }
        }
        visited.len() == n
    }

    /// print statistics of the graph
    pub fn display_statistics(&self) {
        println!("\t{} \t vertices", self.nb_vertices());
        println!("\t{} \t edges", self.nb_edges());
        let degrees:Vec<usize> = self.matrix.iter().map(|row| row.len()).collect();
        println!("\t{} \t min degree", degrees.iter().min().unwrap_or(&0));
        println!("\t{} \t max degree", degrees.iter().max().unwrap_or(&0));
        if self.directed { println!("\tdirected"); }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_adjacency() {
        let mut g = Graph::new(4, false);
        g.set_adjacent(0, 3, true).unwrap();
        assert!(g.adjacent(0, 3).unwrap());
        assert!(g.adjacent(3, 0).unwrap());
        g.set_adjacent(3, 0, false).unwrap();
        assert!(!g.adjacent(0, 3).unwrap());
    }

    #[test]
    fn test_directed_adjacency() {
        let g = Graph::from_edges(3, &[(0,1), (2,1)], true).unwrap();
        assert!(g.adjacent(0, 1).unwrap());
        assert!(!g.adjacent(1, 0).unwrap());
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0,1), (2,1)]);
    }

    #[test]
    fn test_out_of_range() {
        let mut g = Graph::new(2, false);
        assert!(matches!(
            g.adjacent(0, 2),
            Err(ColoringError::IndexOutOfRange { index: 2, nb_vertices: 2 })
        ));
        assert!(g.set_adjacent(5, 0, true).is_err());
        assert!(g.neighbors(2).is_err());
        assert!(g.degree(7).is_err());
        assert!(Graph::from_edges(2, &[(0,1), (1,2)], false).is_err());
    }

    #[test]
    fn test_neighbors_ascending_and_restartable() {
        let g = Graph::from_edges(5, &[(2,4), (2,0), (2,3)], false).unwrap();
        assert_eq!(g.neighbors(2).unwrap().collect::<Vec<_>>(), vec![0,3,4]);
        assert_eq!(g.neighbors(2).unwrap().collect::<Vec<_>>(), vec![0,3,4]);
        assert_eq!(g.neighbors(1).unwrap().count(), 0);
        assert_eq!(g.degree(2).unwrap(), 3);
    }

    #[test]
    fn test_edges_once() {
        let g = Graph::from_edges(4, &[(0,1), (1,2), (2,3), (3,0), (1,0)], false).unwrap();
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0,1), (0,3), (1,2), (2,3)]);
        assert_eq!(g.nb_edges(), 4);
    }

    #[test]
    fn test_add_node_keeps_edges() {
        let mut g = Graph::from_edges(3, &[(0,1), (1,2)], false).unwrap();
        let v = g.add_node();
        assert_eq!(v, 3);
        assert_eq!(g.nb_vertices(), 4);
        assert!(g.adjacent(0, 1).unwrap());
        assert!(g.adjacent(2, 1).unwrap());
        for u in 0..4 {
            assert!(!g.adjacent(u, 3).unwrap());
            assert!(!g.adjacent(3, u).unwrap());
        }
        g.set_adjacent(3, 0, true).unwrap();
        assert_eq!(g.neighbors(0).unwrap().collect::<Vec<_>>(), vec![1,3]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut g = Graph::from_edges(3, &[(0,1), (1,2)], false).unwrap();
        g.remove_edges(&[(2,1)]).unwrap();
        assert_eq!(g.nb_edges(), 1);
        g.clear();
        assert_eq!(g.nb_edges(), 0);
        assert_eq!(g.nb_vertices(), 3);
    }

    #[test]
    fn test_connectivity_and_self_loop() {
        let path = Graph::from_edges(3, &[(0,1), (1,2)], false).unwrap();
        assert!(path.is_connected());
        let split = Graph::from_edges(4, &[(0,1), (2,3)], false).unwrap();
        assert!(!split.is_connected());
        assert!(Graph::new(0, false).is_connected());
        assert_eq!(path.self_loop(), None);
        let looped = Graph::from_edges(2, &[(1,1)], false).unwrap();
        assert_eq!(looped.self_loop(), Some(1));
    }
}
