use bit_set::BitSet;

use crate::graph::Graph;

/** Vertex Id */
pub type VertexId = usize;

/** Color index (colors start at 0) */
pub type Color = usize;

/** Solution of a graph coloring problem
(represented as a partition: res[c] is the list of vertices colored with c).
*/
pub type Solution = Vec<Vec<VertexId>>;

/// result of the solution checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// the coloring is valid and uses this many colors
    Ok(usize),
    /// the assignment does not have one entry per vertex
    WrongSize {
        /// expected number of entries
        expected: usize,
        /// given number of entries
        given: usize,
    },
    /// the vertex did not receive a color
    Uncolored(VertexId),
    /// these two adjacent vertices share a color
    Conflict(VertexId, VertexId),
}

/**
checks a color assignment (assignment[v]: color of v).
returns the number of distinct colors if the coloring is proper.
*/
pub fn checker(graph:&Graph, assignment:&[Option<Color>]) -> CheckerResult {
    if assignment.len() != graph.nb_vertices() {
        return CheckerResult::WrongSize { expected: graph.nb_vertices(), given: assignment.len() };
    }
    let mut used = BitSet::new();
    for (v,c) in assignment.iter().enumerate() {
        match c {
            None => return CheckerResult::Uncolored(v),
            Some(c) => { used.insert(*c); }
        }
    }
    for (u,v) in graph.edges() {
        if assignment[u] == assignment[v] {
            return CheckerResult::Conflict(u, v);
        }
    }
    CheckerResult::Ok(used.len())
}

/// number of colors used by an assignment (highest color + 1), 0 if nothing is colored
pub fn nb_colors(assignment:&[Option<Color>]) -> usize {
    assignment.iter().flatten().max().map_or(0, |c| c+1)
}

/// converts an assignment to a partition (res[c]: vertices colored with c)
pub fn to_partition(assignment:&[Option<Color>]) -> Solution {
    let mut res = vec![vec![] ; nb_colors(assignment)];
    for (v,c) in assignment.iter().enumerate() {
        if let Some(c) = c { res[*c].push(v); }
    }
    res
}


#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::from_edges(3, &[(0,1), (1,2), (0,2)], false).unwrap()
    }

    #[test]
    fn test_checker_ok() {
        let g = triangle();
        assert_eq!(checker(&g, &[Some(0), Some(1), Some(2)]), CheckerResult::Ok(3));
    }

    #[test]
    fn test_checker_conflict() {
        let g = triangle();
        assert_eq!(checker(&g, &[Some(0), Some(1), Some(1)]), CheckerResult::Conflict(1, 2));
    }

    #[test]
    fn test_checker_uncolored_and_size() {
        let g = triangle();
        assert_eq!(checker(&g, &[Some(0), None, Some(1)]), CheckerResult::Uncolored(1));
        assert_eq!(
            checker(&g, &[Some(0)]),
            CheckerResult::WrongSize { expected: 3, given: 1 }
        );
    }

    #[test]
    fn test_partition() {
        let assignment = [Some(1), Some(0), Some(1), None];
        assert_eq!(nb_colors(&assignment), 2);
        assert_eq!(to_partition(&assignment), vec![vec![1], vec![0,2]]);
        assert_eq!(nb_colors(&[None, None]), 0);
    }
}
