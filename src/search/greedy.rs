use std::cmp::Ordering;

use bit_set::BitSet;
use priority_queue::PriorityQueue;

use crate::color::{Color, VertexId};
use crate::graph::Graph;

#[derive(PartialEq, Eq)]
struct DSatInfo {
    dsat: usize,
    degree: usize
}

impl Ord for DSatInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dsat.cmp(&other.dsat)
            .then_with(|| self.degree.cmp(&other.degree))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for DSatInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/** completes a partial coloring with a greedy DSATUR algorithm.
    1. choose an uncolored vertex that sees the most colors (break ties by the largest degree)
    2. give it the first color available
    3. mark all its uncolored neighbors as seeing this color
    4. repeat until every vertex is colored

Already colored vertices keep their color. Returns the complete assignment.
*/
pub fn dsatur_completion(graph:&Graph, assignment:&[Option<Color>]) -> Vec<Option<Color>> {
    let mut colors = assignment.to_vec();
    let mut adj_colors:Vec<BitSet> = vec![BitSet::default() ; colors.len()]; // adj_colors[v] -> colors v sees
    let mut remaining_vertices:PriorityQueue<VertexId, DSatInfo> = PriorityQueue::new();
    for v in graph.vertices().filter(|v| colors[*v].is_none()) {
        for u in graph.row(v).iter() {
            if let Some(c) = colors[u] { adj_colors[v].insert(c); }
        }
        remaining_vertices.push(v, DSatInfo { dsat: adj_colors[v].len(), degree: graph.row(v).len() });
    }
    while let Some((current_vertex,_)) = remaining_vertices.pop() {
        let mut color:Color = 0;
        while adj_colors[current_vertex].contains(color) { color += 1; }
        colors[current_vertex] = Some(color);
        // update saturation degree information
        for u in graph.row(current_vertex).iter() {
            if colors[u].is_none() && adj_colors[u].insert(color) {
                remaining_vertices.change_priority_by(&u, |p| { p.dsat += 1; });
            }
        }
    }
    colors
}

/** finds a "large" clique greedily.
Chooses the candidate with the largest degree, adds it to the clique, and
keeps as candidates its neighbors only. Stops when no candidate remains.
*/
pub fn greedy_clique(graph:&Graph) -> Vec<VertexId> {
    let mut candidates:BitSet = graph.vertices().collect();
    let mut res = Vec::new();
    loop {
        let best = candidates.iter().max_by_key(|v| (graph.row(*v).len(), std::cmp::Reverse(*v)));
        let current_vertex = match best {
            None => break,
            Some(v) => v
        };
        res.push(current_vertex);
        candidates.intersect_with(graph.row(current_vertex));
        candidates.remove(current_vertex);
    }
    res
}
