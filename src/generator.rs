use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::graph::Graph;

/**
generates an undirected random graph (Erdős–Rényi G(n,p)).
Each pair of distinct vertices is linked with probability density (clamped
to [0,1]). No self-loop is created. The graph is not guaranteed to be
connected (see Graph::is_connected). The same seed gives the same graph.
*/
pub fn random_graph(n:usize, density:f64, seed:u64) -> Graph {
    let p = if density.is_nan() { 0. } else { density.max(0.).min(1.) };
    let mut rng = StdRng::seed_from_u64(seed);
    let mut res = Graph::new(n, false);
    for i in 0..n {
        for j in i+1..n {
            if rng.gen_bool(p) {
                res.link(i, j);
            }
        }
    }
    res
}
