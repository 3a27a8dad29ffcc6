use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::color::{to_partition, Color, Solution};
use crate::error::ColoringError;
use crate::graph::Graph;
use crate::search::bounds::BoundFunction;
use crate::search::frontier::Frontier;
use crate::search::partial::PartialColoring;
use crate::search::stopping::{NeverStoppingCriterion, StoppingCriterion, TimeStoppingCriterion};

/// parameters of the branch & bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// frontier size over which the frontier is compacted
    pub frontier_capacity: usize,
    /// fraction of the capacity kept by a compaction (0.25 or 0.5 usually)
    pub compaction_keep_fraction: f64,
    /// time limit (in seconds)
    pub time_limit: Option<f64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { frontier_capacity: 1_000_000, compaction_keep_fraction: 0.25, time_limit: None }
    }
}

impl SolverOptions {
    /// options that never compact the frontier nor stop the search early
    pub fn unbounded() -> Self {
        Self { frontier_capacity: usize::MAX, compaction_keep_fraction: 0.25, time_limit: None }
    }

    /// checks the option values
    pub fn validate(&self) -> Result<(), ColoringError> {
        if self.frontier_capacity == 0 {
            return Err(ColoringError::InvalidOption("frontier_capacity must be positive".to_string()));
        }
        if !(self.compaction_keep_fraction > 0. && self.compaction_keep_fraction <= 1.) {
            return Err(ColoringError::InvalidOption(format!(
                "compaction_keep_fraction must be in (0,1] (got {})", self.compaction_keep_fraction
            )));
        }
        match self.time_limit {
            Some(t) if !(t >= 0.) => Err(ColoringError::InvalidOption(format!(
                "time_limit must be non-negative (got {})", t
            ))),
            _ => Ok(())
        }
    }
}

/// lifecycle of a solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolverState {
    /// built, not started
    Ready,
    /// main loop running
    Searching,
    /// the frontier became empty
    Exhausted,
    /// the best remaining bound can not improve the incumbent
    BoundedStop,
    /// the stopping criterion ended the search
    Interrupted,
}

/// conditions under which the returned coloring is not proven optimal
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SolveWarning {
    /// the frontier compaction dropped nodes
    #[error("frontier compaction dropped {dropped} nodes: the coloring is not certified optimal")]
    LossyTermination {
        /// number of dropped nodes
        dropped: u64,
    },
    /// the stopping criterion ended the search early
    #[error("time limit reached: the coloring is not certified optimal")]
    TimeLimitReached,
}

/// counters of a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// children pushed in the frontier
    pub nodes_expanded: u64,
    /// children pruned by the bound
    pub nodes_discarded: u64,
    /// improving complete colorings found
    pub solutions_found: u64,
    /// nodes taken from the frontier
    pub nodes_popped: u64,
    /// number of frontier compactions
    pub compactions: u64,
    /// nodes lost by compactions
    pub nodes_dropped: u64,
    /// largest frontier size observed
    pub max_frontier_size: usize,
    /// successive numbers of colors of the incumbent
    pub primal_list: Vec<usize>,
    /// search time (in seconds)
    pub time_searched: f64,
}

impl SearchStatistics {
    /// prints the statistics
    pub fn display_statistics(&self) {
        println!("\t{} \t nodes expanded", self.nodes_expanded);
        println!("\t{} \t nodes discarded", self.nodes_discarded);
        println!("\t{} \t nodes popped", self.nodes_popped);
        println!("\t{} \t solutions found", self.solutions_found);
        println!("\t{} \t compactions ({} nodes dropped)", self.compactions, self.nodes_dropped);
        println!("\t{} \t max frontier size", self.max_frontier_size);
        println!("\t{:.3} \t seconds", self.time_searched);
    }
}

/// result of a solve
#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    /// assignment[v]: color of v
    pub assignment: Vec<Color>,
    /// number of colors of the assignment
    pub best_cost: usize,
    /// final state of the solver
    pub state: SolverState,
    /// reasons why the result may not be optimal
    pub warnings: Vec<SolveWarning>,
    /// search statistics
    pub stats: SearchStatistics,
}

impl SolveResult {
    /// true if the search proved the optimality of the coloring
    pub fn is_certified_optimal(&self) -> bool { self.warnings.is_empty() }

    /// the coloring as a partition (res[c]: vertices colored with c)
    pub fn to_partition(&self) -> Solution {
        let assignment:Vec<Option<Color>> = self.assignment.iter().map(|c| Some(*c)).collect();
        to_partition(&assignment)
    }
}


/**
Best-first branch & bound for the graph coloring problem.
Vertices are colored in index order; the frontier holds partial colorings
ordered by optimistic bound. Children that can not improve the incumbent
are pruned.

The incumbent cost to beat (target) can be lowered by a pessimistic bound
before a coloring reaching it is known. While it is not reached, nodes with
an optimistic bound equal to the target are still explored.
Once a compaction drops nodes, the target falls back to the incumbent cost
and pessimistic bounds no longer lower it.
*/
#[derive(Debug)]
pub struct Solver<'a, O, P> {
    /// instance (never modified)
    graph: &'a Graph,
    /// lower bound function
    optimistic: O,
    /// upper bound function
    pessimistic: P,
    /// search parameters
    options: SolverOptions,
    /// open nodes
    frontier: Frontier,
    /// current state
    state: SolverState,
    /// id of the next created node
    next_id: u64,
    /// best coloring found so far
    incumbent: Vec<Color>,
    /// number of colors of the incumbent
    incumbent_cost: usize,
    /// cost to beat
    target: f64,
    /// true if the incumbent reaches the target
    witnessed: bool,
    /// true once a compaction dropped nodes
    lossy: bool,
    /// search statistics
    stats: SearchStatistics,
}

impl<'a, O, P> Solver<'a, O, P> where O: BoundFunction, P: BoundFunction {

    /// builds a solver. Fails on invalid options, directed graphs and self-loops
    pub fn new(graph:&'a Graph, optimistic:O, pessimistic:P, options:SolverOptions) -> Result<Self, ColoringError> {
        options.validate()?;
        if graph.directed() { return Err(ColoringError::DirectedGraph); }
        if let Some(v) = graph.self_loop() { return Err(ColoringError::SelfLoop(v)); }
        let n = graph.nb_vertices();
        let frontier = Frontier::new(options.frontier_capacity, options.compaction_keep_fraction);
        Ok(Self {
            graph,
            optimistic,
            pessimistic,
            options,
            frontier,
            state: SolverState::Ready,
            next_id: 0,
            incumbent: (0..n).collect(),
            incumbent_cost: n,
            target: n as f64,
            witnessed: true,
            lossy: false,
            stats: SearchStatistics::default(),
        })
    }

    /// current state
    pub fn state(&self) -> SolverState { self.state }

    /// search parameters
    pub fn options(&self) -> &SolverOptions { &self.options }

    fn new_id(&mut self) -> u64 {
        let res = self.next_id;
        self.next_id += 1;
        res
    }

    /// true if a node with this bound may improve the incumbent
    fn improves(&self, bound:f64) -> bool {
        if self.witnessed { bound < self.target } else { bound <= self.target }
    }

    /// computes the bounds of a node and checks optimistic <= pessimistic
    fn evaluate(&self, node:&mut PartialColoring) -> Result<(), ColoringError> {
        let optimistic = self.optimistic.bound(self.graph, node);
        let pessimistic = self.pessimistic.bound(self.graph, node);
        if optimistic > pessimistic {
            return Err(ColoringError::BoundContractViolation {
                sequence_id: node.sequence_id(), optimistic, pessimistic
            });
        }
        node.set_bounds(optimistic, pessimistic);
        Ok(())
    }

    /// lowers the target to an achievable number of colors
    fn tighten(&mut self, pessimistic:f64) {
        if !self.lossy && pessimistic < self.target {
            self.target = pessimistic;
            self.witnessed = false;
        }
    }

    /// records a complete coloring if it uses fewer colors than the incumbent
    fn handle_leaf(&mut self, node:PartialColoring) -> bool {
        if node.nb_colors() >= self.incumbent_cost { return false; }
        self.accept(node);
        true
    }

    /// makes a complete coloring the incumbent
    fn accept(&mut self, node:PartialColoring) {
        let cost = node.nb_colors();
        self.incumbent = node.into_assignment().into_iter().flatten().collect();
        self.incumbent_cost = cost;
        if cost as f64 <= self.target {
            self.target = cost as f64;
            self.witnessed = true;
        }
        self.stats.solutions_found += 1;
        if self.stats.primal_list.last() != Some(&cost) {
            self.stats.primal_list.push(cost);
        }
        info!(colors = cost, expanded = self.stats.nodes_expanded, "new best coloring");
    }

    /// stops pruning against a target no known coloring reaches
    fn fall_back_to_incumbent(&mut self) {
        self.lossy = true;
        if !self.witnessed {
            debug!(bound = self.target, colors = self.incumbent_cost, "target reset to the incumbent");
        }
        self.target = self.incumbent_cost as f64;
        self.witnessed = true;
    }

    /// pops a node and handles its children
    fn expand(&mut self) -> Result<(), ColoringError> {
        let node = match self.frontier.pop() {
            None => return Ok(()),
            Some(node) => node
        };
        self.stats.nodes_popped += 1;
        for c in node.candidate_colors(self.graph) {
            let id = self.new_id();
            let mut child = match node.child(self.graph, c, id) {
                None => continue,
                Some(child) => child
            };
            self.evaluate(&mut child)?;
            if !self.improves(child.optimistic_bound()) {
                self.stats.nodes_discarded += 1;
            } else if child.is_complete() {
                if !self.handle_leaf(child) { self.stats.nodes_discarded += 1; }
            } else {
                self.tighten(child.pessimistic_bound());
                self.frontier.push(child);
                self.stats.nodes_expanded += 1;
            }
        }
        self.stats.max_frontier_size = self.stats.max_frontier_size.max(self.frontier.len());
        Ok(())
    }

    /// runs the search until the frontier is exhausted, the bound proves the
    /// incumbent, or the stopping criterion is met
    pub fn run<S:StoppingCriterion>(mut self, stopping_criterion:S) -> Result<SolveResult, ColoringError> {
        let t_start = Instant::now();
        let n = self.graph.nb_vertices();
        self.stats.primal_list.push(self.incumbent_cost);
        self.state = SolverState::Searching;
        if n > 0 {
            let id = self.new_id();
            let mut root = PartialColoring::root(n, id);
            self.evaluate(&mut root)?;
            if root.is_complete() {
                self.accept(root);
            } else if self.improves(root.optimistic_bound()) {
                self.tighten(root.pessimistic_bound());
                self.frontier.push(root);
                self.stats.max_frontier_size = 1;
            }
        }
        let mut warnings = Vec::new();
        loop {
            match self.frontier.best_bound() {
                None => { self.state = SolverState::Exhausted; break; },
                Some(b) if !self.improves(b) => { self.state = SolverState::BoundedStop; break; },
                Some(_) => {}
            }
            if stopping_criterion.is_finished() {
                self.state = SolverState::Interrupted;
                warnings.push(SolveWarning::TimeLimitReached);
                warn!(colors = self.incumbent_cost, "stopping criterion met before the end of the search");
                break;
            }
            if self.frontier.over_capacity() {
                let before = self.frontier.len();
                let dropped = self.frontier.compact() as u64;
                self.stats.compactions += 1;
                self.stats.nodes_dropped += dropped;
                debug!(before, after = self.frontier.len(), dropped, "frontier compacted");
                if dropped > 0 { self.fall_back_to_incumbent(); }
            }
            self.expand()?;
        }
        if self.stats.nodes_dropped > 0 {
            warnings.push(SolveWarning::LossyTermination { dropped: self.stats.nodes_dropped });
            warn!(dropped = self.stats.nodes_dropped, "search lost nodes to compaction");
        }
        if !self.witnessed && self.state != SolverState::Interrupted {
            warn!(bound = self.target, colors = self.incumbent_cost, "no coloring reached a pessimistic bound");
        }
        self.stats.time_searched = t_start.elapsed().as_secs_f64();
        info!(state = ?self.state, colors = self.incumbent_cost, popped = self.stats.nodes_popped, "search finished");
        Ok(SolveResult {
            best_cost: self.incumbent_cost,
            assignment: self.incumbent,
            state: self.state,
            warnings,
            stats: self.stats,
        })
    }
}


/**
solves a graph coloring instance using the branch & bound.
uses options.time_limit (if any) as stopping criterion.
*/
pub fn solve<O, P>(graph:&Graph, optimistic:O, pessimistic:P, options:SolverOptions) -> Result<SolveResult, ColoringError>
where O: BoundFunction, P: BoundFunction {
    let time_limit = options.time_limit;
    let solver = Solver::new(graph, optimistic, pessimistic, options)?;
    match time_limit {
        None => solver.run(NeverStoppingCriterion),
        Some(t) => solver.run(TimeStoppingCriterion::new(t as f32)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::color::{checker, CheckerResult};
    use crate::generator::random_graph;
    use crate::search::bounds::{ColorsUsed, DsaturCompletion, GuessNeighbors, RemainingNodes, SaturationBound};

    /// true if g can be colored with k colors (backtracking)
    fn colorable(g:&Graph, colors:&mut Vec<usize>, k:usize) -> bool {
        let v = colors.len();
        if v == g.nb_vertices() { return true; }
        for c in 0..k {
            if (0..v).all(|u| colors[u] != c || !g.adjacent(u, v).unwrap()) {
                colors.push(c);
                if colorable(g, colors, k) { return true; }
                colors.pop();
            }
        }
        false
    }

    fn chromatic_number(g:&Graph) -> usize {
        (0..=g.nb_vertices()).find(|k| colorable(g, &mut Vec::new(), *k)).unwrap()
    }

    fn check_result(g:&Graph, res:&SolveResult) {
        let assignment:Vec<Option<usize>> = res.assignment.iter().map(|c| Some(*c)).collect();
        assert_eq!(checker(g, &assignment), CheckerResult::Ok(res.best_cost));
        // colors used are 0..best_cost
        let partition = res.to_partition();
        assert_eq!(partition.len(), res.best_cost);
        assert!(partition.iter().all(|class| !class.is_empty()));
        // incumbent never regresses
        assert!(res.stats.primal_list.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(res.stats.primal_list.last(), Some(&res.best_cost));
    }

    fn solve_exact(g:&Graph) -> SolveResult {
        let res = solve(g, ColorsUsed, RemainingNodes, SolverOptions::unbounded()).unwrap();
        check_result(g, &res);
        assert!(res.is_certified_optimal());
        res
    }

    fn solve_saturation(g:&Graph) -> SolveResult {
        let res = solve(g, SaturationBound::new(g), DsaturCompletion, SolverOptions::unbounded()).unwrap();
        check_result(g, &res);
        assert!(res.is_certified_optimal());
        res
    }

    #[test]
    fn test_triangle() {
        let g = Graph::from_edges(3, &[(0,1), (1,2), (0,2)], false).unwrap();
        for res in [solve_exact(&g), solve_saturation(&g)].iter() {
            assert_eq!(res.best_cost, 3);
            assert_eq!(res.assignment, vec![0,1,2]);
        }
    }

    #[test]
    fn test_path() {
        let g = Graph::from_edges(5, &[(0,1), (1,2), (2,3), (3,4)], false).unwrap();
        for res in [solve_exact(&g), solve_saturation(&g)].iter() {
            assert_eq!(res.best_cost, 2);
            assert_eq!(res.assignment, vec![0,1,0,1,0]);
        }
    }

    #[test]
    fn test_empty_graph() {
        let g = Graph::new(6, false);
        for res in [solve_exact(&g), solve_saturation(&g)].iter() {
            assert_eq!(res.best_cost, 1);
            assert_eq!(res.assignment, vec![0 ; 6]);
        }
    }

    #[test]
    fn test_bipartite() {
        let mut edges = Vec::new();
        for a in 0..4 {
            for b in 4..8 { edges.push((a,b)); }
        }
        let g = Graph::from_edges(8, &edges, false).unwrap();
        for res in [solve_exact(&g), solve_saturation(&g)].iter() {
            assert_eq!(res.best_cost, 2);
            assert_eq!(res.assignment, vec![0,0,0,0,1,1,1,1]);
        }
    }

    #[test]
    fn test_no_vertex_and_single_vertex() {
        let res = solve_exact(&Graph::new(0, false));
        assert_eq!(res.best_cost, 0);
        assert!(res.assignment.is_empty());
        assert_eq!(res.state, SolverState::Exhausted);
        let res = solve_exact(&Graph::new(1, false));
        assert_eq!(res.best_cost, 1);
        assert_eq!(res.assignment, vec![0]);
        assert_eq!(res.stats.solutions_found, 1);
        assert_eq!(res.stats.primal_list, vec![1]);
    }

    #[test]
    fn test_optimal_on_random_graphs() {
        for seed in 0..40 {
            let n = 3 + (seed as usize % 6);
            let density = 0.2 + 0.1 * (seed % 6) as f64;
            let g = random_graph(n, density, seed);
            let chi = chromatic_number(&g);
            assert_eq!(solve_exact(&g).best_cost, chi, "seed {}", seed);
            assert_eq!(solve_saturation(&g).best_cost, chi, "seed {}", seed);
        }
    }

    #[test]
    fn test_policies_agree() {
        for seed in 100..110 {
            let g = random_graph(8, 0.5, seed);
            let exact = solve_exact(&g);
            let saturation = solve_saturation(&g);
            assert_eq!(exact.best_cost, saturation.best_cost);
        }
    }

    #[test]
    fn test_capacity_one() {
        let g = Graph::new(4, false);
        let options = SolverOptions { frontier_capacity: 1, ..SolverOptions::default() };
        let res = solve(&g, ColorsUsed, RemainingNodes, options).unwrap();
        check_result(&g, &res);
        assert!(res.stats.compactions > 0);
        assert!(matches!(res.warnings[0], SolveWarning::LossyTermination { .. }));
        assert!(!res.is_certified_optimal());
        for seed in 0..10 {
            let g = random_graph(8, 0.4, seed);
            let options = SolverOptions { frontier_capacity: 1, ..SolverOptions::default() };
            let res = solve(&g, ColorsUsed, RemainingNodes, options).unwrap();
            check_result(&g, &res);
        }
    }

    #[test]
    fn test_capacity_one_dives_to_a_coloring() {
        for seed in 0..10 {
            let g = random_graph(30, 0.3, seed);
            let options = SolverOptions { frontier_capacity: 1, ..SolverOptions::default() };
            let res = solve(&g, SaturationBound::new(&g), DsaturCompletion, options).unwrap();
            check_result(&g, &res);
            assert!(res.best_cost < 30, "seed {}", seed);
            assert!(res.stats.solutions_found > 0, "seed {}", seed);
            assert!(!res.is_certified_optimal());
        }
    }

    #[test]
    fn test_keep_half() {
        let g = random_graph(8, 0.5, 3);
        let options = SolverOptions { frontier_capacity: 4, compaction_keep_fraction: 0.5, time_limit: None };
        let res = solve(&g, ColorsUsed, RemainingNodes, options).unwrap();
        check_result(&g, &res);
        assert!(res.best_cost >= chromatic_number(&g));
    }

    #[test]
    fn test_time_limit() {
        let g = random_graph(8, 0.5, 1);
        let options = SolverOptions { time_limit: Some(0.), ..SolverOptions::default() };
        let res = solve(&g, ColorsUsed, RemainingNodes, options).unwrap();
        check_result(&g, &res);
        assert_eq!(res.state, SolverState::Interrupted);
        assert_eq!(res.warnings, vec![SolveWarning::TimeLimitReached]);
    }

    #[test]
    fn test_deterministic() {
        let g = random_graph(8, 0.4, 11);
        let a = solve_exact(&g);
        let b = solve_exact(&g);
        assert_eq!(a.assignment, b.assignment);
        assert_eq!(a.stats.nodes_expanded, b.stats.nodes_expanded);
        assert_eq!(a.stats.nodes_discarded, b.stats.nodes_discarded);
        assert_eq!(a.stats.primal_list, b.stats.primal_list);
    }

    #[test]
    fn test_fractional_bounds() {
        let g = Graph::from_edges(5, &[(0,1), (1,2), (2,3), (3,4), (4,0)], false).unwrap();
        let optimistic = |_:&Graph, n:&PartialColoring| n.nb_colors() as f64 - 0.5;
        let res = solve(&g, optimistic, RemainingNodes, SolverOptions::unbounded()).unwrap();
        check_result(&g, &res);
        assert_eq!(res.best_cost, 3);
    }

    #[test]
    fn test_guess_neighbors_valid() {
        for seed in 0..10 {
            let g = random_graph(8, 0.5, seed);
            let res = solve(&g, GuessNeighbors, RemainingNodes, SolverOptions::default()).unwrap();
            check_result(&g, &res);
        }
    }

    #[test]
    fn test_bound_contract_violation() {
        let g = Graph::from_edges(3, &[(0,1)], false).unwrap();
        let optimistic = |_:&Graph, _:&PartialColoring| 10.;
        let res = solve(&g, optimistic, RemainingNodes, SolverOptions::default());
        assert!(matches!(res, Err(ColoringError::BoundContractViolation { sequence_id: 0, .. })));
    }

    #[test]
    fn test_bound_contract_violation_on_child() {
        let g = Graph::from_edges(3, &[(0,1)], false).unwrap();
        let optimistic = |_:&Graph, n:&PartialColoring| if n.depth() >= 1 { 10. } else { 0. };
        let res = solve(&g, optimistic, RemainingNodes, SolverOptions::default());
        assert!(matches!(
            res,
            Err(ColoringError::BoundContractViolation { sequence_id: 1, pessimistic, .. }) if pessimistic == 3.
        ));
    }

    #[test]
    fn test_rejected_inputs() {
        let directed = Graph::from_edges(2, &[(0,1)], true).unwrap();
        assert!(matches!(
            solve(&directed, ColorsUsed, RemainingNodes, SolverOptions::default()),
            Err(ColoringError::DirectedGraph)
        ));
        let looped = Graph::from_edges(2, &[(1,1)], false).unwrap();
        assert!(matches!(
            solve(&looped, ColorsUsed, RemainingNodes, SolverOptions::default()),
            Err(ColoringError::SelfLoop(1))
        ));
        let g = Graph::new(2, false);
        let bad_capacity = SolverOptions { frontier_capacity: 0, ..SolverOptions::default() };
        assert!(Solver::new(&g, ColorsUsed, RemainingNodes, bad_capacity).is_err());
        let bad_fraction = SolverOptions { compaction_keep_fraction: 1.5, ..SolverOptions::default() };
        assert!(matches!(bad_fraction.validate(), Err(ColoringError::InvalidOption(_))));
    }

    #[test]
    fn test_options_from_json() {
        let options:SolverOptions = serde_json::from_str(r#"{"frontier_capacity": 10}"#).unwrap();
        assert_eq!(options.frontier_capacity, 10);
        assert_eq!(options.compaction_keep_fraction, 0.25);
        assert_eq!(options.time_limit, None);
        let one = Graph::new(1, false);
        let solver = Solver::new(&one, ColorsUsed, RemainingNodes, options).unwrap();
        assert_eq!(solver.state(), SolverState::Ready);
        assert_eq!(solver.options().frontier_capacity, 10);
    }
}
