use bit_set::BitSet;
use log::{debug, info};
use serde::Serialize;

use dogs::search_algorithm::{StoppingCriterion, TimeStoppingCriterion};

use crate::color::{Coloring, VertexId, nb_colors};
use crate::graph::{Graph, Permutation};
use crate::search::greedy_dsatur::greedy_dsatur;

/// number of expanded nodes between two evaluations of the stopping criterion
pub const DEFAULT_CHECK_INTERVAL:usize = 1000;

/** represents a decision (assigning color c to vertex v) */
#[derive(Debug, Clone)]
struct Decision {
    v: VertexId,
    c: usize,
}

/// either a decision, either a commit
#[derive(Debug)]
enum BacktrackEvent {
    Commit(Decision), // decision to commit
    Restore(Decision) // decision taken
}

/** result of an exact search */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// best coloring found (original vertex names)
    pub colors: Coloring,
    /// number of colors of the best coloring
    pub nb_colors: usize,
    /// true if the search space was exhausted (the coloring is optimal)
    pub optimal: bool,
    /// number of expanded nodes
    pub nb_nodes: usize,
}

/**
Branch and bound over a fixed vertex order. Vertices are colored in the order 0..n-1.
Each vertex first tries every open color not used by its neighbors, then opens a new color
if that can still improve on the best known coloring.
*/
#[derive(Debug)]
pub struct BranchAndBound<'a, Stop> {
    /// instance (vertices are colored following their index)
    inst: &'a Graph,
    /// stopping criterion, evaluated every check_interval nodes
    stopping_criterion: Stop,
    /// number of expanded nodes between two stopping criterion evaluations
    check_interval: usize,
    /// colors[i]: color assigned to vertex i
    colors: Vec<Option<usize>>,
    /// number of colors in the search state
    nb_colors: usize,
    /// color_nb_vertices[c]: number of vertices using color c
    color_nb_vertices: Vec<usize>,
    /// number of colored vertices
    nb_vertices_colored: usize,
    /// decision history
    decisions: Vec<BacktrackEvent>,
    /// number of colors of the best known coloring
    upper_bound: usize,
    /// best so far coloring
    best_so_far_coloring: Coloring,
    /// number of expanded nodes
    nb_nodes: usize,
}

impl<'a, Stop:StoppingCriterion> BranchAndBound<'a, Stop> {
    /** creates a new search, seeded by a proper coloring of inst */
    pub fn new(inst:&'a Graph, initial_solution:Coloring, stopping_criterion:Stop) -> Self {
        let n = inst.nb_vertices();
        let upper_bound = nb_colors(&initial_solution);
        Self {
            inst,
            stopping_criterion,
            check_interval: DEFAULT_CHECK_INTERVAL,
            colors: vec![None ; n],
            nb_colors: 0,
            color_nb_vertices: vec![0 ; upper_bound],
            nb_vertices_colored: 0,
            decisions: Vec::with_capacity(n),
            upper_bound,
            best_so_far_coloring: initial_solution,
            nb_nodes: 0,
        }
    }

    /// sets how many nodes are expanded between two stopping criterion evaluations
    pub fn with_check_interval(mut self, check_interval:usize) -> Self {
        self.check_interval = check_interval.max(1);
        self
    }

    /// pushes the decisions available for the next uncolored vertex
    fn push_next_decisions(&mut self) {
        let v = self.nb_vertices_colored;
        let mut neighbor_colors:BitSet = BitSet::default();
        for u in self.inst.neighbors(v) {
            if let Some(c) = self.colors[*u] { neighbor_colors.insert(c); }
        }
        // reuse an open color first, then open a new one if it may improve the bound
        let mut candidate_colors:Vec<usize> = (0..self.nb_colors)
            .filter(|c| !neighbor_colors.contains(*c)).collect();
        if self.nb_colors + 1 < self.upper_bound {
            candidate_colors.push(self.nb_colors);
        }
        for c in candidate_colors.into_iter().rev() {
            let decision = Decision { v, c };
            self.decisions.push(BacktrackEvent::Restore(decision.clone())); // prepare to backtrack
            self.decisions.push(BacktrackEvent::Commit(decision)); // decision to apply
        }
    }

    /// applies a decision to the search state
    fn commit(&mut self, decision:&Decision) {
        debug_assert!(self.colors[decision.v].is_none());
        self.colors[decision.v] = Some(decision.c);
        self.color_nb_vertices[decision.c] += 1;
        if decision.c == self.nb_colors {
            self.nb_colors += 1;
        }
        self.nb_vertices_colored += 1;
    }

    /// restores the search state from a decision
    fn restore(&mut self, decision:&Decision) {
        debug_assert!(self.colors[decision.v].is_some());
        self.colors[decision.v] = None;
        self.color_nb_vertices[decision.c] -= 1;
        // c should be the last color if nobody uses it anymore
        if self.color_nb_vertices[decision.c] == 0 {
            debug_assert_eq!(decision.c, self.nb_colors-1);
            self.nb_colors -= 1;
        }
        self.nb_vertices_colored -= 1;
    }

    /// records the current (complete) coloring as the best so far
    fn record_solution(&mut self) {
        info!("feasible: {} colors", self.nb_colors);
        self.upper_bound = self.nb_colors;
        self.best_so_far_coloring = self.colors.iter()
            .map(|c| c.unwrap_or_default())
            .collect();
    }

    /**
    depth first search. Keeps improving the best coloring until the tree is exhausted or the
    stopping criterion is met. Returns the best coloring found (the initial one if none is
    better) and whether it is proven optimal.
    */
    pub fn run(mut self) -> SearchOutcome {
        let n = self.inst.nb_vertices();
        let mut exhausted = true;
        if n > 0 && self.upper_bound > 1 {
            self.push_next_decisions();
        }
        while let Some(event) = self.decisions.pop() {
            match event {
                BacktrackEvent::Restore(decision) => { // restore the state
                    self.restore(&decision);
                },
                BacktrackEvent::Commit(decision) => { // apply the decision and generate children
                    self.nb_nodes += 1;
                    if self.nb_nodes % self.check_interval == 0
                    && self.stopping_criterion.is_finished() {
                        exhausted = false;
                        break;
                    }
                    self.commit(&decision);
                    if self.nb_colors < self.upper_bound { // check bound
                        if self.nb_vertices_colored == n {
                            self.record_solution();
                        } else {
                            self.push_next_decisions();
                        }
                    }
                }
            }
        }
        debug!(
            "branch and bound: {} colors, {} nodes, optimal: {}",
            self.upper_bound, self.nb_nodes, exhausted
        );
        SearchOutcome {
            colors: self.best_so_far_coloring,
            nb_colors: self.upper_bound,
            optimal: exhausted,
            nb_nodes: self.nb_nodes,
        }
    }
}

/**
exact anytime coloring.
 1. colors the graph with DSATUR (upper bound)
 2. relabels the vertices by non-increasing degree
 3. runs the branch and bound from the DSATUR coloring until the stopping criterion
    (built by make_stopping_criterion once the preprocessing is done) is met
 4. maps the best coloring back to the original vertex names
*/
pub fn exact_search<Stop, F>(inst:&Graph, make_stopping_criterion:F, check_interval:usize) -> SearchOutcome
where
    Stop: StoppingCriterion,
    F: FnOnce() -> Stop,
{
    let n = inst.nb_vertices();
    let initial_solution = greedy_dsatur(inst);
    let upper_bound = nb_colors(&initial_solution);
    if upper_bound <= 1 { // no edges: every vertex gets color 0
        return SearchOutcome { colors: vec![0 ; n], nb_colors: upper_bound, optimal: true, nb_nodes: 0 };
    }
    let perm = Permutation::by_decreasing_degree(inst);
    let sorted_inst = inst.relabel(&perm);
    let space = BranchAndBound::new(&sorted_inst, perm.to_new(&initial_solution), make_stopping_criterion())
        .with_check_interval(check_interval);
    let mut res = space.run();
    res.colors = perm.to_old(&res.colors);
    res
}

/**
exact coloring with a time limit (in seconds) for the search phase.
returns an optimal coloring if the search completes in time, the best found otherwise.
*/
pub fn exact_color(inst:&Graph, timeout:f32) -> Coloring {
    exact_search(inst, || TimeStoppingCriterion::new(timeout), DEFAULT_CHECK_INTERVAL).colors
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use dogs::search_algorithm::NeverStoppingCriterion;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::color::{checker, CheckerResult};
    use crate::generators;

    /// never stops, counts how many times it is evaluated
    #[derive(Debug, Clone, Default)]
    struct CountingStoppingCriterion {
        nb_calls: Rc<Cell<usize>>,
    }

    impl StoppingCriterion for CountingStoppingCriterion {
        fn is_finished(&self) -> bool {
            self.nb_calls.set(self.nb_calls.get() + 1);
            false
        }
    }

    fn chromatic(inst:&Graph) -> usize {
        let res = exact_search(inst, NeverStoppingCriterion::default, DEFAULT_CHECK_INTERVAL);
        assert!(res.optimal);
        assert_eq!(checker(inst, &res.colors), CheckerResult::Ok(res.nb_colors));
        res.nb_colors
    }

    /// Mycielskian of the 5-cycle (11 vertices, triangle free, chromatic number 4)
    fn grotzsch() -> Graph {
        let mut inst = Graph::new(11);
        for i in 0..5 {
            let next = (i+1) % 5;
            let prev = (i+4) % 5;
            inst.add_edge(i, next).unwrap();
            inst.add_edge(5+i, next).unwrap();
            inst.add_edge(5+i, prev).unwrap();
            inst.add_edge(5+i, 10).unwrap();
        }
        inst
    }

    #[test]
    fn test_triangle() {
        assert_eq!(chromatic(&generators::complete(3)), 3);
    }

    #[test]
    fn test_odd_cycle() {
        assert_eq!(chromatic(&generators::cycle(5)), 3);
    }

    #[test]
    fn test_even_cycle() {
        assert_eq!(chromatic(&generators::cycle(4)), 2);
    }

    #[test]
    fn test_star() {
        assert_eq!(chromatic(&generators::star(5)), 2);
    }

    #[test]
    fn test_empty_graph() {
        assert!(exact_color(&Graph::new(0), 1.).is_empty());
    }

    #[test]
    fn test_edgeless_graph() {
        assert_eq!(exact_color(&Graph::new(7), 1.), vec![0 ; 7]);
    }

    #[test]
    fn test_complete() {
        assert_eq!(chromatic(&generators::complete(6)), 6);
    }

    #[test]
    fn test_grotzsch() {
        assert_eq!(chromatic(&grotzsch()), 4);
    }

    #[test]
    fn test_crown_graph() {
        // K4,4 minus a perfect matching
        let mut inst = Graph::new(8);
        for i in 0..4 {
            for j in 0..4 {
                if i != j { inst.add_edge(i, 4+j).unwrap(); }
            }
        }
        assert_eq!(chromatic(&inst), 2);
    }

    #[test]
    fn test_never_worse_than_dsatur() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let inst = generators::erdos_renyi(14, 0.5, &mut rng);
            let seed = nb_colors(&greedy_dsatur(&inst));
            assert!(chromatic(&inst) <= seed);
        }
    }

    #[test]
    fn test_search_keeps_seed_when_optimal() {
        // the seed is already optimal: the search proves it without finding a better leaf
        let inst = generators::complete(4);
        let perm = Permutation::by_decreasing_degree(&inst);
        let seed = perm.to_new(&greedy_dsatur(&inst));
        let res = BranchAndBound::new(&inst, seed.clone(), NeverStoppingCriterion::default()).run();
        assert!(res.optimal);
        assert_eq!(res.colors, seed);
        assert_eq!(res.nb_colors, 4);
    }

    #[test]
    fn test_timeout_returns_valid_coloring() {
        let inst = grotzsch();
        let seed = nb_colors(&greedy_dsatur(&inst));
        let res = exact_search(&inst, || TimeStoppingCriterion::new(0.), 1);
        assert_eq!(checker(&inst, &res.colors), CheckerResult::Ok(res.nb_colors));
        assert!(res.nb_colors <= seed);
        // evaluated at the first node, which stops the search
        assert!(!res.optimal);
        assert_eq!(res.nb_nodes, 1);
    }

    #[test]
    fn test_stopping_criterion_evaluated_every_interval() {
        let inst = grotzsch();
        for check_interval in &[1, 3, 7] {
            let stop = CountingStoppingCriterion::default();
            let res = exact_search(&inst, || stop.clone(), *check_interval);
            assert!(res.optimal);
            assert!(res.nb_nodes > *check_interval);
            assert_eq!(stop.nb_calls.get(), res.nb_nodes / check_interval);
        }
    }

    #[test]
    fn test_zero_timeout_stops_after_first_interval() {
        let inst = generators::erdos_renyi(90, 0.5, &mut StdRng::seed_from_u64(1));
        let seed = nb_colors(&greedy_dsatur(&inst));
        let res = exact_search(&inst, || TimeStoppingCriterion::new(0.), DEFAULT_CHECK_INTERVAL);
        assert!(!res.optimal);
        assert_eq!(res.nb_nodes, DEFAULT_CHECK_INTERVAL);
        assert_eq!(checker(&inst, &res.colors), CheckerResult::Ok(res.nb_colors));
        assert!(res.nb_colors <= seed);
    }

    #[test]
    fn test_exact_color_generous_timeout() {
        let inst = generators::grid(3, 4);
        let colors = exact_color(&inst, 60.);
        assert_eq!(checker(&inst, &colors), CheckerResult::Ok(2));
    }
}
