use std::cmp::Ordering;

use priority_queue::PriorityQueue;
use bit_set::BitSet;
use log::{debug, trace};

use crate::color::{Coloring, VertexId, nb_colors};
use crate::graph::Graph;

/// vertex priority: saturation degree, then degree, then smallest vertex id
#[derive(Debug, PartialEq, Eq)]
struct DSatInfo {
    dsat: usize,
    degree: usize,
    v: VertexId,
}

impl Ord for DSatInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dsat.cmp(&other.dsat)
            .then_with(|| self.degree.cmp(&other.degree))
            .then_with(|| other.v.cmp(&self.v))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for DSatInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/** implements a greedy DSATUR algorithm.
    1. choose an uncolored vertex that sees the most colors (break ties by the largest degree,
       then by the smallest index)
    2. assign it the first color not used by its neighbors
    3. mark all its uncolored neighbors as seeing this color
    4. repeat until every vertex is colored

The result is a proper coloring using the colors {0..k-1}. It is deterministic: calling it
twice on the same graph returns the same coloring.
*/
pub fn greedy_dsatur(inst:&Graph) -> Coloring {
    let n:usize = inst.nb_vertices();
    let mut remaining_vertices:PriorityQueue<VertexId, DSatInfo> = PriorityQueue::with_capacity(n);
    for v in inst.vertices() {
        remaining_vertices.push(v, DSatInfo { dsat:0, degree:inst.degree(v), v });
    }
    let mut colors:Vec<Option<usize>> = vec![None ; n]; // colors[v] -> color assigned to vertex v
    let mut adj_colors:Vec<BitSet> = vec![BitSet::default() ; n]; // adj_colors[v] -> colors v sees
    let mut nb_colored:usize = 0;
    while let Some((current_vertex, _)) = remaining_vertices.pop() {
        if nb_colored % 1000 == 0 { trace!("colored {} / {}...", nb_colored, n); }
        // assign it the first available color
        let mut color:usize = 0;
        while adj_colors[current_vertex].contains(color) { color += 1; }
        colors[current_vertex] = Some(color);
        nb_colored += 1;
        // update saturation degree information
        for conflict_vertex in inst.neighbors(current_vertex).iter()
        .filter(|conflict_vertex| colors[**conflict_vertex].is_none()) {
            if adj_colors[*conflict_vertex].insert(color) {
                remaining_vertices.change_priority_by(conflict_vertex, |p| { p.dsat += 1; });
            }
        }
    }
    // every vertex has been popped exactly once
    let res:Coloring = colors.into_iter().map(|c| c.unwrap_or_default()).collect();
    debug!("DSATUR: {} colors for {} vertices", nb_colors(&res), n);
    res
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::color::{checker, CheckerResult};
    use crate::generators;

    fn color_count(inst:&Graph) -> usize {
        let colors = greedy_dsatur(inst);
        match checker(inst, &colors) {
            CheckerResult::Ok(k) => k,
            res => panic!("invalid coloring (reason: {:?})", res),
        }
    }

    #[test]
    fn test_triangle() {
        assert_eq!(color_count(&generators::complete(3)), 3);
    }

    #[test]
    fn test_empty_graph() {
        let inst = Graph::new(0);
        assert!(greedy_dsatur(&inst).is_empty());
    }

    #[test]
    fn test_edgeless_graph() {
        let inst = Graph::new(7);
        assert_eq!(greedy_dsatur(&inst), vec![0 ; 7]);
    }

    #[test]
    fn test_odd_cycle() {
        assert_eq!(color_count(&generators::cycle(5)), 3);
    }

    #[test]
    fn test_star() {
        let inst = generators::star(5);
        assert_eq!(greedy_dsatur(&inst), vec![0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_tie_break_smallest_index() {
        // path 0-1-2-3: vertices 1 and 2 share the largest degree, 1 goes first
        let inst = Graph::from_edges(4, &[(0,1), (1,2), (2,3)]).unwrap();
        assert_eq!(greedy_dsatur(&inst), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_deterministic() {
        let inst = generators::grid(4, 5);
        assert_eq!(greedy_dsatur(&inst), greedy_dsatur(&inst));
    }

    #[test]
    fn test_bipartite_grid() {
        // DSATUR is exact on bipartite graphs
        assert_eq!(color_count(&generators::grid(6, 7)), 2);
    }
}
