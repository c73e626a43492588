use bit_set::BitSet;

use crate::graph::Graph;

/** Vertex Id */
pub type VertexId = usize;

/** Coloring of a graph: coloring[v] is the color assigned to vertex v. */
pub type Coloring = Vec<usize>;

/** Solution of a graph coloring problem
(represented as a partition).
*/
pub type Solution = Vec<Vec<VertexId>>;

/// number of colors used by a coloring (0 for an empty coloring)
pub fn nb_colors(colors:&[usize]) -> usize {
    colors.iter().max().map_or(0, |c| c+1)
}

/// converts a coloring into its partition form (res[c]: vertices colored with c)
pub fn to_partition(colors:&[usize]) -> Solution {
    let mut res = vec![vec![] ; nb_colors(colors)];
    for (v,c) in colors.iter().enumerate() {
        res[*c].push(v);
    }
    res
}

/** result of the checker */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// feasible coloring (number of colors)
    Ok(usize),
    /// the coloring does not assign exactly one color per vertex
    WrongLength {
        /// number of vertices in the graph
        expected: usize,
        /// length of the coloring
        got: usize,
    },
    /// two adjacent vertices share a color
    Conflict(VertexId, VertexId),
    /// a color smaller than the largest one is never used
    UnusedColor(usize),
}

/**
checks a coloring against a graph.
returns the number of colors if the coloring is proper and its colors are {0..k-1}.
*/
pub fn checker(inst:&Graph, colors:&[usize]) -> CheckerResult {
    if colors.len() != inst.nb_vertices() {
        return CheckerResult::WrongLength { expected: inst.nb_vertices(), got: colors.len() };
    }
    for (u,v) in inst.edges() {
        if colors[u] == colors[v] { return CheckerResult::Conflict(u, v); }
    }
    let mut used:BitSet = BitSet::default();
    for c in colors { used.insert(*c); }
    let k = nb_colors(colors);
    if let Some(c) = (0..k).find(|c| !used.contains(*c)) {
        return CheckerResult::UnusedColor(c);
    }
    CheckerResult::Ok(k)
}
