use bit_set::BitSet;
use log::info;
use thiserror::Error;

use crate::color::VertexId;

/// errors raised while building a graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// an edge endpoint is not in 0..n
    #[error("vertex {vertex} is out of range (graph has {n} vertices)")]
    VertexOutOfRange {
        /// offending vertex
        vertex: VertexId,
        /// number of vertices of the graph
        n: usize,
    },
}

/** models an undirected simple graph over the vertices 0..n-1 (conflict graph) */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    /// nb edges
    m: usize,
    /// adj_list[i]: list of vertices adjacent to i (insertion order)
    adj_list: Vec<Vec<VertexId>>,
    /// adj_matrix[i] represents a bitset of its neighbors
    adj_matrix: Vec<BitSet>,
}

impl Graph {

    /** creates a graph with n isolated vertices */
    pub fn new(n:usize) -> Self {
        Self {
            m: 0,
            adj_list: vec![Vec::new() ; n],
            adj_matrix: vec![BitSet::default() ; n],
        }
    }

    /** creates a graph from an edge list */
    pub fn from_edges(n:usize, edges:&[(VertexId,VertexId)]) -> Result<Self, GraphError> {
        let mut res = Self::new(n);
        for (u,v) in edges {
            res.add_edge(*u, *v)?;
        }
        Ok(res)
    }

    /**
    adds the edge {u,v}. Returns true if the edge was not already in the graph.
    self loops are ignored. Fails (without modifying the graph) if u or v is out of range.
    */
    pub fn add_edge(&mut self, u:VertexId, v:VertexId) -> Result<bool, GraphError> {
        let n = self.nb_vertices();
        for vertex in [u, v] {
            if vertex >= n { return Err(GraphError::VertexOutOfRange { vertex, n }); }
        }
        Ok(self.link(u, v))
    }

    /// inserts {u,v} if missing (u and v are assumed in range)
    pub(crate) fn link(&mut self, u:VertexId, v:VertexId) -> bool {
        if u == v || self.adj_matrix[u].contains(v) { return false; }
        self.adj_matrix[u].insert(v);
        self.adj_matrix[v].insert(u);
        self.adj_list[u].push(v);
        self.adj_list[v].push(u);
        self.m += 1;
        true
    }

    /// number of vertices
    pub fn nb_vertices(&self) -> usize { self.adj_list.len() }

    /// number of edges
    pub fn nb_edges(&self) -> usize { self.m }

    /// iterator over the vertices
    pub fn vertices(&self) -> std::ops::Range<VertexId> { 0..self.nb_vertices() }

    /// list of vertices adjacent to u
    pub fn neighbors(&self, u:VertexId) -> &[VertexId] { &self.adj_list[u] }

    /// number of neighbors of u
    pub fn degree(&self, u:VertexId) -> usize { self.adj_list[u].len() }

    /// returns if u and v are adjacent (O(1))
    pub fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool { self.adj_matrix[u].contains(v) }

    /// edge list (each edge appears once as (u,v) with u < v)
    pub fn edges(&self) -> Vec<(VertexId,VertexId)> {
        let mut res = Vec::with_capacity(self.m);
        for (i,l) in self.adj_list.iter().enumerate() {
            for j in l {
                if i < *j {
                    res.push((i,*j));
                }
            }
        }
        res
    }

    /// builds the isomorphic graph where each vertex v is renamed perm.new_id(v)
    pub fn relabel(&self, perm:&Permutation) -> Self {
        let mut res = Self::new(self.nb_vertices());
        for new_v in res.vertices() {
            let old_v = perm.old_id(new_v);
            for old_u in self.neighbors(old_v) {
                let new_u = perm.new_id(*old_u);
                if new_v < new_u { res.link(new_v, new_u); }
            }
        }
        res
    }

    /// print statistics of the instance
    pub fn display_statistics(&self) {
        info!("\t{} \t vertices", self.nb_vertices());
        info!("\t{} \t edges", self.nb_edges());
        let degrees = self.vertices().map(|i| self.degree(i));
        if let (Some(min), Some(max)) = (degrees.clone().min(), degrees.max()) {
            info!("\t{} \t min degree", min);
            info!("\t{} \t max degree", max);
        }
    }
}

/** bijection between the vertices of a graph and the vertices of its relabeled copy */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    /// old_to_new[v]: new name of the original vertex v
    old_to_new: Vec<VertexId>,
    /// new_to_old[v]: original name of the new vertex v
    new_to_old: Vec<VertexId>,
}

impl Permutation {
    /**
    builds a permutation from the order in which the original vertices should be visited
    (order[i] becomes vertex i). order must contain every vertex exactly once.
    */
    pub fn from_order(order:Vec<VertexId>) -> Self {
        let mut old_to_new = vec![0 ; order.len()];
        for (new_v,old_v) in order.iter().enumerate() {
            old_to_new[*old_v] = new_v;
        }
        Self { old_to_new, new_to_old: order }
    }

    /// orders the vertices by non-increasing degree (ties keep the original order)
    pub fn by_decreasing_degree(inst:&Graph) -> Self {
        let mut order:Vec<VertexId> = inst.vertices().collect();
        order.sort_by(|a,b| inst.degree(*b).cmp(&inst.degree(*a)));
        Self::from_order(order)
    }

    /// new name of an original vertex
    pub fn new_id(&self, old_v:VertexId) -> VertexId { self.old_to_new[old_v] }

    /// original name of a relabeled vertex
    pub fn old_id(&self, new_v:VertexId) -> VertexId { self.new_to_old[new_v] }

    /// expresses a coloring of the original graph in the relabeled vertex names
    pub fn to_new(&self, colors:&[usize]) -> Vec<usize> {
        self.new_to_old.iter().map(|old_v| colors[*old_v]).collect()
    }

    /// expresses a coloring of the relabeled graph in the original vertex names
    pub fn to_old(&self, colors:&[usize]) -> Vec<usize> {
        self.old_to_new.iter().map(|new_v| colors[*new_v]).collect()
    }
}
