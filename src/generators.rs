/*
Synthetic graph families. Most of them have a known chromatic number:
 - complete(n): n
 - cycle(n): 2 if n is even, 3 otherwise (n >= 3)
 - star(k): 2 (k >= 1)
 - grid(r,c): 2 (as soon as it has an edge)
 - random_bipartite: at most 2
*/
use rand::Rng;

use crate::graph::Graph;

/// complete graph K_n
pub fn complete(n:usize) -> Graph {
    let mut res = Graph::new(n);
    for u in 0..n {
        for v in u+1..n {
            res.link(u, v);
        }
    }
    res
}

/// cycle 0-1-...-(n-1)-0
pub fn cycle(n:usize) -> Graph {
    let mut res = Graph::new(n);
    for u in 0..n {
        res.link(u, (u+1) % n);
    }
    res
}

/// star: vertex 0 adjacent to the vertices 1..=leaves
pub fn star(leaves:usize) -> Graph {
    let mut res = Graph::new(leaves+1);
    for v in 1..=leaves {
        res.link(0, v);
    }
    res
}

/// rows x cols lattice (vertex r*cols+c)
pub fn grid(rows:usize, cols:usize) -> Graph {
    let mut res = Graph::new(rows*cols);
    for r in 0..rows {
        for c in 0..cols {
            let v = r*cols+c;
            if c+1 < cols { res.link(v, v+1); }
            if r+1 < rows { res.link(v, v+cols); }
        }
    }
    res
}

/// p restricted to [0,1] (NaN counts as 0)
fn edge_probability(p:f64) -> f64 {
    if p.is_nan() { 0. } else { p.clamp(0., 1.) }
}

/// G(n,p): each pair of vertices is adjacent with probability p (clamped into [0,1])
pub fn erdos_renyi<R:Rng + ?Sized>(n:usize, p:f64, rng:&mut R) -> Graph {
    let p = edge_probability(p);
    let mut res = Graph::new(n);
    for u in 0..n {
        for v in u+1..n {
            if rng.gen_bool(p) { res.link(u, v); }
        }
    }
    res
}

/// bipartite graph between 0..a and a..a+b, each crossing pair adjacent with probability p
/// (clamped into [0,1])
pub fn random_bipartite<R:Rng + ?Sized>(a:usize, b:usize, p:f64, rng:&mut R) -> Graph {
    let p = edge_probability(p);
    let mut res = Graph::new(a+b);
    for u in 0..a {
        for v in a..a+b {
            if rng.gen_bool(p) { res.link(u, v); }
        }
    }
    res
}
