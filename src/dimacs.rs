use std::fs;
use std::path::Path;

use log::{debug, warn};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::{pair, preceded, separated_pair, terminated, tuple};
use thiserror::Error;

use crate::color::Solution;
use crate::graph::Graph;

/// errors raised while reading a DIMACS file
#[derive(Debug, Error)]
pub enum DimacsError {
    /// the file could not be read
    #[error("unable to read the instance: {0}")]
    Io(#[from] std::io::Error),
    /// a line is neither a comment, a problem line nor an edge
    #[error("line {line}: unable to parse {content:?}")]
    Syntax {
        /// line number (starting at 1)
        line: usize,
        /// content of the line
        content: String,
    },
    /// an edge is declared before the problem line
    #[error("line {line}: edge before the problem line")]
    EdgeBeforeHeader {
        /// line number (starting at 1)
        line: usize,
    },
    /// two problem lines
    #[error("line {line}: duplicate problem line")]
    DuplicateHeader {
        /// line number (starting at 1)
        line: usize,
    },
    /// the problem line declares no vertex
    #[error("invalid vertex count in the problem line")]
    InvalidVertexCount,
    /// an edge endpoint is not in 1..=n
    #[error("line {line}: vertex {vertex} out of range (1..={n})")]
    VertexOutOfRange {
        /// line number (starting at 1)
        line: usize,
        /// offending vertex (1-based, as in the file)
        vertex: usize,
        /// number of vertices
        n: usize,
    },
    /// no problem line
    #[error("missing problem line")]
    MissingHeader,
}

/// reads an unsigned integer
fn integer(s:&str) -> IResult<&str, usize> {
    map_res(digit1, |d:&str| d.parse::<usize>())(s)
}

/// reads two integers separated by spaces
fn two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    terminated(separated_pair(integer, space1, integer), space0)(s)
}

/// reads header containing (n,m)
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(
        tuple((tag("p"), space1, alt((tag("edges"), tag("edge"), tag("col"))), space1)),
        two_integers
    )(s)
}

/// reads edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(pair(tag("e"), space1), two_integers)(s)
}

/**
reads a DIMACS graph.
comments (c, % or #) and blank lines are skipped, self loops and duplicate edges are ignored.
*/
pub fn read_from_str(s:&str) -> Result<Graph, DimacsError> {
    let mut res:Option<Graph> = None;
    let mut declared_nb_edges = 0;
    for (i,raw_line) in s.lines().enumerate() {
        let line = raw_line.trim();
        let line_nb = i+1;
        let syntax_error = || DimacsError::Syntax { line: line_nb, content: line.to_string() };
        match line.chars().next() {
            None | Some('c') | Some('%') | Some('#') => {},
            Some('p') => {
                if res.is_some() { return Err(DimacsError::DuplicateHeader { line: line_nb }); }
                let (_,(n,m)) = all_consuming(read_header)(line).map_err(|_| syntax_error())?;
                if n == 0 { return Err(DimacsError::InvalidVertexCount); }
                declared_nb_edges = m;
                res = Some(Graph::new(n));
            },
            Some('e') => {
                let (_,(a,b)) = all_consuming(read_edge)(line).map_err(|_| syntax_error())?;
                let graph = res.as_mut().ok_or(DimacsError::EdgeBeforeHeader { line: line_nb })?;
                let n = graph.nb_vertices();
                for vertex in [a, b] {
                    if vertex == 0 || vertex > n {
                        return Err(DimacsError::VertexOutOfRange { line: line_nb, vertex, n });
                    }
                }
                graph.link(a-1, b-1);
            },
            Some(_) => { debug!("line {}: ignored ({})", line_nb, line); }
        }
    }
    let graph = res.ok_or(DimacsError::MissingHeader)?;
    // some files list each edge in both directions
    if graph.nb_edges() != declared_nb_edges && 2*graph.nb_edges() != declared_nb_edges {
        warn!("{} edges declared, {} read", declared_nb_edges, graph.nb_edges());
    }
    Ok(graph)
}

/// reads a DIMACS graph from a file
pub fn read_from_file<P:AsRef<Path>>(filename:P) -> Result<Graph, DimacsError> {
    read_from_str(&fs::read_to_string(filename)?)
}

/// writes a graph in the DIMACS format
pub fn graph_to_string(inst:&Graph) -> String {
    let mut res = format!("p edge {} {}\n", inst.nb_vertices(), inst.nb_edges());
    for (u,v) in inst.edges() {
        res += format!("e {} {}\n", u+1, v+1).as_str();
    }
    res
}

/** writes a string encoding the solution (each line corresponds to a color) */
pub fn solution_to_string(solution:&[Vec<usize>]) -> String {
    let mut res = String::default();
    for e in solution {
        let line:Vec<String> = e.iter().map(|v| v.to_string()).collect();
        res += line.join(" ").as_str();
        res += "\n";
    }
    res
}

/** writes a solution into a file. each line corresponds to a color. */
pub fn write_solution<P:AsRef<Path>>(filename:P, solution:&Solution) -> std::io::Result<()> {
    fs::write(filename, solution_to_string(solution))
}
