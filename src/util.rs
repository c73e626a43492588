use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use log::{info, warn};
use serde_json::Value;

use crate::color::{CheckerResult, checker, to_partition};
use crate::dimacs;
use crate::graph::Graph;

/// command line parameters shared by the solver executables
#[derive(Debug)]
pub struct Params {
    /// instance file
    pub inst_filename: String,
    /// name of the instance in the results file
    pub graph_name: String,
    /// instance
    pub instance: Graph,
    /// time limit (seconds)
    pub time: f32,
    /// where to write the solution
    pub sol_file: Option<String>,
    /// where to write the search statistics (JSON)
    pub perf_file: Option<String>,
    /// results file (CSV) to append a line to
    pub results_file: Option<String>,
    /// known chromatic number of the instance
    pub known_optimal: Option<usize>,
}

/** reads command line input and the instance */
pub fn read_params(main_args:&ArgMatches) -> Result<Params> {
    let inst_filename = main_args.value_of("instance")
        .ok_or_else(|| anyhow!("missing instance file"))?.to_string();
    let time:f32 = match main_args.value_of("time") {
        None => 10.,
        Some(t) => t.parse::<f32>().with_context(|| format!("unable to parse the time given ({})", t))?,
    };
    let known_optimal = match main_args.value_of("known-optimal") {
        None => None,
        Some(k) => Some(k.parse::<usize>().with_context(|| format!("unable to parse the known optimal ({})", k))?),
    };
    let graph_name = match main_args.value_of("graph-name") {
        Some(name) => name.to_string(),
        None => Path::new(&inst_filename).file_name()
            .map_or_else(|| inst_filename.clone(), |f| f.to_string_lossy().into_owned()),
    };
    let sol_file = main_args.value_of("solution").map(|e| e.to_string());
    let perf_file = main_args.value_of("perf").map(|e| e.to_string());
    let results_file = main_args.value_of("results").map(|e| e.to_string());
    if let Some(e) = &sol_file { info!("printing solutions in: {}", e); }
    if let Some(e) = &perf_file { info!("printing perfs in: {}", e); }
    info!("reading instance: {}...", inst_filename);
    let instance = dimacs::read_from_file(&inst_filename)
        .with_context(|| format!("unable to read {}", inst_filename))?;
    instance.display_statistics();
    info!("=======================");
    Ok(Params { inst_filename, graph_name, instance, time, sol_file, perf_file, results_file, known_optimal })
}

/// exports search results to files (statistics, solution)
pub fn export_results(params:&Params, colors:&[usize], stats:&Value) -> Result<()> {
    let nb_colors = match checker(&params.instance, colors) {
        CheckerResult::Ok(k) => k,
        res => bail!("invalid solution (reason: {:?})", res),
    };
    if let Some(expected) = params.known_optimal {
        if nb_colors < expected {
            warn!("{} colors found, below the known optimal ({})", nb_colors, expected);
        }
    }
    if let Some(filename) = &params.perf_file {
        std::fs::write(filename, serde_json::to_string(stats)?)
            .with_context(|| format!("couldn't write {}", filename))?;
    }
    if let Some(filename) = &params.sol_file {
        dimacs::write_solution(filename, &to_partition(colors))
            .with_context(|| format!("couldn't write {}", filename))?;
    }
    Ok(())
}

/// one line of the results file
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    /// algorithm name
    pub algorithm: String,
    /// instance name
    pub graph_name: String,
    /// number of vertices
    pub vertices: usize,
    /// number of edges
    pub edges: usize,
    /// number of colors found
    pub colors_used: usize,
    /// known chromatic number
    pub known_optimal: Option<usize>,
    /// running time (milliseconds)
    pub runtime_ms: f64,
}

const RESULTS_HEADER:&str = "algorithm,graph_name,vertices,edges,colors_used,known_optimal,runtime_ms";

/// CSV field, quoted (inner quotes doubled) if it contains a separator, a quote or a line break
fn csv_field(field:&str) -> String {
    if field.contains(|ch:char| matches!(ch, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

impl BenchmarkRecord {
    /// builds a record for a coloring of params.instance
    pub fn new(algorithm:&str, params:&Params, colors_used:usize, runtime_ms:f64) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            graph_name: params.graph_name.clone(),
            vertices: params.instance.nb_vertices(),
            edges: params.instance.nb_edges(),
            colors_used,
            known_optimal: params.known_optimal,
            runtime_ms,
        }
    }

    /// CSV line (without line break)
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{:.3}",
            csv_field(&self.algorithm), csv_field(&self.graph_name), self.vertices, self.edges, self.colors_used,
            self.known_optimal.map(|k| k.to_string()).unwrap_or_default(),
            self.runtime_ms
        )
    }
}

/** appends a record to a CSV file (writes the header if the file is new or empty) */
pub fn append_result_csv<P:AsRef<Path>>(filename:P, record:&BenchmarkRecord) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(filename)?;
    if file.metadata()?.len() == 0 {
        writeln!(file, "{}", RESULTS_HEADER)?;
    }
    writeln!(file, "{}", record.to_csv_line())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn record(known_optimal:Option<usize>) -> BenchmarkRecord {
        BenchmarkRecord {
            algorithm: "exact_bnb".to_string(),
            graph_name: "myciel3.col".to_string(),
            vertices: 11,
            edges: 20,
            colors_used: 4,
            known_optimal,
            runtime_ms: 1.23456,
        }
    }

    #[test]
    fn test_csv_line() {
        assert_eq!(record(Some(4)).to_csv_line(), "exact_bnb,myciel3.col,11,20,4,4,1.235");
        assert_eq!(record(None).to_csv_line(), "exact_bnb,myciel3.col,11,20,4,,1.235");
    }

    #[test]
    fn test_csv_line_quotes_graph_name() {
        let mut rec = record(Some(4));
        rec.graph_name = "my,graph.col".to_string();
        assert_eq!(rec.to_csv_line(), "exact_bnb,\"my,graph.col\",11,20,4,4,1.235");
        rec.graph_name = "say \"hi\".col".to_string();
        assert_eq!(rec.to_csv_line(), "exact_bnb,\"say \"\"hi\"\".col\",11,20,4,4,1.235");
    }

    #[test]
    fn test_append_writes_header_once() {
        let path = std::env::temp_dir().join(format!("timetable_color_results_{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        append_result_csv(&path, &record(Some(4))).unwrap();
        append_result_csv(&path, &record(None)).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let lines:Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], RESULTS_HEADER);
    }
}
