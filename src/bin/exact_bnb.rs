use std::time::Instant;

use anyhow::{Context, Result};
use clap::{App, load_yaml};
use dogs::search_algorithm::TimeStoppingCriterion;
use log::info;
use serde_json::json;

use timetable_color::search::coloring_bnb::{exact_search, DEFAULT_CHECK_INTERVAL};
use timetable_color::util::{read_params, export_results, append_result_csv, BenchmarkRecord};


/** solves a coloring instance using DSATUR followed by a branch and bound */
pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    // parse arguments
    let yaml = load_yaml!("exact_bnb.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let params = read_params(&main_args)?;
    let check_interval = match main_args.value_of("check-interval") {
        None => DEFAULT_CHECK_INTERVAL,
        Some(k) => k.parse::<usize>().with_context(|| format!("unable to parse the check interval ({})", k))?,
    };
    info!("time limit: {}", params.time);

    // solve it
    let t_start = Instant::now();
    let t = params.time;
    let res = exact_search(&params.instance, || TimeStoppingCriterion::new(t), check_interval);
    let duration = t_start.elapsed();
    info!(
        "branch and bound took {:.3} seconds. Nb colors: {} ({})",
        duration.as_secs_f32(), res.nb_colors,
        if res.optimal { "optimal" } else { "time limit reached" }
    );
    let stats = json!({
        "primal_list": vec![res.nb_colors],
        "optimal": res.optimal,
        "nb_nodes": res.nb_nodes,
        "time_searched": duration.as_secs_f32(),
        "inst_name": params.inst_filename
    });

    // export results
    export_results(&params, &res.colors, &stats)?;
    if let Some(filename) = &params.results_file {
        let record = BenchmarkRecord::new("exact_solver", &params, res.nb_colors, duration.as_secs_f64()*1000.);
        append_result_csv(filename, &record)?;
    }
    Ok(())
}
