use std::time::Instant;

use anyhow::Result;
use clap::{App, load_yaml};
use log::info;
use serde_json::json;

use timetable_color::color::nb_colors;
use timetable_color::search::greedy_dsatur::greedy_dsatur;
use timetable_color::util::{read_params, export_results, append_result_csv, BenchmarkRecord};


/** solves a coloring instance using a DSATUR greedy */
pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    // parse arguments
    let yaml = load_yaml!("greedy_dsatur.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let params = read_params(&main_args)?;

    // solve it
    let t_start = Instant::now();
    let solution = greedy_dsatur(&params.instance);
    let duration = t_start.elapsed();
    let nb_colors = nb_colors(&solution);
    info!("DSATUR took {:.3} seconds. Nb colors: {}", duration.as_secs_f32(), nb_colors);
    let stats = json!({
        "primal_list": vec![nb_colors],
        "time_searched": duration.as_secs_f32(),
        "inst_name": params.inst_filename
    });

    // export results
    export_results(&params, &solution, &stats)?;
    if let Some(filename) = &params.results_file {
        let record = BenchmarkRecord::new("dsatur", &params, nb_colors, duration.as_secs_f64()*1000.);
        append_result_csv(filename, &record)?;
    }
    Ok(())
}
