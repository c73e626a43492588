use anyhow::{Context, Result};
use clap::{App, load_yaml};
use log::info;
use serde_json::json;

use timetable_color::timetable::{EnrollmentFile, ScheduleOptions, schedule};


/** builds an exam timetable (one timeslot per color) from an enrollment file */
pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    // parse arguments
    let yaml = load_yaml!("exam_timetable.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let filename = main_args.value_of("enrollments").context("missing enrollment file")?;
    let mut options = ScheduleOptions::default();
    if let Some(t) = main_args.value_of("time") {
        options.timeout = t.parse::<f32>().with_context(|| format!("unable to parse the time given ({})", t))?;
    }
    if let Some(k) = main_args.value_of("exact-threshold") {
        options.exact_threshold = k.parse::<usize>()
            .with_context(|| format!("unable to parse the exact threshold ({})", k))?;
    }

    // build the conflict graph
    let enrollments = EnrollmentFile::from_file(filename)?;
    let inst = enrollments.conflict_graph()?;
    info!("conflict graph: {} exams, {} conflicts", inst.nb_vertices(), inst.nb_edges());

    // schedule
    let res = schedule(&inst, &options);
    let slots = enrollments.slot_names(&res);
    for (i,slot) in slots.iter().enumerate() {
        println!("slot {}: {}", i+1, slot.join(", "));
    }

    // export
    if let Some(output) = main_args.value_of("output") {
        let export = json!({
            "algorithm": res.algorithm,
            "nb_slots": res.nb_slots,
            "optimal": res.optimal,
            "elapsed": res.elapsed,
            "slots": slots,
        });
        std::fs::write(output, serde_json::to_string_pretty(&export)?)
            .with_context(|| format!("couldn't write {}", output))?;
    }
    Ok(())
}
