use std::path::Path;

use clap::{App, Arg};
use log::info;

use satlab_cli::init_logging;
use satlab_core::SolverConfig;
use satlab_harness::{engine_by_name, Engine, ENGINE_NAMES};

fn main() {
    init_logging();

    let matches = App::new("satlab-bench")
        .about("Run satlab's engines over the predefined corpus size tiers")
        .arg(
            Arg::with_name("engine")
                .possible_values(&ENGINE_NAMES)
                .help("Engine to run (default: all engines)"),
        )
        .arg(
            Arg::with_name("limit")
                .long("limit")
                .takes_value(true)
                .default_value("10")
                .help("Max files per subfolder"),
        )
        .arg(
            Arg::with_name("cnfs")
                .long("cnfs")
                .takes_value(true)
                .default_value("cnfs")
                .help("Root directory containing the size-tiered corpus"),
        )
        .arg(
            Arg::with_name("results")
                .long("results")
                .takes_value(true)
                .default_value("results")
                .help("Root directory to write results/<engine>/<size>.csv under"),
        )
        .get_matches();

    let limit: usize = matches
        .value_of("limit")
        .expect("has a default")
        .parse()
        .expect("--limit must be a non-negative integer");
    let cnfs_root = Path::new(matches.value_of("cnfs").expect("has a default"));
    let results_root = Path::new(matches.value_of("results").expect("has a default"));

    let engines: Vec<Box<dyn Engine>> = match matches.value_of("engine") {
        Some(name) => vec![engine_by_name(name).expect("validated by clap's possible_values")],
        None => ENGINE_NAMES
            .iter()
            .map(|name| engine_by_name(name).expect("name comes from ENGINE_NAMES"))
            .collect(),
    };

    info!(
        "Running {} engine(s) over {}",
        engines.len(),
        cnfs_root.display()
    );

    satlab_harness::run_combined(&engines, cnfs_root, limit, results_root, &SolverConfig::default());
}
