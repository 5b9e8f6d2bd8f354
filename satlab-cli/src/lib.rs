//! Shared CLI plumbing for satlab's four binaries: logging setup and the `run`/`benchmark`
//! subcommand pair each per-engine binary exposes.
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Error};
use clap::{App, Arg, ArgMatches, SubCommand};
use env_logger::{fmt, Builder, Target};
use log::{error, info, Level, LevelFilter, Record};

use satlab_core::{SolverConfig, Verdict};
use satlab_dimacs::DimacsParser;
use satlab_formula::{Assignment, Var};
use satlab_harness::Engine;

/// Initialize logging with the `c <message>` / `c ERROR: <message>` DIMACS-comment convention,
/// filterable via the `SATLAB_LOG` environment variable.
pub fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .format(format)
        .filter(None, LevelFilter::Info);

    if let Ok(env_var) = std::env::var("SATLAB_LOG") {
        builder.parse_filters(&env_var);
    }

    let _ = builder.try_init();
}

fn app<'a, 'b>(name: &'b str) -> App<'a, 'b> {
    App::new(name)
        .about("A single SAT decision procedure from the satlab toolkit")
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .takes_value(true)
                .global(true)
                .help("Wall-clock solve timeout in seconds (default: 300)"),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("Solve a single CNF file")
                .arg(Arg::with_name("file").required(true).help("Path to a DIMACS CNF file"))
                .arg(
                    Arg::with_name("time")
                        .long("time")
                        .help("Print elapsed time and engine statistics"),
                ),
        )
        .subcommand(
            SubCommand::with_name("benchmark")
                .about("Benchmark CNF files in a folder")
                .arg(
                    Arg::with_name("folder")
                        .required(true)
                        .help("Path containing satisfiable/unsatisfiable subfolders"),
                )
                .arg(
                    Arg::with_name("limit")
                        .long("limit")
                        .takes_value(true)
                        .default_value("10")
                        .help("Max files per subfolder"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .takes_value(true)
                        .help("CSV output path"),
                ),
        )
}

/// Run a per-engine binary's CLI to completion, returning the process exit code.
pub fn run_engine_cli(name: &str, engine: &dyn Engine) -> i32 {
    init_logging();
    match dispatch(name, engine) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            1
        }
    }
}

fn dispatch(name: &str, engine: &dyn Engine) -> Result<i32, Error> {
    let matches = app(name).get_matches();

    match matches.subcommand() {
        ("run", Some(sub)) => run_single(engine, sub),
        ("benchmark", Some(sub)) => run_benchmark(name, engine, sub),
        _ => {
            app(name).print_help()?;
            println!();
            Ok(0)
        }
    }
}

fn config_from_matches(matches: &ArgMatches) -> Result<SolverConfig, Error> {
    let mut config = SolverConfig::default();
    if let Some(secs) = matches.value_of("timeout") {
        let secs: u64 = secs.parse().context("--timeout must be a non-negative integer")?;
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

/// Print one `<var>=T|F|unset` line per variable, per SPEC_FULL.md's note that free variables are
/// reported as unset rather than silently defaulted.
fn print_model(var_count: usize, model: &Assignment) {
    for index in 0..var_count {
        let var = Var::from_index(index);
        let value = match model.var_value(var) {
            Some(true) => "T",
            Some(false) => "F",
            None => "unset",
        };
        println!("v {}={}", var.to_dimacs(), value);
    }
}

fn run_single(engine: &dyn Engine, matches: &ArgMatches) -> Result<i32, Error> {
    let path = matches.value_of("file").expect("required argument");
    let file = fs::File::open(path).with_context(|| format!("failed to open {}", path))?;
    let formula = DimacsParser::parse(file)?;

    let config = config_from_matches(matches)?;
    let start = Instant::now();
    let (verdict, stats) = engine.solve(&formula, &config);
    let elapsed = start.elapsed().as_secs_f64();

    println!("{}", verdict.label());
    if let Verdict::Sat(model) = &verdict {
        print_model(model.var_count(), model);
    }
    if matches.is_present("time") {
        println!(
            "Time: {:.3}s, Stats: unit_props={} pure_literals={} eliminations={} resolution_steps={} decisions={} backtracks={}",
            elapsed,
            stats.unit_props,
            stats.pure_literals,
            stats.eliminations,
            stats.resolution_steps,
            stats.decisions,
            stats.backtracks,
        );
    }

    Ok(0)
}

fn run_benchmark(name: &str, engine: &dyn Engine, matches: &ArgMatches) -> Result<i32, Error> {
    let folder = matches.value_of("folder").expect("required argument");
    let limit: usize = matches
        .value_of("limit")
        .expect("has a default")
        .parse()
        .context("--limit must be a non-negative integer")?;
    let default_output = format!("results/{}/test.csv", name);
    let output = matches.value_of("output").unwrap_or(&default_output);

    let config = config_from_matches(matches)?;
    satlab_harness::run_benchmark(engine, Path::new(folder), limit, Path::new(output), &config)?;
    info!("Benchmark complete. Wrote {}", output);

    Ok(0)
}
