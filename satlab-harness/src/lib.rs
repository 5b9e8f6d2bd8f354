//! Iterates a corpus of DIMACS CNF files against an engine and writes a CSV summary.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Error};

use satlab_core::{dp, dpll, resolution, SolverConfig, Stats, Verdict};
use satlab_dimacs::DimacsParser;
use satlab_formula::CnfFormula;

/// A decision procedure the harness can drive.
///
/// Collapses what were three near-identical `run_file`/`run_benchmark`/`main` scripts in the
/// reference implementation, one per engine, into a single harness parameterized over this
/// trait.
pub trait Engine {
    fn name(&self) -> &'static str;
    fn solve(&self, formula: &CnfFormula, config: &SolverConfig) -> (Verdict, Stats);
}

pub struct ResolutionEngine;

impl Engine for ResolutionEngine {
    fn name(&self) -> &'static str {
        "resolution"
    }

    fn solve(&self, formula: &CnfFormula, config: &SolverConfig) -> (Verdict, Stats) {
        let outcome = resolution::solve(formula, config);
        (outcome.verdict, outcome.stats)
    }
}

pub struct DpEngine;

impl Engine for DpEngine {
    fn name(&self) -> &'static str {
        "dp"
    }

    fn solve(&self, formula: &CnfFormula, config: &SolverConfig) -> (Verdict, Stats) {
        let outcome = dp::solve(formula, config);
        (outcome.verdict, outcome.stats)
    }
}

pub struct DpllEngine;

impl Engine for DpllEngine {
    fn name(&self) -> &'static str {
        "dpll"
    }

    fn solve(&self, formula: &CnfFormula, config: &SolverConfig) -> (Verdict, Stats) {
        let outcome = dpll::solve(formula, config);
        (outcome.verdict, outcome.stats)
    }
}

/// All engine names accepted by the combined harness CLI.
pub const ENGINE_NAMES: [&str; 3] = ["resolution", "dp", "dpll"];

/// Look up an engine by the name used on the command line.
pub fn engine_by_name(name: &str) -> Option<Box<dyn Engine>> {
    match name {
        "resolution" => Some(Box::new(ResolutionEngine)),
        "dp" => Some(Box::new(DpEngine)),
        "dpll" => Some(Box::new(DpllEngine)),
        _ => None,
    }
}

/// The predefined corpus size tiers under `cnfs/` for the combined harness.
pub const SIZE_TIERS: [&str; 4] = ["test", "small", "medium", "large"];

const CSV_HEADER: &[&str] = &[
    "Filename",
    "Expected",
    "Result",
    "Correct",
    "Time",
    "Decisions",
    "UnitProps",
    "Backtracks",
    "ResolutionSteps",
];

fn cnf_files(subdir: &Path, limit: usize) -> Result<Vec<PathBuf>, Error> {
    let mut files: Vec<PathBuf> = fs::read_dir(subdir)
        .with_context(|| format!("failed to read {}", subdir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "cnf"))
        .collect();
    files.sort();
    files.truncate(limit);
    Ok(files)
}

fn write_row(
    writer: &mut csv::Writer<fs::File>,
    filename: &str,
    expected: &str,
    result: &str,
    elapsed: f64,
    stats: &Stats,
) -> Result<(), Error> {
    let correct = (result == expected).to_string();
    let time = format!("{:.6}", elapsed);
    writer.write_record(&[
        filename,
        expected,
        result,
        &correct,
        &time,
        &stats.decisions.to_string(),
        &stats.unit_props.to_string(),
        &stats.backtracks.to_string(),
        &stats.resolution_steps.to_string(),
    ])?;
    Ok(())
}

/// Run `engine` over every `.cnf` file in `corpus`'s `satisfiable`/`unsatisfiable` subfolders
/// (filename-sorted, at most `limit` files per subfolder) and write the results to `output` as
/// CSV. A file that fails to parse is recorded as an `ERROR` row rather than aborting the run.
pub fn run_benchmark(
    engine: &dyn Engine,
    corpus: &Path,
    limit: usize,
    output: &Path,
    config: &SolverConfig,
) -> Result<(), Error> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    writer.write_record(CSV_HEADER)?;

    for (subdir_name, expected) in [("satisfiable", "SAT"), ("unsatisfiable", "UNSAT")] {
        let subdir = corpus.join(subdir_name);
        if !subdir.is_dir() {
            log::warn!("missing corpus subfolder: {}", subdir.display());
            continue;
        }

        for path in cnf_files(&subdir, limit)? {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let formula = match fs::File::open(&path)
                .map_err(Error::from)
                .and_then(|file| DimacsParser::parse(file))
            {
                Ok(formula) => formula,
                Err(err) => {
                    log::warn!("skipping {}: {}", filename, err);
                    write_row(&mut writer, &filename, expected, "ERROR", 0.0, &Stats::default())?;
                    continue;
                }
            };

            let start = Instant::now();
            let (verdict, stats) = engine.solve(&formula, config);
            let elapsed = start.elapsed().as_secs_f64();

            write_row(&mut writer, &filename, expected, verdict.label(), elapsed, &stats)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Run every engine in `engines` over every size tier under `cnfs_root`, writing
/// `results_root/<engine>/<size>.csv` for each. A failure writing one engine/tier combination is
/// logged and does not stop the remaining combinations from running.
pub fn run_combined(
    engines: &[Box<dyn Engine>],
    cnfs_root: &Path,
    limit: usize,
    results_root: &Path,
    config: &SolverConfig,
) {
    for engine in engines {
        for size in SIZE_TIERS {
            let corpus = cnfs_root.join(size);
            if !corpus.is_dir() {
                log::warn!("missing size tier: {}", corpus.display());
                continue;
            }

            let output = results_root.join(engine.name()).join(format!("{}.csv", size));
            if let Err(err) = run_benchmark(engine.as_ref(), &corpus, limit, &output, config) {
                log::error!(
                    "benchmark run for engine {} size {} failed: {}",
                    engine.name(),
                    size,
                    err
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_cnf(dir: &Path, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn benchmark_writes_expected_rows() {
        let root = tempfile::tempdir().unwrap();
        let sat_dir = root.path().join("satisfiable");
        let unsat_dir = root.path().join("unsatisfiable");
        fs::create_dir_all(&sat_dir).unwrap();
        fs::create_dir_all(&unsat_dir).unwrap();

        write_cnf(&sat_dir, "a.cnf", "p cnf 1 1\n1 0\n");
        write_cnf(&unsat_dir, "b.cnf", "p cnf 1 2\n1 0\n-1 0\n");

        let output = root.path().join("out.csv");
        run_benchmark(
            &ResolutionEngine,
            root.path(),
            10,
            &output,
            &SolverConfig::default(),
        )
        .unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), CSV_HEADER.join(","));
        assert!(lines.next().unwrap().starts_with("a.cnf,SAT,SAT,true,"));
        assert!(lines.next().unwrap().starts_with("b.cnf,UNSAT,UNSAT,true,"));
    }

    #[test]
    fn unparseable_file_becomes_an_error_row_without_aborting() {
        let root = tempfile::tempdir().unwrap();
        let sat_dir = root.path().join("satisfiable");
        fs::create_dir_all(&sat_dir).unwrap();
        write_cnf(&sat_dir, "broken.cnf", "not a cnf file\n");

        let output = root.path().join("out.csv");
        run_benchmark(&DpEngine, root.path(), 10, &output, &SolverConfig::default()).unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert!(contents.lines().nth(1).unwrap().starts_with("broken.cnf,SAT,ERROR,false,"));
    }
}
