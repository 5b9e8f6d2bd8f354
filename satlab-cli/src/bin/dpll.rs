use satlab_cli::run_engine_cli;
use satlab_harness::DpllEngine;

fn main() {
    std::process::exit(run_engine_cli("dpll", &DpllEngine));
}
