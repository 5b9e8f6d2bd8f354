use satlab_cli::run_engine_cli;
use satlab_harness::ResolutionEngine;

fn main() {
    std::process::exit(run_engine_cli("resolution", &ResolutionEngine));
}
