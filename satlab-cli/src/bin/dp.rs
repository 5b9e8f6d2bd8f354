use satlab_cli::run_engine_cli;
use satlab_harness::DpEngine;

fn main() {
    std::process::exit(run_engine_cli("dp", &DpEngine));
}
