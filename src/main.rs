//! exact graph coloring solver (best-first branch & bound)

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

use clap::{App, load_yaml};
use tracing_subscriber::EnvFilter;

use bnb_color::error::ColoringError;
use bnb_color::search::bounds::{
    BoundFunction, ColorsUsed, DsaturCompletion, GuessNeighbors, RemainingNodes, SaturationBound
};
use bnb_color::search::solver::{solve, SolveResult};
use bnb_color::util::{export_results, read_params, Params};


/// solves with a given optimistic bound and the pessimistic bound named in the parameters
fn solve_with<O:BoundFunction>(params:&Params, optimistic:O) -> Result<SolveResult, ColoringError> {
    let options = params.options.clone();
    match params.pessimistic.as_str() {
        "trivial" => solve(&params.graph, optimistic, RemainingNodes, options),
        _ => solve(&params.graph, optimistic, DsaturCompletion, options),
    }
}

fn run(params:&Params) -> Result<(), ColoringError> {
    let result = match params.optimistic.as_str() {
        "used" => solve_with(params, ColorsUsed)?,
        "guess" => solve_with(params, GuessNeighbors)?,
        _ => solve_with(params, SaturationBound::new(&params.graph))?,
    };
    println!("=======================");
    println!("nb colors: {} ({:?})", result.best_cost, result.state);
    for warning in &result.warnings {
        println!("WARNING: {}", warning);
    }
    if result.is_certified_optimal() { println!("optimality proven"); }
    result.stats.display_statistics();
    export_results(params, &result)
}

/**
reads an instance (or generates one), takes the search parameters, and solves the problem.
*/
pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    // parse arguments
    let yaml = load_yaml!("main_args.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    println!("=========================================================");
    let res = read_params(&main_args).and_then(|params| run(&params));
    if let Err(e) = res {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
