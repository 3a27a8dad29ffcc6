use clap::ArgMatches;
use serde_json::json;

use crate::{
    color::{checker, CheckerResult},
    dimacs::{read_from_file, write_solution},
    error::ColoringError,
    generator::random_graph,
    graph::Graph,
    search::solver::{SolveResult, SolverOptions},
};

/// parameters read from the command line
#[derive(Debug)]
pub struct Params {
    /// instance name (file name, or description of the random graph)
    pub inst_name: String,
    /// graph to color
    pub graph: Graph,
    /// solver options (options file overridden by the command line)
    pub options: SolverOptions,
    /// optimistic bound name
    pub optimistic: String,
    /// pessimistic bound name
    pub pessimistic: String,
    /// where to write the solution
    pub sol_file: Option<String>,
    /// where to write the statistics
    pub perf_file: Option<String>,
}

fn parse_value<T:std::str::FromStr>(main_args:&ArgMatches, name:&str) -> Result<Option<T>, ColoringError> {
    match main_args.value_of(name) {
        None => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(|_| {
            ColoringError::InvalidOption(format!("unable to parse --{} value: {}", name, v))
        })
    }
}

/** reads command line input and returns the instance, the solver options and the output files */
pub fn read_params(main_args:&ArgMatches) -> Result<Params, ColoringError> {
    // read options file, then command line overrides
    let mut options = match main_args.value_of("config") {
        None => SolverOptions::default(),
        Some(filename) => serde_json::from_str(&std::fs::read_to_string(filename)?)?
    };
    if let Some(capacity) = parse_value::<usize>(main_args, "capacity")? {
        options.frontier_capacity = capacity;
    }
    if let Some(keep) = parse_value::<f64>(main_args, "keep")? {
        options.compaction_keep_fraction = keep;
    }
    if let Some(t) = parse_value::<f64>(main_args, "time")? {
        options.time_limit = Some(t);
    }
    options.validate()?;
    // read or generate the instance
    let (inst_name, graph) = match main_args.value_of("instance") {
        Some(filename) => {
            println!("reading instance: {}...", filename);
            (filename.to_string(), read_from_file(filename)?)
        },
        None => {
            let n = parse_value::<usize>(main_args, "random")?.unwrap_or(0);
            let density = parse_value::<f64>(main_args, "density")?.unwrap_or(0.5);
            let seed = parse_value::<u64>(main_args, "seed")?.unwrap_or(0);
            println!("generating random graph: n={} density={} seed={}", n, density, seed);
            (format!("random_{}_{}_{}", n, density, seed), random_graph(n, density, seed))
        }
    };
    graph.display_statistics();
    if !graph.is_connected() { println!("\tnot connected"); }
    println!("=======================");
    let sol_file = main_args.value_of("solution").map(|e| {
        println!("printing solutions in: {}", e);
        e.to_string()
    });
    let perf_file = main_args.value_of("perf").map(|e| {
        println!("printing perfs in: {}", e);
        e.to_string()
    });
    Ok(Params {
        inst_name,
        graph,
        options,
        optimistic: main_args.value_of("optimistic").unwrap_or("admissible").to_string(),
        pessimistic: main_args.value_of("pessimistic").unwrap_or("dsatur").to_string(),
        sol_file,
        perf_file,
    })
}

/// builds the JSON statistics of a search
pub fn stats_to_json(inst_name:&str, result:&SolveResult) -> serde_json::Value {
    json!({
        "inst_name": inst_name,
        "primal_list": result.stats.primal_list,
        "time_searched": result.stats.time_searched,
        "nb_colors": result.best_cost,
        "state": result.state,
        "certified_optimal": result.is_certified_optimal(),
        "warnings": result.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        "stats": result.stats,
    })
}

/// exports search results to files (checks the solution before writing it)
pub fn export_results(
    params:&Params,
    result:&SolveResult,
) -> Result<(), ColoringError> {
    if let Some(filename) = &params.perf_file {
        let stats = stats_to_json(&params.inst_name, result);
        std::fs::write(filename, serde_json::to_string(&stats)?)?;
    }
    if let Some(filename) = &params.sol_file {
        let assignment:Vec<Option<usize>> = result.assignment.iter().map(|c| Some(*c)).collect();
        match checker(&params.graph, &assignment) {
            CheckerResult::Ok(_) => {},
            checker_result => { println!("invalid solution (reason: {:?})", checker_result) }
        };
        write_solution(filename, &result.to_partition())?;
    }
    Ok(())
}
