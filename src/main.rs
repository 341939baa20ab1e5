#[macro_use]
extern crate log;

use clap::{App, Arg};
use flowshop::parser::parse_instance;
use flowshop::solver::{calculate_flow_time, ils, print_solution, verify_solution};
use std::fs;
use std::time::Duration;

fn main() {
  env_logger::init();

  let matches = App::new("flowshop")
    .version("1.0")
    .about("Iterated local search for the permutation flow shop problem (total flow time)")
    .arg(
      Arg::with_name("instance")
        .long("instance")
        .help("Instance file name")
        .takes_value(true)
        .required(true),
    )
    .arg(
      Arg::with_name("timeout")
        .long("timeout")
        .help("Timeout (in s) after which to abort the search")
        .takes_value(true)
        .required(true),
    )
    .arg(
      Arg::with_name("seed")
        .long("seed")
        .help("Seed from which the worker seeds are derived")
        .takes_value(true)
        .required(true),
    )
    .arg(
      Arg::with_name("threads")
        .long("threads")
        .help("Number of independent search workers")
        .takes_value(true)
        .default_value("1"),
    )
    .arg(
      Arg::with_name("perturbations")
        .long("perturbations")
        .help("Neighbouring swaps applied per iteration")
        .takes_value(true)
        .default_value("2"),
    )
    .arg(
      Arg::with_name("iterations")
        .long("iterations")
        .help("Maximum number of iterations per worker")
        .takes_value(true),
    )
    .get_matches();

  let file = matches.value_of("instance").expect("Missing instance file");
  let timeout = Duration::from_secs(
    matches
      .value_of("timeout")
      .and_then(|m| m.parse().ok())
      .expect("Invalid timeout"),
  );
  let seed: u64 = matches
    .value_of("seed")
    .and_then(|m| m.parse().ok())
    .expect("Invalid seed");
  let n_threads: usize = matches
    .value_of("threads")
    .and_then(|m| m.parse().ok())
    .expect("Invalid thread count");
  let n_pert: usize = matches
    .value_of("perturbations")
    .and_then(|m| m.parse().ok())
    .expect("Invalid perturbation count");
  let max_iterations: Option<usize> = matches
    .value_of("iterations")
    .map(|m| m.parse().expect("Invalid iteration count"));

  let contents = fs::read_to_string(file).expect("Error reading file");
  let instance = parse_instance(&contents).expect("Error parsing file");
  info!(
    "Loaded {} jobs on {} machines",
    instance.n_jobs, instance.n_machines
  );

  let config = ils::Config {
    timeout: timeout,
    seed: seed,
    n_threads: n_threads,
    n_pert: n_pert,
    max_iterations: max_iterations,
  };
  let solution = ils::find_solution(&instance, &config).expect("Search failed");

  let flow = calculate_flow_time(&instance, solution.sequence()).expect("Evaluation failed");
  verify_solution(&instance, &solution).expect("Verification failed");

  println!("{}", flow);
  print_solution(&solution);
}
