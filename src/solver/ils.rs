use crate::candidate::Candidate;
use crate::data::Instance;
use crate::error::WorkerError;
use crate::lcg;
use crate::solver::worker::{LocalSearchWorker, WorkerConfig};
use itertools::Itertools;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand_chacha;
use rayon::prelude::*;
use std::cmp::{self, Ordering};
use std::iter;
use std::time::{Duration, Instant};

pub struct Config {
  pub timeout: Duration,
  pub seed: u64,
  pub n_threads: usize,
  pub n_pert: usize,
  pub max_iterations: Option<usize>,
}

/// Runs one independent worker per thread and returns the best solution any of
/// them found. Ties go to the lowest thread index.
pub fn find_solution(inst: &Instance, config: &Config) -> Result<Candidate, WorkerError> {
  let n_threads = cmp::max(config.n_threads, 1);
  let seeds = derive_seeds(config.seed, n_threads);
  debug!("Worker seeds {:?}", seeds);

  let start = Instant::now();
  let results: Vec<Result<Candidate, WorkerError>> = seeds
    .into_par_iter()
    .enumerate()
    .map(|(idx_thread, seed)| -> Result<Candidate, WorkerError> {
      let worker_config = WorkerConfig {
        seed: seed,
        n_threads: n_threads,
        idx_thread: idx_thread,
        n_pert: config.n_pert,
      };
      let mut worker = LocalSearchWorker::from_instance(Candidate::empty(), worker_config, inst)?;
      run_worker(&mut worker, config, &start)?;

      Ok(worker.best().clone())
    })
    .collect();

  let mut best: Option<Candidate> = None;
  for result in results {
    let candidate = result?;
    let improves = match &best {
      Some(current) => Candidate::compare_by_objective(&candidate, current) == Ordering::Less,
      None => true,
    };
    if improves {
      best = Some(candidate);
    }
  }

  let best = best.unwrap_or_default();
  info!("Best of {} workers: {}", n_threads, best.objective());

  return Ok(best);
}

/// Distinct valid Lehmer seeds, one per worker.
fn derive_seeds(seed: u64, n_threads: usize) -> Vec<i64> {
  let mut rng = rand_chacha::ChaChaRng::seed_from_u64(seed);

  return iter::repeat_with(|| rng.gen_range(1, lcg::MODULUS))
    .unique()
    .take(n_threads)
    .collect();
}

fn should_stop(config: &Config, start: &Instant, iteration: usize) -> bool {
  if let Some(max_iterations) = config.max_iterations {
    if iteration >= max_iterations {
      return true;
    }
  }

  return Instant::now().duration_since(*start) >= config.timeout;
}

fn run_worker(
  worker: &mut LocalSearchWorker,
  config: &Config,
  start: &Instant,
) -> Result<(), WorkerError> {
  let idx_thread = worker.idx_thread();
  let mut current = worker.random_solution()?;
  descend(worker, &mut current)?;
  worker.set_best(current.clone());
  trace!("[{}] Starting with {}", idx_thread, current.objective());

  // A single job has exactly one schedule
  if worker.n_jobs() < 2 {
    return Ok(());
  }

  let mut iteration = 0;
  while !should_stop(config, start, iteration) {
    let mut candidate = current.clone();
    for _ in 0..worker.n_pert() {
      worker.perturb(&mut candidate)?;
    }
    descend(worker, &mut candidate)?;

    if candidate.objective() <= current.objective() {
      trace!(
        "[{}] Accepted {} over {} ({})",
        idx_thread,
        candidate.objective(),
        current.objective(),
        iteration
      );
      current = candidate;
    }

    if Candidate::compare_by_objective(&current, worker.best()) == Ordering::Less {
      worker.set_best(current.clone());
      debug!(
        "[{}] Improved best to {} ({})",
        idx_thread,
        current.objective(),
        iteration
      );
    }

    iteration += 1;
  }

  info!(
    "[{}] Stopping at {} ({})",
    idx_thread,
    worker.best().objective(),
    iteration
  );

  Ok(())
}

/// First improvement descent over swaps of neighbouring jobs.
fn descend(worker: &mut LocalSearchWorker, candidate: &mut Candidate) -> Result<(), WorkerError> {
  if candidate.len() < 2 {
    return Ok(());
  }

  let mut improved = true;
  while improved {
    improved = false;
    for i in 0..candidate.len() - 1 {
      let flow = candidate.objective();
      candidate.perturb(i as isize);
      if worker.evaluate(candidate)? < flow {
        improved = true;
      } else {
        candidate.perturb(i as isize);
        candidate.set_objective(flow);
      }
    }
  }

  Ok(())
}
