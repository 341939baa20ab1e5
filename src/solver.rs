pub mod ils;
pub mod worker;

use crate::candidate::Candidate;
use crate::data::{Duration, Flow, Instance, Job};
use crate::error::EvaluationError;
use itertools::Itertools;
use log;
use ndarray::Array2;
use std::cmp;
use std::error::Error;

/// Total flow time of a permutation, i.e. the sum of the completion times of all
/// jobs on the last machine.
///
/// Only one row of the completion time table is kept: before machine `m` is
/// processed, `completion[j]` holds the completion time of position `j` on
/// machine `m - 1`. The row is reused between calls.
#[derive(Debug, Clone, Default)]
pub struct FlowEvaluator {
  completion: Vec<Flow>,
}

impl FlowEvaluator {
  pub fn new() -> Self {
    return Self::default();
  }

  pub fn with_capacity(n_jobs: usize) -> Self {
    return Self {
      completion: Vec::with_capacity(n_jobs),
    };
  }

  pub fn evaluate(
    &mut self,
    processing_times: &Array2<Duration>,
    sequence: &[Job],
    n_machines: usize,
    n_jobs: usize,
  ) -> Result<Flow, EvaluationError> {
    check_bounds(processing_times, sequence, n_machines, n_jobs)?;

    let sequence = &sequence[..n_jobs];
    self.completion.clear();
    self.completion.resize(n_jobs, 0);

    for m in 0..n_machines {
      // Completion of the previous position on the current machine
      let mut previous: Flow = 0;
      for (j, &job) in sequence.iter().enumerate() {
        let current = cmp::max(self.completion[j], previous) + processing_times[[m, job]] as Flow;
        self.completion[j] = current;
        previous = current;
      }
    }

    let flow = self.completion.iter().sum();
    log::trace!("flow({:?})={}", sequence, flow);

    return Ok(flow);
  }
}

fn check_bounds(
  processing_times: &Array2<Duration>,
  sequence: &[Job],
  n_machines: usize,
  n_jobs: usize,
) -> Result<(), EvaluationError> {
  if n_machines == 0 {
    return Err(EvaluationError::NoMachines);
  }

  let (rows, cols) = processing_times.dim();
  if rows < n_machines || cols < n_jobs {
    return Err(EvaluationError::MatrixTooSmall {
      rows: rows,
      cols: cols,
      n_machines: n_machines,
      n_jobs: n_jobs,
    });
  }

  if sequence.len() < n_jobs {
    return Err(EvaluationError::SequenceTooShort {
      expected: n_jobs,
      actual: sequence.len(),
    });
  }

  if let Some((position, &job)) = sequence[..n_jobs]
    .iter()
    .find_position(|&&job| job >= n_jobs)
  {
    return Err(EvaluationError::JobOutOfRange {
      job: job,
      position: position,
      n_jobs: n_jobs,
    });
  }

  Ok(())
}

pub fn calculate_flow_time(inst: &Instance, sequence: &[Job]) -> Result<Flow, EvaluationError> {
  return FlowEvaluator::with_capacity(inst.n_jobs).evaluate(
    &inst.processing_times,
    sequence,
    inst.n_machines,
    inst.n_jobs,
  );
}

pub fn verify_solution(inst: &Instance, candidate: &Candidate) -> Result<(), Box<dyn Error>> {
  if candidate.len() != inst.n_jobs {
    Err(format!(
      "Solution covers {} jobs but the instance has {}",
      candidate.len(),
      inst.n_jobs
    ))?;
  }

  let mut seen = vec![false; inst.n_jobs];
  for (position, &job) in candidate.sequence().iter().enumerate() {
    if job >= inst.n_jobs {
      Err(format!("Unknown job {} at position {}", job, position))?;
    }
    if seen[job] {
      Err(format!("Job {} is scheduled twice (position {})", job, position))?;
    }
    seen[job] = true;
  }

  let flow = calculate_flow_time(inst, candidate.sequence())?;
  if flow != candidate.objective() {
    Err(format!(
      "Stale objective: solution claims {} but evaluates to {}",
      candidate.objective(),
      flow
    ))?;
  }

  Ok(())
}

pub fn print_solution(candidate: &Candidate) {
  println!("{}", candidate.sequence().iter().join(" "));
}
