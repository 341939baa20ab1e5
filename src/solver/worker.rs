use crate::candidate::Candidate;
use crate::data::{Duration, Flow, Instance, Job};
use crate::error::WorkerError;
use crate::lcg::{self, LehmerRng};
use crate::solver::FlowEvaluator;
use log::trace;
use ndarray::{s, Array2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerConfig {
  pub seed: i64,
  pub n_threads: usize,
  pub idx_thread: usize,
  pub n_pert: usize,
}

/// Search state owned by a single thread of a multi-start run.
///
/// Nothing in here is shared: the worker keeps its own copy of the processing
/// times, its own scratch sequence and its own generator state.
#[derive(Debug, Clone)]
pub struct LocalSearchWorker {
  best: Candidate,
  n_jobs: usize,
  n_machines: usize,
  n_pert: usize,
  idx_thread: usize,
  n_threads: usize,

  // Reserved for insertion based neighbourhoods
  removed: [Job; 5],
  pos: usize,
  operation: usize,

  rng: LehmerRng,
  processing_times: Array2<Duration>,
  sequence: Vec<Job>,
  evaluator: FlowEvaluator,
}

impl LocalSearchWorker {
  pub fn new(
    best: Candidate,
    config: WorkerConfig,
    n_jobs: usize,
    n_machines: usize,
    source: &Array2<Duration>,
  ) -> Result<Self, WorkerError> {
    let mut worker = Self {
      best: Candidate::empty(),
      n_jobs: 0,
      n_machines: 0,
      n_pert: 0,
      idx_thread: 0,
      n_threads: 0,
      removed: [0; 5],
      pos: 0,
      operation: 0,
      rng: LehmerRng::new(1),
      processing_times: Array2::zeros((0, 0)),
      sequence: Vec::new(),
      evaluator: FlowEvaluator::new(),
    };
    worker.reconfigure(best, config, n_jobs, n_machines, source)?;

    return Ok(worker);
  }

  pub fn from_instance(
    best: Candidate,
    config: WorkerConfig,
    inst: &Instance,
  ) -> Result<Self, WorkerError> {
    return Self::new(
      best,
      config,
      inst.n_jobs,
      inst.n_machines,
      &inst.processing_times,
    );
  }

  /// Same contract as `new`, reusing the existing buffers.
  pub fn reconfigure(
    &mut self,
    best: Candidate,
    config: WorkerConfig,
    n_jobs: usize,
    n_machines: usize,
    source: &Array2<Duration>,
  ) -> Result<(), WorkerError> {
    if !lcg::is_valid_seed(config.seed) {
      return Err(WorkerError::InvalidSeed(config.seed));
    }

    let (rows, cols) = source.dim();
    if rows < n_machines || cols < n_jobs {
      return Err(WorkerError::MatrixTooSmall {
        rows: rows,
        cols: cols,
        n_machines: n_machines,
        n_jobs: n_jobs,
      });
    }

    self.best = best;
    self.n_jobs = n_jobs;
    self.n_machines = n_machines;
    self.n_pert = config.n_pert;
    self.idx_thread = config.idx_thread;
    self.n_threads = config.n_threads;
    self.rng = LehmerRng::new(config.seed);
    self.processing_times = source.slice(s![..n_machines, ..n_jobs]).to_owned();
    self.sequence.clear();
    self.sequence.resize(n_jobs, 0);

    trace!(
      "Configured worker {}/{} for {}x{} with seed {}",
      self.idx_thread,
      self.n_threads,
      n_machines,
      n_jobs,
      config.seed
    );

    Ok(())
  }

  /// Shuffles the identity permutation with a Fisher–Yates pass and evaluates it.
  pub fn random_solution(&mut self) -> Result<Candidate, WorkerError> {
    for (i, job) in self.sequence.iter_mut().enumerate() {
      *job = i;
    }

    for i in 0..self.n_jobs.saturating_sub(1) {
      let r = i + self.rng.next_index(0, self.n_jobs - 1 - i);
      self.sequence.swap(i, r);
    }

    let flow = self.evaluator.evaluate(
      &self.processing_times,
      &self.sequence,
      self.n_machines,
      self.n_jobs,
    )?;

    return Ok(Candidate::new(self.sequence.clone(), flow, self.n_jobs));
  }

  /// Recomputes the objective of `candidate` against this worker's processing times.
  pub fn evaluate(&mut self, candidate: &mut Candidate) -> Result<Flow, WorkerError> {
    let flow = self.evaluator.evaluate(
      &self.processing_times,
      candidate.sequence(),
      self.n_machines,
      self.n_jobs,
    )?;
    candidate.set_objective(flow);

    return Ok(flow);
  }

  /// Swaps a random pair of neighbouring jobs and re-evaluates. Returns the
  /// position that was swapped with its successor.
  pub fn perturb(&mut self, candidate: &mut Candidate) -> Result<usize, WorkerError> {
    let position = self.rng.next_index(0, candidate.len().saturating_sub(2));
    candidate.perturb(position as isize);
    self.evaluate(candidate)?;

    return Ok(position);
  }

  pub fn best(&self) -> &Candidate {
    return &self.best;
  }

  pub fn set_best(&mut self, candidate: Candidate) {
    self.best = candidate;
  }

  pub fn set_position(&mut self, pos: usize) {
    self.pos = pos;
  }

  pub fn position(&self) -> usize {
    return self.pos;
  }

  pub fn removed(&self) -> &[Job; 5] {
    return &self.removed;
  }

  pub fn operation(&self) -> usize {
    return self.operation;
  }

  pub fn n_jobs(&self) -> usize {
    return self.n_jobs;
  }

  pub fn n_machines(&self) -> usize {
    return self.n_machines;
  }

  pub fn n_pert(&self) -> usize {
    return self.n_pert;
  }

  pub fn idx_thread(&self) -> usize {
    return self.idx_thread;
  }

  pub fn n_threads(&self) -> usize {
    return self.n_threads;
  }

  pub fn seed(&self) -> i64 {
    return self.rng.seed();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::solver::{calculate_flow_time, verify_solution};
  use ndarray::arr2;
  use proptest::prelude::*;

  fn config(seed: i64) -> WorkerConfig {
    WorkerConfig {
      seed: seed,
      n_threads: 4,
      idx_thread: 2,
      n_pert: 3,
    }
  }

  fn small_instance() -> Instance {
    Instance::new(arr2(&[[2, 3, 1, 7], [4, 1, 2, 3], [1, 5, 2, 2]]))
  }

  #[test]
  fn stores_configuration() {
    let inst = small_instance();
    let best = Candidate::new(vec![0, 1, 2, 3], 99, 4);
    let worker = LocalSearchWorker::from_instance(best.clone(), config(7), &inst).unwrap();

    assert_eq!(worker.best(), &best);
    assert_eq!(worker.n_jobs(), 4);
    assert_eq!(worker.n_machines(), 3);
    assert_eq!(worker.n_pert(), 3);
    assert_eq!(worker.idx_thread(), 2);
    assert_eq!(worker.n_threads(), 4);
    assert_eq!(worker.seed(), 7);
    assert_eq!(worker.removed(), &[0; 5]);
    assert_eq!(worker.operation(), 0);
  }

  #[test]
  fn copies_only_the_requested_block() {
    let source = arr2(&[[2, 3, 1, 100], [4, 1, 2, 100], [100, 100, 100, 100]]);
    let mut worker =
      LocalSearchWorker::new(Candidate::empty(), config(11), 3, 2, &source).unwrap();
    let solution = worker.random_solution().unwrap();

    let inst = Instance::new(arr2(&[[2, 3, 1], [4, 1, 2]]));
    assert_eq!(solution.len(), 3);
    assert_eq!(
      calculate_flow_time(&inst, solution.sequence()),
      Ok(solution.objective())
    );
  }

  #[test]
  fn rejects_invalid_seeds() {
    let inst = small_instance();

    for &seed in &[0, -5, lcg::MODULUS] {
      assert_eq!(
        LocalSearchWorker::from_instance(Candidate::empty(), config(seed), &inst).err(),
        Some(WorkerError::InvalidSeed(seed))
      );
    }
  }

  #[test]
  fn rejects_undersized_source() {
    let source = arr2(&[[1, 2], [3, 4]]);

    assert_eq!(
      LocalSearchWorker::new(Candidate::empty(), config(3), 3, 2, &source).err(),
      Some(WorkerError::MatrixTooSmall {
        rows: 2,
        cols: 2,
        n_machines: 2,
        n_jobs: 3
      })
    );
  }

  #[test]
  fn same_seed_same_solution() {
    let inst = small_instance();
    let mut a = LocalSearchWorker::from_instance(Candidate::empty(), config(12345), &inst).unwrap();
    let mut b = LocalSearchWorker::from_instance(Candidate::empty(), config(12345), &inst).unwrap();

    for _ in 0..10 {
      assert_eq!(a.random_solution().unwrap(), b.random_solution().unwrap());
    }
  }

  #[test]
  fn reconfigure_replaces_state() {
    let inst = small_instance();
    let mut worker =
      LocalSearchWorker::from_instance(Candidate::empty(), config(5), &inst).unwrap();
    worker.random_solution().unwrap();

    let other = Instance::new(arr2(&[[2, 3, 1], [4, 1, 2]]));
    let best = Candidate::new(vec![2, 1, 0], 18, 3);
    worker
      .reconfigure(best.clone(), config(9), 3, 2, &other.processing_times)
      .unwrap();

    assert_eq!(worker.best(), &best);
    assert_eq!(worker.seed(), 9);
    let solution = worker.random_solution().unwrap();
    assert!(verify_solution(&other, &solution).is_ok());
  }

  #[test]
  fn perturb_keeps_objective_current() {
    let inst = small_instance();
    let mut worker =
      LocalSearchWorker::from_instance(Candidate::empty(), config(77), &inst).unwrap();
    let mut candidate = worker.random_solution().unwrap();

    for _ in 0..20 {
      let before = candidate.clone();
      let position = worker.perturb(&mut candidate).unwrap();
      assert!(position + 1 < candidate.len());
      assert_eq!(candidate.get(position), before.get(position + 1));
      assert!(verify_solution(&inst, &candidate).is_ok());
    }
  }

  #[test]
  fn best_and_position() {
    let inst = small_instance();
    let mut worker =
      LocalSearchWorker::from_instance(Candidate::empty(), config(1), &inst).unwrap();
    let solution = worker.random_solution().unwrap();

    worker.set_best(solution.clone());
    worker.set_position(3);

    assert_eq!(worker.best(), &solution);
    assert_eq!(worker.position(), 3);
  }

  #[test]
  fn single_job_instance() {
    let inst = Instance::new(arr2(&[[4], [6]]));
    let mut worker =
      LocalSearchWorker::from_instance(Candidate::empty(), config(3), &inst).unwrap();

    assert_eq!(
      worker.random_solution().unwrap(),
      Candidate::new(vec![0], 10, 1)
    );
  }

  proptest! {
    #[test]
    fn random_solution_is_a_permutation(
      seed in 1i64..lcg::MODULUS,
      n_jobs in 1usize..60,
      n_machines in 1usize..4,
    ) {
      let inst = Instance::new(Array2::from_elem((n_machines, n_jobs), 1));
      let mut worker =
        LocalSearchWorker::from_instance(Candidate::empty(), config(seed), &inst).unwrap();

      for _ in 0..3 {
        let solution = worker.random_solution().unwrap();
        let mut jobs = solution.sequence().to_vec();
        jobs.sort();

        prop_assert_eq!(solution.len(), n_jobs);
        prop_assert_eq!(jobs, (0..n_jobs).collect::<Vec<Job>>());
      }
    }
  }
}
