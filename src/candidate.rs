use crate::data::{Flow, Job};
use itertools::Itertools;
use std::cmp;
use std::fmt;

/// A job permutation together with the total flow time it was last evaluated to.
///
/// The objective is not kept in sync with the sequence: after `perturb` or `set`
/// the caller has to re-evaluate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
  sequence: Vec<Job>,
  length: usize,
  objective: Flow,
}

impl Candidate {
  pub fn empty() -> Self {
    return Self::default();
  }

  pub fn new(sequence: Vec<Job>, objective: Flow, length: usize) -> Self {
    debug_assert_eq!(sequence.len(), length);
    return Self {
      sequence: sequence,
      length: length,
      objective: objective,
    };
  }

  /// Panics if `index >= len()`.
  pub fn get(&self, index: usize) -> Job {
    return self.sequence[..self.length][index];
  }

  pub fn len(&self) -> usize {
    return self.length;
  }

  pub fn objective(&self) -> Flow {
    return self.objective;
  }

  pub fn set_objective(&mut self, objective: Flow) {
    self.objective = objective;
  }

  /// Replaces the whole candidate. `sequence` must hold `length` jobs.
  pub fn set(&mut self, sequence: Vec<Job>, objective: Flow, length: usize) {
    debug_assert_eq!(sequence.len(), length);
    self.sequence = sequence;
    self.objective = objective;
    self.length = length;
  }

  pub fn is_empty(&self) -> bool {
    return self.sequence.is_empty();
  }

  pub fn sequence(&self) -> &[Job] {
    return &self.sequence[..self.length];
  }

  /// Swaps the jobs at `i` and `i + 1`, clamping `i` into `[0, len() - 2]`.
  /// The objective is left untouched.
  pub fn perturb(&mut self, i: isize) {
    assert!(
      self.length >= 2,
      "Cannot perturb a sequence of length {}",
      self.length
    );

    let last = (self.length - 2) as isize;
    let i = cmp::min(cmp::max(i, 0), last) as usize;
    self.sequence.swap(i, i + 1);
  }

  pub fn compare_by_objective(a: &Candidate, b: &Candidate) -> cmp::Ordering {
    return a.objective.cmp(&b.objective);
  }
}

impl fmt::Display for Candidate {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "Seq: [{}] F = {}",
      self.sequence().iter().join(" "),
      self.objective
    )
  }
}
