use crate::data::Job;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
  #[error("Cannot evaluate without machines")]
  NoMachines,

  #[error("Sequence holds {actual} jobs but {expected} are required")]
  SequenceTooShort { expected: usize, actual: usize },

  #[error("Processing times are {rows}x{cols} but {n_machines}x{n_jobs} are required")]
  MatrixTooSmall {
    rows: usize,
    cols: usize,
    n_machines: usize,
    n_jobs: usize,
  },

  #[error("Job {job} at position {position} is outside of the {n_jobs} known jobs")]
  JobOutOfRange {
    job: Job,
    position: usize,
    n_jobs: usize,
  },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
  #[error("Seed {0} is outside of [1, 2^31 - 1)")]
  InvalidSeed(i64),

  #[error("Source matrix is {rows}x{cols} but {n_machines}x{n_jobs} are required")]
  MatrixTooSmall {
    rows: usize,
    cols: usize,
    n_machines: usize,
    n_jobs: usize,
  },

  #[error("Evaluation failed: {0}")]
  Evaluation(#[from] EvaluationError),
}
