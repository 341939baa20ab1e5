use ndarray::Array2;

pub type Job = usize;
pub type Machine = usize;
pub type Duration = u32;
pub type Flow = u64;

#[derive(Debug, Clone)]
pub struct Instance {
  pub n_jobs: usize,
  pub n_machines: usize,

  // Indexed as [[machine, job]]
  pub processing_times: Array2<Duration>,
}

impl Instance {
  pub fn new(processing_times: Array2<Duration>) -> Self {
    let (n_machines, n_jobs) = processing_times.dim();

    return Self {
      n_jobs: n_jobs,
      n_machines: n_machines,
      processing_times: processing_times,
    };
  }

  pub fn processing_time(&self, machine: Machine, job: Job) -> Duration {
    return self.processing_times[[machine, job]];
  }

  pub fn shape(&self) -> (usize, usize) {
    return (self.n_machines, self.n_jobs);
  }
}
