use crate::data::{Duration, Instance};
use ndarray::Array2;
use std::error::Error;

/// Reads `n_jobs n_machines` followed by one line of `n_jobs` processing times per machine.
pub fn parse_instance(instance: &str) -> Result<Instance, Box<dyn Error>> {
  let mut lines = instance.lines().filter(|line| !line.trim().is_empty());

  let prelude = lines.next().ok_or("Prelude missing")?;
  let prelude_items: Vec<&str> = prelude.split_whitespace().collect();
  let n_jobs: usize = prelude_items.get(0).ok_or("n_jobs missing")?.parse()?;
  let n_machines: usize = prelude_items.get(1).ok_or("n_machines missing")?.parse()?;

  let mut processing_times = Array2::<Duration>::zeros((n_machines, n_jobs));
  for machine in 0..n_machines {
    let line = lines
      .next()
      .ok_or_else(|| format!("Processing times for machine {} missing", machine))?;
    let items: Vec<&str> = line.split_whitespace().collect();
    if items.len() != n_jobs {
      Err(format!(
        "Machine {} lists {} processing times, expected {}",
        machine,
        items.len(),
        n_jobs
      ))?;
    }

    for (job, item) in items.iter().enumerate() {
      processing_times[[machine, job]] = item.parse::<Duration>()?;
    }
  }

  Ok(Instance::new(processing_times))
}
