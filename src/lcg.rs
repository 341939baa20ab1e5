//! Park–Miller minimal standard generator.
//!
//! The multiplication `MULTIPLIER * seed` is split with Schrage's method so that
//! it never leaves the signed 64 bit range. The generated sequence is a pure
//! function of the starting seed, so every worker must thread its own seed
//! through every call.

pub const MODULUS: i64 = 2147483647; // 2^31 - 1
pub const MULTIPLIER: i64 = 16807;
pub const QUOTIENT: i64 = MODULUS / MULTIPLIER; // 127773
pub const REMAINDER: i64 = MODULUS % MULTIPLIER; // 2836

/// Seeds outside of `[1, MODULUS)` do not produce a full period (zero is a fixed point).
pub fn is_valid_seed(seed: i64) -> bool {
  return seed > 0 && seed < MODULUS;
}

/// Advances `seed` and maps it onto the closed range `[min, max]`.
///
/// `max < min` and invalid seeds are not checked.
pub fn next_in_range(min: i64, max: i64, seed: &mut i64) -> i64 {
  let hi = *seed / QUOTIENT;
  let lo = *seed % QUOTIENT;
  *seed = MULTIPLIER * lo - hi * REMAINDER;
  if *seed < 0 {
    *seed += MODULUS;
  }

  let normalized = *seed as f64 / MODULUS as f64;
  return (normalized * (max - min + 1) as f64) as i64 + min;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LehmerRng {
  seed: i64,
}

impl LehmerRng {
  pub fn new(seed: i64) -> Self {
    debug_assert!(is_valid_seed(seed), "Invalid seed {}", seed);
    return Self { seed: seed };
  }

  pub fn seed(&self) -> i64 {
    return self.seed;
  }

  pub fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
    return next_in_range(min, max, &mut self.seed);
  }

  /// Uniform index in `[low, high]`.
  pub fn next_index(&mut self, low: usize, high: usize) -> usize {
    return self.next_in_range(low as i64, high as i64) as usize;
  }
}
