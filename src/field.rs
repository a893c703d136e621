//! Working field state (spec §4.3): Ez, Hx, Hy on the Yee lattice.
//!
//! All three arrays are allocated at shape `(nx, ny)`; only the
//! sub-ranges documented in §3 carry meaningful H values; the remainder
//! is padding that stays zero for the lifetime of the run.

use ndarray::Array2;

use crate::config::Config;

/// Mutable electromagnetic state. Constructed zeroed and mutated in
/// place by the `Stepper`.
#[derive(Debug, Clone)]
pub struct FieldSet {
    pub ez: Array2<f64>,
    pub hx: Array2<f64>,
    pub hy: Array2<f64>,
}

impl FieldSet {
    pub fn zeros(config: &Config) -> Self {
        let shape = (config.nx, config.ny);
        Self {
            ez: Array2::zeros(shape),
            hx: Array2::zeros(shape),
            hy: Array2::zeros(shape),
        }
    }

    /// Resets all three fields to zero in place.
    pub fn zero(&mut self) {
        self.ez.fill(0.0);
        self.hx.fill(0.0);
        self.hy.fill(0.0);
    }

    /// True iff every value in Ez, Hx, and Hy is finite.
    pub fn is_finite(&self) -> bool {
        self.ez.iter().all(|v| v.is_finite())
            && self.hx.iter().all(|v| v.is_finite())
            && self.hy.iter().all(|v| v.is_finite())
    }

    /// Returns the `(i, j)` of the first non-finite cell found across
    /// Ez, Hx, Hy, in that scan order, or `None` if all are finite.
    /// Used to attach cell context to `NumericalInstability`.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        for arr in [&self.ez, &self.hx, &self.hy] {
            for ((i, j), v) in arr.indexed_iter() {
                if !v.is_finite() {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// L2 norm of the combined (Ez, Hx, Hy) state, used by property
    /// tests to bound amplification.
    pub fn l2_norm(&self) -> f64 {
        let sum_sq: f64 = self.ez.iter().map(|v| v * v).sum::<f64>()
            + self.hx.iter().map(|v| v * v).sum::<f64>()
            + self.hy.iter().map(|v| v * v).sum::<f64>();
        sum_sq.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{vacuum_light_speed, Config};

    fn test_config(nx: usize, ny: usize) -> Config {
        let dx = 1e-7;
        let dy = 1e-7;
        let c = vacuum_light_speed();
        let cfl_limit = 1.0 / (c * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt());
        let dt = cfl_limit * 0.95;
        let stamps: Vec<f64> = (0..5).map(|k| k as f64 * dt).collect();
        Config::new(dx, dy, dt, nx, ny, stamps).unwrap()
    }

    #[test]
    fn zeros_are_finite_and_zero_norm() {
        let config = test_config(8, 8);
        let fields = FieldSet::zeros(&config);
        assert!(fields.is_finite());
        assert_eq!(fields.l2_norm(), 0.0);
    }

    #[test]
    fn zero_resets_nonzero_state() {
        let config = test_config(4, 4);
        let mut fields = FieldSet::zeros(&config);
        fields.ez[[1, 1]] = 5.0;
        fields.zero();
        assert!(fields.ez.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn detects_first_non_finite_cell() {
        let config = test_config(4, 4);
        let mut fields = FieldSet::zeros(&config);
        assert!(fields.first_non_finite().is_none());
        fields.hy[[2, 3]] = f64::NAN;
        assert_eq!(fields.first_non_finite(), Some((2, 3)));
    }
}
