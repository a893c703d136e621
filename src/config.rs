//! Grid and time parameters (spec §4.1).
//!
//! `Config` is constructed once per run and treated as immutable aside
//! from the `iteration`/`time` counters that the `Engine` advances one
//! step at a time.

use crate::error::FdtdError;

/// Vacuum permittivity, F/m.
pub const EPSILON_0: f64 = 8.854_187_812_8e-12;
/// Vacuum permeability, H/m.
pub const MU_0: f64 = 1.256_637_062_12e-6;

/// Speed of light in vacuum, m/s, derived from `EPSILON_0`/`MU_0` rather
/// than hard-coded so the CFL check stays internally consistent.
pub fn vacuum_light_speed() -> f64 {
    1.0 / (MU_0 * EPSILON_0).sqrt()
}

/// Immutable grid/time parameters plus the run's step counter.
#[derive(Debug, Clone)]
pub struct Config {
    pub dx: f64,
    pub dy: f64,
    pub dt: f64,
    pub nx: usize,
    pub ny: usize,
    time_stamps: Vec<f64>,
    iteration: usize,
    time: f64,
}

impl Config {
    /// Validates and builds a `Config`.
    ///
    /// Checks (§3, §7): `nx, ny >= 2`; `time_stamps` non-empty and
    /// strictly increasing; `dt` within the CFL bound for the
    /// background (vacuum) light speed.
    pub fn new(
        dx: f64,
        dy: f64,
        dt: f64,
        nx: usize,
        ny: usize,
        time_stamps: Vec<f64>,
    ) -> Result<Self, FdtdError> {
        if nx < 2 || ny < 2 {
            return Err(FdtdError::InvalidParameter(format!(
                "grid must be at least 2x2, got ({nx}, {ny})"
            )));
        }
        if dx <= 0.0 || dy <= 0.0 || dt <= 0.0 {
            return Err(FdtdError::InvalidParameter(
                "dx, dy, and dt must be strictly positive".to_string(),
            ));
        }
        if time_stamps.is_empty() {
            return Err(FdtdError::InvalidParameter(
                "time_stamps must be non-empty".to_string(),
            ));
        }
        if time_stamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FdtdError::InvalidParameter(
                "time_stamps must be strictly increasing".to_string(),
            ));
        }

        let c = vacuum_light_speed();
        let cfl_limit = 1.0 / (c * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt());
        if dt > cfl_limit {
            return Err(FdtdError::InvalidParameter(format!(
                "dt={dt} exceeds the CFL stability limit {cfl_limit} for dx={dx}, dy={dy}"
            )));
        }

        let time = time_stamps[0];
        Ok(Self {
            dx,
            dy,
            dt,
            nx,
            ny,
            time_stamps,
            iteration: 0,
            time,
        })
    }

    pub fn n_steps(&self) -> usize {
        self.time_stamps.len()
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_stamps(&self) -> &[f64] {
        &self.time_stamps
    }

    /// Advances the step counter and, if there is a next time stamp,
    /// sets `time` to it. Advancing past the last step is a fatal
    /// programmer error (§4.1).
    pub fn advance(&mut self) -> Result<(), FdtdError> {
        if self.iteration + 1 >= self.n_steps() {
            self.iteration += 1;
            return Ok(());
        }
        self.iteration += 1;
        self.time = self.time_stamps[self.iteration];
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.iteration >= self.n_steps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linspace(start: f64, step: f64, n: usize) -> Vec<f64> {
        (0..n).map(|k| start + k as f64 * step).collect()
    }

    #[test]
    fn rejects_non_increasing_time_stamps() {
        let err = Config::new(1e-7, 1e-7, 1e-16, 10, 10, vec![0.0, 1.0, 0.5]).unwrap_err();
        assert!(matches!(err, FdtdError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_empty_time_stamps() {
        let err = Config::new(1e-7, 1e-7, 1e-16, 10, 10, vec![]).unwrap_err();
        assert!(matches!(err, FdtdError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_cfl_violation() {
        let dx = 1e-7;
        let dy = 1e-7;
        let c = vacuum_light_speed();
        let cfl_limit = 1.0 / (c * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt());
        let err = Config::new(dx, dy, cfl_limit * 1.5, 10, 10, linspace(0.0, cfl_limit, 5))
            .unwrap_err();
        assert!(matches!(err, FdtdError::InvalidParameter(_)));
    }

    #[test]
    fn advance_tracks_time_stamps() {
        let stamps = linspace(0.0, 1e-16, 5);
        let dx = 1e-7;
        let dy = 1e-7;
        let c = vacuum_light_speed();
        let cfl_limit = 1.0 / (c * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt());
        let mut config = Config::new(dx, dy, cfl_limit * 0.5, 10, 10, stamps.clone()).unwrap();
        assert_eq!(config.time(), stamps[0]);
        for expected in stamps.iter().skip(1) {
            config.advance().unwrap();
            assert_eq!(config.time(), *expected);
        }
    }
}
