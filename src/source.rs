//! Time-dependent sources (spec §4.4).
//!
//! Every variant obeys the same additive contract: at the *current*
//! simulated time, add a scalar contribution to Ez at a fixed set of
//! injection cells. Injections from different sources commute (§5);
//! dispatch is a static enum + match, since the list of sources is
//! small (§9).

use std::f64::consts::PI;

use crate::config::Config;
use crate::error::FdtdError;
use crate::field::FieldSet;

fn validate_indices(idx: &[(usize, usize)], nx: usize, ny: usize) -> Result<(), FdtdError> {
    for (n, &(x, y)) in idx.iter().enumerate() {
        if x >= nx || y >= ny {
            return Err(FdtdError::SourceOutOfBounds {
                index: n,
                x: x as i64,
                y: y as i64,
                nx,
                ny,
            });
        }
    }
    Ok(())
}

/// Orientation of a `PlaneWave` injection line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Injection along a constant-x line (varies over j).
    X,
    /// Injection along a constant-y line (varies over i).
    Y,
}

/// A single excitation mechanism additive to Ez.
#[derive(Debug, Clone)]
pub enum Source {
    /// Continuous multi-wavelength source (§4.4): at each injection
    /// cell, `Ez += sum_k A[k] * cos(omega[k] * t + phi[k])`.
    MultiWavelength {
        omega: Vec<f64>,
        amplitude: Vec<f64>,
        phase: Vec<f64>,
        idx: Vec<(usize, usize)>,
    },
    /// Gaussian impulsion (§4.4): at each injection cell,
    /// `Ez += A * exp(-((t - t0) / tau)^2)`.
    Impulsion {
        amplitude: f64,
        tau: f64,
        t0: f64,
        idx: Vec<(usize, usize)>,
    },
    /// Plane-wave line source (§4.4, §9 "implementers MAY add further
    /// variants"): a continuous sinusoid injected uniformly along an
    /// entire row or column.
    PlaneWave {
        axis: Axis,
        position: usize,
        omega: f64,
        amplitude: f64,
        phase: f64,
    },
    /// Ricker wavelet (second derivative of a Gaussian), a
    /// sharper-spectrum alternative to `Impulsion`.
    Ricker {
        amplitude: f64,
        tau: f64,
        t0: f64,
        idx: Vec<(usize, usize)>,
    },
}

impl Source {
    /// Builds a `MultiWavelength` source, validating that `omega`,
    /// `amplitude`, and `phase` share a length and that every
    /// injection index lies in `[0,nx) x [0,ny)`.
    pub fn multi_wavelength(
        config: &Config,
        omega: Vec<f64>,
        amplitude: Vec<f64>,
        phase: Vec<f64>,
        idx: Vec<(usize, usize)>,
    ) -> Result<Self, FdtdError> {
        if omega.len() != amplitude.len() || omega.len() != phase.len() {
            return Err(FdtdError::InvalidParameter(
                "omega, amplitude, and phase must share the same length".to_string(),
            ));
        }
        validate_indices(&idx, config.nx, config.ny)?;
        Ok(Self::MultiWavelength {
            omega,
            amplitude,
            phase,
            idx,
        })
    }

    /// Builds an `Impulsion` source.
    pub fn impulsion(
        config: &Config,
        amplitude: f64,
        tau: f64,
        t0: f64,
        idx: Vec<(usize, usize)>,
    ) -> Result<Self, FdtdError> {
        if tau <= 0.0 {
            return Err(FdtdError::InvalidParameter(
                "impulsion duration tau must be strictly positive".to_string(),
            ));
        }
        validate_indices(&idx, config.nx, config.ny)?;
        Ok(Self::Impulsion {
            amplitude,
            tau,
            t0,
            idx,
        })
    }

    /// Builds a `PlaneWave` source along a constant-x or constant-y
    /// line.
    pub fn plane_wave(
        config: &Config,
        axis: Axis,
        position: usize,
        omega: f64,
        amplitude: f64,
        phase: f64,
    ) -> Result<Self, FdtdError> {
        let bound = match axis {
            Axis::X => config.nx,
            Axis::Y => config.ny,
        };
        if position >= bound {
            return Err(FdtdError::SourceOutOfBounds {
                index: 0,
                x: position as i64,
                y: position as i64,
                nx: config.nx,
                ny: config.ny,
            });
        }
        Ok(Self::PlaneWave {
            axis,
            position,
            omega,
            amplitude,
            phase,
        })
    }

    /// Builds a `Ricker` wavelet source.
    pub fn ricker(
        config: &Config,
        amplitude: f64,
        tau: f64,
        t0: f64,
        idx: Vec<(usize, usize)>,
    ) -> Result<Self, FdtdError> {
        if tau <= 0.0 {
            return Err(FdtdError::InvalidParameter(
                "ricker duration tau must be strictly positive".to_string(),
            ));
        }
        validate_indices(&idx, config.nx, config.ny)?;
        Ok(Self::Ricker {
            amplitude,
            tau,
            t0,
            idx,
        })
    }

    /// Adds this source's contribution to Ez at `config.time()` (§4.5
    /// Step G: the current, about-to-be-recorded time).
    pub fn inject(&self, config: &Config, fields: &mut FieldSet) {
        let t = config.time();
        match self {
            Source::MultiWavelength {
                omega,
                amplitude,
                phase,
                idx,
            } => {
                let value: f64 = omega
                    .iter()
                    .zip(amplitude.iter())
                    .zip(phase.iter())
                    .map(|((w, a), p)| a * (w * t + p).cos())
                    .sum();
                for &(x, y) in idx {
                    fields.ez[[x, y]] += value;
                }
            }
            Source::Impulsion {
                amplitude,
                tau,
                t0,
                idx,
            } => {
                let arg = (t - t0) / tau;
                let value = amplitude * (-arg * arg).exp();
                for &(x, y) in idx {
                    fields.ez[[x, y]] += value;
                }
            }
            Source::PlaneWave {
                axis,
                position,
                omega,
                amplitude,
                phase,
            } => {
                let value = amplitude * (omega * t + phase).cos();
                match axis {
                    Axis::X => {
                        let ny = fields.ez.shape()[1];
                        for y in 0..ny {
                            fields.ez[[*position, y]] += value;
                        }
                    }
                    Axis::Y => {
                        let nx = fields.ez.shape()[0];
                        for x in 0..nx {
                            fields.ez[[x, *position]] += value;
                        }
                    }
                }
            }
            Source::Ricker {
                amplitude,
                tau,
                t0,
                idx,
            } => {
                let arg = (t - t0) / tau;
                let arg2 = arg * arg;
                let value = amplitude * (1.0 - 2.0 * arg2) * (-arg2).exp();
                for &(x, y) in idx {
                    fields.ez[[x, y]] += value;
                }
            }
        }
    }
}

/// Angular frequency for a vacuum wavelength, `omega = 2*pi*c/lambda`.
/// Convenience for building `MultiWavelength`/`PlaneWave` sources from a
/// wavelength rather than a raw angular frequency.
pub fn omega_from_wavelength(wavelength: f64, c: f64) -> f64 {
    2.0 * PI * c / wavelength
}
