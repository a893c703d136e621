//! Material maps on the Ez grid (spec §4.2): permittivity, Kerr and SHG
//! coefficients, and the PML conductivity profile.
//!
//! `MeshSet` is plain data once constructed. All validation happens in
//! `MeshSet::new` (§7: "validation happens once at run start").

use ndarray::Array2;

use crate::config::Config;
use crate::error::FdtdError;

/// Material maps, all shape `(nx, ny)`.
#[derive(Debug, Clone)]
pub struct MeshSet {
    /// Absolute permittivity ε(i,j), F/m. Strictly positive.
    eps: Array2<f64>,
    /// Kerr nonlinear coefficient n²(i,j). May be all-zero.
    n2: Array2<f64>,
    /// SHG coefficient γ(i,j). May be all-zero.
    gamma: Array2<f64>,
    /// PML conductivity, x component. Zero outside PML bands.
    sigma_x: Array2<f64>,
    /// PML conductivity, y component. Zero outside PML bands.
    sigma_y: Array2<f64>,
    /// Scalar magnetic permeability, H/m.
    mu: f64,
}

impl MeshSet {
    /// Validates shapes and I1/I2, and the Step B stability
    /// precondition `sigma_max * dt / (2 mu) <= 1` for both
    /// conductivity components, before accepting the mesh.
    pub fn new(
        config: &Config,
        eps: Array2<f64>,
        n2: Array2<f64>,
        gamma: Array2<f64>,
        sigma_x: Array2<f64>,
        sigma_y: Array2<f64>,
        mu: f64,
    ) -> Result<Self, FdtdError> {
        let expected = (config.nx, config.ny);
        for (name, arr) in [
            ("eps", &eps),
            ("n2", &n2),
            ("gamma", &gamma),
            ("sigma_x", &sigma_x),
            ("sigma_y", &sigma_y),
        ] {
            if arr.dim() != expected {
                return Err(FdtdError::ShapeMismatch {
                    expected: (expected.0, expected.1, 0),
                    got: (arr.dim().0, arr.dim().1, 0),
                })
                .map_err(|e| {
                    log::error!("mesh array '{name}' has shape mismatch");
                    e
                });
            }
        }

        if mu <= 0.0 {
            return Err(FdtdError::InvalidParameter(
                "mu must be strictly positive".to_string(),
            ));
        }

        if eps.iter().any(|&e| e <= 0.0) {
            return Err(FdtdError::InvalidParameter(
                "eps must be strictly positive everywhere".to_string(),
            ));
        }
        if sigma_x.iter().any(|&s| s < 0.0) || sigma_y.iter().any(|&s| s < 0.0) {
            return Err(FdtdError::InvalidParameter(
                "sigma_x/sigma_y must be non-negative everywhere".to_string(),
            ));
        }

        let sigma_x_max = sigma_x.iter().cloned().fold(0.0_f64, f64::max);
        let sigma_y_max = sigma_y.iter().cloned().fold(0.0_f64, f64::max);
        for (name, sigma_max) in [("sigma_x", sigma_x_max), ("sigma_y", sigma_y_max)] {
            let loss_term = sigma_max * config.dt / (2.0 * mu);
            if loss_term > 1.0 {
                return Err(FdtdError::InvalidParameter(format!(
                    "{name}_max * dt / (2*mu) = {loss_term} exceeds 1.0"
                )));
            }
        }

        Ok(Self {
            eps,
            n2,
            gamma,
            sigma_x,
            sigma_y,
            mu,
        })
    }

    /// A lossless, linear, PML-free vacuum mesh: ε = eps0 everywhere,
    /// n² = γ = σx = σy = 0, μ as given.
    pub fn vacuum(config: &Config, eps0: f64, mu: f64) -> Result<Self, FdtdError> {
        let shape = (config.nx, config.ny);
        Self::new(
            config,
            Array2::from_elem(shape, eps0),
            Array2::zeros(shape),
            Array2::zeros(shape),
            Array2::zeros(shape),
            Array2::zeros(shape),
            mu,
        )
    }

    /// A vacuum mesh with PML conductivity bands of `width` cells on
    /// all four sides, polynomial order `order`, ramping from 0 at the
    /// PML's inner edge to `sigma_max` at the domain boundary (§3):
    /// `sigma(d) = sigma_max * (d/width)^order`.
    pub fn with_pml(
        config: &Config,
        eps0: f64,
        mu: f64,
        width: usize,
        order: f64,
        sigma_max: f64,
    ) -> Result<Self, FdtdError> {
        let (nx, ny) = (config.nx, config.ny);
        let mut sigma_x = Array2::<f64>::zeros((nx, ny));
        let mut sigma_y = Array2::<f64>::zeros((nx, ny));

        let ramp = |depth_from_edge: usize| -> f64 {
            let d = (width.saturating_sub(depth_from_edge)) as f64;
            let frac = (d / width as f64).clamp(0.0, 1.0);
            sigma_max * frac.powf(order)
        };

        for i in 0..nx {
            let x_sigma = if i < width {
                ramp(i)
            } else if i >= nx - width {
                ramp(nx - 1 - i)
            } else {
                0.0
            };
            for j in 0..ny {
                sigma_x[[i, j]] = x_sigma;
            }
        }
        for j in 0..ny {
            let y_sigma = if j < width {
                ramp(j)
            } else if j >= ny - width {
                ramp(ny - 1 - j)
            } else {
                0.0
            };
            for i in 0..nx {
                sigma_y[[i, j]] = y_sigma;
            }
        }

        Self::new(
            config,
            Array2::from_elem((nx, ny), eps0),
            Array2::zeros((nx, ny)),
            Array2::zeros((nx, ny)),
            sigma_x,
            sigma_y,
            mu,
        )
    }

    pub fn eps(&self) -> &Array2<f64> {
        &self.eps
    }

    pub fn n2(&self) -> &Array2<f64> {
        &self.n2
    }

    pub fn gamma(&self) -> &Array2<f64> {
        &self.gamma
    }

    pub fn sigma_x(&self) -> &Array2<f64> {
        &self.sigma_x
    }

    pub fn sigma_y(&self) -> &Array2<f64> {
        &self.sigma_y
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{vacuum_light_speed, EPSILON_0, MU_0};

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
    fn vacuum_mesh_is_valid() {
        let config = test_config(8, 8);
        let mesh = MeshSet::vacuum(&config, EPSILON_0, MU_0).unwrap();
        assert!(mesh.eps().iter().all(|&e| e == EPSILON_0));
        assert!(mesh.sigma_x().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn rejects_non_positive_eps() {
        let config = test_config(4, 4);
        let shape = (4, 4);
        let err = MeshSet::new(
            &config,
            Array2::zeros(shape),
            Array2::zeros(shape),
            Array2::zeros(shape),
            Array2::zeros(shape),
            Array2::zeros(shape),
            MU_0,
        )
        .unwrap_err();
        assert!(matches!(err, FdtdError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_shape_mismatch() {
        let config = test_config(4, 4);
        let err = MeshSet::new(
            &config,
            Array2::from_elem((3, 4), EPSILON_0),
            Array2::zeros((4, 4)),
            Array2::zeros((4, 4)),
            Array2::zeros((4, 4)),
            Array2::zeros((4, 4)),
            MU_0,
        )
        .unwrap_err();
        assert!(matches!(err, FdtdError::ShapeMismatch { .. }));
    }

    #[test]
    fn pml_ramp_vanishes_in_interior_and_peaks_at_edge() {
        let config = test_config(40, 40);
        let mesh = MeshSet::with_pml(&config, EPSILON_0, MU_0, 10, 3.0, 1e8).unwrap();
        assert_eq!(mesh.sigma_x()[[20, 20]], 0.0);
        assert_eq!(mesh.sigma_y()[[20, 20]], 0.0);
        assert!(mesh.sigma_x()[[0, 20]] > 0.0);
        assert!(mesh.sigma_x()[[39, 20]] > 0.0);
    }
}
