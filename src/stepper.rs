//! The Yee time step (spec §4.5): the hard kernel.
//!
//! Sub-steps A through G run in strict order; within each sub-step,
//! per-cell writes are independent and parallelised with Rayon via
//! `ndarray::Zip::into_par_iter` (§5: "the preferred pattern is a
//! worker pool ... with static partitioning of the outer row index").
//! The four gradient scratch buffers are allocated once in
//! `Stepper::new` and reused across steps (§9) rather than
//! re-allocated per step.

use ndarray::parallel::prelude::*;
use ndarray::{s, Array2, Zip};

use crate::config::Config;
use crate::error::FdtdError;
use crate::field::FieldSet;
use crate::mesh::MeshSet;
use crate::source::Source;

/// Holds the reusable gradient scratch buffers and the opt-in Kerr
/// flag. Stateless between steps otherwise (§4.5 "state machine").
pub struct Stepper {
    /// Opt-in Kerr correction (§4.5 Step E note, §9 Open Question 1).
    /// Disabled by default: the formula is explicitly not part of the
    /// core contract.
    pub enable_kerr: bool,
    grad_ez_dx: Array2<f64>,
    grad_ez_dy: Array2<f64>,
    grad_hy_dx: Array2<f64>,
    grad_hx_dy: Array2<f64>,
}

impl Stepper {
    pub fn new(config: &Config) -> Self {
        Self::with_kerr(config, false)
    }

    pub fn with_kerr(config: &Config, enable_kerr: bool) -> Self {
        let shape = (config.nx, config.ny);
        Self {
            enable_kerr,
            grad_ez_dx: Array2::zeros(shape),
            grad_ez_dy: Array2::zeros(shape),
            grad_hy_dx: Array2::zeros(shape),
            grad_hx_dy: Array2::zeros(shape),
        }
    }

    /// Performs sub-steps A through G of one Yee time step at
    /// `config.time()`, in place. Recording (H) and time advance (I)
    /// are the caller's (`Engine`'s) responsibility so that the
    /// recorded snapshot and the step index stay obviously in sync.
    ///
    /// Returns `NumericalInstability` if any field value becomes
    /// non-finite during this step.
    pub fn step(
        &mut self,
        config: &Config,
        mesh: &MeshSet,
        fields: &mut FieldSet,
        sources: &[Source],
    ) -> Result<(), FdtdError> {
        let (nx, ny) = (config.nx, config.ny);

        // Step A: Yee gradients of Ez.
        {
            let ez = &fields.ez;
            Zip::from(self.grad_ez_dx.slice_mut(s![0..nx - 1, ..]))
                .and(ez.slice(s![0..nx - 1, ..]))
                .and(ez.slice(s![1..nx, ..]))
                .into_par_iter()
                .for_each(|(g, &e0, &e1)| {
                    *g = (e1 - e0) / config.dx;
                });
            Zip::from(self.grad_ez_dy.slice_mut(s![.., 0..ny - 1]))
                .and(ez.slice(s![.., 0..ny - 1]))
                .and(ez.slice(s![.., 1..ny]))
                .into_par_iter()
                .for_each(|(g, &e0, &e1)| {
                    *g = (e1 - e0) / config.dy;
                });
        }

        // Step B: H update with first-order PML attenuation (§9 Open
        // Question 2: collocated with Ez, not a split-field ADE).
        {
            let mu = mesh.mu();
            let dt = config.dt;
            Zip::from(fields.hx.slice_mut(s![.., 0..ny - 1]))
                .and(self.grad_ez_dy.slice(s![.., 0..ny - 1]))
                .and(mesh.sigma_y().slice(s![.., 0..ny - 1]))
                .into_par_iter()
                .for_each(|(h, &g, &sigma_y)| {
                    *h -= (dt / mu) * g * (1.0 - sigma_y * dt / (2.0 * mu));
                });
            Zip::from(fields.hy.slice_mut(s![0..nx - 1, ..]))
                .and(self.grad_ez_dx.slice(s![0..nx - 1, ..]))
                .and(mesh.sigma_x().slice(s![0..nx - 1, ..]))
                .into_par_iter()
                .for_each(|(h, &g, &sigma_x)| {
                    *h += (dt / mu) * g * (1.0 - sigma_x * dt / (2.0 * mu));
                });
        }

        // Step C: Yee gradients of H, strict interior only.
        {
            let hy = &fields.hy;
            let hx = &fields.hx;
            Zip::from(self.grad_hy_dx.slice_mut(s![1..nx - 1, 1..ny - 1]))
                .and(hy.slice(s![0..nx - 2, 1..ny - 1]))
                .and(hy.slice(s![1..nx - 1, 1..ny - 1]))
                .into_par_iter()
                .for_each(|(g, &h0, &h1)| {
                    *g = (h1 - h0) / config.dx;
                });
            Zip::from(self.grad_hx_dy.slice_mut(s![1..nx - 1, 1..ny - 1]))
                .and(hx.slice(s![1..nx - 1, 0..ny - 2]))
                .and(hx.slice(s![1..nx - 1, 1..ny - 1]))
                .into_par_iter()
                .for_each(|(g, &h0, &h1)| {
                    *g = (h1 - h0) / config.dy;
                });
        }

        // Step D: Ez update, strict interior only.
        {
            let dt = config.dt;
            Zip::from(fields.ez.slice_mut(s![1..nx - 1, 1..ny - 1]))
                .and(mesh.eps().slice(s![1..nx - 1, 1..ny - 1]))
                .and(self.grad_hy_dx.slice(s![1..nx - 1, 1..ny - 1]))
                .and(self.grad_hx_dy.slice(s![1..nx - 1, 1..ny - 1]))
                .into_par_iter()
                .for_each(|(e, &eps, &dhy, &dhx)| {
                    *e += (dt / eps) * (dhy - dhx);
                });
        }

        // Step E: SHG nonlinearity, whole grid.
        {
            let dt = config.dt;
            Zip::from(&mut fields.ez)
                .and(mesh.gamma())
                .into_par_iter()
                .for_each(|(e, &gamma)| {
                    if gamma != 0.0 {
                        *e += gamma * *e * *e * dt;
                    }
                });
        }

        // Optional Kerr correction (disabled by default; see §9 Open
        // Question 1). Applied before the absorption clamp so that the
        // well-formed-PML absorption bound in Step F still holds.
        if self.enable_kerr {
            let dt = config.dt;
            Zip::from(&mut fields.ez)
                .and(mesh.eps())
                .and(mesh.n2())
                .into_par_iter()
                .for_each(|(e, &eps, &n2)| {
                    *e *= dt / (eps + n2 * *e * *e);
                });
        }

        // Step F: absorption, whole grid, clamped to [0,1]. Sequential:
        // the clamp-engaged flag is a scalar reduction over the whole
        // grid and isn't worth a parallel fold at this grid size.
        {
            let dt = config.dt;
            let mut clamp_engaged = false;
            Zip::from(&mut fields.ez)
                .and(mesh.eps())
                .and(mesh.sigma_x())
                .and(mesh.sigma_y())
                .for_each(|e, &eps, &sx, &sy| {
                    let raw = 1.0 - (sx + sy) * dt / (2.0 * eps);
                    if !(0.0..=1.0).contains(&raw) {
                        clamp_engaged = true;
                    }
                    *e *= raw.clamp(0.0, 1.0);
                });
            if clamp_engaged {
                log::warn!(
                    "absorption factor clamped at step {}: PML profile may be marginal",
                    config.iteration()
                );
            }
        }

        // Step G: source injection, in addition order (commutative).
        for source in sources {
            source.inject(config, fields);
        }

        if let Some((i, j)) = fields.first_non_finite() {
            log::error!(
                "numerical instability detected at step {}, cell ({i}, {j})",
                config.iteration()
            );
            return Err(FdtdError::NumericalInstability {
                step: config.iteration(),
                i,
                j,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{vacuum_light_speed, EPSILON_0, MU_0};
    use crate::mesh::MeshSet;

    fn test_config(nx: usize, ny: usize, n_steps: usize) -> Config {
        let dx = 1e-7;
        let dy = 1e-7;
        let c = vacuum_light_speed();
        let cfl_limit = 1.0 / (c * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt());
        let dt = cfl_limit * 0.95;
        let stamps: Vec<f64> = (0..n_steps).map(|k| k as f64 * dt).collect();
        Config::new(dx, dy, dt, nx, ny, stamps).unwrap()
    }

    #[test]
    fn stays_finite_on_vacuum_impulse() {
        let config = test_config(41, 41, 60);
        let mesh = MeshSet::vacuum(&config, EPSILON_0, MU_0).unwrap();
        let mut fields = FieldSet::zeros(&config);
        let mut stepper = Stepper::new(&config);
        let mut config = config;

        let source =
            Source::impulsion(&config, 1.0, config.dt * 2.0, config.dt * 5.0, vec![(20, 20)])
                .unwrap();
        let sources = vec![source];

        for _ in 0..config.n_steps() {
            stepper.step(&config, &mesh, &mut fields, &sources).unwrap();
            assert!(fields.is_finite());
            if config.iteration() + 1 < config.n_steps() {
                config.advance().unwrap();
            } else {
                break;
            }
        }
    }

    #[test]
    fn boundary_ez_unchanged_by_step_d() {
        // With no sources and a vacuum mesh, the boundary row/column of
        // Ez (outside Step D's interior range) never receives a direct
        // curl contribution in a single step.
        let config = test_config(10, 10, 3);
        let mesh = MeshSet::vacuum(&config, EPSILON_0, MU_0).unwrap();
        let mut fields = FieldSet::zeros(&config);
        let mut stepper = Stepper::new(&config);
        stepper.step(&config, &mesh, &mut fields, &[]).unwrap();
        for i in 0..10 {
            assert_eq!(fields.ez[[i, 0]], 0.0);
            assert_eq!(fields.ez[[i, 9]], 0.0);
        }
        for j in 0..10 {
            assert_eq!(fields.ez[[0, j]], 0.0);
            assert_eq!(fields.ez[[9, j]], 0.0);
        }
    }

    #[test]
    fn pml_damps_boundary_reflection_more_than_vacuum() {
        let config = test_config(80, 80, 120);
        let mesh_vac = MeshSet::vacuum(&config, EPSILON_0, MU_0).unwrap();
        let mesh_pml =
            MeshSet::with_pml(&config, EPSILON_0, MU_0, 12, 3.0, 0.6 * 2.0 * MU_0 / config.dt)
                .unwrap();

        let run = |mesh: &MeshSet| -> f64 {
            let mut fields = FieldSet::zeros(&config);
            let mut stepper = Stepper::new(&config);
            let mut cfg = config.clone();
            let source =
                Source::impulsion(&cfg, 1.0, cfg.dt * 3.0, cfg.dt * 6.0, vec![(40, 40)]).unwrap();
            let sources = vec![source];
            for _ in 0..cfg.n_steps() {
                stepper.step(&cfg, mesh, &mut fields, &sources).unwrap();
                if cfg.iteration() + 1 < cfg.n_steps() {
                    cfg.advance().unwrap();
                } else {
                    break;
                }
            }
            fields.l2_norm()
        };

        let norm_vacuum = run(&mesh_vac);
        let norm_pml = run(&mesh_pml);
        assert!(norm_pml < norm_vacuum);
    }
}
