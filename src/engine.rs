//! Run orchestration (spec §4.6): drives the Stepper across every time
//! stamp and records Ez into a caller-provided buffer.

use ndarray::ArrayViewMut3;

use crate::config::Config;
use crate::error::FdtdError;
use crate::field::FieldSet;
use crate::mesh::MeshSet;
use crate::source::Source;
use crate::stepper::Stepper;

/// The one synchronous entry point (§4.5 "Suspension/blocking"): a
/// single `run` call that returns when all steps complete, a
/// `NumericalInstability`, or a validation failure.
pub struct Engine {
    config: Config,
    mesh: MeshSet,
    fields: FieldSet,
    sources: Vec<Source>,
    stepper: Stepper,
}

impl Engine {
    pub fn new(config: Config, mesh: MeshSet, sources: Vec<Source>) -> Self {
        let fields = FieldSet::zeros(&config);
        let stepper = Stepper::new(&config);
        Self {
            config,
            mesh,
            fields,
            sources,
            stepper,
        }
    }

    pub fn with_kerr(config: Config, mesh: MeshSet, sources: Vec<Source>, enable_kerr: bool) -> Self {
        let fields = FieldSet::zeros(&config);
        let stepper = Stepper::with_kerr(&config, enable_kerr);
        Self {
            config,
            mesh,
            fields,
            sources,
            stepper,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Runs the whole time-stamp sequence, writing Ez into
    /// `ez_time[k, :, :]` immediately after source injection for step
    /// k (§4.6 "After return, Ez_time[k,i,j] is the recorded Ez... ").
    ///
    /// Validates `ez_time`'s shape against `(N_steps, nx, ny)` before
    /// executing any step; on `NumericalInstability`, the rows up
    /// to and including the last good step remain written and the
    /// error is returned with the offending step/cell.
    pub fn run(&mut self, mut ez_time: ArrayViewMut3<f64>) -> Result<(), FdtdError> {
        let expected = (self.config.n_steps(), self.config.nx, self.config.ny);
        if ez_time.dim() != expected {
            log::error!(
                "recording buffer shape {:?} does not match expected {:?}",
                ez_time.dim(),
                expected
            );
            return Err(FdtdError::ShapeMismatch {
                expected: (expected.0, expected.1, expected.2),
                got: ez_time.dim(),
            });
        }

        log::debug!(
            "starting run: grid=({}, {}), dt={}, n_steps={}",
            self.config.nx,
            self.config.ny,
            self.config.dt,
            self.config.n_steps()
        );

        let n_steps = self.config.n_steps();
        for _ in 0..n_steps {
            self.stepper
                .step(&self.config, &self.mesh, &mut self.fields, &self.sources)?;

            // Step H: record the full Ez snapshot for this iteration.
            let k = self.config.iteration();
            ez_time.slice_mut(ndarray::s![k, .., ..]).assign(&self.fields.ez);

            // Step I: advance the time index, unless this was the last step.
            if k + 1 < n_steps {
                self.config.advance()?;
            } else {
                break;
            }
        }

        Ok(())
    }
}
