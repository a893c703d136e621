//! A 2-D transverse-magnetic (Ez, Hx, Hy) finite-difference time-domain
//! electromagnetic solver on a Yee lattice, with first-order PML
//! absorption, polymorphic sources, and an optional SHG/Kerr
//! nonlinearity.
//!
//! The crate exposes five plain-data modules (`config`, `mesh`,
//! `field`, `source`) plus the two components that do the work:
//! `stepper::Stepper` advances the field state by one time step;
//! `engine::Engine` drives the full time-stamp sequence and records
//! Ez into a caller-provided buffer.
//!
//! ```no_run
//! use fdtd_core::config::{vacuum_light_speed, Config, EPSILON_0, MU_0};
//! use fdtd_core::engine::Engine;
//! use fdtd_core::mesh::MeshSet;
//! use fdtd_core::source::Source;
//! use ndarray::Array3;
//!
//! # fn main() -> Result<(), fdtd_core::error::FdtdError> {
//! let dx = 1e-7;
//! let dy = 1e-7;
//! let c = vacuum_light_speed();
//! let cfl_limit = 1.0 / (c * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt());
//! let dt = cfl_limit * 0.95;
//! let n_steps = 200;
//! let time_stamps: Vec<f64> = (0..n_steps).map(|k| k as f64 * dt).collect();
//!
//! let config = Config::new(dx, dy, dt, 101, 101, time_stamps)?;
//! let mesh = MeshSet::vacuum(&config, EPSILON_0, MU_0)?;
//! let source = Source::impulsion(&config, 1.0, dt * 2.0, dt * 5.0, vec![(50, 50)])?;
//! let mut engine = Engine::new(config.clone(), mesh, vec![source]);
//!
//! let mut ez_time = Array3::<f64>::zeros((config.n_steps(), config.nx, config.ny));
//! engine.run(ez_time.view_mut())?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod mesh;
pub mod source;
pub mod stepper;

pub use config::Config;
pub use engine::Engine;
pub use error::FdtdError;
pub use field::FieldSet;
pub use mesh::MeshSet;
pub use source::Source;
pub use stepper::Stepper;
