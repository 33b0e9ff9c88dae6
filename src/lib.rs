//! A deterministic SEIRV model of Q Fever spread among livestock
//!
//! A herd is split into five compartments: Susceptible, Exposed, Infectious, Recovered and
//! Vaccinated. Their sizes evolve according to
//!
//! ```text
//! dS/dt = -β S I / N - ν S
//! dE/dt =  β S I / N - σ E
//! dI/dt =  σ E - γ I
//! dR/dt =  γ I
//! dV/dt =  ν S
//! ```
//!
//! which [`simulate`] integrates with a fixed step size from an initial state to a horizon,
//! returning the full [`Trajectory`]. A run is a pure function of its [`Parameters`]:
//!
//! ```rust
//! use qfever::prelude::*;
//!
//! let parameters = ParametersBuilder::default()
//!     .rates(Rates::new(0.3, 0.2, 0.1, 0.0))
//!     .horizon(50.0)
//!     .dt(0.1)
//!     .initial(SimulationState::new(990.0, 5.0, 5.0, 0.0, 0.0))
//!     .build()
//!     .unwrap();
//! let trajectory = simulate(&parameters).unwrap();
//! assert_eq!(trajectory.len(), 501);
//! ```
//!
//! Around the core sit the pieces the `qfever` binary needs:
//! * [`dataset`] reads regional seroprevalence surveys and seeds the initial infectious count.
//! * [`report`] writes a trajectory as CSV.
//! * [`runner`] parses the command line, loads a JSON parameters file and ties it together.
pub mod compartment;
pub mod dataset;
pub mod error;
pub mod integrator;
pub mod log;
pub mod macros;
pub mod model;
pub mod numeric;
pub mod parameters;
#[cfg(feature = "progress_bar")]
pub mod progress;
pub mod report;
pub mod runner;
pub mod simulator;
pub mod state;
pub mod trajectory;

pub mod prelude;

pub use crate::compartment::Compartment;
pub use crate::error::SeirvError;
pub use crate::integrator::IntegrationMethod;
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::parameters::{Parameters, ParametersBuilder, Rates};
pub use crate::simulator::{simulate, simulate_with_progress};
pub use crate::state::SimulationState;
pub use crate::trajectory::{SimulationSummary, Trajectory, TrajectoryPoint};
