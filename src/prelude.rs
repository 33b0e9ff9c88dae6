pub use crate::compartment::Compartment;
pub use crate::dataset::{Prevalence, SeroprevalenceDataset};
pub use crate::error::SeirvError;
pub use crate::integrator::IntegrationMethod;
pub use crate::parameters::{Parameters, ParametersBuilder, Rates};
pub use crate::report::{write_csv, write_trajectory_report, ReportOptions};
pub use crate::simulator::{simulate, simulate_with_progress};
pub use crate::state::SimulationState;
pub use crate::trajectory::{SimulationSummary, Trajectory, TrajectoryPoint};
pub use crate::{debug, error, info, trace, warn};
