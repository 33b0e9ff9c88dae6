//! The configuration record for one simulation run.
//!
//! `Parameters` can be built in code with [`ParametersBuilder`] or loaded from a JSON file. Every
//! field has a default, so a config file only needs the values it changes:
//!
//! ```json
//! {
//!     "rates": { "beta": 0.3, "sigma": 0.2, "gamma": 0.1, "nu": 0.0 },
//!     "horizon": 50.0,
//!     "dt": 0.1,
//!     "method": "rk4",
//!     "initial": { "s": 990, "e": 5, "i": 5 }
//! }
//! ```
use std::fs;
use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::SeirvError;
use crate::integrator::IntegrationMethod;
use crate::log::debug;
use crate::numeric::step_count;
use crate::state::SimulationState;

// One year in weekly steps for a 1000-head herd with 10 infectious animals.
pub const DEFAULT_BETA: f64 = 0.3;
pub const DEFAULT_SIGMA: f64 = 0.2;
pub const DEFAULT_GAMMA: f64 = 0.1;
pub const DEFAULT_NU: f64 = 0.01;
pub const DEFAULT_HORIZON: f64 = 52.0;
pub const DEFAULT_DT: f64 = 1.0;
pub const DEFAULT_POPULATION: u64 = 1000;
const DEFAULT_INITIAL: SimulationState = SimulationState {
    s: 990.0,
    e: 0.0,
    i: 10.0,
    r: 0.0,
    v: 0.0,
};

/// Per-unit-time transition rates.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rates {
    /// Transmission rate (β)
    pub beta: f64,
    /// Progression rate from exposed to infectious (σ)
    pub sigma: f64,
    /// Recovery rate (γ)
    pub gamma: f64,
    /// Vaccination rate of susceptibles (ν)
    pub nu: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Rates {
            beta: DEFAULT_BETA,
            sigma: DEFAULT_SIGMA,
            gamma: DEFAULT_GAMMA,
            nu: DEFAULT_NU,
        }
    }
}

impl Rates {
    #[must_use]
    pub fn new(beta: f64, sigma: f64, gamma: f64, nu: f64) -> Self {
        Rates {
            beta,
            sigma,
            gamma,
            nu,
        }
    }

    /// Basic reproduction number β/γ in a fully susceptible, unvaccinated herd. Infinite when
    /// γ = 0.
    #[must_use]
    pub fn r0(&self) -> f64 {
        if self.gamma == 0.0 {
            f64::INFINITY
        } else {
            self.beta / self.gamma
        }
    }

    /// # Errors
    ///
    /// Returns `SeirvError::InvalidParameter` if any rate is negative or not finite.
    pub fn validate(&self) -> Result<(), SeirvError> {
        for (name, value) in [
            ("beta", self.beta),
            ("sigma", self.sigma),
            ("gamma", self.gamma),
            ("nu", self.nu),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SeirvError::InvalidParameter(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct Parameters {
    #[builder(default)]
    pub rates: Rates,

    /// Simulation horizon T, in the same time unit as the rates.
    #[builder(default = "DEFAULT_HORIZON")]
    pub horizon: f64,

    /// Step size Δt.
    #[builder(default = "DEFAULT_DT")]
    pub dt: f64,

    #[builder(default)]
    pub method: IntegrationMethod,

    /// Compartment sizes at t = 0. Their sum is the population N used in the force of
    /// infection for the whole run.
    #[builder(default = "DEFAULT_INITIAL")]
    pub initial: SimulationState,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            rates: Rates::default(),
            horizon: DEFAULT_HORIZON,
            dt: DEFAULT_DT,
            method: IntegrationMethod::default(),
            initial: DEFAULT_INITIAL,
        }
    }
}

impl Parameters {
    /// Reads parameters from a JSON file. Fields absent from the file take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `SeirvError::IoError` if the file cannot be read and `SeirvError::JsonError` if
    /// it is not a valid parameters object. Values are not validated here; see
    /// [`Parameters::validate`].
    pub fn from_json_file(path: &Path) -> Result<Self, SeirvError> {
        debug!("Loading parameters from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// # Errors
    ///
    /// Returns `SeirvError::JsonError` if `json` is not a valid parameters object.
    pub fn from_json_str(json: &str) -> Result<Self, SeirvError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total population N at t = 0.
    #[must_use]
    pub fn population(&self) -> f64 {
        self.initial.total()
    }

    /// Checks the preconditions of a simulation run.
    ///
    /// # Errors
    ///
    /// - `SeirvError::InvalidParameter` if a rate is negative, `horizon` or `dt` is not strictly
    ///   positive, the run would take more than [`crate::numeric::MAX_STEPS`] steps, or an initial
    ///   compartment is negative. Non-finite values are rejected too.
    /// - `SeirvError::DegenerateState` if the initial compartments sum to zero.
    pub fn validate(&self) -> Result<(), SeirvError> {
        self.rates.validate()?;
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(SeirvError::InvalidParameter(format!(
                "horizon must be finite and positive, got {}",
                self.horizon
            )));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SeirvError::InvalidParameter(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        step_count(self.horizon, self.dt)?;
        self.initial.validate()?;
        let population = self.population();
        if !population.is_finite() {
            return Err(SeirvError::InvalidParameter(format!(
                "initial population must be finite, got {population}"
            )));
        }
        if population <= 0.0 {
            return Err(SeirvError::DegenerateState(
                "initial total population is zero".to_string(),
            ));
        }
        Ok(())
    }
}
