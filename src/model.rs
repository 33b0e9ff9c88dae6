//! The SEIRV right-hand side:
//!
//! ```text
//! dS/dt = -β S I / N - ν S
//! dE/dt =  β S I / N - σ E
//! dI/dt =  σ E - γ I
//! dR/dt =  γ I
//! dV/dt =  ν S
//! ```

use crate::parameters::Rates;
use crate::state::SimulationState;

/// The ODE system for one run. `population` is N at t = 0 and stays fixed for the run.
#[derive(Debug, Copy, Clone)]
pub struct SeirvModel {
    rates: Rates,
    population: f64,
}

impl SeirvModel {
    /// `population` must be positive; [`crate::parameters::Parameters::validate`] guarantees
    /// this for simulator runs.
    #[must_use]
    pub fn new(rates: Rates, population: f64) -> Self {
        SeirvModel { rates, population }
    }

    /// New infections per unit time, `β S I / N`.
    #[must_use]
    pub fn force_of_infection(&self, state: &SimulationState) -> f64 {
        self.rates.beta * state.s * state.i / self.population
    }

    #[must_use]
    pub fn derivatives(&self, state: &SimulationState) -> SimulationState {
        let Rates {
            sigma, gamma, nu, ..
        } = self.rates;
        let infection = self.force_of_infection(state);
        let progression = sigma * state.e;
        let recovery = gamma * state.i;
        let vaccination = nu * state.s;

        SimulationState {
            s: -infection - vaccination,
            e: infection - progression,
            i: progression - recovery,
            r: recovery,
            v: vaccination,
        }
    }
}
