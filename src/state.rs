//! A point in time of the SEIRV model: the size of each of the five compartments.
//!
//! The same type doubles as the derivative vector `(dS/dt, ..., dV/dt)` during integration, which
//! is why it supports addition and scaling.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::compartment::Compartment;
use crate::error::SeirvError;

/// Compartment sizes at one instant. Sizes are real valued; the model is deterministic and does
/// not track individual animals.
///
/// Missing fields deserialize as zero, so `{"s": 990, "i": 10}` is a complete initial state.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationState {
    pub s: f64,
    pub e: f64,
    pub i: f64,
    pub r: f64,
    pub v: f64,
}

impl SimulationState {
    #[must_use]
    pub fn new(s: f64, e: f64, i: f64, r: f64, v: f64) -> Self {
        Self { s, e, i, r, v }
    }

    /// Seeds a herd of `population` animals from an estimated seroprevalence: the infectious
    /// count is `floor(prevalence * population)` and everyone else is susceptible.
    ///
    /// # Errors
    ///
    /// Returns `SeirvError::InvalidParameter` if `prevalence` is not within `[0, 1]`.
    pub fn from_prevalence(population: u64, prevalence: f64) -> Result<Self, SeirvError> {
        if !(0.0..=1.0).contains(&prevalence) {
            return Err(SeirvError::InvalidParameter(format!(
                "prevalence must be within [0, 1], got {prevalence}"
            )));
        }
        #[allow(clippy::cast_precision_loss)]
        let population = population as f64;
        let infectious = (prevalence * population).floor();
        Ok(Self::new(population - infectious, 0.0, infectious, 0.0, 0.0))
    }

    /// S + E + I + R + V
    #[must_use]
    pub fn total(&self) -> f64 {
        self.s + self.e + self.i + self.r + self.v
    }

    #[must_use]
    pub fn get(&self, compartment: Compartment) -> f64 {
        match compartment {
            Compartment::Susceptible => self.s,
            Compartment::Exposed => self.e,
            Compartment::Infectious => self.i,
            Compartment::Recovered => self.r,
            Compartment::Vaccinated => self.v,
        }
    }

    fn get_mut(&mut self, compartment: Compartment) -> &mut f64 {
        match compartment {
            Compartment::Susceptible => &mut self.s,
            Compartment::Exposed => &mut self.e,
            Compartment::Infectious => &mut self.i,
            Compartment::Recovered => &mut self.r,
            Compartment::Vaccinated => &mut self.v,
        }
    }

    /// Values in S, E, I, R, V order.
    pub fn values(&self) -> impl Iterator<Item = (Compartment, f64)> + '_ {
        Compartment::iter().map(move |compartment| (compartment, self.get(compartment)))
    }

    /// Sets every negative compartment to zero and returns the compartments that were changed.
    pub fn clamp_negative(&mut self) -> Vec<Compartment> {
        let mut clamped = Vec::new();
        for compartment in Compartment::iter() {
            let value = self.get_mut(compartment);
            if *value < 0.0 {
                *value = 0.0;
                clamped.push(compartment);
            }
        }
        clamped
    }

    /// Checks that every compartment is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns `SeirvError::InvalidParameter` naming the first offending compartment.
    pub fn validate(&self) -> Result<(), SeirvError> {
        for (compartment, value) in self.values() {
            if !value.is_finite() || value < 0.0 {
                return Err(SeirvError::InvalidParameter(format!(
                    "initial {} count must be finite and non-negative, got {value}",
                    compartment.name()
                )));
            }
        }
        Ok(())
    }
}

impl Add for SimulationState {
    type Output = SimulationState;

    fn add(self, rhs: SimulationState) -> SimulationState {
        SimulationState {
            s: self.s + rhs.s,
            e: self.e + rhs.e,
            i: self.i + rhs.i,
            r: self.r + rhs.r,
            v: self.v + rhs.v,
        }
    }
}

impl Mul<f64> for SimulationState {
    type Output = SimulationState;

    fn mul(self, factor: f64) -> SimulationState {
        SimulationState {
            s: self.s * factor,
            e: self.e * factor,
            i: self.i * factor,
            r: self.r * factor,
            v: self.v * factor,
        }
    }
}
