use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// One of the five subpopulations tracked by the SEIRV model.
///
/// Iteration order (`Compartment::iter()`) is S, E, I, R, V, which is also the column order of
/// the trajectory report.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display,
)]
pub enum Compartment {
    #[strum(to_string = "S")]
    Susceptible,
    #[strum(to_string = "E")]
    Exposed,
    #[strum(to_string = "I")]
    Infectious,
    #[strum(to_string = "R")]
    Recovered,
    #[strum(to_string = "V")]
    Vaccinated,
}

impl Compartment {
    /// Long, human readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Compartment::Susceptible => "Susceptible",
            Compartment::Exposed => "Exposed",
            Compartment::Infectious => "Infectious",
            Compartment::Recovered => "Recovered",
            Compartment::Vaccinated => "Vaccinated",
        }
    }

    /// Short column labels in report order.
    #[must_use]
    pub fn labels() -> Vec<String> {
        Compartment::iter().map(|c| c.to_string()).collect()
    }
}
