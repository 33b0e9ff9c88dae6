use std::fmt::{self, Display};

use serde::Serialize;

use crate::compartment::Compartment;
use crate::state::SimulationState;

/// One row of a trajectory.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub state: SimulationState,
}

/// The time series produced by one simulation run, from t = 0 to the horizon inclusive.
///
/// A `Trajectory` is never empty and cannot be modified once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
    clamped_steps: usize,
}

impl Trajectory {
    pub(crate) fn new(points: Vec<TrajectoryPoint>, clamped_steps: usize) -> Self {
        debug_assert!(!points.is_empty());
        Trajectory {
            points,
            clamped_steps,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryPoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TrajectoryPoint> {
        self.points.get(index)
    }

    #[must_use]
    pub fn initial(&self) -> &TrajectoryPoint {
        &self.points[0]
    }

    #[must_use]
    pub fn final_point(&self) -> &TrajectoryPoint {
        &self.points[self.points.len() - 1]
    }

    #[must_use]
    pub fn final_state(&self) -> &SimulationState {
        &self.final_point().state
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.time)
    }

    /// The values of one compartment over time.
    #[must_use]
    pub fn series(&self, compartment: Compartment) -> Vec<f64> {
        self.points
            .iter()
            .map(|point| point.state.get(compartment))
            .collect()
    }

    /// Number of steps on which at least one compartment went negative and was clamped to zero.
    /// Non-zero means `dt` is too large for the fastest rate.
    #[must_use]
    pub fn clamped_steps(&self) -> usize {
        self.clamped_steps
    }

    /// Time and size of the largest infectious compartment. Ties resolve to the earliest time.
    #[must_use]
    pub fn peak_infectious(&self) -> (f64, f64) {
        let mut peak = self.initial();
        for point in &self.points[1..] {
            if point.state.i > peak.state.i {
                peak = point;
            }
        }
        (peak.time, peak.state.i)
    }

    #[must_use]
    pub fn summary(&self) -> SimulationSummary {
        let (peak_time, peak_infectious) = self.peak_infectious();
        SimulationSummary {
            steps: self.len() - 1,
            horizon: self.final_point().time,
            initial_population: self.initial().state.total(),
            final_population: self.final_state().total(),
            peak_infectious,
            peak_time,
            final_state: *self.final_state(),
            clamped_steps: self.clamped_steps,
        }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryPoint;
    type IntoIter = std::slice::Iter<'a, TrajectoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Headline numbers of a run, printed by the `qfever` binary.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub steps: usize,
    pub horizon: f64,
    pub initial_population: f64,
    pub final_population: f64,
    pub peak_infectious: f64,
    pub peak_time: f64,
    pub final_state: SimulationState,
    pub clamped_steps: usize,
}

impl Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "steps: {} (t = 0 to {})", self.steps, self.horizon)?;
        writeln!(
            f,
            "population: {:.3} -> {:.3}",
            self.initial_population, self.final_population
        )?;
        writeln!(
            f,
            "peak infectious: {:.3} at t = {:.3}",
            self.peak_infectious, self.peak_time
        )?;
        write!(f, "final:")?;
        for (compartment, value) in self.final_state.values() {
            write!(f, " {compartment}={value:.3}")?;
        }
        writeln!(f)?;
        write!(f, "clamped steps: {}", self.clamped_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        Trajectory::new(
            vec![
                TrajectoryPoint {
                    time: 0.0,
                    state: SimulationState::new(95.0, 0.0, 5.0, 0.0, 0.0),
                },
                TrajectoryPoint {
                    time: 1.0,
                    state: SimulationState::new(90.0, 2.0, 6.0, 2.0, 0.0),
                },
                TrajectoryPoint {
                    time: 2.0,
                    state: SimulationState::new(85.0, 2.0, 6.0, 7.0, 0.0),
                },
                TrajectoryPoint {
                    time: 2.5,
                    state: SimulationState::new(84.0, 1.0, 3.0, 12.0, 0.0),
                },
            ],
            0,
        )
    }

    #[test]
    fn accessors() {
        let trajectory = sample();
        assert_eq!(trajectory.len(), 4);
        assert!(!trajectory.is_empty());
        assert_eq!(trajectory.initial().time, 0.0);
        assert_eq!(trajectory.final_point().time, 2.5);
        assert_eq!(trajectory.final_state().r, 12.0);
        assert_eq!(
            trajectory.times().collect::<Vec<_>>(),
            vec![0.0, 1.0, 2.0, 2.5]
        );
        assert_eq!(
            trajectory.series(Compartment::Recovered),
            vec![0.0, 2.0, 7.0, 12.0]
        );
        assert_eq!(trajectory.get(4), None);
    }

    #[test]
    fn peak_ties_resolve_to_earliest() {
        assert_eq!(sample().peak_infectious(), (1.0, 6.0));
    }

    #[test]
    fn summary_display() {
        let summary = sample().summary();
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.horizon, 2.5);
        let text = summary.to_string();
        assert!(text.contains("steps: 3 (t = 0 to 2.5)"));
        assert!(text.contains("peak infectious: 6.000 at t = 1.000"));
        assert!(text.contains("final: S=84.000 E=1.000 I=3.000 R=12.000 V=0.000"));
        assert!(text.ends_with("clamped steps: 0"));
    }
}
