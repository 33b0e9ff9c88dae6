//! Regional Q Fever seroprevalence survey data.
//!
//! The input is a CSV with (at least) the columns `region`, `species`, `number_examined` and
//! `number_positive`; other columns are ignored. Rows missing a region or species are dropped.
//! A region/species selection is reduced to a single prevalence, pooled over all of its rows,
//! which then seeds the initial infectious count of a simulated herd.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::SeirvError;
use crate::log::{debug, info};
use crate::state::SimulationState;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeroprevalenceRecord {
    pub region: Option<String>,
    pub species: Option<String>,
    pub number_examined: Option<f64>,
    pub number_positive: Option<f64>,
}

impl SeroprevalenceRecord {
    fn selection(&self) -> Option<(&str, &str)> {
        let region = self.region.as_deref().map(str::trim)?;
        let species = self.species.as_deref().map(str::trim)?;
        if region.is_empty() || species.is_empty() {
            return None;
        }
        Some((region, species))
    }
}

/// Pooled prevalence of one region/species selection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Prevalence {
    pub examined: f64,
    pub positive: f64,
}

impl Prevalence {
    /// `positive / examined`, or 0 when nothing was examined.
    #[must_use]
    pub fn value(&self) -> f64 {
        if self.examined > 0.0 {
            self.positive / self.examined
        } else {
            0.0
        }
    }

    /// Initial state of a herd of `population` animals seeded at this prevalence.
    ///
    /// # Errors
    ///
    /// Returns `SeirvError::InvalidParameter` if the prevalence exceeds 1.
    pub fn initial_state(&self, population: u64) -> Result<SimulationState, SeirvError> {
        SimulationState::from_prevalence(population, self.value())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeroprevalenceDataset {
    records: Vec<SeroprevalenceRecord>,
}

impl SeroprevalenceDataset {
    /// # Errors
    ///
    /// Returns `SeirvError::CsvError` if the file cannot be opened or parsed and
    /// `SeirvError::DatasetError` if a count is negative.
    pub fn from_path(path: &Path) -> Result<Self, SeirvError> {
        info!("Loading seroprevalence dataset from {}", path.display());
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader)
    }

    /// # Errors
    ///
    /// See [`SeroprevalenceDataset::from_path`].
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, SeirvError> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, SeirvError> {
        let mut records = Vec::new();
        let mut skipped = 0;
        for (row, result) in reader.deserialize().enumerate() {
            let record: SeroprevalenceRecord = result?;
            for (column, value) in [
                ("number_examined", record.number_examined),
                ("number_positive", record.number_positive),
            ] {
                if value.is_some_and(|count| count.is_nan() || count < 0.0) {
                    return Err(SeirvError::DatasetError(format!(
                        "row {}: {column} must be a non-negative count",
                        row + 1
                    )));
                }
            }
            if record.selection().is_some() {
                records.push(record);
            } else {
                skipped += 1;
            }
        }
        debug!(
            "Loaded {} seroprevalence rows, skipped {} without region or species",
            records.len(),
            skipped
        );
        Ok(SeroprevalenceDataset { records })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, unique regions.
    #[must_use]
    pub fn regions(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(SeroprevalenceRecord::selection)
            .map(|(region, _)| region.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted, unique species surveyed in `region`.
    #[must_use]
    pub fn species(&self, region: &str) -> Vec<String> {
        self.records
            .iter()
            .filter_map(SeroprevalenceRecord::selection)
            .filter(|(r, _)| *r == region)
            .map(|(_, species)| species.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Pools the examined and positive counts of every row matching `region` and `species`.
    /// Missing counts contribute zero.
    ///
    /// # Errors
    ///
    /// Returns `SeirvError::DatasetError` if no row matches or if the pooled positive count
    /// exceeds the pooled examined count.
    pub fn prevalence(&self, region: &str, species: &str) -> Result<Prevalence, SeirvError> {
        let mut matched = false;
        let mut prevalence = Prevalence {
            examined: 0.0,
            positive: 0.0,
        };
        for record in &self.records {
            if record.selection() == Some((region, species)) {
                matched = true;
                prevalence.examined += record.number_examined.unwrap_or(0.0);
                prevalence.positive += record.number_positive.unwrap_or(0.0);
            }
        }
        if !matched {
            return Err(SeirvError::DatasetError(format!(
                "no rows for region '{region}' and species '{species}'"
            )));
        }
        if prevalence.positive > prevalence.examined {
            return Err(SeirvError::DatasetError(format!(
                "region '{region}', species '{species}': {} positive out of {} examined",
                prevalence.positive, prevalence.examined
            )));
        }
        debug!(
            "Prevalence for {}/{}: {}/{} = {}",
            region,
            species,
            prevalence.positive,
            prevalence.examined,
            prevalence.value()
        );
        Ok(prevalence)
    }
}
