//! Writes a [`Trajectory`] as CSV: one row per time step, columns `time,S,E,I,R,V`.

use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::io;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::compartment::Compartment;
use crate::error::SeirvError;
use crate::log::{info, trace};
use crate::trajectory::{Trajectory, TrajectoryPoint};

pub const DEFAULT_FILE_NAME: &str = "seirv_trajectory.csv";

/// Name of the first report column. The remaining columns are the compartment labels.
pub const TIME_COLUMN: &str = "time";

/// The report header: `time` followed by [`Compartment::labels`].
#[must_use]
pub fn header() -> Vec<String> {
    std::iter::once(TIME_COLUMN.to_string())
        .chain(Compartment::labels())
        .collect()
}

fn row(point: &TrajectoryPoint) -> Vec<f64> {
    std::iter::once(point.time)
        .chain(point.state.values().map(|(_, value)| value))
        .collect()
}

/// Where and how the trajectory report is written.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub directory: PathBuf,
    pub file_name: String,
    pub overwrite: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            directory: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            overwrite: false,
        }
    }
}

impl ReportOptions {
    #[must_use]
    pub fn new() -> Self {
        ReportOptions::default()
    }

    pub fn directory(&mut self, directory: PathBuf) -> &mut Self {
        self.directory = directory;
        self
    }

    pub fn file_name(&mut self, file_name: &str) -> &mut Self {
        self.file_name = file_name.to_string();
        self
    }

    /// Allow replacing an existing report file. Off by default to avoid losing earlier runs.
    pub fn overwrite(&mut self, overwrite: bool) -> &mut Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

// Checks that the path is a CSV and creates it along with any missing parent directories.
fn generate_validate_filepath(path: &Path, overwrite: bool) -> Result<File, SeirvError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if path.exists() && !overwrite {
                return Err(SeirvError::ReportError(format!(
                    "{} already exists; pass --overwrite to replace it",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            Ok(File::create(path)?)
        }
        _ => Err(SeirvError::ReportError(
            "Report output files must be CSVs".to_string(),
        )),
    }
}

/// Serializes `trajectory` as CSV into `writer`, header first.
///
/// # Errors
///
/// Returns `SeirvError::CsvError` or `SeirvError::IoError` if writing fails.
pub fn write_csv<W: io::Write>(trajectory: &Trajectory, writer: W) -> Result<(), SeirvError> {
    // The header is written by hand, so rows must not add their own.
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(header())?;
    for point in trajectory {
        writer.serialize(row(point))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `trajectory` to the file described by `options` and returns its path.
///
/// # Errors
///
/// Returns `SeirvError::ReportError` if the file name is not a `.csv` or the file exists and
/// `options.overwrite` is false, and `SeirvError::IoError` / `SeirvError::CsvError` if the file
/// cannot be created or written.
pub fn write_trajectory_report(
    trajectory: &Trajectory,
    options: &ReportOptions,
) -> Result<PathBuf, SeirvError> {
    let path = options.path();
    trace!("Writing trajectory report to {}", path.display());
    let file = generate_validate_filepath(&path, options.overwrite)?;
    write_csv(trajectory, file)?;
    info!(
        "Wrote {} trajectory rows to {}",
        trajectory.len(),
        path.display()
    );
    Ok(path)
}
