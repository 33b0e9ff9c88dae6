use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `SeirvError` and maps other errors to
/// convert to a `SeirvError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SeirvError {
    /// A rate, the horizon, the step size or an initial compartment is out of range.
    InvalidParameter(String),
    /// The initial population is empty, so `S * I / N` is undefined.
    DegenerateState(String),
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    DatasetError(String),
    ReportError(String),
}

impl From<io::Error> for SeirvError {
    fn from(error: io::Error) -> Self {
        SeirvError::IoError(error)
    }
}

impl From<serde_json::Error> for SeirvError {
    fn from(error: serde_json::Error) -> Self {
        SeirvError::JsonError(error)
    }
}

impl From<csv::Error> for SeirvError {
    fn from(error: csv::Error) -> Self {
        SeirvError::CsvError(error)
    }
}

impl std::error::Error for SeirvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeirvError::IoError(error) => Some(error),
            SeirvError::JsonError(error) => Some(error),
            SeirvError::CsvError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for SeirvError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeirvError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            SeirvError::DegenerateState(msg) => write!(f, "degenerate state: {msg}"),
            SeirvError::IoError(error) => write!(f, "I/O error: {error}"),
            SeirvError::JsonError(error) => write!(f, "JSON error: {error}"),
            SeirvError::CsvError(error) => write!(f, "CSV error: {error}"),
            SeirvError::DatasetError(msg) => write!(f, "dataset error: {msg}"),
            SeirvError::ReportError(msg) => write!(f, "report error: {msg}"),
        }
    }
}
