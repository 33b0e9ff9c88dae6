//! Diagnostics for a run: parameter loading, clamping, file output. Not to be confused with the
//! trajectory report, which is the model output written by [`crate::report`].
//!
//! The five `log` macros (`error!`, `warn!`, `info!`, `debug!`, `trace!`) are re-exported here
//! and at the crate root:
//!
//! ```rust
//! use qfever::info;
//!
//! pub fn load_herd() {
//!     info!("Loading herd");
//! }
//! ```
//!
//! Nothing is printed until a level is set. The `qfever` binary does this from `--log-level` and
//! `-v`; library users call [`set_log_level`], [`enable_logging`] or [`disable_logging`].
//! Individual modules can be given their own level:
//!
//! ```rust
//! use qfever::log::{set_log_level, set_module_filter, LevelFilter};
//!
//! set_log_level(LevelFilter::Info);
//! // One line per integration step.
//! set_module_filter("qfever::integrator", LevelFilter::Trace);
//! ```
//!
//! Log lines go to stderr; stdout is left to the trajectory CSV.
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

#[cfg(all(feature = "logging", feature = "progress_bar"))]
mod progress_bar_encoder;

use std::collections::BTreeMap;
use std::sync::{LazyLock, Mutex, MutexGuard};

pub use log::{debug, error, info, trace, warn, LevelFilter};
#[cfg(feature = "logging")]
use log4rs::Handle;

use crate::error::SeirvError;

/// Level used by modules without a filter of their own until [`set_log_level`] is called.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

/// The integrator traces every step, which swamps everything else at `trace`. It only does so
/// when asked for by name.
const DEFAULT_MODULE_FILTERS: [(&str, LevelFilter); 1] =
    [("qfever::integrator", LevelFilter::Debug)];

static LOG_SETTINGS: LazyLock<Mutex<LogSettings>> = LazyLock::new(Mutex::default);

/// The process-wide logging state. The logger itself is global, so there is one of these, held
/// in `LOG_SETTINGS` and reached through the free functions below.
#[derive(Debug)]
pub(in crate::log) struct LogSettings {
    /// Level for every module without an entry in `module_levels`. `Off` disables logging.
    pub(in crate::log) global_level: LevelFilter,
    /// Module path (e.g. `"qfever::simulator"`) to level. Sorted so the installed config is
    /// stable.
    pub(in crate::log) module_levels: BTreeMap<String, LevelFilter>,

    #[cfg(feature = "logging")]
    handle: Option<Handle>,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            global_level: DEFAULT_LOG_LEVEL,
            module_levels: DEFAULT_MODULE_FILTERS
                .iter()
                .map(|(module, level)| ((*module).to_string(), *level))
                .collect(),

            #[cfg(feature = "logging")]
            handle: None,
        }
    }
}

impl LogSettings {
    /// Records `level` for `module`. Returns whether anything changed.
    fn put_module_level(&mut self, module: String, level: LevelFilter) -> bool {
        self.module_levels.insert(module, level) != Some(level)
    }
}

/// A parsed `--log-level` argument: an optional global level and any number of per-module
/// levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogDirectives {
    pub level: Option<LevelFilter>,
    pub modules: Vec<(String, LevelFilter)>,
}

impl LogDirectives {
    /// Parses `level`, `module=level` or a comma separated mix of both, e.g.
    /// `info,qfever::integrator=trace`. Levels are case insensitive. When several bare levels
    /// are given the last one wins.
    ///
    /// # Errors
    ///
    /// Returns `SeirvError::InvalidParameter` for an unknown level name.
    pub fn parse(directives: &str) -> Result<Self, SeirvError> {
        let level_of = |name: &str| {
            let name = name.trim();
            name.parse::<LevelFilter>()
                .map_err(|_| SeirvError::InvalidParameter(format!("unknown log level '{name}'")))
        };

        let mut parsed = LogDirectives::default();
        for part in directives.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((module, level)) => {
                    parsed.modules.push((module.trim().to_string(), level_of(level)?));
                }
                None => parsed.level = Some(level_of(part)?),
            }
        }
        Ok(parsed)
    }
}

fn settings() -> MutexGuard<'static, LogSettings> {
    // A panic while holding the lock leaves the settings themselves intact.
    LOG_SETTINGS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Shows every message. Same as `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Hides every message. Same as `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the level for all modules without a filter of their own.
pub fn set_log_level(level: LevelFilter) {
    let mut settings = settings();
    settings.global_level = level;
    settings.apply();
}

/// Gives `module_path` (and its submodules) its own level.
pub fn set_module_filter(module_path: &str, level: LevelFilter) {
    let mut settings = settings();
    if settings.put_module_level(module_path.to_string(), level) {
        settings.apply();
    }
}

/// Like [`set_module_filter`] for several modules, reinstalling the logger once.
pub fn set_module_filters<S: ToString>(module_filters: &[(&S, LevelFilter)]) {
    let mut settings = settings();
    let mut changed = false;
    for (module, level) in module_filters {
        changed |= settings.put_module_level(module.to_string(), *level);
    }
    if changed {
        settings.apply();
    }
}

/// Drops the filter for `module_path`; the global level applies to it again.
pub fn remove_module_filter(module_path: &str) {
    let mut settings = settings();
    if settings.module_levels.remove(module_path).is_some() {
        settings.apply();
    }
}
