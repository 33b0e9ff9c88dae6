//! Stand-in used when the `logging` feature is off. No logger is installed; the `log` crate's
//! max level still follows the configured levels so disabled macros stay cheap.

use crate::log::LogSettings;

impl LogSettings {
    pub(in crate::log) fn apply(&mut self) {
        let most_verbose = self
            .module_levels
            .values()
            .copied()
            .fold(self.global_level, Ord::max);
        log::set_max_level(most_verbose);
    }
}
