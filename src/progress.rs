//! A terminal progress bar over the integration steps of a run.
//!
//! The bar is driven by the callback of [`crate::simulator::simulate_with_progress`]:
//!
//! ```ignore
//! let mut progress = StepProgress::start(total_steps);
//! let trajectory = simulate_with_progress(&parameters, |done, _| progress.update(done))?;
//! progress.finish();
//! ```
//!
//! The `progress_bar` crate draws on stdout, so the `qfever` binary does not show a bar when the
//! trajectory itself is written to stdout.

use crate::log::trace;
use progress_bar::{
    finalize_progress_bar, init_progress_bar, set_progress_bar_action,
    set_progress_bar_progress, Color, Style,
};

/// Handle for the bar of one run. Only one bar can be drawn at a time.
#[derive(Debug)]
pub struct StepProgress {
    total_steps: usize,
    finished: bool,
}

impl StepProgress {
    #[must_use]
    pub fn start(total_steps: usize) -> Self {
        trace!("initializing progress bar with {} steps", total_steps);
        init_progress_bar(total_steps);
        set_progress_bar_action("Steps", Color::Blue, Style::Bold);
        StepProgress {
            total_steps,
            finished: false,
        }
    }

    pub fn update(&mut self, completed_steps: usize) {
        if self.finished {
            return;
        }
        let completed_steps = completed_steps.min(self.total_steps);
        set_progress_bar_progress(completed_steps);
    }

    pub fn finish(&mut self) {
        if !self.finished {
            finalize_progress_bar();
            self.finished = true;
        }
    }
}

impl Drop for StepProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
