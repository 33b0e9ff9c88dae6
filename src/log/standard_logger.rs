use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::encode::Encode;
use log4rs::Config;

#[cfg(feature = "progress_bar")]
use super::progress_bar_encoder::PBWrapperEncoder;
use crate::log::LogSettings;

// ISO 8601 timestamp, colored level, module path.
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";

const APPENDER_NAME: &str = "stderr";

fn encoder() -> Box<dyn Encode> {
    let encoder: Box<dyn Encode> = Box::new(PatternEncoder::new(LOG_PATTERN));
    #[cfg(feature = "progress_bar")]
    let encoder: Box<dyn Encode> = Box::new(PBWrapperEncoder::new(encoder));
    encoder
}

impl LogSettings {
    fn build_config(&self) -> Config {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(encoder())
            .build();

        let loggers = self
            .module_levels
            .iter()
            .map(|(module, level)| Logger::builder().build(module.clone(), *level));
        let root = Root::builder()
            .appender(APPENDER_NAME)
            .build(self.global_level);

        match Config::builder()
            .appender(Appender::builder().build(APPENDER_NAME, Box::new(stderr)))
            .loggers(loggers)
            .build(root)
        {
            Ok(config) => config,
            // Only reachable with a misnamed appender, which is a constant above.
            Err(errors) => panic!("invalid log4rs config: {errors}"),
        }
    }

    /// Installs the logger on first use and reconfigures it afterwards.
    pub(in crate::log) fn apply(&mut self) {
        let config = self.build_config();
        match &self.handle {
            Some(handle) => handle.set_config(config),
            None => match log4rs::init_config(config) {
                Ok(handle) => self.handle = Some(handle),
                // Another logger was installed first, e.g. by an embedding application.
                Err(e) => eprintln!("failed to install logger: {e}"),
            },
        }
    }
}
