//! log4rs initialisation for the binary.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use std::error::Error;
use std::path::Path;

/// Initialise log4rs from `path`, or log warnings to stderr if it is missing.
pub fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if path.exists() {
        log4rs::init_file(path, Default::default())?;
        log::debug!("Logging configured from {}", path.display());
    } else {
        log4rs::init_config(fallback_config()?)?;
        log::debug!("{} not found, logging to stderr", path.display());
    }
    Ok(())
}

fn fallback_config() -> Result<LogConfig, Box<dyn Error>> {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_config() {
        let config = fallback_config().expect("Error building fallback config");
        assert_eq!(config.root().level(), LevelFilter::Warn);
        assert_eq!(config.appenders().len(), 1);
    }
}
