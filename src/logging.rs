use std::fs::OpenOptions;
use simplelog::{ConfigBuilder, WriteLogger};
use crate::config::Config;

/// Route `log` records to the configured file.
///
/// The terminal belongs to the line editor, so nothing is logged unless a log
/// file is configured. Failures only disable logging.
pub fn init(config: &Config) {
    let Some(path) = &config.log_file else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let log_config = ConfigBuilder::new().set_target_level(log::LevelFilter::Error).build();
    let _ = WriteLogger::init(config.log_level, log_config, file);
}
