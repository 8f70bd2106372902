use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const LOG_PATTERN: &str = "{d(%H:%M:%S)} {l} {t} - {m}{n}";

/// Daily log file inside `log_dir`, e.g. `2026-10-19.log`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    let current_date = chrono::Local::now().date_naive().to_string();
    log_dir.join(format!("{current_date}.log"))
}

/// Routes the `log` facade to a file, since the terminal belongs to the UI.
pub fn init_file_logger(log_dir: &Path, level: LevelFilter) -> Result<PathBuf> {
    let path = log_file_path(log_dir);

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(level))
        .context("building logger config")?;

    log4rs::init_config(config).context("installing logger")?;
    info!("File logger initialized at {}", path.display());

    Ok(path)
}
