use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use quizmaster::{Config, Difficulty, Quiz, Settings, logging};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// OpenTDB category id to pre-select (e.g. 9 for General Knowledge)
    #[arg(short, long)]
    category: Option<String>,

    /// Difficulty to pre-select
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Number of questions to pre-select
    #[arg(short, long)]
    amount: Option<u32>,

    /// Question API endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective config to the config path and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }
    config.validate();

    if args.init_config {
        let path = args.config.unwrap_or_else(Config::config_path);
        config
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let log_file = logging::init_file_logger(&config.log_dir, config.level_filter())?;
    log::info!(
        "quizmaster {} starting, api {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let mut initial = Settings::default();
    if let Some(category) = args.category {
        initial.category = category;
    }
    if let Some(difficulty) = args.difficulty {
        initial.difficulty = difficulty;
    }
    if let Some(amount) = args.amount {
        initial.num_questions = amount;
    }

    let quiz = Quiz::new(&config, initial).context("failed to set up the quiz")?;
    let result = quiz.run().await;
    if let Err(err) = &result {
        log::error!("quiz exited with error: {err}");
        eprintln!("See {} for details", log_file.display());
    }
    result?;
    Ok(())
}
