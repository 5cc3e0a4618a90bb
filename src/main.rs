use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use meter_reader::{history, MeterConfig, MeterReader, OcrsRecognizer};

#[derive(Parser)]
#[command(name = "meter-reader")]
#[command(about = "Read analog/digital utility meters from photographs")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Load the OCR models once to check they are installed
    Init {
        /// Directory holding text-detection.rten and text-recognition.rten
        #[arg(long, value_name = "DIR")]
        models: Option<PathBuf>,
    },

    /// Read a meter photo and update the stored value
    Run {
        /// Path to input image
        #[arg(short, long, value_name = "IMAGE")]
        image: PathBuf,

        /// Path to JSON device config
        #[arg(short, long, value_name = "CONFIG")]
        config: PathBuf,

        /// Path to (last) value file
        #[arg(short, long, value_name = "FILE")]
        value: PathBuf,

        /// Save debugging image to help diagnose issues
        #[arg(short, long, value_name = "PNG")]
        debug: Option<PathBuf>,

        /// Directory holding the OCR models (defaults to ~/.cache/ocrs)
        #[arg(long, value_name = "DIR")]
        models: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Init { models } => {
            load_recognizer(models)?;
            println!("OK");
        }
        Command::Run {
            image,
            config,
            value,
            debug,
            models,
        } => {
            let config = MeterConfig::load(&config)
                .with_context(|| format!("Failed to load config {}", config.display()))?;
            let max_threshold = config.max_threshold();
            let previous = history::load_previous(&value)?;
            if let Some(previous) = previous {
                info!("Previous value: {}", previous);
            }

            let mut reader = MeterReader::new(config, load_recognizer(models)?);
            if let Some(debug_path) = debug {
                reader = reader.with_debug(debug_path)?;
            }

            let result = reader
                .process_file(&image, previous)
                .context("Could not parse image")?;
            history::check_sanity(result, previous, max_threshold)?;
            history::store_value(&value, result)?;

            println!("Result: {}", result);
        }
    }

    Ok(())
}

fn load_recognizer(models: Option<PathBuf>) -> anyhow::Result<OcrsRecognizer> {
    let recognizer = match models {
        Some(dir) => OcrsRecognizer::init_from_dir(&dir)?,
        None => OcrsRecognizer::init()?,
    };
    Ok(recognizer)
}
