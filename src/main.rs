use amazon_captcha::{
    CaptchaError, CaptchaSolver, ConfigManager, ImageSource, Result, SolverConfig, TrainingCorpus,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "amazon-captcha", version, about = "Solve Amazon text captchas")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a captcha from a file path, link or data URI
    Solve {
        source: String,

        /// Replace unrecognised letters with dashes instead of failing
        #[arg(long)]
        devmode: bool,

        /// Record unsolved captchas
        #[arg(long)]
        keep_logs: bool,

        #[arg(long)]
        logs_path: Option<PathBuf>,

        #[arg(long)]
        training_data: Option<PathBuf>,

        /// Print the full solution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add the glyphs of a labelled captcha to a training corpus
    Train {
        source: String,

        /// The six captcha characters
        label: String,

        #[arg(long)]
        training_data: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<PathBuf>) -> Result<SolverConfig> {
    match path {
        Some(path) => ConfigManager::with_path(path).load(),
        // A missing platform config dir just means defaults
        None => match ConfigManager::new() {
            Ok(manager) => manager.load(),
            Err(_) => Ok(SolverConfig::default()),
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config)?;

    match cli.command {
        Command::Solve {
            source,
            devmode,
            keep_logs,
            logs_path,
            training_data,
            json,
        } => {
            config.devmode |= devmode;
            config.keep_logs |= keep_logs;
            if let Some(path) = logs_path {
                config.logs_path = path;
            }
            if training_data.is_some() {
                config.training_data_dir = training_data;
            }

            let solver = CaptchaSolver::from_config(config)?;
            let solution = solver.solve(&ImageSource::parse(&source))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&solution)?);
            } else {
                println!("{}", solution);
            }
        }
        Command::Train {
            source,
            label,
            training_data,
        } => {
            let image = ImageSource::parse(&source)
                .load(Duration::from_secs(config.fetch_timeout_secs))?;

            let mut corpus = if training_data.is_dir() {
                TrainingCorpus::load_from_dir(&training_data)?
            } else {
                TrainingCorpus::new()
            };

            let solver = CaptchaSolver::new(TrainingCorpus::new(), config);
            let signatures = solver.extract_signatures(&image);
            let added = corpus.learn(&label, &signatures)?;
            corpus.save_to_dir(&training_data)?;

            tracing::info!(added, label = %label, "training corpus updated at {:?}", training_data);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CaptchaError::UnsupportedContentType(content_type)) => {
            tracing::error!("Captcha link returned unsupported content type: {}", content_type);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
