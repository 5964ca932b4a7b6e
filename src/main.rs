use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use thumbgen::logger::{self, LogLevel, LoggerConfig};
use thumbgen::{
    save_results, Config, GeminiClient, InputState, Orchestrator, OutputShape, TextFields,
};

#[derive(Parser)]
#[command(name = "thumbgen", version, about = "Generate wide and square thumbnails with Gemini")]
struct Cli {
    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also append log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose the thumbnails and write them to the output directory
    Generate(GenerateArgs),
    /// List the models in use
    Models,
}

#[derive(Args)]
struct GenerateArgs {
    /// Character image to preserve (PNG, JPEG or WEBP)
    #[arg(long)]
    subject: PathBuf,

    /// Optional scene to composite the character into
    #[arg(long)]
    background: Option<PathBuf>,

    /// Optional image whose lighting, colors and typography are imitated
    #[arg(long = "style")]
    style_reference: Option<PathBuf>,

    #[arg(long)]
    corner_label: Option<String>,

    #[arg(long)]
    line1: Option<String>,

    #[arg(long)]
    line2: Option<String>,

    /// Output format (wide, square, portrait, story); repeatable
    #[arg(long = "format")]
    formats: Vec<OutputShape>,

    /// Directory the images are written to
    #[arg(long)]
    out: Option<PathBuf>,

    /// Skip the spelling and grammar pass
    #[arg(long)]
    no_correction: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logger_config = LoggerConfig::new()
        .with_level(cli.log_level)
        .with_json_output(cli.json_logs);
    if let Some(path) = &cli.log_file {
        logger_config = logger_config.with_file_output(&path.to_string_lossy());
    }
    if let Err(e) = logger::init_with_config(logger_config) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match dotenv::dotenv() {
        Ok(_) => log::debug!("✅ .env file loaded"),
        Err(_) => log::debug!("No .env file found, using system environment variables"),
    }

    let result = match cli.command {
        Command::Generate(args) => generate(args).await,
        Command::Models => list_models(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn list_models() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    for model in GeminiClient::supported_models(&config.gemini) {
        println!("{:<28} {:<11} {}", model.id, format!("{:?}", model.role), model.description);
    }
    Ok(())
}

async fn generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    if !args.formats.is_empty() {
        let mut formats = Vec::new();
        for shape in args.formats {
            if !formats.contains(&shape) {
                formats.push(shape);
            }
        }
        config = config.with_formats(formats);
    }
    if let Some(out) = args.out {
        config = config.with_output_dir(out);
    }
    if args.no_correction {
        config = config.with_correction(false);
    }
    config.validate()?;
    logger::log_config_info(&config);

    let defaults = TextFields::default();
    let mut state = InputState::with_texts(TextFields {
        corner_label: args.corner_label.unwrap_or(defaults.corner_label),
        headline_line1: args.line1.unwrap_or(defaults.headline_line1),
        headline_line2: args.line2.unwrap_or(defaults.headline_line2),
    });

    state.set_subject_from_path(&args.subject)?;
    if let Some(path) = &args.background {
        state.set_background_from_path(path)?;
    }
    if let Some(path) = &args.style_reference {
        state.set_style_reference_from_path(path)?;
    }

    let client = GeminiClient::new(&config.gemini)?;
    let orchestrator = Orchestrator::new(client.text().clone(), client.image().clone())
        .with_formats(config.formats.clone())?
        .with_correction(config.correction_enabled);

    let before = state.texts().clone();
    let results = orchestrator.run(&mut state).await?.to_vec();

    let after = state.texts();
    if after != &before {
        println!("Corrected texts:");
        println!("  corner label:    {}", after.corner_label);
        println!("  headline line 1: {}", after.headline_line1);
        println!("  headline line 2: {}", after.headline_line2);
    }

    let timestamp = chrono::Utc::now().timestamp_millis();
    let mut failed = 0;
    for (result, outcome) in save_results(&results, &config.output_dir, timestamp) {
        match outcome {
            Ok(path) => {
                log::info!("💾 {} saved to {}", result.output_shape.platform_caption(), path.display());
                println!("{}\t{}", result.format_label, path.display());
            }
            Err(e) => {
                log::error!("Could not save {} image: {}", result.format_label, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} image(s) could not be saved", failed, results.len()).into());
    }
    Ok(())
}
