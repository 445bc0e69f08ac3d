use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use adscope_config::Config;
use adscope_genai::GeminiClient;
use adscope_media::FfmpegSource;
use adscope_pipeline::{run, RunContext};

#[derive(Parser)]
#[command(name = "adscope")]
#[command(about = "AdScope — marketing insight analysis for social video ads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a video, submit the stills for analysis, print the report
    Analyze {
        /// The video file to analyze
        video: PathBuf,

        /// Scratch directory for sampled frames (defaults to a per-process
        /// directory under the system temp dir)
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        /// Override the generation model
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            video,
            frames_dir,
            model,
        } => {
            let config = Config {
                model: model.unwrap_or(config.model),
                ..config
            };
            analyze(&config, &video, frames_dir).await?;
        }
    }

    Ok(())
}

async fn analyze(config: &Config, video: &PathBuf, frames_dir: Option<PathBuf>) -> Result<()> {
    let frames_dir = frames_dir.unwrap_or_else(|| {
        std::env::temp_dir().join(format!("adscope-frames-{}", std::process::id()))
    });
    let ctx = RunContext::for_video(video, frames_dir);

    let client = GeminiClient::from_config(config)?;
    let mut source = FfmpegSource::open(video)
        .await
        .with_context(|| format!("opening {}", video.display()))?;

    info!("analyzing {} with {}", video.display(), config.model);
    let report = run(
        &ctx,
        &mut source,
        &client,
        Duration::from_secs(config.generation_timeout_secs),
    )
    .await?;

    println!("{report}");
    Ok(())
}
