use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::get_styles;
use moodtune_server::capture::FileCapture;
use moodtune_server::config::{AppConfig, ServiceArgs};
use moodtune_server::detector::DetectorClient;
use moodtune_server::emotion::{EmotionLabel, EmotionPicker, FixedEmotionPicker, RandomEmotionPicker};
use moodtune_server::pipeline::{EmotionSource, ScanPipeline, ScanSession, Suggestion, TrackSource};
use moodtune_server::spotify::TrackRecommender;

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

fn parse_emotion(s: &str) -> Result<EmotionLabel, String> {
    match EmotionLabel::parse(s) {
        Some(label) if label.is_known() => Ok(label),
        _ => Err(format!(
            "expected one of {}",
            EmotionLabel::KNOWN.map(|label| label.to_string()).join(", ")
        )),
    }
}

/// Suggests a track for each still image, the same way the server does.
#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Images to scan, one suggestion each.
    #[clap(value_parser = parse_path, required = true)]
    pub images: Vec<PathBuf>,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Emotion to use when the detector can't be reached, instead of a random one.
    #[clap(long, value_parser = parse_emotion)]
    pub fallback_emotion: Option<EmotionLabel>,

    /// Print one JSON object per image instead of a summary line.
    #[clap(long)]
    pub json: bool,
}

fn describe(suggestion: &Suggestion) -> String {
    let track = suggestion.track();
    let mut line = format!(
        "{} -> {} by {} ({})",
        suggestion.emotion(),
        track.name,
        track.artist,
        track.catalog_url
    );
    if suggestion.emotion_source() == EmotionSource::Fallback {
        line.push_str(" [emotion guessed]");
    }
    if suggestion.track_source() == TrackSource::Sample {
        line.push_str(" [sample track]");
    }
    line
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let config = AppConfig::resolve(
        &cli_args.service.to_cli_config(),
        cli_args.service.load_file_config()?,
    )?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload directory {:?}", config.upload_dir))?;

    let picker: Arc<dyn EmotionPicker> = match cli_args.fallback_emotion.clone() {
        Some(emotion) => Arc::new(FixedEmotionPicker(emotion)),
        None => Arc::new(RandomEmotionPicker),
    };
    let pipeline = ScanPipeline::new(
        Arc::new(DetectorClient::from_config(&config)?),
        Arc::new(TrackRecommender::from_config(&config)?),
        picker,
    );
    let session = ScanSession::new(Arc::new(pipeline));

    let mut failures = 0;
    for image in &cli_args.images {
        match session.scan(&FileCapture::new(image)).await {
            Ok(suggestion) if cli_args.json => {
                println!("{}", serde_json::to_string(&suggestion)?);
            }
            Ok(suggestion) => {
                println!("{}: {}", image.display(), describe(&suggestion));
            }
            Err(err) => {
                error!("Scan of {:?} failed: {}", image, err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} scans failed", failures, cli_args.images.len());
    }
    Ok(())
}
