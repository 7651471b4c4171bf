//! Quiz share - share a quiz result from the command line.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use quiz_share::{
    DispatchOutcome, FeedbackState, FeedbackTrigger, Platform, QuizResult, ShareAttributes, ShareCapabilities,
    ShareConfig, ShareSession,
};

mod desktop;

use desktop::{BrowserPopup, StderrNotifier, SystemClipboard};

/// Share a quiz result on Facebook, Twitter/X or through the clipboard
#[derive(Parser)]
#[command(name = "quiz-share")]
#[command(version)]
struct Args {
    /// Where to share: facebook, twitter, native or clipboard
    platform: Platform,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Quiz site origin, overrides the configuration
    #[arg(long)]
    origin: Option<String>,

    /// Result as the JSON attributes carried by the share button
    #[arg(long, conflicts_with_all = ["slug", "name"])]
    attributes: Option<String>,

    /// Rule set slug of the quiz
    #[arg(long, required_unless_present = "attributes")]
    slug: Option<String>,

    /// Display name of the quiz
    #[arg(long, required_unless_present = "attributes")]
    name: Option<String>,

    #[arg(long, default_value_t = 0)]
    score: u32,

    #[arg(long, default_value_t = 0)]
    correct: u32,

    #[arg(long, default_value_t = 1)]
    total: u32,

    /// The quiz was passed
    #[arg(long)]
    success: bool,

    #[arg(long)]
    perfect_bonus: bool,

    #[arg(long, default_value_t = 0)]
    combo_max: u32,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<ShareConfig> {
    let mut config = match &args.config {
        Some(path) => ShareConfig::load(path)?,
        None => ShareConfig::default(),
    };
    config.apply_env()?;

    if let Some(origin) = &args.origin {
        config.origin = ShareConfig::new(origin)?.origin;
    }

    Ok(config)
}

fn quiz_result(args: &Args) -> anyhow::Result<QuizResult> {
    if let Some(json) = &args.attributes {
        let attrs: ShareAttributes =
            serde_json::from_str(json).context("invalid --attributes JSON")?;
        return Ok(QuizResult::try_from(attrs)?);
    }

    let slug = args.slug.clone().context("--slug is required")?;
    let name = args.name.clone().context("--name is required")?;

    Ok(
        QuizResult::new(slug, name, args.score, args.correct, args.total, args.success)?
            .with_perfect_bonus(args.perfect_bonus)
            .with_combo_max(args.combo_max),
    )
}

/// Draw the trigger label on every state change.
///
/// Ends once every trigger clone is dropped, after the last state is drawn.
async fn render_labels<W: std::io::Write>(
    mut feedback: tokio::sync::watch::Receiver<FeedbackState>,
    original: String,
    mut out: W,
) -> W {
    while feedback.changed().await.is_ok() {
        let state = *feedback.borrow_and_update();
        let _ = writeln!(out, "[{}]", state.label(&original));
    }
    out
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_level, args.json_logs);

    let (config, result) = match load_config(&args).and_then(|c| Ok((c, quiz_result(&args)?))) {
        Ok(v) => v,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let capabilities = ShareCapabilities::new(
        Arc::new(SystemClipboard),
        Arc::new(BrowserPopup),
        Arc::new(StderrNotifier),
    );

    let session = match ShareSession::new(result, &config, capabilities) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to create share session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Sharing {} on {}", session.result().rule_set_slug(), args.platform);

    let trigger = FeedbackTrigger::new(args.platform.to_string());
    let render = tokio::spawn(render_labels(
        trigger.subscribe(),
        trigger.original_label().to_string(),
        std::io::stderr(),
    ));

    let outcome = session.spawn_dispatch(args.platform, trigger).await;
    if let Err(e) = render.await {
        warn!("Feedback renderer stopped: {}", e);
    }

    match outcome {
        Ok(DispatchOutcome::CopyFailed) => ExitCode::FAILURE,
        Ok(outcome) => {
            info!("Share finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Share task failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
