//! handctl - Hand-Gesture Control Engine
//!
//! Turns a hand-landmark stream into cursor movement and gesture actions.

use handctl::app::cli::{Cli, Commands, ConfigAction, ModelAction};
use handctl::app::config::Config;
use handctl::control::pipeline::ControlPipeline;
use handctl::landmark::types::LandmarkSet;
use handctl::model::store::GestureModel;
use handctl::stream::sink::{ActionSink, JsonlSink};
use handctl::stream::source::{ControlSignal, FrameSource, StreamMessage};
use handctl::time::clock::SessionClock;
use handctl::training::recorder::TrainingRecorder;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Initialize tracing (--verbose enables debug-level output)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load config
    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };

    // Execute command
    match cli.command {
        Commands::Run { model } => {
            run_control_loop(model, &config)?;
        }
        Commands::Train {
            label,
            output,
            append,
        } => {
            run_train(label, output, append, &config)?;
        }
        Commands::Classify { model, k } => {
            run_classify(model, k, &config)?;
        }
        Commands::Model { action } => match action {
            ModelAction::Show { model } => {
                run_model_show(model, &config)?;
            }
        },
        Commands::Init { force } => {
            run_init(force, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, config)?;
        }
    }

    Ok(())
}

/// Install the Ctrl+C handler, returning the shared stop flag.
fn stop_flag() -> anyhow::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })?;
    Ok(flag)
}

fn load_model(path_override: Option<PathBuf>, config: &Config) -> anyhow::Result<GestureModel> {
    let path = path_override.unwrap_or_else(|| config.classifier.model_path.clone());
    if !path.exists() {
        anyhow::bail!(
            "Model file not found: {:?}. Train one with 'handctl train'.",
            path
        );
    }
    let model = GestureModel::load(&path)?;
    info!(
        path = %path.display(),
        samples = model.len(),
        labels = ?model.labels(),
        "model loaded"
    );
    Ok(model)
}

/// The largest plausible hand in a frame, for training and classify modes.
fn primary_plausible_hand<'a>(
    hands: &'a [LandmarkSet],
    config: &Config,
) -> Option<&'a LandmarkSet> {
    hands
        .iter()
        .filter(|h| h.is_plausible(config.detector.min_hand_span, config.detector.max_hand_depth))
        .max_by(|a, b| {
            a.span()
                .partial_cmp(&b.span())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

fn run_control_loop(model_path: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    let model = load_model(model_path, config)?;
    let mut pipeline = ControlPipeline::new(model, config);

    let stdin = std::io::stdin();
    let mut source = FrameSource::new(stdin.lock());
    let mut sink = JsonlSink::new(std::io::stdout());

    let stop = stop_flag()?;
    let clock = SessionClock::start();
    info!("Control loop running. Press Ctrl+C to stop");

    let mut frames = 0u64;
    let mut dispatched = 0u64;
    while !stop.load(Ordering::SeqCst) {
        let message = match source.next_message()? {
            Some(m) => m,
            None => break,
        };
        let obs = match message {
            StreamMessage::Frame(obs) => obs,
            StreamMessage::Control(signal) => {
                warn!(?signal, "training signal ignored outside a training session");
                continue;
            }
        };

        let frame = pipeline.process(&obs);
        frames += 1;
        for command in &frame.commands {
            sink.dispatch(command)?;
            dispatched += 1;
        }
    }

    info!(
        frames,
        dispatched,
        elapsed_ms = clock.now().as_millis(),
        "control loop stopped"
    );
    Ok(())
}

fn run_train(
    label: Option<String>,
    output: Option<PathBuf>,
    append: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let output_path = output.unwrap_or_else(|| config.classifier.model_path.clone());

    let mut recorder = if append && output_path.exists() {
        let model = GestureModel::load(&output_path)?;
        info!(samples = model.len(), "extending existing model");
        TrainingRecorder::with_model(model)
    } else {
        TrainingRecorder::new()
    };
    if let Some(label) = &label {
        recorder.select_label(label)?;
    }

    let stdin = std::io::stdin();
    let mut source = FrameSource::new(stdin.lock());

    let stop = stop_flag()?;
    info!("Training session running. Press Ctrl+C to finish");

    // The most recent usable hand; capture triggers apply to it.
    let mut current_hand: Option<LandmarkSet> = None;
    while !stop.load(Ordering::SeqCst) {
        let message = match source.next_message()? {
            Some(m) => m,
            None => break,
        };
        match message {
            StreamMessage::Frame(obs) => {
                if let Some(hand) = primary_plausible_hand(&obs.hands, config) {
                    current_hand = Some(hand.clone());
                }
            }
            StreamMessage::Control(ControlSignal::SelectLabel { label }) => {
                if let Err(e) = recorder.select_label(&label) {
                    warn!(%e, "label rejected");
                }
            }
            StreamMessage::Control(ControlSignal::CaptureSample) => match &current_hand {
                Some(hand) => match recorder.capture(hand) {
                    Ok(count) => {
                        println!(
                            "captured '{}' ({} samples)",
                            recorder.active_label().unwrap_or("?"),
                            count
                        );
                    }
                    Err(e) => warn!(%e, "capture failed"),
                },
                None => warn!("capture requested before any usable hand was seen"),
            },
            StreamMessage::Control(ControlSignal::SaveModel) => {
                // A failed save must not end the session; the samples only
                // exist in memory until a save succeeds.
                match recorder.save(&output_path) {
                    Ok(()) => info!(path = %output_path.display(), "model saved"),
                    Err(e) => warn!(%e, "save failed; session continues"),
                }
            }
        }
    }

    if recorder.sample_count() == 0 {
        warn!("no samples captured; nothing to save");
        return Ok(());
    }

    recorder.save(&output_path)?;

    println!("\nTraining session complete");
    for (label, count) in recorder.label_counts() {
        println!("  {}: {} samples", label, count);
    }
    println!("  Model: {:?}", output_path);

    Ok(())
}

fn run_classify(
    model_path: Option<PathBuf>,
    k: Option<usize>,
    config: &Config,
) -> anyhow::Result<()> {
    let model = load_model(model_path, config)?;
    let k = k.unwrap_or(config.classifier.k);
    let normalizer = handctl::features::normalizer::Normalizer::new();

    let stdin = std::io::stdin();
    let mut source = FrameSource::new(stdin.lock());

    let stop = stop_flag()?;
    info!(k, "classify mode running. Press Ctrl+C to stop");

    while !stop.load(Ordering::SeqCst) {
        let message = match source.next_message()? {
            Some(m) => m,
            None => break,
        };
        let obs = match message {
            StreamMessage::Frame(obs) => obs,
            StreamMessage::Control(_) => continue,
        };
        let Some(hand) = primary_plausible_hand(&obs.hands, config) else {
            continue;
        };

        let features = match normalizer.normalize(hand) {
            Ok(f) => f,
            Err(e) => {
                warn!(%e, "frame skipped");
                continue;
            }
        };
        match model.classify(&features, k) {
            Ok((label, confidence)) => {
                println!(
                    "{}",
                    serde_json::json!({
                        "timestamp": obs.timestamp.as_millis(),
                        "label": label,
                        "confidence": confidence,
                    })
                );
            }
            Err(e) => warn!(%e, "classification failed"),
        }
    }

    Ok(())
}

fn run_model_show(model_path: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    let path = model_path.unwrap_or_else(|| config.classifier.model_path.clone());
    if !path.exists() {
        anyhow::bail!("Model file not found: {:?}", path);
    }
    let model = GestureModel::load(&path)?;

    println!("Model: {:?}", path);
    println!("  Id:          {}", model.metadata.id);
    println!("  Created:     {}", model.metadata.created_at);
    println!("  Format:      {}", model.metadata.format_version);
    println!("  Feature dim: {}", model.metadata.feature_dim);
    println!("  Samples:     {}", model.len());
    println!("  Labels:");
    for (label, count) in model.label_counts() {
        println!("    {}: {}", label, count);
    }

    Ok(())
}

fn run_init(force: bool, config: &Config) -> anyhow::Result<()> {
    let config_path = Config::default_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save_default()?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    Ok(())
}

fn run_config(action: ConfigAction, mut config: Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Configuration ({:?}):\n", Config::default_path());
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Get { key } => {
            let value = config.get_value(&key)?;
            println!("{} = {}", key, value);
        }
        ConfigAction::Set { key, value } => {
            let config_path = Config::default_path();
            if !config_path.exists() {
                anyhow::bail!("No config file found. Run 'handctl init' first.");
            }
            config.set_value(&key, &value)?;
            config.save(&config_path)?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::Reset { force } => {
            let config_path = Config::default_path();

            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save_default()?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}
