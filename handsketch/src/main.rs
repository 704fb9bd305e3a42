//! handsketch: replay or stream hand landmarks and print drawing events.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;

use handsketch::hand::CanvasSize;
use handsketch::practice::catalog::parse_reference;
use handsketch::practice::Catalog;
use handsketch::replay;
use handsketch::sexp::error_response;
use handsketch::{Controller, SketchConfig};

#[derive(Parser, Debug)]
#[command(name = "handsketch", about = "Hand-gesture drawing and guided tracing")]
struct Cli {
    /// Replay file of landmark frames (default: read frames from stdin)
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Configuration plist file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template to trace, as kind:key (e.g. letter:a, digit:3, sketch:cat)
    #[arg(long)]
    template: Option<String>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1280.0)]
    canvas_width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 720.0)]
    canvas_height: f64,

    /// List built-in templates and exit
    #[arg(long)]
    list_templates: bool,

    /// Print the final status s-expression after processing
    #[arg(long)]
    status: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list_templates {
        println!("{}", Catalog::builtin().list_sexp());
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handsketch=info".into()),
        )
        .init();

    info!("handsketch v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => SketchConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SketchConfig::default(),
    };

    if cli.canvas_width <= 0.0 || cli.canvas_height <= 0.0 {
        return Err(anyhow!(
            "canvas must be positive, got {}x{}",
            cli.canvas_width,
            cli.canvas_height
        ));
    }
    let canvas = CanvasSize::new(cli.canvas_width, cli.canvas_height);
    let mut controller = Controller::new(config, canvas);

    if let Some(reference) = &cli.template {
        let (kind, key) = parse_reference(reference)
            .ok_or_else(|| anyhow!("bad --template {reference:?}, expected kind:key"))?;
        controller
            .start_template(kind, &key)
            .with_context(|| format!("starting template {reference}"))?;
    }

    let last_t = match &cli.replay {
        Some(path) => run_replay(&mut controller, path)?,
        None => run_stdin(&mut controller)?,
    };

    if cli.status {
        println!("{}", controller.status_sexp(last_t));
    }
    Ok(())
}

/// Play a recorded file.  Returns the last timestamp seen.
fn run_replay(controller: &mut Controller, path: &Path) -> anyhow::Result<f64> {
    let frames = replay::load(path).with_context(|| format!("reading replay {}", path.display()))?;
    let mut last_t = 0.0;
    for frame in &frames {
        for event in replay::apply(controller, frame) {
            println!("{}", event.to_sexp());
        }
        last_t = frame.t_ms;
    }
    Ok(last_t)
}

/// Process frames from stdin as they arrive.  Lines without `:t` are
/// stamped with the time since startup.  Malformed lines are reported on
/// stdout and count as a frame with no hand.
fn run_stdin(controller: &mut Controller) -> anyhow::Result<f64> {
    let start = Instant::now();
    let mut last_t = 0.0;
    for (i, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        let step = replay::apply_live_line(controller, &line, i + 1, now_ms);
        if let Some(e) = &step.error {
            println!("{}", error_response(&e.to_string()));
        }
        for event in &step.events {
            println!("{}", event.to_sexp());
        }
        if let Some(t) = step.t_ms {
            last_t = t;
        }
    }
    Ok(last_t)
}
