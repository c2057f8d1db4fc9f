use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version, about = "Scroll-driven image sequence player")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the load order of a sequence.
    Plan(PlanArgs),
    /// Load a sequence and write the frame shown at one scroll position as a PNG.
    Frame(FrameArgs),
    /// Sweep the scroll span and write a PNG for every frame change.
    Scrub(ScrubArgs),
    /// Print the overlay state at a progress value as JSON.
    Hud(HudArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Sequence config JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Args, Debug)]
struct SurfaceArgs {
    /// Sequence config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Directory frame locators resolve against (defaults to the config's directory).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Surface layout width in CSS pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Surface layout height in CSS pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Give up waiting for frames after this many seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// Scroll progress in [0, 1].
    #[arg(long, conflicts_with = "scroll_y")]
    progress: Option<f64>,

    /// Document scroll offset in CSS pixels, measured against the configured scroll length.
    #[arg(long)]
    scroll_y: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// How progress moves through the span.
    #[arg(long, value_enum, default_value_t = ScrubMode::Linear)]
    mode: ScrubMode,

    /// Number of evenly spaced samples (linear mode).
    #[arg(long, default_value_t = 100)]
    steps: u32,

    /// Output directory for PNGs.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScrubMode {
    /// Evenly spaced progress samples from 0 to 1.
    Linear,
    /// One eased smooth scroll from the top of the span to the bottom, sampled at 60 Hz.
    Smooth,
}

#[derive(Parser, Debug)]
struct HudArgs {
    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// JSON array of diagnostic items (`progress`, `duration`, `text`).
    #[arg(long)]
    diagnostics: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Plan(args) => cmd_plan(&args),
        Command::Frame(args) => cmd_frame(&args),
        Command::Scrub(args) => cmd_scrub(&args),
        Command::Hud(args) => cmd_hud(&args),
    }
}

fn read_config(path: &Path) -> anyhow::Result<scrollreel::SequenceConfig> {
    Ok(scrollreel::SequenceConfig::from_json_file(path)?)
}

fn cmd_plan(args: &PlanArgs) -> anyhow::Result<()> {
    let config = read_config(&args.config)?;
    let plan = scrollreel::load_plan(config.total_frames, config.batch_size);
    println!(
        "{} frames, {} batches (batch size {})",
        config.total_frames,
        plan.len(),
        config.batch_size
    );
    println!("poster {}", config.locator(config.poster_index()));
    for (n, batch) in plan.iter().enumerate() {
        let (Some(first), Some(last)) = (batch.first(), batch.last()) else {
            continue;
        };
        println!(
            "batch {n:>4}: {} .. {}",
            config.locator(*first),
            config.locator(*last)
        );
    }
    Ok(())
}

/// Start a player over the local filesystem and wait until every frame has settled.
fn load_player(args: &SurfaceArgs) -> anyhow::Result<scrollreel::ScrollPlayer> {
    let config = read_config(&args.config)?;
    let root = match &args.root {
        Some(root) => root.clone(),
        None => args
            .config
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let scheduler = Arc::new(scrollreel::FixedDelay(config.idle_delay()));
    let opts = scrollreel::PlayerOpts {
        layout: scrollreel::Size::new(args.width, args.height),
        device_pixel_ratio: args.dpr,
        render: scrollreel::RenderSettings {
            clear_rgba: [18, 20, 28, 255],
        },
        loader: scrollreel::LoaderOpts::default(),
    };

    let mut player = scrollreel::ScrollPlayer::start(
        config,
        Arc::new(scrollreel::FsFrameSource::new(root)),
        scheduler,
        opts,
    )?;
    if !player.pump_until_complete(Duration::from_secs(args.timeout_secs)) {
        anyhow::bail!("timed out after {}s waiting for frames", args.timeout_secs);
    }

    let store = player.store();
    if store.failed_count() > 0 {
        eprintln!(
            "warning: {} of {} frames failed to load",
            store.failed_count(),
            store.len()
        );
    }
    drop(store);
    Ok(player)
}

fn cmd_frame(args: &FrameArgs) -> anyhow::Result<()> {
    let mut player = load_player(&args.surface)?;

    let progress = match (args.progress, args.scroll_y) {
        (Some(p), _) => p,
        (None, Some(y)) => {
            let span = scrollreel::ScrollSpan::from_viewport_heights(
                0.0,
                player.config().scroll_length_vh,
                args.surface.height,
            );
            span.progress(y)
        }
        (None, None) => anyhow::bail!("pass --progress or --scroll-y"),
    };

    let update = player.on_progress(progress);
    tracing::debug!(?update, progress, "frame requested");
    let frame = player
        .snapshot()
        .context("drawing surface unavailable for this size")?;
    write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_scrub(args: &ScrubArgs) -> anyhow::Result<()> {
    let mut player = load_player(&args.surface)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let samples = match args.mode {
        ScrubMode::Linear => linear_samples(args.steps),
        ScrubMode::Smooth => {
            let span = scrollreel::ScrollSpan::from_viewport_heights(
                0.0,
                player.config().scroll_length_vh,
                args.surface.height,
            );
            smooth_samples(&span)
        }
    };

    // The player draws the frame for progress 0 when it activates.
    let mut last_shown = player.render_state().last_drawn;
    let mut written = 0usize;
    if let Some(shown) = last_shown {
        write_scrub_frame(&player, &args.out_dir, written, shown)?;
        written += 1;
    }
    for progress in samples {
        if let scrollreel::FrameUpdate::Drawn { shown, .. } = player.on_progress(progress)
            && last_shown != Some(shown)
        {
            last_shown = Some(shown);
            write_scrub_frame(&player, &args.out_dir, written, shown)?;
            written += 1;
        }
    }

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn write_scrub_frame(
    player: &scrollreel::ScrollPlayer,
    dir: &Path,
    n: usize,
    shown: scrollreel::FrameIndex,
) -> anyhow::Result<()> {
    let frame = player
        .snapshot()
        .context("drawing surface unavailable for this size")?;
    let path = dir.join(format!("scrub_{n:04}_frame_{:04}.png", shown.number()));
    write_png(&path, &frame)
}

fn linear_samples(steps: u32) -> Vec<f64> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| f64::from(i) / f64::from(steps))
        .collect()
}

fn smooth_samples(span: &scrollreel::ScrollSpan) -> Vec<f64> {
    let tick = Duration::from_micros(16_667);
    let start = Instant::now();
    let mut scroll = scrollreel::SmoothScroll::default().with_limit(span.scroll_for_progress(1.0));
    scroll.jump_to(span.top());
    scroll.scroll_to(span.scroll_for_progress(1.0), start);

    let mut out = vec![span.progress(scroll.position())];
    let mut now = start;
    while scroll.is_animating() {
        now += tick;
        out.push(span.progress(scroll.tick(now)));
    }
    out
}

fn cmd_hud(args: &HudArgs) -> anyhow::Result<()> {
    let items: Vec<scrollreel::DiagnosticItem> = match &args.diagnostics {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read diagnostics '{}'", path.display()))?;
            serde_json::from_str(&text).with_context(|| "parse diagnostics JSON")?
        }
        None => Vec::new(),
    };
    let hud = scrollreel::HudTimeline::with_diagnostics(&items)?;
    let frame = hud.sample(scrollreel::clamp_progress(args.progress));
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}

fn write_png(path: &Path, frame: &scrollreel::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
