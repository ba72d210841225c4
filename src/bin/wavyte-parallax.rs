use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wavyte-parallax", version)]
struct Cli {
    /// Log render spans and buffer allocations to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a numbered PNG sequence over a camera range.
    Sweep(SweepArgs),
    /// Print per-layer offsets at one camera position as JSON.
    Offsets(OffsetsArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Camera position in screen pixels.
    #[arg(long, allow_negative_numbers = true)]
    camera: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// First camera position.
    #[arg(long, allow_negative_numbers = true)]
    from: f64,

    /// Last camera position (inclusive).
    #[arg(long, allow_negative_numbers = true)]
    to: f64,

    /// Camera increment per frame.
    #[arg(long, default_value_t = 1.0)]
    step: f64,

    /// Directory receiving `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct OffsetsArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Camera position in screen pixels.
    #[arg(long, allow_negative_numbers = true)]
    camera: f64,
}

#[derive(serde::Serialize)]
struct OffsetRow {
    layer: usize,
    ratio: f64,
    raw: f64,
    snapped: f64,
    offset: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sweep(args) => cmd_sweep(args),
        Command::Offsets(args) => cmd_offsets(args),
    }
}

fn load_scene(path: &Path) -> anyhow::Result<wavyte_parallax::Scene> {
    let spec = wavyte_parallax::SceneSpec::from_path(path)?;
    let scene = spec
        .build()
        .with_context(|| format!("build scene '{}'", path.display()))?;
    Ok(scene)
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.in_path)?;
    let surface = scene.render_frame(args.camera)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }
    surface.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.in_path)?;
    let cameras = wavyte_parallax::camera_sweep(args.from, args.to, args.step)?;
    ensure_dir(&args.out_dir)?;

    for (i, camera) in cameras.iter().enumerate() {
        let surface = scene.render_frame(*camera)?;
        let out = args.out_dir.join(format!("frame_{i:05}.png"));
        surface.save_png(&out)?;
    }

    let stats = scene.upscaler_stats();
    eprintln!(
        "wrote {} frames to {} (upscale buffer allocations: {})",
        cameras.len(),
        args.out_dir.display(),
        stats.allocations
    );
    Ok(())
}

fn cmd_offsets(args: OffsetsArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.in_path)?;
    let offsets = scene.offsets_at(args.camera)?;
    let rows: Vec<OffsetRow> = scene
        .parallax()
        .layers()
        .iter()
        .zip(offsets)
        .enumerate()
        .map(|(layer, (l, o))| OffsetRow {
            layer,
            ratio: l.ratio(),
            raw: o.raw,
            snapped: o.snapped,
            offset: o.offset,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
