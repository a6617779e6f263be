use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::{Digest as _, Sha256};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "retouch", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply adjustments to an image and export it.
    Render(RenderArgs),
    /// Print dimensions, pixel digest and mean luminance of an image.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Adjustment JSON (camelCase keys, any subset of fields).
    #[arg(long)]
    adjust: Option<PathBuf>,

    /// Output format. Defaults to the extension of `--out`, then png.
    #[arg(long)]
    format: Option<retouch::ExportFormat>,

    /// Encoder quality, 0..=100 (lossy formats only).
    #[arg(long, default_value_t = 92)]
    quality: u8,

    /// Export width. Defaults to the presented width.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Export height. Defaults to the presented height.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Crop the source first: `x,y,w,h`.
    #[arg(long, value_parser = parse_crop)]
    crop: Option<retouch::CropRect>,

    /// Resize the source after cropping: `w,h`.
    #[arg(long, value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// Fit `--resize` inside the box instead of stretching.
    #[arg(long, default_value_t = false, requires = "resize")]
    keep_aspect: bool,

    /// Gray-world white balance before adjustments.
    #[arg(long, default_value_t = false)]
    auto_white_balance: bool,

    /// Per-channel levels stretch before adjustments.
    #[arg(long, default_value_t = false)]
    auto_levels: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Print the SHA-256 of the encoded bytes.
    #[arg(long, default_value_t = false)]
    digest: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut opts = retouch::EngineOpts::from_env();
    if args.threads.is_some() {
        opts.threads = args.threads;
    }
    let mut engine = retouch::Engine::new(opts)?;
    engine.open_path(&args.in_path)?;

    if let Some(rect) = args.crop {
        engine.crop(rect)?;
    }
    if let Some((w, h)) = args.resize {
        let spec = if args.keep_aspect {
            retouch::ResizeSpec::fit(w, h)
        } else {
            retouch::ResizeSpec::exact(w, h)
        };
        engine.resize(spec)?;
    }
    if args.auto_white_balance {
        engine.auto_white_balance()?;
    }
    if args.auto_levels {
        engine.auto_levels()?;
    }
    if let Some(path) = &args.adjust {
        let patch = retouch::AdjustmentPatch::from_path(path)?;
        engine.apply_patch(&patch)?;
    }

    let (width, height) = match (args.width, args.height) {
        (Some(w), Some(h)) => (w, h),
        _ => engine.present()?.dimensions(),
    };
    let format = match args.format {
        Some(f) => f,
        None => format_from_extension(&args.out).unwrap_or(retouch::ExportFormat::Png),
    };
    let mut request = retouch::RenderRequest::new(format, width, height);
    request.quality = args.quality;
    tracing::debug!(?request, "export request");

    let exported = engine.export(&request)?;
    if let Some(warning) = &exported.warning {
        eprintln!("warning: {warning}");
    }

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &exported.bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;

    if args.digest {
        println!("{}", sha256_hex(&exported.bytes));
    }
    eprintln!(
        "wrote {} ({}x{} {})",
        args.out.display(),
        exported.width,
        exported.height,
        exported.format
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let buf = retouch::PixelBuffer::from_path(&args.in_path)?;
    let hist = retouch::histogram(&buf);
    println!("size: {}x{}", buf.width(), buf.height());
    println!("sha256: {}", sha256_hex(buf.data()));
    println!("mean luma: {:.3}", hist.mean_luma());
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn format_from_extension(path: &Path) -> Option<retouch::ExportFormat> {
    path.extension()?.to_str()?.parse().ok()
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[u32; N], String> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| p.trim().parse::<u32>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<_, _>>()?;
    parts
        .try_into()
        .map_err(|v: Vec<u32>| format!("expected {N} comma-separated values, got {}", v.len()))
}

fn parse_crop(s: &str) -> Result<retouch::CropRect, String> {
    let [x, y, w, h] = parse_numbers::<4>(s)?;
    Ok(retouch::CropRect::new(x, y, w, h))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let [w, h] = parse_numbers::<2>(s)?;
    Ok((w, h))
}
