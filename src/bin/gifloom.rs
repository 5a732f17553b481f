use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "gifloom", version)]
struct Cli {
    /// How GIF disposal modes are applied while decoding.
    #[arg(long, value_enum, global = true, default_value_t = TimingChoice::AsAuthored)]
    disposal: TimingChoice,

    /// Log pipeline stages to stderr (repeat for trace output).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a GIF and print a JSON summary.
    Info(InfoArgs),
    /// Build an animated GIF from still images.
    Encode(EncodeArgs),
    /// Merge GIFs into one, played back to back.
    Merge(MergeArgs),
    /// Export every frame of a GIF into a zip of still images.
    Export(ExportArgs),
    /// Rescale and re-encode a GIF.
    Recode(RecodeArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TimingChoice {
    AsAuthored,
    Deferred,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
    Jpg,
    Webp,
}

#[derive(Args, Debug)]
struct GifOutArgs {
    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Palette budget (2..=256).
    #[arg(long, default_value_t = 256)]
    max_colors: u16,

    /// Play once instead of looping forever.
    #[arg(long)]
    no_loop: bool,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Still images in playback order.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    #[command(flatten)]
    gif: GifOutArgs,

    /// Frames per second (clamped to 1..=60).
    #[arg(long, default_value_t = 10.0)]
    fps: f64,

    /// Scale factor applied to every image.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Quantize all frames into one global palette.
    #[arg(long)]
    global_palette: bool,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Source GIFs in playback order.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    #[command(flatten)]
    gif: GifOutArgs,

    /// Delay fallback for frames without their own delay.
    #[arg(long, default_value_t = 10.0)]
    fps: f64,

    /// Scale factor applied to every source.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output zip path.
    #[arg(long)]
    out: PathBuf,

    /// Still-image format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// Quality in 0..=1 (JPEG only).
    #[arg(long, default_value_t = 0.92)]
    quality: f32,

    /// Scale factor applied to every frame.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Entry name prefix. Defaults to the input file stem.
    #[arg(long)]
    base_name: Option<String>,
}

#[derive(Parser, Debug)]
struct RecodeArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    gif: GifOutArgs,

    /// Delay fallback for frames without their own delay.
    #[arg(long, default_value_t = 10.0)]
    fps: f64,

    /// Scale factor applied to every frame.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Quantize all frames into one global palette.
    #[arg(long)]
    global_palette: bool,
}

#[derive(serde::Serialize)]
struct InfoSummary {
    width: u32,
    height: u32,
    frame_count: usize,
    total_duration_ms: u64,
    delays_ms: Vec<u32>,
    has_transparency: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let transcoder = gifloom::Transcoder::new(gifloom::TranscoderOpts {
        disposal_timing: match cli.disposal {
            TimingChoice::AsAuthored => gifloom::DisposalTiming::AsAuthored,
            TimingChoice::Deferred => gifloom::DisposalTiming::Deferred,
        },
        ..Default::default()
    });

    match cli.cmd {
        Command::Info(args) => cmd_info(&transcoder, args),
        Command::Encode(args) => cmd_encode(&transcoder, args),
        Command::Merge(args) => cmd_merge(&transcoder, args),
        Command::Export(args) => cmd_export(&transcoder, args),
        Command::Recode(args) => cmd_recode(&transcoder, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => return,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read input '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write output '{}'", path.display()))?;
    eprintln!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn encode_opts(gif: &GifOutArgs, fps: f64, use_global_palette: bool) -> gifloom::EncodeOptions {
    gifloom::EncodeOptions {
        fps,
        loop_forever: !gif.no_loop,
        max_colors: gif.max_colors,
        use_global_palette,
    }
}

fn cmd_info(t: &gifloom::Transcoder, args: InfoArgs) -> anyhow::Result<()> {
    let bytes = read_input(&args.in_path)?;
    let anim = t
        .decode(&bytes)
        .with_context(|| format!("decode gif '{}'", args.in_path.display()))?;

    let summary = InfoSummary {
        width: anim.width(),
        height: anim.height(),
        frame_count: anim.frame_count(),
        total_duration_ms: anim.total_duration_ms(),
        delays_ms: anim.frames().iter().map(|f| f.delay_ms).collect(),
        has_transparency: anim.frames().iter().any(|f| f.has_transparency()),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_encode(t: &gifloom::Transcoder, args: EncodeArgs) -> anyhow::Result<()> {
    let images = args
        .images
        .iter()
        .map(|p| read_input(p))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let seq = gifloom::SequenceOptions {
        scale: args.scale,
        fps: args.fps,
    };
    let frames = t
        .images_to_frames(&images, &seq)
        .with_context(|| "load still images")?;
    let bytes = t
        .encode(&frames, &encode_opts(&args.gif, args.fps, args.global_palette))
        .with_context(|| "encode gif")?;
    write_output(&args.gif.out, &bytes)
}

fn cmd_merge(t: &gifloom::Transcoder, args: MergeArgs) -> anyhow::Result<()> {
    let sources = args
        .sources
        .iter()
        .map(|p| read_input(p))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let opts = gifloom::MergeOptions {
        fps: args.fps,
        scale: args.scale,
        loop_forever: !args.gif.no_loop,
        max_colors: args.gif.max_colors,
    };
    let out = t.merge(&sources, &opts).with_context(|| "merge gifs")?;
    eprintln!(
        "merged {} source(s): {}x{}, {} frame(s)",
        sources.len(),
        out.width,
        out.height,
        out.frame_count
    );
    write_output(&args.gif.out, &out.bytes)
}

fn cmd_export(t: &gifloom::Transcoder, args: ExportArgs) -> anyhow::Result<()> {
    let bytes = read_input(&args.in_path)?;
    let anim = t
        .decode(&bytes)
        .with_context(|| format!("decode gif '{}'", args.in_path.display()))?;

    let base_name = match args.base_name {
        Some(name) => name,
        None => args
            .in_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .with_context(|| format!("no file stem in '{}'", args.in_path.display()))?,
    };
    let opts = gifloom::ExportOptions {
        format: match args.format {
            FormatChoice::Png => gifloom::StillFormat::Png,
            FormatChoice::Jpeg => gifloom::StillFormat::Jpeg,
            FormatChoice::Jpg => gifloom::StillFormat::Jpg,
            FormatChoice::Webp => gifloom::StillFormat::Webp,
        },
        quality: args.quality,
        scale: args.scale,
        base_name,
    };
    let out = t
        .export_frames(&anim, &opts)
        .with_context(|| "export frames")?;
    write_output(&args.out, &out.archive)
}

fn cmd_recode(t: &gifloom::Transcoder, args: RecodeArgs) -> anyhow::Result<()> {
    let bytes = read_input(&args.in_path)?;
    let opts = gifloom::RecodeOptions {
        scale: args.scale,
        encode: encode_opts(&args.gif, args.fps, args.global_palette),
    };
    let out = t
        .recode(&bytes, &opts)
        .with_context(|| format!("recode gif '{}'", args.in_path.display()))?;
    write_output(&args.gif.out, &out)
}
