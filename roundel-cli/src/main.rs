use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use roundel::image::{compress_to_jpeg, compress_to_png};
use roundel::{Bitmap, DecodeMode, PngCompression, ResampleConfig, SuperSampling};

#[derive(Parser)]
#[command(name = "roundel")]
#[command(about = "Supersampled image resizing and rounded avatars", long_about = None)]
#[command(version)]
struct Args {
    /// Config file (defaults to ~/.config/roundel/config.json if present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Supersampling factor, overrides the config
    #[arg(long, value_name = "FACTOR", global = true)]
    scale: Option<f64>,

    /// Decode mode, overrides the config
    #[arg(long, value_enum, global = true)]
    mode: Option<DecodeModeArg>,

    /// PNG compression level, overrides the config
    #[arg(long, value_enum, global = true)]
    png_compression: Option<PngCompressionArg>,

    /// JPEG quality (0-100), overrides the config
    #[arg(long, value_name = "QUALITY", global = true)]
    quality: Option<u8>,

    /// Verbose output
    #[arg(short, long, default_value_t, global = true)]
    verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, default_value_t, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Supersample, then bound the longer side
    Fit {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (.png, .jpg or .jpeg)
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Length of the longer side
        #[arg(short, long, value_name = "PIXELS")]
        size: u32,
    },
    /// Supersample, then resize to an exact width and height
    Exact {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (.png, .jpg or .jpeg)
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        #[arg(long, value_name = "PIXELS")]
        width: u32,

        #[arg(long, value_name = "PIXELS")]
        height: u32,
    },
    /// Circular avatar with transparent corners
    Round {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (.png keeps the transparency)
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Length of the shorter side
        #[arg(short, long, value_name = "PIXELS")]
        size: u32,
    },
    /// Print the effective config
    Config {
        /// Write it to ~/.config/roundel/config.json (or --config)
        #[arg(long, default_value_t)]
        save: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DecodeModeArg {
    Color,
    Unchanged,
}

impl From<DecodeModeArg> for DecodeMode {
    fn from(arg: DecodeModeArg) -> Self {
        match arg {
            DecodeModeArg::Color => DecodeMode::Color,
            DecodeModeArg::Unchanged => DecodeMode::Unchanged,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PngCompressionArg {
    Fast,
    Default,
    Best,
}

impl From<PngCompressionArg> for PngCompression {
    fn from(arg: PngCompressionArg) -> Self {
        match arg {
            PngCompressionArg::Fast => PngCompression::Fast,
            PngCompressionArg::Default => PngCompression::Default,
            PngCompressionArg::Best => PngCompression::Best,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    setup_logging(args.verbose, args.quiet);

    let config = build_config(&args)?;
    log::debug!("Using config: {config:?}");

    match &args.command {
        Command::Fit {
            input,
            output,
            size,
        } => {
            let mut ss = supersample(input, &config)?;
            ss.resize_to_fit(*size)
                .with_context(|| format!("Failed to fit image to {size}"))?;
            write_output(ss.into_bitmap()?, output, &config)?;
        }
        Command::Exact {
            input,
            output,
            width,
            height,
        } => {
            let mut ss = supersample(input, &config)?;
            ss.resize(*width, *height)
                .with_context(|| format!("Failed to resize image to {width}x{height}"))?;
            write_output(ss.into_bitmap()?, output, &config)?;
        }
        Command::Round {
            input,
            output,
            size,
        } => {
            if !is_png(output) {
                log::warn!("Rounded images need PNG output to keep transparent corners");
            }
            let mut ss = supersample(input, &config)?;
            ss.apply_circular_mask()?;
            ss.resize_rounded(*size)
                .with_context(|| format!("Failed to round image to {size}"))?;
            write_output(ss.into_bitmap()?, output, &config)?;
        }
        Command::Config { save } => {
            println!("{}", config.to_json().context("Failed to serialize config")?);
            if *save {
                match &args.config {
                    Some(path) => {
                        config.save_to(path).with_context(|| {
                            format!("Failed to save config to {}", path.display())
                        })?;
                        log::info!("Saved config to {}", path.display());
                    }
                    None => {
                        config
                            .save()
                            .context("Failed to save config to ~/.config/roundel/config.json")?;
                        log::info!("Saved config to ~/.config/roundel/config.json");
                    }
                }
            }
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn build_config(args: &Args) -> Result<ResampleConfig> {
    let mut config = match &args.config {
        Some(path) => ResampleConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ResampleConfig::load().unwrap_or_default(),
    };

    if let Some(scale) = args.scale {
        config.scale_factor = scale;
    }
    if let Some(mode) = args.mode {
        config.decode_mode = mode.into();
    }
    if let Some(compression) = args.png_compression {
        config.png_compression = compression.into();
    }
    if let Some(quality) = args.quality {
        config.jpeg_quality = quality;
    }

    config.validate().context("Invalid settings")?;
    Ok(config)
}

fn supersample(input: &Path, config: &ResampleConfig) -> Result<SuperSampling> {
    // Validate input file
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let data =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let ss = SuperSampling::from_bytes(&data, config.decode_mode, config.scale_factor)
        .with_context(|| format!("Failed to load image: {}", input.display()))?;

    log::info!(
        "Loaded {} ({}), supersampled to {}",
        input.display(),
        ss.original_size(),
        ss.size()
    );
    Ok(ss)
}

fn is_png(path: &Path) -> bool {
    !matches!(
        extension(path).as_deref(),
        Some("jpg") | Some("jpeg")
    )
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn write_output(img: Bitmap, output: &Path, config: &ResampleConfig) -> Result<()> {
    // Create output directory if it doesn't exist
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let mut writer = BufWriter::new(
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?,
    );

    let written = if is_png(output) {
        compress_to_png(&img, &mut writer, config.png_compression)
    } else {
        compress_to_jpeg(&img, &mut writer, config.jpeg_quality)
    };
    written.with_context(|| format!("Failed to write {}", output.display()))?;
    writer.flush()?;

    log::info!(
        "Done: {} ({}x{})",
        output.display(),
        img.width(),
        img.height()
    );
    Ok(())
}

#[test]
fn output_format_follows_extension() {
    assert!(is_png(Path::new("avatar.png")));
    assert!(is_png(Path::new("avatar")));
    assert!(!is_png(Path::new("photo.JPG")));
    assert!(!is_png(Path::new("dir.png/photo.jpeg")));
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Args::command().debug_assert();
}
