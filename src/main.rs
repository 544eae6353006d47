//! # monoqr CLI
//!
//! Command-line interface for rendering QR codes onto 1-bit framebuffers.
//!
//! ## Usage
//!
//! ```bash
//! # List built-in display profiles
//! monoqr profiles
//!
//! # Show the layout of a 25x25 code at scale 4 on the EV3 LCD
//! monoqr layout --modules 25 --scale 4
//!
//! # Render a secret to raw framebuffer bytes and a PNG preview
//! monoqr render 'Skne66[bbBj2Ss#qjW/' --raw secret.bin --png secret.png
//!
//! # Read the secret from a file and use a custom canvas
//! monoqr render --secret-file secret.txt --profile canvas:128x64/16 --scale 2 --raw out.bin
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use monoqr::{
    MonoqrError,
    display::{DisplayProfile, RenderConfig},
    matrix::ModuleMatrix,
    preview,
    render::{self, BitOrder, Layout, MarginPolicy, Packer, TrailingTrim},
};

/// monoqr - QR codes on monochrome framebuffers
#[derive(Parser, Debug)]
#[command(name = "monoqr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// JSON render config file (flags override its values)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Display profile: 'ev3', 'canvas:WxH' or 'canvas:WxH/STRIDE'
    #[arg(long)]
    profile: Option<String>,

    /// Pixels per module edge
    #[arg(long)]
    scale: Option<u32>,

    /// How spare rows are split between top and bottom margins
    #[arg(long, value_enum)]
    margin_policy: Option<PolicyArg>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a secret and render it to a framebuffer
    Render {
        /// Secret to encode (omit to use --secret-file)
        secret: Option<String>,

        /// Read the secret from a file (trailing newline stripped)
        #[arg(long, value_name = "FILE", conflicts_with = "secret")]
        secret_file: Option<PathBuf>,

        /// QR error correction level
        #[arg(long, value_enum, default_value = "l")]
        ec_level: EcLevelArg,

        #[command(flatten)]
        target: TargetArgs,

        /// Write raw framebuffer bytes to FILE
        #[arg(long, value_name = "FILE")]
        raw: Option<PathBuf>,

        /// Write a PNG preview to FILE
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Keep the final byte instead of trimming it
        #[arg(long)]
        no_trim: bool,
    },

    /// Print the layout for a matrix size without rendering
    Layout {
        /// Modules per matrix side
        #[arg(long, default_value = "25")]
        modules: u32,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// List built-in display profiles
    Profiles,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    HalfLessOne,
    Third,
}

impl From<PolicyArg> for MarginPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::HalfLessOne => MarginPolicy::HalfLessOne,
            PolicyArg::Third => MarginPolicy::Third,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EcLevelArg {
    L,
    M,
    Q,
    H,
}

impl From<EcLevelArg> for qrcode::EcLevel {
    fn from(arg: EcLevelArg) -> Self {
        match arg {
            EcLevelArg::L => qrcode::EcLevel::L,
            EcLevelArg::M => qrcode::EcLevel::M,
            EcLevelArg::Q => qrcode::EcLevel::Q,
            EcLevelArg::H => qrcode::EcLevel::H,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), MonoqrError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            secret,
            secret_file,
            ec_level,
            target,
            raw,
            png,
            no_trim,
        } => {
            let secret = read_secret(secret, secret_file)?;
            let config = resolve_config(&target)?;
            let canvas = config.profile.canvas_spec()?;

            let matrix = ModuleMatrix::encode(secret.as_bytes(), ec_level.into())?;
            debug!(side = matrix.side(), dark = matrix.dark_count(), "encoded secret");

            let layout = render::plan(
                canvas,
                matrix.module_count(),
                config.scale,
                config.margin_policy,
            )?;
            print_layout(config.profile.name(), &layout);

            let trim = if no_trim {
                TrailingTrim::Keep
            } else {
                TrailingTrim::DropFinalByte
            };
            let bitmap = Packer::new(BitOrder::LsbFirst, trim).pack(&matrix, &layout)?;
            info!(bytes = bitmap.len(), "rendered framebuffer");

            if raw.is_none() && png.is_none() {
                println!("Rendered {} bytes (use --raw or --png to save them)", bitmap.len());
            }
            if let Some(path) = raw {
                fs::write(&path, bitmap.as_bytes())?;
                println!("Saved {} bytes to {}", bitmap.len(), path.display());
            }
            if let Some(path) = png {
                fs::write(&path, preview::to_png(&bitmap)?)?;
                println!("Saved preview to {}", path.display());
            }
        }
        Commands::Layout { modules, target } => {
            let config = resolve_config(&target)?;
            let canvas = config.profile.canvas_spec()?;
            let layout = render::plan(canvas, modules, config.scale, config.margin_policy)?;
            print_layout(config.profile.name(), &layout);
        }
        Commands::Profiles => {
            println!("Available profiles:");
            for profile in DisplayProfile::built_in() {
                if let Ok(canvas) = profile.canvas_spec() {
                    println!(
                        "  {} ({}x{}, {} bytes per row)",
                        profile.name(),
                        canvas.width_px,
                        canvas.height_px,
                        canvas.row_stride_bytes
                    );
                }
            }
            println!("\nCustom canvases: canvas:WIDTHxHEIGHT or canvas:WIDTHxHEIGHT/STRIDE");
        }
    }

    Ok(())
}

/// Secret from the positional argument or a file.
fn read_secret(secret: Option<String>, file: Option<PathBuf>) -> Result<String, MonoqrError> {
    match (secret, file) {
        (Some(secret), _) => Ok(secret),
        (None, Some(path)) => {
            let text = fs::read_to_string(&path)?;
            Ok(text.trim_end_matches(['\r', '\n']).to_string())
        }
        (None, None) => Err(MonoqrError::Config(
            "No secret given. Pass it as an argument or use --secret-file".to_string(),
        )),
    }
}

/// Config file values overridden by command-line flags.
fn resolve_config(target: &TargetArgs) -> Result<RenderConfig, MonoqrError> {
    let mut config = match &target.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };

    if let Some(profile) = &target.profile {
        config.profile = DisplayProfile::parse(profile).map_err(MonoqrError::Config)?;
    }
    if let Some(scale) = target.scale {
        config.scale = scale;
    }
    if let Some(policy) = target.margin_policy {
        config.margin_policy = policy.into();
    }

    Ok(config)
}

fn print_layout(profile: &str, layout: &Layout) {
    println!(
        "{}: {}x{} modules at scale {} = {} px",
        profile, layout.module_count, layout.module_count, layout.scale, layout.content_px
    );
    println!(
        "  rows:  top {} + content {} + bottom {} ({:?})",
        layout.top_margin_rows, layout.content_px, layout.bottom_margin_rows, layout.margin_policy
    );
    println!(
        "  bytes: left {} + content {} + right {} ({} padding bits)",
        layout.left_margin_bytes,
        layout.content_bytes,
        layout.right_margin_bytes,
        layout.row_buffer_padding_bits
    );
}
