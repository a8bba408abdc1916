use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use qrstyle::catalog::PatternCatalog;
use qrstyle::color::Color;
use qrstyle::export::{ExportFormat, ExportPipeline};
use qrstyle::frame::{FrameProps, FrameSelection};
use qrstyle::logo::{LogoImage, LogoSpec};
use qrstyle::matrix::QrEncoder;
use qrstyle::payload::ContentKind;
use qrstyle::session::QrSession;
use qrstyle::settings::Settings;
use qrstyle::style::StyleConfig;

#[derive(Parser)]
#[command(name = "qrstyle", version, about = "Render a styled QR code and export it")]
struct Cli {
    /// Text to encode
    data: String,
    /// Content kind: url, text, email, phone, sms, wifi, vcard, location, whatsapp, upi, pdf
    #[arg(long, default_value = "url")]
    kind: ContentKind,
    /// Style JSON file
    #[arg(long)]
    style: Option<PathBuf>,
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Output format: png, jpeg, svg, pdf, eps
    #[arg(long, default_value = "png")]
    format: ExportFormat,
    /// Output size in pixels
    #[arg(long, default_value_t = 1000)]
    size: u32,
    /// Frame id: none, scan-me-1, scan-me-2, balloon, border
    #[arg(long, default_value = "none")]
    frame: String,
    /// Frame caption
    #[arg(long)]
    frame_text: Option<String>,
    /// Frame color, #rrggbb
    #[arg(long)]
    frame_color: Option<Color>,
    /// Logo image file
    #[arg(long)]
    logo: Option<PathBuf>,
    /// Logo size as a percentage of the code
    #[arg(long, default_value_t = 20.0)]
    logo_size: f64,
    /// Output directory (default: generated)
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Output file name
    #[arg(long)]
    name: Option<String>,
    /// Print the code to the terminal
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings = Settings::load(cli.settings.as_deref()).context("loading settings")?;
    let mut style = match &cli.style {
        Some(path) => StyleConfig::from_json_file(path).with_context(|| format!("loading style {}", path.display()))?,
        None => StyleConfig::default(),
    };
    if let Some(path) = &cli.logo {
        let bytes = fs::read(path).with_context(|| format!("reading logo {}", path.display()))?;
        style = style.with_logo(Some(LogoSpec {
            image: LogoImage::new(bytes),
            size_pct: cli.logo_size,
            margin_px: 2.0,
            clear_background: true,
        }));
    }

    let pipeline = ExportPipeline::new(Arc::new(settings));
    let session = QrSession::new(QrEncoder, pipeline, PatternCatalog::builtin(), cli.data, cli.kind, style)?;
    for warning in session.warnings() {
        eprintln!("warning: {}", warning);
    }
    if cli.print {
        println!("{}", session.matrix());
    }

    let mut props = FrameProps::default();
    if let Some(text) = cli.frame_text {
        props.text = text;
    }
    if let Some(color) = cli.frame_color {
        props.color = color;
    }
    let artifact = session
        .export(cli.format, cli.size, FrameSelection::new(cli.frame, props))
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if let Some(warning) = artifact.warning {
        eprintln!("warning: {}", warning);
    }
    let path = artifact.save(cli.out_dir.as_deref(), cli.name.as_deref())?;
    println!("{}", path.display());
    Ok(())
}
