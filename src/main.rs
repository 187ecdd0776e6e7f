//! Command-line front-end for the OCR core: one file in, extracted text out.
//!
//! This is the thinnest possible caller of the library — the interactive UI
//! proper is a separate concern. Environment errors abort before the upload
//! is read; request errors are reported with their classification.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;

use ocr_studio::config::AppConfig;
use ocr_studio::engine::Engine;
use ocr_studio::engine_config::EngineParams;
use ocr_studio::input::{self, UploadKind};
use ocr_studio::pipeline;
use ocr_studio::preprocessing::{PreprocessConfig, Rotation90};

struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    language: Option<String>,
    engine_mode: u32,
    seg_mode: u32,
    timeout_secs: Option<u64>,
    preprocess: PreprocessConfig,
}

const USAGE: &str = "\
Usage: ocr-studio <file> [options]

Options:
  --lang <code>        Recognition language code (default: eng)
  --oem <0-3>          OCR engine mode index (default: 3)
  --psm <0-13>         Page segmentation mode index (default: 3)
  --timeout <secs>     Engine timeout in seconds (default: 20)
  --no-grayscale       Disable the grayscale stage
  --denoise <1-40>     Enable denoising at the given strength
  --threshold <0-255>  Enable thresholding at the given level
  --rotate90 <deg>     Rotate by 0/90/180/270 degrees
  --rotate <deg>       Rotate freely by -180..180 degrees
  --out <file>         Write the extracted text to a .txt file
";

fn parse_args(mut args: std::env::Args) -> Result<CliArgs> {
    // Skip the binary name.
    args.next();

    let mut input = None;
    let mut output = None;
    let mut language = None;
    let mut engine_mode = 3;
    let mut seg_mode = 3;
    let mut timeout_secs = None;
    let mut preprocess = PreprocessConfig::default();

    let mut next_value = |args: &mut std::env::Args, flag: &str| -> Result<String> {
        args.next()
            .with_context(|| format!("{} requires a value", flag))
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lang" => language = Some(next_value(&mut args, "--lang")?),
            "--oem" => engine_mode = next_value(&mut args, "--oem")?.parse()?,
            "--psm" => seg_mode = next_value(&mut args, "--psm")?.parse()?,
            "--timeout" => timeout_secs = Some(next_value(&mut args, "--timeout")?.parse()?),
            "--no-grayscale" => preprocess.grayscale = false,
            "--denoise" => {
                preprocess.denoise = true;
                preprocess.denoise_strength = next_value(&mut args, "--denoise")?.parse()?;
            }
            "--threshold" => {
                preprocess.threshold = true;
                preprocess.threshold_level = next_value(&mut args, "--threshold")?.parse()?;
            }
            "--rotate90" => {
                preprocess.rotate90 = true;
                let degrees: u32 = next_value(&mut args, "--rotate90")?.parse()?;
                preprocess.angle90 = Rotation90::from_degrees(degrees)?;
            }
            "--rotate" => {
                preprocess.rotate_free = true;
                preprocess.angle = next_value(&mut args, "--rotate")?.parse()?;
            }
            "--out" => output = Some(PathBuf::from(next_value(&mut args, "--out")?)),
            "--help" | "-h" => {
                print!("{}", USAGE);
                std::process::exit(0);
            }
            other if input.is_none() && !other.starts_with('-') => {
                input = Some(PathBuf::from(other));
            }
            other => bail!("unrecognized argument: {}\n\n{}", other, USAGE),
        }
    }

    let input = input.with_context(|| format!("no input file given\n\n{}", USAGE))?;
    Ok(CliArgs {
        input,
        output,
        language,
        engine_mode,
        seg_mode,
        timeout_secs,
        preprocess,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args())?;
    let config = AppConfig::from_env().context("invalid configuration")?;

    // Environment check is fatal: no uploads are touched if the engine is
    // missing or unverifiable.
    let engine = Engine::initialize(config.binary_override.as_deref())
        .await
        .context("OCR engine environment check failed")?;
    info!(version = %engine.version, "engine ready");

    let params = EngineParams::from_indices(args.engine_mode, args.seg_mode)?;
    let language = args.language.unwrap_or(config.language);
    let timeout_secs = args.timeout_secs.unwrap_or(config.timeout_secs);

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("could not read {}", args.input.display()))?;

    let is_pdf = args
        .input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    let kind = if is_pdf {
        UploadKind::Pdf
    } else {
        UploadKind::Image
    };

    let text = match kind {
        UploadKind::Pdf => {
            pipeline::extract_text_from_pdf(
                &engine,
                &bytes,
                &args.preprocess,
                &language,
                &params,
                timeout_secs,
                config.pdf_dpi,
                config.max_upload_bytes,
            )
            .await?
        }
        UploadKind::Image => {
            let raw = input::accept_upload(&bytes, config.max_upload_bytes)?;
            pipeline::extract_text(
                &engine,
                &raw,
                &args.preprocess,
                &language,
                &params,
                timeout_secs,
            )
            .await?
        }
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, &text)
                .with_context(|| format!("could not write {}", path.display()))?;
            info!(path = %path.display(), characters = text.len(), "text written");
        }
        None => print!("{}", text),
    }

    Ok(())
}
