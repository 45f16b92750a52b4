use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use passport_gate::mrz::CheckDigit;
use passport_gate::providers::{StaticFaces, StaticMrzLines};
use passport_gate::quality::{check_quality, sharpness_score};
use passport_gate::report::Response;
use passport_gate::{FaceDetector, FaceRegion, MrzExtractor, RawImage, ValidationConfig, Validator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "passport_check", version, about = "Passport image validation tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full validation pipeline on an image and print the JSON response
    Validate {
        #[arg(long)]
        image: PathBuf,
        /// Text file with the MRZ lines (stands in for OCR)
        #[arg(long, conflicts_with = "tesseract")]
        mrz_file: Option<PathBuf>,
        /// Extract the MRZ with the system tesseract install
        #[arg(long)]
        tesseract: bool,
        /// Face box as x,y,width,height (repeatable, first one is used)
        #[arg(long = "face", value_parser = parse_face)]
        faces: Vec<FaceRegion>,
        /// JSON config file; PASSPORT_* environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print resolution and sharpness for an image
    Quality {
        #[arg(long)]
        image: PathBuf,
    },
    /// Compute the ICAO check digit of an MRZ field
    CheckDigit { field: String },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Validate {
            image,
            mrz_file,
            tesseract,
            faces,
            config,
        } => validate_cmd(&image, mrz_file.as_deref(), tesseract, faces, config.as_deref()),
        Command::Quality { image } => quality_cmd(&image),
        Command::CheckDigit { field } => check_digit_cmd(&field),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn parse_face(s: &str) -> Result<FaceRegion, String> {
    let vals: Vec<u32> = s
        .split(',')
        .map(|v| v.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid face box {:?}: {}", s, e))?;
    match vals.as_slice() {
        [x, y, w, h] => Ok(FaceRegion::new(*x, *y, *w, *h)),
        _ => Err(format!("face box needs 4 values x,y,width,height, got {:?}", s)),
    }
}

fn load_config(path: Option<&Path>) -> Result<ValidationConfig> {
    let base = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ValidationConfig::from_json(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ValidationConfig::default(),
    };
    Ok(base.with_env_overrides())
}

fn mrz_provider(mrz_file: Option<&Path>, tesseract: bool) -> Result<Arc<dyn MrzExtractor>> {
    if let Some(path) = mrz_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read MRZ file {}", path.display()))?;
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        return Ok(Arc::new(StaticMrzLines::new(lines)));
    }
    if tesseract {
        return tesseract_provider();
    }
    bail!("no MRZ source: pass --mrz-file or --tesseract")
}

#[cfg(feature = "tesseract")]
fn tesseract_provider() -> Result<Arc<dyn MrzExtractor>> {
    Ok(Arc::new(passport_gate::providers::TesseractMrz::default()))
}

#[cfg(not(feature = "tesseract"))]
fn tesseract_provider() -> Result<Arc<dyn MrzExtractor>> {
    bail!("built without the `tesseract` feature")
}

fn validate_cmd(
    image: &Path,
    mrz_file: Option<&Path>,
    tesseract: bool,
    faces: Vec<FaceRegion>,
    config: Option<&Path>,
) -> Result<ExitCode> {
    let config = load_config(config)?;
    let mrz = mrz_provider(mrz_file, tesseract)?;
    let faces: Arc<dyn FaceDetector> = Arc::new(StaticFaces::new(faces));
    let validator = Validator::new(config, mrz, faces);

    let bytes =
        std::fs::read(image).with_context(|| format!("failed to read {}", image.display()))?;

    let start = Instant::now();
    let result = validator.validate_bytes(&bytes);
    log::info!("validated {} in {:?}", image.display(), start.elapsed());

    let response = Response::from(&result);
    let json = serde_json::to_string_pretty(&response).context("failed to encode response")?;
    println!("{}", json);

    Ok(if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn quality_cmd(image: &Path) -> Result<ExitCode> {
    let img = RawImage::open(image)?;
    let config = ValidationConfig::from_env();

    println!("Image: {} ({}x{})", image.display(), img.width(), img.height());
    println!("Sharpness (Laplacian variance): {:.1}", sharpness_score(&img));

    let verdict = check_quality(&img, &config.quality);
    println!(
        "Verdict: {} - {}",
        if verdict.passed { "PASS" } else { "FAIL" },
        verdict.reason
    );

    Ok(if verdict.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn check_digit_cmd(field: &str) -> Result<ExitCode> {
    let field = field.trim().to_uppercase();
    match CheckDigit::compute(&field) {
        Some(digit) => {
            println!("{}{}", field, digit);
            Ok(ExitCode::SUCCESS)
        }
        None => bail!("field {:?} contains characters outside A-Z0-9<", field),
    }
}
