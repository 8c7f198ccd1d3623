//! qrlogo command-line entrypoint

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use qrlogo::{logging, preview_logo, Config, Generator, LogoSize, QRResult};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "qrlogo", version, about = "Generate QR codes with a logo in the middle")]
struct Cli {
    /// Optional configuration file. Defaults to qrlogo.toml in cwd or XDG config.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a payload at level H and save it as PNG
    Generate(GenerateArgs),
    /// Decode a logo and report its preview size
    CheckLogo {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Text or URL to encode
    payload: String,

    /// Target file, `.png` is appended when there is no extension
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// Image pasted at the center of the symbol
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Logo width in pixels
    #[arg(long, value_name = "PX", conflicts_with = "logo_fraction")]
    logo_width: Option<u32>,

    /// Logo width as a share of the image width, at most 0.25
    #[arg(long, value_name = "F")]
    logo_fraction: Option<f32>,

    /// Pixels per module
    #[arg(long, value_name = "N")]
    module_size: Option<u32>,

    /// Light border in modules
    #[arg(long, value_name = "N")]
    quiet_zone: Option<u32>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    match &config.source {
        Some(path) => info!("Using configuration file: {}", path.display()),
        None => debug!("No qrlogo.toml found, using defaults"),
    }

    let res = match cli.command {
        Command::Generate(args) => generate(&config, args),
        Command::CheckLogo { path } => check_logo(&path),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn generate(config: &Config, args: GenerateArgs) -> QRResult<()> {
    let mut opts = config.generator_options()?;
    if let Some(n) = args.module_size {
        opts.render.module_size = n;
    }
    if let Some(n) = args.quiet_zone {
        opts.render.quiet_zone = n;
    }
    if let Some(w) = args.logo_width {
        opts.logo_size = LogoSize::Fixed(w);
    }
    if let Some(f) = args.logo_fraction {
        opts.logo_size = LogoSize::Fraction(f);
    }

    let saved = Generator::new(opts).generate_to(&args.payload, args.logo.as_deref(), &args.output)?;
    println!("{}", saved.display());
    Ok(())
}

fn check_logo(path: &Path) -> QRResult<()> {
    let preview = preview_logo(path)?;
    info!("Logo {} is usable", path.display());
    println!("{}: preview {}x{}", path.display(), preview.width(), preview.height());
    Ok(())
}
