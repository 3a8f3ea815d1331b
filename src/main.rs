use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use receiptcam::{ReceiptcamConfig, ReceiptcamOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "receiptcam")]
#[command(about = "Rust-based handheld receipt scanner with local OCR and host-bridge dispatch")]
#[command(version)]
#[command(long_about = "A handheld receipt scanner: point the camera at a paper receipt, \
capture a still, extract its text locally, and forward both the image and the text to the \
host's interpretation channel. Hardware camera, buttons, and OCR engine are selected via \
cargo features; mock implementations are used where a feature is absent.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "receiptcam.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the system")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Dry run mode - wire components but don't start them
    #[arg(long, help = "Perform dry run - wire components but don't start them")]
    dry_run: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Directory for daily-rolling log files
    #[arg(long, value_name = "DIR", help = "Write daily-rolling log files into this directory")]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle special modes that don't require full initialization
    if args.print_config {
        print_default_config();
        return Ok(());
    }

    // Initialize logging; the guard must outlive the runtime
    let _log_guard = init_logging(&args)?;

    info!("Starting receiptcam v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    // Load and validate configuration
    let config = match ReceiptcamConfig::load_from_file(&args.config) {
        Ok(config) => {
            info!("Configuration loaded successfully from: {}", args.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                info!("Configuration validation successful");
                println!("Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }
    config.validate()?;

    // Wire the orchestrator from the platform implementations this build
    // carries
    let mut orchestrator = build_orchestrator(config)?;

    if args.dry_run {
        info!("Dry run mode - components wired but not started");
        println!("Dry run completed successfully - all components wired");
        return Ok(());
    }

    orchestrator.start().await.map_err(|e| {
        error!("Failed to start system: {}", e);
        e
    })?;

    let exit_code = orchestrator.run().await.map_err(|e| {
        error!("System error during execution: {}", e);
        e
    })?;

    info!("Receiptcam exited with code: {}", exit_code);
    std::process::exit(exit_code);
}

fn build_orchestrator(config: ReceiptcamConfig) -> Result<ReceiptcamOrchestrator> {
    let backend = build_backend()?;
    let ocr = build_ocr(&config);
    let bridge = build_bridge(&config);
    let sink: Arc<dyn receiptcam::ViewSink> = Arc::new(receiptcam::ConsoleView);

    Ok(ReceiptcamOrchestrator::new(
        config, backend, ocr, bridge, sink,
    ))
}

#[cfg(all(target_os = "linux", feature = "camera"))]
fn build_backend() -> Result<Arc<dyn receiptcam::VideoBackend>> {
    Ok(Arc::new(receiptcam::GstVideoBackend::new()?))
}

#[cfg(not(all(target_os = "linux", feature = "camera")))]
fn build_backend() -> Result<Arc<dyn receiptcam::VideoBackend>> {
    warn!("Built without the camera feature; using the mock video backend");
    Ok(Arc::new(receiptcam::MockVideoBackend::new()))
}

#[cfg(feature = "ocr-tesseract")]
fn build_ocr(config: &ReceiptcamConfig) -> Arc<dyn receiptcam::OcrEngine> {
    Arc::new(receiptcam::TesseractOcrEngine::new(
        config.ocr.data_path.clone(),
    ))
}

#[cfg(not(feature = "ocr-tesseract"))]
fn build_ocr(_config: &ReceiptcamConfig) -> Arc<dyn receiptcam::OcrEngine> {
    warn!("Built without the ocr-tesseract feature; text recognition is unavailable");
    Arc::new(receiptcam::UnavailableOcrEngine)
}

#[cfg(unix)]
fn build_bridge(config: &ReceiptcamConfig) -> Arc<dyn receiptcam::HostBridge> {
    Arc::new(receiptcam::UnixSocketBridge::new(
        &config.bridge.socket_path,
    ))
}

#[cfg(not(unix))]
fn build_bridge(_config: &ReceiptcamConfig) -> Arc<dyn receiptcam::HostBridge> {
    warn!("No Unix socket transport on this platform; bridge posts are recorded in memory");
    Arc::new(receiptcam::bridge::RecordingBridge::new())
}

fn init_logging(args: &Args) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Determine log level based on flags
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    // Create environment filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("receiptcam={}", log_level)));

    // Configure format based on options
    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    // Optional daily-rolling file output
    let (file_layer, guard) = match &args.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "receiptcam.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Print default configuration in TOML format
fn print_default_config() {
    println!("# Receiptcam Configuration File");
    println!("# This is the default configuration with all available options");
    println!();

    let default_config = r#"[camera]
# Camera device index (e.g., 0 for /dev/video0)
index = 0
# Preview resolution (width, height)
resolution = [640, 480]
# Preview frames per second
fps = 30
# Target resolution for the native still-capture path
still_resolution = [1280, 720]
# Zoom applied per wheel notch, in capability units
zoom_step = 0.1

[ocr]
# Combined language-set identifier for the recognition model
languages = "eng+deu"
# Directory holding trained data (optional; engine default when absent)
# data_path = "/usr/share/tessdata"

[bridge]
# Unix socket path of the host messaging bridge
socket_path = "/run/receiptcam/bridge.sock"
# Instruction sent with every interpretation request
instruction = "Interpret this receipt image and its extracted text. Summarize the merchant, date, line items, and total."
# Subject line for email-send dispatches
email_subject = "Scanned receipt"

[input]
# Enable terminal keyboard input
keyboard = true
# Hardware input device path (volume keys, scroll wheel)
button_device = "/dev/input/event0"

[system]
# Event bus capacity
event_bus_capacity = 100
"#;

    println!("{}", default_config);
}
