//! Crop Disease Detection CLI
//!
//! Serves the upload page, or runs a single detection from the command line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use crop_disease_detection::backend::backend_name;
use crop_disease_detection::catalog::DiseaseCatalog;
use crop_disease_detection::config::{ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crop_disease_detection::inference::{
    ChannelOrder, Outcome, Pipeline, PixelScaling, PreprocessConfig, MISSING_IMAGE_WARNING,
};
use crop_disease_detection::model::{load_classifier, DEFAULT_MODEL_PATH};
use crop_disease_detection::server::{build_router, AppState};
use crop_disease_detection::utils::logging::{init_logging, LogConfig, LogLevel};
use crop_disease_detection::utils::format_bytes;

/// Crop Disease Detection
///
/// Upload a crop leaf photo and get back the detected condition together
/// with treatment advice.
#[derive(Parser, Debug)]
#[command(name = "crop-disease-detection")]
#[command(version)]
#[command(about = "Crop leaf disease detection with Burn", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error); overrides --verbose
    #[arg(long, env = "CROP_DISEASE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Plain log output without ANSI colors
    #[arg(long, default_value = "false")]
    no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1", env = "CROP_DISEASE_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8501", env = "CROP_DISEASE_PORT")]
        port: u16,

        /// Path to the trained model record
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH, env = "CROP_DISEASE_MODEL")]
        model: PathBuf,

        /// JSON catalog replacing the built-in classes
        #[arg(long, env = "CROP_DISEASE_CATALOG")]
        catalog: Option<PathBuf>,

        /// Largest accepted upload in bytes
        #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "CROP_DISEASE_MAX_UPLOAD_BYTES")]
        max_upload_bytes: usize,

        /// Channel order of the model input
        #[arg(long, value_enum, default_value = "bgr", env = "CROP_DISEASE_CHANNEL_ORDER")]
        channel_order: ChannelOrder,

        /// Pixel value scaling of the model input
        #[arg(long, value_enum, default_value = "raw", env = "CROP_DISEASE_SCALING")]
        scaling: PixelScaling,
    },

    /// Run detection on a single image
    Detect {
        /// Path to input image
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the trained model record
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH, env = "CROP_DISEASE_MODEL")]
        model: PathBuf,

        /// JSON catalog replacing the built-in classes
        #[arg(long, env = "CROP_DISEASE_CATALOG")]
        catalog: Option<PathBuf>,

        /// Channel order of the model input
        #[arg(long, value_enum, default_value = "bgr", env = "CROP_DISEASE_CHANNEL_ORDER")]
        channel_order: ChannelOrder,

        /// Pixel value scaling of the model input
        #[arg(long, value_enum, default_value = "raw", env = "CROP_DISEASE_SCALING")]
        scaling: PixelScaling,
    },

    /// List the classes the model can predict
    Classes {
        /// JSON catalog replacing the built-in classes
        #[arg(long, env = "CROP_DISEASE_CATALOG")]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = if cli.verbose {
        LogConfig::verbose()
    } else if cli.no_color {
        LogConfig::production()
    } else {
        LogConfig::default()
    };
    log_config.ansi_colors &= !cli.no_color;
    if let Some(level) = cli.log_level.as_deref() {
        log_config = log_config.with_level(LogLevel::parse(level));
    }

    let _ = init_logging(&log_config);

    match cli.command {
        Commands::Serve {
            host,
            port,
            model,
            catalog,
            max_upload_bytes,
            channel_order,
            scaling,
        } => {
            let config = ServerConfig {
                host,
                port,
                model_path: model,
                catalog_path: catalog,
                max_upload_bytes,
                preprocess: PreprocessConfig {
                    channel_order,
                    scaling,
                    ..PreprocessConfig::default()
                },
            };
            cmd_serve(config).await?;
        }

        Commands::Detect {
            input,
            model,
            catalog,
            channel_order,
            scaling,
        } => {
            let preprocess = PreprocessConfig {
                channel_order,
                scaling,
                ..PreprocessConfig::default()
            };
            cmd_detect(&input, &model, catalog.as_deref(), preprocess)?;
        }

        Commands::Classes { catalog } => {
            cmd_classes(catalog.as_deref())?;
        }
    }

    Ok(())
}

fn print_banner() {
    println!(
        "{}",
        r#"
 ==============================================
   Crop Disease Detection
   Leaf diagnosis with Burn + Rust
 ==============================================
  "#
        .green()
    );
}

/// Built-in catalog unless a JSON file is given
fn load_catalog(path: Option<&Path>) -> Result<DiseaseCatalog> {
    match path {
        Some(path) => {
            info!("Loading catalog from {:?}", path);
            DiseaseCatalog::load(path).with_context(|| format!("Failed to load catalog {:?}", path))
        }
        None => Ok(DiseaseCatalog::builtin()),
    }
}

/// Catalog + model + preprocessing; any failure here is fatal
fn build_pipeline(
    model: &Path,
    catalog: Option<&Path>,
    preprocess: PreprocessConfig,
) -> Result<Pipeline> {
    let catalog = Arc::new(load_catalog(catalog)?);

    info!("Loading model from {:?} ({} backend)", model, backend_name());
    let classifier = load_classifier(model, catalog.len())
        .with_context(|| format!("Failed to load model {:?}", model))?;

    Pipeline::new(Arc::new(classifier), catalog, preprocess)
        .context("Model and catalog disagree")
}

async fn cmd_serve(config: ServerConfig) -> Result<()> {
    print_banner();
    config.validate()?;

    info!("Crop Disease Detection v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Model:       {:?}", config.model_path);
    info!("  Catalog:     {:?}", config.catalog_path);
    info!("  Upload max:  {}", format_bytes(config.max_upload_bytes));
    info!("  Preprocess:  {:?}", config.preprocess);

    let pipeline = build_pipeline(
        &config.model_path,
        config.catalog_path.as_deref(),
        config.preprocess,
    )?;
    info!(
        "Ready: {} ({} classes)",
        pipeline.classifier().describe(),
        pipeline.catalog().len()
    );

    let addr = config.bind_address();
    let state = Arc::new(AppState::new(config, pipeline));
    let app = build_router(state);

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cmd_detect(
    input: &Path,
    model: &Path,
    catalog: Option<&Path>,
    preprocess: PreprocessConfig,
) -> Result<()> {
    println!("{}", "Detection Configuration:".cyan().bold());
    println!("  Input:   {}", input.display());
    println!("  Model:   {}", model.display());
    println!("  Backend: {}", backend_name());
    println!();

    let bytes = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let pipeline = build_pipeline(model, catalog, preprocess)?;

    let outcome = match pipeline.run(Some(bytes.as_slice())) {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{} {}", "Error:".red(), e);
            return Err(e.into());
        }
    };

    if let Outcome::MissingImage = outcome {
        warn!("Input {:?} is empty", input);
    }
    print!("{}", report(&outcome));

    Ok(())
}

/// Terminal rendering of one detection
fn report(outcome: &Outcome) -> String {
    match outcome {
        Outcome::MissingImage => format!("{} {}\n", "Warning:".yellow(), MISSING_IMAGE_WARNING),
        Outcome::Diagnosed(diagnosis) => {
            let prediction = &diagnosis.prediction;
            let headline = if prediction.healthy {
                prediction.headline.green().bold()
            } else {
                prediction.headline.red().bold()
            };

            format!(
                "Image Shape: {} x {} pixels\n{} {}\n{} {}\n\nInference time: {:.2}ms\n",
                diagnosis.image.width,
                diagnosis.image.height,
                "Result:".bold(),
                headline,
                "Treatment:".bold(),
                prediction.advisory,
                diagnosis.inference_time_ms
            )
        }
    }
}

fn cmd_classes(catalog: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog)?;

    println!("{}", format!("{} classes:", catalog.len()).cyan().bold());
    for (index, entry) in catalog.iter().enumerate() {
        let status = if entry.is_healthy() {
            "healthy".green()
        } else {
            entry.condition.as_str().yellow()
        };
        println!("  {:>2}. {:<40} {}", index, entry.label, status);
    }

    Ok(())
}
