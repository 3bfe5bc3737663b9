//! FutureSelf - Time-locked, emotion-aware letters to your future self
//!
//! Serves the letter vault over HTTP and offers a few offline commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futureself::{
    api::{build_app, AppState},
    config::{resolve_secret_from_env, FutureSelfConfig, StorageBackend},
    EmotionClassifier,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "futureself")]
#[command(author = "FutureSelf Team")]
#[command(version)]
#[command(about = "Time-locked, emotion-aware letters to your future self")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FUTURESELF_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Classify a piece of text and print the result as JSON
    Classify {
        /// Text to classify
        text: String,
    },

    /// Run diagnostics
    Doctor,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let config = match &cli.config {
        Some(path) => FutureSelfConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FutureSelfConfig::default(),
    };

    match cli.command {
        Commands::Serve { host, port } => run_server(config, host, port).await?,
        Commands::Classify { text } => classify(&config, &text)?,
        Commands::Doctor => run_doctor(&config).await?,
        Commands::Config { default } => show_config(if default { None } else { Some(&config) })?,
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("futureself={},tower_http={}", log_level, log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(mut config: FutureSelfConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let state = AppState::from_config(&config)
        .await
        .context("Failed to initialize the vault")?;
    let app = build_app(state, &config.server.cors_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("FutureSelf listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

fn classify(config: &FutureSelfConfig, text: &str) -> Result<()> {
    let classifier = EmotionClassifier::new(&config.classifier)?;
    let result = classifier.classify(text);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn run_doctor(config: &FutureSelfConfig) -> Result<()> {
    println!("FutureSelf Doctor");
    println!();

    println!("Checking configuration...");
    match config.validate() {
        Ok(()) => println!("  ✓ Configuration is valid"),
        Err(e) => println!("  ✗ {}", e),
    }

    println!();
    println!("Checking vault secret...");
    match resolve_secret_from_env(&config.crypto) {
        Ok(_) => println!("  ✓ ${} is set", config.crypto.secret_env),
        Err(e) => println!("  ✗ {}", e),
    }

    println!();
    println!("Checking storage...");
    match config.storage.backend {
        StorageBackend::Memory => println!("  ℹ In-memory storage (records are lost on exit)"),
        StorageBackend::File => {
            let dir = &config.storage.base_dir;
            match tokio::fs::create_dir_all(dir).await {
                Ok(()) => println!("  ✓ Storage directory: {}", dir.display()),
                Err(e) => println!("  ✗ Cannot create {}: {}", dir.display(), e),
            }
        }
    }

    println!();
    println!("Doctor check complete!");
    Ok(())
}

fn show_config(config: Option<&FutureSelfConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
