//! fetchgen CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::future::Future;
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use fetchgen_core::{Config, WatchSession};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fetchgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate a fetch client from an OpenAPI description
    Generate {
        /// Path to the OpenAPI description (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Path of the generated client file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep running and regenerate whenever the input changes
        #[arg(short, long)]
        watch: bool,
        /// Name of the generated client class (default: ApiClient)
        #[arg(long)]
        class_name: Option<String>,
        /// Custom Tera template to render instead of the built-in one
        #[arg(long)]
        template: Option<PathBuf>,
        /// Load settings from a YAML or TOML file; flags take precedence
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            input,
            output,
            watch,
            class_name,
            template,
            config,
        } => {
            let config = resolve_config(input, output, watch, class_name, template, config).await?;
            config.validate()?;

            info!("Input: {}", config.input_path.display());
            info!("Output: {}", config.output_path.display());

            if config.watch {
                let shutdown = shutdown_signal();
                let mut session = WatchSession::start(config)
                    .await
                    .context("Failed to start watch session")?;
                info!("Press Ctrl-C to stop watching");
                session.run_until(shutdown).await?;
            } else {
                let client = fetchgen_core::generate(&config)
                    .await
                    .context("Generation failed")?;
                println!(
                    "Generated {} in {}",
                    client.class_name,
                    config.output_path.display()
                );
            }
        }
    }
    Ok(())
}

/// Merge a config file (if any) with command-line flags.
///
/// Exits with a usage error when no input or output path is known.
async fn resolve_config(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    watch: bool,
    class_name: Option<String>,
    template: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<Config> {
    let base = match config_path {
        Some(path) => Some(
            Config::from_file(&path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
        ),
        None => None,
    };

    let input = input.or_else(|| base.as_ref().map(|c| c.input_path.clone()));
    let output = output.or_else(|| base.as_ref().map(|c| c.output_path.clone()));
    let (input, output) = match (input, output) {
        (Some(input), Some(output)) => (input, output),
        (None, _) => usage_error("the following required arguments were not provided: --input <INPUT>"),
        (_, None) => usage_error("the following required arguments were not provided: --output <OUTPUT>"),
    };

    let mut config = match base {
        Some(mut config) => {
            config.input_path = input;
            config.output_path = output;
            config
        }
        None => Config::new(input, output),
    };
    if class_name.is_some() {
        config.class_name = class_name;
    }
    if template.is_some() {
        config.template_path = template;
    }
    config.watch |= watch;
    Ok(config)
}

fn usage_error(msg: &str) -> ! {
    Cli::command()
        .error(ErrorKind::MissingRequiredArgument, msg)
        .exit()
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
///
/// The SIGTERM handler is installed when this is called, not when the future
/// is first polled, so a signal arriving during the initial cycle still ends
/// the session cleanly.
fn shutdown_signal() -> impl Future<Output = ()> {
    #[cfg(unix)]
    let terminate = {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate())
    };

    async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match terminate {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!("Failed to listen for SIGTERM: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }
}
