mod config;
mod export_cmd;
mod generate_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;
mod tui;

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use quickplan_core::PlanClient;

use config::{CliOverrides, QuickplanConfig};
use export_cmd::PlanFormat;

#[derive(Parser)]
#[command(
    name = "quickplan",
    about = "Generate a strategic plan from a mission and vision statement"
)]
struct Cli {
    /// Plan generation endpoint URL (overrides QUICKPLAN_ENDPOINT_URL env var)
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a quickplan config file with default settings
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the plan generation endpoint
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
        /// Provider model (overrides QUICKPLAN_MODEL env var)
        #[arg(long)]
        model: Option<String>,
        /// Provider base URL (overrides QUICKPLAN_PROVIDER_URL env var)
        #[arg(long)]
        provider_url: Option<String>,
    },
    /// Generate one plan through the endpoint and print it
    Generate {
        /// Mission statement
        #[arg(long)]
        mission: String,
        /// Vision statement
        #[arg(long)]
        vision: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
        format: PlanFormat,
        /// Output file path, or a directory for markdown (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render a plan saved with `generate --format json`
    Export {
        /// Path to the plan JSON file
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = PlanFormat::Markdown)]
        format: PlanFormat,
        /// Output file path, or a directory for markdown (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Open an email draft in the default mail client instead
        #[arg(long)]
        email: bool,
    },
    /// Launch the interactive terminal app
    App {
        /// Directory exports are saved to (defaults to the current directory)
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Execute the `quickplan init` command: write config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile::default();
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  server = {}:{}", cfg.server.bind, cfg.server.port);
    println!("  provider.model = {}", cfg.provider.model);
    println!("  client.endpoint_url = {}", cfg.client.endpoint_url);
    println!();
    println!(
        "Next: export {} with your provider key, then run `quickplan serve`.",
        cfg.provider.api_key_env
    );

    Ok(())
}

/// Install the global tracing subscriber. The terminal app logs to a file
/// so output does not land on the alternate screen.
fn init_tracing(log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = matches!(cli.command, Commands::App { .. }).then(config::log_path);
    init_tracing(log_file)?;

    match cli.command {
        Commands::Init { force } => {
            cmd_init(force)?;
        }
        Commands::Serve {
            bind,
            port,
            model,
            provider_url,
        } => {
            let resolved = QuickplanConfig::resolve(&CliOverrides {
                endpoint_url: cli.endpoint_url,
                model,
                provider_url,
                bind,
                port,
            })?;
            serve_cmd::run_serve(&resolved).await?;
        }
        Commands::Generate {
            mission,
            vision,
            format,
            output,
        } => {
            let resolved = QuickplanConfig::resolve(&CliOverrides {
                endpoint_url: cli.endpoint_url,
                ..CliOverrides::default()
            })?;
            generate_cmd::run_generate(
                &resolved.endpoint_url,
                &mission,
                &vision,
                format,
                output.as_deref(),
            )
            .await?;
        }
        Commands::Export {
            file,
            format,
            output,
            email,
        } => {
            export_cmd::run_export(&file, format, output.as_deref(), email).await?;
        }
        Commands::App { export_dir } => {
            let resolved = QuickplanConfig::resolve(&CliOverrides {
                endpoint_url: cli.endpoint_url,
                ..CliOverrides::default()
            })?;
            let export_dir = match export_dir {
                Some(dir) => dir,
                None => std::env::current_dir().context("cannot determine current directory")?,
            };
            tracing::info!(endpoint = %resolved.endpoint_url, "starting terminal app");
            tui::run_app(PlanClient::new(resolved.endpoint_url), export_dir).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "quickplan", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_parses_format_and_global_endpoint() {
        let cli = Cli::try_parse_from([
            "quickplan",
            "generate",
            "--mission",
            "m",
            "--vision",
            "v",
            "--format",
            "markdown",
            "--endpoint-url",
            "http://localhost:1/api/gemini",
        ])
        .unwrap();
        assert_eq!(cli.endpoint_url.as_deref(), Some("http://localhost:1/api/gemini"));
        match cli.command {
            Commands::Generate { format, .. } => assert_eq!(format, PlanFormat::Markdown),
            _ => panic!("expected generate"),
        }
    }
}
