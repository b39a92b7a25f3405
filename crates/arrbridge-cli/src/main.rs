use std::path::PathBuf;
use std::process::ExitCode;

use arrbridge_core::tools::tool_definitions;
use arrbridge_core::{AppConfig, BridgeError, MediaTools, ToolCall};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "arrbridge", version, about = "Search Radarr/Sonarr and add movies and shows")]
struct Cli {
    /// Config file to load instead of the platform default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search movies by title.
    SearchMovies { title: String },
    /// Add a movie by TMDb id.
    AddMovie {
        tmdb_id: u64,
        #[arg(long)]
        root_folder: Option<String>,
    },
    /// Search shows, optionally adding a single match.
    SearchShows {
        description: String,
        #[arg(long)]
        auto_add: bool,
    },
    /// Add a show by TVDB id.
    AddShow {
        tvdb_id: u64,
        title: String,
        #[arg(long)]
        root_folder: Option<String>,
    },
    /// Report configuration and probe lookups.
    TestConfig,
    /// Check both servers.
    Status,
    /// Print the tool definitions.
    Tools,
    /// Read one JSON tool call per line from stdin, answer on stdout.
    Stdio,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref());
    init_tracing(config.as_ref().map(|c| c.log_filter.as_str()).unwrap_or("arrbridge=info"));

    let tools = match config.and_then(MediaTools::from_config) {
        Ok(tools) => tools,
        Err(e) => {
            tracing::error!(error = %e, "Configuration unavailable, tools will report it");
            MediaTools::unconfigured()
        }
    };

    match run(cli.command, &tools).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; stdout carries tool output.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, tools: &MediaTools) -> Result<(), BridgeError> {
    let call = match command {
        Command::SearchMovies { title } => ToolCall::SearchMovies { title },
        Command::AddMovie {
            tmdb_id,
            root_folder,
        } => ToolCall::AddMovieById {
            tmdb_id,
            root_folder,
        },
        Command::SearchShows {
            description,
            auto_add,
        } => ToolCall::SearchAndAddShow {
            description,
            auto_add,
        },
        Command::AddShow {
            tvdb_id,
            title,
            root_folder,
        } => ToolCall::AddShowByTvdbId {
            tvdb_id,
            title,
            root_folder,
        },
        Command::TestConfig => ToolCall::TestConfig,
        Command::Status => ToolCall::GetServerStatus,
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&tool_definitions())?);
            return Ok(());
        }
        Command::Stdio => return serve_stdio(tools).await,
    };

    let output = tools.dispatch(call).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Line-delimited JSON loop. A bad line or a configuration error is
/// answered with `{"error": ...}` and the loop keeps going.
async fn serve_stdio(tools: &MediaTools) -> Result<(), BridgeError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    tracing::info!("Serving tool calls on stdio");
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<ToolCall>(&line) {
            Ok(call) => match tools.dispatch(call).await {
                Ok(value) => value,
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Invalid tool call");
                serde_json::json!({ "error": format!("invalid tool call: {e}") })
            }
        };

        let mut out = serde_json::to_vec(&reply)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }
    Ok(())
}
