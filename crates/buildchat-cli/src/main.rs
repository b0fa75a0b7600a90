//! buildchat CLI: Command-line entry point for the buildchat task console

use buildchat_engine::{
    ChatSession, ClientConfig, Completion, ConfigError, HttpTaskClient, SubmitRejected,
};
use buildchat_tui::ThemeName;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "buildchat.json";

/// Chat-style console for submitting build tasks to an agent endpoint
#[derive(Parser)]
#[command(name = "buildchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Task endpoint URL (overrides the config file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Color theme: dark, light or high-contrast
    #[arg(long, global = true, default_value = "dark")]
    theme: ThemeName,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Submit one task and print the reply
    Send {
        /// Task description
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print the conversation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a config file with default values
    Init {
        /// Where to write the file
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Tui) => {
            // The UI owns the terminal, so logs only go to a file.
            if let Some(path) = &cli.log_file {
                if let Err(e) = init_file_logging(path) {
                    eprintln!("Error: cannot open log file {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            }
            let config = match resolve_config(&cli) {
                Ok(config) => config,
                Err(e) => return fail(&e),
            };
            run_async(async {
                buildchat_tui::run_tui(&config, cli.theme.theme())
                    .await
                    .map(|()| ExitCode::SUCCESS)
                    .unwrap_or_else(|e| fail(&*e))
            })
        }
        Some(Commands::Send { ref text, json }) => {
            init_stderr_logging(cli.log_file.as_deref());
            let config = match resolve_config(&cli) {
                Ok(config) => config,
                Err(e) => return fail(&e),
            };
            let task = text.join(" ");
            run_async(cmd_send(&config, &task, json))
        }
        Some(Commands::Init { ref path, force }) => match cmd_init(&cli, path, force) {
            Ok(()) => {
                println!("Wrote {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => fail(&*e),
        },
    }
}

fn run_async<F: std::future::Future<Output = ExitCode>>(future: F) -> ExitCode {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(future),
        Err(e) => fail(&e),
    }
}

fn fail(err: &dyn std::error::Error) -> ExitCode {
    eprintln!("Error: {err}");
    ExitCode::FAILURE
}

/// Load the config file (explicit, or the default one if present) and apply
/// command-line overrides.
fn resolve_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            ClientConfig::load(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => ClientConfig::default(),
    };

    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout_seconds(timeout);
    }
    config.validate()?;

    debug!(endpoint = %config.endpoint, timeout = config.timeout_seconds, "config resolved");
    Ok(config)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_file_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn init_stderr_logging(log_file: Option<&Path>) {
    if let Some(path) = log_file {
        if init_file_logging(path).is_ok() {
            return;
        }
        eprintln!("Warning: cannot open log file {}, logging to stderr", path.display());
    }
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_send(config: &ClientConfig, task: &str, json: bool) -> ExitCode {
    let client = match HttpTaskClient::new(config) {
        Ok(client) => client,
        Err(e) => return fail(&e),
    };

    let mut session = ChatSession::new();
    if let Some(input) = session.input_mut() {
        input.insert_str(task);
    }

    let completion = match session.submit_and_wait(&client).await {
        Ok(completion) => completion,
        Err(SubmitRejected::Blank) => {
            eprintln!("Error: nothing to send");
            return ExitCode::FAILURE;
        }
        Err(e) => return fail(&e),
    };

    if json {
        match serde_json::to_string_pretty(session.log().messages()) {
            Ok(out) => println!("{out}"),
            Err(e) => return fail(&e),
        }
    } else if let Some(reply) = session.log().last().filter(|m| !m.is_user()) {
        println!("{}", reply.text());
    }

    match completion {
        Completion::Answered => ExitCode::SUCCESS,
        Completion::Failed | Completion::Stale => {
            if let Some(error) = session.error() {
                eprintln!("Error: {error}");
            }
            ExitCode::FAILURE
        }
    }
}

fn cmd_init(cli: &Cli, path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }

    let mut config = ClientConfig::default();
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout_seconds(timeout);
    }
    config.validate()?;
    config.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_send() {
        let cli = Cli::parse_from([
            "buildchat",
            "--endpoint",
            "http://example.com/api/task",
            "send",
            "build",
            "a",
            "widget",
            "--json",
        ]);
        match cli.command {
            Some(Commands::Send { text, json }) => {
                assert_eq!(text.join(" "), "build a widget");
                assert!(json);
            }
            _ => panic!("expected send"),
        }
        assert_eq!(cli.endpoint.as_deref(), Some("http://example.com/api/task"));
    }

    #[test]
    fn test_cli_defaults_to_tui() {
        let cli = Cli::parse_from(["buildchat"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.theme, ThemeName::Dark);
    }

    #[test]
    fn test_cli_rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["buildchat", "--theme", "neon"]).is_err());
    }

    #[test]
    fn test_overrides_apply_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buildchat.json");
        ClientConfig::default()
            .with_endpoint("http://file.example/api/task")
            .with_timeout_seconds(30)
            .save(&path)
            .unwrap();

        let cli = Cli::parse_from([
            "buildchat",
            "--config",
            path.to_str().unwrap(),
            "--timeout",
            "5",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.endpoint, "http://file.example/api/task");
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::parse_from(["buildchat", "--config", "/nonexistent/x.json"]);
        assert!(resolve_config(&cli).is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        ClientConfig::default().save(&path).unwrap();
        let cli = Cli::parse_from([
            "buildchat",
            "--config",
            path.to_str().unwrap(),
            "--endpoint",
            "ftp://nope",
        ]);
        assert!(matches!(
            resolve_config(&cli),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("buildchat.json");
        let cli = Cli::parse_from(["buildchat", "--timeout", "9", "init"]);

        cmd_init(&cli, &path, false).unwrap();
        assert_eq!(ClientConfig::load(&path).unwrap().timeout_seconds, 9);

        // Refuses to clobber without --force.
        assert!(cmd_init(&cli, &path, false).is_err());
        assert!(cmd_init(&cli, &path, true).is_ok());
    }
}
