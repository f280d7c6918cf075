//! Purpose: `marquee` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::json;

mod serve;

use marquee::api::{Error, ErrorKind, OriginPolicy, to_exit_code};
use marquee::seed;
use serve::ServeConfig;

const DEFAULT_BIND: &str = "127.0.0.1:1234";
const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage).with_message(err.to_string()));
            }
        },
    };

    dispatch_command(cli.command)
}

#[derive(Parser)]
#[command(
    name = "marquee",
    version,
    about = "In-memory movie catalog served over HTTP",
    long_about = None,
    after_help = r#"EXAMPLES
  $ marquee serve --seed movies.json
  $ marquee serve --bind 127.0.0.1:8080 --cors-origin http://localhost:5500
  $ marquee serve check --seed movies.json

LEARN MORE
  $ marquee <command> --help"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Serve the movie catalog over HTTP",
        long_about = r#"Serve the movie catalog over HTTP (loopback by default).

The catalog lives in memory for the lifetime of the process; an optional seed
file provides the starting collection and is never written back."#,
        after_help = r#"EXAMPLES
  $ marquee serve
  $ marquee serve --seed movies.json
  $ marquee serve --bind 0.0.0.0:1234 --allow-non-loopback
  $ marquee serve check --seed movies.json

NOTES
  - Loopback is the default; non-loopback binds require --allow-non-loopback
  - Use repeatable --cors-origin to allow browser clients from specific origins
  - Use `marquee serve check` to validate config and seed without binding sockets"#
    )]
    Serve {
        #[command(subcommand)]
        subcommand: Option<ServeSubcommand>,
        #[command(flatten)]
        run: ServeRunArgs,
    },
    #[command(
        about = "Print version info as JSON",
        long_about = r#"Emit version info as JSON (stable, machine-readable)."#,
        after_help = r#"EXAMPLES
  $ marquee version"#
    )]
    Version,
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        long_about = r#"Generate shell completion scripts.

Prints a completion script for the given shell to stdout."#,
        after_help = r#"EXAMPLES
  $ marquee completion bash > ~/.local/share/bash-completion/completions/marquee
  $ marquee completion zsh > ~/.zfunc/_marquee"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ServeSubcommand {
    #[command(
        about = "Validate serve config and seed without starting",
        after_help = r#"EXAMPLES
  $ marquee serve check
  $ marquee serve --seed movies.json check
  $ marquee serve --bind 0.0.0.0:1234 --allow-non-loopback check

NOTES
  - Exits non-zero when config or seed is invalid
  - Does not bind sockets"#
    )]
    Check {
        #[arg(long, help = "Emit JSON instead of human-readable output")]
        json: bool,
    },
}

#[derive(Args)]
struct ServeRunArgs {
    #[arg(
        long,
        default_value = DEFAULT_BIND,
        help = "Bind address",
        help_heading = "Connection"
    )]
    bind: String,
    #[arg(
        long,
        value_name = "PATH",
        help = "Seed the catalog from this JSON file (array of movies)",
        value_hint = ValueHint::FilePath,
        help_heading = "Connection"
    )]
    seed: Option<PathBuf>,
    #[arg(
        long = "cors-origin",
        value_name = "ORIGIN",
        help = "Allow browser requests from this origin (repeatable, exact match)",
        help_heading = "Connection"
    )]
    cors_origin: Vec<String>,
    #[arg(
        long,
        help = "Allow non-loopback binds",
        help_heading = "Safety"
    )]
    allow_non_loopback: bool,
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_BODY_BYTES,
        help = "Max request body size in bytes",
        help_heading = "Safety"
    )]
    max_body_bytes: u64,
}

fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "marquee", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            println!(
                "{}",
                json!({
                    "name": "marquee",
                    "version": env!("CARGO_PKG_VERSION"),
                })
            );
            Ok(RunOutcome::ok())
        }
        Command::Serve { subcommand, run } => match subcommand {
            Some(ServeSubcommand::Check { json }) => {
                let config = serve_config_from_run_args(run)?;
                serve::validate_config(&config)?;
                let seeded = match &config.seed_path {
                    Some(path) => Some(seed::load_seed(path)?.len()),
                    None => None,
                };
                emit_serve_check_report(&config, seeded, json);
                Ok(RunOutcome::ok())
            }
            None => {
                let config = serve_config_from_run_args(run)?;
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .map_err(|err| {
                        Error::new(ErrorKind::Internal)
                            .with_message("failed to start runtime")
                            .with_source(err)
                    })?;
                runtime.block_on(serve::serve(config))?;
                Ok(RunOutcome::ok())
            }
        },
    }
}

fn serve_config_from_run_args(run: ServeRunArgs) -> Result<ServeConfig, Error> {
    let bind: SocketAddr = run.bind.parse().map_err(|_| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid bind address")
            .with_hint(format!("Use a host:port value like {DEFAULT_BIND}."))
    })?;
    Ok(ServeConfig {
        bind,
        seed_path: run.seed,
        cors_origins: run.cors_origin,
        allow_non_loopback: run.allow_non_loopback,
        max_body_bytes: run.max_body_bytes,
    })
}

fn emit_serve_check_report(config: &ServeConfig, seeded: Option<usize>, json: bool) {
    let origins = OriginPolicy::with_extra_origins(config.cors_origins.clone());
    if json {
        println!(
            "{}",
            json!({
                "check": {
                    "bind": config.bind.to_string(),
                    "seed": config.seed_path.as_ref().map(|path| path.display().to_string()),
                    "seed_movies": seeded,
                    "cors_allowed_origins": origins.allowed_origins(),
                    "max_body_bytes": config.max_body_bytes,
                }
            })
        );
        return;
    }
    println!("Serve config OK");
    println!("  bind: {}", config.bind);
    match (&config.seed_path, seeded) {
        (Some(path), Some(count)) => println!("  seed: {} ({count} movies)", path.display()),
        _ => println!("  seed: none (empty catalog)"),
    }
    println!("  cors origins: {}", origins.allowed_origins().join(", "));
    println!("  max body bytes: {}", config.max_body_bytes);
}

fn error_json(err: &Error) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    body.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("error")),
    );
    if let Some(path) = err.path() {
        body.insert("path".to_string(), json!(path.to_string_lossy()));
    }
    if let Some(hint) = err.hint() {
        body.insert("hint".to_string(), json!(hint));
    }
    json!({ "error": body })
}

fn emit_error(err: &Error) {
    eprintln!("{}", error_json(err));
}
