// crates/propbind-cli/src/main.rs
// ============================================================================
// Module: Propbind CLI Entry Point
// Description: Command dispatcher for checking and documenting plugin configs.
// Purpose: Validate layered property sources and emit docs or schemas.
// Dependencies: clap, propbind, propbind-plugins, serde_json, thiserror,
//               tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! The `propbind` CLI binds a layered property set to one configuration kind
//! and reports every binding error or violation at once. It also prints the
//! generated Markdown reference and JSON Schema for each kind.
//!
//! Security posture: property files may carry secrets. Output goes through the
//! redaction view, and diagnostics never echo sensitive values.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use propbind::BindMode;
use propbind::ConfigError;
use propbind::PropertyMap;
use propbind::source::layer;
use propbind::source::load_file;
use propbind::source::substitute_env;
use propbind_plugins::ConfigKind;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Log filter used when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_LOG_LEVEL: &str = "warn";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "propbind", version, disable_help_subcommand = true)]
struct Cli {
    /// Log filter directive (overrides `RUST_LOG`; defaults to `warn`).
    #[arg(long, value_name = "FILTER", global = true)]
    log_level: Option<String>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Bind and validate properties against a configuration kind.
    Check(CheckCommand),
    /// Print or verify the Markdown reference for a kind.
    Docs(DocsCommand),
    /// Print the JSON Schema for a kind's property map.
    Schema(SchemaCommand),
    /// List the known configuration kinds.
    Kinds,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Configuration kind to bind.
    #[arg(long, value_name = "KIND")]
    kind: ConfigKind,
    /// Property files (`.properties` or `.toml`), applied in order.
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,
    /// Inline `key=value` overrides, applied after all files.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,
    /// Reject keys the kind does not declare.
    #[arg(long)]
    strict: bool,
    /// Print the redacted view as JSON.
    #[arg(long)]
    json: bool,
}

/// Arguments for `docs`.
#[derive(Args, Debug)]
struct DocsCommand {
    /// Configuration kind to document.
    #[arg(long, value_name = "KIND")]
    kind: ConfigKind,
    /// Write the reference to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Fail if the file at `--output` is out of date instead of writing it.
    #[arg(long, requires = "output")]
    check: bool,
}

/// Arguments for `schema`.
#[derive(Args, Debug)]
struct SchemaCommand {
    /// Configuration kind to describe.
    #[arg(long, value_name = "KIND")]
    kind: ConfigKind,
    /// Emit the strict-mode schema (no undeclared keys).
    #[arg(long)]
    strict: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;
    match cli.command {
        Commands::Check(command) => command_check(&command),
        Commands::Docs(command) => command_docs(&command),
        Commands::Schema(command) => command_schema(&command),
        Commands::Kinds => command_kinds(),
    }
}

/// Installs the stderr log subscriber.
fn init_logging(log_level: Option<&str>) -> CliResult<()> {
    let filter = match log_level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|err| CliError::new(format!("invalid log level `{directive}`: {err}")))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| CliError::new(format!("failed to install log subscriber: {err}")))
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Result of binding and validating one property set.
#[derive(Debug, PartialEq, Eq)]
enum CheckReport {
    /// The configuration is valid; carries the rendered view.
    Passed(String),
    /// The configuration was rejected; carries one line per finding.
    Failed(Vec<String>),
}

/// Executes the `check` command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    match evaluate_check(command)? {
        CheckReport::Passed(output) => {
            write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        CheckReport::Failed(findings) => {
            for finding in &findings {
                write_stderr_line(finding).map_err(|err| CliError::new(output_error("stderr", &err)))?;
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Loads the property set for `command` and checks it against its kind.
fn evaluate_check(command: &CheckCommand) -> CliResult<CheckReport> {
    let properties = collect_properties(command)?;
    let mode = if command.strict { BindMode::Strict } else { BindMode::Lenient };
    debug!(kind = command.kind.name(), properties = properties.len(), "checking property set");
    match command.kind.check(&properties, mode) {
        Ok(rendered) if command.json => serde_json::to_string_pretty(&rendered)
            .map(CheckReport::Passed)
            .map_err(|err| CliError::new(format!("failed to serialize view: {err}"))),
        Ok(rendered) => Ok(CheckReport::Passed(rendered.to_string())),
        Err(err) => Ok(CheckReport::Failed(findings(command.kind, &err))),
    }
}

/// Layers files then inline overrides and resolves environment references.
fn collect_properties(command: &CheckCommand) -> CliResult<PropertyMap> {
    let mut layers = Vec::with_capacity(command.files.len() + 1);
    for path in &command.files {
        let properties = load_file(path)
            .map_err(|err| CliError::new(format!("failed to load {}: {err}", path.display())))?;
        layers.push(properties);
    }
    layers.push(command.assignments.iter().map(|(key, value)| (key.as_str(), value.as_str())).collect());
    substitute_env(&layer(layers)).map_err(|err| CliError::new(err.to_string()))
}

/// Flattens a pipeline failure into one line per finding.
fn findings(kind: ConfigKind, error: &ConfigError) -> Vec<String> {
    let details: Vec<String> = match error {
        ConfigError::Registration(err) => vec![err.to_string()],
        ConfigError::Binding(errors) => errors.iter().map(ToString::to_string).collect(),
        ConfigError::Validation(violations) => violations.iter().map(ToString::to_string).collect(),
    };
    let mut lines = Vec::with_capacity(details.len() + 1);
    lines.push(format!("{kind}: configuration rejected with {} finding(s)", details.len()));
    lines.extend(details.into_iter().map(|detail| format!("  - {detail}")));
    lines
}

/// Parses a `key=value` assignment; the value may be empty or contain `=`.
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got `{raw}`"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err("assignment key must not be empty".to_string());
    }
    Ok((key.to_string(), value.trim().to_string()))
}

// ============================================================================
// SECTION: Docs and Schema Commands
// ============================================================================

/// Executes the `docs` command.
fn command_docs(command: &DocsCommand) -> CliResult<ExitCode> {
    match (&command.output, command.check) {
        (Some(path), true) => {
            command.kind.verify_docs(path).map_err(|err| CliError::new(err.to_string()))?;
        }
        (Some(path), false) => {
            command.kind.write_docs(path).map_err(|err| CliError::new(err.to_string()))?;
        }
        (None, _) => {
            let markdown = command.kind.docs_markdown().map_err(|err| CliError::new(err.to_string()))?;
            write_stdout_bytes(markdown.as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `schema` command.
fn command_schema(command: &SchemaCommand) -> CliResult<ExitCode> {
    let mode = if command.strict { BindMode::Strict } else { BindMode::Lenient };
    let schema = command.kind.schema(mode).map_err(|err| CliError::new(err.to_string()))?;
    let text = serde_json::to_string_pretty(&schema)
        .map_err(|err| CliError::new(format!("failed to serialize schema: {err}")))?;
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `kinds` command.
fn command_kinds() -> CliResult<ExitCode> {
    for kind in ConfigKind::ALL {
        write_stdout_line(kind.name()).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
