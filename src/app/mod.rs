use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use muto::EsQuery;
use muto::config::CompilerConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Filter expression; read from stdin when omitted
    pub expression: Option<String>,

    /// Compiler configuration file (YAML or JSON)
    #[arg(short, long, env = "MUTO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Field matched exactly, without the exact-match subfield (repeatable)
    #[arg(short = 'n', long = "not-analyzed")]
    pub not_analyzed: Vec<String>,

    /// Exact-match subfield suffix (default: keyword)
    #[arg(long)]
    pub exact_suffix: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum OutputFormat {
    #[value(name = "json")]
    Json,
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "yaml", alias = "yml")]
    Yaml,
}

pub fn output_format_label(format: &OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => "json",
        OutputFormat::Pretty => "pretty",
        OutputFormat::Yaml => "yaml",
    }
}

/// File and environment settings, overridden by command-line flags.
pub fn resolve_config(cli: &Cli) -> Result<CompilerConfig> {
    resolve_config_with_env(cli, None)
}

/// As [`resolve_config`], with `MUTO_*` variables taken from `env` when given.
pub fn resolve_config_with_env(
    cli: &Cli,
    env: Option<HashMap<String, String>>,
) -> Result<CompilerConfig> {
    let mut config = CompilerConfig::from_sources_with_env(cli.config.as_deref(), env)
        .with_context(|| match &cli.config {
            Some(path) => format!("Config: Failed to load {:?}", path),
            None => "Config: Failed to read environment".to_string(),
        })?;

    config
        .not_analyzed_fields
        .extend(cli.not_analyzed.iter().cloned());
    if let Some(suffix) = &cli.exact_suffix {
        config.exact_suffix = suffix.clone();
    }
    Ok(config)
}

pub fn read_expression(cli: &Cli) -> Result<String> {
    match &cli.expression {
        Some(expr) => Ok(expr.clone()),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("CLI: Failed to read expression from stdin")?;
            Ok(buf)
        }
    }
}

pub fn render(query: &EsQuery, format: &OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(query)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(query)?,
        // Through JSON so variants come out as plain keys, not YAML tags
        OutputFormat::Yaml => serde_yaml::to_string(&query.to_json())?,
    };
    Ok(text)
}

/// Compile the CLI's expression and render the query.
pub fn run(cli: &Cli) -> Result<String> {
    let config = resolve_config(cli)?;
    execute(cli, &config)
}

pub fn execute(cli: &Cli, config: &CompilerConfig) -> Result<String> {
    let fields = config.fields();
    let compiler = config.compiler();
    tracing::info!(
        "Compiler: {} not-analyzed fields, exact suffix '{}'",
        fields.len(),
        compiler.exact_suffix()
    );

    let expression = read_expression(cli)?;
    let query = compiler
        .compile(expression.as_str(), &fields)
        .context("Compile: Invalid filter expression")?;

    tracing::info!("Output: {}", output_format_label(&cli.format));
    render(&query, &cli.format)
}
