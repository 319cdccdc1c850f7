//! logpipe CLI library

pub mod commands;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand, ValueEnum};
use logpipe_common::telemetry::{init_logging, LogFormat, LoggingConfig};

/// logpipe - compile LogPipeline resources into Fluent Bit configuration
#[derive(Parser, Debug)]
#[command(name = "logpipe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log line format (logs go to stderr)
    #[arg(long, value_enum, default_value = "plain", global = true, env = "LOGPIPE_LOG_FORMAT")]
    pub log_format: LogFormatArg,

    /// Log filter directive (defaults to $RUST_LOG, then "info,logpipe=debug")
    #[arg(long, global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log format selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Plain,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Plain => LogFormat::Plain,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile LogPipeline manifests into [OUTPUT] sections
    Compile(commands::compile::CompileArgs),
    /// Check LogPipeline manifests for ambiguous or incomplete outputs
    Validate(commands::validate::ValidateArgs),
    /// List the secret keys each pipeline needs projected into the agent
    Env(commands::env::EnvArgs),
    /// Print the LogPipeline CustomResourceDefinition
    Crd,
}

impl Cli {
    /// Install the tracing subscriber for this invocation
    pub fn init_logging(&self) -> Result<()> {
        init_logging(LoggingConfig {
            format: self.log_format.into(),
            filter: self.log_filter.clone(),
        })?;
        Ok(())
    }

    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Compile(args) => commands::compile::run(args),
            Commands::Validate(args) => commands::validate::run(args),
            Commands::Env(args) => commands::env::run(args),
            Commands::Crd => commands::crd::run(),
        }
    }
}
