//! CLI commands

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use logpipe_common::crd::LogPipeline;
use logpipe_fluentbit::PipelineDefaults;
use tracing::debug;

use crate::{Error, Result};

pub mod compile;
pub mod crd;
pub mod env;
pub mod validate;

/// Where to read LogPipeline manifests from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Manifest file with one or more LogPipeline documents ("-" for stdin)
    #[arg(short = 'f', long = "file")]
    pub file: String,
}

impl InputArgs {
    /// Read and parse every LogPipeline document in the input
    pub fn load_pipelines(&self) -> Result<Vec<LogPipeline>> {
        let content = read_input(&self.file)?;
        let pipelines: Vec<LogPipeline> = logpipe_common::yaml::load_all(&content, "LogPipeline")?;
        debug!(file = %self.file, count = pipelines.len(), "loaded pipelines");
        Ok(pipelines)
    }
}

/// Tuning values threaded into every compiled section
#[derive(Args, Debug, Clone)]
pub struct DefaultsArgs {
    /// Ceiling for each output's on-disk retry buffer
    #[arg(long, env = "LOGPIPE_FS_BUFFER_LIMIT", default_value = "1G")]
    pub fs_buffer_limit: String,
}

impl From<DefaultsArgs> for PipelineDefaults {
    fn from(args: DefaultsArgs) -> Self {
        Self {
            fs_buffer_limit: args.fs_buffer_limit,
        }
    }
}

/// Read a file, or stdin when `path` is "-"
pub fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(Path::new(path)).map_err(|source| Error::ReadInput {
        path: PathBuf::from(path),
        source,
    })
}
