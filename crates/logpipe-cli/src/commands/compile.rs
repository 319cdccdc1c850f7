//! Compile command

use std::path::PathBuf;

use clap::Args;
use logpipe_common::crd::LogPipeline;
use logpipe_fluentbit::{create_output_section, PipelineDefaults};
use tracing::info;

use super::{DefaultsArgs, InputArgs};
use crate::Result;

#[derive(Args, Debug)]
pub struct CompileArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub defaults: DefaultsArgs,

    /// Write sections to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompileArgs) -> Result<()> {
    let pipelines = args.input.load_pipelines()?;
    let defaults = PipelineDefaults::from(args.defaults);
    let rendered = compile_all(&pipelines, &defaults);

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!(path = %path.display(), pipelines = pipelines.len(), "wrote output sections");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Concatenate the output sections of all pipelines in document order.
///
/// Pipelines without an output contribute nothing.
pub fn compile_all(pipelines: &[LogPipeline], defaults: &PipelineDefaults) -> String {
    pipelines
        .iter()
        .map(|p| create_output_section(p, defaults))
        .collect()
}
