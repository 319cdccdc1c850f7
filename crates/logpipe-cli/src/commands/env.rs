//! Env command - list secret projections required by compiled pipelines

use clap::Args;
use logpipe_common::crd::LogPipeline;
use logpipe_fluentbit::{secret_bindings, SecretTarget, TLS_MOUNT_DIR};

use super::InputArgs;
use crate::Result;

#[derive(Args, Debug)]
pub struct EnvArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: EnvArgs) -> Result<()> {
    let pipelines = args.input.load_pipelines()?;
    for line in binding_lines(&pipelines) {
        println!("{line}");
    }
    Ok(())
}

/// One tab-separated line per binding: target, secret reference, field
pub fn binding_lines(pipelines: &[LogPipeline]) -> Vec<String> {
    pipelines
        .iter()
        .flat_map(|p| {
            secret_bindings(p).into_iter().map(move |b| {
                let target = match &b.target {
                    SecretTarget::EnvVar(name) => name.clone(),
                    SecretTarget::TlsFile(file) => format!("{TLS_MOUNT_DIR}/{file}"),
                };
                format!("{target}\t{}\t{}/{}", b.secret_ref, p.name(), b.field)
            })
        })
        .collect()
}
