//! Crd command - print the LogPipeline CustomResourceDefinition

use kube::CustomResourceExt;
use logpipe_common::crd::LogPipeline;

use crate::Result;

pub fn run() -> Result<()> {
    print!("{}", render()?);
    Ok(())
}

/// The CRD as a YAML document
pub fn render() -> Result<String> {
    Ok(serde_yaml::to_string(&LogPipeline::crd())?)
}
