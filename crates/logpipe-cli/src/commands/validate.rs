//! Validate command

use clap::Args;
use tracing::warn;

use super::InputArgs;
use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let pipelines = args.input.load_pipelines()?;

    let mut invalid = 0;
    for pipeline in &pipelines {
        match pipeline.validate() {
            Ok(()) => println!("  {} valid ({})", pipeline.name(), pipeline.spec.output.sink().kind()),
            Err(e) => {
                invalid += 1;
                warn!(pipeline = pipeline.name(), error = %e, "invalid pipeline");
                println!("  {} invalid: {}", pipeline.name(), e);
            }
        }
    }

    println!();
    if invalid == 0 {
        println!("All {} pipeline(s) valid", pipelines.len());
        Ok(())
    } else {
        Err(Error::ValidationFailed { count: invalid })
    }
}
