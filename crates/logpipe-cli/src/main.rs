//! logpipe CLI
//!
//! Compiles LogPipeline manifests into Fluent Bit output sections.

use clap::Parser;

use logpipe_cli::{Cli, Result};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;
    cli.run()
}
