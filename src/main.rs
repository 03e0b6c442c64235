// Wayfarer: Constrained Path-based Testing engine
//
// Loads SUT models, runs the CPC, Filter and Edge test-path generators,
// and reports validity, coverage and efficiency metrics.

use anyhow::Result;
use clap::Parser;

use wayfarer::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; diagnostics go to stderr so the report stream
    // on stdout stays clean for tee logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    cli::cmds::run(cli)?;

    Ok(())
}
