//! geocat command-line entry point.

use clap::Parser;
use geocat::{Cli, init_logging, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.config.log_level);

    if let Err(errors) = cli.config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let output = run(cli).await?;
    println!("{}", output);
    Ok(())
}
