//! Forensics CLI entry point.

use clap::Parser;

use forensics::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let status = cli::parse_failure_status(&err);
            let _ = err.print();
            std::process::exit(status.code());
        }
    };

    let status = cli::execute(cli).await;
    std::process::exit(status.code());
}
