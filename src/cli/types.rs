//! CLI type definitions

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "forensics")]
#[command(about = "Wait for a distributed test run to finish and record its JUnit results", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Identifier of the test run in the run registry
    #[arg(long, alias = "run_id", value_parser = NonEmptyStringValueParser::new())]
    pub run_id: String,

    /// Directory the run's executors write markers and reports into
    #[arg(long, alias = "run_dir", value_parser = NonEmptyStringValueParser::new())]
    pub run_dir: String,

    /// Additional YAML configuration file
    #[arg(short, long, env = "FORENSICS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn run_dir_path(&self) -> &Path {
        Path::new(&self.run_dir)
    }
}
