// Main entry point for the application

use clap::{Args, Parser, Subcommand};
use datacheck::common::types::DEFAULT_DATA_ROOT;
use datacheck::ValidatorConfig;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "datacheck")]
#[command(about = "Validate data files against their SHA-1 manifest", long_about = None)]
struct Cli {
    #[command(flatten)]
    validate: ValidateArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ValidateArgs {
    /// Directory containing the single group-XX directory
    #[arg(long, default_value = DEFAULT_DATA_ROOT, global = true)]
    data_root: PathBuf,

    /// Check every file and report all mismatches instead of stopping at the first
    #[arg(long)]
    collect_all: bool,

    /// Hash files on a worker pool
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (default: number of CPUs)
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the current digests of the group directory in its manifest
    Generate,
}

impl ValidateArgs {
    fn config(&self) -> Result<ValidatorConfig> {
        let mut config = ValidatorConfig::new(&self.data_root);
        if self.collect_all {
            config = config.collect_all();
        }
        if self.parallel {
            config = config.parallel();
        }
        if let Some(threads) = self.threads {
            config = config.with_worker_threads(threads)?;
        }
        Ok(config)
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.validate.config()?;

    match cli.command {
        None => {
            let report = datacheck::validate_data_root(&config)?;
            if cli.validate.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
        Some(Commands::Generate) => {
            let (path, manifest) = datacheck::generate_manifest(&config)?;
            println!("Wrote {} entries to {}", manifest.len(), path.display());
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
