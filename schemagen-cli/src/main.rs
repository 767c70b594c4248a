//! Schemagen CLI: form-schema descriptors and reference migrations from
//! column metadata.
//!
//! ```bash
//! schemagen generate --source ./schema --out ./public
//! schemagen describe --name author_id --type id
//! ```
//!
//! See `schemagen --help` for all available commands and options.

mod commands;

use clap::{Parser, Subcommand};

use commands::describe::DescribeArgs;
use commands::generate::GenerateArgs;

#[derive(Parser)]
#[command(
    name = "schemagen",
    about = "Form-schema descriptor and reference migration generator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write <table>.json descriptors and foreign-key migration stubs
    Generate(GenerateArgs),
    /// Print the descriptor derived from a single column definition
    Describe(DescribeArgs),
}

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(&args, &mut stdout),
        Commands::Describe(args) => commands::describe::run(&args, &mut stdout),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
