//! WK CLI - Wiki page addressing and access rules.
//!
//! Provides commands for:
//! - `path`: Storage file path of a page version
//! - `parse`: Page name and culture of a storage file path
//! - `link`: Relative link between two pages
//! - `sitemap`: Navigation tree from a page listing
//! - `access check`: Decide read/edit access for a path
//! - `access fmt`: Validate and reformat a rule file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AccessCommand, LinkArgs, ParseArgs, PathArgs, SitemapArgs};
use output::Output;

/// WK - Wiki page addressing and access rules.
#[derive(Parser)]
#[command(name = "wk", version, about)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the storage file path of a page version.
    Path(PathArgs),
    /// Split a storage file path into page name and culture.
    Parse(ParseArgs),
    /// Print the relative link from one page to another.
    Link(LinkArgs),
    /// Build the navigation tree from a JSON page listing.
    Sitemap(SitemapArgs),
    /// Access rule commands.
    #[command(subcommand)]
    Access(AccessCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Path(args) => args.execute(&output),
        Commands::Parse(args) => args.execute(&output),
        Commands::Link(args) => args.execute(&output),
        Commands::Sitemap(args) => args.execute(&output),
        Commands::Access(cmd) => cmd.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
