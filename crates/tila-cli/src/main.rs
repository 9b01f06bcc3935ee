mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::apr::AprArgs;
use commands::link::LinkArgs;
use commands::loan::TermsArgs;

/// Consumer-loan amortization and Truth-in-Lending disclosures
#[derive(Parser)]
#[command(
    name = "tila",
    version,
    about = "Consumer-loan amortization and Truth-in-Lending disclosures",
    long_about = "A CLI for consumer installment-loan math with decimal precision. \
                  Builds cent-exact amortization schedules, solves the actuarial-method \
                  effective APR, assembles the Regulation Z disclosure figures, and \
                  encodes loan terms as shareable links."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the monthly amortization schedule for a set of terms
    Schedule(TermsArgs),
    /// Produce the full Truth-in-Lending disclosure (schedule + APR + totals)
    Disclose(TermsArgs),
    /// Solve the effective rate for a payment stream against a target value
    Apr(AprArgs),
    /// Encode terms as a shareable query string, or decode one back
    Link(LinkArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Disclose(args) => commands::loan::run_disclose(args),
        Commands::Apr(args) => commands::apr::run_apr(args),
        Commands::Link(args) => commands::link::run_link(args),
        Commands::Version => {
            println!("tila {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
