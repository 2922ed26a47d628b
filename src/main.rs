//! bedstack: sweep-line merging and stacking of sorted BED intervals
//!
//! Usage: bedstack <COMMAND> [OPTIONS]

use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io;
use std::path::PathBuf;
use std::process;

use bedstack::bed::BedError;
use bedstack::commands::{CleanNamesCommand, StackCommand};
use bedstack::config::{AbsentNamePolicy, EmitMode};

#[derive(Parser)]
#[command(name = "bedstack")]
#[command(version)]
#[command(about = "Sweep-line merging and stacking of sorted BED intervals", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split overlapping intervals at every boundary and label each piece with its merged names
    Merge(SweepArgs),

    /// Report the summed score (depth) of every piece as bedgraph
    Bedgraph(SweepArgs),

    /// Report both the merged names and the summed score of every piece
    Stack(SweepArgs),

    /// Deduplicate and sort the ';'-separated names in column 4
    CleanNames {
        /// Input BED file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print statistics to stderr
        #[arg(long)]
        stats: bool,
    },
}

#[derive(Args)]
struct SweepArgs {
    /// Input BED file sorted by chromosome then start (use - for stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Count unnamed records toward coverage only instead of giving each a synthetic name
    #[arg(long)]
    anonymous: bool,

    /// Print sweep statistics to stderr
    #[arg(long)]
    stats: bool,
}

fn main() {
    let cli = Cli::parse();

    let min_log_level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .target(Target::Stderr)
        .filter(None, min_log_level)
        .init();

    log::debug!("DEBUG logging enabled");
    log::trace!("TRACE logging enabled");

    let result = match cli.command {
        Commands::Merge(args) => run_sweep(EmitMode::Names, args),
        Commands::Bedgraph(args) => run_sweep(EmitMode::Coverage, args),
        Commands::Stack(args) => run_sweep(EmitMode::Stack, args),
        Commands::CleanNames { input, stats } => run_clean_names(input, stats),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Treat a missing path or `-` as stdin.
fn input_path(input: Option<PathBuf>) -> Option<PathBuf> {
    input.filter(|p| p.to_string_lossy() != "-")
}

fn run_sweep(mode: EmitMode, args: SweepArgs) -> Result<(), BedError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let policy = if args.anonymous {
        AbsentNamePolicy::Anonymous
    } else {
        AbsentNamePolicy::Synthetic
    };
    let cmd = StackCommand::new(mode).with_absent_names(policy);

    let result = match input_path(args.input) {
        Some(path) => cmd.run(&path, &mut handle)?,
        None => cmd.run_stdin(&mut handle)?,
    };

    if args.stats {
        eprintln!("Sweep stats: {}", result);
    } else {
        log::info!("Sweep stats: {}", result);
    }

    Ok(())
}

fn run_clean_names(input: Option<PathBuf>, stats: bool) -> Result<(), BedError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let cmd = CleanNamesCommand::new();

    let result = match input_path(input) {
        Some(path) => cmd.run(&path, &mut handle)?,
        None => cmd.run_stdin(&mut handle)?,
    };

    if stats {
        eprintln!("Clean names stats: {}", result);
    } else {
        log::info!("Clean names stats: {}", result);
    }

    Ok(())
}
