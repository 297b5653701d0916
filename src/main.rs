//! Mastermind strategy tree builder - CLI
//!
//! Builds, analyzes and verifies decision trees that solve every secret of
//! 4-position, 6-color Mastermind.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use mastermind_tree::{
    commands::{
        BuildConfig, DEFAULT_MAX_DEPTH, PrefixConfig, analyze_guesses, list_prefixes,
        list_strategies, resolve_guesses, run_build, run_monitor, verify_document,
    },
    output::{
        TreeDocument, print_analysis_report, print_build_result, print_prefixes,
        print_progress_message, print_strategies, print_verify_report,
    },
    solver::DEFAULT_REPORTING_CYCLE,
    tables::Tables,
};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mastermind_tree",
    about = "Branch-and-bound search for Mastermind strategy trees",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cache lookup tables in this directory
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a strategy tree over all 1296 codes
    Build {
        /// Strategy name (see `list`)
        #[arg(default_value = "min_largest")]
        strategy: String,

        /// Guess budget
        #[arg(short = 'd', long, default_value_t = DEFAULT_MAX_DEPTH, allow_negative_numbers = true)]
        max_depth: i64,

        /// Fixed first guess, as a code value (e.g. 8 for [2100])
        #[arg(short, long, allow_negative_numbers = true)]
        root: Option<i64>,

        /// Write the tree as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Progress socket: unix://<id>/<path> or ip://<id>/<host>:<port>
        #[arg(short, long)]
        progress: Option<String>,

        /// Seed for the random strategy
        #[arg(long)]
        seed: Option<u64>,

        /// Solver entries between progress reports
        #[arg(long, default_value_t = DEFAULT_REPORTING_CYCLE)]
        reporting_cycle: u64,

        /// Print the JSON document to stdout instead of a summary
        #[arg(long)]
        json: bool,

        /// No terminal spinner
        #[arg(short, long)]
        quiet: bool,
    },

    /// List strategy names
    List,

    /// Partition the code set against guesses (default: the canonical first guesses)
    Analyze {
        /// Guess code values
        codes: Vec<u16>,

        /// Analyze every code
        #[arg(short, long, conflicts_with = "codes")]
        all: bool,

        /// Print every guess even for long lists
        #[arg(long)]
        details: bool,
    },

    /// Enumerate symmetry-distinct guess prefixes
    Prefixes {
        /// First guess code value
        #[arg(default_value_t = 0)]
        first: u16,

        /// Longest prefix
        #[arg(short = 'n', long, default_value_t = 2)]
        max_len: usize,

        /// Do not expand prefixes that fail to reduce the search
        #[arg(short, long)]
        skip_non_reducing: bool,
    },

    /// Check a JSON tree against the code set
    Verify {
        /// Tree document written by `build --output`
        file: PathBuf,
    },

    /// Print progress messages sent by a running build
    Monitor {
        /// Address to listen on
        address: String,

        /// Stop after this many messages
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cache_dir = cli.cache_dir.as_deref();

    match cli.command {
        Commands::Build {
            strategy,
            max_depth,
            root,
            output,
            progress,
            seed,
            reporting_cycle,
            json,
            quiet,
        } => {
            let config = BuildConfig {
                strategy,
                max_depth,
                first_guess: root,
                output,
                progress,
                reporting_cycle,
                seed,
                spinner: !quiet && std::io::stderr().is_terminal(),
            };
            // Reject bad settings before paying for the tables
            let plan = config.validate()?;

            let tables = Tables::load_or_build(cache_dir);
            let result = run_build(plan, &tables)?;
            if json {
                println!("{}", TreeDocument::from(&result).to_json()?);
            } else {
                print_build_result(&result, config.output.as_deref());
            }
        }
        Commands::List => print_strategies(&list_strategies()?),
        Commands::Analyze {
            codes,
            all,
            details,
        } => {
            let guesses = resolve_guesses(&codes, all)?;
            let tables = Tables::load_or_build(cache_dir);
            let report = analyze_guesses(&guesses, &tables)?;
            print_analysis_report(&report, details);
        }
        Commands::Prefixes {
            first,
            max_len,
            skip_non_reducing,
        } => {
            let tables = Tables::load_or_build(cache_dir);
            let entries = list_prefixes(
                &PrefixConfig {
                    first,
                    max_len,
                    skip_non_reducing,
                },
                &tables,
            )?;
            print_prefixes(&entries);
        }
        Commands::Verify { file } => {
            let doc = TreeDocument::read(&file)?;
            let tables = Tables::load_or_build(cache_dir);
            let report = verify_document(&doc, &tables.scores)?;
            print_verify_report(&report);
            if !report.is_ok() {
                bail!("{} failed verification", file.display());
            }
        }
        Commands::Monitor { address, count } => {
            run_monitor(&address, count, print_progress_message)?;
        }
    }

    Ok(())
}
