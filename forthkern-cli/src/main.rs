//! forthkern CLI: drive a VM session from the command line.
//!
//! Exit codes:
//! - 0: Success (tokens exhausted or BYE)
//! - 1: Usage error, invalid configuration or unknown word
//! - 3: Runtime fault

mod commands;

use clap::{Args, Parser, Subcommand};
use forthkern_common::Config;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "FORTHKERN_LOG";

#[derive(Parser)]
#[command(name = "forthkern")]
#[command(about = "Minimal threaded-code Forth kernel", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    capacities: Capacities,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every dictionary entry, newest first.
    Words,

    /// Push integers and execute words, left to right.
    Run {
        /// Decimal integers or word names.
        #[arg(required = true, allow_negative_numbers = true)]
        tokens: Vec<String>,

        /// Arguments visible to the session through #ARG and ARG.
        #[arg(last = true)]
        args: Vec<String>,
    },
}

/// Arena and table sizes, fixed for the whole session.
#[derive(Args, Debug, Clone, Copy)]
struct Capacities {
    /// Data space size in bytes.
    #[arg(long, global = true, default_value_t = forthkern_common::config::DEFAULT_DATA_SPACE)]
    data_space: usize,

    /// Data stack depth in cells.
    #[arg(long, global = true, default_value_t = forthkern_common::config::DEFAULT_DATA_STACK)]
    data_stack: usize,

    /// Return stack depth in cells.
    #[arg(long, global = true, default_value_t = forthkern_common::config::DEFAULT_RETURN_STACK)]
    return_stack: usize,

    /// Maximum number of dictionary entries.
    #[arg(long, global = true, default_value_t = forthkern_common::config::DEFAULT_DICTIONARY)]
    dictionary: usize,

    /// Input line buffer size in bytes.
    #[arg(long, global = true, default_value_t = forthkern_common::config::DEFAULT_INPUT_BUFFER)]
    input_buffer: usize,
}

impl From<Capacities> for Config {
    fn from(c: Capacities) -> Self {
        Config {
            data_space: c.data_space,
            data_stack: c.data_stack,
            return_stack: c.return_stack,
            dictionary: c.dictionary,
            input_buffer: c.input_buffer,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let config = Config::from(cli.capacities);

    let result = match cli.command {
        Command::Words => commands::words(config),
        Command::Run { tokens, args } => commands::run(config, &tokens, &args),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
