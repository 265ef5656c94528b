mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "trace-extract")]
#[command(about = "Recover structured agent outputs from multi-agent event traces")]
struct Cli {
    /// Event trace to read (JSON array or JSONL). Reads stdin when omitted.
    #[arg(long, global = true)]
    trace: Option<PathBuf>,

    /// Output key registry (TOML). Defaults to the financial-advisor agents.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    /// Raise log verbosity on stderr (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the most recent decoded output of one agent (the coordinator by default).
    Extract(commands::ExtractArgs),
    /// Print the first recorded output for every registered key.
    ExtractAll,
    /// Print the author and function-call digest of the trace.
    Summarize,
    /// Print per-event flags useful when an extraction comes back empty.
    Diagnose,
    /// Print the final output, every agent output and the summary in one document.
    Report,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), commands::Error> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let input = commands::Input::load(cli.trace.as_deref(), cli.registry.as_deref())?;
    let output = commands::Output { pretty: cli.pretty };
    match cli.command {
        Command::Extract(args) => commands::extract(&input, &output, args),
        Command::ExtractAll => commands::extract_all(&input, &output),
        Command::Summarize => commands::summarize(&input, &output),
        Command::Diagnose => commands::diagnose(&input, &output),
        Command::Report => commands::report(&input, &output),
    }
}
