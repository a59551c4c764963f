use std::process;
use std::thread;

use clap::{Parser, Subcommand};
use dbgprint_core::printer::stdout_printer;
use dbgprint_core::traceback::TracebackSource;
use dbgprint_core::{dprint, tprint, Ansi, Config, TracebackOptions, TracebackPrinter, TracedError};
use dbgprint_utils::{debug, init_logging, init_logging_with_level, warn, LogFormat, LogLevel};

/// Thread-safe colored debug printing and IPython-style tracebacks.
#[derive(Parser, Debug)]
#[command(name = "dbgprint")]
#[command(version)]
#[command(about = "Thread-safe colored debug printing and IPython-style tracebacks", long_about = None)]
struct Cli
{
    /// Diagnostic log level (overrides RUST_LOG); logs go to stderr
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Print one line
    Print
    {
        /// Text to print
        message: String,
        /// Color name (red, green, yellow, blue, purple, cyan, white, none)
        #[arg(short, long)]
        color: Option<Ansi>,
    },
    /// Print one line prefixed with a timestamp
    Tprint
    {
        /// Text to print
        message: String,
        /// Color name (red, green, yellow, blue, purple, cyan, white, none)
        #[arg(short, long)]
        color: Option<Ansi>,
    },
    /// Print a fancy traceback
    Traceback
    {
        /// Print this message as `Error: <message>` below the call stack
        #[arg(short, long, conflicts_with = "divide")]
        message: Option<String>,
        /// Divide A by B and print the traceback of the resulting error, if any
        #[arg(long, num_args = 2, value_names = ["A", "B"], allow_negative_numbers = true)]
        divide: Option<Vec<i64>>,
        /// Number of frames to show (default: DBGPRINT_TRACEBACK_DEPTH or 3)
        #[arg(short, long)]
        depth: Option<usize>,
        /// Show full file paths instead of basenames
        #[arg(long, default_value_t = false)]
        full_paths: bool,
    },
    /// Print from several threads at once; every line stays intact
    Threads
    {
        /// Number of printing threads
        #[arg(short, long, default_value_t = 4)]
        workers: usize,
        /// Lines printed by each thread
        #[arg(short, long, default_value_t = 10)]
        lines: usize,
        /// Prefix every line with a timestamp
        #[arg(long, default_value_t = false)]
        timestamps: bool,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("division by zero")]
struct ZeroDivisionError;

fn main()
{
    let cli = Cli::parse();

    let logging = match cli.log_level {
        Some(level) => init_logging_with_level(level, LogFormat::Pretty),
        None => init_logging(),
    };
    let _guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Commands) -> Result<(), Box<dyn std::error::Error>>
{
    match command {
        Commands::Print { message, color } => dprint(&message, color),
        Commands::Tprint { message, color } => tprint(&message, color),
        Commands::Traceback {
            message,
            divide,
            depth,
            full_paths,
        } => {
            let config = Config::from_env()?;
            let options = TracebackOptions {
                depth: depth.unwrap_or(config.traceback_depth),
                full_paths: full_paths || config.full_paths,
            };
            let printer = TracebackPrinter::new(options);
            debug!(options = ?printer.options(), "printing traceback");

            match (message, divide.as_deref()) {
                (Some(message), _) => printer.print(&message),
                (None, Some(&[a, b])) => match checked_divide(a, b) {
                    Ok(quotient) => dprint(&format!("{a} / {b} = {quotient}"), Some(Ansi::Green)),
                    Err(err) => printer.print(&err),
                },
                (None, _) => printer.print(TracebackSource::CallStack),
            }
        }
        Commands::Threads {
            workers,
            lines,
            timestamps,
        } => run_threads(workers, lines, timestamps),
    }
    Ok(())
}

fn checked_divide(a: i64, b: i64) -> Result<i64, TracedError>
{
    a.checked_div(b).ok_or_else(|| TracedError::from_error(&ZeroDivisionError))
}

fn run_threads(workers: usize, lines: usize, timestamps: bool)
{
    const PALETTE: [Ansi; 6] = [Ansi::Red, Ansi::Green, Ansi::Yellow, Ansi::Blue, Ansi::Purple, Ansi::Cyan];

    debug!(workers, lines, "starting printing threads");
    thread::scope(|scope| {
        for worker in 0..workers {
            scope.spawn(move || {
                let printer = stdout_printer();
                let color = PALETTE[worker % PALETTE.len()];
                for line in 0..lines {
                    let message = format!("worker {worker}: line {line}");
                    let printed = if timestamps {
                        printer.tprint(&message, Some(color))
                    } else {
                        printer.print(&message, Some(color))
                    };
                    // Stdout is shared, later lines would fail too.
                    if let Err(e) = printed {
                        warn!(worker, error = %e, "stopping worker");
                        break;
                    }
                }
            });
        }
    });
}
