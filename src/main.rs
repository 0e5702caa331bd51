use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use whittle::driver::{self, Corpus};
use whittle::passes::{PassConfig, PassKind};
use whittle::{wire, PassError, Selection};

#[derive(Parser)]
#[command(name = "whittle")]
#[command(about = "Syntax-guided reduction hints for C/C++ test cases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit reduction hints for a pass as line-delimited JSON
    Hints {
        /// Pass name (see `whittle list`)
        pass: String,

        /// Realize only the K-th candidate, 1-based (default: all of them)
        #[arg(short, long)]
        counter: Option<usize>,

        /// Realize every candidate from --counter up to this one as a batch
        #[arg(long, requires = "counter")]
        to_counter: Option<usize>,

        /// Function name the remove-function pass must leave untouched
        #[arg(long)]
        preserve: Option<String>,

        /// Report the number of enumerated candidates on stderr
        #[arg(long)]
        report_instances_count: bool,

        /// Write hints here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source file or directory to examine
        input: PathBuf,
    },

    /// Rewrite a source file by realizing the selected candidate directly
    Apply {
        /// Pass name (see `whittle list`)
        pass: String,

        /// Candidate to realize, 1-based
        #[arg(short, long)]
        counter: usize,

        /// Realize every candidate from --counter up to this one as a batch
        #[arg(long)]
        to_counter: Option<usize>,

        /// Function name the remove-function pass must leave untouched
        #[arg(long)]
        preserve: Option<String>,

        /// Echo the input unchanged instead of failing when the counter
        /// points past the last candidate
        #[arg(long)]
        warn_on_counter_out_of_bounds: bool,

        /// Report the number of enumerated candidates on stderr
        #[arg(long)]
        report_instances_count: bool,

        /// Write the rewritten source here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source file to rewrite
        input: PathBuf,
    },

    /// Count a pass's candidates without emitting anything else
    Count {
        /// Pass name (see `whittle list`)
        pass: String,

        /// Source file or directory to examine
        input: PathBuf,
    },

    /// List the available passes
    List {
        /// Also show what each pass does
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hints {
            pass,
            counter,
            to_counter,
            preserve,
            report_instances_count,
            output,
            input,
        } => cmd_hints(
            &pass,
            counter,
            to_counter,
            preserve,
            report_instances_count,
            output.as_deref(),
            &input,
        ),

        Commands::Apply {
            pass,
            counter,
            to_counter,
            preserve,
            warn_on_counter_out_of_bounds,
            report_instances_count,
            output,
            input,
        } => cmd_apply(
            &pass,
            counter,
            to_counter,
            preserve,
            warn_on_counter_out_of_bounds,
            report_instances_count,
            output.as_deref(),
            &input,
        ),

        Commands::Count { pass, input } => cmd_count(&pass, &input),

        Commands::List { verbose } => cmd_list(verbose),
    }
}

fn lookup_pass(name: &str) -> Result<PassKind> {
    match PassKind::from_name(name) {
        Some(kind) => Ok(kind),
        None => anyhow::bail!(
            "unknown pass '{}'; run `whittle list` to see the available passes",
            name
        ),
    }
}

fn selection_from_counters(counter: Option<usize>, to_counter: Option<usize>) -> Selection {
    match (counter, to_counter) {
        (None, _) => Selection::All,
        (Some(k), None) => Selection::Single(k),
        (Some(from), Some(to)) => Selection::Range { from, to },
    }
}

/// The count line consumers parse from stderr under
/// `--report-instances-count`.
fn report_instances(count: usize) {
    eprintln!("Available transformation instances: {count}");
}

#[allow(clippy::too_many_arguments)]
fn cmd_hints(
    pass: &str,
    counter: Option<usize>,
    to_counter: Option<usize>,
    preserve: Option<String>,
    report_count: bool,
    output: Option<&Path>,
    input: &Path,
) -> Result<()> {
    let kind = lookup_pass(pass)?;
    let selection = selection_from_counters(counter, to_counter);
    let config = PassConfig { preserve };
    let corpus = Corpus::load(input)?;

    let report = driver::run(kind, &config, selection, &corpus)?;
    if report_count {
        report_instances(report.candidates);
    }

    match output {
        Some(path) => {
            let mut buf = Vec::new();
            wire::write_bundle(&mut buf, &report.bundle)?;
            driver::write_output(path, &buf)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            wire::write_bundle(&mut lock, &report.bundle)?;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_apply(
    pass: &str,
    counter: usize,
    to_counter: Option<usize>,
    preserve: Option<String>,
    warn_out_of_bounds: bool,
    report_count: bool,
    output: Option<&Path>,
    input: &Path,
) -> Result<()> {
    let kind = lookup_pass(pass)?;
    let selection = selection_from_counters(Some(counter), to_counter);
    let config = PassConfig { preserve };

    let corpus = Corpus::load(input)?;
    let Some(file) = corpus.single() else {
        anyhow::bail!(
            "apply mode rewrites one file; '{}' is a directory",
            input.display()
        );
    };

    // The count is reported before realization, so it still reaches stderr
    // when realizing the selected candidate fails non-fatally below.
    let rewritten = driver::run(kind, &config, selection, &corpus).and_then(|report| {
        if report_count {
            report_instances(report.candidates);
        }
        driver::rewrite(&file.text, &report.bundle)
    });

    let text = match rewritten {
        Ok(text) => text,
        Err(err @ PassError::CounterOutOfRange { .. }) if warn_out_of_bounds => {
            // The outer reduction loop probes past the end of every pass;
            // hand the input back unchanged so it can move on. The count
            // still gets reported: callers pair both flags to learn how far
            // they overshot.
            eprintln!("{}", format!("Warning: {err}").yellow());
            if report_count {
                if let PassError::CounterOutOfRange { available, .. } = err {
                    report_instances(available);
                }
            }
            file.text.clone()
        }
        Err(PassError::Internal { message }) => {
            eprintln!("{}", format!("Warning: internal error: {message}").yellow());
            file.text.clone()
        }
        Err(err) => return Err(err.into()),
    };

    emit_text(output, &text)
}

fn cmd_count(pass: &str, input: &Path) -> Result<()> {
    let kind = lookup_pass(pass)?;
    let corpus = Corpus::load(input)?;
    let report = driver::run(kind, &PassConfig::default(), Selection::Count, &corpus)?;
    println!("Available transformation instances: {}", report.candidates);
    Ok(())
}

fn cmd_list(verbose: bool) -> Result<()> {
    for kind in PassKind::ALL {
        if verbose {
            println!("{}", kind.name().bold());
            println!("    {}", kind.description());
        } else {
            println!("{}", kind.name());
        }
    }
    Ok(())
}

fn emit_text(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => driver::write_output(path, text.as_bytes())?,
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(text.as_bytes())?;
        }
    }
    Ok(())
}
