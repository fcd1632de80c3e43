use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod barcode;
mod catalog;
mod error;
mod export;
mod ledger;
mod records;
mod session;
mod weight;

use export::write_export;
use ledger::GroupSummary;
use records::load_catalog;
use session::Session;

/// Scan price-embedded barcodes and collect average weights per product.
#[derive(Parser, Debug)]
#[command(name = "meat-scanner")]
#[command(version)]
struct Args {
    /// Reference table (.csv or .xlsx) with UPC, Description and Price per lb. columns
    #[arg(short, long, env = "MEAT_SCANNER_CATALOG")]
    catalog: PathBuf,

    /// Export file; the format follows the extension (.csv or .xlsx)
    #[arg(short, long, default_value = "meat_stats.xlsx", env = "MEAT_SCANNER_EXPORT")]
    export: PathBuf,

    /// Write the export when input ends
    #[arg(long, env = "MEAT_SCANNER_EXPORT_ON_EXIT")]
    export_on_exit: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info", env = "MEAT_SCANNER_LOG")]
    log_level: String,
}

/// A line of operator input.
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Scan(&'a str),
    Export(Option<&'a str>),
    Import(&'a str),
    Reset,
    Table,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(rest) = line.strip_prefix(':') else {
            return Some(Command::Scan(line));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };

        let command = match (name, arg) {
            ("export", arg) => Command::Export(arg),
            ("import", Some(path)) => Command::Import(path),
            ("reset", None) => Command::Reset,
            ("table", None) => Command::Table,
            ("help", None) => Command::Help,
            ("quit" | "q", None) => Command::Quit,
            _ => Command::Unknown(line),
        };

        Some(command)
    }
}

const HELP: &str = "\
Scan a 12 digit barcode, or enter a command:
  :export [PATH]  write the collected averages (default: --export)
  :import PATH    replace the catalog
  :reset          discard collected samples
  :table          show collected averages
  :quit           exit";

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    info!("Starting meat-scanner v{}", env!("CARGO_PKG_VERSION"));

    let catalog = load_catalog(&args.catalog)
        .with_context(|| format!("Failed to load catalog {}", args.catalog.display()))?;
    let mut session = Session::new(catalog);
    if session.catalog().is_empty() {
        warn!(path = %args.catalog.display(), "catalog has no products, every scan will be rejected");
    }

    println!("Loaded {} products", session.catalog().len());
    println!("{HELP}");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Scan(raw) => match session.handle_scan(raw) {
                Ok(summary) => println!("{}", format_summary(&summary)),
                Err(e) => {
                    info!(input = raw, "scan rejected: {e}");
                    println!("! {e}");
                }
            },
            Command::Export(path) => {
                let path = path.map(Path::new).unwrap_or(args.export.as_path());
                write_session_export(&session, path);
            }
            Command::Import(path) => match load_catalog(path) {
                Ok(catalog) => {
                    println!("Loaded {} products", catalog.len());
                    session.replace_catalog(catalog);
                }
                Err(e) => {
                    error!(path, "import failed: {e}");
                    println!("! Import failed, keeping the current catalog: {e}");
                }
            },
            Command::Reset => {
                let products = session.ledger().len();
                session.reset();
                println!("Cleared samples for {products} products");
            }
            Command::Table => print_table(&session.summaries())?,
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(input) => println!("! Unknown command {input}, try :help"),
        }
    }

    if args.export_on_exit {
        write_session_export(&session, &args.export);
    }

    Ok(())
}

fn write_session_export(session: &Session, path: &Path) {
    match write_export(path, &session.export_rows()) {
        Ok(()) => println!("Exported to {}", path.display()),
        Err(e) => {
            error!(path = %path.display(), "export failed: {e}");
            println!("! Export failed: {e}");
        }
    }
}

fn format_summary(summary: &GroupSummary) -> String {
    format!(
        "{}  {}  avg {:.1} lb.  ({} samples)",
        summary.product_code,
        summary.description,
        summary.rounded_average(),
        summary.sample_count
    )
}

fn print_table(summaries: &[GroupSummary]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{:<6}{:<30}{:>12}{:>9}", "UPC", "Description", "Avg Weight", "Samples")?;
    for s in summaries {
        writeln!(
            out,
            "{:<6}{:<30}{:>12.1}{:>9}",
            s.product_code,
            s.description,
            s.rounded_average(),
            s.sample_count
        )?;
    }
    out.flush()
}
