//! insync CLI - Leave Tracker Calendar Reshaper
//!
//! Command-line interface for converting monthly attendance trackers into
//! working-day leave calendars.

mod exit;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use insync_core::{column_label, CodeDictionary, LeaveReport, Renderer};
use insync_parser::{parse_grid, read_workbook, LocatorOptions};
use insync_pivot::{run, Outcome, NO_RECORDS_MESSAGE};
use insync_render::{ExcelRenderer, JsonRenderer, TextRenderer};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::exit::ExitCode;

#[derive(Parser)]
#[command(name = "insync")]
#[command(author, version, about = "Leave tracker calendar reshaper", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads a tracker
#[derive(Args, Debug)]
struct SheetArgs {
    /// Attendance workbook (xlsx, xls, ods)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Code dictionary file (TOML) replacing or extending the standard codes
    #[arg(long, env = "INSYNC_CODES", value_name = "TOML")]
    codes: Option<PathBuf>,

    /// Column holding the month, the "Employee Name" marker and names (letter or zero-based index)
    #[arg(long, env = "INSYNC_IDENTITY_COLUMN", default_value = "B", value_parser = parse_column)]
    identity_column: usize,

    /// Reporting year (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a tracker into a calendar workbook
    Convert {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output file (defaults to insync_output_<month>_<year>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write totals as numbers instead of COUNTA formulas
        #[arg(long)]
        static_totals: bool,
    },

    /// Print the calendar to stdout
    Preview {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: PreviewFormat,

        /// Only list days with entries (text format)
        #[arg(long)]
        compact: bool,
    },

    /// Show the detected layout and employee list
    Inspect {
        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// List the active code dictionary
    Codes {
        /// Code dictionary file (TOML)
        #[arg(long, env = "INSYNC_CODES", value_name = "TOML")]
        codes: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PreviewFormat {
    Text,
    Json,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = execute(cli.command);
    if let Err(err) = &result {
        eprintln!("Processing failed: {err:#}");
    }
    let code = ExitCode::from_result(&result);
    debug!(code = code.code(), "exiting");
    code.into()
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity flag
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Convert {
            sheet,
            output,
            static_totals,
        } => convert(&sheet, output, static_totals),
        Commands::Preview {
            sheet,
            format,
            compact,
        } => preview(&sheet, format, compact),
        Commands::Inspect { sheet } => inspect(&sheet),
        Commands::Codes { codes } => list_codes(codes.as_deref()),
    }
}

fn convert(sheet: &SheetArgs, output: Option<PathBuf>, static_totals: bool) -> Result<()> {
    let Some(report) = load_report(sheet)? else {
        return Ok(());
    };
    println!("Month Detected: {}", report.period_label());

    let mut renderer = ExcelRenderer::new();
    if static_totals {
        renderer = renderer.static_values();
    }
    let bytes = renderer.render(&report)?;

    let output = output.unwrap_or_else(|| PathBuf::from(report.suggested_file_name()));
    std::fs::write(&output, bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let stats = &report.stats;
    println!(
        "Wrote {} ({} entries, {} employees, {} working days)",
        output.display(),
        report.grid.populated_cells(),
        report.grid.employees().len(),
        report.grid.days().len()
    );
    if stats.overwritten > 0 {
        eprintln!(
            "Warning: {} conflicting entries resolved in favour of the later row",
            stats.overwritten
        );
    }
    Ok(())
}

fn preview(sheet: &SheetArgs, format: PreviewFormat, compact: bool) -> Result<()> {
    let Some(report) = load_report(sheet)? else {
        return Ok(());
    };

    let rendered = match format {
        PreviewFormat::Text => {
            let mut renderer = TextRenderer::new();
            if compact {
                renderer = renderer.compact();
            }
            renderer.render(&report)?
        }
        PreviewFormat::Json => JsonRenderer::new().render(&report)?,
    };
    print!("{rendered}");
    if matches!(format, PreviewFormat::Json) {
        println!();
    }
    Ok(())
}

fn inspect(sheet: &SheetArgs) -> Result<()> {
    let codes = load_codes(sheet.codes.as_deref())?;
    let grid = read_workbook(&sheet.file)?;
    let parsed = parse_grid(&grid, &codes, &locator_options(sheet))?;
    let layout = &parsed.layout;

    let source = if layout.month_detected {
        "detected"
    } else {
        "not found, using current month"
    };
    println!("Period:        {} ({source})", layout.period_label());
    println!(
        "Header row:    {} (column {})",
        layout.header_row() + 1,
        column_label(sheet.identity_column)
    );
    let columns: Vec<String> = layout
        .date_columns
        .iter()
        .map(|c| format!("{}={}", column_label(c.column), c.date.format("%d")))
        .collect();
    println!("Date columns:  {}", columns.len());
    if !columns.is_empty() {
        println!("               {}", columns.join(" "));
    }
    println!("Leave records: {}", parsed.observations.len());
    println!("Employees:     {}", parsed.employees.len());
    for name in &parsed.employees {
        println!("  {name}");
    }
    Ok(())
}

fn list_codes(path: Option<&Path>) -> Result<()> {
    let codes = load_codes(path)?;
    let width = codes.iter().map(|(code, _)| code.len()).max().unwrap_or(0);
    for (code, label) in codes.iter() {
        println!("{code:<width$}  {label}");
    }
    Ok(())
}

/// Run the pipeline; `None` (with a warning) when the sheet has no mapped codes
fn load_report(sheet: &SheetArgs) -> Result<Option<LeaveReport>> {
    let codes = load_codes(sheet.codes.as_deref())?;
    let grid = read_workbook(&sheet.file)?;
    debug!(file = %sheet.file.display(), "read workbook");

    match run(&grid, &codes, &locator_options(sheet))? {
        Outcome::Report(report) => Ok(Some(report)),
        Outcome::NoRecords { .. } => {
            eprintln!("Warning: {NO_RECORDS_MESSAGE}");
            Ok(None)
        }
    }
}

fn load_codes(path: Option<&Path>) -> Result<CodeDictionary> {
    match path {
        Some(path) => Ok(CodeDictionary::load(path)?),
        None => Ok(CodeDictionary::standard()),
    }
}

fn locator_options(sheet: &SheetArgs) -> LocatorOptions {
    let options = LocatorOptions::new().identity_column(sheet.identity_column);
    match sheet.year {
        Some(year) => options.year(year),
        None => options,
    }
}

/// Column letter (`B`, `AA`) or zero-based index (`1`)
fn parse_column(value: &str) -> Result<usize, String> {
    let value = value.trim();
    if let Ok(index) = value.parse::<usize>() {
        return Ok(index);
    }
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!(
            "expected a column letter or zero-based index, got '{value}'"
        ));
    }

    let mut index = 0usize;
    for byte in value.to_ascii_uppercase().bytes() {
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(usize::from(byte - b'A' + 1)))
            .ok_or_else(|| format!("column '{value}' is out of range"))?;
    }
    Ok(index - 1)
}
