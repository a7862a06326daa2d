//! tblkit CLI - converts game `.tbl` tables to CSV and back.
//!
//! The input's extension picks the direction: a `.tbl` file is written out
//! as `<stem>.csv`, a `.csv` file as `<stem>.tbl`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use tblkit::prelude::*;
use tblkit::table::Error as TableError;

/// tblkit - game table (.tbl) to CSV converter
#[derive(Parser)]
#[command(name = "tblkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Table to convert (.tbl or .csv)
    input: PathBuf,

    /// Output directory [default: current directory]
    #[arg(short, long, env = "TBLKIT_OUTPUT")]
    output: Option<PathBuf>,

    /// List the key directory instead of converting
    #[arg(long)]
    info: bool,

    /// Print the directory listing as JSON
    #[arg(long, requires = "info")]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct TableInfo<'a> {
    path: &'a Path,
    objects: usize,
    keys: usize,
    directory: Vec<DirectoryEntry<'a>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = match TableFormat::from_path(&cli.input) {
        Ok(format) => format,
        Err(TableError::UnrecognizedExtension(ext)) => {
            println!("This file type is not supported: {:?}", ext);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let table = load(&cli.input, format)?;

    if cli.info {
        return cmd_info(&cli.input, &table, cli.json);
    }

    let output_dir = match cli.output {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    cmd_convert(&cli.input, &output_dir, format, &table)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn load(input: &Path, format: TableFormat) -> Result<TblFile> {
    let start = Instant::now();
    let table = match format {
        TableFormat::Tbl => TblFile::from_tbl(input).context("Failed to read table file")?,
        TableFormat::Csv => TblFile::from_csv(input).context("Failed to read CSV file")?,
    };

    tracing::info!(
        path = %input.display(),
        objects = table.object_count(),
        keys = table.key_count(),
        elapsed = ?start.elapsed(),
        "loaded table"
    );
    Ok(table)
}

fn cmd_info(input: &Path, table: &TblFile, json: bool) -> Result<()> {
    if json {
        let info = TableInfo {
            path: input,
            objects: table.object_count(),
            keys: table.key_count(),
            directory: table.directory().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    for entry in table.directory() {
        println!("{:>6} {:<8} {}", entry.count, entry.kind.name(), entry.key);
    }
    println!("\nTotal: {} records under {} keys", table.object_count(), table.key_count());

    Ok(())
}

fn cmd_convert(
    input: &Path,
    output_dir: &Path,
    format: TableFormat,
    table: &TblFile,
) -> Result<()> {
    let output = format.output_path(input, output_dir);
    println!("Converting: {} -> {}", input.display(), output.display());

    let written = match format.counterpart() {
        TableFormat::Tbl => table.write_to_tbl(&output),
        TableFormat::Csv => table.write_to_csv(&output),
    };
    written.with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Conversion complete: {} records", table.object_count());

    Ok(())
}
