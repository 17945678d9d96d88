//! `absence-sync` CLI — compress, split and diff absence records from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Compress touching/overlapping absences (stdin → stdout)
//! cat absences.json | absence-sync compress
//!
//! # Split half-day boundaries into separate records, file to file
//! absence-sync split -i absences.json -o split.json
//!
//! # What must be created/deleted in the target to match the source?
//! absence-sync diff --source hr.json --target calendar.json \
//!     --target-format flagged --compress --split-half-days
//!
//! # Write the changes back as boolean-flag records
//! absence-sync diff --source hr.json --target calendar.json \
//!     --target-format flagged --emit flagged
//!
//! # Map native leave-type names onto canonical kinds
//! absence-sync --kind-map kinds.json check -i absences.json
//! ```
//!
//! Input files are JSON arrays of records. `meridiem` records carry optional
//! `start_half`/`end_half` ("AM"/"PM"); `flagged` records carry
//! `half_day_start`/`half_day_end` booleans. Output is canonical interval JSON
//! unless `--emit meridiem|flagged` asks for records in a source's own shape.
//!
//! Logging goes to stderr. Set `RUST_LOG` (default `warn`) or pass `--verbose`.

use absence_engine::{
    Changes, DiffOptions, FlaggedRecord, Interval, IntervalCollection, KindMap, MeridiemRecord,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "absence-sync",
    version,
    about = "Reconcile leave/absence records between two systems"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON object mapping native leave-type names to canonical kinds
    #[arg(long, global = true)]
    kind_map: Option<String>,

    /// Log engine activity at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// How half-days are represented in an input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RecordFormat {
    /// Explicit "AM"/"PM" start and end halves
    Meridiem,
    /// Boolean half_day_start / half_day_end flags
    Flagged,
}

/// Shape of the JSON written to the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EmitFormat {
    /// Canonical intervals (kind, dates and both halves)
    Canonical,
    /// Records with explicit "AM"/"PM" halves
    Meridiem,
    /// Records with half_day_start / half_day_end flags
    Flagged,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge overlapping and adjacent absences of the same kind
    Compress {
        /// Input file (reads from stdin if omitted or "-")
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Record format of the input
        #[arg(long, value_enum, default_value_t = RecordFormat::Meridiem)]
        format: RecordFormat,
        /// Shape of the written JSON
        #[arg(long, value_enum, default_value_t = EmitFormat::Canonical)]
        emit: EmitFormat,
    },
    /// Split half-day boundaries into single half-day records
    Split {
        /// Input file (reads from stdin if omitted or "-")
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Record format of the input
        #[arg(long, value_enum, default_value_t = RecordFormat::Meridiem)]
        format: RecordFormat,
        /// Shape of the written JSON
        #[arg(long, value_enum, default_value_t = EmitFormat::Canonical)]
        emit: EmitFormat,
    },
    /// Compute the records to add to and remove from the target
    Diff {
        /// Canonical records ("-" for stdin)
        #[arg(long)]
        source: String,
        /// Previously synchronized records ("-" for stdin)
        #[arg(long)]
        target: String,
        /// Record format of the source file
        #[arg(long, value_enum, default_value_t = RecordFormat::Meridiem)]
        source_format: RecordFormat,
        /// Record format of the target file
        #[arg(long, value_enum, default_value_t = RecordFormat::Meridiem)]
        target_format: RecordFormat,
        /// Compress the source before comparing
        #[arg(long)]
        compress: bool,
        /// Split the source's half-day boundaries before comparing
        #[arg(long)]
        split_half_days: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Shape of the written JSON
        #[arg(long, value_enum, default_value_t = EmitFormat::Canonical)]
        emit: EmitFormat,
    },
    /// Validate records and summarize them
    Check {
        /// Input file (reads from stdin if omitted or "-")
        #[arg(short, long)]
        input: Option<String>,
        /// Record format of the input
        #[arg(long, value_enum, default_value_t = RecordFormat::Meridiem)]
        format: RecordFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let kinds = load_kind_map(cli.kind_map.as_deref())?;

    match cli.command {
        Commands::Compress {
            input,
            output,
            format,
            emit,
        } => {
            let intervals = load_intervals(input.as_deref(), format, &kinds)?;
            let compressed = intervals.compress();
            info!(
                before = intervals.len(),
                after = compressed.len(),
                "compressed"
            );
            write_intervals(output.as_deref(), &compressed, emit)?;
        }
        Commands::Split {
            input,
            output,
            format,
            emit,
        } => {
            let intervals = load_intervals(input.as_deref(), format, &kinds)?;
            let split = intervals.split_half_days();
            info!(before = intervals.len(), after = split.len(), "split");
            write_intervals(output.as_deref(), &split, emit)?;
        }
        Commands::Diff {
            source,
            target,
            source_format,
            target_format,
            compress,
            split_half_days,
            output,
            emit,
        } => {
            if source == "-" && target == "-" {
                anyhow::bail!("Only one of --source and --target can read from stdin");
            }
            let current = load_intervals(Some(source.as_str()), source_format, &kinds)
                .with_context(|| format!("Failed to load source records: {}", source))?;
            let previous = load_intervals(Some(target.as_str()), target_format, &kinds)
                .with_context(|| format!("Failed to load target records: {}", target))?;

            let changes = current.diff(
                &previous,
                DiffOptions {
                    compress,
                    split_half_days,
                },
            );
            info!(
                added = changes.added.len(),
                removed = changes.removed.len(),
                "diff complete"
            );
            write_changes(output.as_deref(), &changes, emit)?;
        }
        Commands::Check { input, format } => {
            let intervals = load_intervals(input.as_deref(), format, &kinds)?;
            println!("Intervals:  {}", intervals.len());
            println!("Kinds:      {}", intervals.kinds().len());
            println!("Half-days:  {}", intervals.total_half_days());
        }
    }

    Ok(())
}

/// `--verbose` forces debug output; otherwise `RUST_LOG` applies, defaulting to `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn load_kind_map(path: Option<&str>) -> Result<KindMap> {
    match path {
        Some(path) => {
            let json = read_input(Some(path))?;
            let kinds = KindMap::from_json(&json)
                .with_context(|| format!("Failed to load kind map: {}", path))?;
            debug!(aliases = kinds.len(), path, "loaded kind map");
            Ok(kinds)
        }
        None => Ok(KindMap::default()),
    }
}

fn load_intervals(
    path: Option<&str>,
    format: RecordFormat,
    kinds: &KindMap,
) -> Result<IntervalCollection> {
    let json = read_input(path)?;
    let intervals = match format {
        RecordFormat::Meridiem => {
            let records: Vec<MeridiemRecord> =
                serde_json::from_str(&json).context("Failed to parse meridiem records")?;
            kinds.collect(&records)
        }
        RecordFormat::Flagged => {
            let records: Vec<FlaggedRecord> =
                serde_json::from_str(&json).context("Failed to parse flagged records")?;
            kinds.collect(&records)
        }
    }
    .context("Invalid absence record")?;
    debug!(count = intervals.len(), ?format, "loaded intervals");
    Ok(intervals)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// `added`/`removed` in a record shape other than canonical intervals.
#[derive(Serialize)]
struct RecordChanges<R> {
    added: Vec<R>,
    removed: Vec<R>,
}

fn to_records<'a, R: From<&'a Interval>>(intervals: &'a IntervalCollection) -> Vec<R> {
    intervals.iter().map(R::from).collect()
}

fn to_record_changes<'a, R: From<&'a Interval>>(changes: &'a Changes) -> RecordChanges<R> {
    RecordChanges {
        added: to_records(&changes.added),
        removed: to_records(&changes.removed),
    }
}

fn write_intervals(
    path: Option<&str>,
    intervals: &IntervalCollection,
    emit: EmitFormat,
) -> Result<()> {
    match emit {
        EmitFormat::Canonical => write_json(path, intervals),
        EmitFormat::Meridiem => write_json(path, &to_records::<MeridiemRecord>(intervals)),
        EmitFormat::Flagged => write_json(path, &to_records::<FlaggedRecord>(intervals)),
    }
}

fn write_changes(path: Option<&str>, changes: &Changes, emit: EmitFormat) -> Result<()> {
    match emit {
        EmitFormat::Canonical => write_json(path, changes),
        EmitFormat::Meridiem => write_json(path, &to_record_changes::<MeridiemRecord>(changes)),
        EmitFormat::Flagged => write_json(path, &to_record_changes::<FlaggedRecord>(changes)),
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    content.push('\n');
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
