use anyhow::Result;
use chrono::Local;
use clap::Parser;
use farprep::{
    consolidate::{absolute, Policy},
    run::{run, Config},
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Preps FAR roster spreadsheets: removes empty rows, normalizes column
/// names, then writes the data as CSV plus a structural report about the
/// input files.
#[derive(Debug, Parser)]
#[command(name = "farprep", version)]
struct Args {
    /// Directory containing xlsx files for conversion.
    inpath: PathBuf,

    /// Directory to write filtered files. Defaults to the current directory.
    #[arg(default_value = ".")]
    outpath: PathBuf,

    /// Do not convert files, just output the stats file.
    #[arg(short = 'A', long)]
    analyze_only: bool,

    /// Merge filtered rows into a single schema-constrained CSV instead of
    /// one file per input.
    #[arg(short = 'C', long)]
    consolidate: bool,

    /// Keep datatypes from the original workbook. All data is imported as
    /// text unless set.
    #[arg(short = 'K', long)]
    keep_types: bool,

    /// Reject files missing required columns instead of back-filling them
    /// with empty values. Only meaningful with --consolidate.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let config = Config {
        inpath: args.inpath,
        outpath: args.outpath,
        analyze_only: args.analyze_only,
        consolidate: args.consolidate,
        keep_types: args.keep_types,
        policy: if args.strict {
            Policy::Strict
        } else {
            Policy::Permissive
        },
    };

    let started = Local::now();
    let stats = run(&config)?;
    let finished = Local::now();

    println!("Started: {}", started.format("%Y-%m-%d %H:%M:%S"));
    println!("Finished: {}", finished.format("%Y-%m-%d %H:%M:%S"));
    println!("Elapsed: {}", finished - started);
    println!(
        "{} in {}. {} files processed. {} files converted. {} rows total.",
        stats.files_in_dir,
        absolute(&config.inpath).display(),
        stats.processed,
        stats.converted,
        stats.total_rows
    );

    Ok(())
}
