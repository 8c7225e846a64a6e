// src/main.rs

use clap::Parser;
use log::info;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use ulog_resample::constants::DERIVED_PREFIX;
use ulog_resample::data_analysis::run_analysis;
use ulog_resample::data_analysis::summary::summarize_all;
use ulog_resample::data_analysis::vehicle_status::nav_state_transitions;
use ulog_resample::data_input::log_info::{add_param, date, duration, start_time};
use ulog_resample::{crate_version, AnalysisKind, CsvLogReader, ResampledLog};

#[derive(Parser)]
#[command(name = "ulog_resample")]
#[command(about = "Resample the topics of a PX4 log onto one time axis and derive flight diagnostics")]
struct Args {
    /// The .ulg file. Its ulog2csv export must sit next to it.
    file: PathBuf,

    /// Analysis to run.
    #[arg(short, long, value_enum, default_value_t = AnalysisKind::LocalPosition)]
    analysis: AnalysisKind,

    /// Write the resampled table to this CSV file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Additional topics to resample.
    #[arg(long, value_delimiter = ',')]
    topics: Vec<String>,

    /// Additional topics to resample by holding the last value.
    #[arg(long, value_delimiter = ',')]
    zoh_topics: Vec<String>,

    /// Parameters to attach as columns (value in effect at every row).
    #[arg(long, value_delimiter = ',')]
    param: Vec<String>,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(args.verbosity);
    info!("ulog_resample {}", crate_version());

    let resampled = ResampledLog::create(
        &CsvLogReader::new(),
        &args.file,
        args.analysis,
        &args.topics,
        &args.zoh_topics,
    )?;

    println!("Log: {}", args.file.display());
    println!("  Start time: {}", start_time(&resampled.log));
    println!("  Duration:   {}", duration(&resampled.log));
    if let Some(date) = date(&resampled.log) {
        println!("  Date:       {}", date.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    let mut table = run_analysis(args.analysis, resampled.table)?;
    for name in &args.param {
        add_param(&resampled.log, name, &mut table)?;
    }
    println!(
        "Analysis '{}': {} rows, {} columns",
        args.analysis,
        table.len(),
        table.columns().len()
    );

    if args.analysis == AnalysisKind::VehicleStatus {
        println!("Navigation state changes:");
        for change in nav_state_transitions(&table)? {
            println!("  {:>10.3} s  nav_state {}", change.time_s, change.nav_state);
        }
    }

    println!("Derived columns:");
    for summary in summarize_all(&table)?
        .iter()
        .filter(|s| s.name.contains(DERIVED_PREFIX))
    {
        println!(
            "  {:<60} min {:>12.4}  max {:>12.4}  mean {:>12.4}  ({} values)",
            summary.name, summary.min, summary.max, summary.mean, summary.count
        );
    }

    if let Some(output) = &args.output {
        table.write_csv(BufWriter::new(File::create(output)?))?;
        println!("Wrote {}", output.display());
    }

    Ok(())
}

fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Warn),
        1 => builder.filter_level(log::LevelFilter::Info),
        2 => builder.filter_level(log::LevelFilter::Debug),
        _ => builder.filter_level(log::LevelFilter::Trace),
    };
    builder.init();
}

// src/main.rs
