use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::aggregator::StationAggregator;
use crate::cli::Args;

mod aggregator;
mod cli;
mod csv_handler;
mod station_index;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let input = File::open(&args.input)
        .with_context(|| format!("failed to open input file {}", args.input.display()))?;

    let rows = csv_handler::load_csv_file(input);
    let mut engine = StationAggregator::default();
    engine.load_rows(args.station_tier, rows);

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("failed to create output directory {}", args.output_dir.display())
    })?;
    let output_path = args.output_dir.join(args.output_file_name());
    let output = File::create(&output_path)
        .with_context(|| format!("failed to create output file {}", output_path.display()))?;

    let mut out = BufWriter::new(output);
    csv_handler::write_report(&engine, &mut out, args.station_tier, args.consumer_tier)
        .and_then(|()| out.flush())
        .with_context(|| format!("failed to write report to {}", output_path.display()))?;

    log::info!("Report written to {}", output_path.display());
    Ok(())
}
