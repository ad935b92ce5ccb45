use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Voltage level at which station totals are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StationTier {
    Hvb,
    Hva,
    Lv,
}

/// Consumer category. Only labels the report and the output file name; the
/// aggregation itself does not filter on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConsumerTier {
    Comp,
    Indiv,
    All,
}

impl fmt::Display for StationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StationTier::Hvb => "hvb",
            StationTier::Hva => "hva",
            StationTier::Lv => "lv",
        })
    }
}

impl fmt::Display for ConsumerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConsumerTier::Comp => "comp",
            ConsumerTier::Indiv => "indiv",
            ConsumerTier::All => "all",
        })
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "grid_aggregator",
    version,
    about = "Aggregate per-station capacity and consumption from a distribution network CSV"
)]
pub struct Args {
    /// Input CSV file (semicolon-delimited, `-` marks a missing field)
    pub input: PathBuf,

    /// Station tier to aggregate
    #[arg(value_enum)]
    pub station_tier: StationTier,

    /// Consumer tier, used to label the report
    #[arg(value_enum)]
    pub consumer_tier: ConsumerTier,

    /// Power plant id, used only in the output file name
    pub plant_id: Option<u32>,

    /// Directory the report is written to (created if absent)
    #[arg(short = 'o', long = "output-dir", value_name = "PATH", default_value = ".")]
    pub output_dir: PathBuf,
}

impl Args {
    pub fn output_file_name(&self) -> String {
        match self.plant_id {
            Some(plant_id) => {
                format!("{}_{}_{}.csv", self.station_tier, self.consumer_tier, plant_id)
            }
            None => format!("{}_{}.csv", self.station_tier, self.consumer_tier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(plant_id: Option<u32>) -> Args {
        Args {
            input: PathBuf::from("input.csv"),
            station_tier: StationTier::Hva,
            consumer_tier: ConsumerTier::Comp,
            plant_id,
            output_dir: PathBuf::from("."),
        }
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(args(None).output_file_name(), "hva_comp.csv");
        assert_eq!(args(Some(3)).output_file_name(), "hva_comp_3.csv");
    }
}
