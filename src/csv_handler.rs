use log::warn;
use serde::{Deserialize, Deserializer};
use std::io::{Read, Write};
use std::str::FromStr;

use crate::aggregator::StationAggregator;
use crate::cli::{ConsumerTier, StationTier};

/// One data line of the distribution dataset. Fields carry the `-` marker
/// when absent and deserialize to `None`; any other non-numeric token is
/// treated the same way.
#[derive(Debug, Default, Deserialize)]
pub struct RowRaw {
    #[serde(deserialize_with = "numeric_or_missing")]
    pub plant: Option<u32>,
    #[serde(deserialize_with = "numeric_or_missing")]
    pub hvb: Option<u32>,
    #[serde(deserialize_with = "numeric_or_missing")]
    pub hva: Option<u32>,
    #[serde(deserialize_with = "numeric_or_missing")]
    pub lv: Option<u32>,
    #[serde(deserialize_with = "numeric_or_missing")]
    pub company: Option<u32>,
    #[serde(deserialize_with = "numeric_or_missing")]
    pub individual: Option<u32>,
    #[serde(deserialize_with = "numeric_or_missing")]
    pub capacity: Option<u64>,
    #[serde(deserialize_with = "numeric_or_missing")]
    pub load: Option<u64>,
}

fn numeric_or_missing<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().ok())
}

/// Streams rows from the input. The first line is the column header and is
/// skipped; rows with a wrong field count are logged and dropped.
pub fn load_csv_file<R: Read>(input: R) -> impl Iterator<Item = RowRaw> {
    let reader: csv::DeserializeRecordsIntoIter<R, RowRaw> = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .has_headers(false)
        .from_reader(input)
        .into_deserialize();
    reader.skip(1).filter_map(|result| match result {
        Ok(row) => Some(row),
        Err(e) => {
            warn!("Failed to parse a row from the CSV file: {}. Skipping invalid record.", e);
            None
        }
    })
}

/// Writes the aggregated stations, ascending by id, behind a header line
/// naming the requested tiers.
pub fn write_report(
    engine: &StationAggregator,
    out: &mut impl Write,
    station_tier: StationTier,
    consumer_tier: ConsumerTier,
) -> std::io::Result<()> {
    writeln!(out, "{}:Capacity:{}", station_tier, consumer_tier)?;
    for record in engine.stations() {
        writeln!(out, "{}:{}:{}", record.id, record.capacity, record.consumption)?;
    }
    Ok(())
}
