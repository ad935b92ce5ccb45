use log::{info, trace};

use crate::cli::StationTier;
use crate::csv_handler::RowRaw;
use crate::station_index::{InOrderIter, StationIndex, StationRecord};

/// Selects the station id a row contributes to at the requested tier, or
/// `None` when the matching field is missing. The consumer tier plays no
/// role here, it only labels the report.
pub fn target_station(row: &RowRaw, tier: StationTier) -> Option<u32> {
    match tier {
        StationTier::Hvb => row.hvb,
        StationTier::Hva => row.hva,
        StationTier::Lv => row.lv,
    }
}

/// Builds the per-station totals for one run: owns the balanced index while
/// rows are loaded and hands out an ordered view for reporting.
#[derive(Debug, Default)]
pub struct StationAggregator {
    index: StationIndex,
}

impl StationAggregator {
    /// Folds every row into the index. A station record is created on the
    /// first row carrying a positive capacity for its id (later capacities
    /// for the same id are ignored); a positive load is added to the
    /// record's consumption, or dropped when no record exists for the id.
    pub fn load_rows(&mut self, tier: StationTier, rows: impl Iterator<Item = RowRaw>) {
        let mut rows_read: u64 = 0;
        for row in rows {
            rows_read += 1;
            let Some(id) = target_station(&row, tier) else {
                trace!("Row {} carries no {} station id. Skipping.", rows_read, tier);
                continue;
            };

            if let Some(capacity) = row.capacity.filter(|&capacity| capacity > 0) {
                self.index.insert_if_absent(id, capacity);
            }
            if let Some(load) = row.load.filter(|&load| load > 0) {
                if !self.index.accumulate(id, load) {
                    trace!("Dropping load {} for station {}: no record for that id.", load, id);
                }
            }
        }
        info!("Aggregated {} stations from {} rows.", self.index.len(), rows_read);
    }

    /// Records in ascending station-id order.
    pub fn stations(&self) -> InOrderIter<'_> {
        self.index.iter()
    }

    pub fn station_count(&self) -> usize {
        self.index.len()
    }

    pub fn station(&self, id: u32) -> Option<&StationRecord> {
        self.index.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(hvb: Option<u32>, capacity: Option<u64>, load: Option<u64>) -> RowRaw {
        RowRaw { hvb, capacity, load, ..Default::default() }
    }

    #[test]
    fn test_duplicate_rows_aggregate_into_one_record() {
        let mut engine = StationAggregator::default();
        engine.load_rows(
            StationTier::Hvb,
            vec![
                row(Some(10), Some(1000), None),
                row(Some(10), Some(1000), Some(30)),
                row(Some(10), Some(1000), Some(20)),
            ]
            .into_iter(),
        );

        assert_eq!(engine.station_count(), 1);
        let record = engine.station(10).unwrap();
        assert_eq!(record.capacity, 1000);
        assert_eq!(record.consumption, 50);
    }

    #[test]
    fn test_first_seen_capacity_wins() {
        let mut engine = StationAggregator::default();
        engine.load_rows(
            StationTier::Lv,
            vec![row_lv(5, Some(100), None), row_lv(5, Some(200), None)].into_iter(),
        );

        assert_eq!(engine.station(5).unwrap().capacity, 100);
    }

    #[test]
    fn test_load_without_record_is_dropped() {
        let mut engine = StationAggregator::default();
        engine.load_rows(
            StationTier::Hvb,
            vec![row(Some(42), None, Some(50)), row(Some(43), Some(0), Some(50))].into_iter(),
        );

        assert_eq!(engine.station_count(), 0);
        assert_eq!(engine.station(42), None);
        assert_eq!(engine.station(43), None);
    }

    #[test]
    fn test_consumption_is_order_independent() {
        let loads = [5u64, 10, 15, 20];
        let orders: [[usize; 4]; 3] = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1]];

        let totals: Vec<u64> = orders
            .iter()
            .map(|order| {
                let mut engine = StationAggregator::default();
                let rows = std::iter::once(row(Some(1), Some(100), None))
                    .chain(order.iter().map(|&i| row(Some(1), None, Some(loads[i]))));
                engine.load_rows(StationTier::Hvb, rows);
                engine.station(1).unwrap().consumption
            })
            .collect();

        assert!(totals.iter().all(|&total| total == 50));
    }

    #[test]
    fn test_rows_without_the_requested_tier_are_ignored() {
        let mut engine = StationAggregator::default();
        // An hva row contributes nothing at the hvb tier.
        engine.load_rows(
            StationTier::Hvb,
            vec![RowRaw { hva: Some(4), capacity: Some(500), ..Default::default() }].into_iter(),
        );

        assert_eq!(engine.station_count(), 0);
    }

    #[test]
    fn test_target_station_reads_the_requested_field() {
        let row = RowRaw {
            hvb: Some(1),
            hva: Some(2),
            lv: Some(3),
            ..Default::default()
        };
        assert_eq!(target_station(&row, StationTier::Hvb), Some(1));
        assert_eq!(target_station(&row, StationTier::Hva), Some(2));
        assert_eq!(target_station(&row, StationTier::Lv), Some(3));
        assert_eq!(target_station(&RowRaw::default(), StationTier::Lv), None);
    }

    fn row_lv(lv: u32, capacity: Option<u64>, load: Option<u64>) -> RowRaw {
        RowRaw { lv: Some(lv), capacity, load, ..Default::default() }
    }
}
