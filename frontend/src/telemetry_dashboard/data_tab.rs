//! Tabular reading log: newest row first, bounded at [`MAX_DATAGRID_ROWS`].

use super::types::{format_reading, ReadingTuple, DEVICE_SLOTS};
use lorawatch_shared::RingBuffer;

pub const MAX_DATAGRID_ROWS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub timestamp: String,
    pub readings: [Option<f64>; DEVICE_SLOTS],
}

impl LogRow {
    /// Fixed-arity cells: timestamp then one column per device, `-` when empty.
    pub fn cells(&self) -> Vec<String> {
        std::iter::once(self.timestamp.clone())
            .chain(self.readings.iter().map(|r| format_reading(*r)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct LogTable {
    // Oldest at the front; views reverse it.
    rows: RingBuffer<LogRow>,
}

impl Default for LogTable {
    fn default() -> Self {
        Self::with_capacity(MAX_DATAGRID_ROWS)
    }
}

impl LogTable {
    pub fn with_capacity(max_rows: usize) -> Self {
        Self {
            rows: RingBuffer::new(max_rows),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at display index (`0` is the newest).
    pub fn row(&self, index: usize) -> Option<&LogRow> {
        self.rows.iter().rev().nth(index)
    }

    /// Newest first.
    pub fn rows(&self) -> Vec<&LogRow> {
        self.rows.recent(self.rows.len())
    }
}

/// Inserts at the head. Returns the tail row if it fell off the table.
pub fn append_log_row(
    table: &mut LogTable,
    timestamp: &str,
    readings: &ReadingTuple,
) -> Option<LogRow> {
    table.rows.push(LogRow {
        timestamp: timestamp.to_string(),
        readings: readings.slots(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_latest_fifty_newest_first() {
        let mut table = LogTable::default();
        let mut dropped = Vec::new();
        for i in 0..60 {
            let ts = format!("row-{i}");
            if let Some(row) = append_log_row(&mut table, &ts, &ReadingTuple::new(vec![i as f64])) {
                dropped.push(row.timestamp);
            }
        }
        assert_eq!(table.len(), MAX_DATAGRID_ROWS);
        assert_eq!(table.row(0).unwrap().timestamp, "row-59");
        assert_eq!(table.row(49).unwrap().timestamp, "row-10");
        assert!(table.row(50).is_none());
        assert_eq!(dropped.first().map(String::as_str), Some("row-0"));
        assert_eq!(dropped.len(), 10);
    }

    #[test]
    fn missing_readings_render_placeholder() {
        let mut table = LogTable::default();
        append_log_row(&mut table, "2024-05-01 12:00:00", &ReadingTuple::new(vec![42.5]));
        assert_eq!(
            table.row(0).unwrap().cells(),
            vec!["2024-05-01 12:00:00", "42.5", "-", "-"]
        );
    }

    #[test]
    fn rows_view_matches_index_order() {
        let mut table = LogTable::default();
        for ts in ["a", "b", "c"] {
            append_log_row(&mut table, ts, &ReadingTuple::default());
        }
        let order: Vec<_> = table.rows().iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }
}
