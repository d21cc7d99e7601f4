// frontend/src/telemetry_dashboard/chart.rs
//
// Rolling line-chart model: one label column shared by every device series.
//  - Labels and datasets live in same-capacity ring buffers and are pushed
//    together, so they evict in lockstep.
//  - A slot without a reading gets a gap (`None`), never a skipped push.

use super::types::{ReadingTuple, DEVICE_SLOTS};
use lorawatch_shared::RingBuffer;

pub const MAX_CHART_DATA_POINTS: usize = 20;

/// Rendering collaborator for the chart (a charting library, a terminal, ...).
pub trait ChartSurface {
    fn initialize(&mut self, series_names: &[String]);
    /// `None` draws a gap for that series at `label`.
    fn push_point(&mut self, series_index: usize, label: &str, value: Option<f64>);
    /// Drop the oldest label and the oldest point of every series.
    fn evict_oldest(&mut self);
    fn redraw(&mut self);
}

pub fn series_names() -> Vec<String> {
    (1..=DEVICE_SLOTS).map(|n| format!("Device {n}")).collect()
}

#[derive(Debug, Clone)]
pub struct ChartSeries {
    labels: RingBuffer<String>,
    datasets: [RingBuffer<Option<f64>>; DEVICE_SLOTS],
}

impl Default for ChartSeries {
    fn default() -> Self {
        Self::with_capacity(MAX_CHART_DATA_POINTS)
    }
}

impl ChartSeries {
    pub fn with_capacity(max_points: usize) -> Self {
        Self {
            labels: RingBuffer::new(max_points),
            datasets: std::array::from_fn(|_| RingBuffer::new(max_points)),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Oldest first.
    pub fn labels(&self) -> Vec<&str> {
        self.labels.iter().map(String::as_str).collect()
    }

    /// Oldest first; `None` marks a gap.
    pub fn dataset(&self, slot: usize) -> Vec<Option<f64>> {
        self.datasets
            .get(slot)
            .map(|d| d.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of real (non-gap) points in a series.
    pub fn point_count(&self, slot: usize) -> usize {
        self.datasets
            .get(slot)
            .map(|d| d.iter().filter(|v| v.is_some()).count())
            .unwrap_or(0)
    }
}

/// Adds one label plus one value per slot. Returns `true` if the oldest
/// column was evicted to stay within capacity.
pub fn append_chart_point(series: &mut ChartSeries, label: &str, readings: &ReadingTuple) -> bool {
    let evicted = series.labels.push(label.to_string()).is_some();
    for (dataset, value) in series.datasets.iter_mut().zip(readings.slots()) {
        dataset.push(value);
    }
    evicted
}
