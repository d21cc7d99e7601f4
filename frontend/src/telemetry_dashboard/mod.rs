// frontend/src/telemetry_dashboard/mod.rs
//
// Dashboard core: one DashboardState owns every view. A feed frame is
// decoded once; chart, stats and log then update together from that single
// tuple, or (on any decode error) none of them change.

pub mod chart;
pub mod connection_status_tab;
pub mod data_tab;
pub mod decode;
pub mod layout;
pub mod raw_tab;
pub mod stats_tab;
pub mod terminal;
pub mod types;

use chart::{append_chart_point, series_names, ChartSeries, ChartSurface};
use chrono::NaiveDateTime;
use connection_status_tab::{classify_network_status, NetworkStatus};
use data_tab::{append_log_row, LogRow, LogTable};
use layout::{DomSurface, Element};
use raw_tab::RawFeedPane;
use stats_tab::{empty_latest, render_latest};
use types::{DecodeError, ReadingTuple, DEVICE_SLOTS};

const CHART_LABEL_FORMAT: &str = "%H:%M:%S";
const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything one successfully decoded frame changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub readings: ReadingTuple,
    pub chart_label: String,
    pub chart_evicted: bool,
    pub latest: [String; DEVICE_SLOTS],
    pub log_row: LogRow,
    pub log_evicted: bool,
    pub active_devices: usize,
    pub network_status: NetworkStatus,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub chart: ChartSeries,
    pub log: LogTable,
    pub latest: [String; DEVICE_SLOTS],
    pub active_devices: usize,
    pub network_status: NetworkStatus,
    pub raw: RawFeedPane,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            chart: ChartSeries::default(),
            log: LogTable::default(),
            latest: empty_latest(),
            active_devices: 0,
            network_status: NetworkStatus::NoneActive,
            raw: RawFeedPane::default(),
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one raw feed frame received at `now` (local wall clock).
    ///
    /// Any parsed JSON is mirrored into the raw pane, whatever its type.
    /// Errors are logged here and returned for the caller to inspect; they
    /// never leave a view half-updated.
    pub fn handle_message(
        &mut self,
        raw: &str,
        now: NaiveDateTime,
    ) -> Result<ViewUpdate, DecodeError> {
        let result = decode::parse_feed(raw).and_then(|msg| {
            self.raw.prepend(&msg);
            decode::decode_value(&msg)
        });

        match result {
            Ok(readings) => Ok(self.apply(readings, now)),
            Err(err) => {
                err.report();
                Err(err)
            }
        }
    }

    fn apply(&mut self, readings: ReadingTuple, now: NaiveDateTime) -> ViewUpdate {
        let chart_label = now.format(CHART_LABEL_FORMAT).to_string();
        let timestamp = now.format(LOG_TIMESTAMP_FORMAT).to_string();

        let chart_evicted = append_chart_point(&mut self.chart, &chart_label, &readings);
        let log_evicted = append_log_row(&mut self.log, &timestamp, &readings).is_some();
        let log_row = LogRow {
            timestamp,
            readings: readings.slots(),
        };

        self.latest = render_latest(&readings);
        // Status follows the header, not how many readings fit the slots.
        self.active_devices = readings.declared();
        self.network_status = classify_network_status(self.active_devices);

        tracing::debug!(
            readings = ?readings.as_slice(),
            status = %self.network_status,
            "dashboard updated"
        );

        ViewUpdate {
            chart_label,
            chart_evicted,
            latest: self.latest.clone(),
            log_row,
            log_evicted,
            active_devices: self.active_devices,
            network_status: self.network_status,
            readings,
        }
    }
}

/// Owns the state and mirrors every change onto a rendering surface.
pub struct DashboardController<S> {
    state: DashboardState,
    surface: S,
    raw_rendered: u64,
}

impl<S: ChartSurface + DomSurface> DashboardController<S> {
    pub fn new(mut surface: S) -> Self {
        let state = DashboardState::new();
        surface.initialize(&series_names());
        for (element, text) in Element::latest_readings().into_iter().zip(&state.latest) {
            surface.set_text(element, text);
        }
        surface.set_text(Element::ActiveDevices, &state.active_devices.to_string());
        surface.set_text(Element::NetworkStatus, state.network_status.as_str());

        Self {
            raw_rendered: state.raw.revision(),
            state,
            surface,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn on_message(&mut self, raw: &str, now: NaiveDateTime) -> Result<(), DecodeError> {
        let result = self.state.handle_message(raw, now);

        if self.state.raw.revision() != self.raw_rendered {
            self.raw_rendered = self.state.raw.revision();
            self.surface.set_text(Element::RawData, &self.state.raw.text());
        }

        let update = result?;
        self.render(&update);
        Ok(())
    }

    fn render(&mut self, update: &ViewUpdate) {
        // Chart
        for (series_index, value) in update.readings.slots().into_iter().enumerate() {
            self.surface.push_point(series_index, &update.chart_label, value);
        }
        if update.chart_evicted {
            self.surface.evict_oldest();
        }
        self.surface.redraw();

        // Stats
        for (element, text) in Element::latest_readings().into_iter().zip(&update.latest) {
            self.surface.set_text(element, text);
        }

        // Log
        self.surface.insert_row(0, &update.log_row.cells());
        if update.log_evicted {
            self.surface.delete_last_row();
        }

        self.surface
            .set_text(Element::ActiveDevices, &update.active_devices.to_string());
        self.surface
            .set_text(Element::NetworkStatus, update.network_status.as_str());
    }
}
