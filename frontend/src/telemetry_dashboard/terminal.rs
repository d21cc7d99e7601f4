// frontend/src/telemetry_dashboard/terminal.rs
//
// Text-mode rendering surface for the native client. Mirrors what a browser
// page would hold (chart columns, text panes, log rows) and repaints the whole
// frame on flush when something changed.

use super::chart::ChartSurface;
use super::layout::{DomSurface, Element};
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, Write};

const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const GAP: char = ' ';
/// Log rows printed per frame; the table itself keeps more.
const VISIBLE_LOG_ROWS: usize = 10;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct TerminalSurface<W: Write> {
    out: W,
    clear_screen: bool,
    series: Vec<(String, VecDeque<Option<f64>>)>,
    labels: VecDeque<String>,
    texts: BTreeMap<Element, String>,
    rows: VecDeque<Vec<String>>,
    dirty: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: true,
            series: Vec::new(),
            labels: VecDeque::new(),
            texts: BTreeMap::new(),
            rows: VecDeque::new(),
            dirty: true,
        }
    }

    /// Append frames instead of repainting (useful when stdout is not a tty).
    pub fn without_clear(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Paints the current frame if anything changed since the last flush.
    pub fn flush(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let frame = self.render_frame();
        if self.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.dirty = false;
        Ok(())
    }

    fn text(&self, element: Element) -> &str {
        self.texts.get(&element).map(String::as_str).unwrap_or("")
    }

    pub fn render_frame(&self) -> String {
        let mut frame = String::new();

        frame.push_str(&format!("Network: {}\n", self.text(Element::NetworkStatus)));
        frame.push_str(&format!("Active devices: {}\n\n", self.text(Element::ActiveDevices)));

        for element in Element::latest_readings() {
            frame.push_str(self.text(element));
            frame.push('\n');
        }
        frame.push('\n');

        let span = match (self.labels.front(), self.labels.back()) {
            (Some(first), Some(last)) => format!("{first} .. {last}"),
            _ => "no data yet".to_string(),
        };
        frame.push_str(&format!("Chart ({span})\n"));
        for (name, points) in &self.series {
            frame.push_str(&format!("  {name:<10} {}\n", sparkline(points)));
        }
        frame.push('\n');

        frame.push_str("Time                 D1        D2        D3\n");
        for row in self.rows.iter().take(VISIBLE_LOG_ROWS) {
            let mut cells = row.iter();
            let ts = cells.next().map(String::as_str).unwrap_or("");
            frame.push_str(&format!("{ts:<20}"));
            for cell in cells {
                frame.push_str(&format!(" {cell:<9}"));
            }
            frame.push('\n');
        }
        frame
    }
}

/// One bar per point scaled between the series min and max; gaps stay blank.
fn sparkline(points: &VecDeque<Option<f64>>) -> String {
    let values = points.iter().flatten().copied();
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = hi - lo;

    points
        .iter()
        .map(|p| match p {
            None => GAP,
            Some(_) if !span.is_finite() || span.abs() < 1e-9 => SPARK_BARS[SPARK_BARS.len() / 2],
            Some(v) => {
                let idx = ((v - lo) / span * (SPARK_BARS.len() - 1) as f64).round() as usize;
                SPARK_BARS[idx.min(SPARK_BARS.len() - 1)]
            }
        })
        .collect()
}

impl<W: Write> ChartSurface for TerminalSurface<W> {
    fn initialize(&mut self, series_names: &[String]) {
        self.series = series_names
            .iter()
            .map(|name| (name.clone(), VecDeque::new()))
            .collect();
        self.labels.clear();
        self.dirty = true;
    }

    fn push_point(&mut self, series_index: usize, label: &str, value: Option<f64>) {
        // Series 0 opens each new label column; the others fill it in.
        if series_index == 0 {
            self.labels.push_back(label.to_string());
        }
        if let Some((_, points)) = self.series.get_mut(series_index) {
            points.push_back(value);
        }
    }

    fn evict_oldest(&mut self) {
        self.labels.pop_front();
        for (_, points) in &mut self.series {
            points.pop_front();
        }
    }

    fn redraw(&mut self) {
        self.dirty = true;
    }
}

impl<W: Write> DomSurface for TerminalSurface<W> {
    fn set_text(&mut self, element: Element, text: &str) {
        self.texts.insert(element, text.to_string());
        self.dirty = true;
    }

    fn insert_row(&mut self, index: usize, cells: &[String]) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, cells.to_vec());
        self.dirty = true;
    }

    fn delete_last_row(&mut self) {
        self.rows.pop_back();
        self.dirty = true;
    }
}
