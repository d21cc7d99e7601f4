use serde_json::Value;
use std::collections::VecDeque;

pub const MAX_RAW_LINES: usize = 500;

/// Pretty-printed feed traffic, newest message on top, capped by line count.
#[derive(Debug, Clone)]
pub struct RawFeedPane {
    lines: VecDeque<String>,
    max_lines: usize,
    revision: u64,
}

impl Default for RawFeedPane {
    fn default() -> Self {
        Self::with_capacity(MAX_RAW_LINES)
    }
}

impl RawFeedPane {
    pub fn with_capacity(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines),
            max_lines,
            revision: 0,
        }
    }

    pub fn prepend(&mut self, msg: &Value) {
        let pretty = serde_json::to_string_pretty(msg).unwrap_or_else(|_| msg.to_string());
        for line in pretty.lines().rev() {
            self.lines.push_front(line.to_string());
        }
        self.lines.truncate(self.max_lines);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Bumped on every change; lets a renderer skip untouched frames.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn text(&self) -> String {
        self.lines.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
    }
}
