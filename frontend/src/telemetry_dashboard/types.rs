use thiserror::Error;

/// Device slots shown on the dashboard (chart series, stats lines, log columns).
pub const DEVICE_SLOTS: usize = 3;

/// Leading elements of `transport.data` before the readings: `[_, reading_count, ...]`.
pub const TRANSPORT_HEADER_LEN: usize = 2;

/// Shortest `transport.data` worth decoding: the header plus one reading.
pub const MIN_TRANSPORT_LEN: usize = TRANSPORT_HEADER_LEN + 1;

/// Shown wherever a device slot has no reading this cycle.
pub const MISSING_READING: &str = "-";

/// Up to [`DEVICE_SLOTS`] readings, slot order preserved, plus the device
/// count the frame header declared (which may disagree with what arrived).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingTuple {
    readings: Vec<f64>,
    declared: usize,
}

impl ReadingTuple {
    /// Keeps at most [`DEVICE_SLOTS`] readings; extras are dropped.
    /// The declared count is the number of readings kept.
    pub fn new(readings: Vec<f64>) -> Self {
        let mut tuple = Self::with_declared(readings, 0);
        tuple.declared = tuple.len();
        tuple
    }

    pub fn with_declared(mut readings: Vec<f64>, declared: usize) -> Self {
        readings.truncate(DEVICE_SLOTS);
        Self { readings, declared }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Active devices according to the frame header.
    pub fn declared(&self) -> usize {
        self.declared
    }

    pub fn get(&self, slot: usize) -> Option<f64> {
        self.readings.get(slot).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.readings
    }

    /// One entry per device slot; `None` where the tuple is short.
    pub fn slots(&self) -> [Option<f64>; DEVICE_SLOTS] {
        std::array::from_fn(|slot| self.get(slot))
    }
}

pub fn format_reading(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => MISSING_READING.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("unexpected payload shape: {0}")]
    UnexpectedPayloadShape(String),

    #[error("unknown message type {0:?}")]
    UnknownMessageType(Option<String>),
}

impl DecodeError {
    /// Console diagnostic for a dropped message. Unknown types are expected
    /// traffic (welcome frames and the like) and stay at trace level.
    pub fn report(&self) {
        match self {
            DecodeError::MalformedJson(_) => tracing::error!(error=%self, "dropping feed message"),
            DecodeError::UnexpectedPayloadShape(_) => {
                tracing::warn!(error=%self, "dropping feed message")
            }
            DecodeError::UnknownMessageType(_) => {
                tracing::trace!(error=%self, "ignoring feed message")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_is_capped_at_three_slots() {
        let t = ReadingTuple::new(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.slots(), [Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(t.declared(), 3);
    }

    #[test]
    fn declared_count_survives_the_slot_cap() {
        let t = ReadingTuple::with_declared(vec![1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert_eq!(t.len(), 3);
        assert_eq!(t.declared(), 5);
    }

    #[test]
    fn short_tuple_pads_slots_with_none() {
        let t = ReadingTuple::new(vec![42.5]);
        assert_eq!(t.slots(), [Some(42.5), None, None]);
    }

    #[test]
    fn readings_format_like_the_dashboard() {
        assert_eq!(format_reading(Some(42.5)), "42.5");
        assert_eq!(format_reading(Some(17.0)), "17");
        assert_eq!(format_reading(None), "-");
    }
}
