use super::types::{format_reading, ReadingTuple, DEVICE_SLOTS};

/// Latest-value lines, one per device slot.
pub fn render_latest(readings: &ReadingTuple) -> [String; DEVICE_SLOTS] {
    let slots = readings.slots();
    std::array::from_fn(|slot| format!("Device {}: {}", slot + 1, format_reading(slots[slot])))
}

/// What the stats panel shows before the first frame arrives.
pub fn empty_latest() -> [String; DEVICE_SLOTS] {
    render_latest(&ReadingTuple::default())
}
