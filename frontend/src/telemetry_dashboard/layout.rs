//! Named page elements and the DOM-side rendering collaborator.

use super::types::DEVICE_SLOTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    RawData,
    /// Zero-based device slot.
    LatestReading(usize),
    ActiveDevices,
    NetworkStatus,
}

impl Element {
    pub fn id(&self) -> String {
        match self {
            Element::RawData => "rawData".to_string(),
            Element::LatestReading(slot) => format!("latestReading{}", slot + 1),
            Element::ActiveDevices => "activeDevices".to_string(),
            Element::NetworkStatus => "networkStatus".to_string(),
        }
    }

    pub fn latest_readings() -> [Element; DEVICE_SLOTS] {
        std::array::from_fn(Element::LatestReading)
    }
}

/// Text panes plus the reading log table.
pub trait DomSurface {
    fn set_text(&mut self, element: Element, text: &str);
    /// Insert a log row at display `index` (0 = top).
    fn insert_row(&mut self, index: usize, cells: &[String]);
    fn delete_last_row(&mut self);
}
