// frontend/src/telemetry_dashboard/connection_status_tab.rs
//
// The devices relay in a chain (1 -> 2 -> 3), so the number of readings that
// made it into a frame tells where the chain broke.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkStatus {
    AllOk,
    Gap2To3,
    Gap1To2,
    NoneActive,
}

impl NetworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkStatus::AllOk => "✅ All devices working",
            NetworkStatus::Gap2To3 => "⚠️ Fault between Device 2 and 3",
            NetworkStatus::Gap1To2 => "⚠️ Fault between Device 1 and 2",
            NetworkStatus::NoneActive => "❌ No active devices",
        }
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_network_status(active_count: usize) -> NetworkStatus {
    match active_count {
        3 => NetworkStatus::AllOk,
        2 => NetworkStatus::Gap2To3,
        1 => NetworkStatus::Gap1To2,
        _ => NetworkStatus::NoneActive,
    }
}
