//! Relay records as stored in the registry and as projected into the view.

use serde::{Deserialize, Serialize};

/// A relay as reported by the registry.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRecord {
    pub fingerprint: String,
    pub status: String,
    pub active: bool,
    #[serde(rename = "class", default)]
    pub relay_class: String,
}

impl RelayRecord {
    pub fn new(fingerprint: &str, status: &str, active: bool, relay_class: &str) -> Self {
        Self {
            fingerprint: fingerprint.to_string(),
            status: status.to_string(),
            active,
            relay_class: relay_class.to_string(),
        }
    }
}

/// A relay row for display.
///
/// Consensus weight, observed bandwidth, the working flag and the nickname
/// are filled in elsewhere; a row built from a registry record starts them
/// at zero/false/empty.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRow {
    pub fingerprint: String,
    pub status: String,
    pub consensus_weight: u64,
    pub observed_bandwidth: u64,
    pub active: bool,
    #[serde(rename = "class")]
    pub relay_class: String,
    pub is_working: bool,
    pub nickname: String,
}

impl From<&RelayRecord> for RelayRow {
    fn from(record: &RelayRecord) -> Self {
        Self {
            fingerprint: record.fingerprint.clone(),
            status: record.status.clone(),
            consensus_weight: 0,
            observed_bandwidth: 0,
            active: record.active,
            relay_class: record.relay_class.clone(),
            is_working: false,
            nickname: String::new(),
        }
    }
}

impl RelayRow {
    /// Project a list of registry records into view rows, keeping order.
    pub fn project(records: &[RelayRecord]) -> Vec<RelayRow> {
        records.iter().map(RelayRow::from).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
