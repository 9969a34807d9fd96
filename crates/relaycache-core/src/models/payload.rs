//! The registry payload held inside a snapshot.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::RelayRecord;

/// Everything the registry reports for one account.
///
/// Missing fields deserialize to empty collections, so a payload written by
/// an older client still loads.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelayPayload {
    pub verified: Vec<RelayRecord>,
    pub claimable: Vec<RelayRecord>,
    pub nicknames: HashMap<String, String>,
    pub registration_credits: BTreeSet<String>,
    pub families: HashMap<String, Vec<String>>,
    pub verified_hardware: HashMap<String, u64>,
}

/// A single named payload field together with its replacement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotField {
    Verified(Vec<RelayRecord>),
    Claimable(Vec<RelayRecord>),
    Nicknames(HashMap<String, String>),
    RegistrationCredits(BTreeSet<String>),
    Families(HashMap<String, Vec<String>>),
    VerifiedHardware(HashMap<String, u64>),
}

impl SnapshotField {
    /// Wire name of the field, as it appears in the stored JSON.
    pub fn name(&self) -> &'static str {
        match self {
            SnapshotField::Verified(_) => "verified",
            SnapshotField::Claimable(_) => "claimable",
            SnapshotField::Nicknames(_) => "nicknames",
            SnapshotField::RegistrationCredits(_) => "registrationCredits",
            SnapshotField::Families(_) => "families",
            SnapshotField::VerifiedHardware(_) => "verifiedHardware",
        }
    }
}

impl RelayPayload {
    /// Overwrite exactly one field, leaving the others untouched.
    pub fn apply(&mut self, field: SnapshotField) {
        match field {
            SnapshotField::Verified(v) => self.verified = v,
            SnapshotField::Claimable(v) => self.claimable = v,
            SnapshotField::Nicknames(v) => self.nicknames = v,
            SnapshotField::RegistrationCredits(v) => self.registration_credits = v,
            SnapshotField::Families(v) => self.families = v,
            SnapshotField::VerifiedHardware(v) => self.verified_hardware = v,
        }
    }

    /// Hardware serials, sorted.
    pub fn serials(&self) -> Vec<String> {
        let mut serials: Vec<String> = self.verified_hardware.keys().cloned().collect();
        serials.sort();
        serials
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RelayPayload {
        RelayPayload {
            verified: vec![RelayRecord::new("A", "verified", true, "relay")],
            claimable: vec![RelayRecord::new("B", "claimable", true, "relay")],
            nicknames: HashMap::from([("A".to_string(), "alpha".to_string())]),
            registration_credits: BTreeSet::from(["B".to_string()]),
            families: HashMap::from([("A".to_string(), vec!["A".to_string(), "C".to_string()])]),
            verified_hardware: HashMap::from([("A".to_string(), 2)]),
        }
    }

    #[test]
    fn test_apply_replaces_only_named_field() {
        let mut payload = sample();
        let before = payload.clone();

        payload.apply(SnapshotField::Claimable(vec![]));

        assert!(payload.claimable.is_empty());
        assert_eq!(payload.verified, before.verified);
        assert_eq!(payload.nicknames, before.nicknames);
        assert_eq!(payload.registration_credits, before.registration_credits);
        assert_eq!(payload.families, before.families);
        assert_eq!(payload.verified_hardware, before.verified_hardware);
    }

    #[test]
    fn test_missing_fields_default_empty() {
        let payload: RelayPayload =
            serde_json::from_str(r#"{"verified":[{"fingerprint":"R1","status":"ok","active":true,"class":"relay"}]}"#)
                .unwrap();
        assert_eq!(payload.verified.len(), 1);
        assert!(payload.claimable.is_empty());
        assert!(payload.families.is_empty());
        assert!(payload.verified_hardware.is_empty());
    }

    #[test]
    fn test_camel_case_wire_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("registrationCredits").is_some());
        assert!(value.get("verifiedHardware").is_some());
        assert_eq!(value["registrationCredits"][0], "B");
    }

    #[test]
    fn test_field_names_match_wire() {
        assert_eq!(SnapshotField::RegistrationCredits(BTreeSet::new()).name(), "registrationCredits");
        assert_eq!(SnapshotField::VerifiedHardware(HashMap::new()).name(), "verifiedHardware");
    }

    #[test]
    fn test_serials_sorted() {
        let mut payload = RelayPayload::default();
        payload.verified_hardware.insert("Z".to_string(), 1);
        payload.verified_hardware.insert("M".to_string(), 3);
        assert_eq!(payload.serials(), vec!["M".to_string(), "Z".to_string()]);
    }
}
