//! In-memory view of the relay registry state.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::models::{RelayPayload, RelayRow};

/// Read categories served by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Verified,
    Claimable,
    RegistrationCredits,
    Serials,
    Families,
    Nicknames,
}

/// Projection of the latest snapshot for display. Never persisted.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub verified_relays: Vec<RelayRow>,
    pub claimable_relays: Vec<RelayRow>,
    pub nicknames: HashMap<String, String>,
    pub registration_credits: BTreeSet<String>,
    pub families: HashMap<String, Vec<String>>,
    pub serials: Vec<String>,
}

impl ViewState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn clear_category(&mut self, category: Category) {
        match category {
            Category::Verified => self.verified_relays.clear(),
            Category::Claimable => self.claimable_relays.clear(),
            Category::RegistrationCredits => self.registration_credits.clear(),
            Category::Serials => self.serials.clear(),
            Category::Families => self.families.clear(),
            Category::Nicknames => self.nicknames.clear(),
        }
    }

    /// Refresh one category from a cached payload.
    pub fn populate(&mut self, category: Category, data: &RelayPayload) {
        match category {
            Category::Verified => self.verified_relays = RelayRow::project(&data.verified),
            Category::Claimable => self.claimable_relays = RelayRow::project(&data.claimable),
            Category::RegistrationCredits => {
                self.registration_credits = data.registration_credits.clone()
            }
            Category::Serials => self.serials = data.serials(),
            Category::Families => self.families = data.families.clone(),
            Category::Nicknames => self.nicknames = data.nicknames.clone(),
        }
    }

    /// Replace every collection from a freshly fetched payload in one step.
    pub fn apply_payload(&mut self, data: &RelayPayload) {
        *self = ViewState {
            verified_relays: RelayRow::project(&data.verified),
            claimable_relays: RelayRow::project(&data.claimable),
            nicknames: data.nicknames.clone(),
            registration_credits: data.registration_credits.clone(),
            families: data.families.clone(),
            serials: data.serials(),
        };
    }

    /// Verified relays followed by claimable relays.
    pub fn all_relays(&self) -> Vec<RelayRow> {
        self.verified_relays
            .iter()
            .chain(self.claimable_relays.iter())
            .cloned()
            .collect()
    }

    pub fn is_hardware_relay(&self, fingerprint: &str) -> bool {
        self.serials.iter().any(|s| s == fingerprint)
    }
}

/// A fingerprint with no family entry is unconstrained. Otherwise every
/// member must appear among the verified relays.
pub fn family_is_verified(
    families: &HashMap<String, Vec<String>>,
    verified: &[RelayRow],
    fingerprint: &str,
) -> bool {
    let Some(members) = families.get(fingerprint) else {
        return true;
    };
    let verified: HashSet<&str> = verified.iter().map(|r| r.fingerprint.as_str()).collect();
    members.iter().all(|m| verified.contains(m.as_str()))
}

// ============================================================================
// Tests
// ============================================================================
