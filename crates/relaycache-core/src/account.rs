//! Account address resolution.
//!
//! The wallet layer lives outside this crate; the coordinator only asks an
//! `AccountResolver` for the currently bound address. An address that does
//! not look like `0x` followed by 40 hex digits is treated as unbound.

use std::sync::RwLock;

/// Source of the currently bound account address.
pub trait AccountResolver: Send + Sync {
    fn address(&self) -> Option<String>;
}

/// Validate that a string looks like an EVM address: `0x` + 40 hex digits.
pub fn is_valid_address(s: &str) -> bool {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Account bound from configuration, switchable at runtime.
#[derive(Debug, Default)]
pub struct StaticAccount {
    address: RwLock<Option<String>>,
}

impl StaticAccount {
    pub fn new(address: Option<String>) -> Self {
        Self {
            address: RwLock::new(address),
        }
    }

    /// Bind a new address, or unbind with `None`.
    pub fn set(&self, address: Option<String>) {
        match self.address.write() {
            Ok(mut guard) => *guard = address,
            Err(poisoned) => *poisoned.into_inner() = address,
        }
    }
}

impl AccountResolver for StaticAccount {
    fn address(&self) -> Option<String> {
        match self.address.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
