//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of an invoice.
///
/// Assigned by the storage layer on insert: sequential, starting at 1, never
/// reused after deletion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(u64);

impl InvoiceId {
    /// The first identifier a fresh store hands out.
    pub const FIRST: Self = Self(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The identifier that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for InvoiceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<InvoiceId> for u64 {
    fn from(value: InvoiceId) -> Self {
        value.0
    }
}

impl FromStr for InvoiceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("InvoiceId: {e}")))?;
        if value == 0 {
            return Err(DomainError::invalid_id("InvoiceId: must be positive"));
        }
        Ok(Self(value))
    }
}
