//! Rate snapshot: the full set of upstream-quoted currency values fetched
//! at one point in time, cached and replaced as a single unit.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical form of a currency code as stored in a normalized snapshot.
///
/// User-supplied codes are canonicalized the same way, so base and filter
/// resolution is a direct keyed lookup rather than a scan.
pub fn canonical_key(code: &str) -> String {
    code.to_lowercase()
}

/// One upstream-quoted rate entry. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RateEntry {
    /// Human-readable currency name
    #[schema(example = "Bitcoin")]
    pub name: String,
    /// Display unit for the currency
    #[schema(example = "BTC")]
    pub unit: String,
    /// Unit value in the upstream-defined common base unit
    #[schema(value_type = String, example = "20000")]
    pub value: Decimal,
    /// Upstream classification, e.g. "crypto" or "fiat"
    #[serde(rename = "type")]
    pub kind: String,
}

impl RateEntry {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        value: Decimal,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            value,
            kind: kind.into(),
        }
    }
}

/// Mapping from currency code to its rate entry.
///
/// Keys are canonical lowercase after [`RateSnapshot::normalized`]; the
/// snapshot is written to the cache wholesale and never merged or patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub rates: HashMap<String, RateEntry>,
}

impl RateSnapshot {
    pub fn new(rates: HashMap<String, RateEntry>) -> Self {
        Self { rates }
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Lowercases every currency key. Keys that collide after
    /// canonicalization are last-write-wins, matching upstream behavior.
    pub fn normalized(self) -> Self {
        let rates = self
            .rates
            .into_iter()
            .map(|(key, entry)| (canonical_key(&key), entry))
            .collect();
        Self { rates }
    }

    /// Resolves a caller-supplied currency code case-insensitively against
    /// a normalized snapshot. Returns the canonical key and its entry.
    pub fn resolve(&self, code: &str) -> Option<(&str, &RateEntry)> {
        let key = canonical_key(code);
        self.rates
            .get_key_value(&key)
            .map(|(k, entry)| (k.as_str(), entry))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(&canonical_key(code))
    }
}
