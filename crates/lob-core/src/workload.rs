//! The Counter Map workload written into the payload blob.
//!
//! A fixed set of integer keys, each carrying a counter that every growth
//! iteration bumps by one. The map is wrapped in a runtime-data envelope and
//! encoded as named MessagePack, so the blob is self-describing. Counters are
//! written as fixed eight-byte values: the blob size depends on the number of
//! entries, never on how far the counters have advanced.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::CoreError;

/// Number of counters in the reference workload.
pub const DEFAULT_ENTRIES: u32 = 10_000;

/// A counter serialized as eight big-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FixedCounter(u64);

impl Serialize for FixedCounter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0.to_be_bytes())
    }
}

impl<'de> Deserialize<'de> for FixedCounter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_bytes(FixedCounterVisitor)
    }
}

struct FixedCounterVisitor;

impl Visitor<'_> for FixedCounterVisitor {
    type Value = FixedCounter;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("eight big-endian counter bytes")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<FixedCounter, E> {
        let bytes: [u8; 8] = v
            .try_into()
            .map_err(|_| E::invalid_length(v.len(), &self))?;
        Ok(FixedCounter(u64::from_be_bytes(bytes)))
    }
}

#[derive(Serialize, Deserialize)]
struct RuntimeData {
    #[serde(rename = "RT_DATA")]
    rt_data: BTreeMap<u32, FixedCounter>,
}

/// In-memory map from key `0..entries` to a monotonically increasing counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterMap {
    counters: BTreeMap<u32, u64>,
}

impl CounterMap {
    /// Create `entries` counters, all starting at zero.
    #[must_use]
    pub fn new(entries: u32) -> Self {
        Self {
            counters: (0..entries).map(|key| (key, 0)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: u32) -> Option<u64> {
        self.counters.get(&key).copied()
    }

    /// Add one to every counter.
    pub fn increment_all(&mut self) {
        for value in self.counters.values_mut() {
            *value += 1;
        }
    }

    /// The shared counter value, or `None` if the map is empty or counters diverge.
    #[must_use]
    pub fn uniform_value(&self) -> Option<u64> {
        let mut values = self.counters.values();
        let first = *values.next()?;
        values.all(|v| *v == first).then_some(first)
    }

    /// Encode the map as the payload blob.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Codec` if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, CoreError> {
        let rt_data = self
            .counters
            .iter()
            .map(|(key, value)| (*key, FixedCounter(*value)))
            .collect();
        rmp_serde::to_vec_named(&RuntimeData { rt_data })
        .map_err(|e| CoreError::Codec(format!("encode counter map: {e}")))
    }

    /// Decode a payload blob previously produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Codec` if the bytes are not a runtime-data envelope.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let data: RuntimeData = rmp_serde::from_slice(bytes)
            .map_err(|e| CoreError::Codec(format!("decode counter map: {e}")))?;
        Ok(Self {
            counters: data
                .rt_data
                .into_iter()
                .map(|(key, FixedCounter(value))| (key, value))
                .collect(),
        })
    }
}

impl Default for CounterMap {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRIES)
    }
}
