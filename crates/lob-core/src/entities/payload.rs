use serde::{Deserialize, Serialize};

/// The single row whose blob the growth monitor overwrites. Stored in `payload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadRow {
    pub id: i64,
    pub data: Option<Vec<u8>>,
}

impl PayloadRow {
    /// Length of the stored blob, `0` for NULL.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}
