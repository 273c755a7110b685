use serde::{Deserialize, Serialize};

/// A point belonging to a [`Source`](super::Source). Stored in `dataPoints`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Point {
    pub id: i64,
    pub source_id: i64,
    pub value: i64,
}
