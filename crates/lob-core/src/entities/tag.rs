use serde::{Deserialize, Serialize};

/// A key/value tag on a [`Point`](super::Point). Stored in `dataPointTags`.
///
/// `(point_id, key)` is unique; tags are removed when their point is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub point_id: i64,
    pub key: String,
    pub value: String,
}
