use serde::{Deserialize, Serialize};

/// Root of the seeded relational chain. Stored in `dataSources`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub id: i64,
    pub value: i64,
}
