//! Report types printed by `lobprobe` commands.
//!
//! These structs define the shape of the JSON output for `lobprobe reset`,
//! `lobprobe generate`, `lobprobe seed`, `lobprobe reopen` and `lobprobe growth`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Point, Source, Tag};
use crate::size::bytes_description;

/// Response from `lobprobe reset`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetResponse {
    pub root: String,
    pub existed: bool,
    pub removed: usize,
}

/// The relational chain written by the seed step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedReport {
    pub source: Source,
    pub point: Point,
    /// Tags read back for `point` after insertion.
    pub tags: Vec<Tag>,
}

/// Response from `lobprobe generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub database: String,
    pub tables: Vec<String>,
    pub seed: Option<SeedReport>,
    pub exported_to: Option<String>,
    pub exported_bytes: Option<u64>,
}

/// One catalog lookup: how many tables named `table` exist under `schema`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogProbe {
    pub schema: String,
    pub table: String,
    pub count: i64,
}

impl CatalogProbe {
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.count > 0
    }
}

/// Response from `lobprobe reopen`: the probe before and after a full pool restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReopenReport {
    pub database: String,
    /// Fixture copied into place before the first open, if any.
    pub fixture: Option<String>,
    pub first: CatalogProbe,
    pub second: CatalogProbe,
}

impl ReopenReport {
    #[must_use]
    pub fn consistent(&self) -> bool {
        self.first == self.second
    }
}

/// A database file size taken during the growth loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SizeSample {
    pub iteration: u32,
    pub bytes: u64,
    pub human: String,
}

impl SizeSample {
    #[must_use]
    pub fn new(iteration: u32, bytes: u64) -> Self {
        Self {
            iteration,
            bytes,
            human: bytes_description(bytes),
        }
    }
}

/// Response from `lobprobe growth`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthReport {
    pub database: String,
    pub iterations: u32,
    pub sample_every: u32,
    pub counter_entries: u32,
    /// Value every counter holds after the last iteration.
    pub counter_value: u64,
    /// Size of the last encoded payload.
    pub payload_bytes: usize,
    pub samples: Vec<SizeSample>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl GrowthReport {
    /// Ratio of the last sampled size to the first, if both are non-zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn growth_factor(&self) -> Option<f64> {
        let first = self.samples.first()?.bytes;
        let last = self.samples.last()?.bytes;
        (first > 0).then(|| last as f64 / first as f64)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn report(sizes: &[u64]) -> GrowthReport {
        let now = Utc::now();
        GrowthReport {
            database: "junit/databases/h2-test.db".into(),
            iterations: 20,
            sample_every: 10,
            counter_entries: 10_000,
            counter_value: 20,
            payload_bytes: 40_000,
            samples: sizes
                .iter()
                .enumerate()
                .map(|(i, b)| SizeSample::new(u32::try_from(i * 10).unwrap(), *b))
                .collect(),
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn size_sample_renders_human_size() {
        let sample = SizeSample::new(10, 500);
        assert_eq!(sample.human, "500 B");
    }

    #[test]
    fn growth_factor_compares_first_and_last() {
        assert_eq!(report(&[1000, 1500, 4000]).growth_factor(), Some(4.0));
        assert_eq!(report(&[]).growth_factor(), None);
        assert_eq!(report(&[0, 10]).growth_factor(), None);
    }

    #[test]
    fn reopen_consistency() {
        let probe = CatalogProbe {
            schema: "main".into(),
            table: "dataPoints".into(),
            count: 1,
        };
        let mut report = ReopenReport {
            database: "db".into(),
            fixture: None,
            first: probe.clone(),
            second: probe,
        };
        assert!(report.consistent());
        assert!(report.first.exists());
        report.second.count = 0;
        assert!(!report.consistent());
    }

    #[test]
    fn seed_report_serializes_chain() {
        let seed = SeedReport {
            source: Source { id: 1, value: 1 },
            point: Point {
                id: 1,
                source_id: 1,
                value: 2,
            },
            tags: vec![Tag {
                point_id: 1,
                key: "KEY".into(),
                value: "VALUE".into(),
            }],
        };
        let json = serde_json::to_value(&seed).unwrap();
        assert_eq!(json["point"]["source_id"], 1);
        assert_eq!(json["tags"][0]["key"], "KEY");
    }
}
