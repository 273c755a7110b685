//! Human-readable rendering of the reports.

use std::fmt::Write as _;

use lob_core::entities::Tag;
use lob_core::responses::{
    CatalogProbe, GenerateResponse, GrowthReport, ReopenReport, ResetResponse, SeedReport,
    SizeSample,
};

use super::table::render_table;

pub trait TextReport {
    fn to_text(&self) -> String;
}

impl TextReport for ResetResponse {
    fn to_text(&self) -> String {
        if self.existed {
            format!("removed {} ({} entries)", self.root, self.removed)
        } else {
            format!("{} did not exist", self.root)
        }
    }
}

fn tags_table(tags: &[Tag]) -> String {
    let rows: Vec<Vec<String>> = tags
        .iter()
        .map(|t| vec![t.point_id.to_string(), t.key.clone(), t.value.clone()])
        .collect();
    render_table(&["point", "key", "value"], &rows)
}

impl TextReport for SeedReport {
    fn to_text(&self) -> String {
        format!(
            "source {} -> point {}\n{}",
            self.source.id,
            self.point.id,
            tags_table(&self.tags)
        )
    }
}

impl TextReport for GenerateResponse {
    fn to_text(&self) -> String {
        let mut out = format!("database: {}\ntables:   {}", self.database, self.tables.join(", "));
        if let Some(seed) = &self.seed {
            let _ = write!(out, "\n{}", seed.to_text());
        }
        if let (Some(path), Some(bytes)) = (&self.exported_to, self.exported_bytes) {
            let _ = write!(out, "\nexported: {path} ({bytes} bytes)");
        }
        out
    }
}

fn probe_line(label: &str, probe: &CatalogProbe) -> String {
    format!(
        "{label}: {}.{} -> {} ({})",
        probe.schema,
        probe.table,
        probe.exists(),
        probe.count
    )
}

impl TextReport for ReopenReport {
    fn to_text(&self) -> String {
        let mut out = format!("database: {}", self.database);
        if let Some(fixture) = &self.fixture {
            let _ = write!(out, "\nfixture:  {fixture}");
        }
        let _ = write!(
            out,
            "\n{}\n{}",
            probe_line("first open ", &self.first),
            probe_line("second open", &self.second)
        );
        out
    }
}

/// One streamed size sample, printed while the growth loop runs.
#[must_use]
pub fn sample_line(sample: &SizeSample) -> String {
    format!("{:>6}  {:>10}  {}", sample.iteration, sample.bytes, sample.human)
}

/// Summary only: the samples were already streamed with [`sample_line`].
impl TextReport for GrowthReport {
    fn to_text(&self) -> String {
        let mut out = format!(
            "database: {}\niterations: {} (every {}), samples: {}\ncounters: {} at {}, payload: {} bytes",
            self.database,
            self.iterations,
            self.sample_every,
            self.samples.len(),
            self.counter_entries,
            self.counter_value,
            self.payload_bytes,
        );
        if let Some(factor) = self.growth_factor() {
            let _ = write!(out, "\ngrowth: x{factor:.2}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use lob_core::entities::{Point, Source};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn seed_report_lists_tags() {
        let report = SeedReport {
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
        let text = report.to_text();
        assert!(text.starts_with("source 1 -> point 1"));
        assert!(text.lines().last().is_some_and(|l| l.contains("KEY") && l.contains("VALUE")));
    }

    #[test]
    fn reopen_report_shows_both_probes() {
        let probe = CatalogProbe {
            schema: "PUBLIC".into(),
            table: "DATAPOINTS".into(),
            count: 0,
        };
        let report = ReopenReport {
            database: "junit/databases/h2-test.db".into(),
            fixture: None,
            first: probe.clone(),
            second: probe,
        };
        let lines: Vec<String> = report.to_text().lines().map(str::to_string).collect();
        assert_eq!(lines[1], "first open : PUBLIC.DATAPOINTS -> false (0)");
        assert_eq!(lines[2], "second open: PUBLIC.DATAPOINTS -> false (0)");
    }

    #[test]
    fn growth_summary_leaves_samples_to_the_stream() {
        let now = Utc::now();
        let samples = vec![SizeSample::new(0, 40_960), SizeSample::new(10, 81_920)];
        let report = GrowthReport {
            database: "db".into(),
            iterations: 20,
            sample_every: 10,
            counter_entries: 10_000,
            counter_value: 20,
            payload_bytes: 30_000,
            samples: samples.clone(),
            started_at: now,
            finished_at: now,
        };

        let summary = report.to_text();
        assert!(!summary.contains("KB"));
        assert!(summary.contains("samples: 2"));
        assert!(summary.ends_with("growth: x2.00"));
        assert_eq!(sample_line(&samples[0]), "     0       40960  39 KB");
        assert_eq!(sample_line(&samples[1]), "    10       81920  79 KB");
    }
}
