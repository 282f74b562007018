//! Export — JSON and CSV rendering of draw results, plus curve reports.
//!
//! - **JSON**: the drawn entries as an array, payload untouched, indented with
//!   four spaces
//! - **CSV**: `position,label,tickets` for spreadsheets
//! - **Artifacts**: a timestamped directory with `manifest.json`,
//!   `entries.json`, and `entries.csv`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use trendify_core::{
    generate_trend_curve, localize_segments, Entry, Segment, SegmentError, ShuffleStrategy,
    WeightedRecord,
};

use crate::draw::{DrawResult, SCHEMA_VERSION};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{other}'. Valid: json, csv")),
        }
    }
}

// ─── Entry rendering ────────────────────────────────────────────────

/// Render entries as a four-space indented JSON array.
pub fn export_entries_json(entries: &[Entry]) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    entries
        .serialize(&mut ser)
        .context("failed to serialize entries to JSON")?;
    String::from_utf8(buf).context("JSON output is not valid UTF-8")
}

/// Render entries as CSV with a 1-based position column.
pub fn export_entries_csv(entries: &[Entry], label_field: &str) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["position", label_field, "tickets"])?;
    for (i, entry) in entries.iter().enumerate() {
        wtr.write_record([
            &(i + 1).to_string(),
            &entry.label(label_field),
            &entry.tickets().to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn render_entries(entries: &[Entry], format: OutputFormat, label_field: &str) -> Result<String> {
    match format {
        OutputFormat::Json => export_entries_json(entries),
        OutputFormat::Csv => export_entries_csv(entries, label_field),
    }
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Draw metadata without the entries themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawManifest {
    pub schema_version: u32,
    pub seed: u64,
    pub strategy: ShuffleStrategy,
    pub drawn_at: chrono::DateTime<chrono::Utc>,
    pub input_count: usize,
    pub output_count: usize,
    pub total_tickets: f64,
}

impl From<&DrawResult> for DrawManifest {
    fn from(result: &DrawResult) -> Self {
        Self {
            schema_version: result.schema_version,
            seed: result.seed,
            strategy: result.strategy,
            drawn_at: result.drawn_at,
            input_count: result.input_count,
            output_count: result.entries.len(),
            total_tickets: result.total_tickets,
        }
    }
}

/// Save manifest, JSON, and CSV for one draw under
/// `{output_dir}/draw_{timestamp}_{seed}/`. Returns the created directory.
pub fn save_draw_artifacts(
    result: &DrawResult,
    output_dir: &Path,
    label_field: &str,
) -> Result<PathBuf> {
    let dirname = format!(
        "draw_{}_{}",
        result.drawn_at.format("%Y%m%d_%H%M%S"),
        result.seed
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let manifest = serde_json::to_string_pretty(&DrawManifest::from(result))
        .context("failed to serialize draw manifest")?;
    std::fs::write(run_dir.join("manifest.json"), manifest)?;
    std::fs::write(
        run_dir.join("entries.json"),
        export_entries_json(&result.entries)?,
    )?;
    std::fs::write(
        run_dir.join("entries.csv"),
        export_entries_csv(&result.entries, label_field)?,
    )?;

    Ok(run_dir)
}

/// Load a manifest back, rejecting unknown schema versions.
pub fn load_manifest(dir: &Path) -> Result<DrawManifest> {
    let path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: DrawManifest =
        serde_json::from_str(&json).context("failed to deserialize draw manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}

/// Write text to `path`, or stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(p) => std::fs::write(p, content)
            .with_context(|| format!("failed to write output to {}", p.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

// ─── Curve report ───────────────────────────────────────────────────

/// A trend curve and its segment partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveReport {
    pub length: usize,
    pub curve: Vec<f64>,
    pub segments: Vec<Segment>,
}

impl CurveReport {
    pub fn build(length: usize) -> Result<Self, SegmentError> {
        let curve = generate_trend_curve(length);
        let segments = localize_segments(&curve)?;
        Ok(Self {
            length,
            curve,
            segments,
        })
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::with_capacity(256 + self.segments.len() * 32);
        md.push_str(&format!("# Trend Curve ({} samples)\n\n", self.length));
        md.push_str("| # | Type | Start | End | Start Value | End Value |\n");
        md.push_str("| --- | --- | --- | --- | --- | --- |\n");
        for (i, s) in self.segments.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {:.4} | {:.4} |\n",
                i + 1,
                s.kind,
                s.start,
                s.end,
                self.curve[s.start],
                self.curve[s.end]
            ));
        }
        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_entries;

    fn sample() -> Vec<Entry> {
        parse_entries(r#"[{"name":"Ada","tickets":3,"team":"x"},{"name":"Bo, Jr.","tickets":1.5}]"#)
            .unwrap()
    }

    #[test]
    fn json_export_uses_four_space_indent_and_keeps_fields() {
        let json = export_entries_json(&sample()).unwrap();
        assert!(json.contains("\n    {\n        \"name\": \"Ada\""));
        let back = parse_entries(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn csv_export_quotes_labels() {
        let csv = export_entries_csv(&sample(), "name").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "position,name,tickets");
        assert_eq!(lines[1], "1,Ada,3");
        assert_eq!(lines[2], "2,\"Bo, Jr.\",1.5");
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn curve_report_needs_two_samples() {
        assert!(CurveReport::build(1).is_err());
        let report = CurveReport::build(10).unwrap();
        assert_eq!(report.curve.len(), 10);
        assert_eq!(report.segments.last().unwrap().end, 9);
        assert!(report.to_markdown().contains("| 1 |"));
    }
}
