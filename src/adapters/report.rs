use crate::core::RunReport;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    #[default]
    Json,
}

#[derive(Debug, Serialize)]
struct BenchmarkCsvRow<'a> {
    lesson: &'a str,
    strategy: &'a str,
    n: u32,
    result: Option<u64>,
    elapsed_micros: u64,
    calls: Option<u64>,
    space: &'a str,
}

pub fn render_json(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One row per benchmark measurement across all lessons.
pub fn render_csv(report: &RunReport) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // 沒有任何量測時仍輸出表頭
    writer.write_record([
        "lesson",
        "strategy",
        "n",
        "result",
        "elapsed_micros",
        "calls",
        "space",
    ])?;

    for summary in &report.lessons {
        for row in &summary.benchmarks {
            writer.serialize(BenchmarkCsvRow {
                lesson: summary.lesson.name(),
                strategy: &row.strategy,
                n: row.n,
                result: row.result,
                elapsed_micros: u64::try_from(row.elapsed_micros).unwrap_or(u64::MAX),
                calls: row.calls,
                space: &row.space,
            })?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_report<P: AsRef<Path>>(path: P, format: ReportFormat, report: &RunReport) -> Result<()> {
    let path = path.as_ref();
    let content = match format {
        ReportFormat::Json => render_json(report)?,
        ReportFormat::Csv => render_csv(report)?,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    tracing::debug!("Writing {:?} report ({} bytes) to {}", format, content.len(), path.display());
    fs::write(path, content)?;
    Ok(())
}
