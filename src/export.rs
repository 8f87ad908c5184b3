//! CSV export of screening results.

use crate::store::ResultRow;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

const EXPORT_COLUMNS: [&str; 5] = [
    "resume_name",
    "job_match_score",
    "category",
    "decision",
    "timestamp",
];

/// File name stamped with the capture time, e.g.
/// `screening_results_20250801_143000.csv`.
pub fn export_file_name() -> String {
    format!(
        "screening_results_{}.csv",
        Utc::now().format("%Y%m%d_%H%M%S")
    )
}

/// Render rows as CSV bytes (header included).
pub fn render_csv(rows: &[ResultRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_COLUMNS)
        .context("Failed to write CSV header")?;

    for row in rows {
        let score = row.job_match_score.to_string();
        let timestamp = row.timestamp.to_rfc3339();
        writer
            .write_record([
                row.resume_name.as_str(),
                score.as_str(),
                row.category.as_str(),
                row.decision.as_str(),
                timestamp.as_str(),
            ])
            .with_context(|| format!("Failed to write CSV row for {}", row.resume_name))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))
}

/// Write a timestamp-named export under `export_dir` and return its path.
pub fn write_batch_csv(export_dir: &Path, rows: &[ResultRow]) -> Result<PathBuf> {
    std::fs::create_dir_all(export_dir)
        .with_context(|| format!("Failed to create export directory: {}", export_dir.display()))?;

    let path = export_dir.join(export_file_name());
    let data = render_csv(rows)?;
    std::fs::write(&path, data)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_rows() -> Vec<ResultRow> {
        vec![ResultRow {
            resume_name: "jane.docx".into(),
            job_match_score: 85,
            category: "High Fit (Selected for Interview)".into(),
            decision: "Send Interview Invite".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap(),
        }]
    }

    #[test]
    fn renders_header_and_rows() {
        let data = render_csv(&sample_rows()).unwrap();
        let text = String::from_utf8(data).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "resume_name,job_match_score,category,decision,timestamp"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("jane.docx,85,"));
        assert!(row.contains("Send Interview Invite"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn file_name_is_timestamped_csv() {
        let name = export_file_name();
        assert!(name.starts_with("screening_results_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn writes_file_under_export_dir() {
        let dir = std::env::temp_dir().join(format!("screenr_export_{}", uuid::Uuid::new_v4()));
        let path = write_batch_csv(&dir, &sample_rows()).unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
