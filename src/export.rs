use crate::models::SubmissionEntry;
use crate::ui::state::progress_percent;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;

/// Export the trainer's submissions list to a CSV file
pub fn export_submissions_to_csv<'a>(
    entries: impl IntoIterator<Item = &'a SubmissionEntry>,
    assignment_id: &str,
    total_marks: f64,
) -> Result<PathBuf> {
    let entries: Vec<&SubmissionEntry> = entries.into_iter().collect();
    if entries.is_empty() {
        anyhow::bail!("No submissions to export");
    }

    // Generate filename with timestamp
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("submissions_{}_{}.csv", assignment_id, timestamp);
    let filepath = PathBuf::from(&filename);

    let mut wtr = csv::Writer::from_path(&filepath).context("Failed to create CSV file")?;

    wtr.write_record([
        "student_id",
        "student_name",
        "submitted_on",
        "file_link",
        "marks",
        "percentage",
    ])
    .context("Failed to write CSV headers")?;

    for entry in entries {
        let submitted_on = entry
            .submission_date
            .map(|d| d.to_rfc3339())
            .unwrap_or_default();
        let marks = entry.marks.map(|m| m.to_string()).unwrap_or_default();
        let percentage = entry
            .marks
            .and_then(|m| progress_percent(m, total_marks))
            .map(|p| p.to_string())
            .unwrap_or_default();

        wtr.write_record([
            entry.student_id.as_str(),
            entry.student_name.as_str(),
            submitted_on.as_str(),
            entry.submitted_file_link.as_deref().unwrap_or_default(),
            marks.as_str(),
            percentage.as_str(),
        ])
        .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;

    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_export_submissions_csv() {
        let entries = vec![
            SubmissionEntry {
                student_id: "s1".to_string(),
                student_name: "Avery Jones".to_string(),
                submission_date: Some(Utc.with_ymd_and_hms(2024, 5, 28, 12, 30, 0).unwrap()),
                submitted_file_link: Some("https://files.example.com/a.pdf".to_string()),
                marks: Some(45.0),
            },
            SubmissionEntry {
                student_id: "s2".to_string(),
                student_name: "Sam Lee".to_string(),
                submission_date: None,
                submitted_file_link: None,
                marks: None,
            },
        ];

        let filepath = export_submissions_to_csv(&entries, "a1", 50.0).unwrap();
        assert!(filepath.exists());

        let contents = std::fs::read_to_string(&filepath).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "student_id,student_name,submitted_on,file_link,marks,percentage"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("s1,Avery Jones,"));
        assert!(first.ends_with(",45,90"));
        assert_eq!(lines.next().unwrap(), "s2,Sam Lee,,,,");
        assert!(lines.next().is_none());

        // Clean up
        std::fs::remove_file(filepath).ok();
    }

    #[test]
    fn test_export_with_no_rows_is_an_error() {
        let entries: Vec<SubmissionEntry> = Vec::new();
        assert!(export_submissions_to_csv(&entries, "a1", 50.0).is_err());
    }
}
