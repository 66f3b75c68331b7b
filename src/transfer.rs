use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::grading::{evaluate, parse_score};
use crate::records::RecordStore;
use crate::store::KeyValueStore;
use crate::validation::validate_subject;

#[derive(Debug, Deserialize)]
struct ImportRow {
    subject: String,
    prelim: String,
    midterm: String,
    pre_finals: String,
    finals: String,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: u64,
    subject: &'a str,
    prelim: f64,
    midterm: f64,
    pre_finals: f64,
    finals: f64,
    average: String,
    gwa: &'a str,
    remark: &'a str,
    class: &'a str,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Evaluates each CSV row and appends it as a record. Rows without a
/// subject are skipped; score cells go through the same normalization as
/// typed input.
pub async fn import_csv<S: KeyValueStore>(
    records: &RecordStore<S>,
    csv_path: &Path,
) -> anyhow::Result<ImportSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut summary = ImportSummary::default();

    for (line, result) in reader.deserialize::<ImportRow>().enumerate() {
        let row = result.with_context(|| format!("invalid CSV row {}", line + 1))?;
        let Ok(subject) = validate_subject(&row.subject) else {
            tracing::warn!(row = line + 1, "skipping CSV row without a subject");
            summary.skipped += 1;
            continue;
        };

        let evaluation = evaluate(
            parse_score(&row.prelim),
            parse_score(&row.midterm),
            parse_score(&row.pre_finals),
            parse_score(&row.finals),
        );
        records
            .append(evaluation, &subject)
            .await
            .with_context(|| format!("failed to save `{subject}`"))?;
        summary.inserted += 1;
    }

    Ok(summary)
}

pub async fn export_csv<S: KeyValueStore>(
    records: &RecordStore<S>,
    csv_path: &Path,
) -> anyhow::Result<usize> {
    let saved = records.list().await;
    let mut writer = csv::Writer::from_path(csv_path)
        .with_context(|| format!("failed to create {}", csv_path.display()))?;

    for record in &saved {
        let scores = record.evaluation.scores();
        writer.serialize(ExportRow {
            id: record.id,
            subject: &record.subject,
            prelim: scores.prelim,
            midterm: scores.midterm,
            pre_finals: scores.pre_finals,
            finals: scores.finals,
            average: format!("{:.2}", record.evaluation.average()),
            gwa: record.evaluation.gwa(),
            remark: record.evaluation.remark().label(),
            class: record.evaluation.tier_class().as_str(),
        })?;
    }
    writer.flush()?;

    Ok(saved.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Remark;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn import_evaluates_each_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.csv");
        std::fs::write(
            &path,
            "subject,prelim,midterm,pre_finals,finals\n\
             Calc 1,90,85,88,95\n\
             ,80,80,80,80\n\
             Physics, 110 ,-10,60,60\n\
             Art,abc,100,100,100\n",
        )
        .unwrap();

        let records = RecordStore::new(MemoryStore::new());
        let summary = import_csv(&records, &path).await.unwrap();
        assert_eq!(summary, ImportSummary { inserted: 3, skipped: 1 });

        let saved = records.list().await;
        assert_eq!(saved[0].subject, "Calc 1");
        assert_eq!(saved[0].evaluation.gwa(), "1.75");
        assert_eq!(saved[1].evaluation.average(), 56.0);
        assert_eq!(saved[2].evaluation.scores().prelim, 0.0);
        assert_eq!(saved[2].evaluation.remark(), Remark::Satisfactory);
    }

    #[tokio::test]
    async fn export_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = RecordStore::new(MemoryStore::new());
        records
            .append(evaluate(90.0, 85.0, 88.0, 95.0), "Calc 1")
            .await
            .unwrap();

        let written = export_csv(&records, &path).await.unwrap();
        assert_eq!(written, 1);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("id,subject,prelim,midterm,pre_finals,finals,average,gwa,remark,class")
        );
        let row = lines.next().unwrap();
        assert!(row.ends_with(",Calc 1,90.0,85.0,88.0,95.0,90.60,1.75,Very Good,very-good"));
    }

    #[tokio::test]
    async fn missing_import_file_is_reported() {
        let records = RecordStore::new(MemoryStore::new());
        let err = import_csv(&records, Path::new("/nonexistent/grades.csv"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to open"));
    }
}
