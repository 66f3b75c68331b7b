use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{Record, Remark};

#[derive(Debug, Clone, PartialEq)]
pub struct RemarkSummary {
    pub remark: Remark,
    pub count: usize,
    pub avg_average: f64,
}

pub fn summarize_by_remark(records: &[Record]) -> Vec<RemarkSummary> {
    let mut totals: Vec<(Remark, usize, f64)> = Vec::new();

    for record in records {
        let remark = record.evaluation.remark();
        match totals.iter_mut().find(|(seen, _, _)| *seen == remark) {
            Some(entry) => {
                entry.1 += 1;
                entry.2 += record.evaluation.average();
            }
            None => totals.push((remark, 1, record.evaluation.average())),
        }
    }

    let mut summaries: Vec<RemarkSummary> = totals
        .into_iter()
        .map(|(remark, count, total)| RemarkSummary {
            remark,
            count,
            avg_average: total / count as f64,
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

/// Mean of the stored GWA values, skipping any that fail to parse.
pub fn mean_gwa(records: &[Record]) -> Option<f64> {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|record| record.evaluation.gwa().parse::<f64>().ok())
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn escape(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).replace('|', "&#124;")
}

pub fn build_report(records: &[Record], generated_at: DateTime<Utc>) -> String {
    let summaries = summarize_by_remark(records);
    let mut output = String::new();

    let _ = writeln!(output, "# Semester GWA Report");
    let _ = writeln!(
        output,
        "Generated {} across {} saved subjects",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        records.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Remark Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No saved records yet.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} subjects (avg {:.2})",
                summary.remark, summary.count, summary.avg_average
            );
        }
        if let Some(mean) = mean_gwa(records) {
            let _ = writeln!(output, "- Mean GWA: {mean:.2}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Saved Records");

    if records.is_empty() {
        let _ = writeln!(output, "No saved records yet.");
        return output;
    }

    let _ = writeln!(
        output,
        "| Subject | Prelim | Midterm | Pre-Finals | Finals | Average | GWA | Remark |"
    );
    let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
    for record in records {
        let scores = record.evaluation.scores();
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {:.2} | {} | {} |",
            escape(&record.subject),
            scores.prelim,
            scores.midterm,
            scores.pre_finals,
            scores.finals,
            record.evaluation.average(),
            record.evaluation.gwa(),
            record.evaluation.remark(),
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::grading::evaluate;

    fn record(id: u64, subject: &str, scores: [f64; 4]) -> Record {
        Record {
            id,
            subject: subject.to_string(),
            evaluation: evaluate(scores[0], scores[1], scores[2], scores[3]),
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn summaries_group_by_remark() {
        let records = vec![
            record(1, "Calc 1", [90.0, 85.0, 88.0, 95.0]),
            record(2, "Physics", [90.0, 90.0, 90.0, 90.0]),
            record(3, "History", [50.0, 50.0, 50.0, 50.0]),
        ];

        let summaries = summarize_by_remark(&records);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].remark, Remark::VeryGood);
        assert_eq!(summaries[0].count, 2);
        assert!((summaries[0].avg_average - 90.3).abs() < 0.001);
        assert_eq!(summaries[1].remark, Remark::Failed);
    }

    #[test]
    fn mean_gwa_averages_stored_values() {
        let records = vec![
            record(1, "A", [100.0, 100.0, 100.0, 100.0]),
            record(2, "B", [50.0, 50.0, 50.0, 50.0]),
        ];
        assert_eq!(mean_gwa(&records), Some(3.0));
        assert_eq!(mean_gwa(&[]), None);
    }

    #[test]
    fn report_lists_records_in_order() {
        let records = vec![
            record(1, "Calc 1", [90.0, 85.0, 88.0, 95.0]),
            record(2, "History", [50.0, 50.0, 50.0, 50.0]),
        ];

        let report = build_report(&records, generated_at());
        assert!(report.contains("Generated 2026-03-14 09:30 UTC across 2 saved subjects"));
        assert!(report.contains("| Calc 1 | 90 | 85 | 88 | 95 | 90.60 | 1.75 | Very Good |"));
        let calc = report.find("Calc 1").unwrap();
        let history = report.find("| History").unwrap();
        assert!(calc < history);
    }

    #[test]
    fn subjects_are_escaped_when_rendered() {
        let records = vec![record(1, "<b>Stats</b> | A&B \"honors\"", [80.0; 4])];
        let report = build_report(&records, generated_at());

        assert!(!report.contains("<b>"));
        assert!(report.contains("&lt;b&gt;Stats"));
        assert!(report.contains("&#124; A&amp;B &quot;honors&quot;"));
    }

    #[test]
    fn empty_report_says_so() {
        let report = build_report(&[], generated_at());
        assert!(report.contains("## Remark Mix\nNo saved records yet."));
        assert!(report.contains("## Saved Records\nNo saved records yet."));
    }
}
