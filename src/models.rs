use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub prelim: f64,
    pub midterm: f64,
    pub pre_finals: f64,
    pub finals: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Remark {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Satisfactory,
    Fair,
    Failed,
    #[serde(rename = "No Grade")]
    NoGrade,
}

impl Remark {
    pub fn label(self) -> &'static str {
        match self {
            Remark::Excellent => "Excellent",
            Remark::VeryGood => "Very Good",
            Remark::Satisfactory => "Satisfactory",
            Remark::Fair => "Fair",
            Remark::Failed => "Failed",
            Remark::NoGrade => "No Grade",
        }
    }
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Styling tag of the tier row that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierClass {
    Excellent,
    VeryGood,
    Satisfactory,
    Fair,
    Failed,
    Neutral,
}

impl TierClass {
    pub fn as_str(self) -> &'static str {
        match self {
            TierClass::Excellent => "excellent",
            TierClass::VeryGood => "very-good",
            TierClass::Satisfactory => "satisfactory",
            TierClass::Fair => "fair",
            TierClass::Failed => "failed",
            TierClass::Neutral => "neutral",
        }
    }
}

/// One evaluation of four component scores.
///
/// Only `grading::evaluate` builds these, so `gwa`, `remark` and
/// `tier_class` always come from the same tier row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    prelim: f64,
    midterm: f64,
    pre_finals: f64,
    finals: f64,
    average: f64,
    gwa: String,
    remark: Remark,
    #[serde(rename = "class")]
    tier_class: TierClass,
}

impl EvaluationResult {
    pub(crate) fn new(
        scores: ComponentScores,
        average: f64,
        gwa: String,
        remark: Remark,
        tier_class: TierClass,
    ) -> Self {
        Self {
            prelim: scores.prelim,
            midterm: scores.midterm,
            pre_finals: scores.pre_finals,
            finals: scores.finals,
            average,
            gwa,
            remark,
            tier_class,
        }
    }

    pub fn scores(&self) -> ComponentScores {
        ComponentScores {
            prelim: self.prelim,
            midterm: self.midterm,
            pre_finals: self.pre_finals,
            finals: self.finals,
        }
    }

    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn gwa(&self) -> &str {
        &self.gwa
    }

    pub fn remark(&self) -> Remark {
        self.remark
    }

    pub fn tier_class(&self) -> TierClass {
        self.tier_class
    }

    /// An all-zero result counts as "nothing calculated yet".
    pub fn is_saveable(&self) -> bool {
        self.average != 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub subject: String,
    #[serde(flatten)]
    pub evaluation: EvaluationResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> EvaluationResult {
        EvaluationResult::new(
            ComponentScores {
                prelim: 90.0,
                midterm: 85.0,
                pre_finals: 88.0,
                finals: 95.0,
            },
            90.6,
            "1.75".to_string(),
            Remark::VeryGood,
            TierClass::VeryGood,
        )
    }

    #[test]
    fn record_serializes_to_flat_storage_shape() {
        let record = Record {
            id: 1_700_000_000_000,
            subject: "Calc 1".to_string(),
            evaluation: sample_result(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 1_700_000_000_000u64);
        assert_eq!(value["subject"], "Calc 1");
        assert_eq!(value["preFinals"], 88.0);
        assert_eq!(value["average"], 90.6);
        assert_eq!(value["gwa"], "1.75");
        assert_eq!(value["remark"], "Very Good");
        assert_eq!(value["class"], "very-good");
    }

    #[test]
    fn reads_records_written_with_integer_scores() {
        let raw = r#"{"id":1717171717171,"subject":"Physics","prelim":100,"midterm":100,
            "preFinals":100,"finals":100,"average":100,"gwa":"1.00",
            "remark":"Excellent","class":"excellent"}"#;

        let record: Record = serde_json::from_str(raw).unwrap();
        assert_eq!(record.id, 1717171717171);
        assert_eq!(record.evaluation.scores().pre_finals, 100.0);
        assert_eq!(record.evaluation.remark(), Remark::Excellent);
        assert_eq!(record.evaluation.tier_class(), TierClass::Excellent);
    }

    #[test]
    fn zero_average_is_not_saveable() {
        let empty = EvaluationResult::new(
            ComponentScores {
                prelim: 0.0,
                midterm: 0.0,
                pre_finals: 0.0,
                finals: 0.0,
            },
            0.0,
            "5.00".to_string(),
            Remark::Failed,
            TierClass::Failed,
        );
        assert!(!empty.is_saveable());
        assert!(sample_result().is_saveable());
    }
}
