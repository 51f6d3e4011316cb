use serde::{Deserialize, Serialize};
use std::fmt;

pub const EXAM_SLOTS: usize = 4;
pub const MAX_DAN_SONGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseId {
    Easy,
    Normal,
    Hard,
    Oni,
    Edit,
}

impl CourseId {
    pub const ALL: [CourseId; 5] = [
        CourseId::Easy,
        CourseId::Normal,
        CourseId::Hard,
        CourseId::Oni,
        CourseId::Edit,
    ];

    /// Numeric id used by `COURSE:` headers and `#NEXTSONG` (0 = Easy .. 4 = Edit).
    pub fn numeric(self) -> u8 {
        match self {
            CourseId::Easy => 0,
            CourseId::Normal => 1,
            CourseId::Hard => 2,
            CourseId::Oni => 3,
            CourseId::Edit => 4,
        }
    }

    pub fn from_numeric(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n)).copied()
    }

    /// Label shown by the statistics view.
    pub fn display_name(self) -> &'static str {
        match self {
            CourseId::Easy => "かんたん",
            CourseId::Normal => "ふつう",
            CourseId::Hard => "むずかしい",
            CourseId::Oni => "鬼",
            CourseId::Edit => "裏鬼",
        }
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CourseId::Easy => "Easy",
            CourseId::Normal => "Normal",
            CourseId::Hard => "Hard",
            CourseId::Oni => "Oni",
            CourseId::Edit => "Edit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamMetric {
    SoulGauge,
    GoodCount,
    OkCount,
    BadCount,
    Score,
    RollCount,
    HitCount,
    MaxCombo,
}

impl ExamMetric {
    pub fn code(self) -> &'static str {
        match self {
            ExamMetric::SoulGauge => "g",
            ExamMetric::GoodCount => "jp",
            ExamMetric::OkCount => "jg",
            ExamMetric::BadCount => "jb",
            ExamMetric::Score => "s",
            ExamMetric::RollCount => "r",
            ExamMetric::HitCount => "h",
            ExamMetric::MaxCombo => "c",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let metric = match code {
            "g" => ExamMetric::SoulGauge,
            "jp" => ExamMetric::GoodCount,
            "jg" => ExamMetric::OkCount,
            "jb" => ExamMetric::BadCount,
            "s" => ExamMetric::Score,
            "r" => ExamMetric::RollCount,
            "h" => ExamMetric::HitCount,
            "c" => ExamMetric::MaxCombo,
            _ => return None,
        };
        Some(metric)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamComparator {
    AtLeast,
    LessThan,
}

impl ExamComparator {
    pub fn code(self) -> &'static str {
        match self {
            ExamComparator::AtLeast => "m",
            ExamComparator::LessThan => "l",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(ExamComparator::AtLeast),
            "l" => Some(ExamComparator::LessThan),
            _ => None,
        }
    }
}

/// Exam condition as entered by the user; thresholds are still unvalidated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExamCondition {
    pub metric: ExamMetric,
    pub comparator: ExamComparator,
    pub normal: String,
    pub gold: String,
}

impl RawExamCondition {
    pub fn new(
        metric: ExamMetric,
        comparator: ExamComparator,
        normal: impl Into<String>,
        gold: impl Into<String>,
    ) -> Self {
        Self {
            metric,
            comparator,
            normal: normal.into(),
            gold: gold.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamCondition {
    pub metric: ExamMetric,
    pub comparator: ExamComparator,
    pub normal_threshold: u32,
    pub gold_threshold: u32,
}

impl ExamCondition {
    /// Value part of an `EXAMn:` line, e.g. `g,98,100,m`.
    pub fn header_value(&self) -> String {
        format!(
            "{},{},{},{}",
            self.metric.code(),
            self.normal_threshold,
            self.gold_threshold,
            self.comparator.code()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamSlotSource {
    Shared(RawExamCondition),
    PerSong([RawExamCondition; MAX_DAN_SONGS]),
    #[default]
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanColor {
    Wood,
    Blue,
    #[default]
    Red,
    Silver,
    Gold,
}

impl DanColor {
    pub fn as_str(self) -> &'static str {
        match self {
            DanColor::Wood => "wood",
            DanColor::Blue => "blue",
            DanColor::Red => "red",
            DanColor::Silver => "silver",
            DanColor::Gold => "gold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStats {
    pub course: String,
    pub don: u32,
    pub katsu: u32,
    pub combo: u32,
    pub level: String,
}

impl CourseStats {
    pub fn none() -> Self {
        Self {
            course: "None".to_string(),
            don: 0,
            katsu: 0,
            combo: 0,
            level: "?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_numeric_roundtrip() {
        for id in CourseId::ALL {
            assert_eq!(CourseId::from_numeric(id.numeric()), Some(id));
        }
        assert_eq!(CourseId::from_numeric(5), None);
    }

    #[test]
    fn exam_condition_header_value() {
        let cond = ExamCondition {
            metric: ExamMetric::BadCount,
            comparator: ExamComparator::LessThan,
            normal_threshold: 10,
            gold_threshold: 3,
        };
        assert_eq!(cond.header_value(), "jb,10,3,l");
    }

    #[test]
    fn exam_metric_codes_are_reversible() {
        for metric in [
            ExamMetric::SoulGauge,
            ExamMetric::GoodCount,
            ExamMetric::OkCount,
            ExamMetric::BadCount,
            ExamMetric::Score,
            ExamMetric::RollCount,
            ExamMetric::HitCount,
            ExamMetric::MaxCombo,
        ] {
            assert_eq!(ExamMetric::from_code(metric.code()), Some(metric));
        }
        assert_eq!(ExamMetric::from_code("x"), None);
    }

    #[test]
    fn exam_slot_source_json_shapes() {
        let v = serde_json::json!([
            { "shared": { "metric": "soul_gauge", "comparator": "at_least", "normal": "98", "gold": "100" } },
            "disabled"
        ]);

        let slots: Vec<ExamSlotSource> = serde_json::from_value(v).unwrap();
        assert_eq!(
            slots[0],
            ExamSlotSource::Shared(RawExamCondition::new(
                ExamMetric::SoulGauge,
                ExamComparator::AtLeast,
                "98",
                "100"
            ))
        );
        assert_eq!(slots[1], ExamSlotSource::Disabled);
    }

    #[test]
    fn per_song_slot_requires_three_conditions() {
        let two = serde_json::json!({
            "per_song": [
                { "metric": "score", "comparator": "at_least", "normal": "1", "gold": "2" },
                { "metric": "score", "comparator": "at_least", "normal": "1", "gold": "2" }
            ]
        });
        assert!(serde_json::from_value::<ExamSlotSource>(two).is_err());
    }

    #[test]
    fn course_stats_serialization() {
        let stats = CourseStats {
            course: CourseId::Oni.display_name().to_string(),
            don: 4,
            katsu: 4,
            combo: 8,
            level: "?".to_string(),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["course"], "鬼");
        assert_eq!(json["combo"], 8);
    }
}
