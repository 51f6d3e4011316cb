use tja_schema::{ExamComparator, ExamCondition, ExamMetric, RawExamCondition};

/// Parses a threshold literal: ASCII digits only, no sign, must fit in `u32`.
pub fn parse_threshold(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Validates a raw condition. On failure returns the offending threshold text.
pub fn validate(raw: &RawExamCondition) -> Result<ExamCondition, &str> {
    let normal_threshold = parse_threshold(raw.normal.trim()).ok_or(raw.normal.as_str())?;
    let gold_threshold = parse_threshold(raw.gold.trim()).ok_or(raw.gold.as_str())?;
    Ok(ExamCondition {
        metric: raw.metric,
        comparator: raw.comparator,
        normal_threshold,
        gold_threshold,
    })
}

/// Reads the value of an `EXAMn:` header (`g,98,100,m`).
pub fn parse_exam_header(value: &str) -> Option<ExamCondition> {
    let mut parts = value.split(',').map(str::trim);
    let metric = ExamMetric::from_code(parts.next()?)?;
    let normal_threshold = parse_threshold(parts.next()?)?;
    let gold_threshold = parse_threshold(parts.next()?)?;
    let comparator = ExamComparator::from_code(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(ExamCondition {
        metric,
        comparator,
        normal_threshold,
        gold_threshold,
    })
}

/// Maps an `EXAMn` header key to its slot number (1..=4).
pub fn exam_slot(key: &str) -> Option<u8> {
    let slot: u8 = key.strip_prefix("EXAM")?.parse().ok()?;
    (1..=4).contains(&slot).then_some(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_literals() {
        assert_eq!(parse_threshold("0"), Some(0));
        assert_eq!(parse_threshold("100"), Some(100));
        assert_eq!(parse_threshold("12a"), None);
        assert_eq!(parse_threshold("-1"), None);
        assert_eq!(parse_threshold("+1"), None);
        assert_eq!(parse_threshold(""), None);
        assert_eq!(parse_threshold("99999999999"), None);
    }

    #[test]
    fn validate_reports_offending_text() {
        let raw = RawExamCondition::new(ExamMetric::Score, ExamComparator::AtLeast, "500000", "12a");
        assert_eq!(validate(&raw), Err("12a"));

        let ok = RawExamCondition::new(ExamMetric::Score, ExamComparator::AtLeast, " 5 ", "6");
        assert_eq!(validate(&ok).map(|c| c.normal_threshold), Ok(5));
    }

    #[test]
    fn exam_header_parsing() {
        let cond = parse_exam_header("jb, 10, 3, l").unwrap();
        assert_eq!(cond.metric, ExamMetric::BadCount);
        assert_eq!(cond.comparator, ExamComparator::LessThan);
        assert_eq!(cond.normal_threshold, 10);
        assert_eq!(cond.gold_threshold, 3);

        assert_eq!(parse_exam_header("g,98,100"), None);
        assert_eq!(parse_exam_header("g,98,100,m,x"), None);
        assert_eq!(parse_exam_header("zz,1,2,m"), None);
    }

    #[test]
    fn exam_slot_keys() {
        assert_eq!(exam_slot("EXAM1"), Some(1));
        assert_eq!(exam_slot("EXAM4"), Some(4));
        assert_eq!(exam_slot("EXAM5"), None);
        assert_eq!(exam_slot("EXAMPLE"), None);
    }
}
