//! Per-block note statistics.
//!
//! Combo is `don + katsu` for the block; rolls, balloons and misses are not
//! taken into account.

use tja_schema::CourseStats;

use crate::{
    classify::{classify, LineKind},
    comment::strip_inline_comment,
    segment::{segment, ParsedDocument},
};

const UNKNOWN_COURSE: &str = "Unknown";

/// Segments `lines` and returns one entry per chart block.
pub fn count<I, S>(lines: I) -> Vec<CourseStats>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    document_stats(&segment(lines))
}

/// One entry per chart block in source order. The course is the one in force
/// when the block opened and the level is the last `LEVEL:` seen when it closed.
pub fn document_stats(doc: &ParsedDocument) -> Vec<CourseStats> {
    let mut out = Vec::new();

    for block in &doc.chart_blocks {
        let course = block
            .course
            .and_then(|idx| doc.courses.get(idx))
            .map_or(UNKNOWN_COURSE, |record| record.name.display_name());
        let level = level_label(block.level.as_deref());
        for (don, katsu) in block_counts(doc.block_lines(block)) {
            out.push(entry(course, don, katsu, &level));
        }
    }

    if out.is_empty() {
        out.push(CourseStats::none());
    }
    out
}

/// `(don, katsu)` per chart block found in `lines`.
fn block_counts(lines: &[String]) -> Vec<(u32, u32)> {
    let mut blocks = Vec::new();
    let mut in_chart = false;
    let (mut don, mut katsu) = (0u32, 0u32);

    for line in lines {
        match classify(line, true) {
            LineKind::ChartStart(_) => {
                if in_chart {
                    blocks.push((don, katsu));
                    (don, katsu) = (0, 0);
                }
                in_chart = true;
            }
            LineKind::ChartEnd(_) => {
                if in_chart {
                    blocks.push((don, katsu));
                    (don, katsu) = (0, 0);
                }
                in_chart = false;
            }
            LineKind::Content(text) if in_chart => {
                for c in strip_inline_comment(text).chars() {
                    match c {
                        '1' | '3' => don += 1,
                        '2' | '4' => katsu += 1,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if in_chart && don + katsu > 0 {
        blocks.push((don, katsu));
    }
    blocks
}

fn entry(course: &str, don: u32, katsu: u32, level: &str) -> CourseStats {
    CourseStats {
        course: course.to_string(),
        don,
        katsu,
        combo: don + katsu,
        level: level.to_string(),
    }
}

/// Digits of a `LEVEL:` value, or `?`.
fn level_label(raw: Option<&str>) -> String {
    let digits: String = raw
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        "?".to_string()
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_keeps_digits_only() {
        assert_eq!(level_label(Some("★10")), "10");
        assert_eq!(level_label(Some("x")), "?");
        assert_eq!(level_label(None), "?");
    }

    #[test]
    fn unterminated_block_is_flushed_when_non_empty() {
        let lines: Vec<String> = ["#START", "11,"].iter().map(|s| s.to_string()).collect();
        assert_eq!(block_counts(&lines), vec![(2, 0)]);

        let empty: Vec<String> = ["#START", "00,"].iter().map(|s| s.to_string()).collect();
        assert!(block_counts(&empty).is_empty());
    }

    #[test]
    fn restart_without_end_flushes_previous_block() {
        let lines: Vec<String> = ["#START", "12,", "#START", "3,", "#END"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(block_counts(&lines), vec![(1, 1), (1, 0)]);
    }

    #[test]
    fn directives_inside_chart_are_not_counted() {
        let lines: Vec<String> = ["#START", "#BPMCHANGE 123", "#SCROLL 1.2", "1,", "#END"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(block_counts(&lines), vec![(1, 0)]);
    }
}
