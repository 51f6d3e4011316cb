//! Single-line classification.
//!
//! Classification looks at a trimmed copy of the line; the caller keeps the
//! original text for anything it emits.

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartVariant {
    Plain,
    P1,
    P2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    CommentOnly,
    Header { key: String, value: &'a str },
    CourseSwitch(&'a str),
    Directive { name: &'a str, rest: &'a str },
    ChartStart(ChartVariant),
    ChartEnd(ChartVariant),
    Content(&'a str),
}

impl LineKind<'_> {
    pub fn is_chart_marker(&self) -> bool {
        matches!(self, LineKind::ChartStart(_) | LineKind::ChartEnd(_))
    }
}

/// Classifies one line. `in_chart` tells whether the line sits inside a chart
/// body, where `KEY:value` lines are note content rather than headers.
/// `COURSE:` is recognised everywhere since it always ends the current course.
pub fn classify(line: &str, in_chart: bool) -> LineKind<'_> {
    let trimmed = line.strip_prefix(BOM).unwrap_or(line).trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with("//") || trimmed.starts_with(';') {
        return LineKind::CommentOnly;
    }

    if trimmed.starts_with('#') {
        if let Some(kind) = chart_marker(trimmed) {
            return kind;
        }
        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };
        return LineKind::Directive { name, rest };
    }

    if let Some((key, value)) = split_header(trimmed) {
        if key.eq_ignore_ascii_case("COURSE") {
            return LineKind::CourseSwitch(value);
        }
        if !in_chart {
            return LineKind::Header {
                key: key.to_ascii_uppercase(),
                value,
            };
        }
    }

    LineKind::Content(line)
}

fn chart_marker(trimmed: &str) -> Option<LineKind<'static>> {
    let kind = match trimmed.to_ascii_uppercase().as_str() {
        "#START" => LineKind::ChartStart(ChartVariant::Plain),
        "#P1START" => LineKind::ChartStart(ChartVariant::P1),
        "#P2START" => LineKind::ChartStart(ChartVariant::P2),
        "#END" => LineKind::ChartEnd(ChartVariant::Plain),
        "#P1END" => LineKind::ChartEnd(ChartVariant::P1),
        "#P2END" => LineKind::ChartEnd(ChartVariant::P2),
        _ => return None,
    };
    Some(kind)
}

fn split_header(trimmed: &str) -> Option<(&str, &str)> {
    let (key, value) = trimmed.split_once(':')?;
    if !is_bare_key(key) {
        return None;
    }
    let value = value.trim();
    Some((key, value.strip_prefix(BOM).unwrap_or(value)))
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
