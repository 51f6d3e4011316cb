//! Document segmentation.
//!
//! One linear scan turns a chart document into document-level headers and
//! per-course records. Statistics and the dan compiler both read the result
//! instead of rescanning the text.

use std::{collections::BTreeMap, ops::Range};

use log::debug;
use tja_schema::{CourseId, ExamCondition};

use crate::{
    classify::{classify, LineKind},
    course::{normalize, CourseName},
    error::SegmentWarning,
    exam::{exam_slot, parse_exam_header},
};

/// Ordered header map. Keys are stored upper-cased; a repeated key keeps its
/// first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_ascii_uppercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Like `get`, but treats an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `base` with every key of `self` laid over it.
    pub fn overlaid_on(&self, base: &HeaderSet) -> HeaderSet {
        let mut merged = base.clone();
        for (key, value) in self.iter() {
            merged.insert(key, value);
        }
        merged
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub name: CourseName,
    pub headers: HeaderSet,
    /// Raw chart lines in source order, start/end markers included.
    pub chart_lines: Vec<String>,
    pub level: Option<String>,
    pub exam_conditions: BTreeMap<u8, ExamCondition>,
    /// Every `BALLOON:` value declared in this course, in encounter order.
    pub balloons: Vec<String>,
}

impl CourseRecord {
    fn new(name: CourseName) -> Self {
        Self {
            name,
            headers: HeaderSet::new(),
            chart_lines: Vec::new(),
            level: None,
            exam_conditions: BTreeMap::new(),
            balloons: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<CourseId> {
        self.name.id()
    }

    /// Chart lines without the start/end markers.
    pub fn chart_body(&self) -> impl Iterator<Item = &str> {
        self.chart_lines
            .iter()
            .map(String::as_str)
            .filter(|line| !classify(line, true).is_chart_marker())
    }

    /// Chart lines joined back into text, one `\n` per line.
    pub fn chart_text(&self) -> String {
        let mut out = String::new();
        for line in &self.chart_lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn apply_header(&mut self, key: String, value: &str) {
        match key.as_str() {
            "BALLOON" => self.balloons.push(value.to_string()),
            "LEVEL" => self.level = Some(value.to_string()),
            _ => {
                if let Some(slot) = exam_slot(&key) {
                    match parse_exam_header(value) {
                        Some(cond) => {
                            self.exam_conditions.insert(slot, cond);
                        }
                        None => debug!("ignoring unreadable {key} value '{value}'"),
                    }
                }
            }
        }
        self.headers.insert(&key, value);
    }
}

/// One chart block in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBlock {
    /// Index into `ParsedDocument::courses`; `None` for unassigned blocks.
    pub course: Option<usize>,
    /// Range of the owning line list, start marker included.
    pub lines: Range<usize>,
    /// Last `LEVEL:` value seen anywhere in the document when the block closed.
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Headers declared before the first course switch.
    pub headers: HeaderSet,
    /// Course records in first-seen order, unique by normalised name.
    pub courses: Vec<CourseRecord>,
    /// Chart blocks that appeared before any course switch.
    pub unassigned_chart_lines: Vec<String>,
    pub chart_blocks: Vec<ChartBlock>,
    pub warnings: Vec<SegmentWarning>,
}

impl ParsedDocument {
    pub fn course(&self, id: CourseId) -> Option<&CourseRecord> {
        self.courses.iter().find(|c| c.id() == Some(id))
    }

    pub fn course_ids(&self) -> impl Iterator<Item = CourseId> + '_ {
        self.courses.iter().filter_map(CourseRecord::id)
    }

    /// Lines of `block`, taken from its course or the unassigned list.
    pub fn block_lines(&self, block: &ChartBlock) -> &[String] {
        let owner = match block.course {
            Some(idx) => self.courses.get(idx).map(|c| c.chart_lines.as_slice()),
            None => Some(self.unassigned_chart_lines.as_slice()),
        };
        owner
            .and_then(|lines| lines.get(block.lines.clone()))
            .unwrap_or_default()
    }

    /// Headers of `record` laid over the document-level headers.
    pub fn merged_headers(&self, record: &CourseRecord) -> HeaderSet {
        record.headers.overlaid_on(&self.headers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Global,
    /// Chart block opened before any course switch.
    GlobalChart,
    InCourse(usize),
    InCourseChart(usize),
}

impl State {
    fn in_chart(self) -> bool {
        matches!(self, State::GlobalChart | State::InCourseChart(_))
    }
}

struct Segmenter {
    state: State,
    doc: ParsedDocument,
    level: Option<String>,
    /// Owner and first line of the block currently open.
    open: Option<(Option<usize>, usize)>,
}

impl Segmenter {
    fn new() -> Self {
        Self {
            state: State::Global,
            doc: ParsedDocument::default(),
            level: None,
            open: None,
        }
    }

    fn chart_sink(&mut self) -> Option<&mut Vec<String>> {
        match self.state {
            State::GlobalChart => Some(&mut self.doc.unassigned_chart_lines),
            State::InCourseChart(idx) => self.doc.courses.get_mut(idx).map(|c| &mut c.chart_lines),
            State::Global | State::InCourse(_) => None,
        }
    }

    fn owner_len(&self, course: Option<usize>) -> usize {
        match course {
            Some(idx) => self.doc.courses.get(idx).map_or(0, |c| c.chart_lines.len()),
            None => self.doc.unassigned_chart_lines.len(),
        }
    }

    fn open_block(&mut self, course: Option<usize>, marker: &str) {
        let start = self.owner_len(course);
        match course {
            Some(idx) => {
                if let Some(record) = self.doc.courses.get_mut(idx) {
                    record.chart_lines.push(marker.to_string());
                }
            }
            None => self.doc.unassigned_chart_lines.push(marker.to_string()),
        }
        self.open = Some((course, start));
    }

    fn close_block(&mut self) {
        if let Some((course, start)) = self.open.take() {
            let end = self.owner_len(course);
            self.doc.chart_blocks.push(ChartBlock {
                course,
                lines: start..end,
                level: self.level.clone(),
            });
        }
    }

    fn step(&mut self, line_no: usize, line: &str) {
        let kind = classify(line, self.state.in_chart());
        self.state = match (self.state, kind) {
            (state, LineKind::CourseSwitch(raw)) => {
                if state.in_chart() {
                    debug!("line {line_no}: course switch inside an open chart block");
                    self.doc
                        .warnings
                        .push(SegmentWarning::UnterminatedChart { line: line_no });
                    self.close_block();
                }
                State::InCourse(self.switch_course(raw))
            }

            (State::Global, LineKind::Header { key, value }) => {
                self.track_level(&key, value);
                self.doc.headers.insert(&key, value);
                State::Global
            }
            (State::InCourse(idx), LineKind::Header { key, value }) => {
                self.track_level(&key, value);
                if let Some(course) = self.doc.courses.get_mut(idx) {
                    course.apply_header(key, value);
                }
                State::InCourse(idx)
            }

            (State::Global, LineKind::ChartStart(_)) => {
                self.open_block(None, line);
                State::GlobalChart
            }
            (State::InCourse(idx), LineKind::ChartStart(_)) => {
                self.open_block(Some(idx), line);
                State::InCourseChart(idx)
            }

            (state, LineKind::ChartEnd(_)) if state.in_chart() => {
                self.push_chart_line(line);
                self.close_block();
                match state {
                    State::InCourseChart(idx) => State::InCourse(idx),
                    _ => State::Global,
                }
            }

            (state, _) if state.in_chart() => {
                self.push_chart_line(line);
                state
            }

            (state, LineKind::Content(_)) => {
                debug!("line {line_no}: unrecognised line outside chart body");
                self.doc
                    .warnings
                    .push(SegmentWarning::MalformedHeaderLine { line: line_no });
                state
            }
            (state, LineKind::ChartEnd(_)) => {
                debug!("line {line_no}: stray chart end marker");
                state
            }
            // Blank and comment lines, directives outside chart bodies.
            (state, _) => state,
        };
    }

    fn track_level(&mut self, key: &str, value: &str) {
        if key == "LEVEL" {
            self.level = Some(value.to_string());
        }
    }

    fn finish(mut self) -> ParsedDocument {
        self.close_block();
        self.doc
    }

    fn push_chart_line(&mut self, line: &str) {
        if let Some(sink) = self.chart_sink() {
            sink.push(line.to_string());
        }
    }

    fn switch_course(&mut self, raw: &str) -> usize {
        let name = normalize(raw);
        let idx = match self.doc.courses.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.doc.courses.push(CourseRecord::new(name));
                self.doc.courses.len() - 1
            }
        };
        if let Some(course) = self.doc.courses.get_mut(idx) {
            course.headers.insert("COURSE", raw);
        }
        idx
    }
}

/// Segments a document given as lines. Never fails; anomalies end up in
/// `ParsedDocument::warnings`.
pub fn segment<I, S>(lines: I) -> ParsedDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut segmenter = Segmenter::new();
    for (i, line) in lines.into_iter().enumerate() {
        segmenter.step(i + 1, line.as_ref());
    }
    let doc = segmenter.finish();
    debug!(
        "segmented {} course(s), {} warning(s)",
        doc.courses.len(),
        doc.warnings.len()
    );
    doc
}

/// Splits `text` on `\n` / `\r\n` and segments it.
pub fn parse_str(text: &str) -> ParsedDocument {
    segment(text.lines())
}
