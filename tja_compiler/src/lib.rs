//! Segmenter, note statistics and dan chart compiler for TJA charts.
//!
//! Everything here works on already-decoded text and performs no I/O.
//! Raw text ==[segment]==> [`ParsedDocument`] ==> { [`document_stats`], [`compile`] }

pub mod classify;
pub mod comment;
pub mod course;
pub mod dan;
pub mod error;
pub mod exam;
pub mod segment;
pub mod stats;

pub use classify::{classify, ChartVariant, LineKind};
pub use comment::{strip_comments, strip_inline_comment};
pub use course::{normalize, CourseName};
pub use dan::{compile, DanOutput, DanRequest, DanSong};
pub use error::{CompileError, CompileErrorKind, SegmentWarning};
pub use segment::{parse_str, segment, ChartBlock, CourseRecord, HeaderSet, ParsedDocument};
pub use stats::{count, document_stats};

pub use tja_schema::{
    CourseId, CourseStats, DanColor, ExamComparator, ExamCondition, ExamMetric, ExamSlotSource,
    RawExamCondition,
};

/// Statistics for a whole document given as text.
pub fn count_str(text: &str) -> Vec<CourseStats> {
    count(text.lines())
}
