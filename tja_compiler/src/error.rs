use thiserror::Error;
use tja_schema::CourseId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// The request itself is invalid (song count, exam thresholds).
    Validation,
    /// A song does not contain the course selected for it.
    Selection,
}

/// Errors that abort a dan compile. Song indices are 0-based, exam slots 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("E1001: a dan chart needs 1 to 3 songs, got {count}")]
    SongCountOutOfRange { count: usize },

    #[error("E1002: exam {slot} threshold is not a non-negative integer: '{value}'{}", song_suffix(.song))]
    InvalidExamValue {
        slot: u8,
        song: Option<usize>,
        value: String,
    },

    #[error("E1003: course {course} not found in song {}", .song + 1)]
    CourseNotFound { song: usize, course: CourseId },
}

fn song_suffix(song: &Option<usize>) -> String {
    match song {
        Some(i) => format!(" (song {})", i + 1),
        None => String::new(),
    }
}

impl CompileError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SongCountOutOfRange { .. } => "E1001",
            Self::InvalidExamValue { .. } => "E1002",
            Self::CourseNotFound { .. } => "E1003",
        }
    }

    pub fn kind(&self) -> CompileErrorKind {
        match self {
            Self::SongCountOutOfRange { .. } | Self::InvalidExamValue { .. } => {
                CompileErrorKind::Validation
            }
            Self::CourseNotFound { .. } => CompileErrorKind::Selection,
        }
    }
}

/// Anomalies the segmenter tolerates. Never fatal; line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentWarning {
    #[error("W2001: malformed header line")]
    MalformedHeaderLine { line: usize },

    #[error("W2002: chart block closed by a course switch without #END")]
    UnterminatedChart { line: usize },
}

impl SegmentWarning {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedHeaderLine { .. } => "W2001",
            Self::UnterminatedChart { .. } => "W2002",
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::MalformedHeaderLine { line } | Self::UnterminatedChart { line } => *line,
        }
    }
}
