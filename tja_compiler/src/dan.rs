//! Dan chart compilation: merges up to three songs into one exam chart.

use log::{debug, trace};
use tja_schema::{
    CourseId, DanColor, ExamCondition, ExamSlotSource, EXAM_SLOTS, MAX_DAN_SONGS,
};

use crate::{
    comment::strip_comments,
    error::CompileError,
    exam,
    segment::{CourseRecord, HeaderSet, ParsedDocument},
};

const DAN_COURSE: &str = "Dan";
const SUBTITLE_PLACEHOLDER: &str = "--";
const DEFAULT_LEVEL: &str = "10";

#[derive(Debug, Clone, Copy)]
pub struct DanSong<'a> {
    pub document: &'a ParsedDocument,
    pub course: CourseId,
}

#[derive(Debug, Clone)]
pub struct DanRequest<'a> {
    pub songs: Vec<DanSong<'a>>,
    pub exams: [ExamSlotSource; EXAM_SLOTS],
    pub title: String,
    pub genre_tag: String,
    pub color: DanColor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanOutput {
    pub text: String,
    /// `WAVE` file names referenced by the songs, in song order, without duplicates.
    pub audio_files: Vec<String>,
}

#[derive(Debug, Clone)]
enum ExamSlot {
    Shared(ExamCondition),
    PerSong(Vec<ExamCondition>),
    Disabled,
}

struct SongPlan<'a> {
    course: CourseId,
    record: &'a CourseRecord,
    headers: HeaderSet,
}

pub fn compile(request: &DanRequest<'_>) -> Result<DanOutput, CompileError> {
    let song_count = request.songs.len();
    if !(1..=MAX_DAN_SONGS).contains(&song_count) {
        return Err(CompileError::SongCountOutOfRange { count: song_count });
    }

    let exams = validate_exams(&request.exams, song_count)?;
    let plans = select_courses(&request.songs)?;
    debug!(
        "compiling dan chart '{}' from {} song(s)",
        request.title, song_count
    );

    let mut lines = vec![
        format!("TITLE:{}", request.title),
        format!("SUBTITLE:{SUBTITLE_PLACEHOLDER}"),
        "WAVE:".to_string(),
        "SCOREMODE:2".to_string(),
        format!("COURSE:{DAN_COURSE}"),
        format!("GENRE:{}-{}", request.genre_tag, request.color.as_str()),
    ];

    for (slot, exam) in numbered_slots(&exams) {
        if let ExamSlot::Shared(cond) = exam {
            lines.push(exam_line(slot, cond));
        }
    }

    let balloons = merged_balloons(&plans);
    if !balloons.is_empty() {
        lines.push(format!("BALLOON:{balloons}"));
    }

    lines.push("#START".to_string());
    for (idx, plan) in plans.iter().enumerate() {
        trace!("song {}: course {}", idx + 1, plan.course);
        push_song(&mut lines, idx, plan, &exams);
        if idx + 1 < plans.len() {
            lines.push(",".to_string());
        }
    }
    lines.push("#END".to_string());

    let text = strip_comments(&lines.join("\n"));
    Ok(DanOutput {
        text,
        audio_files: audio_files(&plans),
    })
}

fn validate_exams(
    slots: &[ExamSlotSource; EXAM_SLOTS],
    song_count: usize,
) -> Result<Vec<ExamSlot>, CompileError> {
    let invalid = |slot: usize, song: Option<usize>, value: &str| CompileError::InvalidExamValue {
        slot: (slot + 1) as u8,
        song,
        value: value.to_string(),
    };

    slots
        .iter()
        .enumerate()
        .map(|(slot, source)| match source {
            ExamSlotSource::Shared(raw) => exam::validate(raw)
                .map(ExamSlot::Shared)
                .map_err(|value| invalid(slot, None, value)),
            ExamSlotSource::PerSong(raws) => raws
                .iter()
                .take(song_count)
                .enumerate()
                .map(|(song, raw)| exam::validate(raw).map_err(|value| invalid(slot, Some(song), value)))
                .collect::<Result<Vec<_>, _>>()
                .map(ExamSlot::PerSong),
            ExamSlotSource::Disabled => Ok(ExamSlot::Disabled),
        })
        .collect()
}

fn select_courses<'a>(songs: &[DanSong<'a>]) -> Result<Vec<SongPlan<'a>>, CompileError> {
    songs
        .iter()
        .enumerate()
        .map(|(idx, song)| -> Result<SongPlan<'a>, CompileError> {
            let record = song
                .document
                .course(song.course)
                .ok_or(CompileError::CourseNotFound {
                    song: idx,
                    course: song.course,
                })?;
            Ok(SongPlan {
                course: song.course,
                record,
                headers: song.document.merged_headers(record),
            })
        })
        .collect()
}

fn numbered_slots(exams: &[ExamSlot]) -> impl Iterator<Item = (usize, &ExamSlot)> {
    exams.iter().enumerate().map(|(idx, exam)| (idx + 1, exam))
}

fn exam_line(slot: usize, cond: &ExamCondition) -> String {
    format!("EXAM{slot}:{}", cond.header_value())
}

/// Balloon counts of every song's target course, never the global ones.
fn merged_balloons(plans: &[SongPlan<'_>]) -> String {
    plans
        .iter()
        .flat_map(|plan| plan.record.balloons.iter())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|count| !count.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

fn push_song(lines: &mut Vec<String>, idx: usize, plan: &SongPlan<'_>, exams: &[ExamSlot]) {
    let headers = &plan.headers;
    let or_dash = |key: &str| headers.get_non_empty(key).unwrap_or("-").to_string();

    lines.push(format!(
        "#NEXTSONG {},{},{},{},{},{},{},{}",
        headers.get("TITLE").unwrap_or_default(),
        or_dash("SUBTITLE"),
        or_dash("WAVE"),
        headers.get("GENRE").unwrap_or_default(),
        or_dash("SCOREINIT"),
        or_dash("SCOREDIFF"),
        plan.course.numeric(),
        headers.get_non_empty("LEVEL").unwrap_or(DEFAULT_LEVEL),
    ));

    if let Some(bpm) = headers.get_non_empty("BPM") {
        lines.push(format!("#BPMCHANGE {bpm}"));
    }
    if let Some(offset) = headers.get_non_empty("OFFSET") {
        if offset.parse::<f64>().is_ok_and(|v| v < 0.0) {
            lines.push(format!("#DELAY {}", offset.trim_start_matches('-')));
        }
    }

    for (slot, exam) in numbered_slots(exams) {
        if let ExamSlot::PerSong(conds) = exam {
            if let Some(cond) = conds.get(idx) {
                lines.push(exam_line(slot, cond));
            }
        }
    }

    lines.extend(plan.record.chart_body().map(str::to_string));
}

fn audio_files(plans: &[SongPlan<'_>]) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    for plan in plans {
        if let Some(wave) = plan.headers.get_non_empty("WAVE") {
            if !files.iter().any(|f| f == wave) {
                files.push(wave.to_string());
            }
        }
    }
    files
}
