use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use tja_compiler::{normalize, CourseId};
use tja_schema::{DanColor, ExamSlotSource, EXAM_SLOTS};

/// Dan compile job, read from JSON. Song paths are relative to the job file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DanJob {
    pub title: String,
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default)]
    pub color: DanColor,
    pub songs: Vec<JobSong>,
    #[serde(default)]
    pub exams: Vec<ExamSlotSource>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSong {
    pub path: PathBuf,
    pub course: String,
}

fn default_genre() -> String {
    "段位道場".to_string()
}

impl DanJob {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("failed to read job: {}", path.display()))?;
        let job: DanJob = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse job json: {}", path.display()))?;
        Ok(job)
    }

    /// Exam slots padded with `Disabled` up to four.
    pub fn exam_slots(&self) -> anyhow::Result<[ExamSlotSource; EXAM_SLOTS]> {
        if self.exams.len() > EXAM_SLOTS {
            bail!(
                "job declares {} exam slots, at most {EXAM_SLOTS} are supported",
                self.exams.len()
            );
        }
        let mut slots: [ExamSlotSource; EXAM_SLOTS] = Default::default();
        for (slot, exam) in slots.iter_mut().zip(&self.exams) {
            *slot = exam.clone();
        }
        Ok(slots)
    }
}

impl JobSong {
    pub fn course_id(&self) -> anyhow::Result<CourseId> {
        match normalize(&self.course).id() {
            Some(id) => Ok(id),
            None => bail!("unknown course '{}' for {}", self.course, self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_job_uses_defaults() {
        let job: DanJob = serde_json::from_str(
            r#"{ "title": "初段", "songs": [ { "path": "a.tja", "course": "ura" } ] }"#,
        )
        .unwrap();
        assert_eq!(job.genre, "段位道場");
        assert_eq!(job.color, DanColor::Red);
        assert_eq!(job.songs[0].course_id().unwrap(), CourseId::Edit);
        assert!(job
            .exam_slots()
            .unwrap()
            .iter()
            .all(|s| *s == ExamSlotSource::Disabled));
    }

    #[test]
    fn too_many_exam_slots_is_an_error() {
        let job: DanJob = serde_json::from_str(
            r#"{ "title": "t", "songs": [], "exams": ["disabled", "disabled", "disabled", "disabled", "disabled"] }"#,
        )
        .unwrap();
        assert!(job.exam_slots().is_err());
    }

    #[test]
    fn unknown_course_is_rejected() {
        let song = JobSong {
            path: PathBuf::from("a.tja"),
            course: "tower".to_string(),
        };
        let err = song.course_id().unwrap_err();
        assert!(err.to_string().contains("unknown course 'tower'"));
    }
}
