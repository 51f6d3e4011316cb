use std::fmt;

use tja_schema::CourseId;

/// A course identifier after normalisation. Values outside the canonical set
/// are kept title-cased and never match a `CourseId` lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CourseName {
    Known(CourseId),
    Other(String),
}

impl CourseName {
    pub fn id(&self) -> Option<CourseId> {
        match self {
            CourseName::Known(id) => Some(*id),
            CourseName::Other(_) => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CourseName::Known(id) => id.display_name(),
            CourseName::Other(name) => name,
        }
    }
}

impl fmt::Display for CourseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseName::Known(id) => fmt::Display::fmt(id, f),
            CourseName::Other(name) => f.write_str(name),
        }
    }
}

pub fn normalize(raw: &str) -> CourseName {
    let raw = raw.trim();
    // Only a single digit is a numeric course id.
    if let [digit @ b'0'..=b'9'] = raw.as_bytes() {
        if let Some(id) = CourseId::from_numeric(digit - b'0') {
            return CourseName::Known(id);
        }
    }
    let id = match raw.to_ascii_lowercase().as_str() {
        "easy" => CourseId::Easy,
        "normal" => CourseId::Normal,
        "hard" => CourseId::Hard,
        "oni" => CourseId::Oni,
        "edit" | "ura" => CourseId::Edit,
        _ => return CourseName::Other(title_case(raw)),
    };
    CourseName::Known(id)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_named_courses() {
        let expected = [
            ("0", CourseId::Easy),
            ("1", CourseId::Normal),
            ("2", CourseId::Hard),
            ("3", CourseId::Oni),
            ("4", CourseId::Edit),
            ("easy", CourseId::Easy),
            ("ONI", CourseId::Oni),
            ("ura", CourseId::Edit),
            (" Edit ", CourseId::Edit),
        ];
        for (raw, id) in expected {
            assert_eq!(normalize(raw), CourseName::Known(id), "raw={raw}");
        }
    }

    #[test]
    fn unknown_course_is_title_cased_and_unmatched() {
        let name = normalize("ede");
        assert_eq!(name, CourseName::Other("Ede".to_string()));
        assert_eq!(name.id(), None);
        assert_eq!(normalize("tower mode"), CourseName::Other("Tower Mode".to_string()));
        assert_eq!(normalize("5"), CourseName::Other("5".to_string()));
        assert_eq!(normalize("03"), CourseName::Other("03".to_string()));
        assert_eq!(normalize("+1"), CourseName::Other("+1".to_string()));
    }
}
