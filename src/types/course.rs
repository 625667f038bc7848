use std::fmt;

use super::ids::{CourseId, ProgrammeId};

/// Teaching semester within an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Semester {
    One,
    Two,
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semester::One => write!(f, "semester 1"),
            Semester::Two => write!(f, "semester 2"),
        }
    }
}

/// Display data for a course offered to a student.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CourseSummary {
    pub id: CourseId,
    pub code: String,
    pub title: String,
    pub cost: f64,
    pub offered_sem1: bool,
    pub offered_sem2: bool,
}

impl CourseSummary {
    /// A summary offered in both semesters.
    #[must_use]
    pub fn new(id: CourseId, code: impl Into<String>, title: impl Into<String>, cost: f64) -> Self {
        Self {
            id,
            code: code.into(),
            title: title.into(),
            cost,
            offered_sem1: true,
            offered_sem2: true,
        }
    }

    #[must_use]
    pub fn offered_in(mut self, sem1: bool, sem2: bool) -> Self {
        self.offered_sem1 = sem1;
        self.offered_sem2 = sem2;
        self
    }

    #[must_use]
    pub fn is_offered(&self, semester: Semester) -> bool {
        match semester {
            Semester::One => self.offered_sem1,
            Semester::Two => self.offered_sem2,
        }
    }
}

impl fmt::Display for CourseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({:.2})", self.code, self.title, self.cost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Programme {
    pub id: ProgrammeId,
    pub code: String,
    pub name: String,
}

impl Programme {
    #[must_use]
    pub fn new(id: ProgrammeId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
        }
    }
}
