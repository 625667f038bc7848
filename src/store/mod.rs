//! Access to enrollment data the eligibility checks read.
//!
//! The engine never writes through this interface; every call returns a
//! snapshot the service holds for the duration of one check.

mod memory;

use std::collections::HashSet;
use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

use crate::{CourseId, CourseSummary, PrerequisiteRecord, Programme, ProgrammeId, StudentId};

pub use memory::MemoryStore;

/// Failure reported by an [`EnrollmentStore`] backend.
#[derive(Debug, Error)]
#[error("enrollment store error: {message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Read-only view of students, programmes, enrollments and prerequisite rows.
pub trait EnrollmentStore: Send + Sync {
    fn student_exists(&self, student: StudentId) -> Result<bool, StoreError>;

    /// The student's current programme, if any.
    fn find_programme_for_student(
        &self,
        student: StudentId,
    ) -> Result<Option<Programme>, StoreError>;

    /// Courses of a programme, in the programme's listing order.
    fn find_course_ids_for_programme(
        &self,
        programme: ProgrammeId,
    ) -> Result<Vec<CourseId>, StoreError>;

    fn find_completed_course_ids(&self, student: StudentId) -> Result<HashSet<CourseId>, StoreError>;

    /// Courses the student applied for or is currently taking.
    fn find_applied_or_enrolled_course_ids(
        &self,
        student: StudentId,
    ) -> Result<HashSet<CourseId>, StoreError>;

    /// Flat prerequisite rows of a course; empty if it has none.
    fn find_rule_rows(&self, course: CourseId) -> Result<Vec<PrerequisiteRecord>, StoreError>;

    fn find_course_summary(&self, course: CourseId) -> Result<Option<CourseSummary>, StoreError>;
}

impl<T: EnrollmentStore + ?Sized> EnrollmentStore for Arc<T> {
    fn student_exists(&self, student: StudentId) -> Result<bool, StoreError> {
        (**self).student_exists(student)
    }

    fn find_programme_for_student(
        &self,
        student: StudentId,
    ) -> Result<Option<Programme>, StoreError> {
        (**self).find_programme_for_student(student)
    }

    fn find_course_ids_for_programme(
        &self,
        programme: ProgrammeId,
    ) -> Result<Vec<CourseId>, StoreError> {
        (**self).find_course_ids_for_programme(programme)
    }

    fn find_completed_course_ids(&self, student: StudentId) -> Result<HashSet<CourseId>, StoreError> {
        (**self).find_completed_course_ids(student)
    }

    fn find_applied_or_enrolled_course_ids(
        &self,
        student: StudentId,
    ) -> Result<HashSet<CourseId>, StoreError> {
        (**self).find_applied_or_enrolled_course_ids(student)
    }

    fn find_rule_rows(&self, course: CourseId) -> Result<Vec<PrerequisiteRecord>, StoreError> {
        (**self).find_rule_rows(course)
    }

    fn find_course_summary(&self, course: CourseId) -> Result<Option<CourseSummary>, StoreError> {
        (**self).find_course_summary(course)
    }
}
