//! In-memory store, mainly for tests and demos.

use std::collections::{HashMap, HashSet};

use super::{EnrollmentStore, StoreError};
use crate::{
    CourseId, CourseSummary, PrerequisiteRecord, Programme, ProgrammeId, RuleRow, StudentId,
};

/// An [`EnrollmentStore`] backed by hash maps. Populate it with the builder
/// methods, then hand it to the service; it is never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    students: HashMap<StudentId, Option<ProgrammeId>>,
    programmes: HashMap<ProgrammeId, Programme>,
    programme_courses: HashMap<ProgrammeId, Vec<CourseId>>,
    courses: HashMap<CourseId, CourseSummary>,
    rules: HashMap<CourseId, Vec<PrerequisiteRecord>>,
    completed: HashMap<StudentId, HashSet<CourseId>>,
    applied: HashMap<StudentId, HashSet<CourseId>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a programme and its course list, in listing order.
    #[must_use]
    pub fn programme(mut self, programme: Programme, courses: Vec<CourseId>) -> Self {
        self.programme_courses.insert(programme.id, courses);
        self.programmes.insert(programme.id, programme);
        self
    }

    #[must_use]
    pub fn course(mut self, summary: CourseSummary) -> Self {
        self.courses.insert(summary.id, summary);
        self
    }

    /// Register a student, optionally enrolled in a programme.
    #[must_use]
    pub fn student(mut self, student: StudentId, programme: Option<ProgrammeId>) -> Self {
        self.students.insert(student, programme);
        self
    }

    #[must_use]
    pub fn completed(mut self, student: StudentId, courses: &[CourseId]) -> Self {
        self.completed
            .entry(student)
            .or_default()
            .extend(courses.iter().copied());
        self
    }

    #[must_use]
    pub fn applied(mut self, student: StudentId, courses: &[CourseId]) -> Self {
        self.applied
            .entry(student)
            .or_default()
            .extend(courses.iter().copied());
        self
    }

    /// Append stored prerequisite records for `course`.
    #[must_use]
    pub fn records(mut self, course: CourseId, records: Vec<PrerequisiteRecord>) -> Self {
        self.rules.entry(course).or_default().extend(records);
        self
    }

    /// Append typed rows for `course`, stored in their record shape.
    #[must_use]
    pub fn rules(self, course: CourseId, rows: Vec<RuleRow>) -> Self {
        let records = rows.into_iter().map(PrerequisiteRecord::from).collect();
        self.records(course, records)
    }
}

impl EnrollmentStore for MemoryStore {
    fn student_exists(&self, student: StudentId) -> Result<bool, StoreError> {
        Ok(self.students.contains_key(&student))
    }

    fn find_programme_for_student(
        &self,
        student: StudentId,
    ) -> Result<Option<Programme>, StoreError> {
        Ok(self
            .students
            .get(&student)
            .copied()
            .flatten()
            .and_then(|id| self.programmes.get(&id))
            .cloned())
    }

    fn find_course_ids_for_programme(
        &self,
        programme: ProgrammeId,
    ) -> Result<Vec<CourseId>, StoreError> {
        Ok(self
            .programme_courses
            .get(&programme)
            .cloned()
            .unwrap_or_default())
    }

    fn find_completed_course_ids(&self, student: StudentId) -> Result<HashSet<CourseId>, StoreError> {
        Ok(self.completed.get(&student).cloned().unwrap_or_default())
    }

    fn find_applied_or_enrolled_course_ids(
        &self,
        student: StudentId,
    ) -> Result<HashSet<CourseId>, StoreError> {
        Ok(self.applied.get(&student).cloned().unwrap_or_default())
    }

    fn find_rule_rows(&self, course: CourseId) -> Result<Vec<PrerequisiteRecord>, StoreError> {
        Ok(self.rules.get(&course).cloned().unwrap_or_default())
    }

    fn find_course_summary(&self, course: CourseId) -> Result<Option<CourseSummary>, StoreError> {
        Ok(self.courses.get(&course).cloned())
    }
}
