use std::collections::HashSet;

use tracing::{debug, warn};

use crate::store::{EnrollmentStore, StoreError};
use crate::{
    CourseId, CourseOrder, CourseSummary, CyclePolicy, EligibilityConfig, EligibilityError,
    EvaluationReport, PrerequisiteTree, Programme, RuleError, Semester, StudentId,
};

/// Decides which courses a student may select.
///
/// Every operation takes its snapshots (programme, course list, completed and
/// applied courses) once, up front, and evaluates each course against those
/// snapshots with its own evaluator state.
///
/// # Example
///
/// ```
/// use prereq_engine::{
///     CourseId, CourseSummary, EligibilityService, GroupId, GroupType, MemoryStore, Programme,
///     ProgrammeId, RuleRow, StudentId,
/// };
///
/// let cs111 = CourseId(1);
/// let cs211 = CourseId(2);
/// let store = MemoryStore::new()
///     .programme(Programme::new(ProgrammeId(1), "BSE", "Software Engineering"), vec![cs111, cs211])
///     .course(CourseSummary::new(cs111, "CS111", "Introduction to Computing", 850.0))
///     .course(CourseSummary::new(cs211, "CS211", "Data Structures", 850.0))
///     .rules(cs211, vec![RuleRow::new(cs211, GroupId(1), GroupType::And).requires(cs111).top_level()])
///     .student(StudentId(7), Some(ProgrammeId(1)))
///     .completed(StudentId(7), &[cs111]);
///
/// let service = EligibilityService::new(store);
/// let eligible = service.eligible_courses(StudentId(7)).unwrap();
/// assert_eq!(eligible.len(), 1);
/// assert_eq!(eligible[0].code, "CS211");
/// ```
#[derive(Debug)]
pub struct EligibilityService<S> {
    store: S,
    config: EligibilityConfig,
}

/// Read-only data one check runs against.
#[derive(Debug)]
struct Snapshot {
    programme: Programme,
    course_ids: Vec<CourseId>,
    completed: HashSet<CourseId>,
    applied: HashSet<CourseId>,
}

#[derive(Debug)]
enum Assessment {
    Eligible,
    Ineligible,
    Malformed(RuleError),
}

impl<S: EnrollmentStore> EligibilityService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EligibilityConfig::default())
    }

    pub fn with_config(store: S, config: EligibilityConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Courses of the student's programme whose prerequisites are satisfied
    /// and which the student has neither completed nor applied for.
    ///
    /// # Errors
    ///
    /// [`EligibilityError::StudentNotFound`] and
    /// [`EligibilityError::ProgrammeNotFound`] fail the call, as does any
    /// store failure. A course with malformed rules is omitted with a warning
    /// unless the configured [`CyclePolicy`] is `Abort`.
    pub fn eligible_courses(&self, student: StudentId) -> Result<Vec<CourseSummary>, EligibilityError> {
        self.list_eligible(student, None)
    }

    /// Like [`eligible_courses`](Self::eligible_courses), restricted to
    /// courses offered in `semester`.
    ///
    /// # Errors
    ///
    /// Same as [`eligible_courses`](Self::eligible_courses).
    pub fn eligible_courses_for_semester(
        &self,
        student: StudentId,
        semester: Semester,
    ) -> Result<Vec<CourseSummary>, EligibilityError> {
        self.list_eligible(student, Some(semester))
    }

    /// Whether `course` would appear in the student's eligible listing.
    ///
    /// # Errors
    ///
    /// Same as [`eligible_courses`](Self::eligible_courses).
    pub fn is_eligible(&self, student: StudentId, course: CourseId) -> Result<bool, EligibilityError> {
        let snapshot = self.snapshot(student)?;
        if !snapshot.course_ids.contains(&course) || self.already_taken(&snapshot, course) {
            return Ok(false);
        }
        let assessment = self.assess(course, &snapshot.completed)?;
        self.resolve(course, assessment)
    }

    /// Gate for an enrollment request: every selected course must exist and
    /// have its prerequisites completed.
    ///
    /// # Errors
    ///
    /// Returns [`EligibilityError::CourseNotFound`] or
    /// [`EligibilityError::PrerequisitesNotMet`] for the first offending
    /// course, in selection order.
    pub fn verify_selection(
        &self,
        student: StudentId,
        courses: &[CourseId],
    ) -> Result<(), EligibilityError> {
        let snapshot = self.snapshot(student)?;
        for &course in courses {
            let summary = self
                .store
                .find_course_summary(course)?
                .ok_or(EligibilityError::CourseNotFound(course))?;
            let assessment = self.assess(course, &snapshot.completed)?;
            if !self.resolve(course, assessment)? {
                return Err(EligibilityError::PrerequisitesNotMet {
                    course,
                    code: summary.code,
                });
            }
        }
        Ok(())
    }

    /// Per-group diagnostics for one course and student.
    ///
    /// # Errors
    ///
    /// Rule errors are always returned here, whatever the [`CyclePolicy`].
    pub fn explain(
        &self,
        student: StudentId,
        course: CourseId,
    ) -> Result<EvaluationReport, EligibilityError> {
        let snapshot = self.snapshot(student)?;
        let records = self.store.find_rule_rows(course)?;
        let tree = PrerequisiteTree::from_records(course, records)?;
        Ok(tree.evaluate_detailed(&snapshot.completed)?)
    }

    fn list_eligible(
        &self,
        student: StudentId,
        semester: Option<Semester>,
    ) -> Result<Vec<CourseSummary>, EligibilityError> {
        let snapshot = self.snapshot(student)?;

        let mut seen = HashSet::new();
        let candidates: Vec<CourseId> = snapshot
            .course_ids
            .iter()
            .copied()
            .filter(|&course| seen.insert(course))
            .filter(|&course| !self.already_taken(&snapshot, course))
            .collect();

        debug!(
            student_id = %student,
            programme = %snapshot.programme.code,
            candidates = candidates.len(),
            "checking course eligibility"
        );

        let assessments = self.assess_all(&candidates, &snapshot.completed)?;

        let mut eligible = Vec::new();
        for (course, assessment) in assessments {
            if !self.resolve(course, assessment)? {
                continue;
            }
            let Some(summary) = self.store.find_course_summary(course)? else {
                warn!(course_id = %course, "programme lists a course missing from the catalogue");
                continue;
            };
            if semester.is_some_and(|s| !summary.is_offered(s)) {
                continue;
            }
            eligible.push(summary);
        }

        if self.config.order == CourseOrder::ByCode {
            eligible.sort_by(|a, b| a.code.cmp(&b.code));
        }
        Ok(eligible)
    }

    fn snapshot(&self, student: StudentId) -> Result<Snapshot, EligibilityError> {
        if !self.store.student_exists(student)? {
            return Err(EligibilityError::StudentNotFound(student));
        }
        let programme = self
            .store
            .find_programme_for_student(student)?
            .ok_or(EligibilityError::ProgrammeNotFound(student))?;
        let course_ids = self.store.find_course_ids_for_programme(programme.id)?;
        let completed = self.store.find_completed_course_ids(student)?;
        let applied = self.store.find_applied_or_enrolled_course_ids(student)?;

        Ok(Snapshot {
            programme,
            course_ids,
            completed,
            applied,
        })
    }

    fn already_taken(&self, snapshot: &Snapshot, course: CourseId) -> bool {
        snapshot.completed.contains(&course)
            || (self.config.exclude_applied && snapshot.applied.contains(&course))
    }

    fn assess(
        &self,
        course: CourseId,
        completed: &HashSet<CourseId>,
    ) -> Result<Assessment, StoreError> {
        let records = self.store.find_rule_rows(course)?;
        if records.is_empty() {
            return Ok(Assessment::Eligible);
        }
        let outcome = PrerequisiteTree::from_records(course, records)
            .and_then(|tree| tree.evaluate(completed));
        Ok(match outcome {
            Ok(true) => Assessment::Eligible,
            Ok(false) => Assessment::Ineligible,
            Err(err) => Assessment::Malformed(err),
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn assess_all(
        &self,
        courses: &[CourseId],
        completed: &HashSet<CourseId>,
    ) -> Result<Vec<(CourseId, Assessment)>, StoreError> {
        courses
            .iter()
            .map(|&course| Ok((course, self.assess(course, completed)?)))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn assess_all(
        &self,
        courses: &[CourseId],
        completed: &HashSet<CourseId>,
    ) -> Result<Vec<(CourseId, Assessment)>, StoreError> {
        use rayon::prelude::*;

        courses
            .par_iter()
            .map(|&course| Ok((course, self.assess(course, completed)?)))
            .collect()
    }

    fn resolve(&self, course: CourseId, assessment: Assessment) -> Result<bool, EligibilityError> {
        match assessment {
            Assessment::Eligible => {
                debug!(course_id = %course, eligible = true, "prerequisites evaluated");
                Ok(true)
            }
            Assessment::Ineligible => {
                debug!(course_id = %course, eligible = false, "prerequisites evaluated");
                Ok(false)
            }
            Assessment::Malformed(err) => match self.config.cycle_policy {
                CyclePolicy::OmitAndWarn => {
                    warn!(course_id = %course, error = %err, "omitting course with malformed prerequisite rules");
                    Ok(false)
                }
                CyclePolicy::Abort => Err(err.into()),
            },
        }
    }
}
