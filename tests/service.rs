use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use prereq_engine::{
    CourseId, CourseOrder, CourseSummary, CyclePolicy, EligibilityConfig, EligibilityError,
    EligibilityService, EnrollmentStore, GroupId, GroupType, MemoryStore, PrerequisiteRecord,
    Programme, ProgrammeId, RuleError, RuleRow, Semester, StoreError, StudentId,
};

const STUDENT: StudentId = StudentId(7);
const BSE: ProgrammeId = ProgrammeId(1);

const CS111: CourseId = CourseId(1);
const MA111: CourseId = CourseId(2);
const MA161: CourseId = CourseId(3);
const CS211: CourseId = CourseId(4);
const CS218: CourseId = CourseId(5);
const CS241: CourseId = CourseId(6);
const BROKEN: CourseId = CourseId(9);

fn catalogue() -> MemoryStore {
    MemoryStore::new()
        .programme(
            Programme::new(BSE, "BSE", "Bachelor of Software Engineering"),
            vec![CS111, MA111, MA161, CS211, CS218, CS241],
        )
        .course(CourseSummary::new(CS111, "CS111", "Introduction to Computing", 850.0))
        .course(CourseSummary::new(MA111, "MA111", "Calculus I", 700.0).offered_in(true, false))
        .course(CourseSummary::new(MA161, "MA161", "Discrete Mathematics", 700.0).offered_in(false, true))
        .course(CourseSummary::new(CS211, "CS211", "Data Structures", 900.0))
        .course(CourseSummary::new(CS218, "CS218", "Mobile Computing", 900.0).offered_in(false, true))
        .course(CourseSummary::new(CS241, "CS241", "Software Engineering", 900.0))
        // CS211: CS111
        .rules(
            CS211,
            vec![RuleRow::new(CS211, GroupId(1), GroupType::And).requires(CS111).top_level()],
        )
        // CS218: CS111 and (MA111 or MA161)
        .rules(
            CS218,
            vec![
                RuleRow::new(CS218, GroupId(1), GroupType::And).requires(CS111).top_level(),
                RuleRow::new(CS218, GroupId(1), GroupType::And).child(GroupId(2)).top_level(),
                RuleRow::new(CS218, GroupId(2), GroupType::Or).requires(MA111).nested(),
                RuleRow::new(CS218, GroupId(2), GroupType::Or).requires(MA161).nested(),
            ],
        )
        // CS241: CS211 or (MA111 and MA161)
        .rules(
            CS241,
            vec![
                RuleRow::new(CS241, GroupId(1), GroupType::And)
                    .requires(CS211)
                    .top_level()
                    .then(GroupType::Or),
                RuleRow::new(CS241, GroupId(2), GroupType::And).requires(MA111).top_level(),
                RuleRow::new(CS241, GroupId(2), GroupType::And).requires(MA161).top_level(),
            ],
        )
        .student(STUDENT, Some(BSE))
}

fn with_broken_course(store: MemoryStore) -> MemoryStore {
    store
        .programme(
            Programme::new(BSE, "BSE", "Bachelor of Software Engineering"),
            vec![CS111, BROKEN, CS211],
        )
        .course(CourseSummary::new(BROKEN, "XX999", "Loops Forever", 1.0))
        .rules(
            BROKEN,
            vec![RuleRow::new(BROKEN, GroupId(3), GroupType::And).child(GroupId(3)).top_level()],
        )
}

fn codes(courses: Vec<CourseSummary>) -> Vec<String> {
    courses.into_iter().map(|c| c.code).collect()
}

#[test]
fn fresh_student_gets_unconstrained_courses() {
    let service = EligibilityService::new(catalogue());
    assert_eq!(
        codes(service.eligible_courses(STUDENT).unwrap()),
        vec!["CS111", "MA111", "MA161"]
    );
}

#[test]
fn completed_and_applied_courses_are_excluded() {
    let store = catalogue()
        .completed(STUDENT, &[CS111, MA161])
        .applied(STUDENT, &[CS211]);
    let service = EligibilityService::new(store);
    assert_eq!(
        codes(service.eligible_courses(STUDENT).unwrap()),
        vec!["MA111", "CS218"]
    );
}

#[test]
fn applied_courses_kept_when_configured() {
    let store = catalogue().completed(STUDENT, &[CS111]).applied(STUDENT, &[CS211]);
    let service =
        EligibilityService::with_config(store, EligibilityConfig::new().exclude_applied(false));
    assert!(codes(service.eligible_courses(STUDENT).unwrap()).contains(&"CS211".to_owned()));
}

#[test]
fn nested_rule_needs_one_maths_course() {
    let store = catalogue().completed(STUDENT, &[CS111]);
    let service = EligibilityService::new(store);
    assert!(!service.is_eligible(STUDENT, CS218).unwrap());

    let store = catalogue().completed(STUDENT, &[CS111, MA111]);
    let service = EligibilityService::new(store);
    assert!(service.is_eligible(STUDENT, CS218).unwrap());
}

#[test]
fn root_groups_joined_by_or() {
    let service = EligibilityService::new(catalogue().completed(STUDENT, &[MA111, MA161]));
    assert!(service.is_eligible(STUDENT, CS241).unwrap());

    let service = EligibilityService::new(catalogue().completed(STUDENT, &[MA111]));
    assert!(!service.is_eligible(STUDENT, CS241).unwrap());
}

#[test]
fn completed_course_is_not_eligible_again() {
    let service = EligibilityService::new(catalogue().completed(STUDENT, &[CS111]));
    assert!(!service.is_eligible(STUDENT, CS111).unwrap());
}

#[test]
fn semester_filter() {
    let store = catalogue().completed(STUDENT, &[CS111, MA111]);
    let service = EligibilityService::new(store);
    assert_eq!(
        codes(service.eligible_courses_for_semester(STUDENT, Semester::One).unwrap()),
        vec!["CS211"]
    );
    assert_eq!(
        codes(service.eligible_courses_for_semester(STUDENT, Semester::Two).unwrap()),
        vec!["MA161", "CS211", "CS218"]
    );
}

#[test]
fn order_by_code() {
    let store = MemoryStore::new()
        .programme(Programme::new(BSE, "BSE", "Software"), vec![CS211, MA111, CS111])
        .course(CourseSummary::new(CS111, "CS111", "Intro", 1.0))
        .course(CourseSummary::new(MA111, "MA111", "Calculus", 1.0))
        .course(CourseSummary::new(CS211, "CS211", "Data Structures", 1.0))
        .student(STUDENT, Some(BSE));
    let service = EligibilityService::with_config(
        store.clone(),
        EligibilityConfig::new().order(CourseOrder::ByCode),
    );
    assert_eq!(
        codes(service.eligible_courses(STUDENT).unwrap()),
        vec!["CS111", "CS211", "MA111"]
    );

    let service = EligibilityService::new(store);
    assert_eq!(
        codes(service.eligible_courses(STUDENT).unwrap()),
        vec!["CS211", "MA111", "CS111"]
    );
}

#[test]
fn duplicate_programme_entries_listed_once() {
    let store = MemoryStore::new()
        .programme(Programme::new(BSE, "BSE", "Software"), vec![CS111, CS111])
        .course(CourseSummary::new(CS111, "CS111", "Intro", 1.0))
        .student(STUDENT, Some(BSE));
    let service = EligibilityService::new(store);
    assert_eq!(codes(service.eligible_courses(STUDENT).unwrap()), vec!["CS111"]);
}

#[test]
fn course_missing_from_catalogue_is_skipped() {
    let store = MemoryStore::new()
        .programme(Programme::new(BSE, "BSE", "Software"), vec![CS111, CourseId(77)])
        .course(CourseSummary::new(CS111, "CS111", "Intro", 1.0))
        .student(STUDENT, Some(BSE));
    let service = EligibilityService::new(store);
    assert_eq!(codes(service.eligible_courses(STUDENT).unwrap()), vec!["CS111"]);
}

#[test]
fn malformed_course_omitted_by_default() {
    let service = EligibilityService::new(with_broken_course(catalogue()));
    assert_eq!(codes(service.eligible_courses(STUDENT).unwrap()), vec!["CS111"]);
    assert!(!service.is_eligible(STUDENT, BROKEN).unwrap());
}

#[test]
fn malformed_course_aborts_when_configured() {
    let service = EligibilityService::with_config(
        with_broken_course(catalogue()),
        EligibilityConfig::new().cycle_policy(CyclePolicy::Abort),
    );
    let err = service.eligible_courses(STUDENT).unwrap_err();
    assert!(matches!(
        err,
        EligibilityError::Rule(RuleError::CyclicRuleGraph { course, .. }) if course == BROKEN
    ));
}

#[test]
fn unknown_group_type_handled_like_cycle() {
    let store = catalogue().records(
        CS111,
        vec![PrerequisiteRecord {
            course_id: CS111.get(),
            group_id: 1,
            prerequisite_type: "XOR".into(),
            prerequisite_id: Some(MA111.get()),
            parent: true,
            ..PrerequisiteRecord::default()
        }],
    );
    let service = EligibilityService::new(store.clone());
    assert!(!codes(service.eligible_courses(STUDENT).unwrap()).contains(&"CS111".to_owned()));

    let service = EligibilityService::with_config(
        store,
        EligibilityConfig::new().cycle_policy(CyclePolicy::Abort),
    );
    assert!(matches!(
        service.eligible_courses(STUDENT),
        Err(EligibilityError::Rule(RuleError::UnknownGroupType { .. }))
    ));
}

#[test]
fn student_without_programme() {
    let store = catalogue().student(StudentId(8), None);
    let service = EligibilityService::new(store);
    assert!(matches!(
        service.eligible_courses(StudentId(8)),
        Err(EligibilityError::ProgrammeNotFound(StudentId(8)))
    ));
}

#[test]
fn unknown_student() {
    let service = EligibilityService::new(catalogue());
    assert!(matches!(
        service.eligible_courses(StudentId(99)),
        Err(EligibilityError::StudentNotFound(StudentId(99)))
    ));
}

#[test]
fn verify_selection_passes_when_prerequisites_met() {
    let service = EligibilityService::new(catalogue().completed(STUDENT, &[CS111, MA161]));
    service.verify_selection(STUDENT, &[CS211, CS218]).unwrap();
}

#[test]
fn verify_selection_rejects_first_unmet_course() {
    let service = EligibilityService::new(catalogue().completed(STUDENT, &[CS111]));
    let err = service.verify_selection(STUDENT, &[CS211, CS218, CS241]).unwrap_err();
    assert_eq!(err.to_string(), "prerequisites not completed for course CS218");
}

#[test]
fn verify_selection_unknown_course() {
    let service = EligibilityService::new(catalogue());
    assert!(matches!(
        service.verify_selection(STUDENT, &[CourseId(404)]),
        Err(EligibilityError::CourseNotFound(CourseId(404)))
    ));
}

#[test]
fn explain_reports_groups() {
    let service = EligibilityService::new(catalogue().completed(STUDENT, &[CS111]));
    let report = service.explain(STUDENT, CS218).unwrap();
    assert!(!report.eligible());
    assert_eq!(report.group_result(GroupId(2)), Some(false));
    assert_eq!(report.group_result(GroupId(1)), Some(false));
    assert_eq!(report.unsatisfied(), vec![GroupId(2), GroupId(1)]);
}

#[test]
fn explain_surfaces_rule_errors() {
    let service = EligibilityService::new(with_broken_course(catalogue()));
    assert!(matches!(
        service.explain(STUDENT, BROKEN),
        Err(EligibilityError::Rule(RuleError::CyclicRuleGraph { .. }))
    ));
}

/// Wraps a store, counting snapshot reads and optionally failing rule reads.
struct InstrumentedStore {
    inner: MemoryStore,
    completed_reads: AtomicUsize,
    fail_rules: bool,
}

impl InstrumentedStore {
    fn new(inner: MemoryStore, fail_rules: bool) -> Self {
        Self {
            inner,
            completed_reads: AtomicUsize::new(0),
            fail_rules,
        }
    }
}

impl EnrollmentStore for InstrumentedStore {
    fn student_exists(&self, student: StudentId) -> Result<bool, StoreError> {
        self.inner.student_exists(student)
    }

    fn find_programme_for_student(
        &self,
        student: StudentId,
    ) -> Result<Option<Programme>, StoreError> {
        self.inner.find_programme_for_student(student)
    }

    fn find_course_ids_for_programme(
        &self,
        programme: ProgrammeId,
    ) -> Result<Vec<CourseId>, StoreError> {
        self.inner.find_course_ids_for_programme(programme)
    }

    fn find_completed_course_ids(&self, student: StudentId) -> Result<HashSet<CourseId>, StoreError> {
        self.completed_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_completed_course_ids(student)
    }

    fn find_applied_or_enrolled_course_ids(
        &self,
        student: StudentId,
    ) -> Result<HashSet<CourseId>, StoreError> {
        self.inner.find_applied_or_enrolled_course_ids(student)
    }

    fn find_rule_rows(&self, course: CourseId) -> Result<Vec<PrerequisiteRecord>, StoreError> {
        if self.fail_rules {
            return Err(StoreError::new("rule table unavailable"));
        }
        self.inner.find_rule_rows(course)
    }

    fn find_course_summary(&self, course: CourseId) -> Result<Option<CourseSummary>, StoreError> {
        self.inner.find_course_summary(course)
    }
}

#[test]
fn snapshots_read_once_per_call() {
    let service = EligibilityService::new(InstrumentedStore::new(catalogue(), false));
    service.eligible_courses(STUDENT).unwrap();
    assert_eq!(service.store().completed_reads.load(Ordering::SeqCst), 1);
}

#[test]
fn store_failure_is_fatal() {
    let service = EligibilityService::new(InstrumentedStore::new(catalogue(), true));
    let err = service.eligible_courses(STUDENT).unwrap_err();
    assert!(matches!(err, EligibilityError::Store(_)));
    assert_eq!(err.to_string(), "enrollment store error: rule table unavailable");
}
