//! Course-prerequisite eligibility.
//!
//! A course's prerequisites are stored as flat rows forming nested AND/OR
//! groups. [`PrerequisiteTree`] indexes those rows by group and decides, for
//! a set of completed courses, whether the requirements are met.
//! [`EligibilityService`] runs that decision over a student's programme.

mod compile;
mod config;
mod error;
mod evaluate;
mod service;
pub mod store;
mod types;

pub use config::{CourseOrder, CyclePolicy, EligibilityConfig};
pub use error::EligibilityError;
pub use evaluate::{GroupEvaluator, combine};
pub use service::EligibilityService;
pub use store::{EnrollmentStore, MemoryStore, StoreError};
pub use types::{
    CourseId, CourseSummary, EvaluationReport, GroupId, GroupType, PrerequisiteRecord,
    PrerequisiteTree, Programme, ProgrammeId, RuleError, RuleRow, Semester, SpecialCondition,
    SpecialKind, StudentId,
};
