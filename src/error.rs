use thiserror::Error;

use crate::store::StoreError;
use crate::{CourseId, RuleError, StudentId};

/// Unified error type for [`EligibilityService`](crate::EligibilityService)
/// operations.
#[derive(Debug, Error)]
pub enum EligibilityError {
    #[error("student {0} not found")]
    StudentNotFound(StudentId),

    #[error("no current programme for student {0}")]
    ProgrammeNotFound(StudentId),

    #[error("course {0} not found")]
    CourseNotFound(CourseId),

    #[error("prerequisites not completed for course {code}")]
    PrerequisitesNotMet { course: CourseId, code: String },

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
