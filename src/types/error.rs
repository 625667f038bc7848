use thiserror::Error;

use super::ids::{CourseId, GroupId};

/// Data errors in a single course's prerequisite rules.
///
/// These are fatal for the course being checked but not for an
/// eligibility listing as a whole; see
/// [`CyclePolicy`](crate::CyclePolicy).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("cyclic prerequisite groups in course {course}: {}", join_path(path))]
    CyclicRuleGraph { course: CourseId, path: Vec<GroupId> },

    #[error("unknown group type '{value}' on group {group} of course {course}")]
    UnknownGroupType {
        course: CourseId,
        group: GroupId,
        value: String,
    },

    #[error("unknown operator-to-next '{value}' on group {group} of course {course}")]
    UnknownOperator {
        course: CourseId,
        group: GroupId,
        value: String,
    },

    #[error("rows of group {group} in course {course} disagree on group type")]
    ConflictingGroupType { course: CourseId, group: GroupId },

    #[error("rule row for course {found} found among the rules of course {course}")]
    ForeignRow { course: CourseId, found: CourseId },
}

impl RuleError {
    /// The course whose rules are malformed.
    #[must_use]
    pub fn course(&self) -> CourseId {
        match self {
            RuleError::CyclicRuleGraph { course, .. }
            | RuleError::UnknownGroupType { course, .. }
            | RuleError::UnknownOperator { course, .. }
            | RuleError::ConflictingGroupType { course, .. }
            | RuleError::ForeignRow { course, .. } => *course,
        }
    }
}

fn join_path(path: &[GroupId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
