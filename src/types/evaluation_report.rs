use std::fmt;
use std::time::Duration;

use super::group_type::GroupType;
use super::ids::{CourseId, GroupId};

/// Detailed evaluation report returned by
/// [`PrerequisiteTree::evaluate_detailed()`](super::tree::PrerequisiteTree::evaluate_detailed).
///
/// Contains the verdict, every evaluated group's result in the order the
/// evaluator finished it, the root order with the operators joining the
/// roots, and the wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    course: CourseId,
    eligible: bool,
    group_results: Vec<(GroupId, bool)>,
    roots: Vec<GroupId>,
    operators: Vec<GroupType>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        course: CourseId,
        eligible: bool,
        group_results: Vec<(GroupId, bool)>,
        roots: Vec<GroupId>,
        operators: Vec<GroupType>,
        duration: Duration,
    ) -> Self {
        Self {
            course,
            eligible,
            group_results,
            roots,
            operators,
            duration,
        }
    }

    #[must_use]
    pub fn course(&self) -> CourseId {
        self.course
    }

    /// Same value [`PrerequisiteTree::evaluate()`](super::tree::PrerequisiteTree::evaluate) returns.
    #[must_use]
    pub fn eligible(&self) -> bool {
        self.eligible
    }

    /// Group results in completion order (children before their parents).
    #[must_use]
    pub fn group_results(&self) -> &[(GroupId, bool)] {
        &self.group_results
    }

    /// Result of one group, `None` if it was never reached.
    #[must_use]
    pub fn group_result(&self, group: GroupId) -> Option<bool> {
        self.group_results
            .iter()
            .find(|(g, _)| *g == group)
            .map(|&(_, result)| result)
    }

    /// Root groups in combination order.
    #[must_use]
    pub fn roots(&self) -> &[GroupId] {
        &self.roots
    }

    /// `operators()[i]` joins `roots()[i]` to `roots()[i + 1]`.
    #[must_use]
    pub fn operators(&self) -> &[GroupType] {
        &self.operators
    }

    /// Groups that evaluated to `false`.
    #[must_use]
    pub fn unsatisfied(&self) -> Vec<GroupId> {
        self.group_results
            .iter()
            .filter(|(_, result)| !result)
            .map(|&(group, _)| group)
            .collect()
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "course {}: eligible = {}", self.course, self.eligible)?;
        let groups: Vec<String> = self
            .group_results
            .iter()
            .map(|(group, result)| format!("{group}={result}"))
            .collect();
        write!(f, ", groups: [{}]", groups.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
