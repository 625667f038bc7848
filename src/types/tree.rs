use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::error::RuleError;
use super::evaluation_report::EvaluationReport;
use super::group_type::GroupType;
use super::ids::{CourseId, GroupId};
use super::rule_row::{PrerequisiteRecord, RuleRow};

/// One course's prerequisite rules, indexed by group.
///
/// Built from the flat rows the store returns; immutable afterwards and safe
/// to share across threads. Evaluation keeps its memo and cycle guard on the
/// stack of the caller, so a tree can be evaluated concurrently for any
/// number of students.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use prereq_engine::{CourseId, GroupId, GroupType, PrerequisiteTree, RuleRow};
///
/// let course = CourseId(200);
/// let tree = PrerequisiteTree::from_rows(
///     course,
///     vec![
///         RuleRow::new(course, GroupId(1), GroupType::Or).requires(CourseId(1)).top_level(),
///         RuleRow::new(course, GroupId(1), GroupType::Or).requires(CourseId(2)).top_level(),
///     ],
/// )
/// .unwrap();
///
/// let completed = HashSet::from([CourseId(2)]);
/// assert!(tree.evaluate(&completed).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct PrerequisiteTree {
    pub(crate) course: CourseId,
    pub(crate) groups: BTreeMap<GroupId, Vec<RuleRow>>,
    /// Root groups, deduplicated and ascending.
    pub(crate) roots: Vec<GroupId>,
}

impl PrerequisiteTree {
    /// Index typed rows for `course`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a row belongs to another course or the rows
    /// of one group disagree on their group type.
    pub fn from_rows(course: CourseId, rows: Vec<RuleRow>) -> Result<Self, RuleError> {
        crate::compile::compile(course, rows)
    }

    /// Convert stored records and index them.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] for unknown group types or operators, as well as
    /// everything [`from_rows`](Self::from_rows) rejects.
    pub fn from_records(
        course: CourseId,
        records: impl IntoIterator<Item = PrerequisiteRecord>,
    ) -> Result<Self, RuleError> {
        let rows = records
            .into_iter()
            .map(RuleRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(course, rows)
    }

    /// Decide whether a student with `completed` courses satisfies the rules.
    ///
    /// A tree with no rows imposes no requirement. A tree with rows but no
    /// root group can never be satisfied.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::CyclicRuleGraph`] if a group reaches itself
    /// through its child references.
    pub fn evaluate(&self, completed: &HashSet<CourseId>) -> Result<bool, RuleError> {
        crate::evaluate::evaluate(self, completed)
    }

    /// Evaluate with per-group diagnostics.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`](Self::evaluate).
    pub fn evaluate_detailed(
        &self,
        completed: &HashSet<CourseId>,
    ) -> Result<EvaluationReport, RuleError> {
        crate::evaluate::evaluate_detailed(self, completed)
    }

    #[must_use]
    pub fn course(&self) -> CourseId {
        self.course
    }

    /// True when the course has no prerequisite rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn roots(&self) -> &[GroupId] {
        &self.roots
    }

    /// Rows of `group`, empty if the group has none.
    #[must_use]
    pub fn rows(&self, group: GroupId) -> &[RuleRow] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or_default()
    }

    /// The group's combination logic, or `None` if the group has no rows.
    #[must_use]
    pub fn group_type(&self, group: GroupId) -> Option<GroupType> {
        self.rows(group).first().map(|row| row.group_type)
    }

    /// All group ids in ascending order.
    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.keys().copied()
    }

    /// Courses referenced by leaf conditions anywhere in the tree.
    #[must_use]
    pub fn referenced_courses(&self) -> Vec<CourseId> {
        let mut courses: Vec<CourseId> = self
            .groups
            .values()
            .flatten()
            .filter(|row| row.special.is_none())
            .filter_map(|row| row.prerequisite)
            .collect();
        courses.sort();
        courses.dedup();
        courses
    }
}

impl fmt::Display for PrerequisiteTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PrerequisiteTree(course {}, {} groups, {} roots)",
            self.course,
            self.groups.len(),
            self.roots.len(),
        )
    }
}
