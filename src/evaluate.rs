use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::{CourseId, EvaluationReport, GroupId, GroupType, PrerequisiteTree, RuleError, RuleRow};

/// Evaluates prerequisite groups of one tree for one completed-course set.
///
/// Holds the memo of finished groups and the stack of groups currently being
/// evaluated. Create a fresh evaluator per course check; results are not
/// meant to be shared across courses.
#[derive(Debug)]
pub struct GroupEvaluator<'a> {
    tree: &'a PrerequisiteTree,
    completed: &'a HashSet<CourseId>,
    cache: HashMap<GroupId, bool>,
    visiting: Vec<GroupId>,
    finished: Vec<(GroupId, bool)>,
}

impl<'a> GroupEvaluator<'a> {
    #[must_use]
    pub fn new(tree: &'a PrerequisiteTree, completed: &'a HashSet<CourseId>) -> Self {
        Self {
            tree,
            completed,
            cache: HashMap::new(),
            visiting: Vec::new(),
            finished: Vec::new(),
        }
    }

    /// Evaluate `group` and, recursively, the groups it references.
    ///
    /// - A group with no rows is vacuously true.
    /// - Special rows contribute no condition.
    /// - A group whose rows produce no condition at all is false.
    ///
    /// Every condition of a group is evaluated (no short-circuit), so a cycle
    /// is reported regardless of which courses the student has completed.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::CyclicRuleGraph`] when `group` is reached again
    /// while it is still being evaluated.
    pub fn evaluate(&mut self, group: GroupId) -> Result<bool, RuleError> {
        if let Some(&cached) = self.cache.get(&group) {
            return Ok(cached);
        }

        if let Some(pos) = self.visiting.iter().position(|&g| g == group) {
            let mut path = self.visiting[pos..].to_vec();
            path.push(group);
            return Err(RuleError::CyclicRuleGraph {
                course: self.tree.course(),
                path,
            });
        }

        let tree = self.tree;
        let rows = tree.rows(group);
        let result = match rows.first() {
            None => true,
            Some(first) => {
                self.visiting.push(group);
                let outcome = self.evaluate_rows(first.group_type, rows);
                self.visiting.pop();
                outcome?
            }
        };

        self.cache.insert(group, result);
        self.finished.push((group, result));
        Ok(result)
    }

    fn evaluate_rows(&mut self, group_type: GroupType, rows: &[RuleRow]) -> Result<bool, RuleError> {
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            if row.special.is_some() {
                continue;
            }
            if let Some(course) = row.prerequisite {
                values.push(self.completed.contains(&course));
            }
            if let Some(child) = row.child_group {
                values.push(self.evaluate(child)?);
            }
        }
        // Fail closed: a group with nothing to check is not satisfied.
        Ok(group_type.reduce(&values).unwrap_or(false))
    }

    /// Cached result of `group`, if it has been evaluated.
    #[must_use]
    pub fn cached(&self, group: GroupId) -> Option<bool> {
        self.cache.get(&group).copied()
    }

    fn into_finished(self) -> Vec<(GroupId, bool)> {
        self.finished
    }
}

/// Combine root results left to right.
///
/// Each step uses the `operator_to_next` found on a top-level-parent row of
/// the previous root, defaulting to AND. No roots means the rules can never
/// be satisfied.
#[must_use]
pub fn combine(
    roots: &[GroupId],
    tree: &PrerequisiteTree,
    root_results: &HashMap<GroupId, bool>,
) -> bool {
    combine_traced(roots, tree, root_results).0
}

fn combine_traced(
    roots: &[GroupId],
    tree: &PrerequisiteTree,
    root_results: &HashMap<GroupId, bool>,
) -> (bool, Vec<GroupType>) {
    let mut ordered = roots.to_vec();
    ordered.sort();
    ordered.dedup();

    let result_of = |group: &GroupId| root_results.get(group).copied().unwrap_or(false);

    let Some((first, rest)) = ordered.split_first() else {
        return (false, Vec::new());
    };

    let mut acc = result_of(first);
    let mut operators = Vec::with_capacity(rest.len());
    let mut previous = *first;
    for next in rest {
        let op = operator_after(tree, previous);
        acc = op.apply(acc, result_of(next));
        operators.push(op);
        previous = *next;
    }
    (acc, operators)
}

fn operator_after(tree: &PrerequisiteTree, group: GroupId) -> GroupType {
    tree.rows(group)
        .iter()
        .filter(|row| row.is_top_level_parent)
        .find_map(|row| row.operator_to_next)
        .unwrap_or(GroupType::And)
}

fn evaluate_roots<'a>(
    tree: &'a PrerequisiteTree,
    completed: &'a HashSet<CourseId>,
) -> Result<(HashMap<GroupId, bool>, GroupEvaluator<'a>), RuleError> {
    let mut evaluator = GroupEvaluator::new(tree, completed);
    let mut root_results = HashMap::with_capacity(tree.roots().len());
    for &root in tree.roots() {
        root_results.insert(root, evaluator.evaluate(root)?);
    }
    Ok((root_results, evaluator))
}

pub(crate) fn evaluate(
    tree: &PrerequisiteTree,
    completed: &HashSet<CourseId>,
) -> Result<bool, RuleError> {
    if tree.is_empty() {
        return Ok(true);
    }
    let (root_results, _) = evaluate_roots(tree, completed)?;
    Ok(combine(tree.roots(), tree, &root_results))
}

pub(crate) fn evaluate_detailed(
    tree: &PrerequisiteTree,
    completed: &HashSet<CourseId>,
) -> Result<EvaluationReport, RuleError> {
    let start = Instant::now();

    if tree.is_empty() {
        return Ok(EvaluationReport::new(
            tree.course(),
            true,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            start.elapsed(),
        ));
    }

    let (root_results, evaluator) = evaluate_roots(tree, completed)?;
    let (eligible, operators) = combine_traced(tree.roots(), tree, &root_results);

    Ok(EvaluationReport::new(
        tree.course(),
        eligible,
        evaluator.into_finished(),
        tree.roots().to_vec(),
        operators,
        start.elapsed(),
    ))
}
