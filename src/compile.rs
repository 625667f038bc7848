use std::collections::{BTreeMap, BTreeSet};

use crate::{CourseId, GroupId, PrerequisiteTree, RuleError, RuleRow};

/// Arrange a course's flat rows into a [`PrerequisiteTree`].
///
/// Rows are grouped by `group_id`; roots are the deduplicated, ascending set
/// of groups flagged top-level-parent and not child.
pub(crate) fn compile(course: CourseId, rows: Vec<RuleRow>) -> Result<PrerequisiteTree, RuleError> {
    check_ownership(course, &rows)?;

    let mut groups: BTreeMap<GroupId, Vec<RuleRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.group_id).or_default().push(row);
    }

    check_group_types(course, &groups)?;
    report_dangling_children(course, &groups);

    let roots = find_roots(&groups);

    Ok(PrerequisiteTree {
        course,
        groups,
        roots,
    })
}

fn check_ownership(course: CourseId, rows: &[RuleRow]) -> Result<(), RuleError> {
    match rows.iter().find(|row| row.course_id != course) {
        Some(row) => Err(RuleError::ForeignRow {
            course,
            found: row.course_id,
        }),
        None => Ok(()),
    }
}

fn check_group_types(
    course: CourseId,
    groups: &BTreeMap<GroupId, Vec<RuleRow>>,
) -> Result<(), RuleError> {
    for (&group, rows) in groups {
        let mut types = rows.iter().map(|r| r.group_type);
        if let Some(first) = types.next()
            && types.any(|t| t != first)
        {
            return Err(RuleError::ConflictingGroupType { course, group });
        }
    }
    Ok(())
}

fn find_roots(groups: &BTreeMap<GroupId, Vec<RuleRow>>) -> Vec<GroupId> {
    let roots: BTreeSet<GroupId> = groups
        .values()
        .flatten()
        .filter(|row| row.is_root())
        .map(|row| row.group_id)
        .collect();
    roots.into_iter().collect()
}

/// Child references to groups with no rows evaluate vacuously true; they are
/// legal but usually a sign of a half-deleted rule.
fn report_dangling_children(course: CourseId, groups: &BTreeMap<GroupId, Vec<RuleRow>>) {
    for row in groups.values().flatten() {
        if let Some(child) = row.child_group
            && !groups.contains_key(&child)
        {
            tracing::debug!(
                course_id = %course,
                group_id = %row.group_id,
                child_group_id = %child,
                "child group has no rows; treating as satisfied"
            );
        }
    }
}
