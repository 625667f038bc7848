use super::error::RuleError;
use super::group_type::GroupType;
use super::ids::{CourseId, GroupId, ProgrammeId};

/// One flattened edge of a course's prerequisite tree.
///
/// Rows sharing a `group_id` form one AND/OR group. A row contributes a
/// leaf condition through `prerequisite`, a nested group through
/// `child_group`, or nothing at all when it carries a `special` condition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleRow {
    pub course_id: CourseId,
    pub group_id: GroupId,
    pub group_type: GroupType,
    pub prerequisite: Option<CourseId>,
    pub child_group: Option<GroupId>,
    pub is_top_level_parent: bool,
    pub is_child_group: bool,
    pub operator_to_next: Option<GroupType>,
    pub special: Option<SpecialCondition>,
}

impl RuleRow {
    /// Start a row for `course_id` in group `group_id`. The row carries no
    /// condition and is neither a root nor a child until configured.
    #[must_use]
    pub fn new(course_id: CourseId, group_id: GroupId, group_type: GroupType) -> Self {
        Self {
            course_id,
            group_id,
            group_type,
            prerequisite: None,
            child_group: None,
            is_top_level_parent: false,
            is_child_group: false,
            operator_to_next: None,
            special: None,
        }
    }

    /// Leaf condition: the student has completed `course`.
    #[must_use]
    pub fn requires(mut self, course: CourseId) -> Self {
        self.prerequisite = Some(course);
        self
    }

    /// Nested condition: group `child` evaluates to true.
    #[must_use]
    pub fn child(mut self, child: GroupId) -> Self {
        self.child_group = Some(child);
        self
    }

    /// Mark this row's group as a top-level parent.
    #[must_use]
    pub fn top_level(mut self) -> Self {
        self.is_top_level_parent = true;
        self
    }

    /// Mark this row's group as referenced by another group.
    #[must_use]
    pub fn nested(mut self) -> Self {
        self.is_child_group = true;
        self
    }

    /// Operator joining this root group to the next root group.
    #[must_use]
    pub fn then(mut self, op: GroupType) -> Self {
        self.operator_to_next = Some(op);
        self
    }

    /// Attach a non-course condition; the row then contributes no value.
    #[must_use]
    pub fn special(mut self, condition: SpecialCondition) -> Self {
        self.special = Some(condition);
        self
    }

    /// Whether this row marks its group as a root of the requirement tree.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_top_level_parent && !self.is_child_group
    }
}

/// Kinds of non-course prerequisite conditions known to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialKind {
    /// Student must be admitted to a given programme.
    AdmissionToProgramme,
    /// Student must have completed a percentage of a level's courses.
    CompletionOfLevel,
    /// Any other stored spelling, kept verbatim.
    Unrecognized(String),
}

impl SpecialKind {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ADMISSION_PROGRAMME" | "ADMISSION_TO_PROGRAMME" => SpecialKind::AdmissionToProgramme,
            "COMPLETION_LEVEL_PERCENT" | "COMPLETION_OF_LEVEL" => SpecialKind::CompletionOfLevel,
            _ => SpecialKind::Unrecognized(raw.to_owned()),
        }
    }

    /// Stored spelling of the kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SpecialKind::AdmissionToProgramme => "ADMISSION_PROGRAMME",
            SpecialKind::CompletionOfLevel => "COMPLETION_LEVEL_PERCENT",
            SpecialKind::Unrecognized(raw) => raw,
        }
    }
}

/// A prerequisite that is not "completed course X". Stored and carried
/// through, but never evaluated: such rows contribute no condition value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialCondition {
    pub kind: SpecialKind,
    pub target_level: Option<u8>,
    pub percentage_value: Option<f64>,
    pub programme_id: Option<ProgrammeId>,
}

impl SpecialCondition {
    #[must_use]
    pub fn new(kind: SpecialKind) -> Self {
        Self {
            kind,
            target_level: None,
            percentage_value: None,
            programme_id: None,
        }
    }
}

/// A prerequisite row in its stored shape: enum columns as strings, the
/// child reference as a plain integer where `0` means "no child".
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PrerequisiteRecord {
    pub course_id: u64,
    pub group_id: u32,
    pub prerequisite_type: String,
    pub prerequisite_id: Option<u64>,
    pub child_id: i64,
    pub parent: bool,
    pub child: bool,
    pub operator_to_next: Option<String>,
    pub special: bool,
    pub special_type: Option<String>,
    pub target_level: Option<u8>,
    pub percentage_value: Option<f64>,
    pub programme_id: Option<u64>,
}

impl TryFrom<PrerequisiteRecord> for RuleRow {
    type Error = RuleError;

    fn try_from(record: PrerequisiteRecord) -> Result<Self, Self::Error> {
        let course_id = CourseId(record.course_id);
        let group_id = GroupId(record.group_id);

        let group_type = GroupType::parse(&record.prerequisite_type).ok_or_else(|| {
            RuleError::UnknownGroupType {
                course: course_id,
                group: group_id,
                value: record.prerequisite_type.clone(),
            }
        })?;

        let operator_to_next = match record.operator_to_next.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(GroupType::parse(raw).ok_or_else(|| RuleError::UnknownOperator {
                course: course_id,
                group: group_id,
                value: raw.to_owned(),
            })?),
        };

        let child_group = u32::try_from(record.child_id)
            .ok()
            .filter(|&id| id != 0)
            .map(GroupId);

        let special = record.special.then(|| SpecialCondition {
            kind: record
                .special_type
                .as_deref()
                .map_or(SpecialKind::Unrecognized(String::new()), SpecialKind::parse),
            target_level: record.target_level,
            percentage_value: record.percentage_value,
            programme_id: record.programme_id.map(ProgrammeId),
        });

        Ok(RuleRow {
            course_id,
            group_id,
            group_type,
            prerequisite: record.prerequisite_id.map(CourseId),
            child_group,
            is_top_level_parent: record.parent,
            is_child_group: record.child,
            operator_to_next,
            special,
        })
    }
}

impl From<RuleRow> for PrerequisiteRecord {
    fn from(row: RuleRow) -> Self {
        let special = row.special.as_ref();
        PrerequisiteRecord {
            course_id: row.course_id.get(),
            group_id: row.group_id.get(),
            prerequisite_type: row.group_type.to_string(),
            prerequisite_id: row.prerequisite.map(CourseId::get),
            child_id: row.child_group.map_or(0, |g| i64::from(g.get())),
            parent: row.is_top_level_parent,
            child: row.is_child_group,
            operator_to_next: row.operator_to_next.map(|op| op.to_string()),
            special: special.is_some(),
            special_type: special.map(|s| s.kind.name().to_owned()),
            target_level: special.and_then(|s| s.target_level),
            percentage_value: special.and_then(|s| s.percentage_value),
            programme_id: special.and_then(|s| s.programme_id).map(ProgrammeId::get),
        }
    }
}
