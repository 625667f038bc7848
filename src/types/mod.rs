mod course;
mod error;
mod evaluation_report;
mod group_type;
mod ids;
mod rule_row;
mod tree;

pub use course::{CourseSummary, Programme, Semester};
pub use error::RuleError;
pub use evaluation_report::EvaluationReport;
pub use group_type::GroupType;
pub use ids::{CourseId, GroupId, ProgrammeId, StudentId};
pub use rule_row::{PrerequisiteRecord, RuleRow, SpecialCondition, SpecialKind};
pub use tree::PrerequisiteTree;
