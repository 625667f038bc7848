use std::fmt;

/// Boolean logic joining conditions inside a group, or joining one root
/// group to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum GroupType {
    And,
    Or,
}

impl GroupType {
    /// Parse the stored spelling (`AND` / `OR`, any case, surrounding
    /// whitespace ignored).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("and") {
            Some(GroupType::And)
        } else if raw.eq_ignore_ascii_case("or") {
            Some(GroupType::Or)
        } else {
            None
        }
    }

    /// Apply the operator to two already-computed values.
    #[must_use]
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            GroupType::And => lhs && rhs,
            GroupType::Or => lhs || rhs,
        }
    }

    /// Reduce a non-empty list of condition values. Returns `None` for an
    /// empty list; callers decide what an empty group means.
    #[must_use]
    pub fn reduce(self, values: &[bool]) -> Option<bool> {
        if values.is_empty() {
            return None;
        }
        Some(match self {
            GroupType::And => values.iter().all(|&v| v),
            GroupType::Or => values.iter().any(|&v| v),
        })
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupType::And => write!(f, "AND"),
            GroupType::Or => write!(f, "OR"),
        }
    }
}
