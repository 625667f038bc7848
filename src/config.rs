/// What an eligibility listing does when one course's rules are malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CyclePolicy {
    /// Leave the course out of the result and log a warning.
    #[default]
    OmitAndWarn,
    /// Fail the whole call with the rule error.
    Abort,
}

/// Ordering of eligible courses in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CourseOrder {
    /// The order the programme lists its courses in.
    #[default]
    Programme,
    /// Ascending course code.
    ByCode,
}

/// Settings for [`EligibilityService`](crate::EligibilityService).
///
/// # Example
///
/// ```
/// use prereq_engine::{CourseOrder, CyclePolicy, EligibilityConfig};
///
/// let config = EligibilityConfig::new()
///     .cycle_policy(CyclePolicy::Abort)
///     .order(CourseOrder::ByCode);
/// assert!(config.exclude_applied);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EligibilityConfig {
    pub cycle_policy: CyclePolicy,
    pub order: CourseOrder,
    /// Drop courses the student already applied for or is taking.
    pub exclude_applied: bool,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            cycle_policy: CyclePolicy::default(),
            order: CourseOrder::default(),
            exclude_applied: true,
        }
    }
}

impl EligibilityConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    #[must_use]
    pub fn order(mut self, order: CourseOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn exclude_applied(mut self, exclude: bool) -> Self {
        self.exclude_applied = exclude;
        self
    }
}
