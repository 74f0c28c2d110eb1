//! Virtual machine configuration.

use strum::{Display, EnumIter};

/// How revisits are counted against [`VmConfig::max_node_visits`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum VisitBudget {
    /// One budget per instruction address, shared by every incoming path.
    #[default]
    PerAddress,
    /// One budget per (predecessor address, address) edge.
    ///
    /// Two loops that share a join address are bounded independently.
    PerEdge,
}

/// Resource ceilings of the [`crate::emulation::VirtualMachine`].
///
/// # Default Values
///
/// | Setting | Default Value |
/// |---------|---------------|
/// | `max_node_visits` | 100 |
/// | `max_call_depth` | 50 |
/// | `visit_budget` | [`VisitBudget::PerAddress`] |
/// | `max_array_length` | 4096 |
///
/// # Example
///
/// ```rust
/// use smaliscope::emulation::{VisitBudget, VmConfig};
///
/// let config = VmConfig::new()
///     .with_max_node_visits(20)
///     .with_visit_budget(VisitBudget::PerEdge);
/// assert_eq!(config.max_call_depth, 50);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum accepted visits of one address within one method execution.
    ///
    /// The visit after the last accepted one aborts the method with
    /// [`crate::emulation::ExecutionError::RevisitCeilingExceeded`]. This bounds the
    /// unrolling of loops whose trip count cannot be resolved.
    pub max_node_visits: usize,

    /// Maximum nesting of method executions, static initializers included.
    ///
    /// Entering one level deeper aborts that call with
    /// [`crate::emulation::ExecutionError::CallDepthExceeded`].
    pub max_call_depth: usize,

    /// How visits are keyed when counting against `max_node_visits`.
    pub visit_budget: VisitBudget,

    /// Longest array tracked element by element.
    ///
    /// Longer allocations produce an unknown array.
    pub max_array_length: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_node_visits: 100,
            max_call_depth: 50,
            visit_budget: VisitBudget::PerAddress,
            max_array_length: 4096,
        }
    }
}

impl VmConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the revisit ceiling.
    #[must_use]
    pub fn with_max_node_visits(mut self, max_node_visits: usize) -> Self {
        self.max_node_visits = max_node_visits;
        self
    }

    /// Sets the call depth ceiling.
    #[must_use]
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Sets how revisits are counted.
    #[must_use]
    pub fn with_visit_budget(mut self, visit_budget: VisitBudget) -> Self {
        self.visit_budget = visit_budget;
        self
    }

    /// Sets the longest tracked array.
    #[must_use]
    pub fn with_max_array_length(mut self, max_array_length: usize) -> Self {
        self.max_array_length = max_array_length;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_defaults() {
        let config = VmConfig::default();
        assert_eq!(config.max_node_visits, 100);
        assert_eq!(config.max_call_depth, 50);
        assert_eq!(config.visit_budget, VisitBudget::PerAddress);
        assert_eq!(config.max_array_length, 4096);
    }

    #[test]
    fn test_builder_chain() {
        let config = VmConfig::new()
            .with_max_node_visits(5)
            .with_max_call_depth(2)
            .with_visit_budget(VisitBudget::PerEdge)
            .with_max_array_length(8);
        assert_eq!(
            config,
            VmConfig {
                max_node_visits: 5,
                max_call_depth: 2,
                visit_budget: VisitBudget::PerEdge,
                max_array_length: 8,
            }
        );
    }

    #[test]
    fn test_visit_budget_names() {
        let names: Vec<String> = VisitBudget::iter().map(|b| b.to_string()).collect();
        assert_eq!(names, ["per-address", "per-edge"]);
    }
}
