//! Consistency violations reported by the solution auditor.

/// A type of inconsistency in a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// A skill required at a node is not served by any route.
    Unserved {
        /// Node missing a service.
        node: usize,
        /// Skill that is not served.
        skill: usize,
    },
    /// A skill at a node is served more than once.
    ServedMoreThanOnce {
        /// Node served repeatedly.
        node: usize,
        /// Repeated skill.
        skill: usize,
        /// Number of visits found.
        count: usize,
    },
    /// A route visits a node or skill the instance does not ask for.
    UnexpectedStop {
        /// Vehicle whose route holds the stop.
        vehicle: usize,
        /// Node of the stop.
        node: usize,
        /// Skill of the stop.
        skill: usize,
    },
    /// A route does not start and end at the depot.
    RouteNotClosed {
        /// Vehicle of the open route.
        vehicle: usize,
    },
    /// A vehicle performs a skill it is not qualified for.
    UnqualifiedVehicle {
        /// Vehicle performing the service.
        vehicle: usize,
        /// Node served.
        node: usize,
        /// Skill performed.
        skill: usize,
    },
    /// Simultaneous services at a node do not start together.
    NotSynchronized {
        /// Node of the double service.
        node: usize,
        /// Start of slot 0.
        start0: f64,
        /// Start of slot 1.
        start1: f64,
    },
    /// The gap between precedence services leaves the separation window.
    SeparationViolated {
        /// Node of the double service.
        node: usize,
        /// Observed `start1 - start0`.
        gap: f64,
        /// Minimum allowed gap.
        min: f64,
        /// Maximum allowed gap.
        max: f64,
    },
    /// A service starts after the node's time window closes.
    TimeWindowViolated {
        /// Node where the service is late.
        node: usize,
        /// Service start.
        start: f64,
        /// Time window due date.
        due: f64,
    },
}

/// A consistency violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }

    /// Returns `true` for violations of the hard structure of a solution.
    ///
    /// Tardiness is priced by the cost model rather than forbidden, so
    /// time-window violations are the only soft kind.
    pub fn is_structural(&self) -> bool {
        !matches!(self.kind, ViolationType::TimeWindowViolated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_kind() {
        let v = Violation::new(ViolationType::Unserved { node: 3, skill: 1 });
        assert_eq!(v.kind, ViolationType::Unserved { node: 3, skill: 1 });
        assert!(v.is_structural());
    }

    #[test]
    fn test_time_window_is_soft() {
        let v = Violation::new(ViolationType::TimeWindowViolated {
            node: 1,
            start: 12.0,
            due: 10.0,
        });
        assert!(!v.is_structural());
    }
}
