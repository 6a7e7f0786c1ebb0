//! Solution auditor that checks coverage, route shape and synchronization.

use super::timing::SEPARATION_TOLERANCE;
use crate::models::{Instance, ServiceType, SkillDemand, Solution, Violation, ViolationType};

/// Checks a solution's committed state against its instance.
///
/// Nothing is recomputed: the auditor inspects routes and cached service
/// starts, reporting every required skill that is missing or repeated, every
/// unexpected or unqualified stop, open routes, broken synchronization and
/// late services.
///
/// # Examples
///
/// ```
/// use u_homecare::models::{HhcInstance, Node, Solution, Task, Vehicle};
/// use u_homecare::evaluation::SolutionAuditor;
///
/// let nodes = vec![Node::depot(0.0, 0.0), Node::new(1, 3.0, 4.0).with_single_service(0, 1.0)];
/// let inst = HhcInstance::new("audit", nodes, vec![Vehicle::new(0)]);
/// let mut sol = Solution::new(&inst);
/// let mut task = Task::single(1, 0);
/// task.assign_primary(0);
/// sol.insert(&mut task).unwrap();
/// sol.finish_routes().unwrap();
///
/// assert!(SolutionAuditor::new().audit(&sol).is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolutionAuditor {
    tolerance: f64,
}

impl SolutionAuditor {
    /// Creates an auditor using the precedence tolerance for time comparisons.
    pub fn new() -> Self {
        Self {
            tolerance: SEPARATION_TOLERANCE,
        }
    }

    /// Sets the slack allowed on synchronization and separation checks.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Audits `solution`, returning every violation found (empty if consistent).
    pub fn audit<I: Instance + ?Sized>(&self, solution: &Solution<'_, I>) -> Vec<Violation> {
        let mut violations = self.audit_routes(solution);
        violations.extend(self.audit_timing(solution));
        violations
    }

    fn audit_routes<I: Instance + ?Sized>(&self, solution: &Solution<'_, I>) -> Vec<Violation> {
        let instance = solution.instance();
        let num_nodes = instance.num_nodes();
        let mut violations = Vec::new();

        // Visits per demand slot, parallel to each node's demands.
        let mut seen: Vec<Vec<usize>> = (0..num_nodes)
            .map(|node| vec![0; instance.demands(node).len()])
            .collect();

        for route in solution.routes() {
            let vehicle = route.vehicle_id();
            if !route.is_closed() {
                violations.push(Violation::new(ViolationType::RouteNotClosed { vehicle }));
            }

            for stop in route.stops().iter().filter(|s| !s.is_depot()) {
                let unexpected = Violation::new(ViolationType::UnexpectedStop {
                    vehicle,
                    node: stop.node,
                    skill: stop.skill,
                });
                if stop.node >= num_nodes {
                    violations.push(unexpected);
                    continue;
                }

                let counts = &mut seen[stop.node];
                let Some(slot) = claim_slot(instance.demands(stop.node), counts, stop.skill) else {
                    violations.push(unexpected);
                    continue;
                };
                counts[slot] += 1;

                if !instance.vehicle_has_skill(vehicle, stop.skill) {
                    violations.push(Violation::new(ViolationType::UnqualifiedVehicle {
                        vehicle,
                        node: stop.node,
                        skill: stop.skill,
                    }));
                }
            }
        }

        for (node, counts) in seen.iter().enumerate().skip(1) {
            for (demand, &count) in instance.demands(node).iter().zip(counts) {
                let skill = demand.skill;
                match count {
                    0 => violations.push(Violation::new(ViolationType::Unserved { node, skill })),
                    1 => {}
                    count => violations.push(Violation::new(ViolationType::ServedMoreThanOnce {
                        node,
                        skill,
                        count,
                    })),
                }
            }
        }

        violations
    }

    fn audit_timing<I: Instance + ?Sized>(&self, solution: &Solution<'_, I>) -> Vec<Violation> {
        let instance = solution.instance();
        let mut violations = Vec::new();

        for node in 1..instance.num_nodes() {
            let Some(service) = solution.node_service(node) else {
                continue;
            };
            let tw = instance.time_window(node);

            for served in [service.primary, service.secondary].into_iter().flatten() {
                if tw.tardiness(served.start_time) > 0.0 {
                    violations.push(Violation::new(ViolationType::TimeWindowViolated {
                        node,
                        start: served.start_time,
                        due: tw.due(),
                    }));
                }
            }

            let (Some(first), Some(second)) = (service.primary, service.secondary) else {
                continue;
            };
            let (start0, start1) = (first.start_time, second.start_time);
            match instance.service_type(node) {
                ServiceType::Simultaneous if (start1 - start0).abs() > self.tolerance => {
                    violations.push(Violation::new(ViolationType::NotSynchronized {
                        node,
                        start0,
                        start1,
                    }));
                }
                ServiceType::Precedence => {
                    let sep = instance.separation(node);
                    let gap = start1 - start0;
                    if gap + self.tolerance < sep.min || gap - self.tolerance > sep.max {
                        violations.push(Violation::new(ViolationType::SeparationViolated {
                            node,
                            gap,
                            min: sep.min,
                            max: sep.max,
                        }));
                    }
                }
                _ => {}
            }
        }

        violations
    }
}

/// Demand slot a visit with `skill` counts against: the first unvisited
/// matching slot, else the first matching one.
fn claim_slot(demands: &[SkillDemand], counts: &[usize], skill: usize) -> Option<usize> {
    let mut matching = (0..demands.len()).filter(|&i| demands[i].skill == skill);
    let first = matching.next()?;
    Some(
        std::iter::once(first)
            .chain(matching)
            .find(|&i| counts[i] == 0)
            .unwrap_or(first),
    )
}

impl Default for SolutionAuditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HhcInstance, Node, Separation, Task, TimeWindow, Vehicle};

    fn demand(skill: usize) -> SkillDemand {
        SkillDemand {
            skill,
            processing_time: 2.0,
        }
    }

    fn setup() -> HhcInstance {
        let sep = Separation::new(5.0, 10.0).expect("valid");
        let nodes = vec![
            Node::depot(0.0, 0.0),
            Node::new(1, 3.0, 4.0)
                .with_time_window(TimeWindow::new(0.0, 100.0).expect("valid"))
                .with_single_service(0, 5.0),
            Node::new(2, 6.0, 8.0)
                .with_time_window(TimeWindow::new(0.0, 100.0).expect("valid"))
                .with_precedence_service(demand(0), demand(1), sep),
        ];
        let vehicles = vec![
            Vehicle::new(0).with_skills(vec![0]),
            Vehicle::new(1).with_skills(vec![1]),
        ];
        HhcInstance::new("audit", nodes, vehicles)
    }

    fn kinds(violations: &[Violation]) -> Vec<ViolationType> {
        violations.iter().map(|v| v.kind.clone()).collect()
    }

    #[test]
    fn test_complete_solution_is_clean() {
        let inst = setup();
        let mut sol = Solution::new(&inst);
        let mut t1 = Task::single(1, 0);
        t1.assign_primary(0);
        sol.insert(&mut t1).expect("insert");
        let mut t2 = Task::double(2, 0, 1);
        t2.assign_primary(0);
        t2.assign_secondary(1);
        sol.insert(&mut t2).expect("insert");
        sol.finish_routes().expect("close");

        assert!(SolutionAuditor::new().audit(&sol).is_empty());
    }

    #[test]
    fn test_open_routes_and_unserved() {
        let inst = setup();
        let sol = Solution::new(&inst);
        let found = kinds(&SolutionAuditor::new().audit(&sol));
        assert!(found.contains(&ViolationType::RouteNotClosed { vehicle: 0 }));
        assert!(found.contains(&ViolationType::RouteNotClosed { vehicle: 1 }));
        assert!(found.contains(&ViolationType::Unserved { node: 1, skill: 0 }));
        assert!(found.contains(&ViolationType::Unserved { node: 2, skill: 0 }));
        assert!(found.contains(&ViolationType::Unserved { node: 2, skill: 1 }));
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn test_unqualified_vehicle() {
        let inst = setup();
        let mut sol = Solution::new(&inst);
        let mut t1 = Task::single(1, 0);
        t1.assign_primary(1);
        sol.insert(&mut t1).expect("insert");
        let found = kinds(&SolutionAuditor::new().audit(&sol));
        assert!(found.contains(&ViolationType::UnqualifiedVehicle {
            vehicle: 1,
            node: 1,
            skill: 0
        }));
    }

    #[test]
    fn test_served_twice() {
        let inst = setup();
        let mut sol = Solution::new(&inst);
        for _ in 0..2 {
            let mut t = Task::single(1, 0);
            t.assign_primary(0);
            sol.insert(&mut t).expect("insert");
        }
        let found = kinds(&SolutionAuditor::new().audit(&sol));
        assert!(found.contains(&ViolationType::ServedMoreThanOnce {
            node: 1,
            skill: 0,
            count: 2
        }));
    }

    #[test]
    fn test_unexpected_skill() {
        let inst = setup();
        let mut sol = Solution::new(&inst);
        // Skill 3 is not demanded anywhere; the task still evaluates since
        // node 1 is single-service.
        let mut t = Task::single(1, 3);
        t.assign_primary(0);
        sol.insert(&mut t).expect("insert");
        let found = kinds(&SolutionAuditor::new().audit(&sol));
        assert!(found.contains(&ViolationType::UnexpectedStop {
            vehicle: 0,
            node: 1,
            skill: 3
        }));
    }

    #[test]
    fn test_late_service_reported() {
        let nodes = vec![
            Node::depot(0.0, 0.0),
            Node::new(1, 30.0, 40.0)
                .with_time_window(TimeWindow::new(0.0, 20.0).expect("valid"))
                .with_single_service(0, 1.0),
        ];
        let inst = HhcInstance::new("late", nodes, vec![Vehicle::new(0)]);
        let mut sol = Solution::new(&inst);
        let mut t = Task::single(1, 0);
        t.assign_primary(0);
        sol.insert(&mut t).expect("insert");
        sol.finish_routes().expect("close");

        let violations = SolutionAuditor::new().audit(&sol);
        assert_eq!(violations.len(), 1);
        assert!(!violations[0].is_structural());
        assert!(matches!(
            violations[0].kind,
            ViolationType::TimeWindowViolated { node: 1, .. }
        ));
    }

    #[test]
    fn test_precedence_committed_within_window() {
        let inst = setup();
        let mut sol = Solution::new(&inst);
        let mut t = Task::double(2, 0, 1);
        t.assign_primary(0);
        t.assign_secondary(1);
        sol.insert(&mut t).expect("insert");
        let svc = sol.node_service(2).expect("node exists");
        let gap =
            svc.secondary.expect("served").start_time - svc.primary.expect("served").start_time;
        assert!((gap - 5.0).abs() < 1e-10);
        let strict = SolutionAuditor::new().with_tolerance(0.0);
        assert!(!kinds(&strict.audit(&sol))
            .iter()
            .any(|k| matches!(k, ViolationType::SeparationViolated { .. })));
    }
}
