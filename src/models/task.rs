//! Candidate insertion records.

use super::Instance;

/// Proposed service timing for one slot of a task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceTiming {
    /// Service start.
    pub start: f64,
    /// Service end (start + processing time).
    pub leave: f64,
}

/// One (vehicle, skill) pair of a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSlot {
    skill: usize,
    vehicle: Option<usize>,
    timing: Option<ServiceTiming>,
}

impl TaskSlot {
    fn new(skill: usize) -> Self {
        Self {
            skill,
            vehicle: None,
            timing: None,
        }
    }

    /// Skill performed in this slot.
    pub fn skill(&self) -> usize {
        self.skill
    }

    /// Assigned vehicle, if any.
    pub fn vehicle(&self) -> Option<usize> {
        self.vehicle
    }

    /// Timing computed by the last evaluation, if any.
    pub fn timing(&self) -> Option<ServiceTiming> {
        self.timing
    }
}

/// Marginal effect of committing a task, as computed by the last evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertionEstimate {
    /// Travel added to the total distance.
    pub inc_dist: f64,
    /// Tardiness added to the total tardiness.
    pub inc_tard: f64,
    /// Worst tardiness among the task's slots.
    pub tmax: f64,
    /// Weighted solution cost if the task were committed.
    pub cost: f64,
    /// Solution revision this estimate was computed against.
    pub revision: u64,
}

/// A service requirement at one node, with its vehicle assignment and the
/// scratch results of insertion evaluation.
///
/// Skills are fixed at creation; vehicles are assigned by the caller before
/// evaluation.
///
/// # Examples
///
/// ```
/// use u_homecare::models::Task;
///
/// let mut task = Task::double(4, 0, 2);
/// task.assign_by_skill(2, 1);
/// assert!(!task.is_fully_assigned());
/// task.assign_primary(0);
/// assert!(task.is_fully_assigned());
/// assert_eq!(task.slot(1).and_then(|s| s.vehicle()), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    node: usize,
    primary: TaskSlot,
    secondary: Option<TaskSlot>,
    estimate: Option<InsertionEstimate>,
}

impl Task {
    /// Creates a single-service task.
    pub fn single(node: usize, skill: usize) -> Self {
        Self {
            node,
            primary: TaskSlot::new(skill),
            secondary: None,
            estimate: None,
        }
    }

    /// Creates a double-service task; `first` is served by slot 0.
    pub fn double(node: usize, first: usize, second: usize) -> Self {
        Self {
            node,
            primary: TaskSlot::new(first),
            secondary: Some(TaskSlot::new(second)),
            estimate: None,
        }
    }

    /// Creates the task for `node` with skills taken from the instance.
    ///
    /// Returns `None` for nodes without demands (the depot).
    pub fn for_node<I: Instance + ?Sized>(instance: &I, node: usize) -> Option<Self> {
        match instance.demands(node) {
            [only] => Some(Self::single(node, only.skill)),
            [first, second] => Some(Self::double(node, first.skill, second.skill)),
            _ => None,
        }
    }

    /// Node served by this task.
    pub fn node(&self) -> usize {
        self.node
    }

    /// Slot 0.
    pub fn primary(&self) -> &TaskSlot {
        &self.primary
    }

    /// Slot 1 (double-service tasks only).
    pub fn secondary(&self) -> Option<&TaskSlot> {
        self.secondary.as_ref()
    }

    /// Slot by index (0 or 1).
    pub fn slot(&self, index: usize) -> Option<&TaskSlot> {
        match index {
            0 => Some(&self.primary),
            1 => self.secondary.as_ref(),
            _ => None,
        }
    }

    /// Iterates the used slots in order.
    pub fn slots(&self) -> impl Iterator<Item = &TaskSlot> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }

    /// Number of used slots.
    pub fn num_slots(&self) -> usize {
        1 + usize::from(self.secondary.is_some())
    }

    /// Assigns the vehicle for slot 0.
    pub fn assign_primary(&mut self, vehicle: usize) {
        self.primary.vehicle = Some(vehicle);
    }

    /// Assigns the vehicle for slot 1. Returns `false` on a single-service task.
    pub fn assign_secondary(&mut self, vehicle: usize) -> bool {
        match self.secondary.as_mut() {
            Some(slot) => {
                slot.vehicle = Some(vehicle);
                true
            }
            None => false,
        }
    }

    /// Assigns `vehicle` to the slot requiring `skill`.
    ///
    /// When both slots require `skill`, the first one without a vehicle is
    /// used, and a vehicle already holding a matching slot keeps it. Otherwise
    /// slot 0 is used if `skill` is its skill, else slot 1 (slot 0 on a
    /// single-service task).
    pub fn assign_by_skill(&mut self, skill: usize, vehicle: usize) {
        let matching = |slot: &TaskSlot| slot.skill == skill;
        if self
            .slots()
            .any(|slot| matching(slot) && slot.vehicle == Some(vehicle))
        {
            return;
        }
        let secondary_open = self
            .secondary
            .as_ref()
            .is_some_and(|slot| matching(slot) && slot.vehicle.is_none());
        let primary_open = matching(&self.primary) && self.primary.vehicle.is_none();

        if secondary_open && !primary_open {
            self.assign_secondary(vehicle);
        } else if matching(&self.primary) || !self.assign_secondary(vehicle) {
            self.assign_primary(vehicle);
        }
    }

    /// Clears all vehicle assignments and evaluation results.
    pub fn clear_vehicles(&mut self) {
        self.primary.vehicle = None;
        self.primary.timing = None;
        if let Some(slot) = self.secondary.as_mut() {
            slot.vehicle = None;
            slot.timing = None;
        }
        self.estimate = None;
    }

    /// Returns `true` if every used slot has a vehicle.
    pub fn is_fully_assigned(&self) -> bool {
        self.slots().all(|s| s.vehicle.is_some())
    }

    /// Result of the last evaluation, if any.
    pub fn estimate(&self) -> Option<&InsertionEstimate> {
        self.estimate.as_ref()
    }

    /// Service start of slot `index` from the last evaluation.
    pub fn start_time(&self, index: usize) -> Option<f64> {
        self.slot(index).and_then(|s| s.timing).map(|t| t.start)
    }

    /// Service end of slot `index` from the last evaluation.
    pub fn leave_time(&self, index: usize) -> Option<f64> {
        self.slot(index).and_then(|s| s.timing).map(|t| t.leave)
    }

    pub(crate) fn set_timings(&mut self, primary: ServiceTiming, secondary: Option<ServiceTiming>) {
        self.primary.timing = Some(primary);
        if let Some(slot) = self.secondary.as_mut() {
            slot.timing = secondary;
        }
    }

    pub(crate) fn set_estimate(&mut self, estimate: InsertionEstimate) {
        self.estimate = Some(estimate);
    }
}

/// Builds one unassigned task per non-depot node, in node order.
///
/// On a validated instance task `i` serves node `i + 1`.
pub fn create_task_list<I: Instance + ?Sized>(instance: &I) -> Vec<Task> {
    (1..instance.num_nodes())
        .filter_map(|node| Task::for_node(instance, node))
        .collect()
}
