//! Incrementally built solution state.

use std::fmt;

use tracing::{debug, trace};

use super::{Instance, InsertionEstimate, Route, ServiceTiming, ServiceType, Stop, Task};
use crate::error::SolutionError;
use crate::evaluation::timing::{arrival_start, precedence_starts, simultaneous_starts};
use crate::evaluation::{CostSummary, CostWeights};

/// Where a vehicle currently is and when it can leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    /// Last visited node.
    pub position: usize,
    /// Time the vehicle finishes its last service.
    pub leave_time: f64,
}

/// A committed service at one slot of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServedSlot {
    /// Vehicle that performs the service.
    pub vehicle: usize,
    /// Service start.
    pub start_time: f64,
}

/// Committed services of a node, one entry per skill slot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeService {
    /// Slot 0.
    pub primary: Option<ServedSlot>,
    /// Slot 1 (double-service nodes only).
    pub secondary: Option<ServedSlot>,
}

impl NodeService {
    /// Slot by index (0 or 1).
    pub fn slot(&self, index: usize) -> Option<ServedSlot> {
        match index {
            0 => self.primary,
            1 => self.secondary,
            _ => None,
        }
    }

    fn set(&mut self, index: usize, served: ServedSlot) {
        if index == 0 {
            self.primary = Some(served);
        } else {
            self.secondary = Some(served);
        }
    }
}

/// A solution under append-only construction.
///
/// Every vehicle route starts at the depot. Tasks are priced with
/// [`find_insertion_cost`](Solution::find_insertion_cost), which appends the
/// task's node at the end of its vehicle route(s) without touching the
/// solution, and accepted with [`update_routes`](Solution::update_routes).
/// Once every task is committed, [`finish_routes`](Solution::finish_routes)
/// closes the routes at the depot.
///
/// # Examples
///
/// ```
/// use u_homecare::models::{HhcInstance, Node, Solution, Task, TimeWindow, Vehicle};
///
/// let nodes = vec![
///     Node::depot(0.0, 0.0),
///     Node::new(1, 10.0, 0.0)
///         .with_time_window(TimeWindow::new(0.0, 100.0).unwrap())
///         .with_single_service(0, 5.0),
/// ];
/// let inst = HhcInstance::new("demo", nodes, vec![Vehicle::new(0)]);
/// let mut sol = Solution::new(&inst);
///
/// let mut task = Task::single(1, 0);
/// task.assign_primary(0);
/// sol.find_insertion_cost(&mut task).unwrap();
/// assert_eq!(task.leave_time(0), Some(15.0));
///
/// sol.update_routes(&task).unwrap();
/// sol.finish_routes().unwrap();
/// assert!((sol.dist() - 20.0).abs() < 1e-10);
/// ```
pub struct Solution<'a, I: Instance + ?Sized> {
    instance: &'a I,
    weights: CostWeights,
    routes: Vec<Route>,
    vehicles: Vec<VehicleState>,
    services: Vec<NodeService>,
    dist: f64,
    tard: f64,
    tmax: f64,
    cost: f64,
    task_order: Vec<Task>,
    revision: u64,
    finished: bool,
}

impl<'a, I: Instance + ?Sized> Solution<'a, I> {
    /// Creates an empty solution with the default cost weights.
    pub fn new(instance: &'a I) -> Self {
        Self::with_weights(instance, CostWeights::default())
    }

    /// Creates an empty solution: every vehicle at the depot, ready at time 0.
    pub fn with_weights(instance: &'a I, weights: CostWeights) -> Self {
        let num_vehicles = instance.num_vehicles();
        let num_nodes = instance.num_nodes();
        Self {
            instance,
            weights,
            routes: (0..num_vehicles)
                .map(|v| Route::with_capacity(v, num_nodes + 1))
                .collect(),
            vehicles: vec![
                VehicleState {
                    position: 0,
                    leave_time: 0.0,
                };
                num_vehicles
            ],
            services: vec![NodeService::default(); num_nodes],
            dist: 0.0,
            tard: 0.0,
            tmax: 0.0,
            cost: 0.0,
            task_order: Vec::new(),
            revision: 0,
            finished: false,
        }
    }

    /// Prices appending `task` to the end of its vehicle route(s).
    ///
    /// Writes the proposed timings and an [`InsertionEstimate`] into the task
    /// and returns the weighted cost the solution would have after the commit.
    /// The solution itself is not modified, so repeated calls against the same
    /// state give the same result.
    pub fn find_insertion_cost(&self, task: &mut Task) -> Result<f64, SolutionError> {
        let node = self.task_node(task)?;
        let service_type = self.instance.service_type(node);
        match (service_type.is_double(), task.secondary().is_some()) {
            (true, false) => return Err(SolutionError::MissingSecondarySlot { node }),
            (false, true) => return Err(SolutionError::UnexpectedSecondarySlot { node }),
            _ => {}
        }

        let tw = self.instance.time_window(node);
        let v0 = self.slot_vehicle(task, 0)?;
        let travel0 = self.travel_to(v0, node);
        let arrival0 = arrival_start(&tw, self.vehicles[v0].leave_time, travel0);
        let skill0 = task.primary().skill();

        let (start0, second, inc_dist) = match task.secondary() {
            None => (arrival0, None, travel0),
            Some(slot) => {
                let v1 = self.slot_vehicle(task, 1)?;
                let travel1 = self.travel_to(v1, node);
                let arrival1 = arrival_start(&tw, self.vehicles[v1].leave_time, travel1);
                let (start0, start1) = if service_type == ServiceType::Simultaneous {
                    simultaneous_starts(arrival0, arrival1)
                } else {
                    precedence_starts(arrival0, arrival1, &self.instance.separation(node))
                };
                let second = ServiceTiming {
                    start: start1,
                    leave: start1 + self.instance.processing_time(node, slot.skill()),
                };
                (start0, Some(second), travel0 + travel1)
            }
        };

        let first = ServiceTiming {
            start: start0,
            leave: start0 + self.instance.processing_time(node, skill0),
        };
        let tard0 = tw.tardiness(first.start);
        let tard1 = second.map_or(0.0, |t| tw.tardiness(t.start));

        let inc_tard = tard0 + tard1;
        let tmax = tard0.max(tard1);
        let cost = self
            .weights
            .weighted(self.dist + inc_dist, self.tard + inc_tard, self.tmax.max(tmax));

        task.set_timings(first, second);
        task.set_estimate(InsertionEstimate {
            inc_dist,
            inc_tard,
            tmax,
            cost,
            revision: self.revision,
        });
        Ok(cost)
    }

    /// Commits a task evaluated against the current state.
    ///
    /// Appends the task's stops, moves its vehicles to the node and adds the
    /// task's increments to the running totals. The estimate is trusted as is;
    /// one computed before another commit is rejected as stale.
    pub fn update_routes(&mut self, task: &Task) -> Result<(), SolutionError> {
        let node = self.task_node(task)?;
        if self.finished {
            return Err(SolutionError::AlreadyFinished);
        }
        let estimate = *task
            .estimate()
            .ok_or(SolutionError::NotEvaluated { node })?;
        if estimate.revision != self.revision {
            return Err(SolutionError::StaleEstimate {
                node,
                evaluated: estimate.revision,
                current: self.revision,
            });
        }
        for (index, slot) in task.slots().enumerate() {
            self.slot_vehicle(task, index)?;
            if slot.timing().is_none() {
                return Err(SolutionError::NotEvaluated { node });
            }
        }

        for (index, slot) in task.slots().enumerate() {
            let (Some(vehicle), Some(timing)) = (slot.vehicle(), slot.timing()) else {
                continue;
            };
            self.routes[vehicle].push(Stop::new(node, slot.skill()));
            self.vehicles[vehicle] = VehicleState {
                position: node,
                leave_time: timing.leave,
            };
            self.services[node].set(
                index,
                ServedSlot {
                    vehicle,
                    start_time: timing.start,
                },
            );
        }

        self.dist += estimate.inc_dist;
        self.tard += estimate.inc_tard;
        self.tmax = self.tmax.max(estimate.tmax);
        self.cost = estimate.cost;
        self.revision += 1;
        self.task_order.push(task.clone());

        trace!(
            node,
            cost = self.cost,
            dist = self.dist,
            tard = self.tard,
            tmax = self.tmax,
            "committed task"
        );
        Ok(())
    }

    /// Evaluates and immediately commits `task`, returning the new cost.
    pub fn insert(&mut self, task: &mut Task) -> Result<f64, SolutionError> {
        let cost = self.find_insertion_cost(task)?;
        self.update_routes(task)?;
        Ok(cost)
    }

    /// Closes every route at the depot and recomputes the weighted cost.
    ///
    /// Only the return legs change the totals; tardiness is unaffected.
    pub fn finish_routes(&mut self) -> Result<(), SolutionError> {
        if self.finished {
            return Err(SolutionError::AlreadyFinished);
        }
        for route in &mut self.routes {
            let last = route.last().node;
            self.dist += self.instance.distance(last, 0);
            route.push(Stop::DEPOT);
        }
        self.cost = self.weights.weighted(self.dist, self.tard, self.tmax);
        self.finished = true;

        debug!(
            cost = self.cost,
            dist = self.dist,
            tard = self.tard,
            tmax = self.tmax,
            tasks = self.task_order.len(),
            "closed routes"
        );
        Ok(())
    }

    fn task_node(&self, task: &Task) -> Result<usize, SolutionError> {
        let node = task.node();
        let num_nodes = self.services.len();
        if node >= num_nodes {
            return Err(SolutionError::InvalidNode { node, num_nodes });
        }
        Ok(node)
    }

    fn slot_vehicle(&self, task: &Task, index: usize) -> Result<usize, SolutionError> {
        let node = task.node();
        let vehicle = task
            .slot(index)
            .and_then(|s| s.vehicle())
            .ok_or(SolutionError::UnassignedVehicle { node, slot: index })?;
        if vehicle >= self.vehicles.len() {
            return Err(SolutionError::InvalidVehicle {
                vehicle,
                num_vehicles: self.vehicles.len(),
            });
        }
        Ok(vehicle)
    }

    fn travel_to(&self, vehicle: usize, node: usize) -> f64 {
        self.instance.distance(self.vehicles[vehicle].position, node)
    }

    /// Instance this solution is built on.
    pub fn instance(&self) -> &'a I {
        self.instance
    }

    /// Cost weights in use.
    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Current weighted cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Total travel so far.
    pub fn dist(&self) -> f64 {
        self.dist
    }

    /// Total tardiness so far.
    pub fn tard(&self) -> f64 {
        self.tard
    }

    /// Largest tardiness of any committed task.
    pub fn tmax(&self) -> f64 {
        self.tmax
    }

    /// The four headline figures.
    pub fn summary(&self) -> CostSummary {
        CostSummary {
            cost: self.cost,
            dist: self.dist,
            tard: self.tard,
            tmax: self.tmax,
        }
    }

    /// One route per vehicle, indexed by vehicle id.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Route of `vehicle`.
    pub fn route(&self, vehicle: usize) -> Option<&Route> {
        self.routes.get(vehicle)
    }

    /// Position and leave time of `vehicle`.
    pub fn vehicle_state(&self, vehicle: usize) -> Option<VehicleState> {
        self.vehicles.get(vehicle).copied()
    }

    /// Committed services at `node`.
    pub fn node_service(&self, node: usize) -> Option<&NodeService> {
        self.services.get(node)
    }

    /// Committed tasks in build order.
    pub fn task_order(&self) -> &[Task] {
        &self.task_order
    }

    /// Number of commits so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` once the routes are closed at the depot.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<I: Instance + ?Sized> Clone for Solution<'_, I> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance,
            weights: self.weights,
            routes: self.routes.clone(),
            vehicles: self.vehicles.clone(),
            services: self.services.clone(),
            dist: self.dist,
            tard: self.tard,
            tmax: self.tmax,
            cost: self.cost,
            task_order: self.task_order.clone(),
            revision: self.revision,
            finished: self.finished,
        }
    }
}

impl<I: Instance + ?Sized> fmt::Debug for Solution<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solution")
            .field("instance", &self.instance.file_name())
            .field("summary", &self.summary())
            .field("routes", &self.routes)
            .field("revision", &self.revision)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
