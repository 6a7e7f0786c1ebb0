//! Node (patient) and time window types.

use serde::{Deserialize, Serialize};

/// A time window constraint for service start at a node.
///
/// Service may not start before `ready`. Starting after `due` is allowed
/// but accrues tardiness.
///
/// # Examples
///
/// ```
/// use u_homecare::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.ready() <= tw.due());
/// assert_eq!(tw.earliest_start(50.0), 100.0);
/// assert_eq!(tw.tardiness(230.0), 30.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// A window that never constrains nor penalizes (used for the depot).
    pub fn unbounded() -> Self {
        Self {
            ready: 0.0,
            due: f64::MAX,
        }
    }

    /// Earliest allowable service start.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest service start without tardiness.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Service start for a vehicle reaching the node at `arrival`.
    ///
    /// Early vehicles wait until the window opens.
    pub fn earliest_start(&self, arrival: f64) -> f64 {
        self.ready.max(arrival)
    }

    /// Amount by which `start` exceeds the due time (zero if on time).
    pub fn tardiness(&self, start: f64) -> f64 {
        (start - self.due).max(0.0)
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.ready.is_finite() && self.ready <= self.due
    }
}

/// How many vehicles a node needs and how their services are synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// One skill, one vehicle.
    Single,
    /// Two skills, two vehicles starting at the same time.
    #[serde(alias = "sim")]
    Simultaneous,
    /// Two skills, two vehicles, second start within `[min, max]` after the first.
    Precedence,
}

impl ServiceType {
    /// Returns `true` for the two double-service types.
    pub fn is_double(&self) -> bool {
        !matches!(self, ServiceType::Single)
    }

    /// Number of (vehicle, skill) slots a task at this node uses.
    pub fn num_slots(&self) -> usize {
        if self.is_double() {
            2
        } else {
            1
        }
    }
}

/// Minimum and maximum separation between the two service starts of a
/// precedence node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Separation {
    /// Minimum gap `start1 - start0`.
    pub min: f64,
    /// Maximum gap `start1 - start0`.
    pub max: f64,
}

impl Separation {
    /// Creates a separation window.
    ///
    /// Returns `None` if `min > max` or either value is non-finite.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return None;
        }
        Some(Self { min, max })
    }

    /// A zero-width window, as used by simultaneous services.
    pub fn zero() -> Self {
        Self { min: 0.0, max: 0.0 }
    }
}

/// A skill required at a node together with its processing time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillDemand {
    /// Skill identifier.
    pub skill: usize,
    /// Service duration for this skill.
    pub processing_time: f64,
}

/// A node (patient or depot) in a home health care instance.
///
/// Node 0 is conventionally the depot. A patient node requires one skill
/// (single service) or two skills (simultaneous or precedence double
/// service); the demand order fixes which skill is served by slot 0 and
/// which by slot 1.
///
/// # Examples
///
/// ```
/// use u_homecare::models::{Node, ServiceType, TimeWindow};
///
/// let depot = Node::depot(0.0, 0.0);
/// assert!(depot.demands().is_empty());
///
/// let n = Node::new(1, 3.0, 4.0)
///     .with_time_window(TimeWindow::new(0.0, 100.0).unwrap())
///     .with_single_service(2, 15.0);
/// assert_eq!(n.service_type(), ServiceType::Single);
/// assert_eq!(n.processing_time(2), 15.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    x: f64,
    y: f64,
    #[serde(default = "TimeWindow::unbounded")]
    time_window: TimeWindow,
    #[serde(default = "default_service_type")]
    service_type: ServiceType,
    #[serde(default)]
    demands: Vec<SkillDemand>,
    #[serde(default)]
    separation: Option<Separation>,
}

fn default_service_type() -> ServiceType {
    ServiceType::Single
}

impl Node {
    /// Creates a node with an unbounded time window and no demands.
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            time_window: TimeWindow::unbounded(),
            service_type: ServiceType::Single,
            demands: Vec::new(),
            separation: None,
        }
    }

    /// Creates the depot at the given coordinates (id=0).
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(0, x, y)
    }

    /// Sets the service time window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = tw;
        self
    }

    /// Requires a single skill at this node.
    pub fn with_single_service(mut self, skill: usize, processing_time: f64) -> Self {
        self.service_type = ServiceType::Single;
        self.demands = vec![SkillDemand {
            skill,
            processing_time,
        }];
        self.separation = None;
        self
    }

    /// Requires two skills served at the same start time.
    pub fn with_simultaneous_service(mut self, first: SkillDemand, second: SkillDemand) -> Self {
        self.service_type = ServiceType::Simultaneous;
        self.demands = vec![first, second];
        self.separation = Some(Separation::zero());
        self
    }

    /// Requires two skills, the second starting within `separation` of the first.
    pub fn with_precedence_service(
        mut self,
        first: SkillDemand,
        second: SkillDemand,
        separation: Separation,
    ) -> Self {
        self.service_type = ServiceType::Precedence;
        self.demands = vec![first, second];
        self.separation = Some(separation);
        self
    }

    /// Node ID (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Service time window.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Service type.
    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    /// Required skills in slot order.
    pub fn demands(&self) -> &[SkillDemand] {
        &self.demands
    }

    /// Separation window (double-service nodes only).
    pub fn separation(&self) -> Option<&Separation> {
        self.separation.as_ref()
    }

    /// Processing time for `skill`, zero if the node does not require it.
    pub fn processing_time(&self, skill: usize) -> f64 {
        self.demands
            .iter()
            .find(|d| d.skill == skill)
            .map_or(0.0, |d| d.processing_time)
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
