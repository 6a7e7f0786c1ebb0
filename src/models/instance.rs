//! Read-only instance queries and an in-memory instance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Node, Separation, ServiceType, SkillDemand, TimeWindow, Vehicle};
use crate::distance::DistanceMatrix;
use crate::error::InstanceError;

/// Query surface over a home health care instance.
///
/// Solutions read node, vehicle and travel-time data exclusively through
/// this trait, so any loader can back them.
///
/// # Examples
///
/// ```
/// use u_homecare::models::{Instance, Separation, ServiceType, SkillDemand, TimeWindow};
///
/// struct TwoNodes;
///
/// impl Instance for TwoNodes {
///     fn file_name(&self) -> &str { "two-nodes" }
///     fn num_vehicles(&self) -> usize { 1 }
///     fn num_nodes(&self) -> usize { 2 }
///     fn node_pos(&self, node: usize) -> (f64, f64) { (node as f64, 0.0) }
///     fn time_window(&self, _node: usize) -> TimeWindow { TimeWindow::unbounded() }
///     fn service_type(&self, _node: usize) -> ServiceType { ServiceType::Single }
///     fn demands(&self, _node: usize) -> &[SkillDemand] { &[] }
///     fn distance(&self, from: usize, to: usize) -> f64 { from.abs_diff(to) as f64 }
/// }
///
/// assert_eq!(TwoNodes.distance(1, 0), 1.0);
/// assert_eq!(TwoNodes.separation(1), Separation::zero());
/// ```
pub trait Instance {
    /// Display name written into solution file headers.
    fn file_name(&self) -> &str;

    /// Number of vehicles.
    fn num_vehicles(&self) -> usize;

    /// Number of nodes including the depot (node 0).
    fn num_nodes(&self) -> usize;

    /// Coordinates of `node`.
    fn node_pos(&self, node: usize) -> (f64, f64);

    /// Service time window of `node`.
    fn time_window(&self, node: usize) -> TimeWindow;

    /// Service type of `node`.
    fn service_type(&self, node: usize) -> ServiceType;

    /// Skills required at `node`, in slot order.
    fn demands(&self, node: usize) -> &[SkillDemand];

    /// Travel time from `from` to `to`.
    fn distance(&self, from: usize, to: usize) -> f64;

    /// Processing time of `skill` at `node`.
    ///
    /// Defaults to a lookup in [`demands`](Instance::demands), zero if absent.
    fn processing_time(&self, node: usize, skill: usize) -> f64 {
        self.demands(node)
            .iter()
            .find(|d| d.skill == skill)
            .map_or(0.0, |d| d.processing_time)
    }

    /// Separation window between the two starts of a double-service node.
    fn separation(&self, _node: usize) -> Separation {
        Separation::zero()
    }

    /// Returns `true` if `vehicle` is qualified for `skill`.
    fn vehicle_has_skill(&self, _vehicle: usize, _skill: usize) -> bool {
        true
    }
}

/// A fully in-memory instance backed by a dense travel-time matrix.
///
/// # Examples
///
/// ```
/// use u_homecare::models::{HhcInstance, Instance, Node, Vehicle};
///
/// let nodes = vec![
///     Node::depot(0.0, 0.0),
///     Node::new(1, 6.0, 8.0).with_single_service(0, 5.0),
/// ];
/// let inst = HhcInstance::new("demo", nodes, vec![Vehicle::new(0)]);
/// assert_eq!(inst.num_nodes(), 2);
/// assert!((inst.distance(0, 1) - 10.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct HhcInstance {
    name: String,
    nodes: Vec<Node>,
    vehicles: Vec<Vehicle>,
    distances: DistanceMatrix,
}

#[derive(Debug, Serialize, Deserialize)]
struct InstanceFile {
    name: String,
    vehicles: Vec<Vehicle>,
    nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distances: Option<Vec<Vec<f64>>>,
}

impl HhcInstance {
    /// Creates an instance with Euclidean travel times.
    pub fn new(name: impl Into<String>, nodes: Vec<Node>, vehicles: Vec<Vehicle>) -> Self {
        let distances = DistanceMatrix::from_nodes(&nodes);
        Self {
            name: name.into(),
            nodes,
            vehicles,
            distances,
        }
    }

    /// Replaces the travel times with an explicit matrix.
    pub fn with_distances(mut self, distances: DistanceMatrix) -> Self {
        self.distances = distances;
        self
    }

    /// Parses and validates an instance from its JSON description.
    pub fn from_json_str(text: &str) -> Result<Self, InstanceError> {
        let file: InstanceFile = serde_json::from_str(text)?;
        let mut instance = Self::new(file.name, file.nodes, file.vehicles);
        if let Some(rows) = file.distances {
            let matrix = DistanceMatrix::from_rows(&rows).ok_or_else(|| InstanceError::Invalid {
                reason: String::from("distance matrix is not square"),
            })?;
            instance = instance.with_distances(matrix);
        }
        instance.validate()?;
        Ok(instance)
    }

    /// Reads an instance from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Serializes this instance (including its travel times) to JSON.
    pub fn to_json_string(&self) -> Result<String, InstanceError> {
        let n = self.distances.size();
        let rows = (0..n)
            .map(|i| (0..n).map(|j| self.distances.get(i, j)).collect())
            .collect();
        let file = InstanceFile {
            name: self.name.clone(),
            vehicles: self.vehicles.clone(),
            nodes: self.nodes.clone(),
            distances: Some(rows),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Checks that ids are contiguous and each node's demands match its service type.
    pub fn validate(&self) -> Result<(), InstanceError> {
        let invalid = |reason: String| Err(InstanceError::Invalid { reason });

        if self.nodes.is_empty() {
            return invalid(String::from("instance has no depot"));
        }
        if self.distances.size() != self.nodes.len() {
            return invalid(format!(
                "distance matrix has size {} but the instance has {} nodes",
                self.distances.size(),
                self.nodes.len()
            ));
        }
        for (i, v) in self.vehicles.iter().enumerate() {
            if v.id() != i {
                return invalid(format!("vehicle at position {i} has id {}", v.id()));
            }
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id() != i {
                return invalid(format!("node at position {i} has id {}", node.id()));
            }
            if !node.time_window().is_well_formed() {
                return invalid(format!("node {i} has a malformed time window"));
            }
            if i == 0 {
                if !node.demands().is_empty() {
                    return invalid(String::from("depot must not require any skill"));
                }
                continue;
            }
            let expected = node.service_type().num_slots();
            if node.demands().len() != expected {
                return invalid(format!(
                    "node {i} is {:?} and needs {expected} skill demands, found {}",
                    node.service_type(),
                    node.demands().len()
                ));
            }
            if node.service_type().is_double() {
                match node.separation() {
                    Some(sep) if Separation::new(sep.min, sep.max).is_some() => {}
                    _ => return invalid(format!("node {i} has no valid separation window")),
                }
            }
        }
        Ok(())
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All nodes (index 0 = depot).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All vehicles.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Travel-time matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

impl Instance for HhcInstance {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn node_pos(&self, node: usize) -> (f64, f64) {
        let n = &self.nodes[node];
        (n.x(), n.y())
    }

    fn time_window(&self, node: usize) -> TimeWindow {
        *self.nodes[node].time_window()
    }

    fn service_type(&self, node: usize) -> ServiceType {
        self.nodes[node].service_type()
    }

    fn demands(&self, node: usize) -> &[SkillDemand] {
        self.nodes[node].demands()
    }

    fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    fn processing_time(&self, node: usize, skill: usize) -> f64 {
        self.nodes[node].processing_time(skill)
    }

    fn separation(&self, node: usize) -> Separation {
        self.nodes[node]
            .separation()
            .copied()
            .unwrap_or_else(Separation::zero)
    }

    fn vehicle_has_skill(&self, vehicle: usize, skill: usize) -> bool {
        self.vehicles[vehicle].has_skill(skill)
    }
}
