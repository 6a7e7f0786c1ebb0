//! Error types for solution construction, persistence and instance loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while evaluating or committing a task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolutionError {
    /// A task slot has no vehicle assigned.
    #[error("task for node {node} has no vehicle assigned to slot {slot}")]
    UnassignedVehicle { node: usize, slot: usize },
    /// A double-service node was given a single-slot task.
    #[error("task for node {node} needs a second service slot")]
    MissingSecondarySlot { node: usize },
    /// A single-service node was given a two-slot task.
    #[error("task for node {node} carries a second slot but the node needs a single service")]
    UnexpectedSecondarySlot { node: usize },
    /// A vehicle index outside the fleet.
    #[error("vehicle {vehicle} does not exist (fleet has {num_vehicles} vehicles)")]
    InvalidVehicle { vehicle: usize, num_vehicles: usize },
    /// A node index outside the instance.
    #[error("node {node} does not exist (instance has {num_nodes} nodes)")]
    InvalidNode { node: usize, num_nodes: usize },
    /// Commit of a task that was never evaluated.
    #[error("task for node {node} has not been evaluated")]
    NotEvaluated { node: usize },
    /// Commit of an estimate computed against an older solution state.
    #[error(
        "task for node {node} was evaluated at revision {evaluated} \
         but the solution is at revision {current}"
    )]
    StaleEstimate {
        node: usize,
        evaluated: u64,
        current: u64,
    },
    /// The routes were already closed at the depot.
    #[error("routes are already closed at the depot")]
    AlreadyFinished,
}

/// Errors raised while writing or reconstructing a solution file.
#[derive(Debug, Error)]
pub enum SolutionIoError {
    /// The output file could not be created or written.
    #[error("solution file '{}' can not be written", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The input file could not be opened or read.
    #[error("solution file '{}' could not be open to read", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A route block could not be parsed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    /// A route block names a vehicle outside the fleet.
    #[error("route for vehicle {vehicle} but the instance has {num_vehicles} vehicles")]
    VehicleOutOfRange { vehicle: usize, num_vehicles: usize },
    /// A stop names a node outside the instance.
    #[error("vehicle {vehicle} visits unknown node {node}")]
    UnknownNode { vehicle: usize, node: usize },
    /// A double-service stop names a skill the node does not require.
    #[error("node {node} does not require skill {skill}")]
    UnknownSkill { node: usize, skill: usize },
    /// The routes cannot be replayed any further.
    #[error("route replay stalled after committing {committed} tasks")]
    ReplayStalled { committed: usize },
    /// Evaluating or committing a replayed task failed.
    #[error(transparent)]
    Solution(#[from] SolutionError),
}

/// Errors raised while loading an instance description.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// The instance file could not be read.
    #[error("failed to read instance file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The instance JSON could not be decoded.
    #[error("failed to parse instance JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The decoded instance is inconsistent.
    #[error("invalid instance: {reason}")]
    Invalid { reason: String },
}
