//! Route and stop types.

use serde::{Deserialize, Serialize};

/// A single stop within a route: the node visited and the skill performed.
///
/// The depot stop is `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stop {
    /// Node visited.
    pub node: usize,
    /// Skill performed at the node.
    pub skill: usize,
}

impl Stop {
    /// The depot stop.
    pub const DEPOT: Stop = Stop { node: 0, skill: 0 };

    /// Creates a stop.
    pub fn new(node: usize, skill: usize) -> Self {
        Self { node, skill }
    }

    /// Returns `true` for a stop at the depot.
    pub fn is_depot(&self) -> bool {
        self.node == 0
    }
}

/// An ordered, append-only sequence of stops assigned to a single vehicle.
///
/// Routes start with a depot stop and, once closed, end with one. Two routes
/// are equal when their `(node, skill)` sequences are equal.
///
/// # Examples
///
/// ```
/// use u_homecare::models::{Route, Stop};
///
/// let mut route = Route::new(0);
/// route.push(Stop::new(3, 1));
/// assert_eq!(route.len(), 2);
/// assert_eq!(route.num_visits(), 1);
/// assert_eq!(route.last(), Stop::new(3, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    vehicle_id: usize,
    stops: Vec<Stop>,
}

impl Route {
    /// Creates a route holding only the starting depot stop.
    pub fn new(vehicle_id: usize) -> Self {
        Self::with_capacity(vehicle_id, 1)
    }

    /// Like [`Route::new`], reserving room for `capacity` stops.
    pub fn with_capacity(vehicle_id: usize, capacity: usize) -> Self {
        let mut stops = Vec::with_capacity(capacity.max(1));
        stops.push(Stop::DEPOT);
        Self { vehicle_id, stops }
    }

    /// Appends a stop to the end of this route.
    pub fn push(&mut self, stop: Stop) {
        self.stops.push(stop);
    }

    /// Returns the vehicle assigned to this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Returns the ordered stops, depot stops included.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Number of stops, depot stops included.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always `false`: a route holds at least its starting depot stop.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Number of non-depot stops.
    pub fn num_visits(&self) -> usize {
        self.stops.iter().filter(|s| !s.is_depot()).count()
    }

    /// Last stop of the route.
    pub fn last(&self) -> Stop {
        self.stops.last().copied().unwrap_or(Stop::DEPOT)
    }

    /// Returns `true` if the route starts and ends at the depot.
    pub fn is_closed(&self) -> bool {
        self.stops.len() >= 2
            && self.stops.first().is_some_and(Stop::is_depot)
            && self.last().is_depot()
    }

    /// Node ids in visit order, depot stops excluded.
    pub fn node_ids(&self) -> Vec<usize> {
        self.stops
            .iter()
            .filter(|s| !s.is_depot())
            .map(|s| s.node)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_starts_at_depot() {
        let r = Route::new(2);
        assert_eq!(r.vehicle_id(), 2);
        assert_eq!(r.stops(), &[Stop::DEPOT]);
        assert_eq!(r.num_visits(), 0);
        assert!(!r.is_empty());
        assert!(!r.is_closed());
    }

    #[test]
    fn test_route_push() {
        let mut r = Route::new(0);
        r.push(Stop::new(5, 1));
        r.push(Stop::new(3, 0));
        assert_eq!(r.len(), 3);
        assert_eq!(r.node_ids(), vec![5, 3]);
        assert_eq!(r.last(), Stop::new(3, 0));
        r.push(Stop::DEPOT);
        assert!(r.is_closed());
        assert_eq!(r.num_visits(), 2);
    }

    #[test]
    fn test_route_equality_by_stops() {
        let mut a = Route::with_capacity(0, 8);
        let mut b = Route::new(0);
        a.push(Stop::new(1, 0));
        b.push(Stop::new(1, 0));
        assert_eq!(a, b);
        b.push(Stop::new(2, 0));
        assert_ne!(a, b);
        a.push(Stop::new(2, 1));
        assert_ne!(a, b);
    }
}
