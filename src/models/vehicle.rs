//! Vehicle (caregiver) type with its skill qualifications.

use serde::{Deserialize, Serialize};

/// A vehicle that performs services, qualified for a set of skills.
///
/// All vehicles start and end at the depot (node 0).
///
/// # Examples
///
/// ```
/// use u_homecare::models::Vehicle;
///
/// let v = Vehicle::new(0).with_skills(vec![0, 2]);
/// assert!(v.has_skill(2));
/// assert!(!v.has_skill(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    #[serde(default)]
    skills: Vec<usize>,
}

impl Vehicle {
    /// Creates a vehicle with no declared skills.
    ///
    /// A vehicle without declared skills is treated as qualified for all of them.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            skills: Vec::new(),
        }
    }

    /// Sets the skills this vehicle is qualified for.
    pub fn with_skills(mut self, skills: Vec<usize>) -> Self {
        self.skills = skills;
        self
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Declared skills.
    pub fn skills(&self) -> &[usize] {
        &self.skills
    }

    /// Returns `true` if this vehicle may perform `skill`.
    pub fn has_skill(&self, skill: usize) -> bool {
        self.skills.is_empty() || self.skills.contains(&skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = Vehicle::new(3);
        assert_eq!(v.id(), 3);
        assert!(v.skills().is_empty());
        assert!(v.has_skill(0));
        assert!(v.has_skill(7));
    }

    #[test]
    fn test_vehicle_skills() {
        let v = Vehicle::new(1).with_skills(vec![1, 2]);
        assert_eq!(v.skills(), &[1, 2]);
        assert!(v.has_skill(1));
        assert!(!v.has_skill(0));
    }
}
