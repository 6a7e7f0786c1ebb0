//! Domain model types for home health care routing.
//!
//! Provides the instance abstraction (nodes with time windows and skill
//! demands, vehicles with qualifications), candidate tasks, routes as
//! append-only stop sequences, and the incrementally built solution.

mod instance;
mod node;
mod route;
mod solution;
mod task;
mod vehicle;
mod violation;

pub use instance::{HhcInstance, Instance};
pub use node::{Node, Separation, ServiceType, SkillDemand, TimeWindow};
pub use route::{Route, Stop};
pub use solution::{NodeService, ServedSlot, Solution, VehicleState};
pub use task::{create_task_list, InsertionEstimate, ServiceTiming, Task, TaskSlot};
pub use vehicle::Vehicle;
pub use violation::{Violation, ViolationType};
