//! # u-homecare
//!
//! Incremental solution evaluation for the home health care routing problem
//! with synchronized services. Patients may need one service, two services
//! starting together, or two services separated by a bounded delay; vehicles
//! (caregivers) build routes by appending tasks, each priced before commit.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Node, Vehicle, Task, Route, Solution, Instance trait)
//! - [`distance`] — Distance matrix
//! - [`evaluation`] — Cost weights, service timing rules and solution auditing
//! - [`io`] — Writing and replaying plain-text solution files
//! - [`error`] — Error types

pub mod distance;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod models;
