//! Cost model, service timing rules and solution auditing.
//!
//! - [`CostWeights`] / [`CostSummary`] — weighted distance/tardiness/max-tardiness objective
//! - [`timing`] — arrival and synchronization rules used by insertion evaluation
//! - [`SolutionAuditor`] — coverage, route shape and synchronization checks

mod cost;
mod evaluator;
pub mod timing;

pub use cost::{CostSummary, CostWeights};
pub use evaluator::SolutionAuditor;
