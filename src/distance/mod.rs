//! Travel-time matrices.
//!
//! Provides a dense matrix backing [`HhcInstance`](crate::models::HhcInstance).

mod matrix;

pub use matrix::DistanceMatrix;
