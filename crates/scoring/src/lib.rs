//! Priority scoring.
//!
//! Turns a validated task set into scores on a 0-100 scale under one of the
//! fixed [`Mode`](taskrank_core::Mode)s, with a short explanation naming the
//! dominant factor.

#![warn(missing_docs)]

pub mod factors;
pub mod explain;
pub mod engine;

pub use factors::{Factors, Normalizer, EPSILON};
pub use explain::{Factor, dominant, explain, describe};
pub use engine::{ScoringEngine, combine};
