//! # hh-core
//!
//! Shared building blocks for the HH → bbγγ selection:
//! four-vector kinematics, the statistics sink abstraction and the common
//! error type. Higher-level crates (`hh-hist`, `hh-select`) depend only on
//! this crate for their seams.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{Observation, RecordingSink, StatisticsSink};
pub use types::{LorentzVector, delta_phi, delta_r};
