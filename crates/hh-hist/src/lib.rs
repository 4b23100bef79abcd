//! # hh-hist
//!
//! Fixed-binning histograms and profiles for the HH selection, and the
//! [`HistogramBook`] accumulator that implements
//! [`hh_core::StatisticsSink`].
//!
//! Binning is declared once from [`HistogramSpec`]/[`ProfileSpec`] and never
//! changes. Independent books with identical booking merge bin-wise, which
//! is how per-worker results are combined after a parallel run.
//!
//! ```
//! use hh_core::StatisticsSink;
//! use hh_hist::{HistogramBook, HistogramSpec};
//!
//! let mut book = HistogramBook::from_specs(&[HistogramSpec::new("GoodJetsN", ";N;Events", 14, 0.0, 14.0)], &[]).unwrap();
//! book.fill("GoodJetsN", 3.0);
//! assert_eq!(book.histogram("GoodJetsN").unwrap().entries, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod book;
pub mod histogram;

pub use book::{HistogramBook, HistogramSpec, ProfileSpec};
pub use histogram::{Histogram, Profile};
