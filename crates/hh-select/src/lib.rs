//! # hh-select
//!
//! Per-event object classification for the HH → bbγγ selection.
//!
//! An [`Event`] goes through the vertex gate, truth extraction, lepton
//! identification, jet overlap removal and classification, and photon
//! selection with truth matching. Every derived quantity is pushed to a
//! [`hh_core::StatisticsSink`] under the names declared in [`catalogue`].
//!
//! ```
//! use hh_select::{AnalysisConfig, Analyzer, Event, catalogue};
//!
//! let book = catalogue::book_histograms().unwrap();
//! let mut analyzer = Analyzer::new(AnalysisConfig::default(), book).unwrap();
//! let outcome = analyzer.process_event(&Event::empty()).unwrap();
//! assert!(outcome.is_aborted());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalogue;
pub mod config;
pub mod conversion;
pub mod electron_id;
pub mod event;
pub mod gen_truth;
pub mod jets;
pub mod me0_muon;
pub mod overlap;
pub mod photons;
pub mod pipeline;
pub mod records;
pub mod vertex;

pub use config::{AnalysisConfig, BTagScheme, Me0Cuts, PhotonSelection};
pub use electron_id::{ElectronIdResult, ElectronIdTier, passes_id};
pub use event::Event;
pub use gen_truth::TruthBaseline;
pub use jets::{JetBucket, JetClassification, PfJetId, classify_jets};
pub use me0_muon::is_me0_muon_selected;
pub use overlap::remove_lepton_overlaps;
pub use photons::{DiphotonCandidate, MassRegime, PhotonAnalysis, TruthSlot};
pub use pipeline::{Analyzer, EventOutcome, EventSummary};
pub use records::DetailRecord;
pub use vertex::VertexSelection;
