//! Per-event analysis pipeline.
//!
//! [`Analyzer`] owns the configuration and the statistics sink it was
//! constructed with; nothing else survives from one event to the next.

use hh_core::{Result, StatisticsSink};

use crate::catalogue::names;
use crate::config::AnalysisConfig;
use crate::electron_id::ElectronIdResult;
use crate::event::{Event, Met};
use crate::gen_truth::TruthBaseline;
use crate::jets::{JetClassification, classify_jets};
use crate::me0_muon::{fill_me0, is_me0_muon_selected};
use crate::overlap::{OverlapResult, remove_lepton_overlaps};
use crate::photons::PhotonAnalysis;
use crate::records::{DetailRecord, EventTruthRecord, PhotonDetailRecord};
use crate::vertex::VertexSelection;

/// Everything derived from one processed event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    /// Event sequence number.
    pub event: u64,
    /// Vertex scan.
    pub vertices: VertexSelection,
    /// Truth baseline.
    pub truth: TruthBaseline,
    /// Electron identification, one entry per electron.
    pub electron_ids: Vec<ElectronIdResult>,
    /// ME0 decision per muon; `None` for muons not flagged as ME0.
    pub me0_muons: Vec<Option<bool>>,
    /// Overlap removal.
    pub overlap: OverlapResult,
    /// Jet classification.
    pub jets: JetClassification,
    /// First MET object.
    pub met: Option<Met>,
    /// Photon selection and matching.
    pub photons: PhotonAnalysis,
    /// Detail rows, when enabled.
    pub records: Vec<DetailRecord>,
}

/// Result of [`Analyzer::process_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// No qualifying vertex; nothing was filled.
    Aborted,
    /// Event fully processed.
    Processed(Box<EventSummary>),
}

impl EventOutcome {
    /// The summary, if the event was processed.
    pub fn summary(&self) -> Option<&EventSummary> {
        match self {
            EventOutcome::Aborted => None,
            EventOutcome::Processed(s) => Some(s),
        }
    }

    /// Whether the vertex gate aborted the event.
    pub fn is_aborted(&self) -> bool {
        matches!(self, EventOutcome::Aborted)
    }
}

/// Runs every selection stage on one event and pushes the results to `S`.
#[derive(Debug)]
pub struct Analyzer<S: StatisticsSink> {
    config: AnalysisConfig,
    sink: S,
    events_seen: u64,
    events_processed: u64,
    events_aborted: u64,
}

impl<S: StatisticsSink> Analyzer<S> {
    /// Validate `config` and take ownership of `sink`.
    pub fn new(config: AnalysisConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, sink, events_seen: 0, events_processed: 0, events_aborted: 0 })
    }

    /// A fresh analyzer with the same (already validated) configuration
    /// over another sink, with zeroed counters.
    pub fn fork<T: StatisticsSink>(&self, sink: T) -> Analyzer<T> {
        Analyzer { config: self.config.clone(), sink, events_seen: 0, events_processed: 0, events_aborted: 0 }
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give the sink back.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Events passed to the analyzer.
    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    /// Events that passed the vertex gate.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Events stopped by the vertex gate.
    pub fn events_aborted(&self) -> u64 {
        self.events_aborted
    }

    /// Process the next event, numbered by arrival.
    pub fn process_event(&mut self, event: &Event) -> Result<EventOutcome> {
        self.process_indexed(self.events_seen, event)
    }

    /// Process an event carrying an externally assigned sequence number.
    pub fn process_indexed(&mut self, index: u64, event: &Event) -> Result<EventOutcome> {
        event.validate()?;
        self.events_seen += 1;

        let vertices = VertexSelection::select(&event.vertices);
        if !vertices.passes() {
            log::debug!("event {index}: no good vertex among {}, skipped", vertices.n_total);
            self.events_aborted += 1;
            return Ok(EventOutcome::Aborted);
        }
        self.events_processed += 1;
        let sink = &mut self.sink;
        let cfg = &self.config;
        vertices.fill(sink);

        let truth = TruthBaseline::extract(event);
        truth.fill(&event.gen_jets, sink);

        let electron_ids: Vec<_> = event
            .electrons
            .iter()
            .map(|e| ElectronIdResult::evaluate(e, &event.conversions, &event.beam_spot))
            .collect();
        for id in &electron_ids {
            id.fill(sink);
        }
        let me0_muons = event
            .muons
            .iter()
            .map(|m| {
                fill_me0(m, &cfg.me0, sink);
                m.is_me0.then(|| is_me0_muon_selected(m, &cfg.me0))
            })
            .collect();

        let overlap = remove_lepton_overlaps(&event.jets, &event.electrons, &event.muons);
        let jets = classify_jets(&event.jets, &overlap.kept, cfg.btag_scheme);
        jets.fill(&event.jets, sink);

        let met = event.mets.first().copied();
        if let Some(m) = &met {
            sink.fill(names::MET_PT, m.pt);
            sink.fill(names::MET_PHI, m.phi);
        }

        let photons = PhotonAnalysis::run(&event.photons, &cfg.photon, &truth);
        photons.fill(&event.photons, sink);

        let mut records = Vec::new();
        if cfg.emit_detail_records {
            records.extend(
                photons
                    .candidates
                    .iter()
                    .filter(|c| c.selected)
                    .filter_map(|c| event.photons.get(c.index).map(|p| (p, c)))
                    .map(|(p, c)| DetailRecord::Photon(PhotonDetailRecord::new(index, p, c))),
            );
            records.push(DetailRecord::EventTruth(EventTruthRecord::new(index, &truth)));
        }

        Ok(EventOutcome::Processed(Box::new(EventSummary {
            event: index,
            vertices,
            truth,
            electron_ids,
            me0_muons,
            overlap,
            jets,
            met,
            photons,
            records,
        })))
    }
}
