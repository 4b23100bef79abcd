//! Versioned per-photon and per-event detail rows.

use serde::{Deserialize, Serialize};

use crate::event::Photon;
use crate::gen_truth::TruthBaseline;
use crate::photons::{PhotonCandidate, TruthSlot};

/// Schema version written into every record.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

/// Kinematics triple of a truth photon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TruthPhotonKinematics {
    /// pt
    pub pt: f64,
    /// η
    pub eta: f64,
    /// φ
    pub phi: f64,
}

/// One selected photon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotonDetailRecord {
    /// Schema version.
    pub schema_version: u32,
    /// Event sequence number within the run.
    pub event: u64,
    /// Index in the event's photon collection.
    pub photon: usize,
    /// pt
    pub pt: f64,
    /// Transverse energy.
    pub et: f64,
    /// η
    pub eta: f64,
    /// φ
    pub phi: f64,
    /// R9
    pub r9: f64,
    /// H/E
    pub hadronic_over_em: f64,
    /// σ_iηiη
    pub sigma_ieta_ieta: f64,
    /// Charged hadron isolation.
    pub charged_hadron_iso: f64,
    /// Neutral hadron isolation.
    pub neutral_hadron_iso: f64,
    /// Photon isolation.
    pub photon_iso: f64,
    /// PUPPI charged hadron isolation.
    pub puppi_charged_hadron_iso: f64,
    /// PUPPI neutral hadron isolation.
    pub puppi_neutral_hadron_iso: f64,
    /// PUPPI photon isolation.
    pub puppi_photon_iso: f64,
    /// Supercluster transverse energy.
    pub sc_et: f64,
    /// Truth slot, if matched.
    pub matched: Option<TruthSlot>,
}

impl PhotonDetailRecord {
    /// Row for a photon and its derived kinematics.
    pub fn new(event: u64, photon: &Photon, cand: &PhotonCandidate) -> Self {
        Self {
            schema_version: RECORD_SCHEMA_VERSION,
            event,
            photon: cand.index,
            pt: photon.p4.pt,
            et: cand.et,
            eta: photon.p4.eta,
            phi: photon.p4.phi,
            r9: photon.r9,
            hadronic_over_em: photon.hadronic_over_em,
            sigma_ieta_ieta: photon.sigma_ieta_ieta,
            charged_hadron_iso: photon.charged_hadron_iso,
            neutral_hadron_iso: photon.neutral_hadron_iso,
            photon_iso: photon.photon_iso,
            puppi_charged_hadron_iso: photon.puppi_charged_hadron_iso,
            puppi_neutral_hadron_iso: photon.puppi_neutral_hadron_iso,
            puppi_photon_iso: photon.puppi_photon_iso,
            sc_et: cand.raw.pt(),
            matched: cand.matched,
        }
    }
}

/// Truth summary of one processed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTruthRecord {
    /// Schema version.
    pub schema_version: u32,
    /// Event sequence number within the run.
    pub event: u64,
    /// First truth photon; zero when absent.
    pub photon1: TruthPhotonKinematics,
    /// Second truth photon; zero when absent.
    pub photon2: TruthPhotonKinematics,
    /// Higgs-daughter photons seen.
    pub n_gen_photons: usize,
    /// Higgs-daughter b quarks seen.
    pub n_gen_b: usize,
    /// Truth diphoton mass; zero when fewer than two photons.
    pub diphoton_mass: f64,
}

impl EventTruthRecord {
    /// Row for an event's truth baseline.
    pub fn new(event: u64, truth: &TruthBaseline) -> Self {
        let kin = |slot: usize| {
            truth.photons[slot]
                .map(|v| TruthPhotonKinematics { pt: v.pt(), eta: v.eta(), phi: v.phi() })
                .unwrap_or_default()
        };
        Self {
            schema_version: RECORD_SCHEMA_VERSION,
            event,
            photon1: kin(0),
            photon2: kin(1),
            n_gen_photons: truth.n_photons,
            n_gen_b: truth.n_b,
            diphoton_mass: truth.diphoton_mass().unwrap_or(0.0),
        }
    }
}

/// Any detail row, tagged by kind in its JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailRecord {
    /// Per-photon row.
    Photon(PhotonDetailRecord),
    /// Per-event truth row.
    EventTruth(EventTruthRecord),
}
