//! Photon selection, truth matching and diphoton reconstruction.
//!
//! Selected photons are tried against truth photon 1, then truth photon 2,
//! with a fixed ΔR window. The first window that matches takes the photon;
//! a later photon matching the same truth slot replaces the earlier one.

use hh_core::{LorentzVector, StatisticsSink};
use serde::{Deserialize, Serialize};

use crate::catalogue::names;
use crate::config::PhotonSelection;
use crate::event::Photon;
use crate::gen_truth::TruthBaseline;

/// Maximum ΔR between a photon and its truth photon.
pub const MATCH_DELTA_R: f64 = 0.2;
/// Both reco/truth pt ratios must exceed this before a diphoton is built.
pub const MIN_PT_RATIO: f64 = 0.01;
/// Leading photon pt threshold.
pub const LEAD_MIN_PT: f64 = 30.0;
/// Subleading photon pt threshold.
pub const SUBLEAD_MIN_PT: f64 = 20.0;
/// Truth m(HH) above which the high-mass regime applies.
pub const HIGH_MASS_MIN: f64 = 350.0;
/// Truth m(HH) above which the low-mass regime applies.
pub const LOW_MASS_MIN: f64 = 250.0;

/// Truth photon a reconstructed photon was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruthSlot {
    /// First Higgs-daughter photon.
    First,
    /// Second Higgs-daughter photon.
    Second,
}

impl TruthSlot {
    fn index(self) -> usize {
        match self {
            TruthSlot::First => 0,
            TruthSlot::Second => 1,
        }
    }
}

/// Derived kinematics of one reconstructed photon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonCandidate {
    /// Index in the event's photon collection.
    pub index: usize,
    /// Transverse energy.
    pub et: f64,
    /// Corrected four-vector (massless).
    pub p4: LorentzVector,
    /// Supercluster four-vector (massless, `E / cosh(η)` as pt).
    pub raw: LorentzVector,
    /// Passes the selection.
    pub selected: bool,
    /// Truth slot taken by this photon, if any.
    pub matched: Option<TruthSlot>,
}

impl PhotonCandidate {
    /// Compute the derived kinematics of `photon`.
    pub fn new(index: usize, photon: &Photon) -> Self {
        let p4 = LorentzVector::from_pt_eta_phi_m(photon.p4.pt, photon.p4.eta, photon.p4.phi, 0.0);
        let sc = &photon.super_cluster;
        let raw = LorentzVector::from_pt_eta_phi_m(sc.energy / sc.eta.cosh(), sc.eta, sc.phi, 0.0);
        Self { index, et: photon.p4.to_lorentz().et(), p4, raw, selected: false, matched: None }
    }
}

/// Selection as applied: transverse energy and |η| only.
pub fn passes_selection(photon: &Photon, et: f64, cuts: &PhotonSelection) -> bool {
    et > cuts.min_et && photon.p4.eta.abs() < cuts.max_abs_eta
}

/// A reconstructed photon holding a truth slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonMatch {
    /// Index in the event's photon collection.
    pub index: usize,
    /// Corrected four-vector.
    pub reco: LorentzVector,
    /// Supercluster four-vector.
    pub reco_raw: LorentzVector,
    /// Truth four-vector.
    pub truth: LorentzVector,
    /// `pt(reco) / pt(truth)`.
    pub ratio: f64,
    /// `pt(raw) / pt(truth)`.
    pub ratio_raw: f64,
}

/// Truth m(HH) regime used to split the diphoton mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassRegime {
    /// m(HH) > 350.
    High,
    /// 250 < m(HH) < 350.
    Low,
    /// Neither.
    Outside,
}

impl MassRegime {
    /// Classify a truth m(HH).
    pub fn of(hh_mass: f64) -> Self {
        if hh_mass > HIGH_MASS_MIN {
            MassRegime::High
        } else if hh_mass > LOW_MASS_MIN && hh_mass < HIGH_MASS_MIN {
            MassRegime::Low
        } else {
            MassRegime::Outside
        }
    }
}

/// Diphoton built from the two matched photons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiphotonCandidate {
    /// Corrected invariant mass.
    pub mass: f64,
    /// Supercluster invariant mass.
    pub mass_raw: f64,
    /// Larger of the two corrected pts.
    pub lead_pt: f64,
    /// Smaller of the two corrected pts.
    pub sublead_pt: f64,
}

impl DiphotonCandidate {
    fn build(a: &PhotonMatch, b: &PhotonMatch) -> Self {
        let (pt1, pt2) = (a.reco.pt(), b.reco.pt());
        let (lead_pt, sublead_pt) = if pt1 < pt2 { (pt2, pt1) } else { (pt1, pt2) };
        Self { mass: (a.reco + b.reco).m(), mass_raw: (a.reco_raw + b.reco_raw).m(), lead_pt, sublead_pt }
    }

    /// Kinematic significance requirements on the ordered pts.
    pub fn passes_kinematics(&self) -> bool {
        self.lead_pt > LEAD_MIN_PT
            && self.sublead_pt > SUBLEAD_MIN_PT
            && self.lead_pt > self.mass / 3.0
            && self.sublead_pt > self.mass / 4.0
    }
}

/// Photon results of one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotonAnalysis {
    /// Every photon, in input order.
    pub candidates: Vec<PhotonCandidate>,
    /// Final occupant of each truth slot.
    pub matches: [Option<PhotonMatch>; 2],
    /// Diphoton, when both slots hold positive-pt photons with positive
    /// truth pt and both ratios exceed [`MIN_PT_RATIO`].
    pub diphoton: Option<DiphotonCandidate>,
    /// Truth m(HH) regime.
    pub regime: Option<MassRegime>,
}

impl PhotonAnalysis {
    /// Select, match and reconstruct. Depends only on its arguments.
    pub fn run(photons: &[Photon], cuts: &PhotonSelection, truth: &TruthBaseline) -> Self {
        let mut out = PhotonAnalysis { regime: Some(MassRegime::of(truth.hh_mass)), ..Default::default() };
        for (index, photon) in photons.iter().enumerate() {
            let mut cand = PhotonCandidate::new(index, photon);
            cand.selected = passes_selection(photon, cand.et, cuts);
            if cand.selected {
                cand.matched = match_truth(&cand.p4, &truth.photons);
                if let Some(slot) = cand.matched
                    && let Some(t) = truth.photons[slot.index()]
                {
                    out.matches[slot.index()] = Some(PhotonMatch {
                        index,
                        reco: cand.p4,
                        reco_raw: cand.raw,
                        truth: t,
                        ratio: cand.p4.pt() / t.pt(),
                        ratio_raw: cand.raw.pt() / t.pt(),
                    });
                }
            }
            out.candidates.push(cand);
        }

        if let [Some(a), Some(b)] = &out.matches
            && a.reco.pt() > 0.0
            && b.reco.pt() > 0.0
            && a.truth.pt() > 0.0
            && b.truth.pt() > 0.0
            && a.ratio > MIN_PT_RATIO
            && b.ratio > MIN_PT_RATIO
        {
            out.diphoton = Some(DiphotonCandidate::build(a, b));
        }
        out
    }

    /// Number of selected photons.
    pub fn n_selected(&self) -> usize {
        self.candidates.iter().filter(|c| c.selected).count()
    }

    /// Diphoton that also passes the kinematic gate.
    pub fn accepted_diphoton(&self) -> Option<&DiphotonCandidate> {
        self.diphoton.as_ref().filter(|d| d.passes_kinematics())
    }

    /// Push per-photon, profile and diphoton distributions.
    pub fn fill<S: StatisticsSink>(&self, photons: &[Photon], sink: &mut S) {
        for cand in &self.candidates {
            sink.fill(names::PHOTON_PASSING, if cand.selected { 1.0 } else { 0.0 });
            if cand.matched.is_none() {
                continue;
            }
            let Some(p) = photons.get(cand.index) else { continue };
            sink.fill(names::PHOTON_HOVERE, p.hadronic_over_em);
            sink.fill(names::PHOTON_SIGMA_IETA_IETA, p.sigma_ieta_ieta);
            sink.fill(names::PHOTON_ISO_NEU_HAD, p.neutral_hadron_iso);
            sink.fill(names::PHOTON_ISO_CHAR_HAD, p.charged_hadron_iso);
            sink.fill(names::PHOTON_ISO, p.photon_iso);
            sink.fill(names::PUPPI_PHOTON_ISO_NEU_HAD, p.puppi_neutral_hadron_iso);
            sink.fill(names::PUPPI_PHOTON_ISO_CHAR_HAD, p.puppi_charged_hadron_iso);
            sink.fill(names::PUPPI_PHOTON_ISO, p.puppi_photon_iso);
            sink.fill(names::PHOTON_PT, p.p4.pt);
            sink.fill(names::PHOTON_ETA, p.p4.eta);
            sink.fill(names::PHOTON_R9, p.r9);
        }
        sink.fill(names::PHOTON_COUNT, self.n_selected() as f64);

        let (Some(d), [Some(a), Some(b)]) = (&self.diphoton, &self.matches) else {
            return;
        };
        for m in [a, b] {
            sink.fill_profile(names::PHOTON_PT_RATIO, m.truth.pt(), m.ratio);
        }
        for m in [a, b] {
            sink.fill_profile(names::PHOTON_PT_RATIO_RAW, m.truth.pt(), m.ratio_raw);
        }
        if !d.passes_kinematics() {
            return;
        }
        let regime = self.regime.unwrap_or(MassRegime::Outside);
        sink.fill(names::RECO_DIPHOTON_MASS, d.mass);
        match regime {
            MassRegime::High => sink.fill(names::RECO_DIPHOTON_MASS_HM, d.mass),
            MassRegime::Low => sink.fill(names::RECO_DIPHOTON_MASS_LM, d.mass),
            MassRegime::Outside => {}
        }
        sink.fill(names::RECO_DIPHOTON_MASS_RAW, d.mass_raw);
        match regime {
            MassRegime::High => sink.fill(names::RECO_DIPHOTON_MASS_HM_RAW, d.mass_raw),
            MassRegime::Low => sink.fill(names::RECO_DIPHOTON_MASS_LM_RAW, d.mass_raw),
            MassRegime::Outside => {}
        }
    }
}

/// Truth slot for a selected photon: truth 1 first, otherwise truth 2.
/// Empty truth slots never match.
pub fn match_truth(reco: &LorentzVector, truth: &[Option<LorentzVector>; 2]) -> Option<TruthSlot> {
    let within = |t: &Option<LorentzVector>| t.as_ref().is_some_and(|t| t.delta_r(reco) < MATCH_DELTA_R);
    if within(&truth[0]) {
        Some(TruthSlot::First)
    } else if within(&truth[1]) {
        Some(TruthSlot::Second)
    } else {
        None
    }
}
