//! Removal of jets that are really a reconstructed lepton.
//!
//! Two objects are the same physical object when their transverse momenta
//! agree within 1% of the lepton's and they are closer than 0.01 in ΔR.
//! The same test cleans generator jets against generator leptons.

use crate::event::{Electron, Jet, Muon, PtEtaPhiM};

/// Relative pt agreement for a same-object match.
pub const PT_TOLERANCE: f64 = 0.01;
/// Angular agreement for a same-object match.
pub const DELTA_R_MAX: f64 = 0.01;

/// Whether `candidate` and `lepton` are the same physical object.
pub fn same_object(candidate: &PtEtaPhiM, lepton: &PtEtaPhiM) -> bool {
    (candidate.pt - lepton.pt).abs() < PT_TOLERANCE * lepton.pt && candidate.delta_r(lepton) < DELTA_R_MAX
}

/// Whether `jet` coincides with any electron or muon.
///
/// Electrons are checked first, then muons; either match discards the jet.
pub fn overlaps_lepton(jet: &Jet, electrons: &[Electron], muons: &[Muon]) -> bool {
    electrons.iter().any(|e| same_object(&jet.p4, &e.p4)) || muons.iter().any(|m| same_object(&jet.p4, &m.p4))
}

/// Jet indices split into kept and discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlapResult {
    /// Jets that do not coincide with a lepton, in input order.
    pub kept: Vec<usize>,
    /// Jets discarded as lepton duplicates.
    pub discarded: Vec<usize>,
}

/// Partition `jets` by lepton overlap.
pub fn remove_lepton_overlaps(jets: &[Jet], electrons: &[Electron], muons: &[Muon]) -> OverlapResult {
    let mut out = OverlapResult::default();
    for (i, jet) in jets.iter().enumerate() {
        if overlaps_lepton(jet, electrons, muons) {
            out.discarded.push(i);
        } else {
            out.kept.push(i);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jet(pt: f64, eta: f64, phi: f64) -> Jet {
        Jet {
            p4: PtEtaPhiM::new(pt, eta, phi, 5.0),
            btag: Default::default(),
            id: Default::default(),
            gen_parton_pdg_id: None,
        }
    }

    fn muon(pt: f64, eta: f64, phi: f64) -> Muon {
        Muon { p4: PtEtaPhiM::new(pt, eta, phi, 0.105), is_me0: false, chambers: vec![] }
    }

    #[test]
    fn same_object_needs_both_pt_and_angle() {
        let lep = PtEtaPhiM::massless(50.0, 1.0, 0.5);
        assert!(same_object(&PtEtaPhiM::massless(50.4, 1.005, 0.5), &lep));
        assert!(!same_object(&PtEtaPhiM::massless(50.5, 1.0, 0.5), &lep));
        assert!(!same_object(&PtEtaPhiM::massless(50.0, 1.02, 0.5), &lep));
    }

    #[test]
    fn muon_duplicate_is_discarded() {
        let jets = vec![jet(40.0, 0.2, 1.0), jet(80.0, -1.0, 2.0)];
        let muons = vec![muon(40.1, 0.2, 1.001)];
        let r = remove_lepton_overlaps(&jets, &[], &muons);
        assert_eq!(r.kept, vec![1]);
        assert_eq!(r.discarded, vec![0]);
    }

    #[test]
    fn no_leptons_keeps_everything() {
        let jets = vec![jet(40.0, 0.2, 1.0), jet(80.0, -1.0, 2.0)];
        let r = remove_lepton_overlaps(&jets, &[], &[]);
        assert_eq!(r.kept, vec![0, 1]);
        assert!(r.discarded.is_empty());
    }
}
