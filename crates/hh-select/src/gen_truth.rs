//! Generator-level truth: clean generator jets, Higgs-daughter photons and
//! b quarks, truth composite masses and isolated truth leptons.
//!
//! Higgs daughters are found by walking the parent links of the generator
//! arena. Only particles with exactly one parent, that parent being a Higgs
//! boson, count. Photons and b quarks each fill two slots in encounter
//! order; later ones are counted but otherwise ignored.

use hh_core::{LorentzVector, StatisticsSink};

use crate::catalogue::names;
use crate::event::{Event, GenJet, GenParticle, PackedGenParticle, pdg};
use crate::overlap::same_object;

/// Minimum generator-jet pt for the fiducial selection (inclusive).
pub const GEN_JET_MIN_PT: f64 = 30.0;
/// Maximum generator-jet |η| for the fiducial selection (inclusive).
pub const GEN_JET_MAX_ABS_ETA: f64 = 4.7;

/// Truth leptons beyond this |η| are not considered for isolation.
pub const LEPTON_MAX_ABS_ETA: f64 = 2.8;
/// Generator jets farther than this from the lepton are skipped.
pub const ISO_JET_CONE: f64 = 0.7;
/// Constituents closer than this are the lepton itself.
pub const ISO_SELF_CONE: f64 = 0.01;
/// Isolation cone for muons.
pub const ISO_MUON_CONE: f64 = 0.4;
/// Isolation cone for electrons.
pub const ISO_ELECTRON_CONE: f64 = 0.3;
/// Leptons with relative isolation above this are rejected.
pub const ISO_MAX: f64 = 0.15;

/// Per-event truth quantities consumed by the photon matcher and the
/// detail records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TruthBaseline {
    /// Generator jets not coinciding with a generator lepton.
    pub clean_gen_jets: Vec<usize>,
    /// Clean generator jets inside the fiducial region.
    pub fiducial_gen_jets: Vec<usize>,
    /// First two Higgs-daughter photons (massless).
    pub photons: [Option<LorentzVector>; 2],
    /// Number of Higgs-daughter photons seen.
    pub n_photons: usize,
    /// First two Higgs-daughter b quarks (with generator mass).
    pub b_quarks: [Option<LorentzVector>; 2],
    /// Number of Higgs-daughter b quarks seen.
    pub n_b: usize,
    /// Diphoton sum; zero until both photon slots are filled.
    pub diphoton: LorentzVector,
    /// Di-b sum; zero until both b slots are filled.
    pub dib: LorentzVector,
    /// Invariant mass of `diphoton + dib`.
    pub hh_mass: f64,
    /// Packed generator leptons passing the isolation requirement.
    pub isolated_leptons: Vec<usize>,
}

impl TruthBaseline {
    /// Extract the truth baseline of one event.
    pub fn extract(event: &Event) -> Self {
        let clean = clean_gen_jets(&event.gen_jets, &event.packed_gen_particles);
        let fiducial = clean.iter().copied().filter(|&i| is_fiducial_gen_jet(&event.gen_jets[i])).collect();
        let mut t = TruthBaseline { clean_gen_jets: clean, fiducial_gen_jets: fiducial, ..Default::default() };

        for p in &event.gen_particles {
            if !is_higgs_daughter(p, &event.gen_particles) {
                continue;
            }
            if p.pdg_id == pdg::PHOTON {
                let v = LorentzVector::from_pt_eta_phi_m(p.p4.pt, p.p4.eta, p.p4.phi, 0.0);
                if let Some(slot) = t.photons.get_mut(t.n_photons) {
                    *slot = Some(v);
                }
                t.n_photons += 1;
                if let (2, [Some(a), Some(b)]) = (t.n_photons, t.photons) {
                    t.diphoton = a + b;
                }
            } else if p.pdg_id.abs() == pdg::BOTTOM {
                if let Some(slot) = t.b_quarks.get_mut(t.n_b) {
                    *slot = Some(p.p4.to_lorentz());
                }
                t.n_b += 1;
                if let (2, [Some(a), Some(b)]) = (t.n_b, t.b_quarks) {
                    t.dib = a + b;
                }
            }
        }
        t.hh_mass = (t.diphoton + t.dib).m();

        t.isolated_leptons = event
            .packed_gen_particles
            .iter()
            .enumerate()
            .filter(|(_, lep)| {
                truth_isolation(lep, &event.gen_jets, &t.clean_gen_jets).is_some_and(|iso| iso <= ISO_MAX)
            })
            .map(|(i, _)| i)
            .collect();
        t
    }

    /// Both truth photons were found.
    pub fn has_diphoton(&self) -> bool {
        self.n_photons >= 2
    }

    /// Both truth b quarks were found.
    pub fn has_dib(&self) -> bool {
        self.n_b >= 2
    }

    /// Truth diphoton mass, when both photons were found.
    pub fn diphoton_mass(&self) -> Option<f64> {
        self.has_diphoton().then(|| self.diphoton.m())
    }

    /// Truth di-b mass, when both b quarks were found.
    pub fn dib_mass(&self) -> Option<f64> {
        self.has_dib().then(|| self.dib.m())
    }

    /// Push the truth distributions.
    pub fn fill<S: StatisticsSink>(&self, gen_jets: &[GenJet], sink: &mut S) {
        for &i in &self.fiducial_gen_jets {
            let j = &gen_jets[i].p4;
            sink.fill(names::GEN_JETS_PT, j.pt);
            sink.fill(names::GEN_JETS_PHI, j.phi);
            sink.fill(names::GEN_JETS_ETA, j.eta);
        }
        sink.fill(names::GEN_JETS_N, self.fiducial_gen_jets.len() as f64);
        if let Some(m) = self.diphoton_mass() {
            sink.fill(names::GEN_DIPHOTON_MASS, m);
        }
        if let Some(m) = self.dib_mass() {
            sink.fill(names::GEN_DIB_MASS, m);
        }
        sink.fill(names::GEN_HH_MASS, self.hh_mass);
        sink.fill(names::GEN_HIGGS_B_N, self.n_b as f64);
        sink.fill(names::GEN_ISOLATED_LEPTONS_N, self.isolated_leptons.len() as f64);
    }
}

/// Exactly one parent, and that parent is a Higgs boson.
pub fn is_higgs_daughter(p: &GenParticle, arena: &[GenParticle]) -> bool {
    p.parents.len() == 1 && p.parent(arena, 0).is_some_and(|m| m.pdg_id == pdg::HIGGS)
}

/// Indices of generator jets that do not coincide with a generator lepton.
pub fn clean_gen_jets(gen_jets: &[GenJet], packed: &[PackedGenParticle]) -> Vec<usize> {
    gen_jets
        .iter()
        .enumerate()
        .filter(|(_, jet)| {
            !packed.iter().any(|p| pdg::is_light_lepton(p.pdg_id) && same_object(&jet.p4, &p.p4))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Fiducial generator-jet region.
pub fn is_fiducial_gen_jet(jet: &GenJet) -> bool {
    jet.p4.pt >= GEN_JET_MIN_PT && jet.p4.eta.abs() <= GEN_JET_MAX_ABS_ETA
}

/// Relative cone isolation of a packed truth lepton.
///
/// `None` for particles that are not light leptons, fall outside the
/// acceptance, or have no positive pt to normalize by.
pub fn truth_isolation(lepton: &PackedGenParticle, gen_jets: &[GenJet], clean: &[usize]) -> Option<f64> {
    if !pdg::is_light_lepton(lepton.pdg_id) || lepton.p4.eta.abs() > LEPTON_MAX_ABS_ETA {
        return None;
    }
    if lepton.p4.pt <= 0.0 {
        return None;
    }
    let cone = if lepton.pdg_id.abs() == pdg::MUON { ISO_MUON_CONE } else { ISO_ELECTRON_CONE };
    let mut sum = 0.0;
    for jet in clean.iter().filter_map(|&i| gen_jets.get(i)) {
        if lepton.p4.delta_r(&jet.p4) > ISO_JET_CONE {
            continue;
        }
        for c in &jet.constituents {
            let dr = lepton.p4.delta_r(c);
            if dr < ISO_SELF_CONE || dr > cone {
                continue;
            }
            sum += c.pt;
        }
    }
    Some(sum / lepton.p4.pt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Parents, PtEtaPhiM};
    use approx::assert_relative_eq;

    fn gp(pdg_id: i32, pt: f64, eta: f64, phi: f64, mass: f64, parents: Parents) -> GenParticle {
        GenParticle { p4: PtEtaPhiM::new(pt, eta, phi, mass), pdg_id, status: 1, parents }
    }

    fn higgs_event() -> Event {
        let mut ev = Event::empty();
        ev.gen_particles = vec![
            gp(25, 0.0, 0.0, 0.0, 125.0, Parents::none()),
            gp(25, 0.0, 0.0, 0.0, 125.0, Parents::none()),
            gp(22, 62.5, 0.0, 0.0, 0.0, Parents::one(0)),
            gp(5, 60.0, 0.0, 1.0, 4.8, Parents::one(1)),
            gp(22, 62.5, 0.0, std::f64::consts::PI, 0.0, Parents::one(0)),
            gp(-5, 60.0, 0.0, -2.0, 4.8, Parents::one(1)),
            gp(22, 500.0, 0.0, 0.0, 0.0, Parents::one(0)),
        ];
        ev
    }

    #[test]
    fn first_two_daughters_in_encounter_order() {
        let t = TruthBaseline::extract(&higgs_event());
        assert_eq!(t.n_photons, 3);
        assert_eq!(t.n_b, 2);
        assert_relative_eq!(t.photons[0].unwrap().phi(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(t.diphoton_mass().unwrap(), 125.0, epsilon = 1e-9);
        assert_relative_eq!(t.b_quarks[0].unwrap().m(), 4.8, epsilon = 1e-9);
        assert!(t.dib_mass().unwrap() > 0.0);
        assert_relative_eq!(t.hh_mass, (t.diphoton + t.dib).m(), epsilon = 1e-12);
    }

    #[test]
    fn two_parents_or_non_higgs_parent_ignored() {
        let mut ev = Event::empty();
        ev.gen_particles = vec![
            gp(25, 0.0, 0.0, 0.0, 125.0, Parents::none()),
            gp(23, 0.0, 0.0, 0.0, 91.0, Parents::none()),
            gp(22, 40.0, 0.0, 0.0, 0.0, Parents::two(0, 1)),
            gp(22, 40.0, 0.0, 0.0, 0.0, Parents::one(1)),
        ];
        let t = TruthBaseline::extract(&ev);
        assert_eq!(t.n_photons, 0);
        assert_eq!(t.photons, [None, None]);
        assert_eq!(t.hh_mass, 0.0);
        assert_eq!(t.diphoton_mass(), None);
    }

    #[test]
    fn single_photon_leaves_composite_zero() {
        let mut ev = Event::empty();
        ev.gen_particles = vec![
            gp(25, 0.0, 0.0, 0.0, 125.0, Parents::none()),
            gp(22, 40.0, 0.3, 0.0, 0.0, Parents::one(0)),
        ];
        let t = TruthBaseline::extract(&ev);
        assert!(t.photons[0].is_some());
        assert_eq!(t.diphoton, LorentzVector::zero());
    }

    #[test]
    fn gen_jet_matching_a_lepton_is_not_clean() {
        let mut ev = Event::empty();
        ev.gen_jets = vec![
            GenJet { p4: PtEtaPhiM::new(35.0, 0.5, 0.5, 1.0), constituents: vec![] },
            GenJet { p4: PtEtaPhiM::new(30.0, 4.7, 0.5, 1.0), constituents: vec![] },
            GenJet { p4: PtEtaPhiM::new(29.9, 0.0, 0.5, 1.0), constituents: vec![] },
        ];
        ev.packed_gen_particles =
            vec![PackedGenParticle { p4: PtEtaPhiM::massless(35.1, 0.5, 0.502), pdg_id: -11 }];
        let t = TruthBaseline::extract(&ev);
        assert_eq!(t.clean_gen_jets, vec![1, 2]);
        assert_eq!(t.fiducial_gen_jets, vec![1]);
    }

    #[test]
    fn isolation_uses_species_cone_and_skips_self() {
        let jet = GenJet {
            p4: PtEtaPhiM::new(50.0, 0.0, 0.0, 5.0),
            constituents: vec![
                PtEtaPhiM::massless(20.0, 0.0, 0.0),  // the lepton itself
                PtEtaPhiM::massless(2.0, 0.0, 0.2),   // inside both cones
                PtEtaPhiM::massless(4.0, 0.0, 0.35),  // muon cone only
                PtEtaPhiM::massless(10.0, 0.0, 0.6),  // outside both
            ],
        };
        let mu = PackedGenParticle { p4: PtEtaPhiM::massless(20.0, 0.0, 0.0), pdg_id: 13 };
        let el = PackedGenParticle { p4: PtEtaPhiM::massless(20.0, 0.0, 0.0), pdg_id: 11 };
        let jets = [jet];
        assert_relative_eq!(truth_isolation(&mu, &jets, &[0]).unwrap(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(truth_isolation(&el, &jets, &[0]).unwrap(), 0.1, epsilon = 1e-12);
        let forward = PackedGenParticle { p4: PtEtaPhiM::massless(20.0, 2.9, 0.0), pdg_id: 13 };
        assert_eq!(truth_isolation(&forward, &jets, &[0]), None);
    }

    #[test]
    fn isolation_threshold_is_inclusive() {
        // one muon per jet; the off-axis constituent sets the isolation
        let mut ev = Event::empty();
        for (phi, extra) in [(0.0, 2.0), (1.5, 3.0), (-1.5, 4.0)] {
            ev.gen_jets.push(GenJet {
                p4: PtEtaPhiM::new(50.0, 0.0, phi, 5.0),
                constituents: vec![PtEtaPhiM::massless(20.0, 0.0, phi), PtEtaPhiM::massless(extra, 0.0, phi + 0.2)],
            });
            ev.packed_gen_particles.push(PackedGenParticle { p4: PtEtaPhiM::massless(20.0, 0.0, phi), pdg_id: 13 });
        }
        let t = TruthBaseline::extract(&ev);
        assert_eq!(t.clean_gen_jets, vec![0, 1, 2]);
        let isos: Vec<f64> = ev
            .packed_gen_particles
            .iter()
            .filter_map(|l| truth_isolation(l, &ev.gen_jets, &t.clean_gen_jets))
            .collect();
        assert_relative_eq!(isos[0], 0.10, epsilon = 1e-12);
        assert_eq!(isos[1], ISO_MAX);
        assert_relative_eq!(isos[2], 0.20, epsilon = 1e-12);
        assert_eq!(t.isolated_leptons, vec![0, 1]);

        let mut sink = hh_core::RecordingSink::new();
        t.fill(&ev.gen_jets, &mut sink);
        assert_eq!(sink.values(names::GEN_ISOLATED_LEPTONS_N), vec![2.0]);
    }
}
