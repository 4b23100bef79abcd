//! End-to-end properties of the per-event selection.

use approx::assert_relative_eq;
use hh_core::{RecordingSink, StatisticsSink};
use hh_select::catalogue::{GOOD_BTAGGED_JETS, GOOD_JETS, GOOD_LIGHT_JETS, book_histograms, names};
use hh_select::config::{AnalysisConfig, BTagScheme, Me0Cuts};
use hh_select::event::{
    BTagScores, Electron, Event, GenParticle, Jet, JetIdVariables, Muon, Parents, Photon, PtEtaPhiM,
    SuperCluster, Vertex,
};
use hh_select::{Analyzer, ElectronIdResult, EventOutcome, JetBucket, is_me0_muon_selected};
use proptest::prelude::*;

fn good_vertex() -> Vertex {
    Vertex { is_fake: false, ndof: 5.0 }
}

fn good_id() -> JetIdVariables {
    JetIdVariables { chf: 0.4, nhf: 0.2, cef: 0.1, nef: 0.2, charged_multiplicity: 6, n_constituents: 12 }
}

fn jet(pt: f64, eta: f64, phi: f64, csv: f64) -> Jet {
    Jet {
        p4: PtEtaPhiM::new(pt, eta, phi, 6.0),
        btag: BTagScores { deep_csv_b: csv * 0.5, deep_csv_bb: csv * 0.5, csv_v2: csv },
        id: good_id(),
        gen_parton_pdg_id: None,
    }
}

fn photon(pt: f64, eta: f64, phi: f64) -> Photon {
    Photon {
        p4: PtEtaPhiM::massless(pt, eta, phi),
        super_cluster: SuperCluster { energy: pt * eta.cosh(), eta, phi },
        r9: 0.95,
        hadronic_over_em: 0.02,
        sigma_ieta_ieta: 0.009,
        charged_hadron_iso: 0.3,
        neutral_hadron_iso: 0.8,
        photon_iso: 1.1,
        puppi_charged_hadron_iso: 0.2,
        puppi_neutral_hadron_iso: 0.6,
        puppi_photon_iso: 0.9,
    }
}

fn electron(pt: f64, eta: f64, phi: f64) -> Electron {
    Electron {
        p4: PtEtaPhiM::massless(pt, eta, phi),
        sc_eta: eta,
        full5x5_sigma_ieta_ieta: 0.009,
        delta_eta_sc_track: 0.001,
        delta_phi_sc_track: 0.01,
        hcal_over_ecal: 0.05,
        sum_charged_hadron_pt: 0.5,
        ecal_energy: pt * eta.cosh(),
        e_sc_over_p: 1.0,
        track_id: 11,
    }
}

fn higgs_photons(event: &mut Event, photons: &[(f64, f64, f64)]) {
    event.gen_particles.push(GenParticle {
        p4: PtEtaPhiM::new(0.0, 0.0, 0.0, 125.0),
        pdg_id: 25,
        status: 22,
        parents: Parents::none(),
    });
    for &(pt, eta, phi) in photons {
        event.gen_particles.push(GenParticle {
            p4: PtEtaPhiM::massless(pt, eta, phi),
            pdg_id: 22,
            status: 1,
            parents: Parents::one(0),
        });
    }
}

fn recording(config: AnalysisConfig) -> Analyzer<RecordingSink> {
    Analyzer::new(config, RecordingSink::new()).unwrap()
}

#[test]
fn event_without_good_vertex_fills_nothing() {
    let mut ev = Event::empty();
    ev.vertices = vec![Vertex { is_fake: false, ndof: 4.0 }, Vertex { is_fake: true, ndof: 30.0 }];
    ev.jets = vec![jet(80.0, 0.1, 0.2, 0.9)];
    ev.photons = vec![photon(60.0, 0.2, 0.1)];
    ev.electrons = vec![electron(30.0, 0.5, 1.0)];
    higgs_photons(&mut ev, &[(60.0, 0.2, 0.1), (50.0, -0.5, 2.0)]);

    let mut a = recording(AnalysisConfig::default());
    let outcome = a.process_event(&ev).unwrap();
    assert_eq!(outcome, EventOutcome::Aborted);
    assert!(a.sink().is_empty());

    let mut book = Analyzer::new(AnalysisConfig::default(), book_histograms().unwrap()).unwrap();
    book.process_event(&ev).unwrap();
    let book = book.into_sink();
    assert!(book.histograms().all(|h| h.entries == 0));
    assert!(book.profiles().all(|p| p.entries == 0));
}

#[test]
fn basic_pass_through_without_truth() {
    let mut ev = Event::empty();
    ev.vertices = vec![good_vertex()];
    ev.photons = vec![photon(40.0, 1.0, 0.3)];

    let mut a = recording(AnalysisConfig::default());
    let outcome = a.process_event(&ev).unwrap();
    let s = outcome.summary().unwrap();
    assert!(s.photons.candidates[0].selected);
    assert_eq!(s.photons.candidates[0].matched, None);
    assert!(s.photons.diphoton.is_none());

    let sink = a.sink();
    assert_eq!(sink.values(names::PHOTON_PASSING), vec![1.0]);
    assert_eq!(sink.values(names::PHOTON_COUNT), vec![1.0]);
    assert_eq!(sink.count(names::RECO_DIPHOTON_MASS), 0);
    assert_eq!(sink.count(names::RECO_DIPHOTON_MASS_RAW), 0);
    assert_eq!(sink.count(names::PHOTON_PT_RATIO), 0);
    assert_eq!(sink.values(names::GEN_HH_MASS), vec![0.0]);
}

#[test]
fn truth_photon_order_follows_encounter_order() {
    let mut ev = Event::empty();
    ev.vertices = vec![good_vertex()];
    higgs_photons(&mut ev, &[(20.0, 0.5, 1.0), (90.0, -0.3, -2.0)]);

    let mut a = recording(AnalysisConfig::default());
    let outcome = a.process_event(&ev).unwrap();
    let t = &outcome.summary().unwrap().truth;
    assert_relative_eq!(t.photons[0].unwrap().pt(), 20.0, epsilon = 1e-9);
    assert_relative_eq!(t.photons[1].unwrap().pt(), 90.0, epsilon = 1e-9);
    assert_eq!(a.sink().count(names::GEN_DIPHOTON_MASS), 1);
}

#[test]
fn diphoton_mass_is_reproducible() {
    let mut ev = Event::empty();
    ev.vertices = vec![good_vertex()];
    higgs_photons(&mut ev, &[(50.0, 0.0, 0.0), (60.0, 0.1, 0.2)]);
    ev.photons = vec![photon(50.0, 0.0, 0.0), photon(60.0, 0.1, 0.2)];

    let expected = (2.0f64 * 50.0 * 60.0 * (0.1f64.cosh() - 0.2f64.cos())).sqrt();
    let mut a = recording(AnalysisConfig::default());
    let mut masses = Vec::new();
    for _ in 0..3 {
        let outcome = a.process_event(&ev).unwrap();
        let d = *outcome.summary().unwrap().photons.accepted_diphoton().unwrap();
        masses.push(d.mass);
    }
    assert_relative_eq!(masses[0], expected, epsilon = 1e-9);
    assert_eq!(masses[0], masses[1]);
    assert_eq!(masses[1], masses[2]);
    assert_eq!(a.sink().values(names::RECO_DIPHOTON_MASS), masses);
    assert_eq!(a.sink().profile_points(names::PHOTON_PT_RATIO).len(), 6);
}

#[test]
fn btag_working_point_is_strict() {
    let cfg = AnalysisConfig::default().btag_scheme(BTagScheme::CsvV2);
    let mut ev = Event::empty();
    ev.vertices = vec![good_vertex()];
    ev.jets = vec![jet(50.0, 0.0, 0.0, 0.8484), jet(50.0, 1.0, 2.0, 0.8485)];

    let mut a = recording(cfg);
    let outcome = a.process_event(&ev).unwrap();
    let jets = &outcome.summary().unwrap().jets;
    assert_eq!(jets.jets[0].bucket, JetBucket::Light);
    assert_eq!(jets.jets[1].bucket, JetBucket::BTagged);
    assert_eq!(a.sink().values(GOOD_BTAGGED_JETS.n), vec![1.0]);
    assert_eq!(a.sink().values(GOOD_LIGHT_JETS.n), vec![1.0]);
}

#[test]
fn electron_tiers_are_independent() {
    let mut e = electron(40.0, 0.4, 0.0);
    e.delta_phi_sc_track = 0.055;
    let r = ElectronIdResult::evaluate(&e, &[], &Default::default());
    assert!(r.tight);
    assert!(!r.loose);
}

#[test]
fn non_me0_muon_fails_regardless_of_cuts() {
    let m = Muon { p4: PtEtaPhiM::massless(15.0, 2.2, 0.0), is_me0: false, chambers: vec![] };
    let wide = Me0Cuts { pull_x: f64::MAX, delta_x: f64::MAX, pull_y: f64::MAX, delta_y: f64::MAX, delta_phi: f64::MAX };
    assert!(!is_me0_muon_selected(&m, &wide));
}

#[test]
fn jet_matching_an_electron_is_dropped_everywhere() {
    let mut ev = Event::empty();
    ev.vertices = vec![good_vertex()];
    ev.electrons = vec![electron(45.0, 0.3, 0.7)];
    ev.jets = vec![jet(45.2, 0.302, 0.7, 0.95), jet(70.0, -1.0, 2.0, 0.1)];

    let mut a = recording(AnalysisConfig::default());
    let outcome = a.process_event(&ev).unwrap();
    let s = outcome.summary().unwrap();
    assert_eq!(s.overlap.discarded, vec![0]);
    assert_eq!(s.jets.counts.good, 1);
    assert_eq!(a.sink().values(names::ALL_JETS_PT), vec![70.0]);
    assert_eq!(a.sink().values(GOOD_JETS.pt), vec![70.0]);
    assert_eq!(a.sink().values(names::ALL_JETS_N), vec![2.0]);
}

#[derive(Default)]
struct Counting {
    fills: usize,
}

impl StatisticsSink for Counting {
    fn fill(&mut self, _name: &str, _value: f64) {
        self.fills += 1;
    }

    fn fill_profile(&mut self, _name: &str, _x: f64, _y: f64) {
        self.fills += 1;
    }
}

#[test]
fn custom_sink_is_accepted() {
    let mut ev = Event::empty();
    ev.vertices = vec![good_vertex()];
    let mut a = Analyzer::new(AnalysisConfig::default(), Counting::default()).unwrap();
    a.process_event(&ev).unwrap();
    assert!(a.sink().fills > 0);
}

fn arb_jet() -> impl Strategy<Value = Jet> {
    (0.0f64..120.0, -5.5f64..5.5, -3.1f64..3.1, 0.0f64..1.0, 0.0f64..1.0, 0u32..4, any::<bool>()).prop_map(
        |(pt, eta, phi, csv, nhf, nconst, b)| {
            let mut j = jet(pt, eta, phi, csv);
            j.id.nhf = nhf;
            j.id.n_constituents = nconst;
            j.gen_parton_pdg_id = b.then_some(5);
            j
        },
    )
}

proptest! {
    #[test]
    fn prop_buckets_partition_good_jets(
        jets in proptest::collection::vec(arb_jet(), 0..12),
        lepton_picks in proptest::collection::vec(any::<prop::sample::Index>(), 0..3),
        deep_csv in any::<bool>(),
    ) {
        let mut ev = Event::empty();
        ev.vertices = vec![good_vertex()];
        let mut picked = Vec::new();
        for pick in &lepton_picks {
            if jets.is_empty() {
                break;
            }
            let i = pick.index(jets.len());
            if jets[i].p4.pt > 0.0 {
                picked.push(i);
            }
            ev.muons.push(Muon { p4: jets[i].p4, is_me0: false, chambers: vec![] });
        }
        ev.jets = jets;
        let scheme = if deep_csv { BTagScheme::DeepCsv } else { BTagScheme::CsvV2 };

        let mut a = recording(AnalysisConfig::default().btag_scheme(scheme));
        let outcome = a.process_event(&ev).unwrap();
        let s = outcome.summary().unwrap();
        let c = s.jets.counts;
        prop_assert_eq!(c.light + c.btagged, c.good);
        prop_assert_eq!(c.light_true_b + c.btagged_true_b, c.good_true_b);
        prop_assert_eq!(s.overlap.kept.len() + s.overlap.discarded.len(), ev.jets.len());

        for i in &picked {
            prop_assert!(s.overlap.discarded.contains(i));
        }
        for &i in &s.overlap.discarded {
            prop_assert_eq!(s.jets.jets[i].bucket, JetBucket::Overlapping);
        }
        let good_fills = a.sink().values(GOOD_JETS.pt).len();
        prop_assert_eq!(good_fills, c.good);
        prop_assert_eq!(a.sink().values(names::ALL_JETS_PT).len(), s.overlap.kept.len());
    }
}
