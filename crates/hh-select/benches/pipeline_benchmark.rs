use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hh_select::catalogue::book_histograms;
use hh_select::event::{
    BTagScores, Event, GenJet, GenParticle, Jet, JetIdVariables, PackedGenParticle, Parents, Photon, PtEtaPhiM,
    SuperCluster, Vertex,
};
use hh_select::{AnalysisConfig, Analyzer};
use std::hint::black_box;

fn spread(i: usize, scale: f64, lo: f64, width: f64) -> f64 {
    lo + ((i as f64) * scale) % width
}

fn make_event(n: usize) -> Event {
    let mut ev = Event::empty();
    ev.vertices = (0..8).map(|i| Vertex { is_fake: i == 0, ndof: 3.0 + i as f64 }).collect();
    ev.jets = (0..n)
        .map(|i| Jet {
            p4: PtEtaPhiM::new(spread(i, 17.3, 15.0, 150.0), spread(i, 0.77, -4.8, 9.6), spread(i, 1.31, -3.1, 6.2), 8.0),
            btag: BTagScores { deep_csv_b: spread(i, 0.13, 0.0, 0.6), deep_csv_bb: 0.05, csv_v2: spread(i, 0.21, 0.0, 1.0) },
            id: JetIdVariables { chf: 0.3, nhf: 0.2, cef: 0.1, nef: 0.3, charged_multiplicity: 4, n_constituents: 9 },
            gen_parton_pdg_id: Some(if i % 3 == 0 { 5 } else { 21 }),
        })
        .collect();
    ev.photons = (0..n / 2)
        .map(|i| {
            let (pt, eta, phi) = (spread(i, 23.1, 8.0, 90.0), spread(i, 0.53, -2.6, 5.2), spread(i, 1.7, -3.1, 6.2));
            Photon {
                p4: PtEtaPhiM::massless(pt, eta, phi),
                super_cluster: SuperCluster { energy: pt * eta.cosh() * 0.98, eta, phi },
                r9: 0.9,
                hadronic_over_em: 0.01,
                sigma_ieta_ieta: 0.01,
                charged_hadron_iso: 0.2,
                neutral_hadron_iso: 0.5,
                photon_iso: 0.7,
                puppi_charged_hadron_iso: 0.1,
                puppi_neutral_hadron_iso: 0.4,
                puppi_photon_iso: 0.6,
            }
        })
        .collect();
    ev.gen_particles.push(GenParticle { p4: PtEtaPhiM::new(0.0, 0.0, 0.0, 125.0), pdg_id: 25, status: 22, parents: Parents::none() });
    ev.gen_particles.push(GenParticle { p4: PtEtaPhiM::new(0.0, 0.0, 0.0, 125.0), pdg_id: 25, status: 22, parents: Parents::none() });
    for (i, p) in ev.photons.iter().take(2).enumerate() {
        ev.gen_particles.push(GenParticle { p4: p.p4, pdg_id: 22, status: 1, parents: Parents::one(i % 2) });
    }
    for i in 0..2 {
        let j = &ev.jets[i % n.max(1)].p4;
        ev.gen_particles.push(GenParticle { p4: PtEtaPhiM::new(j.pt, j.eta, j.phi, 4.8), pdg_id: 5, status: 23, parents: Parents::one(1) });
    }
    ev.gen_jets = ev
        .jets
        .iter()
        .map(|j| GenJet {
            p4: j.p4,
            constituents: (0..6).map(|k| PtEtaPhiM::massless(j.p4.pt / 6.0, j.p4.eta + 0.02 * k as f64, j.p4.phi)).collect(),
        })
        .collect();
    ev.packed_gen_particles = ev
        .jets
        .iter()
        .step_by(4)
        .map(|j| PackedGenParticle { p4: PtEtaPhiM::massless(j.p4.pt * 0.3, j.p4.eta + 0.05, j.p4.phi), pdg_id: 13 })
        .collect();
    ev
}

fn bench_process_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for n in [4usize, 12, 40] {
        let ev = make_event(n);
        group.bench_with_input(BenchmarkId::new("process_event", n), &n, |b, _| {
            let book = book_histograms().unwrap();
            let mut analyzer = Analyzer::new(AnalysisConfig::default(), book).unwrap();
            b.iter(|| black_box(analyzer.process_event(black_box(&ev)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_process_event);
criterion_main!(benches);
