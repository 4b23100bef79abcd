//! Jet quality tiers, b tagging and bucket multiplicities.

use hh_core::StatisticsSink;

use crate::catalogue::{GOOD_BTAGGED_JETS, GOOD_JETS, GOOD_LIGHT_JETS, JetBucketNames, names};
use crate::config::BTagScheme;
use crate::event::{Jet, JetIdVariables, pdg};

/// Minimum pt (inclusive) of a good jet.
pub const GOOD_JET_MIN_PT: f64 = 30.0;
/// Maximum |η| (inclusive) of a good jet.
pub const GOOD_JET_MAX_ABS_ETA: f64 = 4.7;

/// Particle-flow jet identification tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PfJetId {
    /// Loose working point.
    Loose,
    /// Tight working point.
    Tight,
}

impl PfJetId {
    fn neutral_fraction_max(self) -> f64 {
        match self {
            PfJetId::Loose => 0.99,
            PfJetId::Tight => 0.90,
        }
    }

    /// Evaluate the identification on a jet at pseudorapidity `eta`.
    pub fn passes(self, id: &JetIdVariables, eta: f64) -> bool {
        let c = self.neutral_fraction_max();
        let mut ok = id.nhf < c && id.nef < c && id.n_constituents > 1;
        if eta.abs() < 2.4 {
            ok = ok && id.chf > 0.0 && id.charged_multiplicity > 0 && id.cef < 0.99;
        }
        ok
    }
}

/// Which bucket a jet ended up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JetBucket {
    /// Coincides with a lepton; never classified.
    Overlapping,
    /// Fails the kinematic or quality gate.
    Rejected,
    /// Good, not b-tagged.
    Light,
    /// Good and b-tagged.
    BTagged,
}

/// Per-jet classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedJet {
    /// Index into the event's jet collection.
    pub index: usize,
    /// Discriminant under the configured scheme.
    pub discriminant: f64,
    /// Loose ID pass.
    pub loose: bool,
    /// Tight ID pass.
    pub tight: bool,
    /// Final bucket.
    pub bucket: JetBucket,
    /// Matched to a generator b parton.
    pub true_b: bool,
}

/// Bucket multiplicities of one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JetMultiplicities {
    /// Size of the raw jet collection.
    pub all: usize,
    /// Jets surviving overlap removal.
    pub non_overlapping: usize,
    /// Good jets.
    pub good: usize,
    /// Good jets matched to a b parton.
    pub good_true_b: usize,
    /// Good light jets.
    pub light: usize,
    /// Good light jets matched to a b parton.
    pub light_true_b: usize,
    /// Good b-tagged jets.
    pub btagged: usize,
    /// Good b-tagged jets matched to a b parton.
    pub btagged_true_b: usize,
}

/// Full jet classification of one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JetClassification {
    /// Every non-overlapping jet, plus overlapping ones marked as such, in input order.
    pub jets: Vec<ClassifiedJet>,
    /// Multiplicities.
    pub counts: JetMultiplicities,
}

/// Whether a jet passes the good-jet gate given its loose ID.
pub fn is_good_jet(jet: &Jet, loose: bool) -> bool {
    jet.p4.pt >= GOOD_JET_MIN_PT && jet.p4.eta.abs() <= GOOD_JET_MAX_ABS_ETA && loose
}

/// Classify jets. `kept` holds the indices that survived overlap removal, ascending.
pub fn classify_jets(jets: &[Jet], kept: &[usize], scheme: BTagScheme) -> JetClassification {
    let mut out = JetClassification {
        counts: JetMultiplicities { all: jets.len(), non_overlapping: kept.len(), ..Default::default() },
        ..Default::default()
    };
    let mut next_kept = kept.iter().copied().peekable();
    for (index, jet) in jets.iter().enumerate() {
        let discriminant = scheme.discriminant(&jet.btag);
        let true_b = jet.gen_parton_pdg_id.is_some_and(|id| id.abs() == pdg::BOTTOM);
        if next_kept.next_if_eq(&index).is_none() {
            out.jets.push(ClassifiedJet {
                index,
                discriminant,
                loose: false,
                tight: false,
                bucket: JetBucket::Overlapping,
                true_b,
            });
            continue;
        }
        let loose = PfJetId::Loose.passes(&jet.id, jet.p4.eta);
        let tight = PfJetId::Tight.passes(&jet.id, jet.p4.eta);
        let bucket = if !is_good_jet(jet, loose) {
            JetBucket::Rejected
        } else if scheme.is_tagged(discriminant) {
            JetBucket::BTagged
        } else {
            JetBucket::Light
        };

        let c = &mut out.counts;
        match bucket {
            JetBucket::Light => {
                c.good += 1;
                c.light += 1;
                if true_b {
                    c.good_true_b += 1;
                    c.light_true_b += 1;
                }
            }
            JetBucket::BTagged => {
                c.good += 1;
                c.btagged += 1;
                if true_b {
                    c.good_true_b += 1;
                    c.btagged_true_b += 1;
                }
            }
            JetBucket::Rejected | JetBucket::Overlapping => {}
        }
        out.jets.push(ClassifiedJet { index, discriminant, loose, tight, bucket, true_b });
    }
    out
}

fn fill_jet<S: StatisticsSink>(sink: &mut S, bucket: &JetBucketNames, jet: &Jet, discriminant: f64) {
    sink.fill(bucket.pt, jet.p4.pt);
    sink.fill(bucket.phi, jet.p4.phi);
    sink.fill(bucket.eta, jet.p4.eta);
    sink.fill(bucket.csv, discriminant);
}

impl JetClassification {
    /// Push per-jet distributions and per-event multiplicities.
    pub fn fill<S: StatisticsSink>(&self, jets: &[Jet], sink: &mut S) {
        for cj in &self.jets {
            if cj.bucket == JetBucket::Overlapping {
                continue;
            }
            let Some(jet) = jets.get(cj.index) else { continue };
            sink.fill(names::ALL_JETS_PT, jet.p4.pt);
            sink.fill(names::ALL_JETS_PHI, jet.p4.phi);
            sink.fill(names::ALL_JETS_ETA, jet.p4.eta);
            sink.fill(names::ALL_JETS_CSV, cj.discriminant);
            sink.fill(names::ALL_JETS_ID, 0.0);
            if cj.loose {
                sink.fill(names::ALL_JETS_ID, 1.0);
            }
            if cj.tight {
                sink.fill(names::ALL_JETS_ID, 2.0);
            }
            match cj.bucket {
                JetBucket::Light => {
                    fill_jet(sink, &GOOD_JETS, jet, cj.discriminant);
                    fill_jet(sink, &GOOD_LIGHT_JETS, jet, cj.discriminant);
                }
                JetBucket::BTagged => {
                    fill_jet(sink, &GOOD_JETS, jet, cj.discriminant);
                    fill_jet(sink, &GOOD_BTAGGED_JETS, jet, cj.discriminant);
                }
                JetBucket::Rejected | JetBucket::Overlapping => {}
            }
        }
        let c = &self.counts;
        sink.fill(names::ALL_JETS_N, c.all as f64);
        sink.fill(GOOD_JETS.n, c.good as f64);
        sink.fill(GOOD_JETS.nb, c.good_true_b as f64);
        sink.fill(GOOD_LIGHT_JETS.n, c.light as f64);
        sink.fill(GOOD_LIGHT_JETS.nb, c.light_true_b as f64);
        sink.fill(GOOD_BTAGGED_JETS.n, c.btagged as f64);
        sink.fill(GOOD_BTAGGED_JETS.nb, c.btagged_true_b as f64);
    }
}
