//! Positional-match qualification of muons reconstructed in the ME0 detector.

use hh_core::StatisticsSink;

use crate::catalogue::names;
use crate::config::Me0Cuts;
use crate::event::{ChamberMatch, Muon, SegmentMatch};

/// Sub-detector identifier of ME0 chambers.
pub const ME0_DETECTOR_ID: i32 = 5;

/// Residual used when no ME0 segment was found; fails every default cut.
pub const NO_MATCH: f64 = 999.0;

/// Chamber-segment residuals of the last ME0 segment seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Me0MatchQuality {
    /// |Δx|.
    pub delta_x: f64,
    /// |Δy|.
    pub delta_y: f64,
    /// |Δx| / σ.
    pub pull_x: f64,
    /// |Δy| / σ.
    pub pull_y: f64,
    /// |atan(dx/dz) chamber - atan(dx/dz) segment|.
    pub delta_phi: f64,
}

impl Default for Me0MatchQuality {
    fn default() -> Self {
        Self { delta_x: NO_MATCH, delta_y: NO_MATCH, pull_x: NO_MATCH, pull_y: NO_MATCH, delta_phi: NO_MATCH }
    }
}

impl Me0MatchQuality {
    fn between(chamber: &ChamberMatch, segment: &SegmentMatch) -> Self {
        let delta_x = (chamber.x - segment.x).abs();
        let delta_y = (chamber.y - segment.y).abs();
        Self {
            delta_x,
            delta_y,
            pull_x: delta_x / (chamber.x_var + segment.x_var).sqrt(),
            pull_y: delta_y / (chamber.y_var + segment.y_var).sqrt(),
            delta_phi: (chamber.dxdz.atan() - segment.dxdz.atan()).abs(),
        }
    }

    /// Residuals of the last ME0 segment over all ME0 chambers.
    pub fn of(muon: &Muon) -> Self {
        muon.chambers
            .iter()
            .filter(|c| c.detector == ME0_DETECTOR_ID)
            .flat_map(|c| c.me0_segments.iter().map(move |s| (c, s)))
            .last()
            .map(|(c, s)| Self::between(c, s))
            .unwrap_or_default()
    }

    /// Whether the residuals satisfy `cuts`.
    pub fn passes(&self, cuts: &Me0Cuts) -> bool {
        let x = self.pull_x < cuts.pull_x || self.delta_x < cuts.delta_x;
        let y = self.pull_y < cuts.pull_y || self.delta_y < cuts.delta_y;
        x && y && self.delta_phi < cuts.delta_phi
    }
}

/// Whether `muon` is an ME0 muon with a compatible segment.
pub fn is_me0_muon_selected(muon: &Muon, cuts: &Me0Cuts) -> bool {
    muon.is_me0 && Me0MatchQuality::of(muon).passes(cuts)
}

/// Push `MuonsME0` for ME0 muons; other muons are not counted.
pub fn fill_me0<S: StatisticsSink>(muon: &Muon, cuts: &Me0Cuts, sink: &mut S) {
    if muon.is_me0 {
        let pass = is_me0_muon_selected(muon, cuts);
        sink.fill(names::MUONS_ME0, if pass { 1.0 } else { 0.0 });
    }
}
