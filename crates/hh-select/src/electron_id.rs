//! Cut-based electron identification.
//!
//! The three tiers are separate cut sets. They are not nested: an electron
//! can pass tight and fail loose (the tight Δφ bound is the widest of the
//! three), so callers must evaluate each tier they care about.

use hh_core::StatisticsSink;

use crate::catalogue::names;
use crate::conversion::has_matched_conversion;
use crate::event::{BeamSpot, Conversion, Electron};

/// Lower edge of the barrel/endcap gap in supercluster |η| (exclusive).
pub const GAP_LOW: f64 = 1.479;
/// Upper edge of the barrel/endcap gap in supercluster |η| (exclusive).
pub const GAP_HIGH: f64 = 1.556;

/// Value of the energy-momentum variable when the ECAL energy is not finite.
pub const OOEMOOP_NON_FINITE: f64 = 998.0;

/// Identification tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectronIdTier {
    /// Loose.
    Loose,
    /// Medium.
    Medium,
    /// Tight.
    Tight,
}

/// Upper bounds of one tier. A value strictly above its bound fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectronIdCuts {
    /// Full 5x5 σ_iηiη.
    pub sigma_ieta_ieta: f64,
    /// |Δη(SC, track)|.
    pub delta_eta: f64,
    /// |Δφ(SC, track)|.
    pub delta_phi: f64,
    /// H/E.
    pub hcal_over_ecal: f64,
    /// Charged hadron isolation over pt.
    pub rel_charged_iso: f64,
    /// |1/E - 1/p|.
    pub ooemoop: f64,
}

impl ElectronIdTier {
    /// All tiers, in histogram-bin order.
    pub const ALL: [ElectronIdTier; 3] = [ElectronIdTier::Loose, ElectronIdTier::Medium, ElectronIdTier::Tight];

    /// Cut values of this tier.
    pub fn cuts(self) -> ElectronIdCuts {
        match self {
            ElectronIdTier::Loose => ElectronIdCuts {
                sigma_ieta_ieta: 0.02992,
                delta_eta: 0.004119,
                delta_phi: 0.05176,
                hcal_over_ecal: 6.741,
                rel_charged_iso: 2.5,
                ooemoop: 73.76,
            },
            ElectronIdTier::Medium => ElectronIdCuts {
                sigma_ieta_ieta: 0.01609,
                delta_eta: 0.001766,
                delta_phi: 0.03130,
                hcal_over_ecal: 7.371,
                rel_charged_iso: 1.325,
                ooemoop: 22.6,
            },
            ElectronIdTier::Tight => ElectronIdCuts {
                sigma_ieta_ieta: 0.01614,
                delta_eta: 0.001322,
                delta_phi: 0.06129,
                hcal_over_ecal: 4.492,
                rel_charged_iso: 1.255,
                ooemoop: 18.26,
            },
        }
    }

    /// Bin of `ElectronsID` filled on pass.
    pub fn bin(self) -> f64 {
        match self {
            ElectronIdTier::Loose => 1.0,
            ElectronIdTier::Medium => 2.0,
            ElectronIdTier::Tight => 3.0,
        }
    }
}

/// Supercluster in the barrel/endcap transition region.
pub fn in_crack(sc_eta: f64) -> bool {
    let a = sc_eta.abs();
    a > GAP_LOW && a < GAP_HIGH
}

/// `|1/E - (E/p)/E|`, with 0 for zero ECAL energy and a fixed large value
/// for non-finite energy.
pub fn ooemoop(electron: &Electron) -> f64 {
    let e = electron.ecal_energy;
    if e == 0.0 {
        0.0
    } else if !e.is_finite() {
        OOEMOOP_NON_FINITE
    } else {
        (1.0 / e - electron.e_sc_over_p / e).abs()
    }
}

/// Evaluate one tier. Cuts are applied in order and the first failure
/// short-circuits; the conversion veto runs last.
pub fn passes_id(
    electron: &Electron,
    tier: ElectronIdTier,
    conversions: &[Conversion],
    beam_spot: &BeamSpot,
) -> bool {
    let c = tier.cuts();
    if in_crack(electron.sc_eta) {
        return false;
    }
    if electron.full5x5_sigma_ieta_ieta > c.sigma_ieta_ieta {
        return false;
    }
    if electron.delta_eta_sc_track.abs() > c.delta_eta {
        return false;
    }
    if electron.delta_phi_sc_track.abs() > c.delta_phi {
        return false;
    }
    if electron.hcal_over_ecal > c.hcal_over_ecal {
        return false;
    }
    if electron.sum_charged_hadron_pt / electron.p4.pt > c.rel_charged_iso {
        return false;
    }
    if ooemoop(electron) > c.ooemoop {
        return false;
    }
    !has_matched_conversion(electron, conversions, beam_spot)
}

/// Tier decisions for one electron.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElectronIdResult {
    /// Loose pass.
    pub loose: bool,
    /// Medium pass.
    pub medium: bool,
    /// Tight pass.
    pub tight: bool,
}

impl ElectronIdResult {
    /// Evaluate every tier independently.
    pub fn evaluate(electron: &Electron, conversions: &[Conversion], beam_spot: &BeamSpot) -> Self {
        Self {
            loose: passes_id(electron, ElectronIdTier::Loose, conversions, beam_spot),
            medium: passes_id(electron, ElectronIdTier::Medium, conversions, beam_spot),
            tight: passes_id(electron, ElectronIdTier::Tight, conversions, beam_spot),
        }
    }

    /// Decision for one tier.
    pub fn passes(&self, tier: ElectronIdTier) -> bool {
        match tier {
            ElectronIdTier::Loose => self.loose,
            ElectronIdTier::Medium => self.medium,
            ElectronIdTier::Tight => self.tight,
        }
    }

    /// Push `ElectronsID`: bin 0 always, then one bin per passed tier.
    pub fn fill<S: StatisticsSink>(&self, sink: &mut S) {
        sink.fill(names::ELECTRONS_ID, 0.0);
        for tier in ElectronIdTier::ALL {
            if self.passes(tier) {
                sink.fill(names::ELECTRONS_ID, tier.bin());
            }
        }
    }
}
