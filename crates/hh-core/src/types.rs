//! Four-vector kinematics shared by reconstructed and generator-level objects.

use std::f64::consts::PI;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Pseudorapidity reported for a vector along the beam axis.
const BEAM_AXIS_ETA: f64 = 1e11;

/// Cartesian four-momentum `(px, py, pz, E)`.
///
/// Follows the ROOT `TLorentzVector` conventions for the derived quantities
/// (signed invariant mass, pseudorapidity on the beam axis, azimuth of a
/// null transverse vector), so that histogrammed values are comparable with
/// existing ROOT-based results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LorentzVector {
    /// x component of the momentum
    pub px: f64,
    /// y component of the momentum
    pub py: f64,
    /// z component of the momentum (beam axis)
    pub pz: f64,
    /// Energy
    pub e: f64,
}

impl LorentzVector {
    /// Build from Cartesian components.
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Build from transverse momentum, pseudorapidity, azimuth and mass.
    ///
    /// A negative mass is interpreted the ROOT way: `E = sqrt(max(p² - m², 0))`.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        let pt = pt.abs();
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p2 = px * px + py * py + pz * pz;
        let e = if m >= 0.0 { (p2 + m * m).sqrt() } else { (p2 - m * m).max(0.0).sqrt() };
        Self { px, py, pz, e }
    }

    /// Build from transverse momentum, pseudorapidity, azimuth and energy.
    pub fn from_pt_eta_phi_e(pt: f64, eta: f64, phi: f64, e: f64) -> Self {
        let pt = pt.abs();
        Self { px: pt * phi.cos(), py: pt * phi.sin(), pz: pt * eta.sinh(), e }
    }

    /// The zero four-vector (default state of unfilled truth slots).
    pub fn zero() -> Self {
        Self::default()
    }

    /// Squared transverse momentum.
    pub fn pt2(&self) -> f64 {
        self.px * self.px + self.py * self.py
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.pt2().sqrt()
    }

    /// Magnitude of the three-momentum.
    pub fn p(&self) -> f64 {
        (self.pt2() + self.pz * self.pz).sqrt()
    }

    /// Energy.
    pub fn energy(&self) -> f64 {
        self.e
    }

    /// Transverse energy `E·pt/p`, signed like the energy.
    pub fn et(&self) -> f64 {
        let pt2 = self.pt2();
        if pt2 == 0.0 {
            return 0.0;
        }
        let et2 = self.e * self.e * pt2 / (pt2 + self.pz * self.pz);
        if self.e < 0.0 { -et2.sqrt() } else { et2.sqrt() }
    }

    /// Azimuthal angle in `(-π, π]`; zero for a null transverse vector.
    pub fn phi(&self) -> f64 {
        if self.px == 0.0 && self.py == 0.0 { 0.0 } else { self.py.atan2(self.px) }
    }

    /// Pseudorapidity.
    ///
    /// Vectors parallel to the beam axis get `±1e11`; the null vector gets 0.
    pub fn eta(&self) -> f64 {
        let p = self.p();
        let cos_theta = if p == 0.0 { 1.0 } else { self.pz / p };
        if cos_theta * cos_theta < 1.0 {
            return -0.5 * ((1.0 - cos_theta) / (1.0 + cos_theta)).ln();
        }
        if self.pz == 0.0 {
            0.0
        } else if self.pz > 0.0 {
            BEAM_AXIS_ETA
        } else {
            -BEAM_AXIS_ETA
        }
    }

    /// Squared invariant mass (may be negative for space-like vectors).
    pub fn m2(&self) -> f64 {
        self.e * self.e - (self.pt2() + self.pz * self.pz)
    }

    /// Invariant mass; `-sqrt(-m²)` for space-like vectors.
    pub fn m(&self) -> f64 {
        let mm = self.m2();
        if mm < 0.0 { -(-mm).sqrt() } else { mm.sqrt() }
    }

    /// Angular distance ΔR to another vector.
    pub fn delta_r(&self, other: &LorentzVector) -> f64 {
        delta_r(self.eta(), self.phi(), other.eta(), other.phi())
    }
}

impl Add for LorentzVector {
    type Output = LorentzVector;

    fn add(self, rhs: LorentzVector) -> LorentzVector {
        LorentzVector {
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
            e: self.e + rhs.e,
        }
    }
}

impl AddAssign for LorentzVector {
    fn add_assign(&mut self, rhs: LorentzVector) {
        *self = *self + rhs;
    }
}

/// Azimuthal difference folded into `[-π, π)`.
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let mut d = phi1 - phi2;
    if !d.is_finite() {
        return d;
    }
    while d >= PI {
        d -= 2.0 * PI;
    }
    while d < -PI {
        d += 2.0 * PI;
    }
    d
}

/// Angular distance `sqrt(Δη² + Δφ²)`.
pub fn delta_r(eta1: f64, phi1: f64, eta2: f64, phi2: f64) -> f64 {
    let deta = eta1 - eta2;
    let dphi = delta_phi(phi1, phi2);
    (deta * deta + dphi * dphi).sqrt()
}
