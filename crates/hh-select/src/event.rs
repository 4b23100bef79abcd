//! Per-event input collections.
//!
//! Every named collection is mandatory: an event record missing one fails to
//! deserialize, which surfaces as a setup error rather than a per-event
//! condition. Optional per-object details default to empty.

use hh_core::{Error, LorentzVector, Result, delta_r};
use serde::{Deserialize, Serialize};

/// PDG particle codes used by the selection.
pub mod pdg {
    /// Bottom quark.
    pub const BOTTOM: i32 = 5;
    /// Electron.
    pub const ELECTRON: i32 = 11;
    /// Muon.
    pub const MUON: i32 = 13;
    /// Photon.
    pub const PHOTON: i32 = 22;
    /// Higgs boson.
    pub const HIGGS: i32 = 25;

    /// Charged light lepton (electron or muon) of either charge.
    pub fn is_light_lepton(pdg_id: i32) -> bool {
        matches!(pdg_id.abs(), ELECTRON | MUON)
    }
}

/// Kinematics stored as `(pt, eta, phi, mass)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PtEtaPhiM {
    /// Transverse momentum.
    pub pt: f64,
    /// Pseudorapidity.
    pub eta: f64,
    /// Azimuth.
    pub phi: f64,
    /// Mass.
    #[serde(default)]
    pub mass: f64,
}

impl PtEtaPhiM {
    /// Create from components.
    pub fn new(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        Self { pt, eta, phi, mass }
    }

    /// Massless kinematics.
    pub fn massless(pt: f64, eta: f64, phi: f64) -> Self {
        Self { pt, eta, phi, mass: 0.0 }
    }

    /// Cartesian four-vector.
    pub fn to_lorentz(&self) -> LorentzVector {
        LorentzVector::from_pt_eta_phi_m(self.pt, self.eta, self.phi, self.mass)
    }

    /// Angular distance to another object.
    pub fn delta_r(&self, other: &PtEtaPhiM) -> f64 {
        delta_r(self.eta, self.phi, other.eta, other.phi)
    }
}

/// A three-dimensional point (cm).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    /// x
    pub x: f64,
    /// y
    pub y: f64,
    /// z
    pub z: f64,
}

/// Reconstructed collision vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Vertex was not really fitted (placeholder from the beam spot).
    #[serde(default)]
    pub is_fake: bool,
    /// Number of degrees of freedom of the vertex fit.
    pub ndof: f64,
}

/// b-tag discriminant outputs attached to a jet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BTagScores {
    /// DeepCSV probability for exactly one b hadron.
    #[serde(default)]
    pub deep_csv_b: f64,
    /// DeepCSV probability for two b hadrons.
    #[serde(default)]
    pub deep_csv_bb: f64,
    /// Combined secondary-vertex (v2) discriminant.
    #[serde(default)]
    pub csv_v2: f64,
}

/// Particle-flow energy fractions and multiplicities used by jet ID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JetIdVariables {
    /// Charged hadron energy fraction.
    pub chf: f64,
    /// Neutral hadron energy fraction.
    pub nhf: f64,
    /// Charged electromagnetic energy fraction.
    pub cef: f64,
    /// Neutral electromagnetic energy fraction.
    pub nef: f64,
    /// Number of charged constituents.
    pub charged_multiplicity: u32,
    /// Total number of constituents.
    pub n_constituents: u32,
}

/// Reconstructed jet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    /// Kinematics.
    pub p4: PtEtaPhiM,
    /// b-tag discriminants.
    #[serde(default)]
    pub btag: BTagScores,
    /// Inputs to the loose/tight jet-ID functors.
    #[serde(default)]
    pub id: JetIdVariables,
    /// PDG code of the matched generator parton, if any.
    #[serde(default)]
    pub gen_parton_pdg_id: Option<i32>,
}

/// Reconstructed electron with the identification inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Electron {
    /// Kinematics.
    pub p4: PtEtaPhiM,
    /// Supercluster pseudorapidity.
    pub sc_eta: f64,
    /// Full 5x5 σ_iηiη shower shape.
    pub full5x5_sigma_ieta_ieta: f64,
    /// Δη between supercluster and track at the vertex.
    pub delta_eta_sc_track: f64,
    /// Δφ between supercluster and track at the vertex.
    pub delta_phi_sc_track: f64,
    /// Hadronic over electromagnetic energy.
    pub hcal_over_ecal: f64,
    /// Sum of charged hadron pt in the isolation cone.
    pub sum_charged_hadron_pt: f64,
    /// ECAL energy.
    pub ecal_energy: f64,
    /// Supercluster energy over track momentum.
    pub e_sc_over_p: f64,
    /// Identifier of the electron track, used for conversion matching.
    #[serde(default)]
    pub track_id: u64,
}

/// Segment match inside a muon chamber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentMatch {
    /// Local x.
    pub x: f64,
    /// Local y.
    pub y: f64,
    /// Variance of local x.
    pub x_var: f64,
    /// Variance of local y.
    pub y_var: f64,
    /// Local slope dx/dz.
    pub dxdz: f64,
}

/// Track extrapolation matched to a muon chamber.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChamberMatch {
    /// Sub-detector identifier.
    pub detector: i32,
    /// Extrapolated local x.
    pub x: f64,
    /// Extrapolated local y.
    pub y: f64,
    /// Variance of local x.
    pub x_var: f64,
    /// Variance of local y.
    pub y_var: f64,
    /// Extrapolated local slope dx/dz.
    pub dxdz: f64,
    /// ME0 segments matched in this chamber.
    #[serde(default)]
    pub me0_segments: Vec<SegmentMatch>,
}

/// Reconstructed muon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Muon {
    /// Kinematics.
    pub p4: PtEtaPhiM,
    /// Muon was reconstructed by the ME0 forward detector.
    #[serde(default)]
    pub is_me0: bool,
    /// Chamber matches.
    #[serde(default)]
    pub chambers: Vec<ChamberMatch>,
}

/// Supercluster attached to a photon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SuperCluster {
    /// Raw energy.
    pub energy: f64,
    /// Position pseudorapidity.
    pub eta: f64,
    /// Position azimuth.
    pub phi: f64,
}

/// Reconstructed photon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photon {
    /// Corrected kinematics (massless).
    pub p4: PtEtaPhiM,
    /// Supercluster (source of the raw four-vector).
    pub super_cluster: SuperCluster,
    /// E(3x3) / E(supercluster).
    #[serde(default)]
    pub r9: f64,
    /// Hadronic over electromagnetic energy.
    #[serde(default)]
    pub hadronic_over_em: f64,
    /// σ_iηiη shower shape.
    #[serde(default)]
    pub sigma_ieta_ieta: f64,
    /// Charged hadron isolation.
    #[serde(default)]
    pub charged_hadron_iso: f64,
    /// Neutral hadron isolation.
    #[serde(default)]
    pub neutral_hadron_iso: f64,
    /// Photon isolation.
    #[serde(default)]
    pub photon_iso: f64,
    /// Charged hadron isolation, PUPPI weighted.
    #[serde(default)]
    pub puppi_charged_hadron_iso: f64,
    /// Neutral hadron isolation, PUPPI weighted.
    #[serde(default)]
    pub puppi_neutral_hadron_iso: f64,
    /// Photon isolation, PUPPI weighted.
    #[serde(default)]
    pub puppi_photon_iso: f64,
}

/// Missing transverse energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Met {
    /// Magnitude.
    pub pt: f64,
    /// Azimuth.
    pub phi: f64,
}

/// Reconstructed photon conversion (e⁺e⁻ pair vertex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Identifiers of the tracks forming the conversion.
    pub track_ids: Vec<u64>,
    /// Conversion vertex position.
    pub vertex: Point3,
    /// Whether the vertex fit converged.
    #[serde(default = "default_true")]
    pub vertex_valid: bool,
    /// Vertex fit χ² probability.
    pub vertex_probability: f64,
    /// Refitted pair momentum, x.
    pub px: f64,
    /// Refitted pair momentum, y.
    pub py: f64,
    /// Tracker hits before the vertex, per leg.
    #[serde(default)]
    pub n_hits_before_vertex: Vec<u8>,
}

fn default_true() -> bool {
    true
}

/// Beam spot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamSpot {
    /// Beam-line position.
    pub position: Point3,
}

/// Parent links of a generator particle: zero, one or two indices into the
/// event's generator-particle arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Parents {
    slots: [usize; 2],
    len: u8,
}

impl Parents {
    /// No parents.
    pub fn none() -> Self {
        Self::default()
    }

    /// A single parent.
    pub fn one(a: usize) -> Self {
        Self { slots: [a, 0], len: 1 }
    }

    /// Two parents.
    pub fn two(a: usize, b: usize) -> Self {
        Self { slots: [a, b], len: 2 }
    }

    /// Number of parents (0, 1 or 2).
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// No parents at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the `k`-th parent.
    pub fn get(&self, k: usize) -> Option<usize> {
        (k < self.len()).then(|| self.slots[k])
    }

    /// Parent indices in order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots[..self.len()].iter().copied()
    }
}

impl TryFrom<Vec<usize>> for Parents {
    type Error = String;

    fn try_from(v: Vec<usize>) -> std::result::Result<Self, Self::Error> {
        match v.as_slice() {
            [] => Ok(Parents::none()),
            [a] => Ok(Parents::one(*a)),
            [a, b] => Ok(Parents::two(*a, *b)),
            _ => Err(format!("a generator particle has at most 2 parents, got {}", v.len())),
        }
    }
}

impl From<Parents> for Vec<usize> {
    fn from(p: Parents) -> Self {
        p.iter().collect()
    }
}

/// Generator-level particle in the full history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenParticle {
    /// Kinematics.
    pub p4: PtEtaPhiM,
    /// PDG code.
    pub pdg_id: i32,
    /// Generator status code.
    #[serde(default)]
    pub status: i32,
    /// Parent indices into the same collection.
    #[serde(default)]
    pub parents: Parents,
}

impl GenParticle {
    /// The `k`-th parent, looked up in the owning arena.
    pub fn parent<'a>(&self, arena: &'a [GenParticle], k: usize) -> Option<&'a GenParticle> {
        self.parents.get(k).and_then(|i| arena.get(i))
    }
}

/// Stable generator particle from the packed (final-state) collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackedGenParticle {
    /// Kinematics.
    pub p4: PtEtaPhiM,
    /// PDG code.
    pub pdg_id: i32,
}

/// Generator-level jet with its constituents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenJet {
    /// Kinematics.
    pub p4: PtEtaPhiM,
    /// Constituent kinematics.
    #[serde(default)]
    pub constituents: Vec<PtEtaPhiM>,
}

/// One collision event: every collection the selection reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Reconstructed vertices.
    pub vertices: Vec<Vertex>,
    /// Electrons.
    pub electrons: Vec<Electron>,
    /// Muons.
    pub muons: Vec<Muon>,
    /// Jets.
    pub jets: Vec<Jet>,
    /// Missing transverse energy objects.
    pub mets: Vec<Met>,
    /// Photons.
    pub photons: Vec<Photon>,
    /// Photon conversions (electron veto).
    pub conversions: Vec<Conversion>,
    /// Beam spot.
    pub beam_spot: BeamSpot,
    /// Full generator history.
    pub gen_particles: Vec<GenParticle>,
    /// Packed stable generator particles.
    pub packed_gen_particles: Vec<PackedGenParticle>,
    /// Generator jets.
    pub gen_jets: Vec<GenJet>,
}

impl Event {
    /// An event with every collection empty.
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            electrons: Vec::new(),
            muons: Vec::new(),
            jets: Vec::new(),
            mets: Vec::new(),
            photons: Vec::new(),
            conversions: Vec::new(),
            beam_spot: BeamSpot::default(),
            gen_particles: Vec::new(),
            packed_gen_particles: Vec::new(),
            gen_jets: Vec::new(),
        }
    }

    /// Check structural consistency of the generator-particle arena.
    pub fn validate(&self) -> Result<()> {
        let n = self.gen_particles.len();
        for (i, p) in self.gen_particles.iter().enumerate() {
            for parent in p.parents.iter() {
                if parent >= n {
                    return Err(Error::Validation(format!(
                        "gen particle {i}: parent index {parent} out of range (n={n})"
                    )));
                }
                if parent == i {
                    return Err(Error::Validation(format!("gen particle {i} lists itself as parent")));
                }
            }
        }
        Ok(())
    }

    /// Parse one event from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
