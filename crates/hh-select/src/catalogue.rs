//! Histogram names and binning, declared once for the whole run.

use hh_core::Result;
use hh_hist::{HistogramBook, HistogramSpec, ProfileSpec};

/// Stable histogram identifiers.
pub mod names {
    /// Number of vertices in the event.
    pub const ALL_VERTICES: &str = "AllVertices";
    /// Number of qualifying vertices.
    pub const GOOD_VERTICES: &str = "GoodVertices";

    /// Fiducial generator-jet multiplicity.
    pub const GEN_JETS_N: &str = "GenJetsN";
    /// Fiducial generator-jet pt.
    pub const GEN_JETS_PT: &str = "GenJetsPt";
    /// Fiducial generator-jet φ.
    pub const GEN_JETS_PHI: &str = "GenJetsPhi";
    /// Fiducial generator-jet η.
    pub const GEN_JETS_ETA: &str = "GenJetsEta";
    /// Truth diphoton mass.
    pub const GEN_DIPHOTON_MASS: &str = "genPhotonHiggsMass";
    /// Truth di-b-quark mass.
    pub const GEN_DIB_MASS: &str = "genBJetDble_Higgs_Mass";
    /// Truth four-object mass.
    pub const GEN_HH_MASS: &str = "genHHMass";
    /// Higgs-daughter b quarks per event.
    pub const GEN_HIGGS_B_N: &str = "GenHiggsBQuarksN";
    /// Isolated truth leptons per event.
    pub const GEN_ISOLATED_LEPTONS_N: &str = "GenIsolatedLeptonsN";

    /// Raw jet multiplicity (before overlap removal).
    pub const ALL_JETS_N: &str = "AllJetsN";
    /// Non-overlapping jet pt.
    pub const ALL_JETS_PT: &str = "AllJetsPt";
    /// Non-overlapping jet φ.
    pub const ALL_JETS_PHI: &str = "AllJetsPhi";
    /// Non-overlapping jet η.
    pub const ALL_JETS_ETA: &str = "AllJetsEta";
    /// Non-overlapping jet discriminant.
    pub const ALL_JETS_CSV: &str = "AllJetsCSV";
    /// Jet-ID tally: 0 = all, 1 = loose, 2 = tight.
    pub const ALL_JETS_ID: &str = "AllJetsID";

    /// Missing transverse energy magnitude.
    pub const MET_PT: &str = "GoodMETPt";
    /// Missing transverse energy azimuth.
    pub const MET_PHI: &str = "GoodMETPhi";

    /// Electron-ID tally: 0 = all, 1 = loose, 2 = medium, 3 = tight.
    pub const ELECTRONS_ID: &str = "ElectronsID";
    /// ME0 positional match for ME0 muons: 0 = fail, 1 = pass.
    pub const MUONS_ME0: &str = "MuonsME0";

    /// Per-photon selection flag: 0 = fail, 1 = pass.
    pub const PHOTON_PASSING: &str = "photonPassingCount";
    /// Selected photons per event.
    pub const PHOTON_COUNT: &str = "photonCount";
    /// Matched photon pt.
    pub const PHOTON_PT: &str = "photonPt";
    /// Matched photon η.
    pub const PHOTON_ETA: &str = "photonEta";
    /// Matched photon R9.
    pub const PHOTON_R9: &str = "photonR9";
    /// Matched photon H/E.
    pub const PHOTON_HOVERE: &str = "photonHoverE";
    /// Matched photon σ_iηiη.
    pub const PHOTON_SIGMA_IETA_IETA: &str = "photonSigmaIetaIeta";
    /// Matched photon neutral hadron isolation.
    pub const PHOTON_ISO_NEU_HAD: &str = "photonIsolatedNeuHadron";
    /// Matched photon charged hadron isolation.
    pub const PHOTON_ISO_CHAR_HAD: &str = "photonIsolatedCharHadron";
    /// Matched photon photon isolation.
    pub const PHOTON_ISO: &str = "photonIsolated";
    /// PUPPI neutral hadron isolation.
    pub const PUPPI_PHOTON_ISO_NEU_HAD: &str = "puppiPhotonIsolatedNeuHadron";
    /// PUPPI charged hadron isolation.
    pub const PUPPI_PHOTON_ISO_CHAR_HAD: &str = "puppiPhotonIsolatedCharHadron";
    /// PUPPI photon isolation.
    pub const PUPPI_PHOTON_ISO: &str = "puppiPhotonIsolated";

    /// Reconstructed diphoton mass.
    pub const RECO_DIPHOTON_MASS: &str = "recoPhotonHiggsMass";
    /// Reconstructed diphoton mass, truth m(HH) > 350.
    pub const RECO_DIPHOTON_MASS_HM: &str = "recoPhotonHiggsMass_HM";
    /// Reconstructed diphoton mass, 250 < truth m(HH) < 350.
    pub const RECO_DIPHOTON_MASS_LM: &str = "recoPhotonHiggsMass_LM";
    /// Supercluster diphoton mass.
    pub const RECO_DIPHOTON_MASS_RAW: &str = "recoPhotonHiggsMass_raw";
    /// Supercluster diphoton mass, high m(HH).
    pub const RECO_DIPHOTON_MASS_HM_RAW: &str = "recoPhotonHiggsMass_HM_raw";
    /// Supercluster diphoton mass, low m(HH).
    pub const RECO_DIPHOTON_MASS_LM_RAW: &str = "recoPhotonHiggsMass_LM_raw";

    /// Profile of reco/truth pt ratio against truth pt.
    pub const PHOTON_PT_RATIO: &str = "PhotonPtr";
    /// Same, using the supercluster four-vector.
    pub const PHOTON_PT_RATIO_RAW: &str = "PhotonPtr_raw";
}

/// Histogram names for one "good" jet bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JetBucketNames {
    /// Multiplicity.
    pub n: &'static str,
    /// Multiplicity of jets matched to a b parton.
    pub nb: &'static str,
    /// pt.
    pub pt: &'static str,
    /// φ.
    pub phi: &'static str,
    /// η.
    pub eta: &'static str,
    /// b-tag discriminant.
    pub csv: &'static str,
}

/// All jets passing kinematics and loose ID.
pub const GOOD_JETS: JetBucketNames = JetBucketNames {
    n: "GoodJetsN",
    nb: "GoodJetsNb",
    pt: "GoodJetsPt",
    phi: "GoodJetsPhi",
    eta: "GoodJetsEta",
    csv: "GoodJetsCSV",
};

/// Good jets failing the b-tag working point.
pub const GOOD_LIGHT_JETS: JetBucketNames = JetBucketNames {
    n: "GoodLightJetsN",
    nb: "GoodLightJetsNb",
    pt: "GoodLightJetsPt",
    phi: "GoodLightJetsPhi",
    eta: "GoodLightJetsEta",
    csv: "GoodLightJetsCSV",
};

/// Good jets passing the b-tag working point.
pub const GOOD_BTAGGED_JETS: JetBucketNames = JetBucketNames {
    n: "GoodBtaggedJetsN",
    nb: "GoodBtaggedJetsNb",
    pt: "GoodBtaggedJetsPt",
    phi: "GoodBtaggedJetsPhi",
    eta: "GoodBtaggedJetsEta",
    csv: "GoodBtaggedJetsCSV",
};

const MULT: &str = ";Jet multiplicity;Events / 1";
const BMULT: &str = ";b jet multiplicity;Events / 1";
const JET_PT: &str = ";p_{T}(jet) (GeV);Events / (2 GeV)";
const JET_PHI: &str = ";#phi(jet);Events / 0.1";
const JET_ETA: &str = ";#eta(jet);Events / 0.1";
const CSV: &str = ";CSV discriminant;Events / 0.02";

fn bucket_specs(out: &mut Vec<HistogramSpec>, b: &JetBucketNames, n_max: usize) {
    out.push(HistogramSpec::new(b.n, MULT, n_max, 0.0, n_max as f64));
    out.push(HistogramSpec::new(b.nb, BMULT, 5, 0.0, 5.0));
    if b.n == GOOD_BTAGGED_JETS.n {
        out.push(HistogramSpec::new(b.pt, ";p_{T}(jet) (GeV);Events / (5 GeV)", 36, 20.0, 200.0));
        out.push(HistogramSpec::new(b.phi, ";#phi(jet);Events / 0.2", 30, -3.0, 3.0));
        out.push(HistogramSpec::new(b.eta, ";#eta(jet);Events / 0.2", 50, -5.0, 5.0));
        out.push(HistogramSpec::new(b.csv, ";CSV discriminant;Events / 0.01", 20, 0.8, 1.0));
    } else {
        out.push(HistogramSpec::new(b.pt, JET_PT, 90, 20.0, 200.0));
        out.push(HistogramSpec::new(b.phi, JET_PHI, 60, -3.0, 3.0));
        out.push(HistogramSpec::new(b.eta, JET_ETA, 100, -5.0, 5.0));
        out.push(HistogramSpec::new(b.csv, CSV, 50, 0.0, 1.0));
    }
}

/// Every 1D histogram the selection fills.
pub fn histogram_specs() -> Vec<HistogramSpec> {
    use names::*;

    let mut s = vec![
        HistogramSpec::new(ALL_VERTICES, ";Vertex multiplicity;Events / 1", 7, 0.0, 7.0),
        HistogramSpec::new(GOOD_VERTICES, ";Vertex multiplicity;Events / 1", 7, 0.0, 7.0),
        HistogramSpec::new(GEN_JETS_N, MULT, 14, 0.0, 14.0),
        HistogramSpec::new(GEN_JETS_PT, JET_PT, 90, 20.0, 200.0),
        HistogramSpec::new(GEN_JETS_PHI, JET_PHI, 60, -3.0, 3.0),
        HistogramSpec::new(GEN_JETS_ETA, JET_ETA, 100, -5.0, 5.0),
        HistogramSpec::new(GEN_DIPHOTON_MASS, "genPhoton_Higgs_mass", 60, 110.0, 140.0),
        HistogramSpec::new(GEN_DIB_MASS, "genBJetDble_Higgs_mass", 100, 0.0, 250.0),
        HistogramSpec::new(GEN_HH_MASS, "gen HH Mass", 75, 250.0, 1000.0),
        HistogramSpec::new(GEN_HIGGS_B_N, ";b quark multiplicity;Events / 1", 5, 0.0, 5.0),
        HistogramSpec::new(GEN_ISOLATED_LEPTONS_N, ";Isolated lepton multiplicity;Events / 1", 5, 0.0, 5.0),
        HistogramSpec::new(ALL_JETS_N, MULT, 15, 0.0, 15.0),
        HistogramSpec::new(ALL_JETS_PT, ";p_{T}(jet) (GeV);Events / (2 GeV)", 100, 0.0, 200.0),
        HistogramSpec::new(ALL_JETS_PHI, JET_PHI, 60, -3.0, 3.0),
        HistogramSpec::new(ALL_JETS_ETA, JET_ETA, 100, -5.0, 5.0),
        HistogramSpec::new(ALL_JETS_CSV, CSV, 50, 0.0, 1.0),
        HistogramSpec::new(ALL_JETS_ID, "All;Loose;Tight", 3, 0.0, 3.0),
    ];
    bucket_specs(&mut s, &GOOD_JETS, 14);
    bucket_specs(&mut s, &GOOD_LIGHT_JETS, 12);
    bucket_specs(&mut s, &GOOD_BTAGGED_JETS, 5);
    s.extend([
        HistogramSpec::new(MET_PT, ";p_{T}(MET) (GeV);Events / (5 GeV)", 60, 0.0, 300.0),
        HistogramSpec::new(MET_PHI, ";#phi(MET);Events / 0.2", 30, -3.0, 3.0),
        HistogramSpec::new(ELECTRONS_ID, "All;Loose;Medium;Tight", 4, 0.0, 4.0),
        HistogramSpec::new(MUONS_ME0, "ME0 positional match (0=fail, 1=pass)", 2, -0.5, 1.5),
        HistogramSpec::new(PHOTON_PASSING, "Total number photons (0=NotPassing, 1=Passing)", 2, -0.5, 1.5),
        HistogramSpec::new(PHOTON_COUNT, "Number of photons passing cuts in event", 10, 0.0, 10.0),
        HistogramSpec::new(PHOTON_PT, "Photon P_{T}", 50, 0.0, 1000.0),
        HistogramSpec::new(PHOTON_ETA, "Photon #eta", 200, -4.0, 4.0),
        HistogramSpec::new(PHOTON_R9, "R9 = E(3x3) / E(SuperCluster)", 300, 0.0, 3.0),
        HistogramSpec::new(PHOTON_HOVERE, "Hadronic over EM", 200, 0.0, 1.0),
        HistogramSpec::new(PHOTON_SIGMA_IETA_IETA, "Photon #sigma_{i#etai#eta}", 1500, 0.0, 0.3),
        HistogramSpec::new(PHOTON_ISO_NEU_HAD, "Isolated Photon by Neutral Hadron", 100, 0.0, 140.0),
        HistogramSpec::new(PHOTON_ISO_CHAR_HAD, "Isolated Photon by Charged Hadron", 100, 0.0, 250.0),
        HistogramSpec::new(PHOTON_ISO, "Isolated Photon", 100, 0.0, 200.0),
        HistogramSpec::new(PUPPI_PHOTON_ISO_NEU_HAD, "Isolated Photon by Neutral Hadron PUPPI", 100, 0.0, 140.0),
        HistogramSpec::new(PUPPI_PHOTON_ISO_CHAR_HAD, "Isolated Photon by Charged Hadron PUPPI", 100, 0.0, 250.0),
        HistogramSpec::new(PUPPI_PHOTON_ISO, "Isolated Photon PUPPI", 100, 0.0, 200.0),
    ]);
    for name in [
        RECO_DIPHOTON_MASS,
        RECO_DIPHOTON_MASS_HM,
        RECO_DIPHOTON_MASS_LM,
        RECO_DIPHOTON_MASS_RAW,
        RECO_DIPHOTON_MASS_HM_RAW,
        RECO_DIPHOTON_MASS_LM_RAW,
    ] {
        s.push(HistogramSpec::new(name, ";m_{#gamma#gamma} (GeV);Events / 0.5 GeV", 60, 110.0, 140.0));
    }
    s
}

/// Every profile the selection fills.
pub fn profile_specs() -> Vec<ProfileSpec> {
    vec![
        ProfileSpec::new(names::PHOTON_PT_RATIO, "pTRatio", 50, (0.0, 250.0), (0.0, 2.0)),
        ProfileSpec::new(names::PHOTON_PT_RATIO_RAW, "pTRatio_raw", 50, (0.0, 250.0), (0.0, 2.0)),
    ]
}

/// A fresh book with the full catalogue declared.
pub fn book_histograms() -> Result<HistogramBook> {
    HistogramBook::from_specs(&histogram_specs(), &profile_specs())
}
