//! Configuration types for the selection.

use hh_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::event::BTagScores;

/// Which b-tag discriminant recipe to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BTagScheme {
    /// DeepCSV: `P(b) + P(bb)`.
    #[default]
    DeepCsv,
    /// Combined secondary vertex v2: single discriminant.
    CsvV2,
}

impl BTagScheme {
    /// Discriminant value of a jet under this scheme.
    pub fn discriminant(self, scores: &BTagScores) -> f64 {
        match self {
            BTagScheme::DeepCsv => scores.deep_csv_b + scores.deep_csv_bb,
            BTagScheme::CsvV2 => scores.csv_v2,
        }
    }

    /// Working point: a jet is b-tagged when its discriminant is strictly above this.
    ///
    /// Medium working points of either tagger. A DeepCSV threshold of 0.131 also
    /// appears in older b-quark studies; it is not the one applied here.
    pub fn working_point(self) -> f64 {
        match self {
            BTagScheme::DeepCsv => 0.6324,
            BTagScheme::CsvV2 => 0.8484,
        }
    }

    /// Whether a discriminant value passes the working point.
    pub fn is_tagged(self, discriminant: f64) -> bool {
        discriminant > self.working_point()
    }
}

/// Photon selection thresholds.
///
/// Only `min_et` and `max_abs_eta` take part in the selection; the remaining
/// fields are carried so existing configuration files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonSelection {
    /// Minimum transverse energy.
    pub min_et: f64,
    /// Minimum |η| (not applied).
    pub min_abs_eta: f64,
    /// Maximum |η|.
    pub max_abs_eta: f64,
    /// Minimum R9 (not applied).
    pub min_r9: f64,
    /// Maximum H/E (not applied).
    pub max_hadronic_over_em: f64,
    /// Maximum σ_iηiη (not applied).
    pub max_sigma_ieta_ieta: f64,
}

impl Default for PhotonSelection {
    fn default() -> Self {
        Self {
            min_et: 10.0,
            min_abs_eta: 0.0,
            max_abs_eta: 2.5,
            min_r9: 0.3,
            max_hadronic_over_em: 0.2,
            max_sigma_ieta_ieta: 0.03,
        }
    }
}

/// Positional-match thresholds for ME0 muons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Me0Cuts {
    /// Maximum local-x pull.
    pub pull_x: f64,
    /// Maximum |Δx|.
    pub delta_x: f64,
    /// Maximum local-y pull.
    pub pull_y: f64,
    /// Maximum |Δy|.
    pub delta_y: f64,
    /// Maximum direction mismatch (rad).
    pub delta_phi: f64,
}

impl Default for Me0Cuts {
    fn default() -> Self {
        Self { pull_x: 3.0, delta_x: 4.0, pull_y: 20.0, delta_y: 20.0, delta_phi: 0.5 }
    }
}

/// Full selection configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// b-tag discriminant recipe.
    pub btag_scheme: BTagScheme,
    /// Photon thresholds.
    pub photon: PhotonSelection,
    /// ME0 muon thresholds.
    pub me0: Me0Cuts,
    /// Emit per-photon and per-event detail records.
    pub emit_detail_records: bool,
}

impl AnalysisConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the b-tag scheme.
    pub fn btag_scheme(mut self, scheme: BTagScheme) -> Self {
        self.btag_scheme = scheme;
        self
    }

    /// Set the photon thresholds.
    pub fn photon(mut self, photon: PhotonSelection) -> Self {
        self.photon = photon;
        self
    }

    /// Set the ME0 thresholds.
    pub fn me0(mut self, cuts: Me0Cuts) -> Self {
        self.me0 = cuts;
        self
    }

    /// Enable or disable detail records.
    pub fn emit_detail_records(mut self, yes: bool) -> Self {
        self.emit_detail_records = yes;
        self
    }

    /// Reject thresholds that cannot select anything sensibly.
    pub fn validate(&self) -> Result<()> {
        let p = &self.photon;
        let named = [
            ("photon.min_et", p.min_et),
            ("photon.min_abs_eta", p.min_abs_eta),
            ("photon.max_abs_eta", p.max_abs_eta),
            ("photon.min_r9", p.min_r9),
            ("photon.max_hadronic_over_em", p.max_hadronic_over_em),
            ("photon.max_sigma_ieta_ieta", p.max_sigma_ieta_ieta),
            ("me0.pull_x", self.me0.pull_x),
            ("me0.delta_x", self.me0.delta_x),
            ("me0.pull_y", self.me0.pull_y),
            ("me0.delta_y", self.me0.delta_y),
            ("me0.delta_phi", self.me0.delta_phi),
        ];
        for (name, v) in named {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Validation(format!("{name} must be finite and >= 0, got {v}")));
            }
        }
        if p.max_abs_eta <= p.min_abs_eta {
            return Err(Error::Validation(format!(
                "photon.max_abs_eta ({}) must exceed photon.min_abs_eta ({})",
                p.max_abs_eta, p.min_abs_eta
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AnalysisConfig::new().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{"btag_scheme": "csv_v2", "photon": {"min_et": 25.0}}"#).unwrap();
        assert_eq!(cfg.btag_scheme, BTagScheme::CsvV2);
        assert_eq!(cfg.photon.min_et, 25.0);
        assert_eq!(cfg.photon.max_abs_eta, 2.5);
        assert_eq!(cfg.me0, Me0Cuts::default());
        assert!(!cfg.emit_detail_records);
    }

    #[test]
    fn invalid_thresholds_rejected() {
        let cfg = AnalysisConfig::new()
            .photon(PhotonSelection { max_abs_eta: 0.0, ..PhotonSelection::default() });
        assert!(cfg.validate().is_err());
        let cfg = AnalysisConfig::new().me0(Me0Cuts { delta_phi: f64::NAN, ..Me0Cuts::default() });
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("me0.delta_phi"));
    }

    #[test]
    fn discriminant_per_scheme() {
        let s = BTagScores { deep_csv_b: 0.5, deep_csv_bb: 0.2, csv_v2: 0.9 };
        assert!((BTagScheme::DeepCsv.discriminant(&s) - 0.7).abs() < 1e-12);
        assert_eq!(BTagScheme::CsvV2.discriminant(&s), 0.9);
    }

    #[test]
    fn working_point_is_strict() {
        assert!(!BTagScheme::CsvV2.is_tagged(0.8484));
        assert!(BTagScheme::CsvV2.is_tagged(0.8485));
        assert!(!BTagScheme::DeepCsv.is_tagged(0.6324));
        assert!(BTagScheme::DeepCsv.is_tagged(0.6325));
    }
}
