//! Named histogram accumulator with fixed booking and bin-wise merge.

use std::collections::BTreeMap;
use std::path::Path;

use hh_core::{Error, Result, StatisticsSink};
use serde::{Deserialize, Serialize};

use crate::histogram::{Histogram, Profile};

/// Booking specification for one 1D histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSpec {
    /// Histogram name (the identifier used in `fill`).
    pub name: String,
    /// Title / axis labels.
    pub title: String,
    /// Number of uniform bins.
    pub n_bins: usize,
    /// Lower axis edge.
    pub x_min: f64,
    /// Upper axis edge.
    pub x_max: f64,
}

impl HistogramSpec {
    /// Create a spec.
    pub fn new(name: impl Into<String>, title: impl Into<String>, n_bins: usize, x_min: f64, x_max: f64) -> Self {
        Self { name: name.into(), title: title.into(), n_bins, x_min, x_max }
    }
}

/// Booking specification for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    /// Profile name.
    pub name: String,
    /// Title / axis labels.
    pub title: String,
    /// Number of uniform x bins.
    pub n_bins: usize,
    /// Lower x edge.
    pub x_min: f64,
    /// Upper x edge.
    pub x_max: f64,
    /// Lowest accepted y.
    pub y_min: f64,
    /// Highest accepted y.
    pub y_max: f64,
}

impl ProfileSpec {
    /// Create a spec.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        n_bins: usize,
        (x_min, x_max): (f64, f64),
        (y_min, y_max): (f64, f64),
    ) -> Self {
        Self { name: name.into(), title: title.into(), n_bins, x_min, x_max, y_min, y_max }
    }
}

/// A set of histograms and profiles booked once and filled by name.
///
/// Fills to names that were never booked are counted in
/// [`HistogramBook::undeclared`] and otherwise dropped; binning is never
/// changed after booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistogramBook {
    histograms: BTreeMap<String, Histogram>,
    profiles: BTreeMap<String, Profile>,
    #[serde(default)]
    undeclared: BTreeMap<String, u64>,
}

impl HistogramBook {
    /// Create an empty book with nothing booked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Book every histogram and profile in the given specs.
    pub fn from_specs(histograms: &[HistogramSpec], profiles: &[ProfileSpec]) -> Result<Self> {
        let mut book = Self::new();
        for spec in histograms {
            book.book(spec)?;
        }
        for spec in profiles {
            book.book_profile(spec)?;
        }
        Ok(book)
    }

    /// Book one histogram. Names must be unique across histograms and profiles.
    pub fn book(&mut self, spec: &HistogramSpec) -> Result<()> {
        self.ensure_free(&spec.name)?;
        let h = Histogram::uniform(&spec.name, &spec.title, spec.n_bins, spec.x_min, spec.x_max)?;
        self.histograms.insert(spec.name.clone(), h);
        Ok(())
    }

    /// Book one profile.
    pub fn book_profile(&mut self, spec: &ProfileSpec) -> Result<()> {
        self.ensure_free(&spec.name)?;
        let p = Profile::uniform(
            &spec.name,
            &spec.title,
            spec.n_bins,
            spec.x_min,
            spec.x_max,
            spec.y_min,
            spec.y_max,
        )?;
        self.profiles.insert(spec.name.clone(), p);
        Ok(())
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.histograms.contains_key(name) || self.profiles.contains_key(name) {
            return Err(Error::Histogram(format!("duplicate booking for '{name}'")));
        }
        Ok(())
    }

    /// Look up a booked histogram.
    pub fn histogram(&self, name: &str) -> Option<&Histogram> {
        self.histograms.get(name)
    }

    /// Look up a booked profile.
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Booked histograms in name order.
    pub fn histograms(&self) -> impl Iterator<Item = &Histogram> {
        self.histograms.values()
    }

    /// Booked profiles in name order.
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Fill counts for names that were never booked.
    pub fn undeclared(&self) -> &BTreeMap<String, u64> {
        &self.undeclared
    }

    /// Same booking, all contents zeroed. Used to give each worker a private book.
    pub fn empty_like(&self) -> Self {
        Self {
            histograms: self.histograms.iter().map(|(k, h)| (k.clone(), h.empty_like())).collect(),
            profiles: self.profiles.iter().map(|(k, p)| (k.clone(), p.empty_like())).collect(),
            undeclared: BTreeMap::new(),
        }
    }

    /// Bin-wise sum of `other` into `self`.
    ///
    /// Both books must carry the same names with the same binning; the
    /// operation is commutative up to floating-point summation order.
    pub fn merge(&mut self, other: &HistogramBook) -> Result<()> {
        if self.histograms.len() != other.histograms.len() || self.profiles.len() != other.profiles.len() {
            return Err(Error::Histogram(format!(
                "cannot merge books with different bookings ({}+{} vs {}+{})",
                self.histograms.len(),
                self.profiles.len(),
                other.histograms.len(),
                other.profiles.len()
            )));
        }
        for (name, h) in &other.histograms {
            let mine = self
                .histograms
                .get_mut(name)
                .ok_or_else(|| Error::Histogram(format!("histogram '{name}' not booked in target")))?;
            mine.merge(h)?;
        }
        for (name, p) in &other.profiles {
            let mine = self
                .profiles
                .get_mut(name)
                .ok_or_else(|| Error::Histogram(format!("profile '{name}' not booked in target")))?;
            mine.merge(p)?;
        }
        for (name, n) in &other.undeclared {
            *self.undeclared.entry(name.clone()).or_insert(0) += n;
        }
        Ok(())
    }

    /// Consume two books and return their merge (convenient as a `reduce` step).
    pub fn merged(mut self, other: HistogramBook) -> Result<Self> {
        self.merge(&other)?;
        Ok(self)
    }

    /// Write the book as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a book previously written with [`HistogramBook::write_json`].
    pub fn read_json(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn note_undeclared(&mut self, name: &str) {
        let n = self.undeclared.entry(name.to_string()).or_insert(0);
        if *n == 0 {
            log::warn!("fill to undeclared histogram '{name}' dropped");
        }
        *n += 1;
    }
}

impl StatisticsSink for HistogramBook {
    fn fill(&mut self, name: &str, value: f64) {
        match self.histograms.get_mut(name) {
            Some(h) => h.fill(value),
            None => self.note_undeclared(name),
        }
    }

    fn fill_profile(&mut self, name: &str, x: f64, y: f64) {
        match self.profiles.get_mut(name) {
            Some(p) => p.fill(x, y),
            None => self.note_undeclared(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_book() -> HistogramBook {
        HistogramBook::from_specs(
            &[HistogramSpec::new("n", ";n;Events", 5, 0.0, 5.0), HistogramSpec::new("pt", "", 10, 0.0, 100.0)],
            &[ProfileSpec::new("r", "", 5, (0.0, 250.0), (0.0, 2.0))],
        )
        .unwrap()
    }

    #[test]
    fn fill_by_name() {
        let mut book = small_book();
        book.fill("n", 2.0);
        book.fill("pt", 55.0);
        book.fill_profile("r", 60.0, 1.0);
        assert_eq!(book.histogram("n").unwrap().content_at(2.0), Some(1.0));
        assert_eq!(book.histogram("pt").unwrap().content_at(55.0), Some(1.0));
        assert_eq!(book.profile("r").unwrap().entries, 1);
        assert!(book.undeclared().is_empty());
    }

    #[test]
    fn undeclared_fills_are_counted() {
        let mut book = small_book();
        book.fill("nope", 1.0);
        book.fill("nope", 2.0);
        book.fill_profile("n", 1.0, 1.0); // booked as 1D, not as profile
        assert_eq!(book.undeclared().get("nope"), Some(&2));
        assert_eq!(book.undeclared().get("n"), Some(&1));
        assert_eq!(book.histogram("n").unwrap().entries, 0);
    }

    #[test]
    fn duplicate_booking_rejected() {
        let err = HistogramBook::from_specs(
            &[HistogramSpec::new("a", "", 2, 0.0, 1.0), HistogramSpec::new("a", "", 2, 0.0, 1.0)],
            &[],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn merge_requires_same_booking() {
        let mut a = small_book();
        let b = HistogramBook::from_specs(&[HistogramSpec::new("n", "", 5, 0.0, 5.0)], &[]).unwrap();
        assert!(a.merge(&b).is_err());
    }

    #[test]
    fn empty_like_keeps_booking() {
        let mut a = small_book();
        a.fill("n", 1.0);
        a.fill("zzz", 1.0);
        let e = a.empty_like();
        assert_eq!(e.histograms().count(), 2);
        assert_eq!(e.histogram("n").unwrap().entries, 0);
        assert!(e.undeclared().is_empty());
    }

    #[test]
    fn json_round_trip() {
        let mut a = small_book();
        a.fill("pt", 12.0);
        let path = std::env::temp_dir().join(format!("hh_hist_book_{}.json", std::process::id()));
        a.write_json(&path).unwrap();
        let b = HistogramBook::read_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(b.histogram("pt"), a.histogram("pt"));
    }

    proptest! {
        #[test]
        fn prop_merge_matches_single_pass(
            xs in proptest::collection::vec(-10.0f64..110.0, 0..64),
            split in 0usize..64,
        ) {
            let split = split.min(xs.len());
            let mut whole = small_book();
            for &x in &xs {
                whole.fill("pt", x);
            }
            let mut left = small_book();
            let mut right = left.empty_like();
            for &x in &xs[..split] {
                left.fill("pt", x);
            }
            for &x in &xs[split..] {
                right.fill("pt", x);
            }
            let merged_lr = left.clone().merged(right.clone()).unwrap();
            let merged_rl = right.merged(left).unwrap();
            prop_assert_eq!(merged_lr.histogram("pt"), whole.histogram("pt"));
            prop_assert_eq!(merged_rl.histogram("pt"), whole.histogram("pt"));
        }
    }
}
