//! Fixed-binning 1D histogram and profile types.

use hh_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A 1D histogram with uniform binning, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Histogram name.
    pub name: String,
    /// Histogram title (axis labels in ROOT `";x;y"` form are accepted verbatim).
    pub title: String,
    /// Number of bins (excluding under/overflow).
    pub n_bins: usize,
    /// Lower edge of first bin.
    pub x_min: f64,
    /// Upper edge of last bin.
    pub x_max: f64,
    /// Bin edges (length = n_bins + 1).
    pub bin_edges: Vec<f64>,
    /// Bin contents (length = n_bins, excluding under/overflow).
    pub bin_content: Vec<f64>,
    /// Sum of weights squared per bin.
    pub sumw2: Vec<f64>,
    /// Sum of weights below `x_min`.
    pub underflow: f64,
    /// Sum of weights at or above `x_max`.
    pub overflow: f64,
    /// Samples that were NaN and could not be placed in any bin.
    pub nan_entries: u64,
    /// Total number of fills, including under/overflow.
    pub entries: u64,
}

impl Histogram {
    /// Create an empty histogram with `n_bins` uniform bins on `[x_min, x_max)`.
    pub fn uniform(
        name: impl Into<String>,
        title: impl Into<String>,
        n_bins: usize,
        x_min: f64,
        x_max: f64,
    ) -> Result<Self> {
        let name = name.into();
        let bin_edges = uniform_edges(&name, n_bins, x_min, x_max)?;
        Ok(Self {
            name,
            title: title.into(),
            n_bins,
            x_min,
            x_max,
            bin_edges,
            bin_content: vec![0.0; n_bins],
            sumw2: vec![0.0; n_bins],
            underflow: 0.0,
            overflow: 0.0,
            nan_entries: 0,
            entries: 0,
        })
    }

    /// Add one unit-weight sample.
    pub fn fill(&mut self, x: f64) {
        self.fill_weighted(x, 1.0);
    }

    /// Add one weighted sample.
    pub fn fill_weighted(&mut self, x: f64, weight: f64) {
        if x.is_nan() {
            self.nan_entries += 1;
            return;
        }
        self.entries += 1;
        if x < self.x_min {
            self.underflow += weight;
            return;
        }
        if x >= self.x_max {
            self.overflow += weight;
            return;
        }
        if let Some(b) = find_bin(&self.bin_edges, x) {
            self.bin_content[b] += weight;
            self.sumw2[b] += weight * weight;
        }
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    /// Content of the bin containing `x`, or `None` outside the axis range.
    pub fn content_at(&self, x: f64) -> Option<f64> {
        find_bin(&self.bin_edges, x).map(|b| self.bin_content[b])
    }

    /// A histogram with the same binning and no entries.
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            title: self.title.clone(),
            n_bins: self.n_bins,
            x_min: self.x_min,
            x_max: self.x_max,
            bin_edges: self.bin_edges.clone(),
            bin_content: vec![0.0; self.n_bins],
            sumw2: vec![0.0; self.n_bins],
            underflow: 0.0,
            overflow: 0.0,
            nan_entries: 0,
            entries: 0,
        }
    }

    /// Bin-wise sum of `other` into `self`. Binning must be identical.
    pub fn merge(&mut self, other: &Histogram) -> Result<()> {
        if self.bin_edges != other.bin_edges {
            return Err(Error::Histogram(format!(
                "cannot merge '{}': binning differs ({} bins on [{}, {}) vs {} bins on [{}, {}))",
                self.name, self.n_bins, self.x_min, self.x_max, other.n_bins, other.x_min, other.x_max
            )));
        }
        for (a, b) in self.bin_content.iter_mut().zip(&other.bin_content) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.nan_entries += other.nan_entries;
        self.entries += other.entries;
        Ok(())
    }
}

/// A profile: per-bin mean of `y` as a function of `x` (ROOT `TProfile`).
///
/// Samples with `y` outside `[y_min, y_max]` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name.
    pub name: String,
    /// Profile title.
    pub title: String,
    /// Number of bins.
    pub n_bins: usize,
    /// Lower edge of first bin.
    pub x_min: f64,
    /// Upper edge of last bin.
    pub x_max: f64,
    /// Lowest accepted `y`.
    pub y_min: f64,
    /// Highest accepted `y`.
    pub y_max: f64,
    /// Bin edges (length = n_bins + 1).
    pub bin_edges: Vec<f64>,
    /// Sum of weights per bin.
    pub sum_w: Vec<f64>,
    /// Sum of `w·y` per bin.
    pub sum_wy: Vec<f64>,
    /// Sum of `w·y²` per bin.
    pub sum_wy2: Vec<f64>,
    /// Accepted samples (including those outside the x range).
    pub entries: u64,
}

impl Profile {
    /// Create an empty profile.
    #[allow(clippy::too_many_arguments)]
    pub fn uniform(
        name: impl Into<String>,
        title: impl Into<String>,
        n_bins: usize,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> Result<Self> {
        let name = name.into();
        let bin_edges = uniform_edges(&name, n_bins, x_min, x_max)?;
        if !y_min.is_finite() || !y_max.is_finite() || y_min >= y_max {
            return Err(Error::Histogram(format!(
                "invalid y range for profile '{name}': [{y_min}, {y_max}]"
            )));
        }
        Ok(Self {
            name,
            title: title.into(),
            n_bins,
            x_min,
            x_max,
            y_min,
            y_max,
            bin_edges,
            sum_w: vec![0.0; n_bins],
            sum_wy: vec![0.0; n_bins],
            sum_wy2: vec![0.0; n_bins],
            entries: 0,
        })
    }

    /// Add one unit-weight `(x, y)` sample.
    pub fn fill(&mut self, x: f64, y: f64) {
        if x.is_nan() || y.is_nan() || y < self.y_min || y > self.y_max {
            return;
        }
        self.entries += 1;
        if let Some(b) = find_bin(&self.bin_edges, x) {
            self.sum_w[b] += 1.0;
            self.sum_wy[b] += y;
            self.sum_wy2[b] += y * y;
        }
    }

    /// Mean `y` in bin `bin`, or `None` if the bin is empty.
    pub fn bin_mean(&self, bin: usize) -> Option<f64> {
        let w = *self.sum_w.get(bin)?;
        if w == 0.0 { None } else { Some(self.sum_wy[bin] / w) }
    }

    /// A profile with the same binning and no entries.
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            title: self.title.clone(),
            n_bins: self.n_bins,
            x_min: self.x_min,
            x_max: self.x_max,
            y_min: self.y_min,
            y_max: self.y_max,
            bin_edges: self.bin_edges.clone(),
            sum_w: vec![0.0; self.n_bins],
            sum_wy: vec![0.0; self.n_bins],
            sum_wy2: vec![0.0; self.n_bins],
            entries: 0,
        }
    }

    /// Bin-wise sum of `other` into `self`. Binning and y range must be identical.
    pub fn merge(&mut self, other: &Profile) -> Result<()> {
        if self.bin_edges != other.bin_edges || self.y_min != other.y_min || self.y_max != other.y_max {
            return Err(Error::Histogram(format!("cannot merge profile '{}': binning differs", self.name)));
        }
        for (a, b) in self.sum_w.iter_mut().zip(&other.sum_w) {
            *a += b;
        }
        for (a, b) in self.sum_wy.iter_mut().zip(&other.sum_wy) {
            *a += b;
        }
        for (a, b) in self.sum_wy2.iter_mut().zip(&other.sum_wy2) {
            *a += b;
        }
        self.entries += other.entries;
        Ok(())
    }
}

fn uniform_edges(name: &str, n_bins: usize, x_min: f64, x_max: f64) -> Result<Vec<f64>> {
    if n_bins == 0 || !x_min.is_finite() || !x_max.is_finite() || x_min >= x_max {
        return Err(Error::Histogram(format!(
            "invalid binning for '{name}' (n_bins={n_bins}, range=[{x_min}, {x_max}))"
        )));
    }
    let width = (x_max - x_min) / n_bins as f64;
    let mut edges: Vec<f64> = (0..n_bins).map(|i| x_min + width * i as f64).collect();
    edges.push(x_max);
    Ok(edges)
}

/// Find the bin index for a value given sorted bin edges.
///
/// Returns `None` for underflow/overflow and NaN.
fn find_bin(edges: &[f64], val: f64) -> Option<usize> {
    if val.is_nan() || val < edges[0] || val >= edges[edges.len() - 1] {
        return None;
    }
    match edges.binary_search_by(|e| e.total_cmp(&val)) {
        Ok(i) => {
            if i >= edges.len() - 1 {
                None
            } else {
                Some(i)
            }
        }
        Err(i) => {
            if i == 0 || i >= edges.len() {
                None
            } else {
                Some(i - 1)
            }
        }
    }
}
