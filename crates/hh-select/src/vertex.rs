//! Vertex qualification and the primary-vertex event gate.

use hh_core::StatisticsSink;

use crate::catalogue::names;
use crate::event::Vertex;

/// Minimum number of degrees of freedom (exclusive) for a good vertex.
pub const MIN_NDOF: f64 = 4.0;

/// Whether a single vertex qualifies.
pub fn is_good_vertex(v: &Vertex) -> bool {
    !v.is_fake && v.ndof > MIN_NDOF
}

/// Result of scanning the vertex collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexSelection {
    /// Index of the first qualifying vertex.
    pub primary: Option<usize>,
    /// Number of qualifying vertices.
    pub n_good: usize,
    /// Size of the vertex collection.
    pub n_total: usize,
}

impl VertexSelection {
    /// Scan `vertices` in input order.
    pub fn select(vertices: &[Vertex]) -> Self {
        let mut sel = VertexSelection { n_total: vertices.len(), ..Default::default() };
        for (i, v) in vertices.iter().enumerate() {
            if is_good_vertex(v) {
                sel.primary.get_or_insert(i);
                sel.n_good += 1;
            }
        }
        sel
    }

    /// The event survives the gate.
    pub fn passes(&self) -> bool {
        self.primary.is_some()
    }

    /// Push the vertex multiplicities. Only called for events that pass.
    pub fn fill<S: StatisticsSink>(&self, sink: &mut S) {
        sink.fill(names::GOOD_VERTICES, self.n_good as f64);
        sink.fill(names::ALL_VERTICES, self.n_total as f64);
    }
}
