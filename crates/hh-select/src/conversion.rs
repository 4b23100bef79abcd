//! Photon-conversion veto used by the electron identification.

use crate::event::{BeamSpot, Conversion, Electron};

/// Minimum vertex-fit probability of a good conversion.
pub const MIN_VERTEX_PROBABILITY: f64 = 1e-6;
/// Minimum transverse decay length (cm).
pub const MIN_LXY: f64 = 2.0;
/// Maximum tracker hits before the vertex on either leg.
pub const MAX_HITS_BEFORE_VERTEX: u8 = 0;

/// Signed transverse decay length of the conversion vertex with respect to
/// the beam spot, projected on the pair momentum. `None` when the pair has
/// no transverse momentum.
pub fn transverse_decay_length(conv: &Conversion, beam_spot: &BeamSpot) -> Option<f64> {
    let rho = conv.px.hypot(conv.py);
    if rho == 0.0 {
        return None;
    }
    let dx = conv.vertex.x - beam_spot.position.x;
    let dy = conv.vertex.y - beam_spot.position.y;
    Some((conv.px * dx + conv.py * dy) / rho)
}

/// Quality requirements on a reconstructed conversion.
pub fn is_good_conversion(conv: &Conversion, beam_spot: &BeamSpot) -> bool {
    if !conv.vertex_valid || conv.vertex_probability < MIN_VERTEX_PROBABILITY {
        return false;
    }
    match transverse_decay_length(conv, beam_spot) {
        Some(lxy) if lxy >= MIN_LXY => {}
        _ => return false,
    }
    conv.n_hits_before_vertex.iter().all(|&n| n <= MAX_HITS_BEFORE_VERTEX)
}

/// Whether the electron's track belongs to a good conversion.
pub fn has_matched_conversion(electron: &Electron, conversions: &[Conversion], beam_spot: &BeamSpot) -> bool {
    conversions
        .iter()
        .any(|c| c.track_ids.contains(&electron.track_id) && is_good_conversion(c, beam_spot))
}
