//! Face landmark topology and jewelry anchor points.
//!
//! Face detection capabilities are expected to produce the 468-point
//! MediaPipe Face Mesh topology. Only the handful of indices jewelry
//! placement needs are named here.

use crate::geometry::{self, Point};
use crate::landmark::Landmarks;

/// Number of landmarks in the face topology.
pub const NUM_LANDMARKS: usize = 468;

/// Assigns a name to the face landmark indices used for jewelry placement.
///
/// "Left" and "Right" are relative to the input image, not from the PoV of
/// the depicted person. The selfie-view mirroring applied during placement
/// swaps the sides on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    ChinCenter = 152,
    LeftEarlobe = 132,
    RightEarlobe = 361,
    LeftJaw = 234,
    RightJaw = 454,
}

impl From<LandmarkIdx> for usize {
    #[inline]
    fn from(idx: LandmarkIdx) -> usize {
        idx as usize
    }
}

/// Returns whether `landmarks` carries the full face topology.
pub fn is_complete(landmarks: &Landmarks) -> bool {
    landmarks.len() >= NUM_LANDMARKS
}

/// The jaw landmark pair spanning the face, left to right.
///
/// The transform between these two points yields both the face width (its
/// scale) and the head's roll rotation. Returns [`None`] for incomplete
/// topologies.
pub fn jaw_line(landmarks: &Landmarks) -> Option<(Point, Point)> {
    if !is_complete(landmarks) {
        return None;
    }
    Some((
        landmarks.get(LandmarkIdx::LeftJaw as usize),
        landmarks.get(LandmarkIdx::RightJaw as usize),
    ))
}

/// Face width in normalized units: the distance between the jaw landmarks.
pub fn width(landmarks: &Landmarks) -> Option<f32> {
    jaw_line(landmarks).map(|(left, right)| geometry::distance(left, right))
}
