//! Hand landmark topology and jewelry anchor points.
//!
//! Hand detection capabilities are expected to produce the 21-point MediaPipe
//! hand topology. This module names the indices and selects the landmark
//! pairs jewelry placement works from.

use crate::geometry::Point;
use crate::landmark::Landmarks;

/// Number of landmarks in the hand topology.
pub const NUM_LANDMARKS: usize = 21;

/// Which hand a set of landmarks belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// Names for the hand landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl From<LandmarkIdx> for usize {
    #[inline]
    fn from(idx: LandmarkIdx) -> usize {
        idx as usize
    }
}

/// Returns the landmark pair a ring is anchored to: the index finger's base
/// knuckle (MCP) and its first joint (PIP).
///
/// Returns [`None`] if `landmarks` does not carry the full hand topology.
pub fn ring_anchor(landmarks: &Landmarks) -> Option<(Point, Point)> {
    if landmarks.len() < NUM_LANDMARKS {
        return None;
    }
    Some((
        landmarks.get(LandmarkIdx::IndexFingerMcp as usize),
        landmarks.get(LandmarkIdx::IndexFingerPip as usize),
    ))
}
