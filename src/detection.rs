//! The landmark-detection capability seam and its per-frame result types.
//!
//! The detection models themselves (hand and face landmark estimators) are
//! external capabilities. This module defines the trait they are consumed
//! through and the batch type their per-frame results arrive in.

use crate::hand::Handedness;
use crate::landmark::Landmarks;

/// Trait implemented by landmark-detection capabilities.
///
/// A backend analyzes one frame at a time and returns the full set of
/// landmark groups found in it. Backends are constructed by the fallible
/// factory passed to [`TrackingSession::new`][crate::tracking::TrackingSession::new]
/// and release their model resources when dropped.
pub trait Backend: Send + 'static {
    /// The video frame type this backend analyzes.
    type Frame: Send + 'static;

    /// Analyzes a single frame.
    ///
    /// Returning an empty batch means "nothing detected in this frame" and is
    /// not an error. An `Err` marks a transient single-frame failure: the
    /// session discards it and feeds the next frame normally.
    fn detect(&mut self, frame: &Self::Frame) -> anyhow::Result<DetectionBatch>;
}

/// One group of landmarks found in a frame: a face, or a single hand.
#[derive(Clone)]
pub struct LandmarkGroup {
    landmarks: Landmarks,
    handedness: Option<Handedness>,
    confidence: f32,
}

impl LandmarkGroup {
    pub fn new(landmarks: Landmarks, confidence: f32) -> Self {
        Self {
            landmarks,
            handedness: None,
            confidence,
        }
    }

    /// Tags the group with the hand it belongs to. Face groups stay untagged.
    pub fn with_handedness(self, handedness: Handedness) -> Self {
        Self {
            handedness: Some(handedness),
            ..self
        }
    }

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    #[inline]
    pub fn handedness(&self) -> Option<Handedness> {
        self.handedness
    }

    /// Detection confidence in range 0.0 to 1.0.
    #[inline]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

/// The full set of landmark groups found in one analyzed frame.
///
/// A batch always reflects exactly one detection callback: it is replaced
/// wholesale on every successful callback and cleared to empty when detection
/// is lost. It is never accumulated across frames.
#[derive(Clone, Default)]
pub struct DetectionBatch {
    groups: Vec<LandmarkGroup>,
}

impl DetectionBatch {
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Returns the number of landmark groups in this batch.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn push(&mut self, group: LandmarkGroup) {
        self.groups.push(group);
    }

    /// Returns an iterator over the groups, in detection order.
    pub fn iter(&self) -> impl Iterator<Item = &LandmarkGroup> {
        self.groups.iter()
    }

    /// The first detected group, if any.
    ///
    /// Jewelry placement works from the first detected hand or face.
    pub fn first(&self) -> Option<&LandmarkGroup> {
        self.groups.first()
    }
}
