//! Video frame acquisition seam.
//!
//! Camera acquisition (permission prompts, device selection, stream
//! lifecycle) is an external capability owned by the presentation layer.
//! This module defines the contract a live frame source is consumed through.

use crate::resolution::Resolution;

/// Trait implemented by live video frame sources.
///
/// A source delivers frames at its own cadence; [`next_frame`] may block
/// until the next frame is available. Several tracking sessions may read
/// from handles onto the same underlying stream: sources are pure readers
/// and need no mutual exclusion.
///
/// [`next_frame`]: FrameSource::next_frame
pub trait FrameSource: Send + 'static {
    /// The frame type this source yields.
    type Frame: Send + 'static;

    /// Current frame dimensions.
    fn resolution(&self) -> Resolution;

    /// Pulls the next frame.
    ///
    /// Returns `Ok(None)` once the source has ended. An `Err` is a
    /// camera-class failure and terminal for the session consuming this
    /// source.
    fn next_frame(&mut self) -> anyhow::Result<Option<Self::Frame>>;
}
