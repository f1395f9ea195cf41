//! Bijou virtual jewelry try-on engine.
//!
//! Bijou tracks anatomical landmarks (a hand or a face) in a live video feed
//! and computes, per frame, where to render virtual jewelry: position, scale,
//! and rotation of each overlay in the coordinate space of the rendering
//! surface.
//!
//! # Coordinates
//!
//! Landmarks arrive in normalized image coordinates: `(0, 0)` is the frame's
//! top-left corner, `(1, 1)` the bottom-right, with Y growing downwards.
//! Overlay transforms leave the [`overlay::Compositor`] in pixel coordinates
//! of the rendering surface. Because the feed is presented as a selfie view,
//! every X coordinate is mirrored during placement, and rotation angles
//! derived from mirrored geometry are negated to match.
//!
//! The heavy lifting (the landmark-detection models and the camera) is
//! consumed through the [`detection::Backend`] and [`video::FrameSource`]
//! traits. This crate owns the session lifecycle and the placement geometry;
//! rendering is the embedder's job.

use log::LevelFilter;

pub mod catalog;
pub mod detection;
pub mod face;
pub mod geometry;
pub mod hand;
pub mod landmark;
pub mod overlay;
pub mod resolution;
pub mod tracking;
pub mod video;
pub mod worker;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and Bijou will
/// log at *trace* level. Otherwise, they will log at *debug* level.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
