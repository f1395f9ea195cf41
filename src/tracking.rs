//! Tracking-session lifecycle around a landmark-detection capability.
//!
//! A [`TrackingSession`] wraps one detection capability (hand or face) into a
//! uniform lifecycle: construct with a fallible backend factory (the model
//! load), start on a frame source, poll asynchronous detection batches, stop
//! and release.
//!
//! Detection results are "last write wins": every callback replaces the
//! current batch wholesale, and a callback with zero detections empties it on
//! that same update. Nothing is smoothed, debounced, or carried across
//! callbacks.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::detection::{Backend, DetectionBatch};
use crate::video::FrameSource;
use crate::worker::{self, Sender, Worker};

/// Lifecycle states of a [`TrackingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The detection capability is being initialized (model acquisition).
    ///
    /// A session whose initialization failed stays in `Loading` with
    /// [`TrackingSession::error`] set.
    Loading,
    /// The capability is initialized; frames are analyzed while a source is
    /// being tracked.
    ///
    /// Whether anything was found in the latest analyzed frame is exposed
    /// via [`TrackingSession::is_detecting`]; that flag is re-derived on
    /// every update and is not sticky.
    Ready,
    /// The session was stopped; detections are cleared and stay empty until
    /// the session is started again.
    Stopped,
}

enum Event {
    Loaded,
    LoadFailed(String),
    SourceFailed { generation: u64, message: String },
    Batch { generation: u64, batch: DetectionBatch },
}

/// Uniform async wrapper around one landmark-detection capability.
///
/// The session owns two threads: a long-lived detection worker that holds the
/// [`Backend`] (and drops it, releasing model resources, when the session is
/// dropped), and a per-start frame pump that pulls frames from the active
/// [`FrameSource`]. Frames cross a rendezvous channel, so analysis runs at
/// the cadence of the slower of source and backend.
pub struct TrackingSession<F: Send + 'static> {
    label: &'static str,
    state: SessionState,
    loaded: bool,
    error: Option<String>,
    detecting: bool,
    detections: DetectionBatch,
    generation: u64,
    // Declaration order doubles as teardown order: the pump has to release
    // its frame sender before the detection worker is joined.
    pump: Option<FramePump>,
    frames: Sender<(F, u64)>,
    events_tx: crossbeam::channel::Sender<Event>,
    events: crossbeam::channel::Receiver<Event>,
    _detector: Worker,
}

impl<F: Send + 'static> TrackingSession<F> {
    /// Creates a session around the detection capability produced by `init`.
    ///
    /// `init` runs on the session's detection worker; the session stays in
    /// [`SessionState::Loading`] until it completes. An initialization
    /// failure is terminal for this session instance: it is reported once via
    /// [`error`](Self::error), and the instance has to be discarded and
    /// rebuilt for a retry.
    pub fn new<B, I>(label: &'static str, init: I) -> anyhow::Result<Self>
    where
        B: Backend<Frame = F>,
        I: FnOnce() -> anyhow::Result<B> + Send + 'static,
    {
        let (frames, frame_recv) = worker::channel::<(F, u64)>();
        let (events_tx, events) = crossbeam::channel::unbounded();

        let event_sender = events_tx.clone();
        let detector = Worker::spawn(label, move || {
            let mut backend = match init() {
                Ok(backend) => {
                    event_sender.send(Event::Loaded).ok();
                    backend
                }
                Err(e) => {
                    log::warn!("detection capability failed to initialize: {e:#}");
                    event_sender.send(Event::LoadFailed(format!("{e:#}"))).ok();
                    return;
                }
            };

            for (frame, generation) in frame_recv {
                match backend.detect(&frame) {
                    Ok(batch) => {
                        if event_sender.send(Event::Batch { generation, batch }).is_err() {
                            break;
                        }
                    }
                    // A single frame failing to process must not cascade
                    // into a persistent error; drop it and take the next one.
                    Err(e) => log::debug!("dropped frame: {e:#}"),
                }
            }
        })?;

        Ok(Self {
            label,
            state: SessionState::Loading,
            loaded: false,
            error: None,
            detecting: false,
            detections: DetectionBatch::new(),
            generation: 0,
            pump: None,
            frames,
            events_tx,
            events,
            _detector: detector,
        })
    }

    /// Starts pulling frames from `source` and feeding them to the detection
    /// capability.
    ///
    /// Calling this on a session that is already tracking first releases the
    /// previous frame-feeding loop (stop-then-restart); two loops never run
    /// concurrently. Calling it on a session whose initialization failed logs
    /// and returns without effect; the failure stays observable via
    /// [`error`](Self::error).
    pub fn start_tracking<S>(&mut self, source: S)
    where
        S: FrameSource<Frame = F>,
    {
        self.drain_events();
        if self.error.is_some() {
            log::warn!("{}: start_tracking on a failed session, ignoring", self.label);
            return;
        }

        self.pump = None;
        self.generation += 1;
        self.state = if self.loaded {
            SessionState::Ready
        } else {
            SessionState::Loading
        };

        match FramePump::spawn(
            self.label,
            source,
            self.frames.clone(),
            self.events_tx.clone(),
            self.generation,
        ) {
            Ok(pump) => self.pump = Some(pump),
            Err(e) => self.error = Some(format!("failed to start frame pump: {e}")),
        }
    }

    /// Stops frame feeding and clears the current detections.
    ///
    /// Results still in flight when the pump is released are discarded, never
    /// applied: after `stop_tracking` returns, [`detections`](Self::detections)
    /// stays empty and [`is_detecting`](Self::is_detecting) false until the
    /// session is started again. Safe to call repeatedly, and on a session
    /// that was never started.
    pub fn stop_tracking(&mut self) {
        self.pump = None;
        self.generation += 1;
        self.detections.clear();
        self.detecting = false;
        self.state = SessionState::Stopped;
    }

    /// Ingests pending detection callbacks and returns the current batch.
    ///
    /// Each callback replaces the batch wholesale (last write wins); a
    /// callback with zero detections empties it and clears
    /// [`is_detecting`](Self::is_detecting) on this same update. Call once
    /// per render tick.
    pub fn poll(&mut self) -> &DetectionBatch {
        self.drain_events();
        &self.detections
    }

    /// The session's lifecycle state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True only while the detection capability is being initialized.
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading && self.error.is_none()
    }

    /// Terminal, human-readable failure of this session instance, if any.
    ///
    /// Non-`None` only for unrecoverable failures (model initialization, a
    /// dead frame source). The caller is expected to discard the instance
    /// and surface a retry affordance.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The batch from the most recently ingested detection callback.
    #[inline]
    pub fn detections(&self) -> &DetectionBatch {
        &self.detections
    }

    /// True iff the latest callback contained at least one landmark group.
    #[inline]
    pub fn is_detecting(&self) -> bool {
        self.detecting
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                Event::Loaded => {
                    self.loaded = true;
                    if self.state == SessionState::Loading {
                        self.state = SessionState::Ready;
                    }
                }
                Event::LoadFailed(message) => {
                    if self.error.is_none() {
                        self.error = Some(message);
                    }
                }
                Event::Batch { generation, batch } => {
                    // A late result from a released pump must not be applied.
                    if generation == self.generation && self.pump.is_some() {
                        self.detecting = !batch.is_empty();
                        self.detections = batch;
                    }
                }
                Event::SourceFailed {
                    generation,
                    message,
                } => {
                    if generation == self.generation && self.pump.is_some() {
                        self.detections.clear();
                        self.detecting = false;
                        if self.error.is_none() {
                            self.error = Some(message);
                        }
                    }
                }
            }
        }
    }
}

/// Pulls frames from a [`FrameSource`] and hands them to the detection
/// worker.
///
/// Dropping the pump stops the loop. An in-flight frame is still handed off,
/// but its result carries a stale generation and is discarded by the session.
struct FramePump {
    stop: Arc<AtomicBool>,
    _worker: Worker,
}

impl FramePump {
    fn spawn<S, F>(
        label: &str,
        mut source: S,
        frames: Sender<(F, u64)>,
        events: crossbeam::channel::Sender<Event>,
        generation: u64,
    ) -> io::Result<Self>
    where
        S: FrameSource<Frame = F>,
        F: Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let worker = Worker::spawn(&format!("{label} pump"), move || loop {
            if stop_flag.load(Ordering::Relaxed) {
                break;
            }
            match source.next_frame() {
                Ok(Some(frame)) => {
                    if frames.send((frame, generation)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::warn!("frame source failed: {e:#}");
                    events
                        .send(Event::SourceFailed {
                            generation,
                            message: format!("{e:#}"),
                        })
                        .ok();
                    break;
                }
            }
        })?;

        Ok(Self {
            stop,
            _worker: worker,
        })
    }
}

impl Drop for FramePump {
    fn drop(&mut self) {
        // The pump thread is joined when `_worker` drops right after this.
        self.stop.store(true, Ordering::Relaxed);
    }
}
