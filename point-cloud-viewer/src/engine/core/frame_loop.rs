use bevy::prelude::*;

use crate::host::{FrameRequest, HostWindow};

/// Self-rescheduling render loop driven by host frame callbacks.
///
/// Holds the token of the one frame the viewer is waiting for. Callbacks
/// carrying any other token are stale and ignored.
#[derive(Debug, Default)]
pub struct FrameLoop {
    pending: Option<FrameRequest>,
    prev_time: Option<f64>,
}

impl FrameLoop {
    /// Request the next frame, replacing any token still held.
    pub fn schedule(&mut self, host: &mut dyn HostWindow) -> FrameRequest {
        let request = host.request_frame();
        self.pending = Some(request);
        request
    }

    /// Consume `request` if it is the frame being waited for.
    pub fn accept(&mut self, request: FrameRequest) -> bool {
        if self.pending == Some(request) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Record a frame timestamp. The first tick only records and returns
    /// `None`; later ticks return the elapsed time in seconds.
    pub fn advance(&mut self, timestamp_ms: f64) -> Option<f32> {
        let prev = self.prev_time.replace(timestamp_ms)?;
        Some(((timestamp_ms - prev).max(0.0) / 1000.0) as f32)
    }

    /// Cancel the pending frame, if any, and forget the last timestamp.
    pub fn cancel(&mut self, host: &mut dyn HostWindow) -> bool {
        self.prev_time = None;
        match self.pending.take() {
            Some(request) => {
                host.cancel_frame(request);
                trace!("cancelled frame {:?}", request);
                true
            }
            None => false,
        }
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }
}
