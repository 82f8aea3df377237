//! Rolling frame-time statistics for the window title

use std::collections::VecDeque;
use std::time::Instant;

const FRAME_WINDOW: usize = 100;

pub struct FrameStats {
    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(FRAME_WINDOW),
            last_frame_time: now,
        }
    }

    /// Record a frame presented at `now`, returning its duration in ms
    pub fn record(&mut self, now: Instant) -> f32 {
        let frame_time = now.saturating_duration_since(self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;

        if self.frame_times.len() == FRAME_WINDOW {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
        frame_time
    }

    /// Mean frame time in ms over the last frames
    pub fn average_frame_time(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }

    pub fn fps(&self) -> f32 {
        let avg = self.average_frame_time();
        if avg > 0.0 {
            1000.0 / avg
        } else {
            0.0
        }
    }
}
