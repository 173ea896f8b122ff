//! Simulation clock
//!
//! Turns external frame callbacks (wall-clock milliseconds) into a clamped
//! delta multiplier where 1.0 is one frame at the target rate.

use crate::tuning::SimTuning;

#[derive(Debug, Clone)]
pub struct SimClock {
    /// Timestamp of the previous frame, `None` before the first one
    last_ms: Option<f64>,
    target_frame_ms: f64,
    max_delta: f32,
    /// Global speed multiplier (1.0 = real time)
    pub time_scale: f32,
}

impl SimClock {
    pub fn new(tuning: &SimTuning) -> Self {
        Self {
            last_ms: None,
            target_frame_ms: tuning.target_frame_ms.max(1.0),
            max_delta: tuning.max_delta.max(0.0),
            time_scale: 1.0,
        }
    }

    /// Delta multiplier for a frame arriving at `now_ms`.
    ///
    /// The first frame advances exactly one step. Clock regressions and
    /// non-finite timestamps advance nothing. Stalls are clamped to `max_delta`.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let delta = match self.last_ms {
            None => 1.0,
            Some(last) => {
                let raw = ((now_ms - last) / self.target_frame_ms) as f32;
                raw.clamp(0.0, self.max_delta)
            }
        };
        // Never move the reference backwards
        self.last_ms = Some(self.last_ms.map_or(now_ms, |last| last.max(now_ms)));
        let scaled = delta * self.time_scale.max(0.0);
        log::trace!("clock: now={now_ms:.1} delta={scaled:.3}");
        scaled
    }

    /// Forget the previous timestamp (next frame counts as the first)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
