//! Render throttling for idle screens.
//!
//! While a game is ticking every refresh is drawn. On static screens (picker,
//! ready, lost) a frame is drawn when its fingerprint changes, otherwise at
//! most once per `min_static_interval_ms` so resizes and clock text still land.

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    min_static_interval_ms: u64,
    last_render_ms: Option<u64>,
    last_fingerprint: u64,
}

impl RenderThrottle {
    pub fn new(min_static_interval_ms: u64) -> Self {
        Self {
            min_static_interval_ms,
            last_render_ms: None,
            last_fingerprint: 0,
        }
    }

    /// Decide whether to draw at `now_ms`.
    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64, is_static: bool) -> bool {
        let due = match self.last_render_ms {
            None => true,
            Some(_) if !is_static => true,
            Some(_) if fingerprint != self.last_fingerprint => true,
            Some(last) => now_ms.saturating_sub(last) >= self.min_static_interval_ms,
        };
        if due {
            self.last_render_ms = Some(now_ms);
            self.last_fingerprint = fingerprint;
        }
        due
    }

    /// Draw on the next call regardless of fingerprint.
    pub fn invalidate(&mut self) {
        self.last_render_ms = None;
    }
}
