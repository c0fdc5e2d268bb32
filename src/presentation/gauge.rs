use crate::models::RiskTier;
use crate::presentation::classifier::classify;

/// Identifies one started animation. Frames are only produced for the handle
/// of the most recently started, not yet cancelled animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeFrame {
    pub value: f64,
    pub tier: RiskTier,
    pub is_final: bool,
}

#[derive(Debug, Clone)]
struct Animation {
    handle: AnimationHandle,
    from: f64,
    to: f64,
    duration_ms: u64,
    started_at: u64,
}

/// Drives the gauge from its current value toward a target with an
/// ease-out quartic curve.
#[derive(Debug, Default)]
pub struct GaugeAnimator {
    active: Option<Animation>,
    next_handle: u64,
    displayed: f64,
}

pub fn ease_out_quart(progress: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - progress).powi(4)
}

impl GaugeAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new animation at `started_at` (milliseconds on the caller's
    /// clock). Any animation still running is cancelled first.
    pub fn animate(&mut self, from: f64, to: f64, duration_ms: u64, started_at: u64) -> AnimationHandle {
        self.next_handle += 1;
        let handle = AnimationHandle(self.next_handle);
        if let Some(previous) = self.active.take() {
            tracing::trace!(handle = previous.handle.0, "gauge animation superseded");
        }
        self.displayed = from;
        self.active = Some(Animation {
            handle,
            from,
            to,
            duration_ms,
            started_at,
        });
        handle
    }

    /// Produces the frame for `now`, or `None` when `handle` is no longer the
    /// running animation. The final frame carries `to` exactly and ends the
    /// animation.
    pub fn frame(&mut self, handle: AnimationHandle, now: u64) -> Option<GaugeFrame> {
        let animation = self.active.as_ref().filter(|a| a.handle == handle)?;

        let elapsed = now.saturating_sub(animation.started_at);
        let progress = if animation.duration_ms == 0 {
            1.0
        } else {
            (elapsed as f64 / animation.duration_ms as f64).min(1.0)
        };

        let is_final = progress >= 1.0;
        let value = if is_final {
            animation.to
        } else {
            animation.from + (animation.to - animation.from) * ease_out_quart(progress)
        };

        if is_final {
            self.active = None;
        }
        self.displayed = value;

        Some(GaugeFrame {
            value,
            tier: classify(value),
            is_final,
        })
    }

    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        if self.is_running(handle) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn is_running(&self, handle: AnimationHandle) -> bool {
        self.active.as_ref().is_some_and(|a| a.handle == handle)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Last value handed out in a frame.
    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.displayed = 0.0;
    }
}
