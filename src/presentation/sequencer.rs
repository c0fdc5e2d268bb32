use crate::config::RevealTimings;
use crate::error::ScanError;
use crate::models::{ScanResult, StatCategory};
use crate::presentation::classifier::classify;
use crate::presentation::gauge::{AnimationHandle, GaugeAnimator};
use crate::presentation::timeline::Timeline;
use crate::presentation::view::{Region, ScanView};
use tracing::{debug, info, trace, warn};

/// Marks one presentation sequence. Cues and responses carry the token they
/// were created under and are ignored once a newer token is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceToken(u64);

impl std::fmt::Display for SequenceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing tokens.
#[derive(Debug, Default)]
pub struct TokenIssuer {
    last: u64,
}

impl TokenIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> SequenceToken {
        self.last += 1;
        SequenceToken(self.last)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealStage {
    GaugeRevealed,
    TextRevealed,
    StatsRevealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    Idle,
    AwaitingResult,
    Revealing(RevealStage),
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    LoadingFloor,
    StartGauge,
    GaugeFrame(AnimationHandle),
    RevealVerdict,
    RevealStats,
    RevealPill(StatCategory),
}

#[derive(Debug)]
struct Scheduled {
    token: SequenceToken,
    cue: Cue,
}

/// Maps one scan's lifecycle onto the timed reveal of loading indicator,
/// gauge, verdict and count pills.
///
/// Time is passed in explicitly as milliseconds, so the same state machine
/// runs against the tokio clock in the binary and against plain numbers in
/// tests. Nothing fires on its own: the owner calls [`advance`] whenever
/// [`next_deadline`] has passed.
///
/// [`advance`]: PresentationSequencer::advance
/// [`next_deadline`]: PresentationSequencer::next_deadline
#[derive(Debug)]
pub struct PresentationSequencer {
    timings: RevealTimings,
    state: SequenceState,
    current: Option<SequenceToken>,
    timeline: Timeline<Scheduled>,
    gauge: GaugeAnimator,
    gauge_handle: Option<AnimationHandle>,
    loading_until: u64,
    pending: Option<ScanResult>,
    presented: Option<ScanResult>,
    gauge_landed: bool,
    pills_outstanding: usize,
}

impl PresentationSequencer {
    pub fn new(timings: RevealTimings) -> Self {
        Self {
            timings,
            state: SequenceState::Idle,
            current: None,
            timeline: Timeline::new(),
            gauge: GaugeAnimator::new(),
            gauge_handle: None,
            loading_until: 0,
            pending: None,
            presented: None,
            gauge_landed: false,
            pills_outstanding: 0,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn current_token(&self) -> Option<SequenceToken> {
        self.current
    }

    /// The result currently being revealed (or fully revealed).
    pub fn presented(&self) -> Option<&ScanResult> {
        self.presented.as_ref()
    }

    pub fn displayed_percentage(&self) -> f64 {
        self.gauge.displayed()
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SequenceState::AwaitingResult | SequenceState::Revealing(_)
        )
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timeline.next_deadline()
    }

    /// Cancels every pending cue and the gauge animation and clears the
    /// result area. Leaves the sequencer `Idle` with no current token.
    pub fn reset(&mut self, view: &mut dyn ScanView) {
        let dropped = self.timeline.clear();
        self.cancel_gauge();
        self.gauge.reset();
        if let Some(token) = self.current.take() {
            debug!(token = %token, dropped_cues = dropped, state = ?self.state, "sequence reset");
        }

        self.pending = None;
        self.presented = None;
        self.gauge_landed = false;
        self.pills_outstanding = 0;
        self.state = SequenceState::Idle;

        view.hide(Region::Loading);
        view.hide(Region::Results);
        view.hide(Region::Gauge);
        view.hide(Region::Verdict);
        for category in StatCategory::ALL {
            view.hide(Region::Pill(category));
        }
    }

    /// Starts a new sequence for a freshly dispatched request, superseding
    /// whatever was running.
    pub fn begin(&mut self, token: SequenceToken, now: u64, view: &mut dyn ScanView) {
        self.reset(view);

        self.current = Some(token);
        self.state = SequenceState::AwaitingResult;
        self.loading_until = now + self.timings.loading_floor_ms;
        view.show(Region::Loading);

        debug!(token = %token, loading_until = self.loading_until, "sequence started");
    }

    /// Hands the outcome of the request identified by `token` to the
    /// sequence. Returns `false` when the outcome was ignored because the
    /// token is stale or the sequence no longer waits for a result.
    pub fn present(
        &mut self,
        token: SequenceToken,
        outcome: Result<ScanResult, ScanError>,
        now: u64,
        view: &mut dyn ScanView,
    ) -> bool {
        if self.current != Some(token) {
            debug!(token = %token, current = ?self.current, "ignoring outcome of superseded request");
            return false;
        }

        if self.state != SequenceState::AwaitingResult {
            warn!(token = %token, state = ?self.state, "outcome arrived outside of AwaitingResult");
            return false;
        }

        match outcome {
            Ok(result) => {
                let result = result.clamped();
                if now >= self.loading_until {
                    self.enter_revealing(now, result, view);
                } else {
                    trace!(token = %token, wait_ms = self.loading_until - now, "holding result for loading floor");
                    self.pending = Some(result);
                    self.timeline.schedule(
                        self.loading_until,
                        Scheduled {
                            token,
                            cue: Cue::LoadingFloor,
                        },
                    );
                }
            }
            Err(error) => self.fail(&error, view),
        }

        true
    }

    /// Fires every cue due at or before `now`, in deadline order. Returns the
    /// number of cues that fired.
    pub fn advance(&mut self, now: u64, view: &mut dyn ScanView) -> usize {
        let mut fired = 0;
        while let Some((due, scheduled)) = self.timeline.pop_due(now) {
            if self.current != Some(scheduled.token) {
                trace!(token = %scheduled.token, cue = ?scheduled.cue, "dropping cue of superseded sequence");
                continue;
            }
            self.fire(due, scheduled.cue, view);
            fired += 1;
        }
        fired
    }

    fn fail(&mut self, error: &ScanError, view: &mut dyn ScanView) {
        let dropped = self.timeline.clear();
        self.cancel_gauge();
        self.pending = None;
        self.presented = None;
        self.state = SequenceState::Idle;
        let token = self.current.take();

        view.hide(Region::Loading);
        view.report_error(error);

        info!(token = ?token, dropped_cues = dropped, error = %error, "scan failed, sequence back to idle");
    }

    fn cancel_gauge(&mut self) {
        if let Some(handle) = self.gauge_handle.take() {
            if self.gauge.cancel(handle) {
                trace!(displayed = self.gauge.displayed(), "gauge animation cancelled mid-flight");
            }
        }
    }

    fn enter_revealing(&mut self, at: u64, result: ScanResult, view: &mut dyn ScanView) {
        let Some(token) = self.current else {
            return;
        };

        view.hide(Region::Loading);
        view.show(Region::Results);
        view.show(Region::Gauge);
        self.state = SequenceState::Revealing(RevealStage::GaugeRevealed);

        debug!(token = %token, pct = result.danger_percentage, "revealing result");
        self.presented = Some(result);

        let t = &self.timings;
        let cues = [
            (at + t.gauge_start_ms, Cue::StartGauge),
            (at + t.verdict_ms, Cue::RevealVerdict),
            (at + t.stats_ms, Cue::RevealStats),
        ];
        for (due, cue) in cues {
            self.timeline.schedule(due, Scheduled { token, cue });
        }
    }

    fn fire(&mut self, at: u64, cue: Cue, view: &mut dyn ScanView) {
        let Some(token) = self.current else {
            return;
        };
        if cue == Cue::LoadingFloor {
            if let Some(result) = self.pending.take() {
                self.enter_revealing(at, result, view);
            }
            return;
        }
        let Some(pct) = self.presented.as_ref().map(|r| r.danger_percentage) else {
            return;
        };

        match cue {
            Cue::LoadingFloor => {}
            Cue::StartGauge => {
                let handle = self
                    .gauge
                    .animate(0.0, pct, self.timings.gauge_duration_ms, at);
                self.gauge_handle = Some(handle);
                self.emit_frame(token, handle, at, view);
            }
            Cue::GaugeFrame(handle) => self.emit_frame(token, handle, at, view),
            Cue::RevealVerdict => {
                view.set_verdict(classify(pct));
                view.show(Region::Verdict);
                self.advance_stage(RevealStage::TextRevealed);
            }
            Cue::RevealStats => {
                self.advance_stage(RevealStage::StatsRevealed);
                if let Some(result) = self.presented.clone() {
                    for category in StatCategory::ALL {
                        let Some(text) = result.pill_text(category) else {
                            continue;
                        };
                        view.set_text(Region::Pill(category), &text);
                        let due = at + self.timings.pill_stagger_ms * category.index() as u64;
                        self.timeline.schedule(
                            due,
                            Scheduled {
                                token,
                                cue: Cue::RevealPill(category),
                            },
                        );
                        self.pills_outstanding += 1;
                    }
                }
                self.check_settled();
            }
            Cue::RevealPill(category) => {
                view.show(Region::Pill(category));
                self.pills_outstanding = self.pills_outstanding.saturating_sub(1);
                self.check_settled();
            }
        }
    }

    fn emit_frame(
        &mut self,
        token: SequenceToken,
        handle: AnimationHandle,
        at: u64,
        view: &mut dyn ScanView,
    ) {
        let Some(frame) = self.gauge.frame(handle, at) else {
            return;
        };

        view.draw_gauge(frame.value, frame.tier);

        if frame.is_final {
            self.gauge_handle = None;
            self.gauge_landed = true;
            self.check_settled();
        } else {
            self.timeline.schedule(
                at + self.timings.frame_interval_ms,
                Scheduled {
                    token,
                    cue: Cue::GaugeFrame(handle),
                },
            );
        }
    }

    fn advance_stage(&mut self, stage: RevealStage) {
        if let SequenceState::Revealing(current) = self.state {
            if stage > current {
                self.state = SequenceState::Revealing(stage);
            }
        }
    }

    fn check_settled(&mut self) {
        if self.state == SequenceState::Revealing(RevealStage::StatsRevealed)
            && self.pills_outstanding == 0
            && self.gauge_landed
        {
            self.state = SequenceState::Settled;
            info!(token = ?self.current, pct = self.gauge.displayed(), "scan presentation settled");
        }
    }
}
