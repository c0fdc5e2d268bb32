use crate::error::ScanError;
use crate::models::{RiskTier, StatCategory};

/// Named attachment points of the UI surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    UrlInput,
    FileInput,
    Loading,
    Results,
    Gauge,
    Verdict,
    Pill(StatCategory),
}

/// The page the sequencer drives. Implementations only paint; all ordering
/// and timing decisions are made by the caller.
pub trait ScanView {
    fn show(&mut self, region: Region);
    fn hide(&mut self, region: Region);
    fn set_text(&mut self, region: Region, text: &str);
    fn draw_gauge(&mut self, value: f64, tier: RiskTier);
    fn set_verdict(&mut self, tier: RiskTier);
    /// Transient attention cue on an input, e.g. after a rejected submission.
    fn nudge(&mut self, region: Region);
    fn report_error(&mut self, error: &ScanError);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewOp {
    Show(Region),
    Hide(Region),
    SetText(Region, String),
    DrawGauge(f64, RiskTier),
    SetVerdict(RiskTier),
    Nudge(Region),
    Error(String),
}

/// Headless view that records every operation in order.
#[derive(Debug, Default)]
pub struct RecordingView {
    ops: Vec<ViewOp>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[ViewOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<ViewOp> {
        std::mem::take(&mut self.ops)
    }

    /// Whether `region` is currently visible according to the last show/hide.
    pub fn is_visible(&self, region: Region) -> bool {
        self.ops
            .iter()
            .rev()
            .find_map(|op| match op {
                ViewOp::Show(r) if *r == region => Some(true),
                ViewOp::Hide(r) if *r == region => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn text(&self, region: Region) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            ViewOp::SetText(r, text) if *r == region => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn last_gauge(&self) -> Option<(f64, RiskTier)> {
        self.ops.iter().rev().find_map(|op| match op {
            ViewOp::DrawGauge(value, tier) => Some((*value, *tier)),
            _ => None,
        })
    }

    pub fn verdict(&self) -> Option<RiskTier> {
        self.ops.iter().rev().find_map(|op| match op {
            ViewOp::SetVerdict(tier) => Some(*tier),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                ViewOp::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn gauge_frames(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, ViewOp::DrawGauge(..)))
            .count()
    }

    pub fn position(&self, wanted: &ViewOp) -> Option<usize> {
        self.ops.iter().position(|op| op == wanted)
    }
}

impl ScanView for RecordingView {
    fn show(&mut self, region: Region) {
        self.ops.push(ViewOp::Show(region));
    }

    fn hide(&mut self, region: Region) {
        self.ops.push(ViewOp::Hide(region));
    }

    fn set_text(&mut self, region: Region, text: &str) {
        self.ops.push(ViewOp::SetText(region, text.to_string()));
    }

    fn draw_gauge(&mut self, value: f64, tier: RiskTier) {
        self.ops.push(ViewOp::DrawGauge(value, tier));
    }

    fn set_verdict(&mut self, tier: RiskTier) {
        self.ops.push(ViewOp::SetVerdict(tier));
    }

    fn nudge(&mut self, region: Region) {
        self.ops.push(ViewOp::Nudge(region));
    }

    fn report_error(&mut self, error: &ScanError) {
        self.ops.push(ViewOp::Error(error.user_message()));
    }
}
