// Presentation module - timed reveal of a scan outcome

pub mod classifier;
pub mod gauge;
pub mod sequencer;
pub mod timeline;
pub mod view;

pub use classifier::{classify, DANGEROUS_THRESHOLD, SUSPICIOUS_THRESHOLD};
pub use gauge::{ease_out_quart, AnimationHandle, GaugeAnimator, GaugeFrame};
pub use sequencer::{PresentationSequencer, RevealStage, SequenceState, SequenceToken, TokenIssuer};
pub use timeline::Timeline;
pub use view::{RecordingView, Region, ScanView, ViewOp};
