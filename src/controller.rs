use crate::config::RevealTimings;
use crate::error::ScanError;
use crate::models::{FileUpload, RequestKind, ScanRequest, ScanResult};
use crate::presentation::{PresentationSequencer, Region, ScanView, SequenceState, SequenceToken, TokenIssuer};
use crate::service::ScanService;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug)]
struct Completion {
    token: SequenceToken,
    outcome: Result<ScanResult, ScanError>,
}

struct InFlight {
    token: SequenceToken,
    kind: RequestKind,
    task: JoinHandle<()>,
}

/// Accepts scan submissions, dispatches them to the scanning service and
/// feeds the outcome to the presentation sequencer.
///
/// The controller is the only place sequence tokens are issued. Network
/// calls run on spawned tokio tasks and report back over a channel tagged with
/// their token; [`pump`](ScanController::pump) drains that channel and the
/// sequencer's timeline on the owner's task, so view updates never race.
pub struct ScanController<V: ScanView> {
    service: Arc<dyn ScanService>,
    view: V,
    sequencer: PresentationSequencer,
    issuer: TokenIssuer,
    epoch: Instant,
    in_flight: Option<InFlight>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    dispatched: u64,
}

impl<V: ScanView> ScanController<V> {
    pub fn new(service: Arc<dyn ScanService>, view: V, timings: RevealTimings) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            service,
            view,
            sequencer: PresentationSequencer::new(timings),
            issuer: TokenIssuer::new(),
            epoch: Instant::now(),
            in_flight: None,
            completions_tx,
            completions_rx,
            dispatched: 0,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn sequencer(&self) -> &PresentationSequencer {
        &self.sequencer
    }

    pub fn state(&self) -> SequenceState {
        self.sequencer.state()
    }

    /// Number of requests handed to the service so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn has_outstanding(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True when no response is awaited and no cue is scheduled.
    pub fn is_idle(&self) -> bool {
        !self.has_outstanding() && self.sequencer.next_deadline().is_none()
    }

    pub fn submit_url(&mut self, url: &str) -> Result<SequenceToken, ScanError> {
        self.submit(ScanRequest::url(url))
    }

    /// `None` stands for "no file selected".
    pub fn submit_file(&mut self, file: Option<FileUpload>) -> Result<SequenceToken, ScanError> {
        match file {
            Some(file) => self.submit(ScanRequest::File(file)),
            None => self.reject(
                RequestKind::File,
                ScanError::Validation("Choose a file".to_string()),
            ),
        }
    }

    /// Validates and dispatches `request`, superseding any request still in
    /// flight. Must be called from within a tokio runtime.
    pub fn submit(&mut self, request: ScanRequest) -> Result<SequenceToken, ScanError> {
        let kind = request.kind();
        if let Err(error) = request.validate() {
            return self.reject(kind, error);
        }
        let request = request.normalized();

        self.cancel_in_flight();
        let token = self.issuer.issue();
        let now = self.now_ms();
        self.sequencer.begin(token, now, &mut self.view);

        info!(token = %token, kind = kind.as_str(), target = %request.describe(), "dispatching scan");

        let service = Arc::clone(&self.service);
        let completions = self.completions_tx.clone();
        let task = tokio::spawn(async move {
            let outcome = service.scan(&request).await;
            // The receiver only goes away together with the controller.
            let _ = completions.send(Completion { token, outcome });
        });

        self.in_flight = Some(InFlight { token, kind, task });
        self.dispatched += 1;
        Ok(token)
    }

    /// Applies the outcome of the request dispatched under `token`. Outcomes
    /// of superseded requests are discarded; returns whether it was applied.
    pub fn complete(&mut self, token: SequenceToken, outcome: Result<ScanResult, ScanError>) -> bool {
        let kind = match self.in_flight {
            Some(ref flight) if flight.token == token => flight.kind,
            _ => {
                debug!(token = %token, "discarding response of superseded request");
                return false;
            }
        };
        self.in_flight = None;

        let now = self.now_ms();
        match outcome {
            Ok(result) => {
                let result = result.clamped();
                self.sequencer.present(token, Ok(result), now, &mut self.view)
            }
            Err(error) => {
                warn!(token = %token, error = %error, "scan request failed");
                self.view.nudge(input_region(kind));
                self.sequencer.present(token, Err(error), now, &mut self.view)
            }
        }
    }

    /// Waits for the next response or scheduled cue, whichever comes first,
    /// and processes everything that is due. Never resolves while the
    /// controller is idle.
    pub async fn pump(&mut self) {
        let deadline = self
            .sequencer
            .next_deadline()
            .map(|ms| self.epoch + Duration::from_millis(ms));

        tokio::select! {
            Some(completion) = self.completions_rx.recv() => {
                self.complete(completion.token, completion.outcome);
            }
            _ = sleep_or_pending(deadline) => {}
        }

        let now = self.now_ms();
        self.sequencer.advance(now, &mut self.view);
    }

    /// Pumps until no response is outstanding and no cue is scheduled.
    pub async fn run_until_idle(&mut self) {
        while !self.is_idle() {
            self.pump().await;
        }
    }

    /// Drops the running sequence and any outstanding request.
    pub fn cancel(&mut self) {
        self.cancel_in_flight();
        self.sequencer.reset(&mut self.view);
    }

    fn reject(&mut self, kind: RequestKind, error: ScanError) -> Result<SequenceToken, ScanError> {
        debug!(kind = kind.as_str(), error = %error, "submission rejected");
        self.view.nudge(input_region(kind));
        self.view.report_error(&error);
        Err(error)
    }

    fn cancel_in_flight(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            flight.task.abort();
            debug!(token = %flight.token, "outstanding request superseded");
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

impl<V: ScanView> Drop for ScanController<V> {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

fn input_region(kind: RequestKind) -> Region {
    match kind {
        RequestKind::Url => Region::UrlInput,
        RequestKind::File => Region::FileInput,
    }
}

async fn sleep_or_pending(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
