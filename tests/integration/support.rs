#![allow(dead_code)]

use cyscan::error::ScanError;
use cyscan::models::{ScanRequest, ScanResult};
use cyscan::presentation::RecordingView;
use cyscan::service::ScanService;
use cyscan::{RevealTimings, ScanController};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Reply = (u64, Result<ScanResult, String>);

/// Answers each request with the reply scripted for its URL or filename,
/// after the scripted delay. Requests without a script fail.
#[derive(Default)]
pub struct ScriptedService {
    replies: Mutex<HashMap<String, Reply>>,
    seen: Mutex<Vec<ScanRequest>>,
}

fn target(request: &ScanRequest) -> String {
    match request {
        ScanRequest::Url(url) => url.clone(),
        ScanRequest::File(file) => file.filename.clone(),
    }
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(self: &Arc<Self>, target: &str, delay_ms: u64, result: ScanResult) -> Arc<Self> {
        self.replies
            .lock()
            .unwrap()
            .insert(target.to_string(), (delay_ms, Ok(result)));
        Arc::clone(self)
    }

    pub fn fail(self: &Arc<Self>, target: &str, delay_ms: u64, message: &str) -> Arc<Self> {
        self.replies
            .lock()
            .unwrap()
            .insert(target.to_string(), (delay_ms, Err(message.to_string())));
        Arc::clone(self)
    }

    pub fn seen(&self) -> Vec<ScanRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl ScanService for ScriptedService {
    fn scan<'a>(&'a self, request: &'a ScanRequest) -> BoxFuture<'a, Result<ScanResult, ScanError>> {
        self.seen.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().get(&target(request)).cloned();

        Box::pin(async move {
            let Some((delay_ms, outcome)) = reply else {
                return Err(ScanError::Transport("no scripted reply".to_string()));
            };
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            outcome.map_err(ScanError::Transport)
        })
    }

    fn endpoint(&self) -> &str {
        "memory://scripted"
    }
}

pub fn controller(service: &Arc<ScriptedService>) -> ScanController<RecordingView> {
    ScanController::new(
        Arc::clone(service) as Arc<dyn ScanService>,
        RecordingView::new(),
        RevealTimings::default(),
    )
}

/// Pumps until `done` holds, failing the test if the controller goes idle first.
pub async fn pump_until<F>(controller: &mut ScanController<RecordingView>, done: F)
where
    F: Fn(&ScanController<RecordingView>) -> bool,
{
    while !done(controller) {
        assert!(!controller.is_idle(), "controller went idle before the condition held");
        controller.pump().await;
    }
}
