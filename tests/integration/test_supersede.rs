mod support;

use cyscan::models::{FileUpload, RiskTier, ScanRequest, ScanResult};
use cyscan::presentation::{Region, RevealStage, SequenceState, ViewOp};
use std::time::Duration;
use support::{controller, pump_until, ScriptedService};

fn dangerous_ops(ops: &[ViewOp]) -> usize {
    ops.iter()
        .filter(|op| {
            matches!(
                op,
                ViewOp::SetVerdict(RiskTier::Dangerous) | ViewOp::DrawGauge(_, RiskTier::Dangerous)
            )
        })
        .count()
}

#[tokio::test(start_paused = true)]
async fn newer_submission_wins_over_slower_older_one() {
    let service = ScriptedService::new()
        .reply("https://first.example", 2000, ScanResult::new(90.0).with_counts(10, 9, 0, 1, 0, 0))
        .reply("https://second.example", 100, ScanResult::new(5.0).with_counts(10, 0, 0, 10, 0, 0));
    let mut controller = controller(&service);

    let first = controller.submit_url("https://first.example").unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    let second = controller.submit_url("https://second.example").unwrap();
    assert!(second > first);

    controller.run_until_idle().await;

    let view = controller.view();
    assert_eq!(controller.state(), SequenceState::Settled);
    assert_eq!(controller.sequencer().current_token(), Some(second));
    assert_eq!(view.verdict(), Some(RiskTier::Safe));
    assert_eq!(dangerous_ops(view.ops()), 0);
    assert_eq!(service.seen().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn superseding_mid_reveal_drops_every_old_cue() {
    let service = ScriptedService::new()
        .reply("https://first.example", 100, ScanResult::new(95.0).with_counts(20, 19, 0, 1, 0, 0))
        .reply("https://second.example", 100, ScanResult::new(12.0).with_counts(20, 0, 2, 18, 0, 0));
    let mut controller = controller(&service);

    controller.submit_url("https://first.example").unwrap();
    pump_until(&mut controller, |c| {
        c.state() == SequenceState::Revealing(RevealStage::TextRevealed)
    })
    .await;
    assert!(dangerous_ops(controller.view().ops()) > 0);

    controller.submit_url("https://second.example").unwrap();
    let reset = controller.view_mut().take_ops();
    assert!(reset.contains(&ViewOp::Hide(Region::Results)));
    assert!(reset.contains(&ViewOp::Show(Region::Loading)));
    assert_eq!(controller.state(), SequenceState::AwaitingResult);
    assert_eq!(controller.sequencer().displayed_percentage(), 0.0);

    controller.run_until_idle().await;

    let view = controller.view();
    assert_eq!(dangerous_ops(view.ops()), 0, "stale cues fired: {:?}", view.ops());
    assert_eq!(view.verdict(), Some(RiskTier::Safe));
    assert_eq!(view.last_gauge(), Some((12.0, RiskTier::Safe)));
    assert_eq!(controller.state(), SequenceState::Settled);
}

#[tokio::test(start_paused = true)]
async fn rejected_submission_leaves_running_sequence_alone() {
    let service = ScriptedService::new().reply("https://first.example", 100, ScanResult::new(75.0));
    let mut controller = controller(&service);

    let token = controller.submit_url("https://first.example").unwrap();
    pump_until(&mut controller, |c| matches!(c.state(), SequenceState::Revealing(_))).await;

    assert!(controller.submit_url("   ").is_err());
    assert!(controller.submit_file(None).is_err());
    assert_eq!(controller.sequencer().current_token(), Some(token));

    controller.run_until_idle().await;

    assert_eq!(controller.state(), SequenceState::Settled);
    assert_eq!(controller.view().verdict(), Some(RiskTier::Dangerous));
    assert_eq!(service.seen().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn file_scan_supersedes_url_scan() {
    let service = ScriptedService::new()
        .reply("https://first.example", 5000, ScanResult::new(80.0))
        .reply("sample.docx", 200, ScanResult::new(40.0));
    let mut controller = controller(&service);

    controller.submit_url("https://first.example").unwrap();
    let upload = FileUpload::new("sample.docx", b"PK\x03\x04".to_vec());
    controller.submit_file(Some(upload.clone())).unwrap();

    controller.run_until_idle().await;

    assert_eq!(service.seen().last(), Some(&ScanRequest::File(upload)));
    assert_eq!(controller.view().verdict(), Some(RiskTier::Suspicious));
    assert_eq!(dangerous_ops(controller.view().ops()), 0);
}

#[tokio::test(start_paused = true)]
async fn failure_after_supersede_only_reports_newest() {
    let service = ScriptedService::new()
        .reply("https://first.example", 300, ScanResult::new(10.0))
        .fail("a.pdf", 100, "upstream unavailable");
    let mut controller = controller(&service);

    controller.submit_url("https://first.example").unwrap();
    controller
        .submit_file(Some(FileUpload::new("a.pdf", b"%PDF".to_vec())))
        .unwrap();

    controller.run_until_idle().await;

    let view = controller.view();
    assert_eq!(controller.state(), SequenceState::Idle);
    assert_eq!(view.errors().len(), 1);
    assert!(view.ops().contains(&ViewOp::Nudge(Region::FileInput)));
    assert!(view.verdict().is_none());
}
