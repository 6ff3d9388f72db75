use std::io::Write;
use std::time::Duration;

use services::QuizSource;

use super::test_harness::{HarnessSetup, all_a_payload, setup_view_harness};
use crate::vm::QuizIntent;

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_renders_first_question() {
    let harness = setup_view_harness(HarnessSetup {
        remote_body: Some(all_a_payload(2)),
        ..HarnessSetup::default()
    })
    .await;

    let html = harness.render();
    assert!(html.contains("Question 1/2"), "missing progress in {html}");
    assert!(html.contains("Question text"), "missing prompt in {html}");
    for label in ["A", "B", "C", "D"] {
        assert!(html.contains(&format!(">{label}<")), "missing label {label} in {html}");
    }
    assert!(html.contains("Answer"), "missing answer button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn failed_boot_asks_for_local_file() {
    let harness = setup_view_harness(HarnessSetup::default()).await;

    let html = harness.render();
    assert!(
        html.contains("Failed to load the quiz data. Please choose a local JSON file."),
        "missing boot message in {html}"
    );
    assert!(html.contains("file-input"), "missing file input in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn invalid_initial_source_reports_reason() {
    let harness = setup_view_harness(HarnessSetup {
        initial_source: Some(QuizSource::local(r#"{"quizzes":[]}"#)),
        ..HarnessSetup::default()
    })
    .await;

    let html = harness.render();
    assert!(
        html.contains("Could not read the JSON file: quiz data is empty"),
        "missing inline error in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn local_file_replaces_error_screen() {
    let mut harness = setup_view_harness(HarnessSetup::default()).await;

    harness.load_file("/definitely/not/here/quizzes.json");
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Could not read the file. Please try another file."),
        "missing read failure in {html}"
    );

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(all_a_payload(3).as_bytes()).unwrap();
    harness.load_file(&file.path().display().to_string());
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 1/3"), "quiz did not start in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn answer_feedback_then_auto_advance_to_result() {
    let mut harness = setup_view_harness(HarnessSetup {
        remote_body: Some(all_a_payload(2)),
        auto_advance: Duration::from_millis(100),
        ..HarnessSetup::default()
    })
    .await;

    harness.dispatch(QuizIntent::Select(0));
    harness.dispatch(QuizIntent::Submit);
    let html = harness.render();
    assert!(html.contains("Correct!"), "missing feedback in {html}");
    assert!(html.contains("Question 1/2"), "advanced too early in {html}");

    tokio::time::sleep(Duration::from_millis(150)).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 2/2"), "did not advance in {html}");
    assert!(!html.contains("Correct!"), "stale feedback in {html}");

    harness.dispatch(QuizIntent::Select(1));
    harness.dispatch(QuizIntent::Submit);
    assert!(harness.render().contains("Incorrect"));

    tokio::time::sleep(Duration::from_millis(150)).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("1 of 2 correct"), "missing score in {html}");
    assert!(html.contains("Accuracy: 50%"), "missing accuracy in {html}");

    harness.dispatch(QuizIntent::Retry);
    let html = harness.render();
    assert!(html.contains("Question 1/2"), "retry did not restart in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn retry_cancels_pending_advance() {
    let mut harness = setup_view_harness(HarnessSetup {
        remote_body: Some(all_a_payload(2)),
        auto_advance: Duration::from_millis(100),
        ..HarnessSetup::default()
    })
    .await;

    harness.dispatch(QuizIntent::Select(0));
    harness.dispatch(QuizIntent::Submit);
    harness.dispatch(QuizIntent::Retry);

    tokio::time::sleep(Duration::from_millis(150)).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 1/2"), "pending advance fired in {html}");
    assert!(!html.contains("Correct!"), "feedback survived retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_submit_changes_nothing() {
    let mut harness = setup_view_harness(HarnessSetup {
        remote_body: Some(all_a_payload(1)),
        ..HarnessSetup::default()
    })
    .await;

    let before = harness.render();
    harness.dispatch(QuizIntent::Submit);
    assert_eq!(harness.render(), before);
}
