use super::test_helpers::{MockDocument, MockElement, MockForm};
use super::*;
use tokio::time::{Instant, sleep};

fn loader(doc: &MockDocument) -> Arc<MockElement> {
    doc.element_handle(LOADER_ID).unwrap()
}

fn container(doc: &MockDocument) -> Arc<MockElement> {
    doc.element_handle(CONTAINER_ID).unwrap()
}

// =============================================================================
// visibility + return value
// =============================================================================

#[tokio::test(start_paused = true)]
async fn fire_hides_form_and_container_and_shows_loader() {
    let doc = MockDocument::standard();
    let gate = SubmissionGate::new(GateConfig::default());

    gate.fire(&doc).unwrap();

    assert_eq!(doc.form_handle().unwrap().visibility(), Visibility::Hidden);
    assert_eq!(loader(&doc).visibility(), Visibility::Visible);
    assert_eq!(container(&doc).visibility(), Visibility::Hidden);
}

#[tokio::test(start_paused = true)]
async fn fire_overrides_any_prior_visibility() {
    let doc = MockDocument::standard();
    doc.form_handle().unwrap().set_visibility(Visibility::Hidden);
    loader(&doc).set_visibility(Visibility::Hidden);
    container(&doc).set_visibility(Visibility::Visible);
    let gate = SubmissionGate::new(GateConfig::default());

    gate.fire(&doc).unwrap();

    assert_eq!(doc.form_handle().unwrap().visibility(), Visibility::Hidden);
    assert_eq!(loader(&doc).visibility(), Visibility::Visible);
    assert_eq!(container(&doc).visibility(), Visibility::Hidden);
}

#[tokio::test(start_paused = true)]
async fn fire_always_suppresses_immediate_submission() {
    let doc = MockDocument::standard();
    let gate = SubmissionGate::new(GateConfig::default());

    assert_eq!(gate.fire(&doc), Ok(false));
    assert_eq!(gate.fire(&doc), Ok(false));
}

// =============================================================================
// deferred submission
// =============================================================================

#[tokio::test(start_paused = true)]
async fn submission_waits_for_full_delay_then_fires_once() {
    let doc = MockDocument::standard();
    let form = doc.form_handle().unwrap();
    let gate = SubmissionGate::new(GateConfig::default());
    let start = Instant::now();

    assert_eq!(gate.fire(&doc), Ok(false));
    assert_eq!(form.visibility(), Visibility::Hidden);
    assert_eq!(loader(&doc).visibility(), Visibility::Visible);
    assert_eq!(container(&doc).visibility(), Visibility::Hidden);
    assert_eq!(form.submit_count(), 0, "submit must not run synchronously");

    sleep(Duration::from_millis(1999)).await;
    assert_eq!(form.submit_count(), 0, "submitted before the delay elapsed");

    sleep(Duration::from_millis(1)).await;
    tokio::task::yield_now().await;
    assert_eq!(form.submit_count(), 1);
    assert_eq!(form.submitted_at()[0] - start, SUBMIT_DELAY);

    sleep(Duration::from_secs(30)).await;
    assert_eq!(form.submit_count(), 1, "submission must fire exactly once");
}

#[tokio::test(start_paused = true)]
async fn configured_delay_is_honoured() {
    let doc = MockDocument::standard();
    let form = doc.form_handle().unwrap();
    let gate = SubmissionGate::new(GateConfig::with_delay(Duration::from_millis(250)));
    let start = Instant::now();

    gate.fire(&doc).unwrap();
    sleep(Duration::from_secs(1)).await;

    assert_eq!(form.submitted_at(), vec![start + Duration::from_millis(250)]);
}

#[tokio::test(start_paused = true)]
async fn gate_moves_from_idle_to_pending() {
    let doc = MockDocument::standard();
    let gate = SubmissionGate::new(GateConfig::default());
    assert_eq!(gate.state(), GateState::Idle);

    gate.fire(&doc).unwrap();
    assert_eq!(gate.state(), GateState::Pending);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(gate.state(), GateState::Pending);
}

#[tokio::test(start_paused = true)]
async fn repeated_fire_schedules_a_single_submission() {
    let doc = MockDocument::standard();
    let form = doc.form_handle().unwrap();
    let gate = SubmissionGate::new(GateConfig::default());

    gate.fire(&doc).unwrap();
    sleep(Duration::from_millis(10)).await;
    gate.fire(&doc).unwrap();
    sleep(Duration::from_secs(10)).await;

    assert_eq!(form.submit_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn fire_with_explicit_handles() {
    let form = MockForm::new(Visibility::Visible);
    let loader = MockElement::new(Visibility::Hidden);
    let container = MockElement::new(Visibility::Visible);
    let elements = GateElements {
        form: Arc::clone(&form) as Arc<dyn FormElement>,
        loader: Arc::clone(&loader) as Arc<dyn UiElement>,
        container: Arc::clone(&container) as Arc<dyn UiElement>,
    };
    let gate = SubmissionGate::new(GateConfig::default());

    assert!(!gate.fire_with(&elements));
    assert_eq!(form.visibility(), Visibility::Hidden);
    assert_eq!(loader.visibility(), Visibility::Visible);
    assert_eq!(container.visibility(), Visibility::Hidden);

    sleep(SUBMIT_DELAY).await;
    tokio::task::yield_now().await;
    assert_eq!(form.submit_count(), 1);
}

// =============================================================================
// missing elements
// =============================================================================

#[tokio::test(start_paused = true)]
async fn missing_loader_aborts_without_scheduling() {
    let doc = MockDocument::without(LOADER_ID);
    let form = doc.form_handle().unwrap();
    let gate = SubmissionGate::new(GateConfig::default());

    let err = gate.fire(&doc).unwrap_err();
    assert_eq!(err, GateError::MissingElement(LOADER_ID.into()));
    assert_eq!(gate.state(), GateState::Idle);

    // Mutations before the failed lookup stay applied; later ones never run.
    assert_eq!(form.visibility(), Visibility::Hidden);
    assert_eq!(container(&doc).visibility(), Visibility::Visible);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(form.submit_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn missing_form_leaves_page_untouched() {
    let doc = MockDocument::without(FORM_ID);
    let gate = SubmissionGate::new(GateConfig::default());

    let err = gate.fire(&doc).unwrap_err();
    assert_eq!(err.to_string(), "missing UI element: #analyzeForm");
    assert_eq!(loader(&doc).visibility(), Visibility::Visible);
    assert_eq!(container(&doc).visibility(), Visibility::Visible);
}

#[tokio::test(start_paused = true)]
async fn missing_container_still_reports_after_loader_shown() {
    let doc = MockDocument::without(CONTAINER_ID);
    let form = doc.form_handle().unwrap();
    let gate = SubmissionGate::new(GateConfig::default());

    assert_eq!(gate.fire(&doc), Err(GateError::MissingElement(CONTAINER_ID.into())));
    assert_eq!(loader(&doc).visibility(), Visibility::Visible);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(form.submit_count(), 0);
}

#[test]
fn visibility_maps_to_css_display() {
    assert_eq!(Visibility::Visible.css_display(), "block");
    assert_eq!(Visibility::Hidden.css_display(), "none");
}
