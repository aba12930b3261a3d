use popthehood::dictation::{DictationBridge, DictationErrorKind, DictationState};
use popthehood::error::AppError;

use super::support::{FakeMicrophone, FakeRecognizer};

#[test]
fn permission_probe_is_opened_and_released_before_the_recognizer() {
    let mut microphone = FakeMicrophone::granted();
    let mut recognizer = FakeRecognizer::default();
    let mut bridge = DictationBridge::new();

    bridge.start(&mut microphone, &mut recognizer).unwrap();
    assert_eq!(microphone.opens.get(), 1);
    assert_eq!(microphone.stops.get(), 1, "probe stream released immediately");
    assert_eq!(recognizer.started, 1);
    assert_eq!(bridge.state(), DictationState::Connecting);

    bridge.on_start();
    assert_eq!(bridge.state(), DictationState::Listening);
}

#[test]
fn probe_denial_never_starts_the_recognizer() {
    let mut microphone = FakeMicrophone::denied();
    let mut recognizer = FakeRecognizer::default();
    let mut bridge = DictationBridge::new();

    let err = bridge.start(&mut microphone, &mut recognizer).unwrap_err();
    assert!(matches!(err, AppError::Permission(_)));
    assert_eq!(recognizer.started, 0);
    assert_eq!(
        bridge.state(),
        DictationState::Error(DictationErrorKind::PermissionDenied)
    );

    bridge.dismiss_error();
    assert_eq!(bridge.state(), DictationState::Idle);
}

#[test]
fn finalized_segments_merge_with_a_single_space() {
    let mut bridge = DictationBridge::new();
    bridge.set_accumulated("Engine");
    bridge.on_result(&["knocks at idle"], None);
    assert_eq!(bridge.accumulated(), "Engine knocks at idle");

    // Segments within one update stay in delivery order.
    bridge.on_result(&["and stalls", "when warm"], None);
    assert_eq!(bridge.accumulated(), "Engine knocks at idle and stalls when warm");
}

#[test]
fn interim_text_is_preview_only_and_discarded_on_stop() {
    let mut microphone = FakeMicrophone::granted();
    let mut recognizer = FakeRecognizer::default();
    let mut bridge = DictationBridge::new();
    bridge.start(&mut microphone, &mut recognizer).unwrap();
    bridge.on_start();

    bridge.on_result(&["Engine knocks"], Some("when I"));
    assert_eq!(bridge.accumulated(), "Engine knocks");
    assert_eq!(bridge.preview(), "Engine knocks when I");

    // A final segment supersedes the interim; the old interim is not merged.
    bridge.on_result(&["when I accelerate"], None);
    assert_eq!(bridge.accumulated(), "Engine knocks when I accelerate");
    assert_eq!(bridge.interim(), "");

    bridge.on_result(&[], Some("uphill"));
    bridge.stop(&mut recognizer);
    assert_eq!(recognizer.stopped, 1);
    assert_eq!(bridge.state(), DictationState::Idle);
    assert_eq!(
        bridge.accumulated(),
        "Engine knocks when I accelerate",
        "pending interim is never promoted to final"
    );
}

#[test]
fn recognizer_error_surfaces_its_subtype() {
    let mut bridge = DictationBridge::new();
    bridge.on_error(DictationErrorKind::Network);
    assert_eq!(
        bridge.state(),
        DictationState::Error(DictationErrorKind::Network)
    );
}

#[test]
fn session_end_returns_to_idle_and_drops_interim() {
    let mut microphone = FakeMicrophone::granted();
    let mut recognizer = FakeRecognizer::default();
    let mut bridge = DictationBridge::new();
    bridge.start(&mut microphone, &mut recognizer).unwrap();
    bridge.on_start();
    bridge.on_result(&[], Some("half a sent"));

    bridge.on_end();
    assert_eq!(bridge.state(), DictationState::Idle);
    assert_eq!(bridge.interim(), "");

    // A fresh session starts with empty interim state.
    bridge.start(&mut microphone, &mut recognizer).unwrap();
    assert_eq!(bridge.preview(), bridge.accumulated());
}
