use super::*;
use CaptureState::*;

#[test]
fn happy_path_is_legal() {
    let mut s = CaptureSession::new();
    for next in [Preparing, Recording, Finalizing, Delivered] {
        s.advance(next).unwrap();
    }
    assert_eq!(s.state(), Delivered);
    assert_eq!(
        s.history(),
        &[Idle, Preparing, Recording, Finalizing, Delivered]
    );
}

#[test]
fn skipping_a_state_is_rejected() {
    let mut s = CaptureSession::new();
    let err = s.advance(Recording).unwrap_err();
    assert!(err.is_capture());
    assert_eq!(s.state(), Idle);
}

#[test]
fn any_live_state_can_fail() {
    for path in [&[][..], &[Preparing][..], &[Preparing, Recording][..]] {
        let mut s = CaptureSession::new();
        for next in path {
            s.advance(*next).unwrap();
        }
        s.fail();
        assert_eq!(s.state(), Failed);
    }
}

#[test]
fn terminal_states_stay_put() {
    let mut s = CaptureSession::new();
    for next in [Preparing, Recording, Finalizing, Delivered] {
        s.advance(next).unwrap();
    }
    s.fail();
    assert_eq!(s.state(), Delivered);
    assert!(s.advance(Preparing).is_err());
    assert!(!Failed.can_transition_to(Failed));
}

#[test]
fn states_display_lowercase() {
    assert_eq!(Finalizing.to_string(), "finalizing");
    assert_eq!(
        serde_json::to_string(&Delivered).unwrap(),
        "\"delivered\""
    );
}
