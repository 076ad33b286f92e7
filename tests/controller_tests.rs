//! Interaction controller scenarios driven through scripted channels

mod common;

use common::{RecordingPresenter, Script, ScriptedCapture, ScriptedDispatch, ScriptedPlayback};
use voicebot::controller::{
    CaptureEvent, Controller, ControllerEvent, InteractionState, PlaybackEvent, UtteranceId,
    CAPTURE_UNAVAILABLE_NOTICE,
};
use voicebot::dispatch::DispatchError;
use voicebot::messages::Sender;
use voicebot::speech::CaptureError;

const GREETING: &str = "Hello! Ask me anything.";

fn controller(script: &Script) -> Controller<RecordingPresenter> {
    Controller::<RecordingPresenter>::builder()
        .with_greeting(GREETING)
        .with_capture(ScriptedCapture(script.clone()))
        .with_dispatch(ScriptedDispatch(script.clone()))
        .with_playback(ScriptedPlayback::new(script.clone()))
        .build(RecordingPresenter::default())
        .unwrap()
}

fn text_only(script: &Script) -> Controller<RecordingPresenter> {
    Controller::<RecordingPresenter>::builder()
        .with_greeting(GREETING)
        .with_dispatch(ScriptedDispatch(script.clone()))
        .build(RecordingPresenter::default())
        .unwrap()
}

#[test]
fn test_hello_round_trip() {
    let script = Script::default();
    script.reply(Ok("hi there".into()));
    let mut c = controller(&script);

    assert!(c.submit_text("hello"));
    c.poll_events();

    assert_eq!(script.queries(), vec!["hello"]);
    assert_eq!(script.spoken(), vec!["hi there"]);
    assert_eq!(c.state(), InteractionState::Speaking);

    let events = c.event_sender();
    events.send(PlaybackEvent::Started(UtteranceId(1)));
    events.send(PlaybackEvent::Ended(UtteranceId(1)));
    c.poll_events();
    assert_eq!(c.state(), InteractionState::Idle);

    let texts: Vec<_> = c
        .log()
        .get_all()
        .iter()
        .map(|m| (m.sender(), m.text().to_string()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (Sender::Bot, GREETING.to_string()),
            (Sender::User, "hello".to_string()),
            (Sender::Bot, "hi there".to_string()),
        ]
    );
}

#[test]
fn test_without_playback_settles_on_idle() {
    let script = Script::default();
    script.reply(Ok("hi there".into()));
    let mut c = text_only(&script);

    c.submit_text("hello");
    c.poll_events();

    assert_eq!(c.state(), InteractionState::Idle);
    assert_eq!(c.log().last().unwrap().text(), "hi there");
    let states: Vec<_> = c.presenter().surfaces.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![
            InteractionState::Idle,
            InteractionState::Processing,
            InteractionState::Idle
        ]
    );
}

#[test]
fn test_second_submission_while_processing_is_dropped() {
    let script = Script::default();
    let mut c = controller(&script);

    assert!(c.submit_text("x"));
    let len = c.log().len();
    assert!(!c.submit_text("y"));

    assert_eq!(c.log().len(), len);
    assert_eq!(script.queries(), vec!["x"]);

    c.event_sender()
        .send(ControllerEvent::Dispatch(Ok("reply to x".into())));
    c.poll_events();
    let users: Vec<_> = c
        .log()
        .get_all()
        .into_iter()
        .filter(|m| m.is_user())
        .map(|m| m.text().to_string())
        .collect();
    assert_eq!(users, vec!["x"]);
}

#[test]
fn test_dispatch_errors_reset_to_idle() {
    let failures = [
        DispatchError::Network("connection refused".into()),
        DispatchError::Status {
            status: 500,
            detail: None,
        },
        DispatchError::MalformedPayload("missing field `response`".into()),
    ];

    for failure in failures {
        let script = Script::default();
        script.reply(Err(failure.clone()));
        let mut c = controller(&script);

        c.submit_text("hello");
        c.poll_events();

        assert_eq!(c.state(), InteractionState::Idle);
        assert!(!c.is_processing());
        assert_eq!(
            c.log().last().unwrap().text(),
            format!("Sorry, I encountered an error: {}", failure)
        );
        assert!(script.spoken().is_empty());
    }
}

#[test]
fn test_request_capture_only_from_idle() {
    let script = Script::default();
    let mut c = controller(&script);

    c.submit_text("busy");
    c.request_capture();
    assert_eq!(c.state(), InteractionState::Processing);
    assert_eq!(*script.capture_starts.lock(), 0);

    c.event_sender()
        .send(ControllerEvent::Dispatch(Ok("done".into())));
    c.poll_events();
    assert_eq!(c.state(), InteractionState::Speaking);
    c.request_capture();
    assert_eq!(*script.capture_starts.lock(), 0);

    c.event_sender().send(PlaybackEvent::Ended(UtteranceId(1)));
    c.poll_events();
    c.request_capture();
    assert_eq!(c.state(), InteractionState::Listening);
    assert_eq!(*script.capture_starts.lock(), 1);
}

#[test]
fn test_voice_query_flow() {
    let script = Script::default();
    script.reply(Ok("It is sunny.".into()));
    let mut c = controller(&script);
    let events = c.event_sender();

    c.request_capture();
    let listening = c.presenter().last().clone();
    assert_eq!(listening.status, "Listening...");
    assert!(listening.capture_stop_enabled);
    assert!(!listening.capture_start_enabled);

    events.send(CaptureEvent::Transcript("what is the weather".into()));
    events.send(CaptureEvent::End);
    c.poll_events();

    assert_eq!(script.queries(), vec!["what is the weather"]);
    assert_eq!(script.spoken(), vec!["It is sunny."]);
    assert_eq!(c.state(), InteractionState::Speaking);
}

#[test]
fn test_no_speech_error() {
    let script = Script::default();
    let mut c = controller(&script);
    let events = c.event_sender();

    c.request_capture();
    events.send(CaptureEvent::Error(CaptureError::NoSpeech));
    events.send(CaptureEvent::End);
    c.poll_events();

    assert_eq!(c.state(), InteractionState::Idle);
    let errors: Vec<_> = c
        .log()
        .get_all()
        .into_iter()
        .filter(|m| m.text().contains("no-speech"))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].sender(), Sender::Bot);
    assert_eq!(errors[0].text(), "Error: no-speech");

    let states: Vec<_> = c.presenter().surfaces.iter().map(|s| s.status).collect();
    assert!(states.contains(&"Error occurred"));
    assert_eq!(c.presenter().last().status, "Ready");
}

#[test]
fn test_cancel_capture_returns_to_idle_on_end() {
    let script = Script::default();
    let mut c = controller(&script);

    c.request_capture();
    c.cancel_capture();
    assert_eq!(*script.capture_stops.lock(), 1);
    assert_eq!(c.state(), InteractionState::Listening);

    c.event_sender().send(CaptureEvent::End);
    c.poll_events();
    assert_eq!(c.state(), InteractionState::Idle);
    assert!(c.presenter().last().capture_start_enabled);
}

#[test]
fn test_error_then_typed_query_while_session_closes() {
    let script = Script::default();
    let mut c = controller(&script);
    let events = c.event_sender();

    c.request_capture();
    c.submit_text("typed instead");
    assert_eq!(*script.capture_aborts.lock(), 1);
    assert_eq!(*script.capture_stops.lock(), 0);

    // A late error from the aborted capture is logged without touching state
    events.send(CaptureEvent::Error(CaptureError::Aborted));
    events.send(CaptureEvent::End);
    c.poll_events();
    assert_eq!(c.state(), InteractionState::Processing);
    assert_eq!(c.log().last().unwrap().text(), "Error: aborted");
}

#[test]
fn test_late_transcript_after_typed_query_is_dropped() {
    let script = Script::default();
    script.reply(Ok("reply".into()));
    let mut c = controller(&script);
    let events = c.event_sender();

    c.request_capture();
    c.submit_text("typed");
    c.poll_events();
    assert_eq!(c.state(), InteractionState::Speaking);
    let len = c.log().len();

    // The aborted session still delivers what it had recognized
    events.send(CaptureEvent::Transcript("spoken leftover".into()));
    events.send(CaptureEvent::End);
    c.poll_events();

    assert_eq!(script.queries(), vec!["typed"]);
    assert_eq!(script.spoken(), vec!["reply"]);
    assert_eq!(*script.playback_cancels.lock(), 0);
    assert_eq!(c.log().len(), len);
    assert_eq!(c.state(), InteractionState::Speaking);
}

#[test]
fn test_superseded_utterance_events_ignored() {
    let script = Script::default();
    let mut c = controller(&script);
    let events = c.event_sender();

    c.submit_text("first");
    events.send(ControllerEvent::Dispatch(Ok("one".into())));
    c.poll_events();
    assert_eq!(c.state(), InteractionState::Speaking);

    c.submit_text("second");
    assert_eq!(*script.playback_cancels.lock(), 1);
    events.send(ControllerEvent::Dispatch(Ok("two".into())));
    events.send(PlaybackEvent::Ended(UtteranceId(1)));
    c.poll_events();
    assert_eq!(c.state(), InteractionState::Speaking);

    events.send(PlaybackEvent::Ended(UtteranceId(2)));
    c.poll_events();
    assert_eq!(c.state(), InteractionState::Idle);
}

#[test]
fn test_clear_leaves_only_seed() {
    let script = Script::default();
    script.reply(Ok("a".into()));
    let mut c = text_only(&script);

    c.submit_text("q");
    c.poll_events();
    assert!(c.log().len() > 1);

    c.clear_log();
    let messages = c.log().get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), GREETING);

    c.clear_log();
    assert_eq!(c.log().len(), 1);
}

#[test]
fn test_unavailable_capture_notice_and_affordances() {
    let script = Script::default();
    let mut c = text_only(&script);

    let messages = c.log().get_all();
    assert_eq!(messages[1].text(), CAPTURE_UNAVAILABLE_NOTICE);
    assert!(!c.presenter().last().capture_start_enabled);

    c.request_capture();
    assert_eq!(c.state(), InteractionState::Idle);
    assert!(c
        .presenter()
        .surfaces
        .iter()
        .all(|s| !s.capture_start_enabled && !s.capture_stop_enabled));
}
