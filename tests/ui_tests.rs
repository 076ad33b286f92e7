//! UI automation tests using egui_kittest and AccessKit
//!
//! The app runs against scripted channels; widgets are found through their
//! accessibility labels.

mod common;

use common::{Script, ScriptedCapture, ScriptedDispatch, ScriptedPlayback};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use voicebot::controller::{CaptureEvent, Controller, ControllerEvent, InteractionState};
use voicebot::lifecycle::LifecycleHooks;
use voicebot::messages::Sender;
use voicebot::ui::{EguiPresenter, VoicebotApp};

const GREETING: &str = "Hello! I'm your voice assistant. How can I help you today?";

fn app(script: &Script, with_capture: bool) -> VoicebotApp {
    let mut builder = Controller::<EguiPresenter>::builder()
        .with_dispatch(ScriptedDispatch(script.clone()))
        .with_playback(ScriptedPlayback::new(script.clone()));
    if with_capture {
        builder = builder.with_capture(ScriptedCapture(script.clone()));
    }
    let controller = builder.build(EguiPresenter::new()).unwrap();
    VoicebotApp::from_controller(controller, LifecycleHooks::new())
}

fn harness(app: VoicebotApp) -> Harness<'static, VoicebotApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(400.0, 500.0))
        .build_state(|ctx, app: &mut VoicebotApp| app.show(ctx), app)
}

fn type_message(harness: &mut Harness<'_, VoicebotApp>, text: &str) {
    harness.get_by_label("Message input").focus();
    harness.run();
    harness.get_by_label("Message input").type_text(text);
    harness.run();
}

#[test]
fn test_greeting_and_ready_status() {
    let script = Script::default();
    let mut harness = harness(app(&script, true));
    harness.run();

    let _greeting = harness.get_by_label(&format!("Bot message: {}", GREETING));
    let _status = harness.get_by_label("Status: Ready");
    let _input = harness.get_by_label("Message input");
    let _send = harness.get_by_label("Send message");
}

#[test]
fn test_send_message_dispatches_query() {
    let script = Script::default();
    let mut harness = harness(app(&script, true));
    harness.run();

    type_message(&mut harness, "What is 2 + 2?");
    assert_eq!(harness.state().input(), "What is 2 + 2?");

    harness.get_by_label("Send message").click();
    harness.run();

    assert_eq!(script.queries(), vec!["What is 2 + 2?"]);
    assert!(harness.state().input().is_empty(), "input should be cleared");
    assert_eq!(
        harness.state().controller().state(),
        InteractionState::Processing
    );

    let _user = harness.get_by_label("User message: What is 2 + 2?");
    let _status = harness.get_by_label("Status: Processing...");
    let _loading = harness.get_by_label("Loading");
}

#[test]
fn test_reply_appears_and_status_returns() {
    let script = Script::default();
    let mut harness = harness(app(&script, true));
    harness.run();

    type_message(&mut harness, "hello");
    harness.get_by_label("Send message").click();
    harness.run();

    let events = harness.state().controller().event_sender();
    events.send(ControllerEvent::Dispatch(Ok("2 + 2 equals 4.".into())));
    harness.run();

    let _reply = harness.get_by_label("Bot message: 2 + 2 equals 4.");
    let _status = harness.get_by_label("Status: Speaking...");
    assert_eq!(script.spoken(), vec!["2 + 2 equals 4."]);

    events.send(voicebot::controller::PlaybackEvent::Ended(
        voicebot::controller::UtteranceId(1),
    ));
    harness.run();
    let _status = harness.get_by_label("Status: Ready");
}

#[test]
fn test_cannot_send_empty_message() {
    let script = Script::default();
    let mut harness = harness(app(&script, true));
    harness.run();

    harness.get_by_label("Send message").click();
    harness.run();

    assert!(script.queries().is_empty());
    assert_eq!(harness.state().controller().log().len(), 1);
}

#[test]
fn test_clear_conversation_keeps_greeting() {
    let script = Script::default();
    script.reply(Ok("first answer".into()));
    let mut harness = harness(app(&script, true));
    harness.run();

    type_message(&mut harness, "first question");
    harness.get_by_label("Send message").click();
    harness.run();
    // The scripted reply is drained on the following frame
    harness.run();
    assert_eq!(harness.state().controller().log().len(), 3);

    harness.get_by_label("Clear conversation").click();
    harness.run();

    let messages = harness.state().controller().log().get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender(), Sender::Bot);
    assert_eq!(messages[0].text(), GREETING);
    let _greeting = harness.get_by_label(&format!("Bot message: {}", GREETING));
}

#[test]
fn test_start_disabled_without_capture() {
    let script = Script::default();
    let mut harness = harness(app(&script, false));
    harness.run();

    let _notice = harness.get_by_label(
        "Bot message: Speech recognition is not available. Please use the text input.",
    );

    harness.get_by_label("Start listening").click();
    harness.run();
    assert_eq!(harness.state().controller().state(), InteractionState::Idle);
    let _status = harness.get_by_label("Status: Ready");
}

#[test]
fn test_voice_query_through_buttons() {
    let script = Script::default();
    let mut harness = harness(app(&script, true));
    harness.run();

    harness.get_by_label("Start listening").click();
    harness.run();
    assert_eq!(*script.capture_starts.lock(), 1);
    let _status = harness.get_by_label("Status: Listening...");

    let events = harness.state().controller().event_sender();
    events.send(CaptureEvent::Transcript("tell me a joke".into()));
    events.send(CaptureEvent::End);
    harness.run();

    assert_eq!(script.queries(), vec!["tell me a joke"]);
    let _user = harness.get_by_label("User message: tell me a joke");
    assert_eq!(
        harness.state().controller().state(),
        InteractionState::Processing
    );
}

#[test]
fn test_stop_listening_returns_to_ready() {
    let script = Script::default();
    let mut harness = harness(app(&script, true));
    harness.run();

    harness.get_by_label("Start listening").click();
    harness.run();
    harness.get_by_label("Stop listening").click();
    harness.run();
    assert_eq!(*script.capture_stops.lock(), 1);

    harness
        .state()
        .controller()
        .event_sender()
        .send(CaptureEvent::End);
    harness.run();

    let _status = harness.get_by_label("Status: Ready");
    assert!(harness.state().controller().presenter().surface().capture_start_enabled);
}
