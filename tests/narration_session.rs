use readaloud::narration::{NarrationController, NarrationEvent, PlaybackStatus};
use readaloud::render::{Article, SynchronizedRenderer};
use readaloud::session::{InputLines, Session, SessionOptions, SessionOutcome, scripted_input};
use readaloud::speech::{
    EngineCall, EstimatedSpeechEngine, MockSpeechEngine, SpeechEvent, SpeechEventReceiver,
    speech_channel,
};
use std::time::Duration;

const STORY: &str = "<h2>Harbor reopens.</h2>\
    <p>The harbor reopened on Monday. Ferries resumed at noon!</p>\
    <p>Officials expect full service by Friday.</p>";

fn quiet() -> SessionOptions {
    SessionOptions {
        draw: false,
        replay_yield: Duration::ZERO,
        ..SessionOptions::default()
    }
}

fn fast_engine() -> (EstimatedSpeechEngine, SpeechEventReceiver) {
    let (tx, rx) = speech_channel();
    let engine = EstimatedSpeechEngine::new(tx, 180).with_interval(Duration::from_millis(1));
    (engine, rx)
}

fn no_input() -> InputLines {
    scripted_input(Vec::<String>::new())
}

fn sentence_changes(history: &[NarrationEvent]) -> Vec<Option<usize>> {
    history
        .iter()
        .filter_map(|event| match event {
            NarrationEvent::Sentence(index) => Some(*index),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn estimated_engine_narrates_whole_article() {
    let article = Article::new(STORY);
    assert_eq!(article.sentences().len(), 4);
    let (engine, rx) = fast_engine();

    let session = Session::new(
        engine,
        rx,
        article,
        Vec::new(),
        SynchronizedRenderer::default(),
        quiet(),
    );
    let (outcome, history) = tokio::time::timeout(Duration::from_secs(5), session.run(no_input()))
        .await
        .expect("narration should finish")
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Completed);
    assert_eq!(
        sentence_changes(&history),
        vec![Some(0), Some(1), Some(2), Some(3), None]
    );
    assert!(history.iter().any(|e| matches!(e, NarrationEvent::CharOffset(o) if *o > 0)));
    assert_eq!(
        history.iter().filter(|e| **e == NarrationEvent::Completed).count(),
        1
    );
}

#[tokio::test]
async fn empty_article_completes_immediately() {
    let (engine, rx) = fast_engine();
    let session = Session::new(
        engine,
        rx,
        Article::new("<div><img src=\"x.png\"></div>"),
        Vec::new(),
        SynchronizedRenderer::default(),
        quiet(),
    );
    let (outcome, history) = session.run(no_input()).await.unwrap();
    assert_eq!(outcome, SessionOutcome::Completed);
    assert_eq!(history, vec![NarrationEvent::Completed]);
}

#[tokio::test]
async fn failing_engine_ends_session_with_failure() {
    let (_tx, rx) = speech_channel();
    let session = Session::new(
        MockSpeechEngine::new().with_failure(),
        rx,
        Article::new(STORY),
        Vec::new(),
        SynchronizedRenderer::default(),
        quiet(),
    );
    let (outcome, history) = session.run(no_input()).await.unwrap();
    assert!(matches!(outcome, SessionOutcome::Failed(_)));
    assert!(history.iter().any(|e| matches!(e, NarrationEvent::Failed { .. })));
    assert_eq!(
        history.iter().rev().find_map(|e| match e {
            NarrationEvent::Status(s) => Some(*s),
            _ => None,
        }),
        Some(PlaybackStatus::Idle)
    );
}

#[tokio::test]
async fn pause_holds_estimated_engine_until_resume() {
    let (engine, mut rx) = fast_engine();
    let article = Article::new(STORY);
    let mut controller = NarrationController::new(engine, article.sentences().to_vec());

    controller.start();
    let first = rx.recv().await.unwrap();
    controller.handle_speech_event(first);
    controller.toggle_pause_resume();
    assert_eq!(controller.state().status, PlaybackStatus::Paused);

    // Drain what was in flight before the pause landed, then expect silence.
    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_millis(30), rx.recv()).await {
        controller.handle_speech_event(event);
    }
    assert_eq!(controller.state().status, PlaybackStatus::Paused);
    assert_eq!(controller.state().sentence_index, Some(0));

    controller.toggle_pause_resume();
    assert_eq!(controller.state().status, PlaybackStatus::Playing);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !controller.state().is_idle() {
        let event = tokio::time::timeout_at(deadline, rx.recv())
            .await
            .expect("narration should finish")
            .unwrap();
        controller.handle_speech_event(event);
    }
}

#[tokio::test]
async fn replay_supersedes_in_flight_utterance() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let article = Article::new(STORY);
    let mut controller = NarrationController::new(MockSpeechEngine::new(), article.sentences().to_vec())
        .with_replay_yield(Duration::from_millis(1))
        .with_event_sender(tx);

    controller.start();
    let first = controller.in_flight().unwrap();
    assert!(controller.handle_speech_event(SpeechEvent::completed(first)));
    let second = controller.in_flight().unwrap();
    assert_eq!(controller.state().sentence_index, Some(1));

    controller.replay().await;
    assert_eq!(controller.state().sentence_index, Some(0));
    assert_eq!(controller.state().char_offset, 0);

    // Callbacks for the utterance replay cancelled are ignored.
    assert!(!controller.handle_speech_event(SpeechEvent::word_boundary(second, 9)));
    assert!(!controller.handle_speech_event(SpeechEvent::completed(second)));
    assert_eq!(controller.state().sentence_index, Some(0));
    assert_eq!(controller.state().char_offset, 0);

    let calls = controller.engine().calls();
    let spoken: Vec<String> = controller
        .engine()
        .spoken()
        .iter()
        .map(|u| u.text.clone())
        .collect();
    assert_eq!(spoken, vec!["Harbor reopens.", "The harbor reopened on Monday.", "Harbor reopens."]);
    assert!(calls.contains(&EngineCall::Cancel));

    let events: Vec<_> = rx.try_iter().collect();
    assert!(events.contains(&NarrationEvent::Status(PlaybackStatus::Idle)));
    assert_eq!(events.last(), Some(&NarrationEvent::CharOffset(0)));
}

#[tokio::test]
async fn stay_keeps_session_open_after_completion() {
    let (engine, rx) = fast_engine();
    let session = Session::new(
        engine,
        rx,
        Article::new("<p>Only one sentence here.</p>"),
        Vec::new(),
        SynchronizedRenderer::default(),
        SessionOptions {
            stay: true,
            ..quiet()
        },
    );

    // Input closes right away; with stay the loop ends only once narration is idle.
    let (outcome, history) = tokio::time::timeout(Duration::from_secs(5), session.run(no_input()))
        .await
        .expect("session should end")
        .unwrap();
    assert_eq!(outcome, SessionOutcome::InputClosed);
    assert!(history.contains(&NarrationEvent::Completed));
}
