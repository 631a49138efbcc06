//! Integration tests for the playback state machine
//!
//! Cut transitions only; ramp timing lives in `crossfade_test.rs`.

mod common;

use common::{harness, tracks, FailingHistory, RecordingHistory};
use std::sync::Arc;
use std::time::Duration;
use tonearm_core::TrackId;
use tonearm_playback::{
    DeckId, DeckState, NullOutput, PlaybackConfig, PlaybackError, PlaybackEvent,
    PlaybackManager, PlaybackState, QueueReplacePolicy, RepeatMode, TransitionKind,
};

fn config() -> PlaybackConfig {
    PlaybackConfig::default()
}

// ===== play_track =====

#[tokio::test]
async fn play_track_sets_index_and_plays() {
    let mut h = harness(config(), 3);

    h.manager.play_track(1, TransitionKind::Cut).unwrap();

    assert_eq!(h.manager.state(), PlaybackState::Playing);
    assert_eq!(h.manager.current_index(), Some(1));
    assert_eq!(h.manager.current_track().unwrap().id, TrackId::new("t1"));
    assert!(h.manager.is_playing());

    let active = h.manager.deck(h.manager.active_deck());
    assert_eq!(active.track_id, Some(TrackId::new("t1")));
    assert_eq!(active.state, DeckState::Playing);
}

#[tokio::test]
async fn out_of_range_is_rejected_without_mutation() {
    let mut h = harness(config(), 3);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    h.manager.drain_events();

    let err = h.manager.play_track(3, TransitionKind::Cut).unwrap_err();

    assert!(matches!(err, PlaybackError::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(h.manager.current_index(), Some(0));
    assert_eq!(h.manager.state(), PlaybackState::Playing);
    assert!(h.manager.drain_events().is_empty());
    assert_eq!(h.provider.opened().len(), 1);
}

#[tokio::test]
async fn hard_cut_leaves_exact_gains() {
    let mut h = harness(config(), 3);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    h.manager.play_track(2, TransitionKind::Cut).unwrap();

    let active = h.manager.active_deck();
    let new = h.manager.deck(active);
    let old = h.manager.deck(active.other());

    assert_eq!(new.gain, 1.0);
    assert_eq!(old.gain, 0.0);
    assert_eq!(old.state, DeckState::Loaded);
    assert_eq!(new.state, DeckState::Playing);
    assert!(!h.manager.is_crossfading());
}

#[tokio::test]
async fn decks_alternate_on_every_transition() {
    let mut h = harness(config(), 3);

    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    let first = h.manager.active_deck();
    h.manager.play_track(1, TransitionKind::Cut).unwrap();
    let second = h.manager.active_deck();
    h.manager.play_track(2, TransitionKind::Cut).unwrap();

    assert_eq!(second, first.other());
    assert_eq!(h.manager.active_deck(), first);
}

#[tokio::test]
async fn unavailable_track_keeps_prior_state() {
    let mut h = harness(config(), 3);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    let active = h.manager.active_deck();
    h.provider.make_unavailable("t1");
    h.manager.drain_events();

    let err = h.manager.play_track(1, TransitionKind::Cut).unwrap_err();

    assert!(matches!(err, PlaybackError::TrackUnavailable { .. }));
    assert_eq!(h.manager.state(), PlaybackState::Playing);
    assert_eq!(h.manager.current_index(), Some(0));
    assert_eq!(h.manager.active_deck(), active);
    assert_eq!(h.manager.deck(active).gain, 1.0);
    assert_eq!(h.manager.deck(active).state, DeckState::Playing);

    let events = h.manager.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::Error { .. })));
}

#[tokio::test]
async fn play_track_emits_events_in_order() {
    let mut h = harness(config(), 2);

    h.manager.play_track(0, TransitionKind::Cut).unwrap();

    let events = h.manager.drain_events();
    assert_eq!(
        events,
        vec![
            PlaybackEvent::StateChanged {
                state: PlaybackState::Loading
            },
            PlaybackEvent::TransitionStarted {
                from: None,
                to: DeckId::B,
                kind: TransitionKind::Cut,
            },
            PlaybackEvent::TrackChanged {
                index: 0,
                track_id: TrackId::new("t0"),
                previous_track_id: None,
            },
            PlaybackEvent::StateChanged {
                state: PlaybackState::Playing
            },
        ]
    );
}

// ===== toggle_play =====

#[tokio::test]
async fn toggle_on_idle_matches_play_track_zero() {
    let mut toggled = harness(config(), 3);
    let mut played = harness(config(), 3);

    toggled.manager.toggle_play().unwrap();
    played.manager.play_track(0, TransitionKind::Cut).unwrap();

    assert_eq!(toggled.manager.state(), played.manager.state());
    assert_eq!(toggled.manager.current_index(), played.manager.current_index());
    assert_eq!(toggled.manager.active_deck(), played.manager.active_deck());
    assert_eq!(
        toggled.manager.deck(DeckId::A),
        played.manager.deck(DeckId::A)
    );
    assert_eq!(
        toggled.manager.deck(DeckId::B),
        played.manager.deck(DeckId::B)
    );
    assert_eq!(toggled.manager.drain_events(), played.manager.drain_events());
}

#[tokio::test]
async fn toggle_on_idle_with_empty_queue_does_nothing() {
    let mut h = harness(config(), 0);

    h.manager.toggle_play().unwrap();

    assert_eq!(h.manager.state(), PlaybackState::Idle);
    assert_eq!(h.manager.current_index(), None);
    assert!(h.provider.opened().is_empty());
}

#[tokio::test]
async fn toggle_pauses_and_resumes_active_deck() {
    let mut h = harness(config(), 2);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    let active = h.manager.active_deck();

    h.manager.toggle_play().unwrap();
    assert_eq!(h.manager.state(), PlaybackState::Paused);
    assert_eq!(h.manager.deck(active).state, DeckState::Paused);

    h.manager.toggle_play().unwrap();
    assert_eq!(h.manager.state(), PlaybackState::Playing);
    assert_eq!(h.manager.deck(active).state, DeckState::Playing);
    assert_eq!(h.manager.deck(active).gain, 1.0);
    assert_eq!(h.manager.current_index(), Some(0));
}

// ===== next / previous =====

#[tokio::test]
async fn play_previous_at_head_is_noop() {
    let mut h = harness(config(), 3);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    h.manager.drain_events();

    h.manager.play_previous().unwrap();

    assert_eq!(h.manager.current_index(), Some(0));
    assert!(h.manager.drain_events().is_empty());
    assert_eq!(h.provider.opened().len(), 1);
}

#[tokio::test]
async fn play_previous_on_idle_is_noop() {
    let mut h = harness(config(), 3);
    h.manager.play_previous().unwrap();
    assert_eq!(h.manager.state(), PlaybackState::Idle);
}

#[tokio::test]
async fn play_previous_steps_back() {
    let mut h = harness(config(), 3);
    h.manager.play_track(2, TransitionKind::Cut).unwrap();

    h.manager.play_previous().unwrap();

    assert_eq!(h.manager.current_index(), Some(1));
}

#[tokio::test]
async fn play_next_stops_at_end_without_repeat() {
    let mut h = harness(config(), 2);
    h.manager.play_track(1, TransitionKind::Cut).unwrap();

    h.manager.play_next().unwrap();

    assert_eq!(h.manager.current_index(), Some(1));
    assert_eq!(h.manager.state(), PlaybackState::Playing);
}

#[tokio::test]
async fn play_next_wraps_with_repeat_all() {
    let mut h = harness(config(), 2);
    h.manager.set_repeat(RepeatMode::All);
    h.manager.play_track(1, TransitionKind::Cut).unwrap();

    h.manager.play_next().unwrap();

    assert_eq!(h.manager.current_index(), Some(0));
}

#[tokio::test]
async fn repeat_one_replays_current_track() {
    let mut h = harness(config(), 3);
    h.manager.set_repeat(RepeatMode::One);
    h.manager.play_track(1, TransitionKind::Cut).unwrap();

    h.manager.play_next().unwrap();

    assert_eq!(h.manager.current_index(), Some(1));
    assert_eq!(
        h.provider.opened(),
        vec![TrackId::new("t1"), TrackId::new("t1")]
    );
}

#[tokio::test]
async fn repeat_one_next_from_idle_does_nothing() {
    let mut h = harness(config(), 3);
    h.manager.set_repeat(RepeatMode::One);

    h.manager.play_next().unwrap();

    assert_eq!(h.manager.state(), PlaybackState::Idle);
    assert_eq!(h.manager.current_index(), None);
    assert!(h.provider.opened().is_empty());
    assert!(h.manager.drain_events().is_empty());
}

#[tokio::test]
async fn shuffle_picks_within_queue() {
    let mut h = harness(config(), 5);
    h.manager.set_shuffle(true);
    h.manager.seed_shuffle(42);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();

    for _ in 0..20 {
        h.manager.play_next().unwrap();
        assert!(h.manager.current_index().unwrap() < 5);
        assert!(h.manager.is_playing());
    }
}

// ===== Track end =====

#[tokio::test]
async fn poll_advances_when_active_track_finishes() {
    let mut h = harness(config(), 3);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    h.manager.drain_events();

    h.manager.poll().unwrap();
    assert_eq!(h.manager.current_index(), Some(0));

    h.provider.finish("t0");
    h.manager.poll().unwrap();

    assert_eq!(h.manager.current_index(), Some(1));
    assert_eq!(h.manager.state(), PlaybackState::Playing);
    let events = h.manager.drain_events();
    assert!(events.contains(&PlaybackEvent::TrackEnded {
        track_id: TrackId::new("t0")
    }));
}

#[tokio::test]
async fn track_end_from_inactive_deck_is_ignored() {
    let mut h = harness(config(), 3);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    let inactive = h.manager.active_deck().other();

    h.manager.handle_track_end(inactive).unwrap();

    assert_eq!(h.manager.current_index(), Some(0));
}

#[tokio::test]
async fn track_end_while_paused_is_ignored() {
    let mut h = harness(config(), 3);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    h.manager.toggle_play().unwrap();
    let active = h.manager.active_deck();

    h.manager.handle_track_end(active).unwrap();

    assert_eq!(h.manager.current_index(), Some(0));
    assert_eq!(h.manager.state(), PlaybackState::Paused);
}

#[tokio::test]
async fn exhausted_queue_pauses_and_keeps_index() {
    let mut h = harness(config(), 2);
    h.manager.play_track(1, TransitionKind::Cut).unwrap();
    let active = h.manager.active_deck();
    h.manager.drain_events();

    h.manager.handle_track_end(active).unwrap();

    assert_eq!(h.manager.state(), PlaybackState::Paused);
    assert_eq!(h.manager.current_index(), Some(1));
    assert_eq!(h.manager.deck(active).state, DeckState::Loaded);
    assert!(h
        .manager
        .drain_events()
        .contains(&PlaybackEvent::QueueExhausted));

    // Resuming restarts the last track
    h.manager.toggle_play().unwrap();
    assert_eq!(h.manager.state(), PlaybackState::Playing);
    assert_eq!(h.manager.deck(active).state, DeckState::Playing);
    assert_eq!(h.manager.deck(active).gain, 1.0);
}

#[tokio::test]
async fn unavailable_successor_pauses_at_track_end() {
    let mut h = harness(config(), 2);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    h.provider.make_unavailable("t1");
    h.provider.finish("t0");

    assert!(h.manager.poll().is_err());

    assert_eq!(h.manager.state(), PlaybackState::Paused);
    assert_eq!(h.manager.current_index(), Some(0));
    // No retry loop on the next poll
    assert!(h.manager.poll().is_ok());
}

// ===== Queue replacement =====

#[tokio::test]
async fn replacing_queue_keeps_current_track_by_identity() {
    let mut h = harness(config(), 3);
    h.manager.play_track(1, TransitionKind::Cut).unwrap();

    let mut reordered = tracks(3);
    reordered.reverse();
    h.manager.load_queue(reordered);

    assert_eq!(h.manager.state(), PlaybackState::Playing);
    assert_eq!(h.manager.current_index(), Some(1));
    assert_eq!(h.manager.current_track().unwrap().id, TrackId::new("t1"));

    let mut shifted = tracks(3);
    shifted.remove(0);
    h.manager.load_queue(shifted);
    assert_eq!(h.manager.current_index(), Some(0));
}

#[tokio::test]
async fn replacing_queue_without_current_track_stops() {
    let mut h = harness(config(), 3);
    h.manager.play_track(1, TransitionKind::Cut).unwrap();

    h.manager.load_queue(tracks(1));

    assert_eq!(h.manager.state(), PlaybackState::Idle);
    assert_eq!(h.manager.current_index(), None);
    assert_eq!(h.manager.deck(DeckId::A).state, DeckState::Empty);
    assert_ne!(h.manager.deck(DeckId::B).state, DeckState::Playing);
}

#[tokio::test]
async fn stop_policy_always_returns_to_idle() {
    let config = PlaybackConfig {
        queue_replace: QueueReplacePolicy::Stop,
        ..PlaybackConfig::default()
    };
    let mut h = harness(config, 3);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();

    h.manager.load_queue(tracks(3));

    assert_eq!(h.manager.state(), PlaybackState::Idle);
    assert_eq!(h.manager.current_index(), None);
    assert!(h
        .manager
        .drain_events()
        .contains(&PlaybackEvent::QueueChanged { length: 3 }));
}

// ===== Equalizer =====

#[tokio::test]
async fn eq_gains_survive_transitions_and_follow_active_deck() {
    let mut h = harness(config(), 3);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    h.manager.set_band_gain(4, 6.0).unwrap();
    h.output.0.lock().unwrap().bands.clear();

    h.manager.play_track(1, TransitionKind::Cut).unwrap();

    let active = h.manager.active_deck();
    assert_eq!(h.manager.eq_gains()[4], 6.0);
    let log = h.output.0.lock().unwrap();
    assert_eq!(log.routed.last(), Some(&active));
    assert!(log.bands.contains(&(active, 4, 6.0)));
    assert_eq!(log.bands.len(), 10);
}

#[tokio::test]
async fn invalid_band_changes_nothing() {
    let mut h = harness(config(), 1);

    let err = h.manager.set_band_gain(10, 3.0).unwrap_err();

    assert!(matches!(err, PlaybackError::InvalidBand { band: 10, bands: 10 }));
    assert!(h.manager.eq_gains().iter().all(|g| *g == 0.0));
    assert!(h.manager.drain_events().is_empty());
}

// ===== Volume =====

#[tokio::test]
async fn volume_drives_master_gain_not_deck_gain() {
    let mut h = harness(config(), 1);
    h.manager.play_track(0, TransitionKind::Cut).unwrap();

    h.manager.set_volume(50);
    h.manager.mute();

    let active = h.manager.active_deck();
    assert_eq!(h.manager.deck(active).gain, 1.0);
    assert_eq!(h.manager.volume(), 50);
    assert!(h.manager.is_muted());

    let master = h.output.0.lock().unwrap().master.clone();
    assert_eq!(master.last(), Some(&0.0));
    assert!((master[master.len() - 2] - 0.0316).abs() < 0.001);
}

// ===== History =====

#[tokio::test]
async fn history_records_each_started_track() {
    let mut h = harness(config(), 3);
    let history = Arc::new(RecordingHistory::default());
    h.manager.set_history(history.clone());

    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    h.manager.play_track(2, TransitionKind::Cut).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(
        *history.0.lock().unwrap(),
        vec![TrackId::new("t0"), TrackId::new("t2")]
    );
    let recent: Vec<&str> = h
        .manager
        .recently_played()
        .get_all()
        .iter()
        .map(|t| t.as_str())
        .collect();
    assert_eq!(recent, vec!["t0", "t2"]);
}

#[tokio::test]
async fn history_failure_never_affects_playback() {
    let mut h = harness(config(), 2);
    h.manager.set_history(Arc::new(FailingHistory));

    h.manager.play_track(0, TransitionKind::Cut).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(h.manager.state(), PlaybackState::Playing);
    assert_eq!(h.manager.current_index(), Some(0));
    assert!(!h
        .manager
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlaybackEvent::Error { .. })));

    h.manager.play_next().unwrap();
    assert_eq!(h.manager.current_index(), Some(1));
}

// ===== Construction =====

#[test]
fn manager_requires_a_runtime() {
    let result = PlaybackManager::new(
        PlaybackConfig::default(),
        common::MockProvider::new(),
        Box::new(NullOutput),
    );
    assert!(matches!(result, Err(PlaybackError::NoRuntime)));
}
