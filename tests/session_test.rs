//! Episode session integration tests
//!
//! Each test runs against its own temporary data directory with a manual clock.

use little_story::{
    Config, EpisodeSessionService, ManualClock, StateMap, StoryError, UserProfile,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const NOW: f64 = 1_700_000_000.0;
const PERIOD: f64 = 14_400.0;

fn state(value: Value) -> StateMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Story `s1` in folder `first-story` with one episode `e1`
fn write_fixture(data_dir: &Path) {
    let story = data_dir.join("stories").join("first-story");
    std::fs::create_dir_all(story.join("episodes")).unwrap();
    std::fs::write(
        story.join("manifest.json"),
        json!({
            "id": "s1",
            "title": "First Story",
            "cover": "cover.png",
            "seasons": [{"episodes": [{"id": "e1", "file": "ep1.json"}]}]
        })
        .to_string(),
    )
    .unwrap();
    std::fs::write(
        story.join("episodes").join("ep1.json"),
        json!({
            "initial_state": {"x": 1, "y": 2},
            "scenes": [{"id": "intro", "text": "Hello"}]
        })
        .to_string(),
    )
    .unwrap();
}

fn create_service(dir: &TempDir) -> (EpisodeSessionService, Arc<ManualClock>) {
    write_fixture(dir.path());
    let clock = Arc::new(ManualClock::new(NOW));
    let service = EpisodeSessionService::with_clock(&Config::with_data_dir(dir.path()), clock.clone());
    (service, clock)
}

#[tokio::test]
async fn test_start_episode_overlays_saved_progress() {
    let dir = TempDir::new().unwrap();
    let (service, _clock) = create_service(&dir);

    service.save_progress("s1", state(json!({"y": 9}))).await.unwrap();
    let episode = service.start_episode("s1", "e1").await.unwrap();

    assert_eq!(Value::Object(episode.initial_state), json!({"x": 1, "y": 9}));
    assert_eq!(episode.payload["scenes"][0]["id"], "intro");

    // The template on disk is untouched
    let raw = std::fs::read_to_string(
        dir.path().join("stories/first-story/episodes/ep1.json"),
    )
    .unwrap();
    let on_disk: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk["initial_state"], json!({"x": 1, "y": 2}));
}

#[tokio::test]
async fn test_start_episode_spends_one_heart() {
    let dir = TempDir::new().unwrap();
    let (service, _clock) = create_service(&dir);

    service.start_episode("s1", "e1").await.unwrap();
    let status = service.user_status().await.unwrap();

    assert_eq!(status.profile.hearts, 2);
    assert_eq!(status.profile.last_regen_time, NOW);
    assert_eq!(status.next_heart_in, PERIOD);
}

#[tokio::test]
async fn test_start_episode_without_hearts_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let (service, _clock) = create_service(&dir);

    let empty = UserProfile {
        hearts: 0,
        max_hearts: 3,
        last_regen_time: NOW - 60.0,
    };
    service.profiles().overwrite(&empty).await.unwrap();
    service.save_progress("s1", state(json!({"y": 9}))).await.unwrap();

    let err = service.start_episode("s1", "e1").await.unwrap_err();
    assert!(matches!(err, StoryError::NoHearts));

    assert_eq!(service.profiles().get_profile().await.unwrap(), empty);
    assert_eq!(
        Value::Object(service.story_progress("s1").await.unwrap()),
        json!({"y": 9})
    );
}

#[tokio::test]
async fn test_unknown_story_or_episode_still_costs_a_heart() {
    let dir = TempDir::new().unwrap();
    let (service, _clock) = create_service(&dir);

    let err = service.start_episode("ghost", "e1").await.unwrap_err();
    assert!(matches!(err, StoryError::NotFound(ref m) if m == "Story not found"));

    let err = service.start_episode("s1", "e404").await.unwrap_err();
    assert!(matches!(err, StoryError::NotFound(ref m) if m == "Episode not found"));

    assert_eq!(service.profiles().get_profile().await.unwrap().hearts, 1);
}

#[tokio::test]
async fn test_regeneration_after_nine_hours_caps_at_max() {
    let dir = TempDir::new().unwrap();
    let (service, _clock) = create_service(&dir);

    service
        .profiles()
        .overwrite(&UserProfile {
            hearts: 1,
            max_hearts: 3,
            last_regen_time: NOW - 9.0 * 3600.0,
        })
        .await
        .unwrap();

    let status = service.user_status().await.unwrap();
    assert_eq!(status.profile.hearts, 3);
    assert_eq!(status.next_heart_in, 0.0);
}

#[tokio::test]
async fn test_countdown_decreases_within_a_period() {
    let dir = TempDir::new().unwrap();
    let (service, clock) = create_service(&dir);

    service.start_episode("s1", "e1").await.unwrap();

    let mut previous = service.profiles().time_to_next_heart().await.unwrap();
    for _ in 0..5 {
        clock.advance(PERIOD / 6.0);
        let remaining = service.profiles().time_to_next_heart().await.unwrap();
        assert!(remaining < previous);
        assert_eq!(service.profiles().get_profile().await.unwrap().hearts, 2);
        previous = remaining;
    }

    clock.advance(PERIOD / 6.0);
    assert_eq!(service.profiles().get_profile().await.unwrap().hearts, 3);
}

#[tokio::test]
async fn test_partial_regeneration_survives_second_debit() {
    let dir = TempDir::new().unwrap();
    let (service, clock) = create_service(&dir);

    // 3 -> 2 starts the timer at NOW
    service.start_episode("s1", "e1").await.unwrap();
    clock.advance(3600.0);
    // 2 -> 1 keeps it
    service.start_episode("s1", "e1").await.unwrap();
    assert_eq!(service.profiles().get_profile().await.unwrap().last_regen_time, NOW);

    clock.advance(PERIOD - 3600.0);
    assert_eq!(service.profiles().get_profile().await.unwrap().hearts, 2);
}

#[tokio::test]
async fn test_full_reset_restores_hearts_and_clears_progress() {
    let dir = TempDir::new().unwrap();
    let (service, _clock) = create_service(&dir);

    service.start_episode("s1", "e1").await.unwrap();
    service.save_progress("s1", state(json!({"a": 1}))).await.unwrap();
    service.save_progress("s2", state(json!({"b": 2}))).await.unwrap();

    let profile = service.full_reset().await.unwrap();
    assert_eq!(profile, UserProfile::new(3));

    assert_eq!(service.profiles().get_profile().await.unwrap(), UserProfile::new(3));
    assert!(service.story_progress("s1").await.unwrap().is_empty());
    assert!(service.story_progress("s2").await.unwrap().is_empty());
}
