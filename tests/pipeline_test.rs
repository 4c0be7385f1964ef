mod common;

use common::*;
use house_radar::notify::AudioPlayer;
use house_radar::scanner::Listing;
use house_radar::WatchComponents;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const MINUTE: Duration = Duration::from_secs(60);
const PULSE: Duration = Duration::from_millis(1500);

struct Fakes {
    source: Arc<ScriptedSource>,
    routing: Arc<TableRouting>,
    actuator: Arc<CountingActuator>,
    player: Arc<RecordingPlayer>,
}

impl Fakes {
    fn new(script: Vec<Poll>, distances: &[(&str, f64)], failing_actuator: bool) -> Self {
        Self {
            source: Arc::new(ScriptedSource::new(script)),
            routing: Arc::new(TableRouting::new(distances)),
            actuator: Arc::new(CountingActuator::new(failing_actuator)),
            player: Arc::new(RecordingPlayer::default()),
        }
    }

    fn components(&self) -> WatchComponents {
        let player: Arc<dyn AudioPlayer> = self.player.clone();
        WatchComponents {
            source: self.source.clone(),
            routing: self.routing.clone(),
            actuator: self.actuator.clone(),
            player,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_new_and_repriced_listings_each_alert_once() {
    let fakes = Fakes::new(
        vec![
            Poll::Found(Listing::new("10 Rue Berri, Montreal", false)),
            Poll::Found(Listing::new("10 Rue Berri, Montreal", false)),
            Poll::Fail,
            Poll::Found(Listing::new("10 Rue Berri, Montreal", true)),
        ],
        &[("A", 2.0), ("C", 0.9)],
        false,
    );
    let mut h = harness(settings(MINUTE, PULSE), fakes.components(), 12);
    h.watcher.start();

    tokio::time::sleep(Duration::from_secs(200)).await;

    assert_eq!(fakes.source.polls.load(Ordering::SeqCst), 4);
    assert_eq!(h.metrics.polls_failed.get(), 1);
    assert_eq!(h.metrics.listings_changed.get(), 2);
    assert_eq!(fakes.routing.requests.load(Ordering::SeqCst), 6);
    assert_eq!(h.metrics.routing_samples_failed.get(), 2);
    assert_eq!(fakes.actuator.calls.load(Ordering::SeqCst), 12);
    assert_eq!(
        fakes.player.played(),
        vec![
            PathBuf::from("assets/new_house.mp3"),
            PathBuf::from("assets/just_a_price.mp3"),
        ]
    );

    let status = h.health.get_status().await;
    assert_eq!(
        status.last_listing,
        Some(Listing::new("10 Rue Berri, Montreal", true))
    );
    assert!(h.watcher.is_running());
    h.watcher.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_far_listing_pulses_but_stays_silent() {
    let fakes = Fakes::new(
        vec![Poll::Found(Listing::new("1 Chemin Far, Laval", false))],
        &[("A", 3.0), ("B", 2.5), ("C", 1.51)],
        false,
    );
    let mut h = harness(settings(MINUTE, PULSE), fakes.components(), 12);
    h.watcher.start();

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(fakes.actuator.calls.load(Ordering::SeqCst), 6);
    assert_eq!(h.metrics.rounds_completed.get(), 1);
    assert_eq!(h.metrics.near_listings.get(), 0);
    assert!(fakes.player.played().is_empty());
    h.watcher.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_round_without_any_distance_does_not_alert() {
    let fakes = Fakes::new(
        vec![Poll::Found(Listing::new("Unroutable", false))],
        &[],
        false,
    );
    let mut h = harness(settings(MINUTE, PULSE), fakes.components(), 12);
    h.watcher.start();

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(h.metrics.rounds_without_distance.get(), 1);
    assert_eq!(h.metrics.routing_samples_failed.get(), 3);
    assert_eq!(fakes.actuator.calls.load(Ordering::SeqCst), 6);
    assert!(fakes.player.played().is_empty());
    assert!(h.watcher.is_running());
    h.watcher.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_closed_gate_never_polls() {
    let fakes = Fakes::new(
        vec![Poll::Found(Listing::new("Night listing", false))],
        &[("A", 0.1)],
        false,
    );
    let mut h = harness(settings(MINUTE, PULSE), fakes.components(), 3);
    h.watcher.start();

    tokio::time::sleep(Duration::from_secs(200)).await;

    assert_eq!(fakes.source.polls.load(Ordering::SeqCst), 0);
    assert_eq!(h.metrics.ticks_gated.get(), 4);
    assert_eq!(fakes.actuator.calls.load(Ordering::SeqCst), 0);
    h.watcher.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_failures_everywhere_keep_the_schedule_ticking() {
    let fakes = Fakes::new(
        vec![
            Poll::Fail,
            Poll::Found(Listing::new("5 Rue Cartier, Laval", false)),
        ],
        &[("B", 0.3)],
        true,
    );
    let mut h = harness(settings(MINUTE, PULSE), fakes.components(), 12);
    h.watcher.start();

    tokio::time::sleep(Duration::from_secs(150)).await;

    assert_eq!(h.metrics.ticks_admitted.get(), 3);
    assert_eq!(fakes.source.polls.load(Ordering::SeqCst), 3);
    assert_eq!(h.metrics.polls_failed.get(), 1);
    assert_eq!(h.metrics.pulses_failed.get(), 6);
    assert_eq!(h.metrics.pulses_sent.get(), 0);
    assert_eq!(fakes.player.played(), vec![PathBuf::from("assets/new_house.mp3")]);
    assert!(h.watcher.is_running());
    h.watcher.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_next_listing_restarts_pulse_sequence() {
    let fakes = Fakes::new(
        vec![
            Poll::Found(Listing::new("First", false)),
            Poll::Found(Listing::new("Second", false)),
        ],
        &[("A", 5.0)],
        false,
    );
    // second poll lands 5s in, after three pulses of the first sequence
    let mut h = harness(
        settings(Duration::from_secs(5), PULSE),
        fakes.components(),
        12,
    );
    h.watcher.start();

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(h.metrics.listings_changed.get(), 2);
    assert_eq!(fakes.actuator.calls.load(Ordering::SeqCst), 9);
    h.watcher.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_page_without_listing_emits_nothing() {
    let fakes = Fakes::new(vec![Poll::Empty, Poll::Empty], &[("A", 0.1)], false);
    let mut h = harness(settings(MINUTE, PULSE), fakes.components(), 12);
    h.watcher.start();

    tokio::time::sleep(Duration::from_secs(90)).await;

    assert_eq!(fakes.source.polls.load(Ordering::SeqCst), 2);
    assert_eq!(h.metrics.listings_changed.get(), 0);
    assert_eq!(fakes.routing.requests.load(Ordering::SeqCst), 0);
    assert_eq!(h.health.get_status().await.status, "healthy");
    h.watcher.shutdown();
}
