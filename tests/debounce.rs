// tests/debounce.rs

use tokio::sync::mpsc;
use tokio::time::{advance, sleep, Duration};

use assetpipe::types::ResourceKind;
use assetpipe::watch::Debouncer;

const DELAY: Duration = Duration::from_millis(500);

fn debouncer() -> (Debouncer<ResourceKind>, mpsc::Receiver<ResourceKind>) {
    let (tx, rx) = mpsc::channel(16);
    (Debouncer::spawn(DELAY, tx, |kind| kind), rx)
}

/// Let the debounce task observe kicks and timers.
async fn settle_tasks() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn single_kick_fires_after_the_quiet_period() {
    let (debouncer, mut rx) = debouncer();

    debouncer.kick(ResourceKind::Style);
    settle_tasks().await;

    advance(Duration::from_millis(499)).await;
    settle_tasks().await;
    assert!(rx.try_recv().is_err());

    advance(Duration::from_millis(2)).await;
    settle_tasks().await;
    assert_eq!(rx.try_recv().ok(), Some(ResourceKind::Style));
}

#[tokio::test(start_paused = true)]
async fn kicks_within_the_window_collapse_into_one() {
    let (debouncer, mut rx) = debouncer();

    for _ in 0..5 {
        debouncer.kick(ResourceKind::Style);
        settle_tasks().await;
        advance(Duration::from_millis(100)).await;
    }
    settle_tasks().await;
    // Last kick was 100 ms ago: still inside the window.
    assert!(rx.try_recv().is_err());

    sleep(Duration::from_millis(450)).await;
    settle_tasks().await;
    assert_eq!(rx.try_recv().ok(), Some(ResourceKind::Style));

    sleep(Duration::from_secs(2)).await;
    settle_tasks().await;
    assert!(rx.try_recv().is_err(), "must fire exactly once");
}

#[tokio::test(start_paused = true)]
async fn keys_are_debounced_independently() {
    let (debouncer, mut rx) = debouncer();

    debouncer.kick(ResourceKind::Script);
    settle_tasks().await;
    advance(Duration::from_millis(300)).await;
    debouncer.kick(ResourceKind::Style);
    settle_tasks().await;

    advance(Duration::from_millis(250)).await;
    settle_tasks().await;
    assert_eq!(rx.try_recv().ok(), Some(ResourceKind::Script));
    assert!(rx.try_recv().is_err());

    advance(Duration::from_millis(300)).await;
    settle_tasks().await;
    assert_eq!(rx.try_recv().ok(), Some(ResourceKind::Style));
}

#[tokio::test(start_paused = true)]
async fn pending_timer_never_fires_after_teardown() {
    let (debouncer, mut rx) = debouncer();

    debouncer.kick(ResourceKind::Script);
    settle_tasks().await;
    debouncer.shutdown();

    sleep(Duration::from_secs(5)).await;
    settle_tasks().await;

    // Sender dropped with the aborted task and nothing was ever sent.
    assert_eq!(rx.recv().await, None);
}
