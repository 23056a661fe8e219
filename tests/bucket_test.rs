//! Integration tests for the leaky bucket.
//!
//! These validate the admission primitive in isolation: strict FIFO grants,
//! uniform pauses, timeout accounting, and one-shot idle notifications.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use prometheus_rate_limiter::LeakyBucket;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_grants_are_fifo() {
    let bucket = Arc::new(LeakyBucket::new(
        1,
        Duration::from_millis(50),
        Duration::from_secs(10),
    ));
    bucket.acquire().await.unwrap();

    let order: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
    let mut waiters = Vec::new();
    for i in 0..3 {
        let bucket = Arc::clone(&bucket);
        let order = Arc::clone(&order);
        waiters.push(tokio::spawn(async move {
            bucket.acquire().await.unwrap();
            order.lock().unwrap().push(i);
        }));
        // fix arrival order before the next waiter enqueues
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    futures::future::join_all(waiters).await;

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_pause_defers_queued_waiters_uniformly() {
    let bucket = Arc::new(LeakyBucket::new(
        2,
        Duration::from_millis(30),
        Duration::from_secs(10),
    ));
    bucket.acquire().await.unwrap();
    bucket.acquire().await.unwrap();

    let start = Instant::now();
    let waiter = {
        let bucket = Arc::clone(&bucket);
        tokio::spawn(async move {
            bucket.acquire().await.unwrap();
            start.elapsed()
        })
    };
    tokio::task::yield_now().await;

    // slots would decay after 30ms, but the pause wins
    bucket.pause(Duration::from_millis(500));
    let waited = waiter.await.unwrap();
    assert!(waited >= Duration::from_millis(500), "granted after {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn test_pause_only_extends_forward() {
    let bucket = LeakyBucket::new(1, Duration::from_millis(10), Duration::from_secs(10));
    bucket.pause(Duration::from_millis(400));
    // a shorter pause must not truncate the active one
    bucket.pause(Duration::from_millis(50));

    let start = Instant::now();
    bucket.acquire().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_await_empty_is_one_shot() {
    let bucket = LeakyBucket::new(1, Duration::from_millis(40), Duration::from_secs(1));

    // a fresh bucket is already idle
    bucket.await_empty().await;
    assert!(bucket.is_empty());

    bucket.acquire().await.unwrap();
    let start = Instant::now();
    bucket.await_empty().await;
    assert!(start.elapsed() >= Duration::from_millis(40));

    // the notification re-arms on each call
    bucket.acquire().await.unwrap();
    let start = Instant::now();
    bucket.await_empty().await;
    assert!(start.elapsed() >= Duration::from_millis(40));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_contended_timeouts_keep_accounting_consistent() {
    let bucket = Arc::new(LeakyBucket::new(
        1,
        Duration::from_millis(500),
        Duration::from_millis(50),
    ));

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let bucket = Arc::clone(&bucket);
        tasks.push(tokio::spawn(async move {
            match bucket.acquire().await {
                Ok(()) => {
                    // an admitted caller must be visible in the accounting
                    assert!(bucket.fill_level() >= 1);
                    true
                }
                Err(_) => false,
            }
        }));
    }
    let admitted = futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter(|outcome| matches!(outcome, Ok(true)))
        .count();

    // every admission within the still-running interval is accounted for
    assert!(admitted >= 1);
    assert_eq!(bucket.fill_level(), admitted);
    assert_eq!(bucket.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_frees_queue_position() {
    let bucket = Arc::new(LeakyBucket::new(
        1,
        Duration::from_millis(200),
        Duration::from_millis(50),
    ));
    bucket.acquire().await.unwrap();

    // queued behind a full bucket, gives up after the 50ms timeout
    let timed_out = bucket.acquire().await;
    assert!(timed_out.is_err());
    assert_eq!(bucket.pending(), 0);
    assert_eq!(bucket.fill_level(), 1);

    // the timed-out request consumed nothing: after the slot decays, a new
    // acquisition is granted straight away
    tokio::time::sleep(Duration::from_millis(200)).await;
    let start = Instant::now();
    bucket.acquire().await.unwrap();
    assert_eq!(start.elapsed(), Duration::ZERO);
}
