//! Leaky bucket: capacity, refill, pause, and idle accounting.
//!
//! The bucket grants at most `capacity` slots per `interval`. Each grant
//! leaks back out exactly one interval after it was issued, freeing capacity
//! for queued acquisitions in strict arrival order. A pause defers every
//! pending and future grant uniformly; it is a property of the bucket, not of
//! any single request.
//!
//! Timing lives in a driver task spawned at construction through the
//! [`Spawn`] seam. All state transitions are serialized by a mutex; the
//! driver is woken whenever an enqueue, pause, timeout removal, or handle
//! drop changes the schedule.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{oneshot, Notify};
use tokio::time::{sleep, sleep_until, Instant};

use crate::core::error::BucketError;
use crate::runtime::{Spawn, TokioSpawner};

/// A pending acquisition. The ticket identifies the entry so a timed-out
/// caller can remove itself without disturbing queue order.
struct Waiter {
    ticket: u64,
    tx: oneshot::Sender<()>,
}

struct BucketState {
    /// Timestamps of grants that have not yet leaked out, oldest first.
    grants: VecDeque<Instant>,
    /// Pending acquisitions in arrival order.
    waiters: VecDeque<Waiter>,
    /// While set, no grant is handed out before this instant.
    paused_until: Option<Instant>,
    /// One-shot notifications armed for the next idle transition.
    idle_waiters: Vec<oneshot::Sender<()>>,
    next_ticket: u64,
    /// Set when the owning handle is dropped; stops the driver.
    shutdown: bool,
}

struct Shared {
    capacity: usize,
    interval: Duration,
    state: Mutex<BucketState>,
    wake: Notify,
}

impl Shared {
    /// Leak grants older than one interval and clear an expired pause.
    fn sync_clock(&self, state: &mut BucketState, now: Instant) {
        while state
            .grants
            .front()
            .is_some_and(|granted| *granted + self.interval <= now)
        {
            state.grants.pop_front();
        }
        if state.paused_until.is_some_and(|until| until <= now) {
            state.paused_until = None;
        }
    }

    fn is_pause_active(state: &BucketState, now: Instant) -> bool {
        state.paused_until.is_some_and(|until| until > now)
    }
}

/// A leaky bucket gating concurrency to at most `capacity` outstanding slots
/// per `interval`.
///
/// The bucket reports idle exactly when no slot is consumed and no
/// acquisition is queued. Dropping the handle shuts the driver task down;
/// `acquire` borrows the handle, so no acquisition outlives it.
/// [`BucketError::Closed`] guards the completion channel against a driver
/// that stopped early (for example, its runtime shut down).
pub struct LeakyBucket {
    shared: Arc<Shared>,
    timeout: Duration,
}

impl LeakyBucket {
    /// Create a bucket whose driver runs on the ambient tokio runtime.
    ///
    /// A `capacity` of zero is treated as one.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn new(capacity: usize, interval: Duration, timeout: Duration) -> Self {
        Self::with_spawner(capacity, interval, timeout, &TokioSpawner::current())
    }

    /// Create a bucket whose driver is launched through the given spawner.
    pub fn with_spawner<S: Spawn>(
        capacity: usize,
        interval: Duration,
        timeout: Duration,
        spawner: &S,
    ) -> Self {
        let shared = Arc::new(Shared {
            capacity: capacity.max(1),
            interval,
            state: Mutex::new(BucketState {
                grants: VecDeque::new(),
                waiters: VecDeque::new(),
                paused_until: None,
                idle_waiters: Vec::new(),
                next_ticket: 0,
                shutdown: false,
            }),
            wake: Notify::new(),
        });
        spawner.spawn(drive(Arc::clone(&shared)));
        Self { shared, timeout }
    }

    /// Acquire one slot, suspending until granted.
    ///
    /// Grants immediately when no acquisition is queued, a slot is free, and
    /// no pause is active; otherwise the caller is enqueued and served in
    /// strict arrival order. Fails with [`BucketError::AcquireTimeout`] if no
    /// slot is granted within the bucket's timeout, measured from this call;
    /// a timed-out request leaves the queue without consuming a slot.
    pub async fn acquire(&self) -> Result<(), BucketError> {
        let (ticket, mut rx) = {
            let mut state = self.shared.state.lock();
            let now = Instant::now();
            self.shared.sync_clock(&mut state, now);

            if state.waiters.is_empty()
                && state.grants.len() < self.shared.capacity
                && !Shared::is_pause_active(&state, now)
            {
                state.grants.push_back(now);
                drop(state);
                tracing::trace!("slot granted immediately");
                // arm the driver with this grant's decay deadline
                self.shared.wake.notify_one();
                return Ok(());
            }

            let ticket = state.next_ticket;
            state.next_ticket += 1;
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(Waiter { ticket, tx });
            tracing::trace!(ticket, queued = state.waiters.len(), "bucket busy; queued");
            (ticket, rx)
        };
        self.shared.wake.notify_one();

        // `rx` stays alive until the queue entry is removed under the lock,
        // so a driver grant for this ticket can never be lost: a ticket
        // absent from the queue means the send went through.
        tokio::select! {
            granted = &mut rx => match granted {
                Ok(()) => Ok(()),
                Err(_) => Err(BucketError::Closed),
            },
            () = sleep(self.timeout) => {
                let mut state = self.shared.state.lock();
                let position = state.waiters.iter().position(|w| w.ticket == ticket);
                if let Some(index) = position {
                    state.waiters.remove(index);
                    drop(state);
                    self.shared.wake.notify_one();
                    tracing::debug!(ticket, "acquisition timed out; removed from queue");
                    Err(BucketError::AcquireTimeout(self.timeout))
                } else {
                    drop(state);
                    // the grant landed as the timeout fired; the recorded
                    // slot is ours
                    match rx.try_recv() {
                        Ok(()) => Ok(()),
                        Err(_) => Err(BucketError::Closed),
                    }
                }
            }
        }
    }

    /// Defer the next grant(s) for all callers, queued or future.
    ///
    /// Extends any active pause: the pause deadline only ever moves forward.
    /// Pending acquisitions are delayed, never cancelled or failed.
    pub fn pause(&self, duration: Duration) {
        let until = Instant::now() + duration;
        {
            let mut state = self.shared.state.lock();
            state.paused_until = Some(state.paused_until.map_or(until, |p| p.max(until)));
        }
        tracing::debug!(?duration, "bucket paused");
        self.shared.wake.notify_one();
    }

    /// True iff no slot is consumed and no acquisition is queued.
    pub fn is_empty(&self) -> bool {
        let mut state = self.shared.state.lock();
        self.shared.sync_clock(&mut state, Instant::now());
        state.grants.is_empty() && state.waiters.is_empty()
    }

    /// Number of currently consumed slots.
    pub fn fill_level(&self) -> usize {
        let mut state = self.shared.state.lock();
        self.shared.sync_clock(&mut state, Instant::now());
        state.grants.len()
    }

    /// Number of queued acquisitions.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().waiters.len()
    }

    /// Resolves when the bucket is (or next becomes) idle.
    ///
    /// One-shot: each call arms a fresh notification, so the method must be
    /// re-invoked after a completion to observe the next idle transition.
    pub async fn await_empty(&self) {
        let rx = {
            let mut state = self.shared.state.lock();
            self.shared.sync_clock(&mut state, Instant::now());
            if state.grants.is_empty() && state.waiters.is_empty() {
                return;
            }
            let (tx, rx) = oneshot::channel();
            state.idle_waiters.push(tx);
            rx
        };
        self.shared.wake.notify_one();
        let _ = rx.await;
    }
}

impl Drop for LeakyBucket {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        state.shutdown = true;
        drop(state);
        self.shared.wake.notify_one();
    }
}

/// Coordination loop: leaks expired grants, serves waiters FIFO, clears
/// expired pauses, and fires idle notifications. Exits when the owning
/// handle is dropped.
async fn drive(shared: Arc<Shared>) {
    loop {
        let deadline = {
            let mut state = shared.state.lock();
            if state.shutdown {
                tracing::debug!("bucket driver shutting down");
                break;
            }
            let now = Instant::now();
            shared.sync_clock(&mut state, now);

            while state.grants.len() < shared.capacity && !Shared::is_pause_active(&state, now) {
                let Some(waiter) = state.waiters.pop_front() else {
                    break;
                };
                if waiter.tx.send(()).is_ok() {
                    state.grants.push_back(now);
                    tracing::trace!(ticket = waiter.ticket, "queued slot granted");
                }
                // receiver gone: the acquisition timed out, no slot consumed
            }

            if state.grants.is_empty() && state.waiters.is_empty() {
                if !state.idle_waiters.is_empty() {
                    tracing::debug!("bucket idle");
                }
                for tx in state.idle_waiters.drain(..) {
                    let _ = tx.send(());
                }
            }

            let mut next = state.grants.front().map(|granted| *granted + shared.interval);
            if !state.waiters.is_empty() {
                if let Some(paused) = state.paused_until {
                    next = Some(next.map_or(paused, |n| n.min(paused)));
                }
            }
            next
        };

        match deadline {
            Some(at) => {
                tokio::select! {
                    () = shared.wake.notified() => {}
                    () = sleep_until(at) => {}
                }
            }
            None => shared.wake.notified().await,
        }
    }
}
