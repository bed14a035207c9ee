//! Per-view synchronization context
//!
//! One `SyncClient` is spawned per active view and torn down with it. The
//! background task is the only place a fetch runs, so polls are single
//! flight by construction: an interval tick or refresh request arriving
//! while a fetch is outstanding waits for it instead of stacking requests.
//!
//! A refresh bumps the generation counter before queueing a poll. A fetch
//! that completes under an older generation is discarded, so a late result
//! can never overwrite state a newer user action already superseded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use shared::error::AppResult;
use shared::models::Snapshot;
use shared::store::OrderStore;
use shared::util;

use crate::cache::SnapshotCache;

/// Latest snapshot as seen by one view.
#[derive(Debug, Clone)]
pub struct SnapshotState {
    pub snapshot: Snapshot,
    /// The snapshot could not be refreshed; what is shown is last known
    /// good. The next poll cycle retries.
    pub stale: bool,
    /// Generation of the poll that produced this state.
    pub generation: u64,
}

/// Builder for a view's polling loop.
pub struct SyncClient {
    store: Arc<dyn OrderStore>,
    poll_interval: Duration,
    cache: Option<SnapshotCache>,
}

impl SyncClient {
    pub fn new(store: Arc<dyn OrderStore>, poll_interval: Duration) -> Self {
        Self {
            store,
            poll_interval,
            cache: None,
        }
    }

    /// Persist every good snapshot and seed the initial state from disk.
    pub fn with_cache(mut self, cache: SnapshotCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Spawn the polling task. The first poll runs immediately.
    pub fn spawn(self) -> SyncHandle {
        let cached = self.cache.as_ref().and_then(SnapshotCache::load);
        let initial = SnapshotState {
            snapshot: cached.unwrap_or_else(Snapshot::empty),
            stale: true,
            generation: 0,
        };

        let (state_tx, state_rx) = watch::channel(initial);
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        // the cache seed is generation 0, the first poll publishes 1
        let generation = Arc::new(AtomicU64::new(1));
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_loop(
            self.store,
            self.poll_interval,
            self.cache,
            state_tx,
            refresh_rx,
            generation.clone(),
            cancel.clone(),
        ));

        SyncHandle {
            state_rx,
            refresh_tx,
            generation,
            cancel,
            task,
        }
    }
}

/// Handle held by the view. Dropping it cancels the polling task;
/// `shutdown` additionally waits for the task to finish.
pub struct SyncHandle {
    state_rx: watch::Receiver<SnapshotState>,
    refresh_tx: mpsc::Sender<()>,
    generation: Arc<AtomicU64>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Current state without waiting.
    pub fn current(&self) -> SnapshotState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to state updates.
    pub fn watch(&self) -> watch::Receiver<SnapshotState> {
        self.state_rx.clone()
    }

    /// Request an immediate poll, superseding any fetch already in flight.
    ///
    /// Returns the generation the requested poll will carry; a full queue
    /// means a poll is already pending and the request is folded into it.
    pub fn refresh(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if self.refresh_tx.try_send(()).is_err() {
            tracing::trace!(generation, "refresh folded into pending poll");
        }
        generation
    }

    /// Wait until a poll at or past `generation` has published.
    pub async fn synced(&self, generation: u64) -> SnapshotState {
        let mut rx = self.state_rx.clone();
        // watch sender lives in the task this handle owns
        let state = rx
            .wait_for(|state| state.generation >= generation)
            .await
            .map(|state| state.clone());
        match state {
            Ok(state) => state,
            Err(_) => self.current(),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the polling task and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        let _ = (&mut self.task).await;
    }
}

/// The task's lifetime matches the handle's: an abandoned view stops
/// polling even when `shutdown` was never awaited.
impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_loop(
    store: Arc<dyn OrderStore>,
    poll_interval: Duration,
    cache: Option<SnapshotCache>,
    state_tx: watch::Sender<SnapshotState>,
    mut refresh_rx: mpsc::Receiver<()>,
    generation: Arc<AtomicU64>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("sync loop stopped");
                break;
            }
            _ = ticker.tick() => {}
            Some(()) = refresh_rx.recv() => {
                // an explicit refresh restarts the interval
                ticker.reset();
            }
        }

        let poll_generation = generation.load(Ordering::Acquire);
        match fetch_snapshot(store.as_ref()).await {
            Ok(snapshot) => {
                if generation.load(Ordering::Acquire) != poll_generation {
                    // superseded mid-flight, the queued refresh repolls
                    tracing::trace!(poll_generation, "dropping superseded poll result");
                    continue;
                }
                if let Some(cache) = &cache {
                    if let Err(err) = cache.save(&snapshot) {
                        tracing::warn!(%err, "snapshot cache write failed");
                    }
                }
                state_tx.send_replace(SnapshotState {
                    snapshot,
                    stale: false,
                    generation: poll_generation,
                });
            }
            Err(err) => {
                // keep showing last known good, flagged stale
                tracing::error!(%err, "snapshot poll failed");
                state_tx.send_modify(|state| {
                    state.stale = true;
                    state.generation = poll_generation;
                });
            }
        }
    }
}

async fn fetch_snapshot(store: &dyn OrderStore) -> AppResult<Snapshot> {
    let orders = store.list_orders().await?;
    let menu = store.list_menu().await?;
    let settings = store.get_settings().await?;
    Ok(Snapshot {
        orders,
        menu,
        settings,
        fetched_at: util::now_millis(),
    })
}
