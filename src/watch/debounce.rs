// src/watch/debounce.rs

//! Debounced event source.
//!
//! `kick(key)` arms a timer for `key`, or rearms it if one is already
//! pending. When a key stays quiet for the whole delay, `map(key)` is sent
//! exactly once to the output channel. Keys are independent of each other.
//!
//! All timers live in one task. Dropping the [`Debouncer`] aborts that task,
//! and the task also checks its kick channel before any expired timer, so a
//! pending timer never fires after teardown.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Handle to a running debounce task.
pub struct Debouncer<K> {
    kick_tx: mpsc::UnboundedSender<K>,
    task: JoinHandle<()>,
}

impl<K> std::fmt::Debug for Debouncer<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("finished", &self.task.is_finished())
            .finish_non_exhaustive()
    }
}

impl<K> Debouncer<K>
where
    K: Copy + Eq + Hash + Debug + Send + 'static,
{
    /// Spawn the debounce task. Must be called inside a Tokio runtime.
    pub fn spawn<T, M>(delay: Duration, out: mpsc::Sender<T>, map: M) -> Self
    where
        T: Send + 'static,
        M: Fn(K) -> T + Send + 'static,
    {
        let (kick_tx, kick_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(debounce_loop(delay, kick_rx, out, map));
        Self { kick_tx, task }
    }

    /// Start or restart the quiet period for `key`.
    pub fn kick(&self, key: K) {
        if self.kick_tx.send(key).is_err() {
            debug!(?key, "debouncer already stopped; ignoring kick");
        }
    }

    /// Stop the task, discarding pending timers.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn debounce_loop<K, T, M>(
    delay: Duration,
    mut kicks: mpsc::UnboundedReceiver<K>,
    out: mpsc::Sender<T>,
    map: M,
) where
    K: Copy + Eq + Hash + Debug,
    M: Fn(K) -> T,
{
    let mut deadlines: HashMap<K, Instant> = HashMap::new();

    loop {
        let next_due = deadlines
            .iter()
            .min_by_key(|(_, at)| **at)
            .map(|(key, at)| (*key, *at));

        tokio::select! {
            biased;

            kick = kicks.recv() => match kick {
                Some(key) => {
                    let rearmed = deadlines.insert(key, Instant::now() + delay).is_some();
                    debug!(?key, rearmed, "debounce timer armed");
                }
                None => {
                    debug!(pending = deadlines.len(), "debouncer closed; discarding pending timers");
                    return;
                }
            },

            _ = wait_until(next_due.map(|(_, at)| at)) => {
                if let Some((key, _)) = next_due {
                    deadlines.remove(&key);
                    debug!(?key, "quiet period elapsed; firing");
                    if out.send(map(key)).await.is_err() {
                        debug!("debounce receiver gone; stopping");
                        return;
                    }
                }
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}
