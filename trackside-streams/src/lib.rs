use dashmap::DashMap;
use serde::Deserialize;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Why a stream left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Closed explicitly via [`StreamRegistry::close`].
    Closed,
    /// A new stream was opened under the same key.
    Replaced,
    /// Not touched within the idle limit.
    Idle,
    /// Removed by [`StreamRegistry::close_all`].
    Shutdown,
}

/// Hooks run when streams enter or leave a [`StreamRegistry`].
///
/// Hooks never run while a map entry is locked, so they may use the
/// registry themselves.
pub trait StreamLifecycle<K, V>: Send + Sync + 'static {
    fn on_open(&self, _key: &K, _stream: &V) {}
    fn on_close(&self, _key: &K, _stream: V, _reason: CloseReason) {}
}

/// Lifecycle that does nothing.
pub struct NoopLifecycle;

impl<K, V> StreamLifecycle<K, V> for NoopLifecycle {}

struct Entry<V> {
    stream: V,
    opened_at: Instant,
    last_seen: Instant,
}

/// Reaper settings, read from the `streams:` config section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub reap_interval_secs: u64,
    pub max_idle_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reap_interval_secs: 30,
            max_idle_secs: 300,
        }
    }
}

impl RegistryConfig {
    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs.max(1))
    }

    pub fn max_idle(&self) -> Duration {
        Duration::from_secs(self.max_idle_secs)
    }
}

/// A thread-safe registry of active streams backed by `DashMap`.
///
/// Cloning is cheap and every clone shares the same streams. The registry is
/// owned by whoever creates it and handed to the code that needs it; there is
/// no global instance.
pub struct StreamRegistry<K, V> {
    inner: Arc<DashMap<K, Entry<V>>>,
    lifecycle: Arc<dyn StreamLifecycle<K, V>>,
}

impl<K, V> Clone for StreamRegistry<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<K, V> Default for StreamRegistry<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> StreamRegistry<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_lifecycle(NoopLifecycle)
    }

    pub fn with_lifecycle(lifecycle: impl StreamLifecycle<K, V>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            lifecycle: Arc::new(lifecycle),
        }
    }

    /// Register `stream` under `key`. An existing stream under the same key
    /// is closed with [`CloseReason::Replaced`]; returns whether that happened.
    pub fn open(&self, key: K, stream: V) -> bool {
        self.lifecycle.on_open(&key, &stream);
        let now = Instant::now();
        let previous = self.inner.insert(
            key.clone(),
            Entry {
                stream,
                opened_at: now,
                last_seen: now,
            },
        );
        match previous {
            Some(old) => {
                self.lifecycle.on_close(&key, old.stream, CloseReason::Replaced);
                true
            }
            None => false,
        }
    }

    /// Get a clone of the stream registered under `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.get(key).map(|entry| entry.stream.clone())
    }

    /// Mark the stream as active now. Returns `false` if it isn't registered.
    pub fn touch(&self, key: &K) -> bool {
        match self.inner.get_mut(key) {
            Some(mut entry) => {
                entry.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    /// How long the stream under `key` has been open.
    pub fn age(&self, key: &K) -> Option<Duration> {
        self.inner.get(key).map(|entry| entry.opened_at.elapsed())
    }

    /// Remove the stream under `key`. Returns `false` if it wasn't registered.
    pub fn close(&self, key: &K) -> bool {
        match self.inner.remove(key) {
            Some((key, entry)) => {
                self.lifecycle.on_close(&key, entry.stream, CloseReason::Closed);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn keys(&self) -> Vec<K> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Close every stream not touched within `max_idle`. Returns how many
    /// were closed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let stale: Vec<K> = self
            .inner
            .iter()
            .filter(|entry| entry.last_seen.elapsed() >= max_idle)
            .map(|entry| entry.key().clone())
            .collect();
        let mut evicted = 0;
        for key in stale {
            // Touched since the scan? Then it stays.
            if let Some((key, entry)) = self
                .inner
                .remove_if(&key, |_, entry| entry.last_seen.elapsed() >= max_idle)
            {
                self.lifecycle.on_close(&key, entry.stream, CloseReason::Idle);
                evicted += 1;
            }
        }
        evicted
    }

    /// Close every stream. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let mut closed = 0;
        for key in self.keys() {
            if let Some((key, entry)) = self.inner.remove(&key) {
                self.lifecycle.on_close(&key, entry.stream, CloseReason::Shutdown);
                closed += 1;
            }
        }
        closed
    }

    /// Spawn a task that evicts idle streams every `reap_interval` until
    /// `cancel` fires.
    pub fn spawn_reaper(&self, config: &RegistryConfig, cancel: CancellationToken) -> JoinHandle<()> {
        let registry = self.clone();
        let interval = config.reap_interval();
        let max_idle = config.max_idle();
        tracing::info!(?interval, ?max_idle, "Starting stream reaper");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let evicted = registry.evict_idle(max_idle);
                        if evicted > 0 {
                            tracing::debug!(evicted, remaining = registry.len(), "Evicted idle streams");
                        }
                    }
                }
            }
            tracing::info!("Stream reaper stopped");
        })
    }
}
