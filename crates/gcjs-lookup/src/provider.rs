//! Cached, watch-invalidated namespace lookup.
//!
//! Resolutions are memoized per cache key (roots, extensions, namespace
//! root). Concurrent callers for the same key share one in-flight scan. A
//! failed scan is not stored, so the next caller retries.
//!
//! With `watch` enabled, each key gets one recursive `notify` watcher over
//! its roots. Any create, modify or remove event evicts the key's entry.

use crate::error::LookupError;
use crate::scan::{absolute_roots, build_namespace_map};
use dashmap::DashMap;
use gcjs_rewriter::{LoaderConfig, NamespaceLookup, NamespaceMap};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Everything in a configuration that changes the resulting map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
    namespace_root: String,
}

impl CacheKey {
    fn new(config: &LoaderConfig) -> Self {
        CacheKey {
            roots: config.paths.clone(),
            extensions: config.extensions.clone(),
            namespace_root: config.namespace_root.clone(),
        }
    }
}

type MapSlot = Arc<OnceCell<Arc<NamespaceMap>>>;

/// Storage behind one or more [`DirectoryLookup`] handles.
#[derive(Default)]
pub struct LookupCache {
    maps: DashMap<CacheKey, MapSlot>,
    watchers: Mutex<FxHashMap<CacheKey, RecommendedWatcher>>,
}

impl LookupCache {
    fn slot(&self, key: &CacheKey) -> MapSlot {
        Arc::clone(self.maps.entry(key.clone()).or_default().value())
    }

    fn evict(&self, key: &CacheKey) -> bool {
        self.maps.remove(key).is_some()
    }
}

static SHARED_CACHE: Lazy<Arc<LookupCache>> = Lazy::new(|| Arc::new(LookupCache::default()));

/// [`NamespaceLookup`] that scans `config.paths` on disk.
#[derive(Clone)]
pub struct DirectoryLookup {
    cache: Arc<LookupCache>,
}

impl Default for DirectoryLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryLookup {
    /// A lookup with its own private cache.
    pub fn new() -> Self {
        DirectoryLookup {
            cache: Arc::new(LookupCache::default()),
        }
    }

    /// A lookup backed by the process-wide cache.
    pub fn shared() -> Self {
        DirectoryLookup {
            cache: Arc::clone(&SHARED_CACHE),
        }
    }

    /// Resolve the namespace map for `config`, scanning at most once per key
    /// until invalidated.
    pub async fn resolve(&self, config: &LoaderConfig) -> Result<Arc<NamespaceMap>, LookupError> {
        let key = CacheKey::new(config);
        let slot = self.cache.slot(&key);
        let map = slot
            .get_or_try_init(|| async {
                if config.watch {
                    self.ensure_watcher(&key)?;
                }
                let owned = config.clone();
                let map = tokio::task::spawn_blocking(move || build_namespace_map(&owned)).await??;
                Ok::<_, LookupError>(Arc::new(map))
            })
            .await?;
        Ok(Arc::clone(map))
    }

    /// True if a completed map is cached for `config`.
    pub fn is_cached(&self, config: &LoaderConfig) -> bool {
        self.cache
            .maps
            .get(&CacheKey::new(config))
            .is_some_and(|slot| slot.initialized())
    }

    /// Drop the cached map for `config`. The next request rescans.
    pub fn invalidate(&self, config: &LoaderConfig) -> bool {
        self.cache.evict(&CacheKey::new(config))
    }

    pub fn invalidate_all(&self) {
        self.cache.maps.clear();
    }

    /// Number of root sets currently being watched.
    pub fn watcher_count(&self) -> usize {
        self.watchers().len()
    }

    fn watchers(&self) -> std::sync::MutexGuard<'_, FxHashMap<CacheKey, RecommendedWatcher>> {
        self.cache
            .watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_watcher(&self, key: &CacheKey) -> Result<(), LookupError> {
        if self.watchers().contains_key(key) {
            return Ok(());
        }

        let cache: Weak<LookupCache> = Arc::downgrade(&self.cache);
        let evict_key = key.clone();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| match event {
            Ok(event) if is_content_change(&event.kind) => {
                if let Some(cache) = cache.upgrade()
                    && cache.evict(&evict_key)
                {
                    debug!(paths = ?event.paths, "namespace map invalidated");
                }
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "file watcher error"),
        })
        .map_err(LookupError::Watcher)?;

        for root in absolute_roots(&key.roots)? {
            watcher
                .watch(&root, RecursiveMode::Recursive)
                .map_err(|source| LookupError::Watch {
                    root: root.clone(),
                    source,
                })?;
            debug!(root = %root.display(), "watching namespace root");
        }

        // A racing caller may have registered first; keep theirs.
        self.watchers().entry(key.clone()).or_insert(watcher);
        Ok(())
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

impl NamespaceLookup for DirectoryLookup {
    type Error = LookupError;

    async fn namespace_map(&self, config: &LoaderConfig) -> Result<Arc<NamespaceMap>, LookupError> {
        self.resolve(config).await
    }
}

#[cfg(test)]
#[path = "../tests/provider_tests.rs"]
mod tests;
