//! # Weak multi-value map - non-owning registration storage.
//!
//! [`WeakMultiMap`] maps a key to a list of [`Weak`] handles. It never keeps
//! an item alive: once the last `Arc` to an item is dropped, its handle is
//! dead and gets purged on the next read of its key.
//!
//! ## Architecture
//! ```text
//! RwLock<HashMap<K, Vec<Weak<V>>>>
//!   add(k, &arc)        write lock ─► push Weak (skipped if already present)
//!   remove(k, &arc)     write lock ─► drop matching + dead handles, drop empty key
//!   get(k)              read lock  ─► upgrade live handles ─┐
//!   get_matching(pred)  read lock  ─► snapshot keys,        ├─► dead seen? write lock ─► purge
//!                                     upgrade live handles ─┘
//! ```
//!
//! ## Rules
//! - No background sweep: purging is opportunistic and read-triggered.
//! - Reads are copy-on-read: live items are collected under the read lock, so
//!   concurrent reads never block each other.
//! - A purge runs under the write lock and only removes handles whose strong
//!   count is zero, so it can never drop an item inserted concurrently.
//! - A key whose list becomes empty is removed; no empty buckets remain.
//! - Unknown keys yield an empty result, never an error.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use tokio::sync::RwLock;

use crate::logging::Logger;

/// Thread-safe map from a key to weakly-held items.
pub struct WeakMultiMap<K, V> {
    items: RwLock<HashMap<K, Vec<Weak<V>>>>,
    log: Logger,
}

impl<K, V> WeakMultiMap<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates an empty map.
    pub fn new(log: Logger) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            log,
        }
    }

    /// Adds a weak handle to `item` under `key`.
    ///
    /// Adding the same instance twice under one key is a no-op.
    pub async fn add(&self, key: K, item: &Arc<V>) {
        let mut items = self.items.write().await;
        let refs = items.entry(key).or_default();
        if !refs.iter().any(|w| points_to(w, item)) {
            refs.push(Arc::downgrade(item));
        }
    }

    /// Removes the handle pointing at `item` under `key`, if any.
    ///
    /// Dead handles of the same key are dropped along the way. If the key has
    /// no handles left, it is removed.
    pub async fn remove(&self, key: &K, item: &Arc<V>) {
        let mut items = self.items.write().await;
        let Some(refs) = items.get_mut(key) else {
            return;
        };
        refs.retain(|w| w.strong_count() > 0 && !points_to(w, item));
        if refs.is_empty() {
            items.remove(key);
        }
    }

    /// Returns the live items under `key`, in insertion order.
    pub async fn get(&self, key: &K) -> Vec<Arc<V>> {
        let (live, dead) = {
            let items = self.items.read().await;
            match items.get(key) {
                Some(refs) => upgrade_all(refs),
                None => return Vec::new(),
            }
        };
        if dead > 0 {
            self.purge(std::slice::from_ref(key)).await;
        }
        live
    }

    /// Returns the live items of every key for which `predicate` holds.
    ///
    /// Items of one key keep their insertion order; the order of keys is
    /// unspecified.
    pub async fn get_matching<P>(&self, predicate: P) -> Vec<Arc<V>>
    where
        P: Fn(&K) -> bool,
    {
        let mut live = Vec::new();
        let mut stale = Vec::new();
        {
            let items = self.items.read().await;
            let keys: Vec<&K> = items.keys().filter(|&k| predicate(k)).collect();
            for key in keys {
                if let Some(refs) = items.get(key) {
                    let (found, dead) = upgrade_all(refs);
                    live.extend(found);
                    if dead > 0 {
                        stale.push(key.clone());
                    }
                }
            }
        }
        if !stale.is_empty() {
            self.purge(&stale).await;
        }
        live
    }

    /// Number of keys currently present.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// True if no key is present.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// True if `key` currently holds at least one handle (live or not yet purged).
    pub async fn contains_key(&self, key: &K) -> bool {
        self.items.read().await.contains_key(key)
    }

    /// Holds the read lock until the guard is dropped.
    #[cfg(test)]
    pub(crate) async fn read_guard(
        &self,
    ) -> tokio::sync::RwLockReadGuard<'_, HashMap<K, Vec<Weak<V>>>> {
        self.items.read().await
    }

    /// Drops dead handles under `keys` and removes keys left empty.
    async fn purge(&self, keys: &[K]) {
        let mut items = self.items.write().await;
        for key in keys {
            let Some(refs) = items.get_mut(key) else {
                continue;
            };
            let before = refs.len();
            refs.retain(|w| w.strong_count() > 0);
            let purged = before - refs.len();
            if purged > 0 {
                self.log
                    .info(format_args!("purged {purged} dropped registrations from {key:?}"));
            }
            if refs.is_empty() {
                self.log
                    .trace(format_args!("{key:?} has no items left, removing it entirely"));
                items.remove(key);
            }
        }
    }
}

/// True if `weak` was created from `item`.
fn points_to<V>(weak: &Weak<V>, item: &Arc<V>) -> bool {
    std::ptr::eq(weak.as_ptr(), Arc::as_ptr(item))
}

/// Upgrades every handle; returns the live items and the number of dead handles.
fn upgrade_all<V>(refs: &[Weak<V>]) -> (Vec<Arc<V>>, usize) {
    let mut live = Vec::with_capacity(refs.len());
    let mut dead = 0;
    for w in refs {
        match w.upgrade() {
            Some(item) => live.push(item),
            None => dead += 1,
        }
    }
    (live, dead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::logging::sink::testing::MemorySink;

    fn map() -> WeakMultiMap<&'static str, String> {
        WeakMultiMap::new(Logger::null("store"))
    }

    fn same(a: &[Arc<String>], b: &[&Arc<String>]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, *y))
    }

    #[tokio::test]
    async fn test_get_returns_live_items_in_order() {
        let m = map();
        let a = Arc::new("a".to_string());
        let b = Arc::new("b".to_string());
        m.add("k", &a).await;
        m.add("k", &b).await;

        assert!(same(&m.get(&"k").await, &[&a, &b]));
    }

    #[tokio::test]
    async fn test_unknown_key_is_empty() {
        let m = map();
        assert!(m.get(&"missing").await.is_empty());
        assert!(m.get_matching(|_| true).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_same_instance_twice_keeps_one_handle() {
        let m = map();
        let a = Arc::new("a".to_string());
        m.add("k", &a).await;
        m.add("k", &a).await;

        assert_eq!(m.get(&"k").await.len(), 1);
    }

    #[tokio::test]
    async fn test_same_instance_under_two_keys() {
        let m = map();
        let a = Arc::new("a".to_string());
        m.add("k1", &a).await;
        m.add("k2", &a).await;

        assert_eq!(m.get(&"k1").await.len(), 1);
        assert_eq!(m.get(&"k2").await.len(), 1);
        assert_eq!(m.len().await, 2);
    }

    #[tokio::test]
    async fn test_map_does_not_keep_items_alive() {
        let m = map();
        let a = Arc::new("a".to_string());
        m.add("k", &a).await;
        let weak = Arc::downgrade(&a);
        drop(a);

        assert!(weak.upgrade().is_none());
        assert!(m.get(&"k").await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_drops_key_when_empty() {
        let m = map();
        let a = Arc::new("a".to_string());
        let b = Arc::new("b".to_string());
        m.add("k", &a).await;
        m.add("k", &b).await;

        m.remove(&"k", &a).await;
        assert!(same(&m.get(&"k").await, &[&b]));
        assert!(m.contains_key(&"k").await);

        m.remove(&"k", &b).await;
        assert!(m.get(&"k").await.is_empty());
        assert!(!m.contains_key(&"k").await);
        assert!(m.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_missing_is_noop() {
        let m = map();
        let a = Arc::new("a".to_string());
        let b = Arc::new("b".to_string());
        m.add("k", &a).await;

        m.remove(&"other", &a).await;
        m.remove(&"k", &b).await;

        assert!(same(&m.get(&"k").await, &[&a]));
    }

    #[tokio::test]
    async fn test_read_purges_dead_handles_and_empty_keys() {
        let sink = Arc::new(MemorySink::default());
        let m: WeakMultiMap<&'static str, String> =
            WeakMultiMap::new(Logger::new("store", sink.clone()));
        let a = Arc::new("a".to_string());
        let b = Arc::new("b".to_string());
        m.add("k", &a).await;
        m.add("gone", &b).await;
        drop(b);

        assert!(m.contains_key(&"gone").await);
        assert!(same(&m.get_matching(|_| true).await, &[&a]));
        assert!(!m.contains_key(&"gone").await);
        assert_eq!(m.len().await, 1);
        assert!(sink.contains(LogLevel::Info, "purged 1 dropped registrations"));
        assert!(sink.contains(LogLevel::Trace, "has no items left"));
    }

    #[tokio::test]
    async fn test_get_matching_filters_keys() {
        let m = map();
        let a = Arc::new("a".to_string());
        let b = Arc::new("b".to_string());
        let c = Arc::new("c".to_string());
        m.add("apple", &a).await;
        m.add("avocado", &b).await;
        m.add("banana", &c).await;

        let found = m.get_matching(|k| k.starts_with('a')).await;
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|x| Arc::ptr_eq(x, &a)));
        assert!(found.iter().any(|x| Arc::ptr_eq(x, &b)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_add_and_purge() {
        let m = Arc::new(map());
        let keep: Vec<Arc<String>> = (0..64).map(|i| Arc::new(format!("keep-{i}"))).collect();

        let mut joins = Vec::new();
        for item in keep.iter().cloned() {
            let m = Arc::clone(&m);
            joins.push(tokio::spawn(async move {
                let temp = Arc::new("temp".to_string());
                m.add("k", &temp).await;
                m.add("k", &item).await;
                drop(temp);
                m.get(&"k").await.len()
            }));
        }
        for j in joins {
            j.await.unwrap();
        }

        let live = m.get(&"k").await;
        assert_eq!(live.len(), keep.len());
        assert!(keep.iter().all(|k| live.iter().any(|x| Arc::ptr_eq(x, k))));
    }
}
