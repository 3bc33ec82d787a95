//! Memoised entity listings.
//!
//! Each content service keeps the last sorted listing it fetched. Successful
//! mutations invalidate it so the next `list()` observes the change. There
//! is no background polling: changes made by other processes only show up
//! after an invalidation or an explicit refresh.

use std::future::Future;

use tokio::sync::RwLock;

#[derive(Debug)]
struct CacheState<T> {
    generation: u64,
    entries: Option<Vec<T>>,
}

/// Cached listing guarded by an invalidation counter.
///
/// A load that overlaps an invalidation is returned to its caller but not
/// cached, so a stale listing can never outlive the mutation that made it
/// stale.
#[derive(Debug)]
pub struct ListingCache<T> {
    state: RwLock<CacheState<T>>,
}

impl<T> Default for ListingCache<T> {
    fn default() -> Self {
        Self {
            state: RwLock::new(CacheState {
                generation: 0,
                entries: None,
            }),
        }
    }
}

impl<T: Clone> ListingCache<T> {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached listing, loading it with `load` when absent.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Vec<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let generation = {
            let state = self.state.read().await;
            if let Some(entries) = &state.entries {
                return Ok(entries.clone());
            }
            state.generation
        };

        let entries = load().await?;

        let mut state = self.state.write().await;
        if state.generation == generation {
            state.entries = Some(entries.clone());
        }
        Ok(entries)
    }

    /// Drop the cached listing.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.generation = state.generation.wrapping_add(1);
        state.entries = None;
    }

    /// Whether a listing is currently cached.
    pub async fn is_cached(&self) -> bool {
        self.state.read().await.entries.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn loads_once_until_invalidated() {
        let cache = ListingCache::<u32>::new();
        let counter = AtomicUsize::new(0);
        let loads = &counter;
        let load = move || async move {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(vec![1, 2, 3])
        };

        assert_eq!(cache.get_or_load(load).await, Ok(vec![1, 2, 3]));
        assert_eq!(cache.get_or_load(load).await, Ok(vec![1, 2, 3]));
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.invalidate().await;
        assert!(!cache.is_cached().await);
        assert_eq!(cache.get_or_load(load).await, Ok(vec![1, 2, 3]));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_loads_are_not_cached() {
        let cache = ListingCache::<u32>::new();
        let result = cache.get_or_load(|| async { Err::<Vec<u32>, _>("offline") }).await;
        assert_eq!(result, Err("offline"));
        assert!(!cache.is_cached().await);
    }

    #[tokio::test]
    async fn loads_overlapping_an_invalidation_are_discarded() {
        let cache = ListingCache::<u32>::new();
        let shared = &cache;
        let result = cache
            .get_or_load(move || async move {
                shared.invalidate().await;
                Ok::<_, ()>(vec![7])
            })
            .await;
        assert_eq!(result, Ok(vec![7]));
        assert!(!cache.is_cached().await);
    }
}
