//! A single memoized value.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, trace};

/// Lazily filled cache slot.
///
/// The first `get_or_fetch` runs the fetcher and stores its result; later
/// calls reuse it until the slot is cleared. The lock is held for the whole
/// fetch, so concurrent callers wait for the one in-flight fetch instead of
/// starting their own. A failed fetch leaves the slot empty.
pub struct CacheSlot<T> {
  name: &'static str,
  value: Mutex<Option<Arc<T>>>,
}

impl<T> CacheSlot<T> {
  pub fn new(name: &'static str) -> Self {
    Self {
      name,
      value: Mutex::new(None),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Return the cached value, fetching it first if the slot is empty.
  pub async fn get_or_fetch<E, F, Fut>(&self, fetcher: F) -> Result<Arc<T>, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
  {
    let mut guard = self.value.lock().await;

    if let Some(data) = guard.as_ref() {
      trace!(slot = self.name, "Cache HIT");
      return Ok(Arc::clone(data));
    }

    debug!(slot = self.name, "Cache MISS, fetching");
    let data = Arc::new(fetcher().await?);
    *guard = Some(Arc::clone(&data));

    Ok(data)
  }

  /// Lock the slot, waiting for any in-flight fetch to finish.
  pub async fn lock(&self) -> SlotGuard<'_, T> {
    SlotGuard {
      name: self.name,
      guard: self.value.lock().await,
    }
  }

  /// Drop the cached value, if any
  pub async fn clear(&self) {
    self.lock().await.clear();
  }

  pub async fn is_filled(&self) -> bool {
    self.lock().await.is_filled()
  }
}

/// Exclusive access to a slot's contents.
///
/// Holding guards for several slots at once lets a caller clear them together.
pub struct SlotGuard<'a, T> {
  name: &'static str,
  guard: MutexGuard<'a, Option<Arc<T>>>,
}

impl<T> SlotGuard<'_, T> {
  pub fn clear(&mut self) {
    if self.guard.take().is_some() {
      trace!(slot = self.name, "Cleared");
    }
  }

  pub fn is_filled(&self) -> bool {
    self.guard.is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::time::Duration;

  #[tokio::test]
  async fn test_fetches_once() {
    let slot = CacheSlot::new("numbers");
    let calls = &AtomicU32::new(0);

    let fetch = move || async move {
      calls.fetch_add(1, Ordering::SeqCst);
      Ok::<_, String>(vec![1, 2, 3])
    };

    let first = slot.get_or_fetch(fetch).await.unwrap();
    let second = slot.get_or_fetch(fetch).await.unwrap();

    assert_eq!(*second, vec![1, 2, 3]);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_clear_forces_refetch() {
    let slot = CacheSlot::new("counter");
    let calls = &AtomicU32::new(0);

    let fetch = move || async move { Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst)) };

    assert_eq!(*slot.get_or_fetch(fetch).await.unwrap(), 0);
    assert!(slot.is_filled().await);

    slot.clear().await;
    assert!(!slot.is_filled().await);

    assert_eq!(*slot.get_or_fetch(fetch).await.unwrap(), 1);
    assert_eq!(*slot.get_or_fetch(fetch).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn test_error_leaves_slot_empty() {
    let slot: CacheSlot<i32> = CacheSlot::new("flaky");

    let result = slot
      .get_or_fetch(|| async { Err::<i32, _>("Something went wrong".to_string()) })
      .await;
    assert_eq!(result.unwrap_err(), "Something went wrong");
    assert!(!slot.is_filled().await);

    let result = slot.get_or_fetch(|| async { Ok::<_, String>(7) }).await;
    assert_eq!(*result.unwrap(), 7);
  }

  #[tokio::test]
  async fn test_concurrent_callers_share_one_fetch() {
    let slot = Arc::new(CacheSlot::new("slow"));
    let calls = Arc::new(AtomicU32::new(0));

    let tasks: Vec<_> = (0..8)
      .map(|_| {
        let slot = Arc::clone(&slot);
        let calls = Arc::clone(&calls);
        tokio::spawn(async move {
          slot
            .get_or_fetch(|| async {
              calls.fetch_add(1, Ordering::SeqCst);
              tokio::time::sleep(Duration::from_millis(20)).await;
              Ok::<_, String>(42)
            })
            .await
            .map(|r| *r)
        })
      })
      .collect();

    for task in futures::future::join_all(tasks).await {
      assert_eq!(task.unwrap(), Ok(42));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_guard_clear() {
    let slot = CacheSlot::new("guarded");
    slot.get_or_fetch(|| async { Ok::<_, String>(1) }).await.unwrap();

    let mut guard = slot.lock().await;
    assert!(guard.is_filled());
    guard.clear();
    assert!(!guard.is_filled());
    drop(guard);

    assert!(!slot.is_filled().await);
    assert_eq!(slot.name(), "guarded");
  }
}
