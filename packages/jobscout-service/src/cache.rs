use std::{
	collections::{BTreeMap, HashMap},
	future::Future,
	hash::Hash,
	sync::{
		Arc, Mutex,
		atomic::{AtomicU64, Ordering},
	},
};

use serde_json::Value;
use tokio::sync::OnceCell;

use crate::Result;

/// Job documents keyed by job id.
pub type DetailCache = MemoCache<i64, Value>;

/// Bounded least-recently-used memo table safe to share between tasks.
///
/// Each key owns a slot that is filled at most once, so concurrent callers asking for the same
/// key wait on a single fetch. A failed fetch caches nothing and the next caller retries.
pub struct MemoCache<K, V> {
	capacity: usize,
	inner: Mutex<Lru<K, V>>,
	hits: AtomicU64,
	misses: AtomicU64,
}
impl<K, V> MemoCache<K, V>
where
	K: Eq + Hash + Clone,
{
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity: capacity.max(1),
			inner: Mutex::new(Lru { slots: HashMap::new(), order: BTreeMap::new(), tick: 0 }),
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
		}
	}

	pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<Arc<V>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<V>>,
	{
		let cell = self.slot(&key);

		if let Some(value) = cell.get() {
			self.hits.fetch_add(1, Ordering::Relaxed);

			return Ok(value.clone());
		}

		let mut fetched = false;
		// A failed init leaves the cell empty, so the next caller retries in the same slot.
		let result = cell
			.get_or_try_init(|| {
				fetched = true;

				async move { fetch().await.map(Arc::new) }
			})
			.await
			.cloned();

		if fetched {
			self.misses.fetch_add(1, Ordering::Relaxed);
		} else {
			self.hits.fetch_add(1, Ordering::Relaxed);
		}

		result
	}

	pub fn hits(&self) -> u64 {
		self.hits.load(Ordering::Relaxed)
	}

	pub fn misses(&self) -> u64 {
		self.misses.load(Ordering::Relaxed)
	}

	#[cfg(test)]
	fn len(&self) -> usize {
		self.lock().slots.len()
	}

	fn slot(&self, key: &K) -> Arc<OnceCell<Arc<V>>> {
		let mut lru = self.lock();

		lru.tick += 1;

		let tick = lru.tick;

		if let Some(slot) = lru.slots.get_mut(key) {
			let previous = slot.stamp;

			slot.stamp = tick;

			let cell = slot.cell.clone();

			lru.order.remove(&previous);
			lru.order.insert(tick, key.clone());

			return cell;
		}

		while lru.slots.len() >= self.capacity {
			let Some((_, oldest)) = lru.order.pop_first() else {
				break;
			};

			lru.slots.remove(&oldest);
		}

		let cell = Arc::new(OnceCell::new());

		lru.slots.insert(key.clone(), Slot { cell: cell.clone(), stamp: tick });
		lru.order.insert(tick, key.clone());

		cell
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Lru<K, V>> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner())
	}
}

struct Lru<K, V> {
	slots: HashMap<K, Slot<V>>,
	/// Recency index: stamp to key, oldest first.
	order: BTreeMap<u64, K>,
	tick: u64,
}

struct Slot<V> {
	cell: Arc<OnceCell<Arc<V>>>,
	stamp: u64,
}
