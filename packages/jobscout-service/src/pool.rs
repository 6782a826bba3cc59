use std::{collections::HashMap, future::Future, sync::Arc};

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{Error, Result};

/// Runs independent tasks with a fixed number in flight.
///
/// Submission waits for a free worker, so at most `workers` tasks exist at any time. Every
/// task's outcome is kept separately: an error or a panic in one task never cancels the others.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
	workers: usize,
}
impl WorkerPool {
	pub fn new(workers: usize) -> Self {
		Self { workers: workers.max(1) }
	}

	/// Applies `task` to every item and returns the outcomes in input order once all tasks are
	/// done.
	pub async fn run<I, T, F, Fut>(&self, items: Vec<I>, task: F) -> Vec<Result<T>>
	where
		F: Fn(I) -> Fut,
		Fut: Future<Output = Result<T>> + Send + 'static,
		T: Send + 'static,
	{
		let semaphore = Arc::new(Semaphore::new(self.workers));
		let mut set = JoinSet::new();
		let mut task_index = HashMap::new();
		let mut outcomes: Vec<Option<Result<T>>> = items.iter().map(|_| None).collect();

		for (index, item) in items.into_iter().enumerate() {
			let permit = match semaphore.clone().acquire_owned().await {
				Ok(permit) => permit,
				Err(err) => {
					outcomes[index] = Some(Err(Error::Task { message: err.to_string() }));

					continue;
				},
			};
			let fut = task(item);
			let handle = set.spawn(async move {
				let _permit = permit;

				fut.await
			});

			task_index.insert(handle.id(), index);
		}

		while let Some(joined) = set.join_next_with_id().await {
			let (id, outcome) = match joined {
				Ok((id, outcome)) => (id, outcome),
				Err(err) => {
					tracing::error!(error = %err, "Worker task did not complete.");

					(err.id(), Err(Error::Task { message: err.to_string() }))
				},
			};

			if let Some(index) = task_index.get(&id) {
				outcomes[*index] = Some(outcome);
			}
		}

		outcomes
			.into_iter()
			.map(|outcome| {
				outcome.unwrap_or_else(|| {
					Err(Error::Task { message: "Task produced no outcome.".to_string() })
				})
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use std::{
		sync::atomic::{AtomicUsize, Ordering},
		time::Duration,
	};

	use super::*;

	#[tokio::test]
	async fn outcomes_follow_input_order() {
		let pool = WorkerPool::new(3);
		let outcomes = pool
			.run((0..8_u64).collect(), |n| async move {
				tokio::time::sleep(Duration::from_millis(8 - n)).await;

				Ok(n * 10)
			})
			.await;
		let values: Vec<u64> = outcomes.into_iter().map(|o| o.expect("task failed")).collect();

		assert_eq!(values, vec![0, 10, 20, 30, 40, 50, 60, 70]);
	}

	#[tokio::test]
	async fn never_exceeds_worker_count() {
		let pool = WorkerPool::new(2);
		let active = Arc::new(AtomicUsize::new(0));
		let peak = Arc::new(AtomicUsize::new(0));
		let outcomes = pool
			.run((0..10).collect::<Vec<u32>>(), |_| {
				let active = active.clone();
				let peak = peak.clone();

				async move {
					let now = active.fetch_add(1, Ordering::SeqCst) + 1;

					peak.fetch_max(now, Ordering::SeqCst);
					tokio::time::sleep(Duration::from_millis(5)).await;
					active.fetch_sub(1, Ordering::SeqCst);

					Ok(())
				}
			})
			.await;

		assert_eq!(outcomes.len(), 10);
		assert!(peak.load(Ordering::SeqCst) <= 2);
	}

	#[tokio::test]
	async fn failures_and_panics_stay_isolated() {
		let pool = WorkerPool::new(4);
		let outcomes = pool
			.run(vec![1, 2, 3, 4], |n| async move {
				match n {
					2 => Err(Error::Provider { message: "quota".to_string() }),
					3 => panic!("worker blew up"),
					_ => Ok(n),
				}
			})
			.await;

		assert!(matches!(outcomes[0], Ok(1)));
		assert!(matches!(outcomes[1], Err(Error::Provider { .. })));
		assert!(matches!(outcomes[2], Err(Error::Task { .. })));
		assert!(matches!(outcomes[3], Ok(4)));
	}
}
