//! Bounded, order-preserving fan-out
//!
//! Runs one task per input with at most `limit` running at a time and
//! returns the results in input order, whatever order they completed in.

use log::error;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Run `work` over `items` with at most `limit` tasks in flight
///
/// `result[i]` belongs to `items[i]`. A slot is `None` only when its task
/// panicked. Dropping the returned future aborts all outstanding tasks.
pub async fn ordered_fan_out<I, R, F, Fut>(items: Vec<I>, limit: usize, work: F) -> Vec<Option<R>>
where
    I: Send + 'static,
    R: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let work = Arc::new(work);
    let len = items.len();

    let mut join_set = JoinSet::new();
    for (idx, item) in items.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let work = Arc::clone(&work);
        join_set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            (idx, work(item).await)
        });
    }

    let mut slots: Vec<Option<R>> = (0..len).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((idx, result)) => slots[idx] = Some(result),
            Err(e) => error!("Fan-out task failed: {}", e),
        }
    }
    slots
}
