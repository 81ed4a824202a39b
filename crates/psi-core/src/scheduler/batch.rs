//! Windowed fan-out of async work on a `JoinSet`.
//!
//! Results are placed by input index, so callers get them in input order.

use std::future::Future;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};

pub const DEFAULT_CONCURRENCY: usize = 3;
pub const MAX_CONCURRENCY: usize = 10;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Window size; clamped to `1..=MAX_CONCURRENCY` when used.
    pub concurrency: usize,
    /// Pause between windows (not after the last one).
    pub batch_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

impl BatchOptions {
    pub fn new(concurrency: usize, batch_delay: Duration) -> Self {
        Self {
            concurrency,
            batch_delay,
        }
    }

    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }
}

/// Runs `work` over every item and returns the outputs in input order.
///
/// Per-item failures are expected to be carried inside `R`. An `Err` from
/// any item (or a panicked task) stops the run once its chunk has settled;
/// the first error in input order is returned.
pub async fn process_all<T, R, E, F, Fut>(
    items: Vec<T>,
    options: &BatchOptions,
    work: F,
) -> Result<Vec<R>, E>
where
    T: Send + 'static,
    R: Send + 'static,
    E: From<JoinError> + Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
{
    let window = options.effective_concurrency();
    let total = items.len();
    let mut results: Vec<Option<R>> = Vec::with_capacity(total);
    results.resize_with(total, || None);

    let mut pending = items.into_iter().enumerate().peekable();
    let mut chunk_no = 0usize;

    while pending.peek().is_some() {
        if chunk_no > 0 && !options.batch_delay.is_zero() {
            tokio::time::sleep(options.batch_delay).await;
        }

        let mut join_set = JoinSet::new();
        for (index, item) in pending.by_ref().take(window) {
            let fut = work(item);
            join_set.spawn(async move { (index, fut.await) });
        }
        tracing::debug!(chunk = chunk_no, size = join_set.len(), total, "batch window started");

        let mut failure: Option<(usize, E)> = None;
        while let Some(joined) = join_set.join_next().await {
            let (index, outcome) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    // Panicked task: its index is unknown, so it sorts last.
                    if failure.is_none() {
                        failure = Some((usize::MAX, E::from(e)));
                    }
                    continue;
                }
            };
            match outcome {
                Ok(r) => results[index] = Some(r),
                Err(e) => {
                    if failure.as_ref().map_or(true, |(i, _)| index < *i) {
                        failure = Some((index, e));
                    }
                }
            }
        }

        if let Some((_, e)) = failure {
            tracing::warn!(chunk = chunk_no, "batch aborted after window settled");
            return Err(e);
        }
        chunk_no += 1;
    }

    Ok(results.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    #[derive(Debug, PartialEq)]
    struct Abort(String);

    impl From<JoinError> for Abort {
        fn from(e: JoinError) -> Self {
            Abort(e.to_string())
        }
    }

    fn opts(concurrency: usize, delay_ms: u64) -> BatchOptions {
        BatchOptions::new(concurrency, Duration::from_millis(delay_ms))
    }

    #[tokio::test]
    async fn preserves_input_order() {
        let items: Vec<u64> = (0..7).collect();
        // Later items finish first inside each window.
        let out = process_all(items, &opts(3, 0), |i| async move {
            tokio::time::sleep(Duration::from_millis(30 - i * 4)).await;
            Ok::<_, Abort>(i * 10)
        })
        .await
        .unwrap();
        assert_eq!(out, vec![0, 10, 20, 30, 40, 50, 60]);
    }

    #[tokio::test]
    async fn windows_do_not_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let events = Arc::new(Mutex::new(Vec::new()));

        let items: Vec<usize> = (0..5).collect();
        let (f, p, ev) = (in_flight.clone(), peak.clone(), events.clone());
        process_all(items, &opts(2, 5), move |i| {
            let (f, p, ev) = (f.clone(), p.clone(), ev.clone());
            async move {
                let now = f.fetch_add(1, Ordering::SeqCst) + 1;
                p.fetch_max(now, Ordering::SeqCst);
                ev.lock().unwrap().push(("start", i));
                tokio::time::sleep(Duration::from_millis(10 + (i as u64 % 2) * 10)).await;
                ev.lock().unwrap().push(("end", i));
                f.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, Abort>(())
            }
        })
        .await
        .unwrap();

        assert_eq!(peak.load(Ordering::SeqCst), 2);
        let events = events.lock().unwrap();
        let pos = |kind: &str, i: usize| events.iter().position(|e| *e == (kind, i)).unwrap();
        // Chunk {0,1} fully ends before chunk {2,3} starts, and so on.
        assert!(pos("end", 0) < pos("start", 2) && pos("end", 1) < pos("start", 2));
        assert!(pos("end", 3) < pos("start", 4) && pos("end", 2) < pos("start", 4));
    }

    #[tokio::test]
    async fn pauses_between_windows_only() {
        let start = Instant::now();
        process_all((0..3).collect::<Vec<u32>>(), &opts(1, 40), |_| async { Ok::<_, Abort>(()) })
            .await
            .unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(80), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(120 + 200), "elapsed {:?}", elapsed);
    }

    #[tokio::test]
    async fn error_stops_after_window_settles() {
        let started = Arc::new(Mutex::new(Vec::new()));
        let s = started.clone();
        let err = process_all((0..6).collect::<Vec<usize>>(), &opts(2, 0), move |i| {
            let s = s.clone();
            async move {
                s.lock().unwrap().push(i);
                if i == 1 {
                    return Err(Abort(format!("item {}", i)));
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(i)
            }
        })
        .await
        .unwrap_err();
        assert_eq!(err, Abort("item 1".to_string()));
        let mut started = started.lock().unwrap().clone();
        started.sort();
        assert_eq!(started, vec![0, 1]);
    }

    #[tokio::test]
    async fn empty_input() {
        let out: Vec<u8> = process_all(Vec::<u8>::new(), &BatchOptions::default(), |i| async move {
            Ok::<_, Abort>(i)
        })
        .await
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn concurrency_is_clamped() {
        assert_eq!(opts(0, 0).effective_concurrency(), 1);
        assert_eq!(opts(50, 0).effective_concurrency(), MAX_CONCURRENCY);
        assert_eq!(BatchOptions::default().effective_concurrency(), 3);
    }
}
