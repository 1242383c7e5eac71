//! Fan-out resolver: run independent named reads concurrently and join them.
//!
//! Tasks are polled together inside the calling request task. The join
//! completes once every task has succeeded, or as soon as one fails; in the
//! latter case the other results are dropped and only that error is returned.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;

use futures::future::{try_join_all, BoxFuture, FutureExt};

use crate::error::{AppError, AppResult};

type Erased = Box<dyn Any + Send>;

/// Builder collecting named read operations
pub struct FanOut<'a, E = AppError> {
    tasks: Vec<BoxFuture<'a, Result<(&'static str, Erased), E>>>,
}

impl<'a, E: Send + 'a> FanOut<'a, E> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Register a read under `name`
    pub fn task<T, F>(mut self, name: &'static str, future: F) -> Self
    where
        T: Send + 'static,
        F: Future<Output = Result<T, E>> + Send + 'a,
    {
        self.tasks.push(
            future
                .map(move |result| result.map(|value| (name, Box::new(value) as Erased)))
                .boxed(),
        );
        self
    }

    /// Run every task concurrently; first error wins
    pub async fn run(self) -> Result<Resolved, E> {
        let results = try_join_all(self.tasks).await?;
        Ok(Resolved {
            values: results.into_iter().collect(),
        })
    }
}

impl<'a, E: Send + 'a> Default for FanOut<'a, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Joined results keyed by task name
pub struct Resolved {
    values: HashMap<&'static str, Erased>,
}

impl Resolved {
    /// Take the result registered under `name`.
    ///
    /// Asking for an unknown name or the wrong type is a wiring mistake in
    /// the caller and surfaces as an internal error.
    pub fn take<T: 'static>(&mut self, name: &str) -> AppResult<T> {
        let value = self
            .values
            .remove(name)
            .ok_or_else(|| AppError::Internal(format!("no resolved value named {}", name)))?;
        value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| AppError::Internal(format!("resolved value {} has unexpected type", name)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_task_identity() {
        let mut resolved = FanOut::<AppError>::new()
            .task("slow", async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(1_i64)
            })
            .task("fast", async { Ok("fast".to_string()) })
            .task("list", async { Ok(vec![1_u8, 2, 3]) })
            .run()
            .await
            .unwrap();

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved.take::<i64>("slow").unwrap(), 1);
        assert_eq!(resolved.take::<String>("fast").unwrap(), "fast");
        assert_eq!(resolved.take::<Vec<u8>>("list").unwrap(), vec![1, 2, 3]);
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn test_failing_task_error_is_returned() {
        let result = FanOut::new()
            .task("one", async { Ok::<_, AppError>(1) })
            .task("two", async { Err::<i32, _>(AppError::NotFound("task two".to_string())) })
            .task("three", async { Ok::<_, AppError>(3) })
            .run()
            .await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "task two"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_tasks_run_concurrently() {
        let started = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(tokio::sync::Barrier::new(2));

        let task = |started: Arc<AtomicUsize>, barrier: Arc<tokio::sync::Barrier>| async move {
            started.fetch_add(1, Ordering::SeqCst);
            // Deadlocks unless both tasks are polled at the same time
            barrier.wait().await;
            Ok::<_, AppError>(())
        };

        let resolved = tokio::time::timeout(
            Duration::from_secs(5),
            FanOut::new()
                .task("a", task(started.clone(), barrier.clone()))
                .task("b", task(started.clone(), barrier.clone()))
                .run(),
        )
        .await
        .expect("fan-out tasks were not polled concurrently")
        .unwrap();

        assert_eq!(started.load(Ordering::SeqCst), 2);
        assert_eq!(resolved.len(), 2);
    }

    #[tokio::test]
    async fn test_take_wrong_type_is_internal_error() {
        let mut resolved = FanOut::<AppError>::new()
            .task("n", async { Ok(5_u32) })
            .run()
            .await
            .unwrap();

        assert!(matches!(resolved.take::<String>("n"), Err(AppError::Internal(_))));
        assert!(matches!(resolved.take::<u32>("missing"), Err(AppError::Internal(_))));
    }
}
