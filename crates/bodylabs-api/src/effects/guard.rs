use std::future::Future;

use crate::core::TimeoutError;
use crate::data::TimeLimit;

/// Run `operation` under `limit`.
///
/// Guards nest and may run concurrently. When the limit elapses the
/// operation is dropped at its current await point and a [`TimeoutError`]
/// naming `label` is returned. An unlimited limit awaits the operation
/// directly.
pub async fn with_timeout<F, T, E>(limit: &TimeLimit, label: &str, operation: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimeoutError>,
{
    if limit.is_unlimited() {
        return operation.await;
    }
    match tokio::time::timeout(limit.total(), operation).await {
        Ok(result) => result,
        Err(_) => Err(TimeoutError::new(limit).during(label).into()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::Error;

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let result: Result<(), Error> = with_timeout(&TimeLimit::seconds(1), "sleeping", async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        })
        .await;

        match result {
            Err(Error::Timeout(err)) => {
                assert_eq!(err.limit, Duration::from_secs(1));
                assert_eq!(err.operation.as_deref(), Some("sleeping"));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_value_on_clean_exit() {
        let result: Result<&str, Error> =
            with_timeout(&TimeLimit::hours(1), "quick", async { Ok("a_random_return_value") }).await;
        assert_eq!(result.unwrap(), "a_random_return_value");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlimited_never_fires() {
        let result: Result<u8, Error> = with_timeout(&TimeLimit::unlimited(), "long", async {
            tokio::time::sleep(Duration::from_secs(86_400)).await;
            Ok(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_guards_keep_their_own_deadlines() {
        let result: Result<(), Error> = with_timeout(&TimeLimit::seconds(10), "outer", async {
            with_timeout(&TimeLimit::seconds(1), "inner", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await
        })
        .await;

        match result {
            Err(Error::Timeout(err)) => assert_eq!(err.operation.as_deref(), Some("inner")),
            other => panic!("expected inner timeout, got {other:?}"),
        }
    }
}
