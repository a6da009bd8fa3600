use std::future::Future;
use std::time::Duration;

use crate::error::ServiceError;

/// Bound an external call; an elapsed deadline becomes `ServiceError::Timeout`
pub async fn with_timeout<T, F>(service: &'static str, limit: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout {
            service,
            seconds: limit.as_secs(),
        }),
    }
}
