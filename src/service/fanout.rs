//! Concurrent per-adapter fan-out with bounded deadlines.
//!
//! Every multi-exchange read goes through [`fan_out`]: one tokio task per
//! adapter, each wrapped in its own timeout, joined together. A slow or
//! failing venue costs the aggregate nothing but its own absence.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::debug;

use crate::domain::ExchangeId;
use crate::error::ExchangeError;
use crate::exchange::ExchangeAdapter;

/// Issue `call` against every adapter concurrently and collect what
/// succeeds within `timeout`.
///
/// A timed-out call is abandoned from the aggregate's perspective; the
/// spawned task still settles on its own. Failures are logged at debug
/// level, never propagated.
pub async fn fan_out<T, F, Fut>(
    adapters: &[(ExchangeId, Arc<dyn ExchangeAdapter>)],
    timeout: Duration,
    call: F,
) -> Vec<(ExchangeId, T)>
where
    T: Send + 'static,
    F: Fn(Arc<dyn ExchangeAdapter>) -> Fut,
    Fut: std::future::Future<Output = Result<T, ExchangeError>> + Send + 'static,
{
    let tasks: Vec<_> = adapters
        .iter()
        .map(|(name, adapter)| {
            let name = name.clone();
            let future = call(adapter.clone());
            let handle = tokio::spawn(tokio::time::timeout(timeout, future));
            (name, handle)
        })
        .collect();

    let names: Vec<ExchangeId> = tasks.iter().map(|(name, _)| name.clone()).collect();
    let joined = join_all(tasks.into_iter().map(|(_, handle)| handle)).await;

    let mut results = Vec::with_capacity(joined.len());
    for (name, outcome) in names.into_iter().zip(joined) {
        match outcome {
            Ok(Ok(Ok(value))) => results.push((name, value)),
            Ok(Ok(Err(error))) => {
                debug!(exchange = %name, error = %error, "Adapter call failed, excluding");
            }
            Ok(Err(_elapsed)) => {
                debug!(
                    exchange = %name,
                    timeout_ms = timeout.as_millis() as u64,
                    "Adapter call timed out, excluding"
                );
            }
            Err(join_error) => {
                debug!(exchange = %name, error = %join_error, "Adapter task failed, excluding");
            }
        }
    }
    results
}
