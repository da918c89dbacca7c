use bodylabs_transport::{Call, Transport};
use tracing::{debug, info, trace};

use super::guard::with_timeout;
use super::resource::Resource;
use crate::data::{PollOptions, Record, Status};
use crate::error::{Error, Result};

/// Refresh `resource` until its status is terminal.
///
/// Refreshes and sleeps strictly alternate: refresh, then stop on `ready`
/// or fail on `failed`, otherwise sleep `options.interval` and go again.
/// `new`, `pending` and unrecognized statuses all keep polling. The whole
/// loop runs under `options.timeout`.
///
/// Only the first refresh is logged at the client's verbosity; the rest are
/// quiet.
///
/// # Errors
///
/// - [`Error::ProcessingFailed`] as soon as `failed` is observed
/// - [`Error::Timeout`] if no terminal status arrives in time
/// - any transport error from a refresh
pub async fn poll_until_ready<R, T>(
    resource: &mut Resource<'_, R, T>,
    options: &PollOptions,
) -> Result<()>
where
    R: Record,
    T: Transport,
{
    let label = format!("Polling {resource}");
    let verbose = resource.client.is_verbose();

    with_timeout(&options.timeout, &label, async {
        let mut call = Call::ok();
        let mut attempts = 0u32;
        loop {
            resource.refresh_with(call).await?;
            call = call.quiet();
            attempts += 1;

            match resource.status() {
                Some(Status::Failed) => {
                    return Err(Error::ProcessingFailed(resource.to_string()));
                }
                Some(status) if status.is_terminal() => {
                    if verbose {
                        info!("{resource} is ready");
                    } else {
                        debug!(attempts, "{resource} is ready");
                    }
                    return Ok(());
                }
                status => {
                    trace!(?status, attempts, "{resource} not ready");
                    tokio::time::sleep(options.interval).await;
                }
            }
        }
    })
    .await
}
