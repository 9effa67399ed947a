//! Cron scheduling of full roster refreshes.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::{model::app::AppState, service::refresh::RefreshService};

/// Initialize and start the cron job scheduler
///
/// # Arguments
/// - `state` - Application state cloned into every run of the refresh job
/// - `cron` - Cron expression (with seconds) the refresh runs on
///
/// # Returns
/// - `Ok(JobScheduler)` - The running scheduler, jobs stop when it is shut down or dropped
/// - `Err(JobSchedulerError)` - The cron expression is invalid or the scheduler failed to start
pub async fn start_scheduler(
    state: &AppState,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let sched = JobScheduler::new().await?;

    let state_clone = state.clone();

    sched
        .add(Job::new_async(cron, move |_, _| {
            let state = state_clone.clone();

            Box::pin(async move {
                match RefreshService::new(&state).refresh_all().await {
                    Ok(summary) => tracing::info!(
                        "Scheduled corp stats refresh finished with {} failure(s)",
                        summary.failed
                    ),
                    Err(e) => tracing::error!("Error refreshing corp stats: {:?}", e),
                }
            })
        })?)
        .await?;

    sched.start().await?;

    Ok(sched)
}
