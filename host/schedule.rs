use crate::*;
use chrono::TimeZone;
use std::future::Future;
use tokio::time::sleep;
pub use tokio_schedule::Job as RepeatableJob;
pub use tokio_schedule::every;

/// Simplified interface to run [`RepeatableJob`]s that respects [`struct@SHUTDOWN`]
pub trait Schedulable: RepeatableJob {
    /// This method returns Future that cyclic performs the job
    fn spawn<'a, F, Fut>(self, func: F)
    where
        Self: Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'a,
        <Self::TZ as TimeZone>::Offset: Send + 'a;
}

impl<T: RepeatableJob> Schedulable for T {
    fn spawn<'a, F, Fut>(self, mut func: F)
    where
        Self: Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'a,
        <Self::TZ as TimeZone>::Offset: Send + 'a,
    {
        tokio::spawn(async move {
            while let Some(dur) = self.time_to_sleep() {
                if SHUTDOWN.in_progress() {
                    break;
                }
                sleep(dur).await;
                if SHUTDOWN.in_progress() {
                    break;
                }
                SHUTDOWN.scheduled_task_started();
                func().await;
                SHUTDOWN.scheduled_task_finished();
            }
        });
    }
}
