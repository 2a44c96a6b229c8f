use crate::{
    backend::AvailabilityBackend,
    controller::AvailabilitySync,
    widget::{DatePicker, TimeSelector},
};
use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::info;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(20);

/// Refreshes right away and then once per `period`. Every tick runs in its
/// own task, so a slow fetch never delays the next one. Which result wins is
/// decided by the controller.
pub fn spawn_refresh_loop<B, P, T>(
    sync: AvailabilitySync<P, T>,
    backend: B,
    period: Duration,
) -> JoinHandle<()>
where
    B: AvailabilityBackend,
    P: DatePicker + Send + 'static,
    T: TimeSelector + Send + 'static,
{
    info!(?period, "Starting availability refresh loop");
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let sync = sync.clone();
            let backend = backend.clone();
            tokio::spawn(async move {
                sync.refresh(&backend).await;
            });
        }
    })
}
