use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use tokio::task::JoinHandle;

use super::service::EmailService;

/// Run [`EmailService::send_report`] every day at local midnight.
pub fn spawn_daily_report(service: Arc<EmailService>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = until_next_midnight(&Local::now());
            tracing::debug!(seconds = wait.as_secs(), "next daily report scheduled");
            tokio::time::sleep(wait).await;
            service.send_report().await;
        }
    })
}

/// Time left until the next midnight in `now`'s time zone.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let fallback = Duration::from_secs(24 * 60 * 60);
    let Some(tomorrow) = now.date_naive().checked_add_days(Days::new(1)) else {
        return fallback;
    };
    let Some(midnight) = now
        .timezone()
        .from_local_datetime(&tomorrow.and_time(NaiveTime::MIN))
        .earliest()
    else {
        return fallback;
    };
    (midnight - now.clone()).to_std().unwrap_or(fallback)
}
