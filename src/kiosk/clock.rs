//! Header clock
//!
//! Ticks once a second and publishes the local time on a watch channel.

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_secs(1);

/// `hh:mm:ss am/pm`
pub fn format_clock(now: DateTime<FixedOffset>) -> String {
    now.format("%I:%M:%S %P").to_string()
}

/// The ticking clock shown in the kiosk header
pub struct Clock {
    zone: FixedOffset,
    tx: Arc<watch::Sender<String>>,
}

impl Clock {
    pub fn new(zone: FixedOffset) -> Self {
        let (tx, _rx) = watch::channel(format_clock(Utc::now().with_timezone(&zone)));
        Self {
            zone,
            tx: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Start ticking; the task ends once every receiver is gone
    pub fn start(&self) -> JoinHandle<()> {
        let tx = Arc::clone(&self.tx);
        let zone = self.zone;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);

            loop {
                interval.tick().await;
                if tx.is_closed() {
                    tracing::debug!("Clock stopped, no subscribers");
                    break;
                }
                tx.send_replace(format_clock(Utc::now().with_timezone(&zone)));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_clock() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let now = ist.with_ymd_and_hms(2026, 10, 16, 14, 5, 9).unwrap();
        assert_eq!(format_clock(now), "02:05:09 pm");

        let morning = ist.with_ymd_and_hms(2026, 10, 16, 0, 30, 0).unwrap();
        assert_eq!(format_clock(morning), "12:30:00 am");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_ticks() {
        let clock = Clock::new(FixedOffset::east_opt(0).unwrap());
        let rx = clock.subscribe();
        let handle = clock.start();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(rx.has_changed().unwrap());

        drop(rx);
        let stopped = tokio::time::timeout(Duration::from_secs(3), handle).await;
        assert!(stopped.is_ok());
    }
}
