use std::{sync::Arc, time::Duration};

use chrono::Local;
use tracing::{error, info};

use crate::services::{leaderboard_service::LeaderboardService, mentorship_service::MentorshipService};

pub const RANK_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const EXPIRY_SCAN_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Spawns the three periodic drivers: an hourly rank sweep, a 6-hourly
/// expired-request scan and a daily sweep at local midnight. Each loop is
/// stateless between runs; a failed run logs and waits for the next tick.
/// Overlap with event-triggered re-ranks is last-write-wins by design.
pub fn spawn_jobs(leaderboard: Arc<LeaderboardService>, mentorship: Arc<MentorshipService>) {
    let lb = Arc::clone(&leaderboard);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RANK_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = lb.recalculate_all().await {
                error!("hourly rank sweep failed: {e}");
            }
        }
    });

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EXPIRY_SCAN_INTERVAL);
        loop {
            interval.tick().await;
            match mentorship.expire_stale().await {
                Ok(0) => {}
                Ok(n) => info!("expired {n} stale mentorship requests"),
                Err(e) => error!("expired request scan failed: {e}"),
            }
        }
    });

    tokio::spawn(async move {
        loop {
            tokio::time::sleep(until_next_midnight()).await;
            if let Err(e) = leaderboard.recalculate_all().await {
                error!("daily rank sweep failed: {e}");
            }
        }
    });
}

fn until_next_midnight() -> Duration {
    let now = Local::now();
    let midnight = (now + chrono::Duration::days(1))
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("00:00:00 is a valid time")
        .and_local_timezone(Local)
        .earliest();

    match midnight {
        Some(m) => (m - now).to_std().unwrap_or(Duration::from_secs(60)),
        // DST edge where local midnight does not exist; check back later.
        None => Duration::from_secs(60 * 60),
    }
}
