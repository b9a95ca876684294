use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

use crate::graphite::{Connection, Graphite};
use crate::model::{ConnectedDevice, Section};
use crate::points;

/// Wall-clock period every poll cycle is stretched to.
pub const POLL_PERIOD: Duration = Duration::from_secs(30);

/// Poll all sections on a fixed period until `cancel` fires.
///
/// Cancellation is observed while a fetch is in flight and during the
/// inter-cycle wait; an in-progress dispatch is always awaited to
/// completion so no partial batch is left on the wire.
pub async fn run(
    device: &ConnectedDevice,
    sections: &[Section],
    graphite: &Graphite,
    prefix: &str,
    cancel: &CancellationToken,
) {
    while !cancel.is_cancelled() {
        let cycle_start = Instant::now();
        cycle(device, sections, graphite, prefix, cancel).await;
        if cancel.is_cancelled() {
            break;
        }

        let wait = remaining_wait(cycle_start.elapsed());
        if !wait.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(wait) => {}
            }
        }
    }
    log::info!("Poll loop stopped");
}

/// Fetch, decode and ship every section once, one batch per section.
async fn cycle(
    device: &ConnectedDevice,
    sections: &[Section],
    graphite: &Graphite,
    prefix: &str,
    cancel: &CancellationToken,
) {
    /* one sink connection per cycle, opened at the first non-empty batch */
    let mut connection: Option<Connection> = None;

    for section in sections {
        let values = tokio::select! {
            _ = cancel.cancelled() => return,
            values = crate::read_section(device, section) => values,
        };
        let values = match values {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Skipping section {} for this cycle: {:?}", section.name, e);
                continue;
            }
        };

        let points = points::build(prefix, section, &values, unix_now());
        if points.is_empty() {
            continue;
        }

        if connection.is_none() {
            match graphite.connect().await {
                Ok(c) => connection = Some(c),
                Err(e) => {
                    log::warn!("Unable to reach graphite at {}: {:?}", graphite.host, e);
                    continue;
                }
            }
        }
        if let Some(c) = connection.as_mut() {
            if let Err(e) = c.send(&points).await {
                log::warn!(
                    "Failed to ship {} datapoints for section {}: {:?}",
                    points.len(),
                    section.name,
                    e
                );
                connection = None;
            }
        }
    }
}

/// Time left of `POLL_PERIOD` after a cycle took `elapsed`. An overrunning
/// cycle yields zero and the next cycle starts immediately.
fn remaining_wait(elapsed: Duration) -> Duration {
    POLL_PERIOD.saturating_sub(elapsed)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
