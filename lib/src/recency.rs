use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::model::ThreadSnapshot;

/// Check whether a post made at `last_post_time` is recent, as seen from `now`.
///
/// The elapsed time must be non-negative, within `window`, and less than a day.
/// The day bound applies even if `window` is longer.
pub fn is_recent(last_post_time: DateTime<Utc>, window: Duration, now: DateTime<Utc>) -> bool {
    let elapsed = now - last_post_time;

    elapsed >= Duration::zero() && elapsed < Duration::days(1) && elapsed <= window
}

/// Filter snapshots down to watched threads with a recent post, preserving order.
pub fn match_recent<'a, I>(
    snapshots: I,
    watch_list: &'a HashSet<String>,
    window: Duration,
    now: DateTime<Utc>,
) -> impl Iterator<Item = ThreadSnapshot> + 'a
where
    I: IntoIterator<Item = ThreadSnapshot>,
    I::IntoIter: 'a,
{
    snapshots.into_iter().filter(move |snapshot| {
        if !watch_list.contains(&snapshot.thread_name) {
            return false;
        }

        let recent = is_recent(snapshot.last_post_time, window, now);

        debug!(
            "Watched thread '{}' last posted at {} (recent: {}).",
            snapshot.thread_name, snapshot.last_post_time, recent
        );

        recent
    })
}
