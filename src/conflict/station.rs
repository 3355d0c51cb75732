//! Station-local crossing and platform checks.

use super::{estimate_arrival_minutes, DetectionContext};
use crate::conflict::types::{Conflict, ConflictLocation, ConflictType, Severity};
use crate::models::Train;
use indexmap::IndexMap;

/// Gap below which a crossing is critical, in minutes
const CRITICAL_GAP_MINUTES: f64 = 1.0;

/// Bucket trains by next and current station and check every pair within a bucket
///
/// A train lands in up to two buckets. Crossing checks run in the next-station
/// buckets and platform checks in the current-station buckets, so a pair that
/// shares both stations yields one conflict of each type.
pub(super) fn detect_station_conflicts(
    active: &[&Train],
    ctx: &DetectionContext,
    conflicts: &mut Vec<Conflict>,
) {
    let mut by_next: IndexMap<&str, Vec<&Train>> = IndexMap::new();
    let mut by_current: IndexMap<&str, Vec<&Train>> = IndexMap::new();

    for &train in active {
        if let Some(next) = train.next_station.as_deref() {
            by_next.entry(next).or_default().push(train);
        }
        if let Some(current) = train.current_station.as_deref() {
            by_current.entry(current).or_default().push(train);
        }
    }

    for (station_id, bucket) in &by_next {
        for_each_pair(bucket, |a, b| check_crossing(a, b, station_id, ctx, conflicts));
    }

    for (station_id, bucket) in &by_current {
        for_each_pair(bucket, |a, b| check_platform(a, b, station_id, ctx, conflicts));
    }
}

fn for_each_pair<'t>(bucket: &[&'t Train], mut check: impl FnMut(&'t Train, &'t Train)) {
    for (i, a) in bucket.iter().enumerate() {
        for b in &bucket[i + 1..] {
            if a.id != b.id {
                check(*a, *b);
            }
        }
    }
}

/// Two trains heading for the same station with arrival estimates closer than the safety buffer
fn check_crossing(
    a: &Train,
    b: &Train,
    station_id: &str,
    ctx: &DetectionContext,
    conflicts: &mut Vec<Conflict>,
) {
    let gap = (estimate_arrival_minutes(a, ctx.config) - estimate_arrival_minutes(b, ctx.config)).abs();
    let buffer = ctx.config.safety_buffer;
    if gap >= buffer {
        return;
    }

    let severity = if gap < CRITICAL_GAP_MINUTES {
        Severity::Critical
    } else {
        Severity::Medium
    };

    conflicts.push(Conflict::new(
        ConflictType::Crossing,
        &a.id,
        &b.id,
        ConflictLocation::Station(station_id.to_string()),
        severity,
        (buffer - gap).max(0.0),
    ));
}

/// Two trains standing at the same station
fn check_platform(
    a: &Train,
    b: &Train,
    station_id: &str,
    ctx: &DetectionContext,
    conflicts: &mut Vec<Conflict>,
) {
    let delay = if ctx.platform_capacity(station_id) > 1 {
        ctx.config.multi_platform_delay
    } else {
        ctx.config.single_platform_delay
    };

    conflicts.push(Conflict::new(
        ConflictType::Platform,
        &a.id,
        &b.id,
        ConflictLocation::Station(station_id.to_string()),
        Severity::Medium,
        delay,
    ));
}
