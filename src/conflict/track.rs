//! Shared-track checks.

use super::DetectionContext;
use crate::conflict::types::{Conflict, ConflictLocation, ConflictType, Severity};
use crate::models::{Track, Train};

/// Compare every pair of active trains and flag those resolved to the same track
pub(super) fn detect_track_conflicts(
    active: &[&Train],
    ctx: &DetectionContext,
    conflicts: &mut Vec<Conflict>,
) {
    if ctx.track_index.is_empty() {
        return;
    }

    // Resolve each train's track once instead of once per pair
    let resolved: Vec<(&Train, Option<&Track>)> = active
        .iter()
        .map(|&train| (train, ctx.track_index.track_of(train)))
        .collect();

    for (i, (a, track_a)) in resolved.iter().enumerate() {
        let Some(track_a) = track_a else { continue };

        for (b, track_b) in &resolved[i + 1..] {
            let Some(track_b) = track_b else { continue };
            if a.id == b.id || track_a.id != track_b.id {
                continue;
            }

            conflicts.push(Conflict::new(
                ConflictType::Track,
                &a.id,
                &b.id,
                ConflictLocation::Track(track_a.id.clone()),
                Severity::High,
                ctx.config.track_conflict_delay,
            ));
        }
    }
}
