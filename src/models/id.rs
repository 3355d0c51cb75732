/// ID generation utilities
///
/// Conflict and recommendation ids are synthesized fresh on every pass. They
/// carry a timestamp and a random suffix so that two passes never hand out
/// the same id, which means callers must not use them to match results
/// across passes (use `Conflict::key` for that).
use rand::Rng;

fn unique_suffix() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let nonce: u64 = rand::thread_rng().gen();
    format!("{millis}-{nonce:016x}")
}

/// Generate an id for a conflict between two trains
#[must_use]
pub fn conflict_id(train_a: &str, train_b: &str) -> String {
    format!("conflict-{train_a}-{train_b}-{}", unique_suffix())
}

/// Generate an id for a recommendation attached to a conflict
#[must_use]
pub fn recommendation_id(kind: &str) -> String {
    format!("rec-{kind}-{}", unique_suffix())
}

/// Generate a new UUID string for scenarios
#[must_use]
pub fn generate_scenario_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_conflict_id_mentions_both_trains() {
        let id = conflict_id("T1", "T2");
        assert!(id.starts_with("conflict-T1-T2-"));
    }

    #[test]
    fn test_generate_many_unique_ids() {
        let mut ids = HashSet::new();
        let count = 10_000;

        for _ in 0..count {
            ids.insert(conflict_id("A", "B"));
        }

        // All IDs should be unique
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_scenario_ids_differ() {
        assert_ne!(generate_scenario_id(), generate_scenario_id());
    }
}
