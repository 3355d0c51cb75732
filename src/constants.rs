use chrono::{NaiveDate, NaiveDateTime};

/// Base date used for all scenario timestamps
pub const BASE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("Invalid base date"),
};

/// Default wall-clock start for a scenario (`BASE_DATE` at 08:00:00)
pub const DEFAULT_SCENARIO_START: NaiveDateTime = match BASE_DATE.and_hms_opt(8, 0, 0) {
    Some(dt) => dt,
    None => panic!("Invalid default scenario start"),
};

/// Lowest and highest train priority
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;

/// Shortest hold the recommendation heuristics will ever propose
pub const MIN_HOLD_MINUTES: f64 = 3.0;

/// Hold length assumed when the minute count cannot be read back from the action text
pub const FALLBACK_HOLD_MINUTES: u32 = 5;

/// Efficiency points lost per active conflict
pub const CONFLICT_EFFICIENCY_PENALTY: f64 = 5.0;

/// Rough conversion used by the position placeholder
pub const KM_PER_DEGREE: f64 = 111.0;
